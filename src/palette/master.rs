// Master palette - Built-in 64-entry NTSC console palette
//
// Entries $0E-$0F, $1E-$1F, $2E-$2F and $3E-$3F are unused on hardware and are
// marked inactive, so a palette cache never overwrites those slots from here.

use super::PaletteEntry;
use crate::color::Color;

/// Number of entries in the master palette
pub const MASTER_PALETTE_SIZE: usize = 64;

/// Master palette colors as 0xRRGGBB values, approximating NTSC output
pub const MASTER_PALETTE: [u32; MASTER_PALETTE_SIZE] = [
    // $00-$0F
    0x666666, 0x002A88, 0x1412A7, 0x3B00A4, 0x5C007E, 0x6E0040, 0x6C0600, 0x561D00,
    0x333500, 0x0B4800, 0x005200, 0x004F08, 0x00404D, 0x000000, 0x000000, 0x000000,
    // $10-$1F
    0xADADAD, 0x155FD9, 0x4240FF, 0x7527FE, 0xA01ACC, 0xB71E7B, 0xB53120, 0x994E00,
    0x6B6D00, 0x388700, 0x0C9300, 0x008F32, 0x007C8D, 0x000000, 0x000000, 0x000000,
    // $20-$2F
    0xFFFEFF, 0x64B0FF, 0x9290FF, 0xC676FF, 0xF36AFF, 0xFE6ECC, 0xFE8170, 0xEA9E22,
    0xBCBE00, 0x88D800, 0x5CE430, 0x45E082, 0x48CDDE, 0x4F4F4F, 0x000000, 0x000000,
    // $30-$3F
    0xFFFEFF, 0xC0DFFF, 0xD3D2FF, 0xE8C8FF, 0xFBC2FF, 0xFEC4EA, 0xFECCC5, 0xF7D8A5,
    0xE4E594, 0xCFEF96, 0xBDF4AB, 0xB3F3CC, 0xB5EBF2, 0xB8B8B8, 0x000000, 0x000000,
];

/// Whether a master palette slot is one of the unused columns ($xE, $xF)
#[inline]
pub fn is_unused_slot(index: usize) -> bool {
    (index & 0x0F) >= 0x0E
}

/// Build palette entries for the master palette
pub fn master_entries() -> Vec<PaletteEntry> {
    MASTER_PALETTE
        .iter()
        .enumerate()
        .map(|(index, &rgb)| {
            let color = Color::from_rgb_u32(rgb);
            PaletteEntry {
                index,
                r: color.r,
                g: color.g,
                b: color.b,
                active: !is_unused_slot(index),
            }
        })
        .collect()
}
