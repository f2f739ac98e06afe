// End-to-end compositor scenarios
// These tests drive the compositor through its public API the way a host does

mod common;

use common::{TestPalette, TestProducer, BLUE, GREEN, RED};
use indexed_compositor::*;

fn compositor_with(producer: TestProducer) -> Compositor<TestProducer> {
    let width = producer.frame.width() as u32;
    let height = producer.frame.height() as u32;
    let mut compositor = Compositor::new(width, height).expect("valid resolution");
    compositor
        .load(producer, &mut MemorySurface::new())
        .expect("load");
    compositor
}

#[test]
fn test_scenario_a_substitution_and_resolution() {
    let mut palette = TestPalette::rgb(0);
    let mut surface = MemorySurface::new();
    let mut compositor = compositor_with(TestProducer::new(3, 1, vec![-1, 2, 5]));

    compositor
        .draw(&mut palette, &mut surface)
        .expect("draw succeeds");

    let producer = compositor.producer().expect("producer loaded");
    assert_eq!(producer.frame.as_slice(), &[0, 2, 5]);

    // Background 0 is valid, so the transparent color is red
    assert_eq!(surface.presented().as_slice(), &[RED, BLUE, RED]);
    assert_eq!(compositor.palette_cache().len(), 4);
    assert_eq!(palette.acknowledgements, 1);
}

#[test]
fn test_scenario_b_stale_cache_without_invalidation() {
    let mut palette = TestPalette::rgb(0);
    let mut surface = MemorySurface::new();
    let mut compositor = compositor_with(TestProducer::new(1, 1, vec![1]));

    compositor.draw(&mut palette, &mut surface).expect("first draw");
    assert!(!palette.invalid);
    assert_eq!(compositor.palette_cache().lookup(1), Some(GREEN));

    // Mutate the entry without raising the dirty bit
    palette.entries[1].r = 1.0;
    compositor.draw(&mut palette, &mut surface).expect("second draw");

    assert_eq!(compositor.palette_cache().lookup(1), Some(GREEN));
    assert_eq!(surface.presented().as_slice(), &[GREEN]);
    assert_eq!(palette.acknowledgements, 1);

    // Raising it picks up the change
    palette.invalid = true;
    compositor.draw(&mut palette, &mut surface).expect("third draw");
    assert_eq!(
        compositor.palette_cache().lookup(1),
        Some(Color::rgb(1.0, 1.0, 0.0))
    );
    assert_eq!(palette.acknowledgements, 2);
}

#[test]
fn test_scenario_c_resolution_reset() {
    let mut palette = TestPalette::rgb(0);
    let mut surface = MemorySurface::new();
    let mut compositor = compositor_with(TestProducer::new(1, 1, vec![0]));

    compositor
        .reset_resolution(256, 240, &mut surface)
        .expect("full resolution");
    assert_eq!(compositor.resolved_frame().len(), 61440);
    let full_crop = surface.crop();
    assert_eq!(full_crop.width, (256.0 - 16.0) / 256.0);
    assert_eq!(full_crop.height, (240.0 - 15.0) / 240.0);

    compositor
        .reset_resolution(128, 120, &mut surface)
        .expect("half resolution");
    assert_eq!(compositor.resolved_frame().len(), 15360);
    assert_eq!(compositor.producer().expect("loaded").frame.len(), 15360);

    let crop = surface.crop();
    assert_eq!(crop.x, 0.0);
    assert_eq!(crop.width, (128.0 - 8.0) / 128.0);
    assert_eq!(crop.height, (120.0 - 7.0) / 120.0);
    assert_eq!(crop.y, 1.0 - (120.0 - 7.0) / 120.0);

    let config = surface.config().expect("surface configured");
    assert_eq!((config.reference_width, config.reference_height), (128, 120));

    // The smaller frame composites without a size mismatch
    let outcome = compositor
        .draw(&mut palette, &mut surface)
        .expect("draw at new resolution");
    assert!(matches!(outcome, DrawOutcome::Presented(_)));
    assert_eq!(surface.presented().len(), 15360);
}

#[test]
fn test_in_range_pixels_match_cache() {
    let pixels = vec![0, 1, 2, 3, -1, 4, -2, 1];
    let mut palette = TestPalette::rgb(1);
    let mut surface = MemorySurface::new();
    let mut compositor = compositor_with(TestProducer::new(4, 2, pixels));

    compositor.draw(&mut palette, &mut surface).expect("draw");

    let cache = compositor.palette_cache();
    let producer = compositor.producer().expect("loaded");
    let transparent = cache.lookup(1).expect("background in range");

    for (&index, &color) in producer
        .frame
        .as_slice()
        .iter()
        .zip(compositor.resolved_frame().as_slice())
    {
        match cache.lookup(index) {
            Some(expected) => assert_eq!(color, expected),
            None => assert_eq!(color, transparent),
        }
    }
}

#[test]
fn test_inactive_slot_resolves_to_initial_black() {
    let mut palette = TestPalette::rgb(0);
    let mut surface = MemorySurface::new();
    let mut compositor = compositor_with(TestProducer::new(1, 1, vec![3]));

    compositor.draw(&mut palette, &mut surface).expect("draw");

    // Slot 3 is inactive and was never written, so it keeps the fresh slot value
    assert_eq!(surface.presented().as_slice(), &[Color::BLACK]);
}

#[test]
fn test_background_out_of_range_is_diagnostic() {
    let mut palette = TestPalette::rgb(42);
    let mut surface = MemorySurface::new();
    let mut compositor: Compositor<TestProducer> = Compositor::new(3, 1)
        .expect("valid")
        .with_diagnostic_color(Color::rgb(0.0, 1.0, 1.0));
    compositor
        .load(TestProducer::new(3, 1, vec![-1, 0, 99]), &mut surface)
        .expect("load");

    let outcome = compositor.draw(&mut palette, &mut surface).expect("draw");

    let cyan = Color::rgb(0.0, 1.0, 1.0);
    assert_eq!(surface.presented().as_slice(), &[cyan, RED, cyan]);
    assert_eq!(
        outcome,
        DrawOutcome::Presented(FrameStats {
            substituted: 1,
            unresolved: 2,
        })
    );
    assert_eq!(compositor.producer().expect("loaded").frame.as_slice(), &[42, 0, 99]);
}

#[test]
fn test_state_machine_transitions() {
    let mut palette = TestPalette::rgb(0);
    let mut surface = MemorySurface::new();
    let mut compositor: Compositor<TestProducer> = Compositor::new(1, 1).expect("valid");

    assert_eq!(compositor.state(), EngineState::Uninitialized);
    assert_eq!(
        compositor.tick(&mut palette, &mut surface).expect("tick"),
        DrawOutcome::Skipped
    );

    let mut producer = TestProducer::new(1, 1, vec![2]);
    producer.running = false;
    compositor.load(producer, &mut surface).expect("load");
    assert_eq!(compositor.state(), EngineState::Loaded);
    assert_eq!(
        compositor.tick(&mut palette, &mut surface).expect("tick"),
        DrawOutcome::Skipped
    );
    assert!(palette.invalid);

    compositor.producer_mut().expect("loaded").running = true;
    assert_eq!(compositor.state(), EngineState::Running);
    compositor.tick(&mut palette, &mut surface).expect("tick");
    assert_eq!(surface.presented().as_slice(), &[BLUE]);
}

#[test]
fn test_pattern_producer_with_master_palette() {
    let config = CompositorConfig::default();
    let mut palette = config.load_palette().expect("master palette");
    let mut surface = MemorySurface::new();

    let producer = PatternProducer::new(config.resolution.width, config.resolution.height)
        .with_overscan(config.resolution.overscan_x, config.resolution.overscan_y);
    let mut compositor = Compositor::from_config(&config).expect("valid config");
    compositor.load(producer, &mut surface).expect("load");
    compositor
        .reset_resolution(config.resolution.width, config.resolution.height, &mut surface)
        .expect("reset");

    let outcome = compositor.tick(&mut palette, &mut surface).expect("tick");
    let DrawOutcome::Presented(stats) = outcome else {
        panic!("expected a presented frame");
    };
    assert!(stats.substituted > 0);
    assert!(stats.unresolved > 0);

    // Bottom-right cell holds an out-of-range index; background 0x0F is
    // inactive in the master palette and resolves to its initial black
    let frame = surface.presented();
    assert_eq!(frame.get_pixel(255, 239), Color::BLACK);
    assert_eq!(
        frame.get_pixel(0, 0),
        Color::from_rgb_u32(MASTER_PALETTE_COLOR_0)
    );
}

const MASTER_PALETTE_COLOR_0: u32 = indexed_compositor::palette::MASTER_PALETTE[0];
