// Indexed Compositor - Main Entry Point
//
// Runs the compositor in a window, fed by the built-in pattern producer.
// Hotkeys: Space pause/resume, R toggle half resolution, F9 snapshot, Esc quit.

use indexed_compositor::config::{CompositorConfig, CONFIG_FILE};
use indexed_compositor::display::run_display;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Indexed Compositor v{}", env!("CARGO_PKG_VERSION"));
    println!("==============================");
    println!();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = CompositorConfig::load_or_default(&config_path);
    println!("Configuration loaded from '{}'", config_path);
    println!();

    println!("Space: pause/resume  R: toggle resolution  F9: snapshot  Esc: quit");
    println!();

    run_display(config)?;

    println!("Display window closed.");
    Ok(())
}
