use anyhow::{Context, Result};
use rootclock::app::App;
use rootclock::clock::SystemClock;
use rootclock::display::X11Display;
use rootclock::{cli, signal};
use rootclock_fonts::SystemFontMatcher;

fn main() {
    if let Err(e) = run() {
        eprintln!("rootclock: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = match cli::process_cli() {
        cli::CliResult::Exit(0) => return Ok(()),
        cli::CliResult::Exit(code) => std::process::exit(code),
        cli::CliResult::Continue(options) => options,
    };
    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied below).
    rootclock::debug::init_log_bridge(options.log_level);

    let config = cli::load_config(options.config_path.as_deref())?;
    rootclock::debug::apply_config_level(config.log_level);
    log::info!("Starting rootclock {}", rootclock::VERSION);

    signal::install().context("failed to install signal handlers")?;
    let display = X11Display::connect()?;
    let matcher = SystemFontMatcher::new();

    let mut app = App::new(config, display, SystemClock, matcher)?;
    app.run(signal::running())?;

    // The desktop window is destroyed and the connection closed on drop.
    drop(app);
    log::info!("rootclock exiting");
    Ok(())
}
