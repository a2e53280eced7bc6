use std::sync::mpsc;

use anyhow::{Context, Result};
use env_logger::Env;
use malleable::{App, LogHost, LoopbackAssistant, Shell};
use malleable_config::MalleableConfig;
use malleable_window::{MalleableWindow, TextPainter};

fn main() -> Result<()> {
    let config = MalleableConfig::load();
    env_logger::Builder::from_env(Env::default().default_filter_or(config.logging.filter.as_str()))
        .init();

    let working_directory = match config.assistant.working_directory.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("current directory is not accessible")?,
    };

    let (events, inbox) = mpsc::channel();
    let assistant = LoopbackAssistant::new(events, working_directory)?;

    let window = MalleableWindow::new(&config.window)?;
    let app = App::new(
        &config,
        LogHost::default(),
        assistant,
        inbox,
        f64::from(config.window.width),
        f64::from(config.window.height),
    );
    let text = TextPainter::from_system_fonts().unwrap_or_else(|err| {
        log::warn!("no usable system font, text will not be drawn: {err:#}");
        TextPainter::without_font()
    });
    log::info!("starting {}", config.window.title);
    window.run(Shell::new(app, text))
}
