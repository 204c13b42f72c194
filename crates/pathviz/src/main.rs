use anyhow::{Context as _, anyhow};
use clap::Parser;
use pathviz::{Cli, Config, Visualizer, logging};
use pathviz_core::{App, AppConfig};
use pathviz_crossterm::CrosstermDriver;

fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    logging::init(config.log_file.as_deref())?;

    let (width, height) = config.screen_size();
    let model = Visualizer::new(&config).context("cannot build board")?;
    let driver = CrosstermDriver::new().with_frame_interval(config.frame);

    let mut app = App::new(AppConfig {
        model,
        driver,
        width,
        height,
    });
    app.run().map_err(|e| anyhow!("{e}"))?;
    log::info!("bye");
    Ok(())
}
