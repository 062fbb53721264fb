use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod analysis;
mod controller;
mod data;
mod domain;
mod engine;
mod i18n;
mod ingest;
mod inputter;
mod model;
mod seed;
mod store;
mod ui;

use clap::Parser;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use controller::Controller;
use domain::{MejaConfig, MejaError, Message};
use i18n::Lang;
use model::{Model, Status};
use ui::TableUI;

/// Terminal viewer for business data: seed datasets, CSV uploads,
/// filtering, sorting and AI assisted analysis.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV file to open on startup.
    path: Option<String>,

    /// Display language.
    #[arg(long, value_enum, default_value = "id")]
    lang: Lang,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn run() -> Result<(), MejaError> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = MejaConfig::default().with_lang(cli.lang);
    if let Ok(url) = std::env::var("MEJA_API_URL") {
        config = config.with_api_url(url);
    }
    config = config.with_api_key(std::env::var("MEJA_API_KEY").ok());

    let mut model = Model::init(&config);
    if let Some(path) = &cli.path {
        let expanded =
            shellexpand::full(path).map_err(|e| MejaError::IoError(std::io::Error::other(e)))?;
        model.open_file(&PathBuf::from(expanded.as_ref()));
    }

    let controller = Controller::new(&config);
    let mut ui = TableUI::default();
    let mut terminal = ratatui::init();

    let size = terminal.size()?;
    model.update(Message::Resize(size.width as usize, size.height as usize))?;
    info!("Started in a {}x{} terminal", size.width, size.height);

    while model.status != Status::QUITTING {
        terminal.draw(|frame| ui.draw(frame, &model))?;
        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        }
    }

    Ok(())
}

/// File logging, enabled by pointing MEJA_LOG at a writable path. The
/// level comes from RUST_LOG and defaults to info.
fn init_logging() -> Result<(), MejaError> {
    let Ok(path) = std::env::var("MEJA_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}
