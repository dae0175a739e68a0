use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use coinboard::app::App;
use coinboard::config::Settings;
use coinboard::engine::types::{Action, LoadStatus, SortField};
use coinboard::market_data::adapters::coingecko::CoinGeckoAdapter;
use coinboard::telemetry::{self, LogTarget, TracingObserver};
use coinboard::tui;

#[derive(Debug, Parser)]
#[command(name = "coinboard", version, about = "Top-10 cryptocurrency market dashboard")]
struct Cli {
    /// Settings file (defaults to ./coinboard.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API root, e.g. http://localhost:8080/api/v3
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Fetch once, apply search and sorts, print the table and exit
    Snapshot {
        /// Case-insensitive name filter
        #[arg(long, default_value = "")]
        search: String,
        /// Sort clicks applied in order; repeat a field to flip its direction
        #[arg(long = "sort", value_enum)]
        sorts: Vec<SortArg>,
        /// Print the dashboard description as JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    MarketCap,
    Change,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::MarketCap => SortField::MarketCap,
            SortArg::Change => SortField::Change,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }

    let command = cli.command.unwrap_or(Command::Tui);
    let log_target = match (&command, &settings.log.file) {
        (Command::Snapshot { .. }, _) => LogTarget::Stderr,
        (Command::Tui, Some(path)) => LogTarget::File(path),
        (Command::Tui, None) => LogTarget::Discard,
    };
    telemetry::init_tracing(&settings.log.filter, log_target)?;
    telemetry::init_metrics(settings.metrics.port)?;

    let source = Arc::new(CoinGeckoAdapter::new(&settings.api)?);
    info!(url = source.markets_url(), "Starting coinboard");
    let mut app = App::mount(source, Arc::new(TracingObserver));

    let code = match command {
        Command::Tui => {
            tui::run(&mut app, Duration::from_millis(settings.ui.tick_rate_ms)).await?;
            ExitCode::SUCCESS
        }
        Command::Snapshot { search, sorts, json } => {
            app.settle().await;
            app.dispatch(Action::SearchChanged(search));
            for sort in sorts {
                app.dispatch(Action::Sort(sort.into()));
            }

            let dashboard = app.dashboard();
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print!("{}", dashboard.to_text());
            }
            match dashboard.status {
                LoadStatus::Failed { .. } => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            }
        }
    };

    app.unmount();
    Ok(code)
}
