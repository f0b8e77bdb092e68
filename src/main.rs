use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ecgd::api::{start_api_server, AppState};
use ecgd::config::AppConfig;
use ecgd::convert;
use ecgd::error::Result;
use ecgd::model::{ModelHandle, OnnxModel, Predictor};

#[derive(Parser)]
#[command(name = "ecgd")]
#[command(version = "0.1.0")]
#[command(about = "ECG abnormality classifier served over HTTP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config directory
    #[arg(short, long, default_value = "config")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the inference API server (default)
    Serve {
        /// Listen port override
        #[arg(short, long)]
        port: Option<u16>,
        /// Model artifact path override
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Convert an NPY array file into a header-less CSV of 12-lead rows
    Convert {
        /// Input .npy file
        input: String,
        /// Output .csv file
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert { input, output }) => {
            init_logging_simple();
            convert::npy_to_csv(&input, &output)?;
        }
        Some(Commands::Serve { port, model }) => {
            run_server(&cli.config, port, model).await?;
        }
        None => {
            run_server(&cli.config, None, None).await?;
        }
    }

    Ok(())
}

async fn run_server(config_dir: &str, port: Option<u16>, model_path: Option<String>) -> Result<()> {
    let mut config = AppConfig::load_from(config_dir)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(path) = model_path {
        config.model.path = path;
    }

    init_logging(&config.logging.level);

    let model = load_model(&config.model.path);
    let state = AppState::new(model);

    start_api_server(state, &config.server.host, config.server.port).await
}

/// Load the classifier once at startup. Failure leaves the handle absent and
/// the service running in degraded mode; clients see it via /api/model-info.
fn load_model(path: &str) -> ModelHandle {
    match OnnxModel::load(path) {
        Ok(model) => {
            info!("model loaded from {path}");
            Some(Arc::new(model) as Arc<dyn Predictor>)
        }
        Err(e) => {
            error!("model load failed ({path}): {e}");
            None
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},ecgd=debug")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn init_logging_simple() {
    // Minimal logging for one-shot CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}
