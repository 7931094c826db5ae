//! Command-line entry point: offline training runs and the prediction
//! server.

use clap::{Parser, Subcommand};
use sales_forecast::core::MonthlySeries;
use sales_forecast::ingest::read_records;
use sales_forecast::models::ModelKind;
use sales_forecast::pipeline::{run_training, TrainingConfig};
use sales_forecast::serve::{cors_from_env, router, AppState, ModelRegistry};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sales-forecast", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a model on a sales CSV and report holdout metrics.
    Train {
        /// Path to the input CSV (Order Date + Sales columns).
        #[arg(long)]
        input: PathBuf,
        /// Directory receiving the persisted model artifact.
        #[arg(long, default_value = "reports/models")]
        outdir: PathBuf,
        /// Model variant: rf or gbt.
        #[arg(long, default_value = "rf")]
        model: String,
        /// Number of most-recent months held out for evaluation.
        #[arg(long, default_value_t = 3)]
        horizon: usize,
    },
    /// Serve predictions from previously trained artifacts.
    Serve {
        /// Directory holding persisted model artifacts.
        #[arg(long, default_value = "reports/models")]
        models_dir: PathBuf,
        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Train {
            input,
            outdir,
            model,
            horizon,
        } => {
            let kind: ModelKind = model.parse()?;
            let records = read_records(&input)?;
            let series = MonthlySeries::aggregate_monthly(&records)?;
            info!(months = series.len(), "aggregated monthly series");

            let config = TrainingConfig::new(kind, outdir).with_horizon(horizon);
            let report = run_training(&series, &config)?;

            println!("model:    {}", report.kind);
            println!("horizon:  {} months", report.horizon);
            println!("rows:     {} train / {} test", report.n_train, report.n_test);
            println!("artifact: {}", report.artifact.display());
            print_metrics("model", &report.model_metrics);
            print_metrics("baseline", &report.baseline_metrics);
        }
        Command::Serve { models_dir, addr } => {
            let registry = ModelRegistry::discover(&models_dir);
            let state = AppState::new(registry);
            let app = router(state)
                .layer(cors_from_env())
                .layer(TraceLayer::new_for_http());

            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "serving predictions");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install shutdown handler");
    }
}

fn print_metrics(label: &str, metrics: &sales_forecast::utils::MetricSet) {
    let mape = metrics
        .mape
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"));
    println!(
        "{label:9} MAPE {mape}  sMAPE {:.2}%  MAE {:.2}  RMSE {:.2}",
        metrics.smape, metrics.mae, metrics.rmse
    );
}
