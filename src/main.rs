use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod cli;

use cli::{format_grid, Cli, Commands};
use ngomate::{
    api::PortalClient,
    config::Config,
    dashboard::{self, App},
    errors::PortalResult,
    supplier,
    table::build_grid,
    views::{build_supplier, RecordView, SupplierSource},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "ngomate=info");
    }
    init_logging(matches!(cli.command, Commands::Dashboard))?;

    let config = Config::from_env()?;
    config.validate()?;

    match &cli.command {
        Commands::Onboard { .. } => {
            let outcome = match cli.command.onboarding_request() {
                Some(request) => submit(&config, |client| async move {
                    client.onboard(&request).await
                })
                .await,
                None => Ok(()),
            };
            report(outcome, "NGO onboarding submitted", "Failed to submit onboarding");
        }

        Commands::Donate { .. } => {
            let outcome = match cli.command.donation_request() {
                Some(Ok(request)) => submit(&config, |client| async move {
                    client.donate(&request).await
                })
                .await,
                Some(Err(e)) => Err(e),
                None => Ok(()),
            };
            report(outcome, "Donation submitted", "Failed to process donation");
        }

        Commands::RequestHelp { .. } => {
            let outcome = match cli.command.assistance_request() {
                Some(Ok(request)) => submit(&config, |client| async move {
                    client.request_assistance(&request).await
                })
                .await,
                Some(Err(e)) => Err(e),
                None => Ok(()),
            };
            report(
                outcome,
                "Assistance request submitted",
                "Failed to submit assistance request",
            );
        }

        Commands::Table { view, source, endpoint, csv, filter } => {
            match print_table(&config, view, source, endpoint.as_deref(), csv.as_deref(), filter.as_deref()).await {
                Ok(count) => info!("Printed {} records", count),
                Err(e) => {
                    error!("Table failed: {}", e);
                    eprintln!("Failed to load records. Please try again.");
                    std::process::exit(1);
                }
            }
        }

        Commands::Dashboard => {
            let mut app = App::new(config);
            if let Err(e) = dashboard::run_in_terminal(&mut app).await {
                error!("Dashboard encountered an error: {}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Console and file logging; the dashboard logs to its file only
fn init_logging(interactive: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    if interactive {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dashboard::LOG_FILE)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_ansi(false)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
        return Ok(());
    }

    let file_appender = tracing_appender::rolling::never(".", "ngomate.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env())
        )
        .init();
    Ok(())
}

/// Build a client and run one submission against it
async fn submit<F, Fut>(config: &Config, call: F) -> PortalResult<()>
where
    F: FnOnce(PortalClient) -> Fut,
    Fut: std::future::Future<Output = PortalResult<serde_json::Value>>,
{
    let client = PortalClient::new(config)?;
    let response = call(client).await?;
    if !response.is_null() {
        info!("Portal response: {}", response);
    }
    Ok(())
}

/// Print the outcome; failures get a generic message and exit code 1
fn report(outcome: PortalResult<()>, success: &str, failure: &str) {
    match outcome {
        Ok(()) => {
            info!("{}", success);
            println!("{}", success);
        }
        Err(e) => {
            error!("{}: {}", failure, e);
            eprintln!("{}. Please try again.", failure);
            std::process::exit(1);
        }
    }
}

async fn print_table(
    config: &Config,
    view: &str,
    source: &str,
    endpoint: Option<&str>,
    csv: Option<&str>,
    filter: Option<&str>,
) -> PortalResult<usize> {
    let view = RecordView::parse(view)?;
    let source = SupplierSource::parse(source, endpoint, csv)?;
    let records = build_supplier(config, view, &source)?;

    let (fields, rows) = supplier::load(records.as_ref()).await?;

    let mut table_config = view.table_config();
    if let Some(filter) = filter {
        table_config.set_filter(filter);
    }
    let grid = build_grid(&fields, &rows, false, &table_config);

    println!("{}", view.title());
    println!();
    println!("{}", format_grid(&grid));
    println!();
    println!("Total: {} of {} records", grid.rows().len(), rows.len());

    Ok(grid.rows().len())
}
