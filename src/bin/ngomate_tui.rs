//! Dashboard binary entry point

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use ngomate::{
    config::Config,
    dashboard::{self, App},
    views::{build_supplier, RecordView, SupplierSource},
};

#[derive(Parser)]
#[command(name = "ngomate-tui")]
#[command(about = "NGO portal dashboard")]
#[command(version)]
pub struct Cli {
    /// Where donor and recipient records come from (sample, http, csv)
    #[arg(long, default_value = "sample")]
    pub source: String,

    /// Donor endpoint for the http source
    #[arg(long)]
    pub donors_endpoint: Option<String>,

    /// Recipient endpoint for the http source
    #[arg(long)]
    pub recipients_endpoint: Option<String>,

    /// CSV file with donor records for the csv source
    #[arg(long)]
    pub donors_csv: Option<String>,

    /// CSV file with recipient records for the csv source
    #[arg(long)]
    pub recipients_csv: Option<String>,
}

impl Cli {
    fn source_for(&self, view: RecordView) -> ngomate::errors::PortalResult<SupplierSource> {
        let (endpoint, csv) = match view {
            RecordView::Donors => (&self.donors_endpoint, &self.donors_csv),
            RecordView::Recipients => (&self.recipients_endpoint, &self.recipients_csv),
        };
        SupplierSource::parse(&self.source, endpoint.as_deref(), csv.as_deref())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "ngomate=info,ngomate_tui=info");
    }

    // Log to a file so the display is not disturbed
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dashboard::LOG_FILE)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting NGO portal dashboard...");

    let config = Config::from_env()?;
    config.validate()?;

    let donors = build_supplier(&config, RecordView::Donors, &cli.source_for(RecordView::Donors)?)?;
    let recipients = build_supplier(
        &config,
        RecordView::Recipients,
        &cli.source_for(RecordView::Recipients)?,
    )?;

    let mut app = App::with_suppliers(config, donors, recipients);

    match dashboard::run_in_terminal(&mut app).await {
        Ok(_) => {
            info!("Dashboard exited successfully");
        }
        Err(e) => {
            error!("Dashboard encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
