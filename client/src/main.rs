use std::path::PathBuf;
use std::process::ExitCode;

use greentrade_client::{build_report, setup_tracing, ApiClient, ReportError};
use greentrade_core::ProductFilter;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "report failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ReportError> {
    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let client = ApiClient::from_env()?;
    info!(base_url = client.base_url(), "loading dashboard");

    let today = chrono::Local::now().date_naive();
    let report = build_report(&client, &ProductFilter::default(), &dir, today).await?;

    info!(
        suppliers = report.summary.total_suppliers,
        products = report.summary.total_products,
        "totals"
    );
    for bar in &report.categories {
        info!(category = %bar.category, count = bar.count, "products by category");
    }
    for slice in &report.certification {
        info!(status = %slice.status, count = slice.count, color = slice.color, "products by certification");
    }
    info!(share = %format!("{:.1}%", report.certified_share * 100.0), "certified products");
    info!(path = %report.csv_path.display(), rows = report.exported_products, "csv export ready");
    Ok(())
}
