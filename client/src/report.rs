//! Dashboard snapshot: the data behind the charts plus a CSV export.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use greentrade_core::analytics::{self, CategoryBar, CertificationSlice};
use greentrade_core::export;
use greentrade_core::{AnalyticsSummary, ApiError, ConfigError, ProductFilter};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::transport::Transport;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Report {
    pub summary: AnalyticsSummary,
    pub supplier_count: usize,
    pub categories: Vec<CategoryBar>,
    pub certification: Vec<CertificationSlice>,
    pub certified_share: f64,
    pub csv_path: PathBuf,
    pub exported_products: usize,
}

/// Loads summary, suppliers and products concurrently, then writes the
/// product export for `today` into `dir`.
#[instrument(skip(client))]
pub async fn build_report<T: Transport>(
    client: &ApiClient<T>,
    filter: &ProductFilter,
    dir: &Path,
    today: NaiveDate,
) -> Result<Report, ReportError> {
    let (summary, suppliers, products) = tokio::join!(
        client.fetch_analytics_summary(),
        client.list_suppliers(),
        client.list_products(filter),
    );
    let (summary, suppliers, products) = (summary?, suppliers?, products?);

    let csv_path = dir.join(export::export_filename(today));
    tokio::fs::write(&csv_path, export::products_to_csv(&products))
        .await
        .map_err(|source| ReportError::Write {
            path: csv_path.clone(),
            source,
        })?;
    info!(path = %csv_path.display(), products = products.len(), "export written");

    Ok(Report {
        categories: analytics::category_chart(&summary),
        certification: analytics::certification_chart(&summary),
        certified_share: analytics::certified_share(&summary),
        supplier_count: suppliers.len(),
        exported_products: products.len(),
        summary,
        csv_path,
    })
}
