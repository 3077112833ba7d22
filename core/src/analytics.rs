//! Chart-ready series derived from the analytics summary.
//!
//! The counts come from the server; nothing here re-aggregates products.

use crate::types::{AnalyticsSummary, CertificationStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBar {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationSlice {
    pub status: CertificationStatus,
    pub count: u64,
    pub color: &'static str,
}

pub fn status_color(status: CertificationStatus) -> &'static str {
    match status {
        CertificationStatus::Certified => "#22C55E",
        CertificationStatus::Pending => "#F59E0B",
        CertificationStatus::NotCertified => "#EF4444",
    }
}

/// Bar series in the order the server reported the categories.
pub fn category_chart(summary: &AnalyticsSummary) -> Vec<CategoryBar> {
    summary
        .products_by_category
        .iter()
        .map(|c| CategoryBar {
            category: c.category.clone(),
            count: c.count,
        })
        .collect()
}

/// Count for one status; statuses absent from the summary count as zero.
pub fn certification_count(summary: &AnalyticsSummary, status: CertificationStatus) -> u64 {
    summary
        .products_by_certification
        .iter()
        .find(|c| c.certification_status == status.as_str())
        .map_or(0, |c| c.count)
}

/// Pie slices in fixed status order, empty slices dropped.
pub fn certification_chart(summary: &AnalyticsSummary) -> Vec<CertificationSlice> {
    CertificationStatus::ALL
        .into_iter()
        .map(|status| CertificationSlice {
            status,
            count: certification_count(summary, status),
            color: status_color(status),
        })
        .filter(|slice| slice.count > 0)
        .collect()
}

/// Fraction of products that are certified, in `[0, 1]`.
pub fn certified_share(summary: &AnalyticsSummary) -> f64 {
    if summary.total_products == 0 {
        return 0.0;
    }
    let certified = certification_count(summary, CertificationStatus::Certified);
    (certified as f64 / summary.total_products as f64).min(1.0)
}
