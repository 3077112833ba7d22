//! Domain DTOs for the GreenTrade API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift between the two. Payloads returned by the server are passed
//! through untouched, the client only (de)serializes them.
//!
//! Write payloads (`NewSupplier`, `NewProduct`, `ProductUpdate`) carry a
//! `validate` method that the client runs before anything goes on the wire.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Product category, a closed set on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Organic Food")]
    OrganicFood,
    #[serde(rename = "Handmade")]
    Handmade,
    #[serde(rename = "Sustainable Goods")]
    SustainableGoods,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::OrganicFood,
        Category::Handmade,
        Category::SustainableGoods,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::OrganicFood => "Organic Food",
            Category::Handmade => "Handmade",
            Category::SustainableGoods => "Sustainable Goods",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ApiError::validation(format!("unknown category: {s}")))
    }
}

/// Certification status. Only `Certified` products carry an expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificationStatus {
    #[serde(rename = "Certified")]
    Certified,
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Not Certified")]
    NotCertified,
}

impl CertificationStatus {
    pub const ALL: [CertificationStatus; 3] = [
        CertificationStatus::Certified,
        CertificationStatus::Pending,
        CertificationStatus::NotCertified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CertificationStatus::Certified => "Certified",
            CertificationStatus::Pending => "Pending",
            CertificationStatus::NotCertified => "Not Certified",
        }
    }

    pub fn requires_expiry(self) -> bool {
        self == CertificationStatus::Certified
    }
}

impl fmt::Display for CertificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificationStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CertificationStatus::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ApiError::validation(format!("unknown certification status: {s}")))
    }
}

/// A supplier as returned by the API. `products` is only populated by the
/// single-supplier endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub country: String,
    pub contact_person: String,
    pub phone: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

/// A product as returned by the API. The list endpoint embeds the owning
/// supplier; the other endpoints leave `supplier` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub supplier_id: i64,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub stock_quantity: u32,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub certification_status: CertificationStatus,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub certification_expiry_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Supplier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationCount {
    pub certification_status: String,
    pub count: u64,
}

/// Server-computed aggregate counts behind the dashboard charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_suppliers: u64,
    pub total_products: u64,
    pub products_by_category: Vec<CategoryCount>,
    pub products_by_certification: Vec<CertificationCount>,
}

/// Request payload for creating a supplier. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub email: String,
    pub country: String,
    pub contact_person: String,
    pub phone: String,
}

impl NewSupplier {
    pub fn validate(&self) -> Result<(), ApiError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("country", &self.country),
            ("contact_person", &self.contact_person),
            ("phone", &self.phone),
        ];
        for (field, value) in fields {
            require_non_empty(field, value)?;
        }
        Ok(())
    }
}

/// Request payload for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub supplier_id: i64,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub stock_quantity: u32,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub certification_status: CertificationStatus,
    pub certification_expiry_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("name", &self.name)?;
        require_price(self.price)?;
        match (
            self.certification_status.requires_expiry(),
            self.certification_expiry_date.is_some(),
        ) {
            (true, false) => Err(ApiError::validation(
                "certification_expiry_date is required for certified products",
            )),
            (false, true) => Err(ApiError::validation(
                "certification_expiry_date is only allowed for certified products",
            )),
            _ => Ok(()),
        }
    }
}

/// Request payload for a partial product update. Only the fields that are
/// set are sent; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_status: Option<CertificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_expiry_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(price) = self.price {
            require_price(price)?;
        }
        match (self.certification_status, self.certification_expiry_date) {
            (Some(status), None) if status.requires_expiry() => Err(ApiError::validation(
                "certification_expiry_date is required for certified products",
            )),
            (Some(status), Some(_)) if !status.requires_expiry() => Err(ApiError::validation(
                "certification_expiry_date is only allowed for certified products",
            )),
            _ => Ok(()),
        }
    }

    /// True when the update moves the product to a status without an
    /// expiry, so the stored date must be cleared.
    pub fn clears_expiry(&self) -> bool {
        self.certification_status
            .is_some_and(|status| !status.requires_expiry())
    }
}

/// Optional filters for the product list. Unset fields are omitted from
/// the query string rather than sent empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub certification_status: Option<CertificationStatus>,
}

impl ProductFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.as_str()));
        }
        if let Some(status) = self.certification_status {
            pairs.push(("certification_status", status.as_str()));
        }
        pairs
    }
}

fn default_unit() -> String {
    "pcs".to_string()
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price < 0.01 {
        return Err(ApiError::validation("price must be at least 0.01"));
    }
    Ok(())
}

/// Lenient timestamp decoding: RFC 3339 (normalized to UTC), the backend's
/// naive ISO 8601 date-times, or bare dates at midnight.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{Deserialize, Deserializer};

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn expiry() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 12, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn new_product() -> NewProduct {
        NewProduct {
            supplier_id: 1,
            name: "Jute bag".to_string(),
            category: Category::Handmade,
            price: 4.5,
            stock_quantity: 10,
            unit: "pcs".to_string(),
            certification_status: CertificationStatus::Pending,
            certification_expiry_date: None,
            description: None,
        }
    }

    #[test]
    fn enums_use_display_names_on_the_wire() {
        assert_eq!(
            serde_json::to_value(Category::OrganicFood).unwrap(),
            "Organic Food"
        );
        assert_eq!(
            serde_json::to_value(CertificationStatus::NotCertified).unwrap(),
            "Not Certified"
        );
        let status: CertificationStatus = serde_json::from_str(r#""Pending""#).unwrap();
        assert_eq!(status, CertificationStatus::Pending);
    }

    #[test]
    fn category_from_str_rejects_unknown_values() {
        assert_eq!("Handmade".parse::<Category>().unwrap(), Category::Handmade);
        let err = "Plastic".parse::<Category>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn product_decodes_backend_shape() {
        let raw = r#"{
            "id": 3, "supplier_id": 1, "name": "Honey", "category": "Organic Food",
            "price": 12.5, "stock_quantity": 40, "unit": "jar",
            "certification_status": "Certified",
            "certification_expiry_date": "2026-12-31T00:00:00",
            "description": null, "created_at": "2025-01-02T03:04:05.678901"
        }"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.category, Category::OrganicFood);
        assert_eq!(product.certification_expiry_date, Some(expiry()));
        assert!(product.supplier.is_none());
    }

    #[test]
    fn product_unit_defaults_to_pcs() {
        let raw = r#"{
            "id": 3, "supplier_id": 1, "name": "Soap", "category": "Handmade",
            "price": 3, "stock_quantity": 0, "certification_status": "Pending",
            "created_at": "2025-01-02T03:04:05"
        }"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.unit, "pcs");
        assert!(product.certification_expiry_date.is_none());
    }

    #[test]
    fn timestamps_accept_offsets_and_bare_dates() {
        assert_eq!(timestamp::parse("2026-12-31T02:00:00+02:00"), Some(expiry()));
        assert_eq!(timestamp::parse("2026-12-31"), Some(expiry()));
        assert_eq!(timestamp::parse("31/12/2026"), None);
    }

    #[test]
    fn new_supplier_requires_every_field() {
        let supplier = NewSupplier {
            name: "Green Co".to_string(),
            email: "hello@green.co".to_string(),
            country: "India".to_string(),
            contact_person: "  ".to_string(),
            phone: "+91 555".to_string(),
        };
        let err = supplier.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "contact_person must not be empty");
    }

    #[test]
    fn new_product_enforces_expiry_invariant() {
        assert!(new_product().validate().is_ok());

        let mut certified = new_product();
        certified.certification_status = CertificationStatus::Certified;
        assert!(certified.validate().is_err());
        certified.certification_expiry_date = Some(expiry());
        assert!(certified.validate().is_ok());

        let mut pending_with_date = new_product();
        pending_with_date.certification_expiry_date = Some(expiry());
        assert!(pending_with_date.validate().is_err());
    }

    #[test]
    fn new_product_rejects_sub_cent_price() {
        let mut product = new_product();
        product.price = 0.0;
        assert_eq!(product.validate().unwrap_err().message(), "price must be at least 0.01");
        product.price = f64::NAN;
        assert!(product.validate().is_err());
    }

    #[test]
    fn product_update_skips_unset_fields() {
        let update = ProductUpdate {
            stock_quantity: Some(7),
            ..ProductUpdate::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({ "stock_quantity": 7 }));
    }

    #[test]
    fn product_update_clears_expiry_when_leaving_certified() {
        let update = ProductUpdate {
            certification_status: Some(CertificationStatus::Pending),
            ..ProductUpdate::default()
        };
        assert!(update.validate().is_ok());
        assert!(update.clears_expiry());
        assert!(!ProductUpdate::default().clears_expiry());
    }

    #[test]
    fn filter_omits_unset_fields() {
        assert!(ProductFilter::default().query_pairs().is_empty());
        let filter = ProductFilter {
            category: Some(Category::Handmade),
            certification_status: None,
        };
        assert_eq!(filter.query_pairs(), vec![("category", "Handmade")]);
    }
}
