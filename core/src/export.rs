//! CSV export of product lists.
//!
//! Text columns are quoted (embedded quotes doubled), prices carry the
//! rupee sign, dates use the en-US `M/D/YYYY` form.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::types::Product;

pub const CSV_HEADERS: [&str; 11] = [
    "ID",
    "Name",
    "Category",
    "Price",
    "Stock",
    "Unit",
    "Certification Status",
    "Certification Expiry Date",
    "Supplier Name",
    "Supplier Email",
    "Created At",
];

pub fn products_to_csv(products: &[Product]) -> String {
    let mut lines = Vec::with_capacity(products.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    lines.extend(products.iter().map(product_row));
    lines.join("\n")
}

/// `greentrade_products_YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("greentrade_products_{}.csv", date.format("%Y-%m-%d"))
}

pub fn format_date(ts: NaiveDateTime) -> String {
    format!("{}/{}/{}", ts.month(), ts.day(), ts.year())
}

fn product_row(product: &Product) -> String {
    let supplier = product.supplier.as_ref();
    let fields = [
        product.id.to_string(),
        quote(&product.name),
        product.category.to_string(),
        quote(&format!("₹{}", product.price)),
        product.stock_quantity.to_string(),
        quote(&product.unit),
        product.certification_status.to_string(),
        product.certification_expiry_date.map(format_date).unwrap_or_default(),
        quote(supplier.map_or("", |s| s.name.as_str())),
        quote(supplier.map_or("", |s| s.email.as_str())),
        format_date(product.created_at),
    ];
    fields.join(",")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, CertificationStatus, Supplier};

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn product(name: &str) -> Product {
        Product {
            id: 12,
            supplier_id: 1,
            name: name.to_string(),
            category: Category::OrganicFood,
            price: 12.5,
            stock_quantity: 40,
            unit: "kg".to_string(),
            certification_status: CertificationStatus::Certified,
            certification_expiry_date: Some(ts(2026, 3, 9)),
            description: None,
            created_at: ts(2025, 11, 2),
            supplier: Some(Supplier {
                id: 1,
                name: "Green Co".to_string(),
                email: "hello@green.co".to_string(),
                country: "India".to_string(),
                contact_person: "Asha".to_string(),
                phone: "+91 555".to_string(),
                created_at: ts(2025, 1, 1),
                products: None,
            }),
        }
    }

    #[test]
    fn empty_list_is_header_only() {
        assert_eq!(
            products_to_csv(&[]),
            "ID,Name,Category,Price,Stock,Unit,Certification Status,Certification Expiry Date,Supplier Name,Supplier Email,Created At"
        );
    }

    #[test]
    fn row_uses_fixed_column_order() {
        let csv = products_to_csv(&[product("Wild honey")]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            r#"12,"Wild honey",Organic Food,"₹12.5",40,"kg",Certified,3/9/2026,"Green Co","hello@green.co",11/2/2025"#
        );
    }

    #[test]
    fn comma_in_name_stays_inside_quotes() {
        let csv = products_to_csv(&[product("Rice, brown")]);
        assert!(csv.lines().nth(1).unwrap().starts_with(r#"12,"Rice, brown",Organic Food"#));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = products_to_csv(&[product(r#"The "best" soap"#)]);
        assert!(csv.contains(r#""The ""best"" soap""#));
    }

    #[test]
    fn missing_optional_values_render_empty() {
        let mut p = product("Tote");
        p.certification_status = CertificationStatus::Pending;
        p.certification_expiry_date = None;
        p.supplier = None;
        p.price = 10.0;
        let csv = products_to_csv(&[p]);
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            r#"12,"Tote",Organic Food,"₹10",40,"kg",Pending,,"","",11/2/2025"#
        );
    }

    #[test]
    fn filename_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(export_filename(date), "greentrade_products_2026-01-05.csv");
    }
}
