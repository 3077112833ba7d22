//! In-memory stand-in for the GreenTrade REST backend.
//!
//! Mirrors the consumed surface closely enough for end-to-end tests:
//! integer ids, `{"detail": ...}` error bodies, 422 with a structured
//! detail list on invalid bodies, 204 on delete.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const CATEGORIES: [&str; 3] = ["Organic Food", "Handmade", "Sustainable Goods"];
pub const CERTIFICATION_STATUSES: [&str; 3] = ["Certified", "Pending", "Not Certified"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub country: String,
    pub contact_person: String,
    pub phone: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SupplierWithProducts {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub supplier_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock_quantity: i64,
    pub unit: String,
    pub certification_status: String,
    pub certification_expiry_date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductWithSupplier {
    #[serde(flatten)]
    pub product: Product,
    pub supplier: Supplier,
}

#[derive(Deserialize)]
pub struct CreateSupplier {
    pub name: String,
    pub email: String,
    pub country: String,
    pub contact_person: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct CreateProduct {
    pub supplier_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock_quantity: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub certification_status: String,
    #[serde(default)]
    pub certification_expiry_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `certification_expiry_date` distinguishes "absent" from explicit `null`.
#[derive(Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub unit: Option<String>,
    pub certification_status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub certification_expiry_date: Option<Option<NaiveDateTime>>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub certification_status: Option<String>,
}

#[derive(Default)]
pub struct Store {
    suppliers: BTreeMap<i64, Supplier>,
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/health", get(health))
        .route("/api/analytics/summary", get(analytics_summary))
        .route("/api/suppliers/", get(list_suppliers).post(create_supplier))
        .route("/api/suppliers/{id}", get(get_supplier))
        .route("/api/products/", get(list_products).post(create_product))
        .route("/api/products/{id}", put(update_product).delete(delete_product))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn analytics_summary(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let by_category: Vec<Value> = count_by(&store.products, &CATEGORIES, category_of)
        .into_iter()
        .map(|(category, count)| json!({ "category": category, "count": count }))
        .collect();
    let by_certification: Vec<Value> = count_by(&store.products, &CERTIFICATION_STATUSES, status_of)
        .into_iter()
        .map(|(status, count)| json!({ "certification_status": status, "count": count }))
        .collect();
    Json(json!({
        "total_suppliers": store.suppliers.len(),
        "total_products": store.products.len(),
        "products_by_category": by_category,
        "products_by_certification": by_certification,
    }))
}

async fn list_suppliers(State(db): State<Db>) -> Json<Vec<Supplier>> {
    let store = db.read().await;
    Json(store.suppliers.values().cloned().collect())
}

async fn get_supplier(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<SupplierWithProducts>> {
    let store = db.read().await;
    let supplier = store
        .suppliers
        .get(&id)
        .cloned()
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Supplier not found"))?;
    let products = store.products.values().filter(|p| p.supplier_id == id).cloned().collect();
    Ok(Json(SupplierWithProducts { supplier, products }))
}

async fn create_supplier(
    State(db): State<Db>,
    input: Result<Json<CreateSupplier>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let Json(input) = input.map_err(rejected)?;
    let mut errors = Vec::new();
    for (field, value) in [
        ("name", &input.name),
        ("email", &input.email),
        ("country", &input.country),
        ("contact_person", &input.contact_person),
        ("phone", &input.phone),
    ] {
        if value.trim().is_empty() {
            errors.push(field_error(field, "String should have at least 1 character"));
        }
    }
    if !input.email.contains('@') {
        errors.push(field_error("email", "value is not a valid email address"));
    }
    if !errors.is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))));
    }

    let mut store = db.write().await;
    if store.suppliers.values().any(|s| s.email == input.email) {
        return Err(detail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let supplier = Supplier {
        id: store.next_id(),
        name: input.name,
        email: input.email,
        country: input.country,
        contact_person: input.contact_person,
        phone: input.phone,
        created_at: Utc::now().naive_utc(),
    };
    store.suppliers.insert(supplier.id, supplier.clone());
    Ok((StatusCode::CREATED, Json(supplier)))
}

async fn list_products(
    State(db): State<Db>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Vec<ProductWithSupplier>>> {
    let store = db.read().await;
    let category = query.category.filter(|c| !c.is_empty());
    let status = query.certification_status.filter(|s| !s.is_empty());
    let mut products = Vec::new();
    for product in store.products.values() {
        if category.as_ref().is_some_and(|c| *c != product.category)
            || status.as_ref().is_some_and(|s| *s != product.certification_status)
        {
            continue;
        }
        let supplier = store
            .suppliers
            .get(&product.supplier_id)
            .cloned()
            .ok_or_else(|| detail(StatusCode::INTERNAL_SERVER_ERROR, "Dangling supplier reference"))?;
        products.push(ProductWithSupplier {
            product: product.clone(),
            supplier,
        });
    }
    Ok(Json(products))
}

async fn create_product(
    State(db): State<Db>,
    input: Result<Json<CreateProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = input.map_err(rejected)?;
    let mut errors = Vec::new();
    check_product_fields(
        &mut errors,
        Some(&input.name),
        Some(&input.category),
        Some(input.price),
        Some(input.stock_quantity),
        Some(&input.certification_status),
    );
    if !errors.is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))));
    }

    let mut store = db.write().await;
    if !store.suppliers.contains_key(&input.supplier_id) {
        return Err(detail(StatusCode::NOT_FOUND, "Supplier not found"));
    }
    let product = Product {
        id: store.next_id(),
        supplier_id: input.supplier_id,
        name: input.name,
        category: input.category,
        price: input.price,
        stock_quantity: input.stock_quantity,
        unit: input.unit,
        certification_status: input.certification_status,
        certification_expiry_date: input.certification_expiry_date,
        description: input.description,
        created_at: Utc::now().naive_utc(),
    };
    store.products.insert(product.id, product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
    input: Result<Json<UpdateProduct>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(input) = input.map_err(rejected)?;
    let mut errors = Vec::new();
    check_product_fields(
        &mut errors,
        input.name.as_ref(),
        input.category.as_ref(),
        input.price,
        input.stock_quantity,
        input.certification_status.as_ref(),
    );
    if !errors.is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))));
    }

    let mut store = db.write().await;
    let product = store
        .products
        .get_mut(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Product not found"))?;
    if let Some(name) = input.name {
        product.name = name;
    }
    if let Some(category) = input.category {
        product.category = category;
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(stock) = input.stock_quantity {
        product.stock_quantity = stock;
    }
    if let Some(unit) = input.unit {
        product.unit = unit;
    }
    if let Some(status) = input.certification_status {
        product.certification_status = status;
    }
    if let Some(expiry) = input.certification_expiry_date {
        product.certification_expiry_date = expiry;
    }
    if let Some(description) = input.description {
        product.description = Some(description);
    }
    Ok(Json(product.clone()))
}

async fn delete_product(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .products
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Product not found"))
}

fn category_of(product: &Product) -> &str {
    &product.category
}

fn status_of(product: &Product) -> &str {
    &product.certification_status
}

/// Non-zero counts per value, in `values` order.
fn count_by(products: &BTreeMap<i64, Product>, values: &[&str], field: fn(&Product) -> &str) -> Vec<(String, usize)> {
    values
        .iter()
        .map(|v| (v.to_string(), products.values().filter(|p| field(p) == *v).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

fn check_product_fields(
    errors: &mut Vec<Value>,
    name: Option<&String>,
    category: Option<&String>,
    price: Option<f64>,
    stock_quantity: Option<i64>,
    certification_status: Option<&String>,
) {
    if name.is_some_and(|n| n.trim().is_empty()) {
        errors.push(field_error("name", "String should have at least 1 character"));
    }
    if category.is_some_and(|c| !CATEGORIES.contains(&c.as_str())) {
        errors.push(field_error("category", "Input should be 'Organic Food', 'Handmade' or 'Sustainable Goods'"));
    }
    if price.is_some_and(|p| p <= 0.0) {
        errors.push(field_error("price", "Input should be greater than 0"));
    }
    if stock_quantity.is_some_and(|s| s < 0) {
        errors.push(field_error("stock_quantity", "Input should be greater than or equal to 0"));
    }
    if certification_status.is_some_and(|s| !CERTIFICATION_STATUSES.contains(&s.as_str())) {
        errors.push(field_error(
            "certification_status",
            "Input should be 'Certified', 'Pending' or 'Not Certified'",
        ));
    }
}

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

fn field_error(field: &str, msg: &str) -> Value {
    json!({ "loc": ["body", field], "msg": msg, "type": "value_error" })
}

fn rejected(rejection: JsonRejection) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{ "loc": ["body"], "msg": rejection.body_text(), "type": "json_invalid" }]
        })),
    )
}

fn default_unit() -> String {
    "pcs".to_string()
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplier_with_products_flattens() {
        let supplier = Supplier {
            id: 1,
            name: "Green Co".to_string(),
            email: "hello@green.co".to_string(),
            country: "India".to_string(),
            contact_person: "Asha".to_string(),
            phone: "+91 555".to_string(),
            created_at: NaiveDateTime::default(),
        };
        let json = serde_json::to_value(SupplierWithProducts {
            supplier,
            products: Vec::new(),
        })
        .unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["products"], json!([]));
    }

    #[test]
    fn create_product_defaults_unit() {
        let input: CreateProduct = serde_json::from_str(
            r#"{"supplier_id":1,"name":"Soap","category":"Handmade","price":2.5,
                "stock_quantity":3,"certification_status":"Pending"}"#,
        )
        .unwrap();
        assert_eq!(input.unit, "pcs");
        assert!(input.certification_expiry_date.is_none());
    }

    #[test]
    fn update_product_distinguishes_null_from_absent() {
        let absent: UpdateProduct = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.certification_expiry_date.is_none());

        let cleared: UpdateProduct = serde_json::from_str(r#"{"certification_expiry_date":null}"#).unwrap();
        assert_eq!(cleared.certification_expiry_date, Some(None));
    }

    #[test]
    fn field_checks_collect_every_problem() {
        let mut errors = Vec::new();
        check_product_fields(
            &mut errors,
            Some(&String::new()),
            Some(&"Plastic".to_string()),
            Some(0.0),
            Some(-1),
            None,
        );
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0]["loc"], json!(["body", "name"]));
    }
}
