use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use nexstock::core::{DashboardError, RecordId};
use nexstock::domain::{CustomerStatus, OrderStatus};
use nexstock::{
    ApiClient, ClientConfig, Customer, Dashboard, FetchStatus, LoadOutcome, Order, Product,
    ProductDraft, ProductStatus, RecordSource, ViewConfig,
};
use serde_json::json;

// ============================================================================
// Test backend
// ============================================================================

#[derive(Clone)]
struct Backend {
    products: Arc<Mutex<Vec<Product>>>,
    next_id: Arc<AtomicI64>,
}

impl Backend {
    fn seeded() -> Self {
        let products = (1..=8)
            .map(|id| Product {
                id: RecordId::Number(id),
                name: format!("Item {id}"),
                category: "Electronics".to_string(),
                stock: id * 2,
                price: id as f64 * 9.5,
                status: ProductStatus::InStock,
                last_updated: Some("2024-05-01".to_string()),
            })
            .collect();
        Self {
            products: Arc::new(Mutex::new(products)),
            next_id: Arc::new(AtomicI64::new(9)),
        }
    }
}

fn from_draft(id: i64, draft: ProductDraft) -> Product {
    Product {
        id: RecordId::Number(id),
        name: draft.name,
        category: draft.category,
        stock: draft.stock,
        price: draft.price,
        status: draft.status,
        last_updated: None,
    }
}

async fn list_products(State(backend): State<Backend>) -> Json<Vec<Product>> {
    Json(backend.products.lock().unwrap().clone())
}

async fn create_product(
    State(backend): State<Backend>,
    Json(draft): Json<ProductDraft>,
) -> (StatusCode, Json<Product>) {
    let id = backend.next_id.fetch_add(1, Ordering::SeqCst);
    let product = from_draft(id, draft);
    backend.products.lock().unwrap().push(product.clone());
    (StatusCode::CREATED, Json(product))
}

async fn update_product(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, StatusCode> {
    let mut products = backend.products.lock().unwrap();
    let slot = products
        .iter_mut()
        .find(|p| p.id == RecordId::Number(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = from_draft(id, draft);
    Ok(Json(slot.clone()))
}

async fn delete_product(State(backend): State<Backend>, Path(id): Path<i64>) -> StatusCode {
    let mut products = backend.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p.id != RecordId::Number(id));
    if products.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn list_orders() -> Json<serde_json::Value> {
    Json(json!([
        {
            "id": "ORD-1001",
            "customerName": "Ada Lovelace",
            "orderDate": "2024-03-02T10:15:00Z",
            "totalAmount": 1234.5,
            "status": "Shipped"
        },
        {
            "id": 1002,
            "customerName": "Alan Turing",
            "orderDate": "2024-03-05",
            "totalAmount": 80,
            "status": "Pending"
        }
    ]))
}

async fn list_customers() -> Json<serde_json::Value> {
    Json(json!([
        {
            "id": 1,
            "name": "Grace Hopper",
            "email": "grace@navy.mil",
            "totalSpent": 420.0,
            "status": "Active",
            "joinDate": "2023-11-20"
        },
        {
            "id": 2,
            "name": "Edsger Dijkstra",
            "email": "ewd@utexas.edu",
            "phone": "+1 512 555 0199",
            "totalSpent": 0,
            "status": "Blocked",
            "joinDate": "2024-01-08"
        }
    ]))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::OK, "not json")
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/orders", get(list_orders))
        .route("/customers", get(list_customers))
        .route("/broken/products", get(broken))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&ClientConfig::new(base_url)).unwrap()
}

// ============================================================================
// RestSource
// ============================================================================

#[tokio::test]
async fn test_fetch_products() {
    let url = spawn_backend(Backend::seeded()).await;
    let products = client(&url).source::<Product>().fetch_all().await.unwrap();

    assert_eq!(products.len(), 8);
    assert_eq!(products[2].name, "Item 3");
    assert_eq!(products[2].last_updated.as_deref(), Some("2024-05-01"));
}

#[tokio::test]
async fn test_create_update_delete_round_trip() {
    let backend = Backend::seeded();
    let url = spawn_backend(backend.clone()).await;
    let source = client(&url).source::<Product>();

    let draft = ProductDraft::new("Dock", "Electronics", 129.99, 3, ProductStatus::LowStock);
    let created = source.create(&draft).await.unwrap();
    assert_eq!(created.id, RecordId::Number(9));
    assert_eq!(created.status, ProductStatus::LowStock);

    let mut draft = ProductDraft::from_product(&created);
    draft.stock = 0;
    draft.status = ProductStatus::OutOfStock;
    let updated = source.update(&created.id, &draft).await.unwrap();
    assert_eq!(updated.stock, 0);

    source.delete(&created.id).await.unwrap();
    assert_eq!(backend.products.lock().unwrap().len(), 8);
}

#[tokio::test]
async fn test_missing_record_maps_to_http_error() {
    let url = spawn_backend(Backend::seeded()).await;
    let source = client(&url).source::<Product>();

    let err = source.delete(&RecordId::Number(404)).await.unwrap_err();
    assert!(matches!(err, DashboardError::Http { status: 404, .. }), "{err:?}");
}

#[tokio::test]
async fn test_bad_body_maps_to_decode_error() {
    let url = spawn_backend(Backend::seeded()).await;
    let source = client(&format!("{url}/broken")).source::<Product>();

    let err = source.fetch_all().await.unwrap_err();
    assert!(matches!(err, DashboardError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn test_unreachable_backend_maps_to_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url).source::<Product>().fetch_all().await.unwrap_err();
    assert!(matches!(err, DashboardError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn test_orders_and_customers_decode() {
    let url = spawn_backend(Backend::seeded()).await;
    let api = client(&url);

    let orders = api.source::<Order>().fetch_all().await.unwrap();
    assert_eq!(orders[0].id, RecordId::from("ORD-1001"));
    assert_eq!(orders[1].id, RecordId::Number(1002));
    assert_eq!(orders[0].status, OrderStatus::Shipped);

    let customers = api.source::<Customer>().fetch_all().await.unwrap();
    assert_eq!(customers[0].phone, "");
    assert_eq!(customers[0].status, CustomerStatus::Active);
}

#[tokio::test]
async fn test_customer_view_loads_rows_with_unexpected_status() {
    let url = spawn_backend(Backend::seeded()).await;
    let dashboard = Dashboard::connect(ClientConfig::new(&url), ViewConfig::default()).unwrap();
    let view = dashboard.view::<Customer>();

    assert_eq!(view.load().await.unwrap(), LoadOutcome::Applied(2));
    assert_eq!(view.fetch_status().unwrap(), FetchStatus::Success);

    let customers = view.collection().unwrap();
    assert_eq!(customers[1].name, "Edsger Dijkstra");
    assert_eq!(customers[1].status, CustomerStatus::Inactive);

    let table = view.derived_page().unwrap().render_table(view.columns());
    assert!(table.lines().any(|l| l.contains("ewd@utexas.edu") && l.contains("Inactive")), "{table}");
}

#[tokio::test]
async fn test_read_only_source_refuses_delete() {
    let url = spawn_backend(Backend::seeded()).await;
    let err = client(&url)
        .source::<Order>()
        .delete(&RecordId::Number(1002))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::UnsupportedOperation(_)));
}

// ============================================================================
// Dashboard end to end
// ============================================================================

#[tokio::test]
async fn test_view_delete_then_reload_against_http_backend() {
    let backend = Backend::seeded();
    let url = spawn_backend(backend.clone()).await;
    let dashboard = Dashboard::connect(ClientConfig::new(&url), ViewConfig::default().page_size(5))
        .unwrap();
    let view = dashboard.view::<Product>();

    view.load().await.unwrap();
    assert_eq!(view.derived_page().unwrap().page_count, 2);

    view.delete(RecordId::Number(7)).await.unwrap();
    assert_eq!(view.collection_len().unwrap(), 7);
    assert!(view.collection().unwrap().iter().all(|p| p.id != RecordId::Number(7)));

    view.set_sort("price").unwrap();
    view.set_sort("price").unwrap();
    let page = view.derived_page().unwrap();
    assert_eq!(page.rows[0].name, "Item 8");
    assert_eq!(page.summary(), "Page 1 of 2 (7 rows)");
}

#[tokio::test]
async fn test_order_table_renders_money_and_dates() {
    let url = spawn_backend(Backend::seeded()).await;
    let dashboard = Dashboard::connect(ClientConfig::new(&url), ViewConfig::default()).unwrap();
    let view = dashboard.view::<Order>();
    view.load().await.unwrap();
    view.set_sort("orderDate").unwrap();
    view.set_sort("orderDate").unwrap();

    let table = view.derived_page().unwrap().render_table(view.columns());
    let lines: Vec<&str> = table.lines().collect();
    assert!(lines[2].starts_with("#1002"), "{table}");
    assert!(lines[3].contains("$1,234.50"), "{table}");
    assert!(lines[3].contains("2024-03-02"), "{table}");
}
