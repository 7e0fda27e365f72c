//! In-process router tests over an in-memory inventory backend

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use stockroom_server::{
    api,
    backend::{BackendError, InventoryBackend},
    config::AppConfig,
    models::{
        loan::{NewLoan, ReturnSubmission},
        Loan, LoanItem, LoanStatus, Product, ProductSearch, Worker,
    },
    services::Services,
    AppState,
};

#[derive(Default)]
struct MemoryBackend {
    workers: Vec<Worker>,
    products: Vec<Product>,
    loans: Mutex<Vec<Loan>>,
    reject_returns: bool,
    offline: bool,
}

impl MemoryBackend {
    fn seeded() -> Self {
        Self {
            workers: vec![
                worker(1, "José Pérez", true),
                worker(2, "Luis Vega", false),
            ],
            products: vec![product(10, "Casco", 2), product(11, "Guantes", 40)],
            ..Default::default()
        }
    }

    fn online(&self) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn not_found(what: &str) -> BackendError {
        BackendError::Rejected {
            status: 404,
            message: format!("{} no encontrado", what),
        }
    }
}

#[async_trait]
impl InventoryBackend for MemoryBackend {
    async fn list_workers(&self, active: Option<bool>) -> Result<Vec<Worker>, BackendError> {
        self.online()?;
        Ok(self
            .workers
            .iter()
            .filter(|w| active.map_or(true, |a| w.active == a))
            .cloned()
            .collect())
    }

    async fn get_worker(&self, id: i32) -> Result<Worker, BackendError> {
        self.online()?;
        self.workers
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Trabajador"))
    }

    async fn list_products(&self, _search: &ProductSearch) -> Result<Vec<Product>, BackendError> {
        self.online()?;
        Ok(self.products.clone())
    }

    async fn get_product(&self, id: i32) -> Result<Product, BackendError> {
        self.online()?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Producto"))
    }

    async fn list_loans(&self, statuses: &[LoanStatus]) -> Result<Vec<Loan>, BackendError> {
        self.online()?;
        let loans = self.loans.lock().unwrap();
        Ok(loans
            .iter()
            .filter(|l| statuses.contains(&l.status))
            .cloned()
            .collect())
    }

    async fn get_loan(&self, id: i32) -> Result<Loan, BackendError> {
        self.online()?;
        let loans = self.loans.lock().unwrap();
        loans
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Prestamo"))
    }

    async fn create_loan(&self, new_loan: &NewLoan) -> Result<Loan, BackendError> {
        self.online()?;
        let mut loans = self.loans.lock().unwrap();
        let id = loans.len() as i32 + 1;
        let loan = Loan {
            id,
            worker_id: new_loan.worker_id,
            created_at: Utc::now(),
            completed_at: None,
            status: new_loan.status,
            notes: new_loan.notes.clone(),
            items: new_loan
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| LoanItem {
                    id: id * 100 + i as i32,
                    name: item.name.clone(),
                    product_id: item.product_id,
                    quantity_borrowed: item.quantity_borrowed,
                    quantity_returned_total: 0,
                    detail_note: item.detail_note.clone(),
                })
                .collect(),
            worker: None,
        };
        loans.push(loan.clone());
        Ok(loan)
    }

    async fn submit_return(
        &self,
        loan_id: i32,
        submission: &ReturnSubmission,
    ) -> Result<(), BackendError> {
        self.online()?;
        if self.reject_returns {
            return Err(BackendError::Rejected {
                status: 400,
                message: "Error al registrar la devolucion".to_string(),
            });
        }

        let mut loans = self.loans.lock().unwrap();
        let loan = loans
            .iter_mut()
            .find(|l| l.id == loan_id)
            .ok_or_else(|| Self::not_found("Prestamo"))?;
        for totals in &submission.items {
            if let Some(item) = loan.items.iter_mut().find(|i| i.id == totals.item_id) {
                item.quantity_returned_total = totals.quantity_returned_total;
            }
        }
        loan.status = submission.status;
        if submission.close_loan {
            loan.completed_at = Some(Utc::now());
        }
        Ok(())
    }
}

fn worker(id: i32, name: &str, active: bool) -> Worker {
    Worker {
        id,
        code: format!("T-{:03}", id),
        name: name.to_string(),
        active,
        registered_at: None,
    }
}

fn product(id: i32, name: &str, stock: i64) -> Product {
    Product {
        id,
        code: format!("P-{:03}", id),
        name: name.to_string(),
        quantity: Decimal::from(stock),
        unit_of_measure: "UNIDADES".to_string(),
        classification: "EPP".to_string(),
        subclassification: None,
        shelf_location: None,
        minimum_quantity: None,
        maximum_quantity: None,
        notes: None,
        registered_at: None,
    }
}

fn open_loan(id: i32, days_ago: i64, borrowed: i32) -> Loan {
    Loan {
        id,
        worker_id: 1,
        created_at: Utc::now() - Duration::days(days_ago),
        completed_at: None,
        status: LoanStatus::Pending,
        notes: None,
        items: vec![LoanItem {
            id: id * 100,
            name: "Guantes".to_string(),
            product_id: Some(11),
            quantity_borrowed: borrowed,
            quantity_returned_total: 0,
            detail_note: "Talla M".to_string(),
        }],
        worker: None,
    }
}

fn app(backend: MemoryBackend) -> Router {
    let config = AppConfig::default();
    let services = Services::new(Arc::new(backend), config.catalog.clone());
    api::create_router(AppState {
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = app(MemoryBackend::seeded());
    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_fails_when_backend_offline() {
    let app = app(MemoryBackend {
        offline: true,
        ..MemoryBackend::seeded()
    });
    let (status, body) = send(&app, "GET", "/api/v1/ready", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "BackendUnavailable");
}

#[tokio::test]
async fn test_workers_hide_inactive_by_default() {
    let app = app(MemoryBackend::seeded());

    let (_, body) = send(&app, "GET", "/api/v1/workers", None).await;
    assert_eq!(body["total"], 1);

    let (_, body) = send(&app, "GET", "/api/v1/workers?include_inactive=true", None).await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_create_loan_above_stock_is_rejected() {
    let app = app(MemoryBackend::seeded());
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({
            "worker_id": 1,
            "items": [
                { "product_id": 10, "quantity": 1 },
                { "product_id": 10, "quantity": 2 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InsufficientStock");
    assert_eq!(body["message"], "Not enough stock for Casco. Available quantity: 2");
}

#[tokio::test]
async fn test_create_loan_for_inactive_worker_is_rejected() {
    let app = app(MemoryBackend::seeded());
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({ "worker_id": 2, "items": [{ "product_id": 11, "quantity": 1 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "WorkerInactive");
}

#[tokio::test]
async fn test_freeform_line_without_name_is_rejected() {
    let app = app(MemoryBackend::seeded());
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({ "worker_id": 1, "items": [{ "name": "  ", "quantity": 1 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MissingItemName");
    assert_eq!(body["code"], 15);
}

#[tokio::test]
async fn test_loan_lifecycle_with_partial_returns() {
    let app = app(MemoryBackend::seeded());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({
            "worker_id": 1,
            "items": [{ "product_id": 11, "quantity": 10, "detail_note": "Talla M" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["loan"]["status"], "pending");
    let loan_id = body["loan"]["id"].as_i64().unwrap();
    let item_id = body["loan"]["items"][0]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/loans/{}/returns", loan_id);
    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "entries": [{ "item_id": item_id, "quantity_returned_now": 4, "returned_total_seen": 0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Return recorded");
    assert_eq!(body["loan"]["status"], "in_progress");
    assert_eq!(body["loan"]["items"][0]["remaining"], 6);

    // Resending the same return, built from the view before it was recorded
    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "entries": [{ "item_id": item_id, "quantity_returned_now": 4, "returned_total_seen": 0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "StaleLoan");

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "entries": [{ "item_id": item_id, "quantity_returned_now": 6, "returned_total_seen": 4 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Loan completed");
    assert_eq!(body["loan"]["status"], "completed");

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "entries": [{ "item_id": item_id, "quantity_returned_now": 1, "returned_total_seen": 10 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "LoanCompleted");
}

#[tokio::test]
async fn test_stale_return_is_conflict() {
    let backend = MemoryBackend::seeded();
    {
        let mut loan = open_loan(1, 0, 10);
        loan.items[0].quantity_returned_total = 4;
        loan.status = LoanStatus::InProgress;
        backend.loans.lock().unwrap().push(loan);
    }
    let app = app(backend);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans/1/returns",
        Some(json!({ "entries": [{ "item_id": 100, "quantity_returned_now": 2, "returned_total_seen": 0 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "StaleLoan");
}

#[tokio::test]
async fn test_return_without_seen_total_is_refused() {
    let backend = MemoryBackend::seeded();
    backend.loans.lock().unwrap().push(open_loan(1, 0, 10));
    let app = app(backend);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans/1/returns",
        Some(json!({ "entries": [{ "item_id": 100, "quantity_returned_now": 4 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, "GET", "/api/v1/loans/1", None).await;
    assert_eq!(body["items"][0]["quantity_returned_total"], 0);
}

#[tokio::test]
async fn test_huge_return_quantity_is_bad_request() {
    let backend = MemoryBackend::seeded();
    {
        let mut loan = open_loan(1, 0, 10);
        loan.items[0].quantity_returned_total = 4;
        loan.status = LoanStatus::InProgress;
        backend.loans.lock().unwrap().push(loan);
    }
    let app = app(backend);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans/1/returns",
        Some(json!({ "entries": [{ "item_id": 100, "quantity_returned_now": i32::MAX, "returned_total_seen": 4 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidReturnQuantity");

    let (_, body) = send(&app, "GET", "/api/v1/loans/1", None).await;
    assert_eq!(body["items"][0]["quantity_returned_total"], 4);
}

#[tokio::test]
async fn test_rejected_return_leaves_loan_unchanged() {
    let backend = MemoryBackend {
        reject_returns: true,
        ..MemoryBackend::seeded()
    };
    backend.loans.lock().unwrap().push(open_loan(1, 0, 10));
    let app = app(backend);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans/1/returns",
        Some(json!({ "entries": [{ "item_id": 100, "quantity_returned_now": 3, "returned_total_seen": 0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error al registrar la devolucion");

    let (status, body) = send(&app, "GET", "/api/v1/loans/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["items"][0]["quantity_returned_total"], 0);
}

#[tokio::test]
async fn test_open_loans_and_delinquency_report() {
    let backend = MemoryBackend::seeded();
    {
        let mut loans = backend.loans.lock().unwrap();
        loans.push(open_loan(1, 1, 3));
        loans.push(open_loan(2, 5, 2));
    }
    let app = app(backend);

    let (status, body) = send(&app, "GET", "/api/v1/loans/open", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["id"], 2);
    assert_eq!(body["items"][0]["status"], "overdue");
    assert_eq!(body["items"][1]["status"], "pending");

    let (status, body) = send(&app, "GET", "/api/v1/reports/delinquents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "José Pérez");
    assert_eq!(body[0]["total_pending"], 2);
}

#[tokio::test]
async fn test_unknown_loan_is_not_found() {
    let app = app(MemoryBackend::seeded());
    let (status, body) = send(&app, "GET", "/api/v1/loans/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Loan with id 42 not found");
}
