//! HTTP implementation of [`InventoryBackend`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    wire::{CreateLoanBody, LoanRecord, ProductRecord, ReturnBody, WireStatus, WorkerRecord},
    BackendError, InventoryBackend,
};
use crate::{
    config::BackendConfig,
    models::{
        loan::{NewLoan, ReturnSubmission},
        Loan, LoanStatus, Product, ProductSearch, Worker,
    },
};

/// REST client for the inventory backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into [`BackendError::Rejected`]
async fn checked(response: Response) -> Result<Response, BackendError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    Err(BackendError::Rejected {
        status,
        message: rejection_message(status, &body),
    })
}

/// Backend error text: `error.message`, then `message`, then a plain `error` string
pub(crate) fn rejection_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let text = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    };
    let from_json = parsed.as_ref().and_then(|v| {
        text(v.pointer("/error/message"))
            .or_else(|| text(v.get("message")))
            .or_else(|| text(v.get("error")))
    });

    from_json.unwrap_or_else(|| format!("Backend request failed with status {}", status))
}

#[async_trait]
impl InventoryBackend for HttpBackend {
    async fn list_workers(&self, active: Option<bool>) -> Result<Vec<Worker>, BackendError> {
        let mut request = self.http.get(self.url("/trabajadores"));
        if let Some(active) = active {
            request = request.query(&[("activo", active)]);
        }
        let records: Vec<WorkerRecord> = self.fetch(request).await?;
        Ok(records.into_iter().map(Worker::from).collect())
    }

    async fn get_worker(&self, id: i32) -> Result<Worker, BackendError> {
        let request = self.http.get(self.url(&format!("/trabajadores/{}", id)));
        let record: WorkerRecord = self.fetch(request).await?;
        Ok(record.into())
    }

    async fn list_products(&self, search: &ProductSearch) -> Result<Vec<Product>, BackendError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(term) = search.search.as_deref() {
            params.push(("busqueda", term));
        }
        if let Some(classification) = search.classification.as_deref() {
            params.push(("clasificacion", classification));
        }

        let request = self.http.get(self.url("/productos")).query(&params);
        let records: Vec<ProductRecord> = self.fetch(request).await?;
        Ok(records.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: i32) -> Result<Product, BackendError> {
        let request = self.http.get(self.url(&format!("/productos/{}", id)));
        let record: ProductRecord = self.fetch(request).await?;
        Ok(record.into())
    }

    async fn list_loans(&self, statuses: &[LoanStatus]) -> Result<Vec<Loan>, BackendError> {
        let estado = statuses
            .iter()
            .map(|s| WireStatus::from(*s).as_str())
            .collect::<Vec<_>>()
            .join(",");

        let request = self
            .http
            .get(self.url("/prestamos"))
            .query(&[("estado", estado.as_str()), ("incluirItems", "true")]);
        let records: Vec<LoanRecord> = self.fetch(request).await?;

        records.into_iter().map(Loan::try_from).collect()
    }

    async fn get_loan(&self, id: i32) -> Result<Loan, BackendError> {
        let request = self
            .http
            .get(self.url(&format!("/prestamos/{}", id)))
            .query(&[("incluirItems", "true")]);
        let record: LoanRecord = self.fetch(request).await?;
        Loan::try_from(record)
    }

    async fn create_loan(&self, loan: &NewLoan) -> Result<Loan, BackendError> {
        let request = self
            .http
            .post(self.url("/prestamos"))
            .json(&CreateLoanBody::from(loan));
        let record: LoanRecord = self.fetch(request).await?;
        Loan::try_from(record)
    }

    async fn submit_return(
        &self,
        loan_id: i32,
        submission: &ReturnSubmission,
    ) -> Result<(), BackendError> {
        let request = self
            .http
            .put(self.url(&format!("/prestamos/{}/devolucion", loan_id)))
            .json(&ReturnBody::from(submission));

        // The acknowledgment body is not needed, only the status
        checked(request.send().await?).await?;
        Ok(())
    }
}
