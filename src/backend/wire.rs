//! JSON shapes spoken by the inventory backend

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::BackendError;
use crate::models::{
    loan::{NewLoan, ReturnSubmission},
    Loan, LoanItem, LoanStatus, Product, Worker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_progreso")]
    InProgress,
    #[serde(rename = "completado")]
    Completed,
    #[serde(rename = "atrasado")]
    Overdue,
}

impl WireStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WireStatus::Pending => "pendiente",
            WireStatus::InProgress => "en_progreso",
            WireStatus::Completed => "completado",
            WireStatus::Overdue => "atrasado",
        }
    }
}

impl From<LoanStatus> for WireStatus {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Pending => WireStatus::Pending,
            LoanStatus::InProgress => WireStatus::InProgress,
            LoanStatus::Completed => WireStatus::Completed,
            LoanStatus::Overdue => WireStatus::Overdue,
        }
    }
}

impl From<WireStatus> for LoanStatus {
    fn from(status: WireStatus) -> Self {
        match status {
            WireStatus::Pending => LoanStatus::Pending,
            WireStatus::InProgress => LoanStatus::InProgress,
            WireStatus::Completed => LoanStatus::Completed,
            WireStatus::Overdue => LoanStatus::Overdue,
        }
    }
}

/// Accepts RFC 3339, naive date-times and plain dates
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", value))),
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerRecord {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
    #[serde(default = "default_true")]
    pub activo: bool,
    #[serde(rename = "fechaRegistro", default, deserialize_with = "lenient_timestamp")]
    pub fecha_registro: Option<DateTime<Utc>>,
}

impl From<WorkerRecord> for Worker {
    fn from(record: WorkerRecord) -> Self {
        Self {
            id: record.id,
            code: record.codigo,
            name: record.nombre,
            active: record.activo,
            registered_at: record.fecha_registro,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: i32,
    pub codigo: String,
    pub nombre: String,
    pub cantidad: Decimal,
    pub unidad_medida: String,
    pub clasificacion: String,
    pub subclasificacion: Option<String>,
    pub ubicacion_estante: Option<String>,
    #[serde(rename = "cantidadMinima")]
    pub cantidad_minima: Option<Decimal>,
    #[serde(rename = "cantidadMaxima")]
    pub cantidad_maxima: Option<Decimal>,
    pub notas: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub fecha_registro: Option<DateTime<Utc>>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            code: record.codigo,
            name: record.nombre,
            quantity: record.cantidad.max(Decimal::ZERO),
            unit_of_measure: record.unidad_medida,
            classification: record.clasificacion,
            subclassification: record.subclasificacion,
            shelf_location: record.ubicacion_estante,
            minimum_quantity: record.cantidad_minima,
            maximum_quantity: record.cantidad_maxima,
            notes: record.notas,
            registered_at: record.fecha_registro,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoanItemRecord {
    pub id: i32,
    pub nombre: String,
    #[serde(rename = "cantidadPrestada")]
    pub cantidad_prestada: i32,
    #[serde(rename = "cantidadDevuelta", default)]
    pub cantidad_devuelta: i32,
    #[serde(rename = "comentarioDetalle", default)]
    pub comentario_detalle: Option<String>,
    #[serde(rename = "productoId")]
    pub producto_id: Option<i32>,
}

impl From<LoanItemRecord> for LoanItem {
    fn from(record: LoanItemRecord) -> Self {
        Self {
            id: record.id,
            name: record.nombre,
            product_id: record.producto_id,
            quantity_borrowed: record.cantidad_prestada,
            quantity_returned_total: record.cantidad_devuelta.clamp(0, record.cantidad_prestada.max(0)),
            detail_note: record.comentario_detalle.unwrap_or_default(),
        }
    }
}

/// Loan as returned by the backend. Some endpoints use camelCase aliases
/// for the worker id and dates, so both spellings are read.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanRecord {
    pub id: i32,
    pub trabajador_id: Option<i32>,
    #[serde(rename = "trabajadorId")]
    pub trabajador_id_alt: Option<i32>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub fecha_entrega: Option<DateTime<Utc>>,
    #[serde(rename = "fechaEntrega", default, deserialize_with = "lenient_timestamp")]
    pub fecha_entrega_alt: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub fecha_devolucion_final: Option<DateTime<Utc>>,
    #[serde(rename = "fechaDevolucionFinal", default, deserialize_with = "lenient_timestamp")]
    pub fecha_devolucion_final_alt: Option<DateTime<Utc>>,
    pub estado: WireStatus,
    pub observaciones: Option<String>,
    #[serde(default)]
    pub items: Vec<LoanItemRecord>,
    pub trabajador: Option<WorkerRecord>,
    #[serde(rename = "Trabajador")]
    pub trabajador_alt: Option<WorkerRecord>,
}

impl TryFrom<LoanRecord> for Loan {
    type Error = BackendError;

    fn try_from(record: LoanRecord) -> Result<Self, Self::Error> {
        let worker = record.trabajador.or(record.trabajador_alt).map(Worker::from);
        let worker_id = record
            .trabajador_id
            .or(record.trabajador_id_alt)
            .or_else(|| worker.as_ref().map(|w| w.id))
            .ok_or_else(|| BackendError::Decode(format!("loan {} has no worker id", record.id)))?;
        let created_at = record
            .fecha_entrega
            .or(record.fecha_entrega_alt)
            .ok_or_else(|| BackendError::Decode(format!("loan {} has no start date", record.id)))?;

        Ok(Loan {
            id: record.id,
            worker_id,
            created_at,
            completed_at: record.fecha_devolucion_final.or(record.fecha_devolucion_final_alt),
            status: record.estado.into(),
            notes: record.observaciones,
            items: record.items.into_iter().map(LoanItem::from).collect(),
            worker,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateLoanItemBody<'a> {
    pub nombre: &'a str,
    #[serde(rename = "cantidadPrestada")]
    pub cantidad_prestada: i32,
    #[serde(rename = "comentarioDetalle")]
    pub comentario_detalle: &'a str,
    #[serde(rename = "productoId", skip_serializing_if = "Option::is_none")]
    pub producto_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CreateLoanBody<'a> {
    #[serde(rename = "trabajadorId")]
    pub trabajador_id: i32,
    pub items: Vec<CreateLoanItemBody<'a>>,
    pub estado: WireStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<&'a str>,
}

impl<'a> From<&'a NewLoan> for CreateLoanBody<'a> {
    fn from(loan: &'a NewLoan) -> Self {
        Self {
            trabajador_id: loan.worker_id,
            items: loan
                .items
                .iter()
                .map(|item| CreateLoanItemBody {
                    nombre: &item.name,
                    cantidad_prestada: item.quantity_borrowed,
                    comentario_detalle: &item.detail_note,
                    producto_id: item.product_id,
                })
                .collect(),
            estado: loan.status.into(),
            observaciones: loan.notes.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReturnItemBody {
    pub id: i32,
    /// Cumulative total after this event
    #[serde(rename = "cantidadDevuelta")]
    pub cantidad_devuelta: i32,
    #[serde(rename = "cantidadDevueltaAnterior")]
    pub cantidad_devuelta_anterior: i32,
    #[serde(rename = "cantidadPrestada")]
    pub cantidad_prestada: i32,
}

#[derive(Debug, Serialize)]
pub struct ReturnBody {
    pub items: Vec<ReturnItemBody>,
    #[serde(rename = "cerrarPrestamo")]
    pub cerrar_prestamo: bool,
    pub estado: WireStatus,
}

impl From<&ReturnSubmission> for ReturnBody {
    fn from(submission: &ReturnSubmission) -> Self {
        Self {
            items: submission
                .items
                .iter()
                .map(|item| ReturnItemBody {
                    id: item.item_id,
                    cantidad_devuelta: item.quantity_returned_total,
                    cantidad_devuelta_anterior: item.previous_returned_total,
                    cantidad_prestada: item.quantity_borrowed,
                })
                .collect(),
            cerrar_prestamo: submission.close_loan,
            estado: submission.status.into(),
        }
    }
}
