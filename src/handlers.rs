use crate::config::Config;
use crate::db_storage::CreditReportStorage;
use crate::errors::AppError;
use crate::extractor;
use crate::models::{StoredCreditReport, UploadResponse};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Multipart field carrying the XML document.
pub const UPLOAD_FIELD: &str = "file";

/// Content types accepted for uploads.
const XML_CONTENT_TYPES: [&str; 2] = ["text/xml", "application/xml"];

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "credit-report-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/credit-reports/test
pub async fn probe() -> Json<serde_json::Value> {
    Json(json!({ "test": true }))
}

/// Whether a multipart content type names an XML document.
///
/// Parameters such as `charset` are ignored.
pub fn is_xml_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or("").trim();
    XML_CONTENT_TYPES
        .iter()
        .any(|accepted| essence.eq_ignore_ascii_case(accepted))
}

/// POST /api/credit-reports/upload/credit-xml
///
/// Accepts a multipart form whose `file` field holds a bureau XML document,
/// extracts the credit report aggregate and stores it.
///
/// # Returns
///
/// * `Result<Json<UploadResponse>, AppError>` - The stored report id, or a
///   400 for a missing/non-XML file and a 422 for a document that is not a
///   readable credit report.
pub async fn upload_credit_xml(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut document = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        if !is_xml_content_type(field.content_type()) {
            tracing::info!(
                "Rejected upload with content type {:?}",
                field.content_type()
            );
            return Err(AppError::BadRequest(
                "Only XML files are allowed".to_string(),
            ));
        }

        let file_name = field.file_name().unwrap_or("upload.xml").to_string();
        let bytes = field.bytes().await?;
        tracing::info!(
            "POST /upload/credit-xml - file: {}, {} bytes",
            file_name,
            bytes.len()
        );
        document = Some(bytes);
        break;
    }

    let document =
        document.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let report = extractor::parse_credit_report(&document)?;

    let storage = CreditReportStorage::new(state.db.clone());
    let stored = storage.insert(&report, &document).await?;

    Ok(Json(UploadResponse {
        message: "Report processed and saved".to_string(),
        id: stored.id,
    }))
}

/// GET /api/credit-reports/credits
///
/// All stored reports, newest first.
pub async fn list_credit_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredCreditReport>>, AppError> {
    let storage = CreditReportStorage::new(state.db.clone());
    let reports = storage.list_all().await?;

    tracing::debug!("GET /credits - {} reports", reports.len());

    Ok(Json(reports))
}

/// GET /api/credit-reports/credits/:report_id
pub async fn get_credit_report(
    State(state): State<Arc<AppState>>,
    Path(report_id): Path<String>,
) -> Result<Json<StoredCreditReport>, AppError> {
    tracing::info!("GET /credits/{}", report_id);

    let id = Uuid::parse_str(report_id.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid report id: {}", report_id)))?;

    let storage = CreditReportStorage::new(state.db.clone());
    let report = storage
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_content_types() {
        assert!(is_xml_content_type(Some("text/xml")));
        assert!(is_xml_content_type(Some("application/xml")));
        assert!(is_xml_content_type(Some("Application/XML; charset=utf-8")));
        assert!(!is_xml_content_type(Some("application/json")));
        assert!(!is_xml_content_type(Some("text/xml-external-parsed-entity")));
        assert!(!is_xml_content_type(None));
    }
}
