use crate::errors::{AppError, ResultExt};
use crate::models::{
    AccountRecord, CreditReportAggregate, PersonalInfo, StoredCreditReport, SummaryDetails,
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Row shape of `credit_reports`.
#[derive(Debug, FromRow)]
struct CreditReportRow {
    id: Uuid,
    personal_info: Json<PersonalInfo>,
    summary_details: Json<SummaryDetails>,
    accounts_list: Json<Vec<AccountRecord>>,
    source_digest: String,
    created_on: DateTime<Utc>,
}

impl From<CreditReportRow> for StoredCreditReport {
    fn from(row: CreditReportRow) -> Self {
        Self {
            id: row.id,
            report: CreditReportAggregate {
                personal_info: row.personal_info.0,
                summary_details: row.summary_details.0,
                accounts_list: row.accounts_list.0,
            },
            source_digest: row.source_digest,
            created_on: row.created_on,
        }
    }
}

/// SHA-256 of an uploaded document, hex encoded.
pub fn source_digest(document: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document);
    hex::encode(hasher.finalize())
}

/// Database storage service for credit report aggregates
pub struct CreditReportStorage {
    pool: PgPool,
}

impl CreditReportStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores an aggregate and returns its newly assigned identifier.
    ///
    /// `document` is the raw upload; only its digest is kept.
    pub async fn insert(
        &self,
        report: &CreditReportAggregate,
        document: &[u8],
    ) -> Result<StoredCreditReport, AppError> {
        let id = Uuid::new_v4();
        let digest = source_digest(document);

        let created_on: (DateTime<Utc>,) = sqlx::query_as(
            r#"
            INSERT INTO credit_reports (id, personal_info, summary_details, accounts_list, source_digest)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING created_on
            "#,
        )
        .bind(id)
        .bind(Json(&report.personal_info))
        .bind(Json(&report.summary_details))
        .bind(Json(&report.accounts_list))
        .bind(&digest)
        .fetch_one(&self.pool)
        .await
        .context("storing credit report")?;

        tracing::info!(
            "Stored credit report {} ({} accounts, digest {}...)",
            id,
            report.accounts_list.len(),
            &digest[..12]
        );

        Ok(StoredCreditReport {
            id,
            report: report.clone(),
            source_digest: digest,
            created_on: created_on.0,
        })
    }

    /// All stored reports, newest first.
    pub async fn list_all(&self) -> Result<Vec<StoredCreditReport>, AppError> {
        let rows = sqlx::query_as::<_, CreditReportRow>(
            r#"
            SELECT id, personal_info, summary_details, accounts_list, source_digest, created_on
            FROM credit_reports
            ORDER BY created_on DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("listing credit reports")?;

        Ok(rows.into_iter().map(StoredCreditReport::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredCreditReport>, AppError> {
        let row = sqlx::query_as::<_, CreditReportRow>(
            r#"
            SELECT id, personal_info, summary_details, accounts_list, source_digest, created_on
            FROM credit_reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("loading credit report {}", id))?;

        Ok(row.map(StoredCreditReport::from))
    }
}
