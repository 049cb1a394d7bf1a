use sqlx::{postgres::PgPoolOptions, PgPool};

/// Schema for stored reports; applied on startup.
const CREATE_CREDIT_REPORTS: &str = r#"
CREATE TABLE IF NOT EXISTS credit_reports (
    id UUID PRIMARY KEY,
    personal_info JSONB NOT NULL,
    summary_details JSONB NOT NULL,
    accounts_list JSONB NOT NULL,
    source_digest TEXT NOT NULL,
    created_on TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_CREATED_ON_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS credit_reports_created_on_idx ON credit_reports (created_on DESC)";

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        ensure_schema(&pool).await?;

        Ok(Self { pool })
    }
}

/// Creates the report table and its index if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_CREDIT_REPORTS).execute(pool).await?;
    sqlx::query(CREATE_CREATED_ON_INDEX).execute(pool).await?;
    Ok(())
}
