use serde::Deserialize;

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Largest accepted request body for report uploads.
    pub max_upload_bytes: usize,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("DB_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DATABASE_URL or DB_URL environment variable required")
                })
                .and_then(|url| validate_database_url(&url).map(|_| url))?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().parse::<usize>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_BYTES must be a positive integer"))?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a positive integer"))?,
        };

        if config.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if config.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be greater than zero");
        }

        // Log successful configuration load (without credentials)
        tracing::info!("Configuration loaded successfully");
        if let Ok(parsed) = url::Url::parse(&config.database_url) {
            tracing::debug!(
                "Database: {}://{}",
                parsed.scheme(),
                parsed.host_str().unwrap_or("localhost")
            );
        }
        tracing::debug!("Max upload size: {} bytes", config.max_upload_bytes);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Checks that `url` is a PostgreSQL connection URL.
pub fn validate_database_url(url: &str) -> anyhow::Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("DATABASE_URL cannot be empty");
    }
    let parsed = url::Url::parse(url)
        .map_err(|e| anyhow::anyhow!("DATABASE_URL is not a valid URL: {}", e))?;
    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(()),
        other => anyhow::bail!(
            "DATABASE_URL must use postgres:// or postgresql://, got {}://",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_postgres_urls() {
        assert!(validate_database_url("postgres://user:pw@localhost:5432/reports").is_ok());
        assert!(validate_database_url("postgresql://localhost/reports").is_ok());
    }

    #[test]
    fn test_rejects_other_urls() {
        assert!(validate_database_url("").is_err());
        assert!(validate_database_url("mongodb://localhost/reports").is_err());
        assert!(validate_database_url("not a url").is_err());
    }
}
