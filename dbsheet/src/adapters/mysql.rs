//! MySQL adapter: reads table and column metadata from `information_schema`.
//!
//! The adapter issues exactly two parameterized read-only queries and never
//! writes to the source database. Connection credentials are consumed
//! during pool creation and never logged.

use crate::adapters::ConnectionConfig;
use crate::config::ExportConfig;
use dbsheet_core::error::{DbsheetError, Result};
use dbsheet_core::models::{Column, Table};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySql, Pool, Row};

const TABLE_NAMES_SQL: &str = "\
    SELECT TABLE_NAME \
    FROM INFORMATION_SCHEMA.TABLES \
    WHERE TABLE_SCHEMA = ? \
    ORDER BY TABLE_NAME ASC";

// No ORDER BY: column rows keep the catalog's own order.
const TABLE_COLUMNS_SQL: &str = "\
    SELECT COLUMN_NAME, COLUMN_DEFAULT, IS_NULLABLE, DATA_TYPE, COLUMN_TYPE, COLUMN_KEY \
    FROM INFORMATION_SCHEMA.COLUMNS \
    WHERE TABLE_SCHEMA = ? \
    AND TABLE_NAME = ?";

/// MySQL adapter with a bounded connection pool.
pub struct MySqlAdapter {
    pool: Pool<MySql>,
}

impl MySqlAdapter {
    /// Opens a connection pool against the configured server.
    ///
    /// # Errors
    /// Returns a connection error (carrying the masked URL) if the
    /// connection cannot be established or authentication fails.
    pub async fn connect(config: &ExportConfig, pool_config: &ConnectionConfig) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .database(&config.database);
        if let Some(ref password) = config.password {
            options = options.password(password);
        }

        // Keep the driver from echoing statements into the logs.
        let options = options.disable_statement_logging();

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_config.max_connections)
            .min_connections(pool_config.min_idle_connections)
            .acquire_timeout(pool_config.acquire_timeout)
            .max_lifetime(pool_config.max_lifetime)
            .connect_with(options)
            .await
            .map_err(|e| DbsheetError::connection_failed(config.display_url(), e))?;

        Ok(Self { pool })
    }

    /// Lists table names in the schema, ascending, as empty [`Table`] records.
    ///
    /// # Errors
    /// Returns an error if the query or any row scan fails.
    pub async fn list_tables(&self, schema: &str) -> Result<Vec<Table>> {
        let rows = sqlx::query(TABLE_NAMES_SQL)
            .bind(schema)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbsheetError::collection_failed("table name discovery", e))?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row
                .try_get(0)
                .map_err(|e| DbsheetError::parse_field("TABLE_NAME", None, e))?;
            tables.push(Table::new(name));
        }
        Ok(tables)
    }

    /// Collects column metadata for one table, in catalog order.
    ///
    /// An absent catalog default becomes the literal `"NULL"` sentinel.
    ///
    /// # Errors
    /// Returns an error if the query or any row scan fails.
    pub async fn collect_columns(&self, schema: &str, table: &str) -> Result<Vec<Column>> {
        let rows = sqlx::query(TABLE_COLUMNS_SQL)
            .bind(schema)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DbsheetError::collection_failed(
                    format!("column metadata for table '{}'", table),
                    e,
                )
            })?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            columns.push(Column {
                name: row
                    .try_get(0)
                    .map_err(|e| DbsheetError::parse_field("COLUMN_NAME", Some(table), e))?,
                default: row
                    .try_get::<Option<String>, _>(1)
                    .map_err(|e| DbsheetError::parse_field("COLUMN_DEFAULT", Some(table), e))?
                    .unwrap_or_else(|| "NULL".to_string()),
                nullable: row
                    .try_get(2)
                    .map_err(|e| DbsheetError::parse_field("IS_NULLABLE", Some(table), e))?,
                data_type: row
                    .try_get(3)
                    .map_err(|e| DbsheetError::parse_field("DATA_TYPE", Some(table), e))?,
                column_type: row
                    .try_get(4)
                    .map_err(|e| DbsheetError::parse_field("COLUMN_TYPE", Some(table), e))?,
                key: row
                    .try_get(5)
                    .map_err(|e| DbsheetError::parse_field("COLUMN_KEY", Some(table), e))?,
            });
        }
        Ok(columns)
    }

    /// Closes the pool. No queries may be issued afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_unreachable_host_fails() {
        let config = ExportConfig {
            username: "nobody".to_string(),
            password: None,
            database: "missing".to_string(),
            host: "127.0.0.1".to_string(),
            // Reserved port; nothing listens here.
            port: 1,
            output_file: PathBuf::from("out.xlsx"),
            tables: Vec::new(),
        };
        let pool_config = ConnectionConfig {
            acquire_timeout: Duration::from_secs(3),
            ..ConnectionConfig::default()
        };

        let result = MySqlAdapter::connect(&config, &pool_config).await;
        let error = result.err().expect("connection should fail");

        let message = error.to_string();
        assert!(message.contains("Database connection failed"));
        assert!(message.contains("mysql://nobody@127.0.0.1:1/missing"));
    }
}
