//! PostgreSQL wrapper for tables of `mathlock` ciphertexts
//!
//! One connection is held for the lifetime of [`MathLockDb`]. Each statement
//! runs in autocommit mode, so every call is committed when it returns.

use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};
use tracing::{error, info, warn};

use crate::ciphertext::{Ciphertext, Decrypted, MathOp};
use crate::config::DbConfig;
use crate::error::{MathLockError, Result};
use crate::rest::MathLockClient;

use super::sql;

/// Row of a demo table with every `mathlock` column rendered as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathLockRow {
    pub id: i32,
    pub data1: Option<String>,
    pub data2: Option<String>,
    pub data3: Option<String>,
}

/// Entry of `pg_catalog.pg_tables`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    pub owner: Option<String>,
}

/// Database handle plus the REST client used to encrypt and decrypt
pub struct MathLockDb {
    client: Client,
    connection: JoinHandle<()>,
    rest: MathLockClient,
}

impl std::fmt::Debug for MathLockDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathLockDb")
            .field("closed", &self.client.is_closed())
            .field("rest", self.rest.config())
            .finish_non_exhaustive()
    }
}

impl MathLockDb {
    /// Connect without TLS, as the demo server expects
    pub async fn connect(config: &DbConfig, rest: MathLockClient) -> Result<Self> {
        info!(
            "Connecting to {}:{}/{} as {}",
            config.host, config.port, config.database, config.user
        );
        let (client, connection) = config.to_pg_config().connect(NoTls).await?;

        // Drives the socket until the client is dropped
        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("Database connection error: {}", e);
            }
        });

        Ok(Self {
            client,
            connection,
            rest,
        })
    }

    pub fn rest(&self) -> &MathLockClient {
        &self.rest
    }

    /// `CREATE EXTENSION IF NOT EXISTS`; already installed on the demo server
    pub async fn create_extension(&self, name: &str) -> Result<()> {
        self.client.batch_execute(&sql::create_extension(name)?).await?;
        Ok(())
    }

    /// Names of all base tables outside the system schemas, ordered by name
    pub async fn table_names(&self) -> Result<impl Iterator<Item = String>> {
        let rows = self.client.query(sql::TABLE_NAMES, &[]).await?;
        Ok(rows.into_iter().map(|row| row.get::<_, String>(0)))
    }

    /// All user tables as listed by `pg_catalog.pg_tables`
    pub async fn tables_info(&self) -> Result<Vec<TableInfo>> {
        let rows = self.client.query(sql::TABLES_INFO, &[]).await?;
        Ok(rows
            .iter()
            .map(|row| TableInfo {
                schema: row.get(0),
                name: row.get(1),
                owner: row.get(2),
            })
            .collect())
    }

    /// Every row of `table`, or `None` when it is empty
    pub async fn select_all(&self, table: &str) -> Result<Option<Vec<MathLockRow>>> {
        let rows = self.client.query(&sql::select_all(table)?, &[]).await?;
        if rows.is_empty() {
            info!("Nothing to fetch, table [{}] is empty", table);
            return Ok(None);
        }
        Ok(Some(
            rows.iter()
                .map(|row| MathLockRow {
                    id: row.get(0),
                    data1: row.get(1),
                    data2: row.get(2),
                    data3: row.get(3),
                })
                .collect(),
        ))
    }

    /// The `data3` literal of row `id`; `None` if the row is missing or unset
    pub async fn select_result(&self, table: &str, id: i32) -> Result<Option<String>> {
        let rows = self.client.query(&sql::select_result(table, id)?, &[]).await?;
        let result = rows.first().and_then(|row| row.get::<_, Option<String>>(0));
        info!(
            "Fetched result by ID {} from table [{}]: {:?}",
            id, table, result
        );
        Ok(result)
    }

    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        // same name may exist in several schemas
        let rows = self.client.query(&sql::table_exists(table)?, &[]).await?;
        Ok(!rows.is_empty())
    }

    /// Create `table` with the demo schema unless it already exists
    ///
    /// Returns whether the table exists afterwards.
    pub async fn create_table(&self, table: &str) -> Result<bool> {
        let statement = sql::create_table(table)?;
        if self.table_exists(table).await? {
            info!("Table [{}] already exists", table);
            return Ok(true);
        }
        self.client.batch_execute(&statement).await?;
        let created = self.table_exists(table).await?;
        info!("Table [{}] has been created: {}", table, created);
        Ok(created)
    }

    /// Insert operand literals into `data1` and `data2`
    pub async fn insert_row(&self, table: &str, id: i32, lhs: &str, rhs: &str) -> Result<()> {
        self.client
            .execute(&sql::insert_row(table, id, lhs, rhs)?, &[])
            .await?;
        Ok(())
    }

    /// Drop `table`; returns true iff it no longer exists
    pub async fn drop_table(&self, table: &str) -> Result<bool> {
        self.client.batch_execute(&sql::drop_table(table)?).await?;
        if self.table_exists(table).await? {
            warn!("Table [{}] can't be deleted", table);
            return Ok(false);
        }
        info!("Table [{}] has been deleted", table);
        Ok(true)
    }

    /// Delete row `id` and return how many rows went away
    ///
    /// Failures are logged and reported as zero deleted rows.
    pub async fn delete_row(&self, table: &str, id: i32) -> u64 {
        let result = match sql::delete_row(table, id) {
            Ok(statement) => self
                .client
                .execute(&statement, &[])
                .await
                .map_err(MathLockError::from),
            Err(e) => Err(e),
        };
        deleted_or_zero(table, result)
    }

    /// Have the extension compute `data3 = data1 <op> data2` for row `id`
    pub async fn apply(&self, table: &str, id: i32, op: MathOp) -> Result<()> {
        info!("Called FHE {} for table [{}] row ID {}", op, table, id);
        self.client.execute(&sql::apply_op(table, id, op)?, &[]).await?;
        Ok(())
    }

    pub async fn mul(&self, table: &str, id: i32) -> Result<()> {
        self.apply(table, id, MathOp::Multiplication).await
    }

    pub async fn div(&self, table: &str, id: i32) -> Result<()> {
        self.apply(table, id, MathOp::Division).await
    }

    pub async fn add(&self, table: &str, id: i32) -> Result<()> {
        self.apply(table, id, MathOp::Addition).await
    }

    pub async fn sub(&self, table: &str, id: i32) -> Result<()> {
        self.apply(table, id, MathOp::Subtraction).await
    }

    /// Repeat `op` on row `id` and return the total time taken
    pub async fn execute_in_loop(
        &self,
        op: MathOp,
        iterations: u32,
        table: &str,
        id: i32,
    ) -> Result<Duration> {
        let start = Instant::now();
        for _ in 0..iterations {
            self.apply(table, id, op).await?;
        }
        let elapsed = start.elapsed();
        println!("Execution took: {:.5} seconds", elapsed.as_secs_f64());
        Ok(elapsed)
    }

    pub async fn rest_encrypt(&self, value: &str) -> Result<Ciphertext> {
        self.rest.encrypt(value).await
    }

    pub async fn rest_decrypt(&self, ciphertext: &Ciphertext) -> Result<Decrypted> {
        self.rest.decrypt(ciphertext).await
    }

    /// Literal for inserting `ciphertext` into a `mathlock` column
    pub fn to_literal(ciphertext: &Ciphertext) -> String {
        ciphertext.to_literal()
    }

    /// Reshape a fetched `mathlock` literal into a decrypt request
    pub fn literal_to_ciphertext(literal: &str) -> Result<Ciphertext> {
        Ciphertext::from_literal(literal)
    }
}

/// Row count of a delete, with any failure logged and counted as zero
fn deleted_or_zero(table: &str, result: Result<u64>) -> u64 {
    match result {
        Ok(deleted) => deleted,
        Err(e) => {
            warn!("Delete from [{}] failed: {}", table, e);
            0
        }
    }
}

impl Drop for MathLockDb {
    fn drop(&mut self) {
        self.connection.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_count_passes_through() {
        assert_eq!(deleted_or_zero("demo", Ok(3)), 3);
        assert_eq!(deleted_or_zero("demo", Ok(0)), 0);
    }

    #[test]
    fn test_rejected_name_deletes_nothing() {
        let result = sql::delete_row("not a table", 1).map(|_| 1);
        assert!(result.is_err());
        assert_eq!(deleted_or_zero("not a table", result), 0);
        assert_eq!(deleted_or_zero("", sql::delete_row("", 1).map(|_| 1)), 0);
    }

    #[test]
    fn test_database_failure_deletes_nothing() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert_eq!(deleted_or_zero("demo", Err(MathLockError::from(io))), 0);
    }
}
