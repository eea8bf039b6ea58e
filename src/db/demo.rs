//! Encrypt over REST, compute inside PostgreSQL, decrypt over REST

use tracing::info;

use crate::ciphertext::{Ciphertext, MathOp};
use crate::error::{invalid_input, Result};

use super::sql::DEFAULT_EXTENSION;
use super::store::MathLockDb;

/// Inputs for [`run_db_demo`]
#[derive(Debug, Clone)]
pub struct DbDemo {
    /// Dropped and recreated on every run, so pick a unique name
    pub table: String,
    pub row_id: i32,
    pub value1: String,
    pub value2: String,
    pub ops: Vec<MathOp>,
}

impl Default for DbDemo {
    fn default() -> Self {
        Self {
            table: "do_test_table".to_string(),
            row_id: 1,
            value1: "10.5".to_string(),
            value2: "5.34".to_string(),
            ops: vec![MathOp::Division],
        }
    }
}

/// Result of one operation computed by the extension
#[derive(Debug, Clone)]
pub struct DbOutcome {
    pub op: MathOp,
    pub ciphertext: Ciphertext,
    pub decrypted: String,
}

pub async fn run_db_demo(db: &MathLockDb, demo: &DbDemo) -> Result<Vec<DbOutcome>> {
    db.create_extension(DEFAULT_EXTENSION).await?;
    println!(
        "Original values to operate with are: {} and {}",
        demo.value1, demo.value2
    );

    // one row per run: start from an empty table
    db.drop_table(&demo.table).await?;
    if !db.create_table(&demo.table).await? {
        return Err(invalid_input!("table [{}] could not be created", demo.table));
    }

    let encrypted1 = db.rest_encrypt(&demo.value1).await?;
    let encrypted2 = db.rest_encrypt(&demo.value2).await?;
    db.insert_row(
        &demo.table,
        demo.row_id,
        &MathLockDb::to_literal(&encrypted1),
        &MathLockDb::to_literal(&encrypted2),
    )
    .await?;
    info!("Inserted operands into [{}] row {}", demo.table, demo.row_id);

    let mut outcomes = Vec::with_capacity(demo.ops.len());
    for &op in &demo.ops {
        db.apply(&demo.table, demo.row_id, op).await?;

        let literal = db
            .select_result(&demo.table, demo.row_id)
            .await?
            .ok_or_else(|| invalid_input!("row {} has no result after {}", demo.row_id, op))?;
        let ciphertext = MathLockDb::literal_to_ciphertext(&literal)?;
        println!("Result ciphertext before decryption: {}", ciphertext);

        let decrypted = db.rest_decrypt(&ciphertext).await?;
        println!("Final result of {} after decryption is: {}", op, decrypted.value);

        outcomes.push(DbOutcome {
            op,
            ciphertext,
            decrypted: decrypted.value,
        });
    }

    Ok(outcomes)
}
