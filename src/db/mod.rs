//! Math-Lock PostgreSQL integration
//!
//! Ciphertexts are stored in columns of the extension's `mathlock` type and the
//! arithmetic runs server-side through its overloaded `+ - * /` operators.
//!
//! # Demo schema
//!
//! ```text
//! id    integer NOT NULL
//! data1 mathlock   -- left operand
//! data2 mathlock   -- right operand
//! data3 mathlock   -- result of the last UPDATE
//! ```
//!
//! The demo server is shared between users. Table names and row ids are not
//! checked for uniqueness.

mod demo;
pub mod sql;
mod store;

pub use demo::{run_db_demo, DbDemo, DbOutcome};
pub use store::{MathLockDb, MathLockRow, TableInfo};
