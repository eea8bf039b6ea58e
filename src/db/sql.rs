//! SQL text for the demo schema
//!
//! Statements are built by interpolation, so table and extension names are
//! restricted to plain identifiers and literals have their quotes doubled.
//! `mathlock` columns are always read through a `::text` cast.

use crate::ciphertext::MathOp;
use crate::error::{invalid_input, Result};

/// PostgreSQL's identifier length limit (NAMEDATALEN - 1)
const MAX_IDENTIFIER_LEN: usize = 63;

/// Extension providing the `mathlock` type and its operators
pub const DEFAULT_EXTENSION: &str = "mathlock";

pub const TABLE_NAMES: &str = "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema NOT IN ('information_schema', 'pg_catalog') \
     AND table_type = 'BASE TABLE' ORDER BY table_name";

pub const TABLES_INFO: &str = "SELECT schemaname::text, tablename::text, tableowner::text \
     FROM pg_catalog.pg_tables \
     WHERE schemaname != 'pg_catalog' AND schemaname != 'information_schema'";

/// Check that `name` is an unquoted SQL identifier and fold it to lowercase
///
/// PostgreSQL folds unquoted identifiers, while catalog lookups compare the
/// stored (folded) name exactly.
pub fn identifier(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(invalid_input!("name is empty"));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(invalid_input!(
            "identifier {:?} is longer than {} bytes",
            name,
            MAX_IDENTIFIER_LEN
        ));
    }
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid_input!("{:?} is not a plain SQL identifier", name));
    }
    Ok(name.to_ascii_lowercase())
}

/// Single-quoted string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn create_extension(name: &str) -> Result<String> {
    Ok(format!("CREATE EXTENSION IF NOT EXISTS {}", identifier(name)?))
}

pub fn table_exists(table: &str) -> Result<String> {
    Ok(format!(
        "SELECT 1 FROM information_schema.tables WHERE table_name = {}",
        quote_literal(&identifier(table)?)
    ))
}

pub fn create_table(table: &str) -> Result<String> {
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS public.{} (id integer NOT NULL, \
         data1 public.mathlock, data2 public.mathlock, data3 public.mathlock)",
        identifier(table)?
    ))
}

pub fn drop_table(table: &str) -> Result<String> {
    Ok(format!("DROP TABLE IF EXISTS {}", identifier(table)?))
}

pub fn insert_row(table: &str, id: i32, lhs: &str, rhs: &str) -> Result<String> {
    Ok(format!(
        "INSERT INTO public.{} (id, data1, data2) VALUES ({}, {}, {})",
        identifier(table)?,
        id,
        quote_literal(lhs),
        quote_literal(rhs)
    ))
}

pub fn delete_row(table: &str, id: i32) -> Result<String> {
    Ok(format!("DELETE FROM {} WHERE id = {}", identifier(table)?, id))
}

pub fn select_all(table: &str) -> Result<String> {
    Ok(format!(
        "SELECT id, data1::text, data2::text, data3::text FROM {} ORDER BY id",
        identifier(table)?
    ))
}

pub fn select_result(table: &str, id: i32) -> Result<String> {
    Ok(format!(
        "SELECT data3::text FROM {} WHERE id = {}",
        identifier(table)?,
        id
    ))
}

/// `data3 = data1 <op> data2`, evaluated by the extension
pub fn apply_op(table: &str, id: i32, op: MathOp) -> Result<String> {
    Ok(format!(
        "UPDATE public.{} SET data3 = data1 {} data2 WHERE id = {}",
        identifier(table)?,
        op.sql_operator(),
        id
    ))
}
