//! Math-Lock: client for a remote fully homomorphic encryption service
//!
//! The scheme itself lives on the server. This crate only moves ciphertexts around:
//!
//! - [`rest`]: `encrypt`, `decrypt` and the four arithmetic operations over the REST API
//! - [`db`]: stores ciphertexts in PostgreSQL and has the `mathlock` extension do the
//!   arithmetic in SQL
//!
//! A ciphertext is a 2x2 matrix of four opaque strings, see [`Ciphertext`].

pub mod ciphertext;
pub mod config;
pub mod error;
pub mod rest;
#[cfg(feature = "db")]
pub mod db;

pub use ciphertext::{Ciphertext, Decrypted, MathOp, MathRequest};
pub use config::{ConfigFile, DbConfig, RestConfig};
pub use error::{MathLockError, Result};
pub use rest::MathLockClient;

#[cfg(feature = "db")]
pub use db::MathLockDb;
