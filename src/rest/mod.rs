//! Math-Lock REST API
//!
//! - [`MathLockClient`]: `encrypt`, `decrypt` and the four arithmetic operations
//! - [`run_test`] / [`run_perf_test`]: the scripted demo and its latency loop
//!
//! # Example
//!
//! ```ignore
//! use mathlock::config::RestConfig;
//! use mathlock::rest::MathLockClient;
//!
//! let client = MathLockClient::new(RestConfig::default());
//! let x = client.encrypt("15.5").await?;
//! let y = client.encrypt("-89.56544").await?;
//! let product = client.mul(&x, &y).await?;
//! println!("{}", client.decrypt(&product).await?.value);
//! ```

mod client;
mod demo;

pub use client::MathLockClient;
pub use demo::{run_perf_test, run_test, OpOutcome, PerfReport, DEFAULT_PERF_ITERATIONS};
