//! Scripted walkthrough of the REST API
//!
//! Computes the four results in plaintext first, then repeats them over
//! ciphertexts and prints each decryption next to its ciphertext.

use std::time::{Duration, Instant};

use tracing::info;

use crate::ciphertext::{Ciphertext, MathOp};
use crate::error::{invalid_input, Result};

use super::client::MathLockClient;

/// One homomorphic operation and its decryption
#[derive(Debug, Clone)]
pub struct OpOutcome {
    pub op: MathOp,
    pub ciphertext: Ciphertext,
    pub decrypted: String,
    /// Result of the same operation over plaintext
    pub expected: f64,
}

/// Timing of the multiplication loop
#[derive(Debug, Clone, Copy)]
pub struct PerfReport {
    pub iterations: u32,
    pub elapsed: Duration,
}

impl PerfReport {
    /// Elapsed seconds with five decimals
    pub fn seconds(&self) -> String {
        format!("{:.5}", self.elapsed.as_secs_f64())
    }
}

/// Default iteration count for [`run_perf_test`]
pub const DEFAULT_PERF_ITERATIONS: u32 = 10;

fn parse_plain(value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_input!("{:?} is not a number", value))
}

/// Run all four operations over `num1` and `num2` and print each step
pub async fn run_test(client: &MathLockClient, num1: &str, num2: &str) -> Result<Vec<OpOutcome>> {
    let plain1 = parse_plain(num1)?;
    let plain2 = parse_plain(num2)?;

    println!("Num 1 to operate with is: {}, Num2: {}", num1, num2);
    println!("Let's check ourselves! :)");
    for op in MathOp::ALL {
        println!(
            "Num1 {} Num2 in a standard way: {}",
            op,
            op.apply_plain(plain1, plain2)
        );
    }

    println!();
    println!("Now, let's encrypt our data and perform homomorphic operations over the ciphertext");
    println!();
    let encrypted1 = client.encrypt(num1).await?;
    let encrypted2 = client.encrypt(num2).await?;

    let mut outcomes = Vec::with_capacity(MathOp::ALL.len());
    for op in MathOp::ALL {
        let ciphertext = client.math(op, &encrypted1, &encrypted2).await?;
        println!("Ciphertext for {} of Num1 and Num2: {}", op, ciphertext);
        let decrypted = client.decrypt(&ciphertext).await?;
        println!("Decryption of {} of Num1 and Num2: {}", op, decrypted.value);

        outcomes.push(OpOutcome {
            op,
            ciphertext,
            decrypted: decrypted.value,
            expected: op.apply_plain(plain1, plain2),
        });
    }

    Ok(outcomes)
}

/// Time `iterations` multiplications of two freshly encrypted values
///
/// Measures REST round trips, not the scheme itself.
pub async fn run_perf_test(
    client: &MathLockClient,
    num1: &str,
    num2: &str,
    iterations: u32,
) -> Result<PerfReport> {
    info!("Running REST perf test: {} multiplications", iterations);

    let encrypted1 = client.encrypt(num1).await?;
    let encrypted2 = client.encrypt(num2).await?;

    let start = Instant::now();
    for _ in 0..iterations {
        client.mul(&encrypted1, &encrypted2).await?;
    }
    let report = PerfReport {
        iterations,
        elapsed: start.elapsed(),
    };

    println!(
        "Time took for {} iterations of multiplication is: {} seconds",
        report.iterations,
        report.seconds()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_plain("15.5").unwrap(), 15.5);
        assert_eq!(parse_plain(" -89.56544 ").unwrap(), -89.56544);
        assert!(parse_plain("fifteen").is_err());
    }

    #[test]
    fn test_perf_seconds_format() {
        let report = PerfReport {
            iterations: 10,
            elapsed: Duration::from_micros(1_234_567),
        };
        assert_eq!(report.seconds(), "1.23457");
    }
}
