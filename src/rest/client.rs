//! HTTP client for the Math-Lock REST API
//!
//! Every operation is a single JSON POST. The server attaches an `"error"` field
//! to each response; it is dropped here and never reaches the caller.

use reqwest::header::{CONTENT_TYPE, HOST};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::ciphertext::{Ciphertext, Decrypted, MathOp, MathRequest};
use crate::config::RestConfig;
use crate::error::Result;

#[derive(Serialize)]
struct EncryptRequest<'a> {
    value: &'a str,
}

/// Math-Lock REST API client
///
/// Holds one `reqwest::Client`, so connections are reused across calls. No
/// retries and no timeouts beyond the HTTP client's defaults.
#[derive(Debug, Clone)]
pub struct MathLockClient {
    http: reqwest::Client,
    config: RestConfig,
}

impl MathLockClient {
    pub fn new(config: RestConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured `reqwest::Client` (proxies, custom TLS roots, ...)
    pub fn with_http_client(http: reqwest::Client, config: RestConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// Encrypt a plaintext number given as text
    pub async fn encrypt(&self, value: &str) -> Result<Ciphertext> {
        self.post(&self.config.encrypt_url(), &EncryptRequest { value })
            .await
    }

    /// Decrypt a ciphertext back to its plaintext value
    pub async fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Decrypted> {
        self.post(&self.config.decrypt_url(), ciphertext).await
    }

    /// Run one arithmetic operation over two ciphertexts
    pub async fn math(&self, op: MathOp, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        let request = MathRequest {
            num1: lhs.clone(),
            num2: rhs.clone(),
            ops_type: op,
        };
        self.post(&self.config.math_url(), &request).await
    }

    pub async fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        self.math(MathOp::Addition, lhs, rhs).await
    }

    pub async fn sub(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        self.math(MathOp::Subtraction, lhs, rhs).await
    }

    pub async fn mul(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        self.math(MathOp::Multiplication, lhs, rhs).await
    }

    pub async fn div(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        self.math(MathOp::Division, lhs, rhs).await
    }

    async fn post<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);
        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(host) = &self.config.host_header {
            request = request.header(HOST, host);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("{} -> {} ({} bytes)", url, status, bytes.len());

        decode_body(&bytes)
    }
}

/// Parse a response object and drop its `"error"` field
///
/// Goes through a `Map` so numbers keep their exact text.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut body: Map<String, Value> = serde_json::from_slice(bytes)?;
    if let Some(error) = body.remove("error").filter(is_reported) {
        debug!("Discarding server error field: {}", error);
    }
    Ok(serde_json::from_value(Value::Object(body))?)
}

fn is_reported(error: &Value) -> bool {
    match error {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_drops_error() {
        let ct: Ciphertext =
            decode_body(br#"{"a": "1", "b": "2", "c": "3", "d": "4", "error": "overflow"}"#).unwrap();
        assert_eq!(ct, Ciphertext::new("1", "2", "3", "4"));
    }

    #[test]
    fn test_decode_without_error() {
        let decrypted: Decrypted = decode_body(br#"{"value": 16.25}"#).unwrap();
        assert_eq!(decrypted.value, "16.25");
    }

    #[test]
    fn test_decode_keeps_big_integers() {
        let ct: Ciphertext = decode_body(
            br#"{"a": 123456789012345678901234567890, "b": -98765432109876543210987654321,
                 "c": 0.100000000000000000000000001, "d": "4", "error": null}"#,
        )
        .unwrap();
        assert_eq!(ct.a, "123456789012345678901234567890");
        assert_eq!(ct.b, "-98765432109876543210987654321");
        assert_eq!(ct.c, "0.100000000000000000000000001");
        assert_eq!(ct.to_literal(), "{123456789012345678901234567890,-98765432109876543210987654321,0.100000000000000000000000001,4}");
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(decode_body::<Decrypted>(b"[1, 2]").is_err());
        assert!(decode_body::<Decrypted>(br#"{"error": "cannot decrypt"}"#).is_err());
    }

    #[test]
    fn test_encrypt_request_shape() {
        let body = serde_json::to_value(EncryptRequest { value: "-89.56544" }).unwrap();
        assert_eq!(body, serde_json::json!({"value": "-89.56544"}));
    }

    #[test]
    fn test_is_reported() {
        assert!(!is_reported(&Value::Null));
        assert!(!is_reported(&serde_json::json!("")));
        assert!(is_reported(&serde_json::json!("bad input")));
        assert!(is_reported(&serde_json::json!({"code": 3})));
    }
}
