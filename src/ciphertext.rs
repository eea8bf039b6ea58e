//! Ciphertext and request types shared by the REST client and the database wrapper
//!
//! A Math-Lock ciphertext is a 2x2 matrix whose four cells travel as strings.
//! The cells are opaque to the client: they are never parsed as numbers, only
//! moved between JSON bodies and the `{a,b,c,d}` literal stored in `mathlock`
//! columns.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{invalid_input, Result};

/// Encrypted number as returned by `/api/encrypt` and `/api/math`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    #[serde(deserialize_with = "text_or_number")]
    pub a: String,
    #[serde(deserialize_with = "text_or_number")]
    pub b: String,
    #[serde(deserialize_with = "text_or_number")]
    pub c: String,
    #[serde(deserialize_with = "text_or_number")]
    pub d: String,
}

impl Ciphertext {
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    /// Render as the `{a,b,c,d}` literal accepted by the `mathlock` column type
    pub fn to_literal(&self) -> String {
        format!("{{{},{},{},{}}}", self.a, self.b, self.c, self.d)
    }

    /// Parse a `mathlock` literal back into its four cells
    ///
    /// All braces are stripped and the remainder split on commas into at most
    /// five pieces; the first four are the cells.
    pub fn from_literal(literal: &str) -> Result<Self> {
        let stripped: String = literal.chars().filter(|c| *c != '{' && *c != '}').collect();
        let cells: Vec<&str> = stripped.splitn(5, ',').map(str::trim).collect();
        if cells.len() < 4 {
            return Err(invalid_input!(
                "mathlock literal {:?} has {} cells, expected 4",
                literal,
                cells.len()
            ));
        }
        Ok(Self::new(cells[0], cells[1], cells[2], cells[3]))
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

/// Arithmetic operation performed over two ciphertexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathOp {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl MathOp {
    /// All operations, in the order the demos run them
    pub const ALL: [MathOp; 4] = [
        MathOp::Multiplication,
        MathOp::Addition,
        MathOp::Division,
        MathOp::Subtraction,
    ];

    /// Tag sent as `ops_type`
    pub fn as_str(self) -> &'static str {
        match self {
            MathOp::Addition => "addition",
            MathOp::Subtraction => "subtraction",
            MathOp::Multiplication => "multiplication",
            MathOp::Division => "division",
        }
    }

    /// Operator the `mathlock` extension overloads for this operation
    pub fn sql_operator(self) -> &'static str {
        match self {
            MathOp::Addition => "+",
            MathOp::Subtraction => "-",
            MathOp::Multiplication => "*",
            MathOp::Division => "/",
        }
    }

    /// Same operation over plaintext, for checking results by hand
    pub fn apply_plain(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            MathOp::Addition => lhs + rhs,
            MathOp::Subtraction => lhs - rhs,
            MathOp::Multiplication => lhs * rhs,
            MathOp::Division => lhs / rhs,
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/math`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathRequest {
    pub num1: Ciphertext,
    pub num2: Ciphertext,
    pub ops_type: MathOp,
}

/// Decrypted plaintext returned by `/api/decrypt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decrypted {
    #[serde(deserialize_with = "text_or_number")]
    pub value: String,
}

/// Accept a JSON string or number and keep its text verbatim
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ciphertext {
        Ciphertext::new("1.25", "-3", "40000000001", "0.5")
    }

    #[test]
    fn test_literal_format() {
        assert_eq!(sample().to_literal(), "{1.25,-3,40000000001,0.5}");
        assert_eq!(sample().to_string(), sample().to_literal());
    }

    #[test]
    fn test_literal_roundtrip() {
        let ct = sample();
        assert_eq!(Ciphertext::from_literal(&ct.to_literal()).unwrap(), ct);
    }

    #[test]
    fn test_literal_with_spaces() {
        let ct = Ciphertext::from_literal("{ 1, 2 , 3,4 }").unwrap();
        assert_eq!(ct, Ciphertext::new("1", "2", "3", "4"));
    }

    #[test]
    fn test_literal_extra_cells_ignored() {
        // fifth piece keeps the rest of the string and is dropped
        let ct = Ciphertext::from_literal("{1,2,3,4,5,6}").unwrap();
        assert_eq!(ct, Ciphertext::new("1", "2", "3", "4"));
    }

    #[test]
    fn test_literal_too_short() {
        let err = Ciphertext::from_literal("{1,2,3}").unwrap_err();
        assert!(err.to_string().contains("expected 4"));
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let ct: Ciphertext =
            serde_json::from_str(r#"{"a": 1.5, "b": "2", "c": -7, "d": "x"}"#).unwrap();
        assert_eq!(ct, Ciphertext::new("1.5", "2", "-7", "x"));
    }

    #[test]
    fn test_deserialize_big_integer_verbatim() {
        let ct: Ciphertext = serde_json::from_str(
            r#"{"a": 123456789012345678901234567890, "b": "2", "c": 3, "d": -0.1000000000000000000001}"#,
        )
        .unwrap();
        assert_eq!(ct.a, "123456789012345678901234567890");
        assert_eq!(ct.c, "3");
        assert_eq!(ct.d, "-0.1000000000000000000001");
    }

    #[test]
    fn test_deserialize_rejects_null_cell() {
        let res = serde_json::from_str::<Ciphertext>(r#"{"a": null, "b": "2", "c": "3", "d": "4"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_ops_tags() {
        for (op, tag, sql) in [
            (MathOp::Addition, "addition", "+"),
            (MathOp::Subtraction, "subtraction", "-"),
            (MathOp::Multiplication, "multiplication", "*"),
            (MathOp::Division, "division", "/"),
        ] {
            assert_eq!(serde_json::to_value(op).unwrap(), serde_json::json!(tag));
            assert_eq!(op.as_str(), tag);
            assert_eq!(op.sql_operator(), sql);
        }
    }

    #[test]
    fn test_math_request_shape() {
        let req = MathRequest {
            num1: sample(),
            num2: Ciphertext::new("5", "6", "7", "8"),
            ops_type: MathOp::Division,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["ops_type"], "division");
        assert_eq!(value["num1"]["c"], "40000000001");
        assert_eq!(value["num2"]["d"], "8");
    }

    #[test]
    fn test_apply_plain() {
        assert_eq!(MathOp::Addition.apply_plain(15.5, 4.5), 20.0);
        assert_eq!(MathOp::Subtraction.apply_plain(15.5, 4.5), 11.0);
        assert_eq!(MathOp::Multiplication.apply_plain(1.5, 4.0), 6.0);
        assert_eq!(MathOp::Division.apply_plain(9.0, 4.0), 2.25);
    }
}
