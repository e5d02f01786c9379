use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

pub const NO_RESULT: &str = "No result";

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("valid float regex")
});

/// Payload returned by the prediction endpoint.
///
/// Fields are kept as raw JSON values because the endpoint is loose about
/// types: `confidence` may arrive as a number or a numeric string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub result: Option<Value>,
    pub confidence: Option<Value>,
    pub error: Option<Value>,
}

impl ClassificationResult {
    /// Reads the known fields off a JSON object. Any other JSON value is a
    /// payload without fields.
    pub fn from_payload(payload: Value) -> Self {
        let Value::Object(mut fields) = payload else {
            return Self::default();
        };
        let mut take = |key: &str| fields.remove(key).filter(|value| !value.is_null());
        Self {
            result: take("result"),
            confidence: take("confidence"),
            error: take("error"),
        }
    }

    pub fn server_error(&self) -> Option<String> {
        self.error.as_ref().and_then(truthy_text)
    }

    pub fn verdict(&self) -> String {
        self.result
            .as_ref()
            .and_then(truthy_text)
            .unwrap_or_else(|| NO_RESULT.to_string())
    }

    /// Zero, NaN and unparsable values count as "not supplied".
    pub fn confidence(&self) -> Option<f64> {
        let value = match self.confidence.as_ref()? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => parse_leading_float(s)?,
            _ => return None,
        };
        (value != 0.0 && !value.is_nan()).then_some(value)
    }
}

/// Reads the number at the start of `text`, ignoring whatever follows it.
fn parse_leading_float(text: &str) -> Option<f64> {
    let number = LEADING_FLOAT.find(text.trim_start())?;
    number.as_str().parse::<f64>().ok()
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Phishing,
    Safe,
}

impl RiskLevel {
    pub fn from_verdict(verdict: &str) -> Self {
        if verdict.to_lowercase().contains("phish") {
            RiskLevel::Phishing
        } else {
            RiskLevel::Safe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Phishing => "Phishing",
            RiskLevel::Safe => "Safe",
        }
    }

    /// Placeholder percentage used when the endpoint gave no confidence.
    pub fn default_percent(&self) -> i64 {
        match self {
            RiskLevel::Phishing => 87,
            RiskLevel::Safe => 12,
        }
    }
}
