use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::domain::RiskLevel;

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("valid url regex"));

const PHISHING_INDICATORS: [&str; 3] = [
    "Suspicious language or urgency detected",
    "Sender domain mismatch likely",
    "Potential malicious links",
];
const SAFE_INDICATORS: [&str; 2] = ["No strong phishing indicators", "Content appears safe"];

pub const NO_URLS: &str = "No URLs found in message";
pub const EMPTY_SUBJECT: &str = "—";
pub const EMPTY_BODY_MARKUP: &str = "<em class='muted'>No body</em>";

/// Everything the verdict panel shows for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictView {
    pub risk: RiskLevel,
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub preview_subject: String,
    /// Escaped markup, safe to insert as HTML.
    pub preview_body: String,
    pub percent: i64,
    pub risk_text: String,
    pub bar_width: String,
    pub indicators: Vec<String>,
    pub domains: Vec<String>,
}

pub fn render_verdict(
    verdict: &str,
    subject: &str,
    body: &str,
    confidence: Option<f64>,
) -> VerdictView {
    let risk = RiskLevel::from_verdict(verdict);
    let percent = match confidence {
        Some(value) => (value * 100.0).round() as i64,
        None => risk.default_percent(),
    };

    let indicators: &[&str] = match risk {
        RiskLevel::Phishing => &PHISHING_INDICATORS,
        RiskLevel::Safe => &SAFE_INDICATORS,
    };

    VerdictView {
        risk,
        badge: risk.label().to_string(),
        title: verdict.to_string(),
        subtitle: format!("Confidence: {percent}%"),
        preview_subject: if subject.is_empty() {
            EMPTY_SUBJECT.to_string()
        } else {
            subject.to_string()
        },
        preview_body: if body.is_empty() {
            EMPTY_BODY_MARKUP.to_string()
        } else {
            escape_body(body)
        },
        percent,
        risk_text: format!("{percent}%"),
        bar_width: format!("{percent}%"),
        indicators: indicators.iter().map(|s| s.to_string()).collect(),
        domains: extract_domains(body),
    }
}

/// Neutralises angle brackets and turns newlines into `<br>`.
pub fn escape_body(body: &str) -> String {
    let mut escaped = String::with_capacity(body.len());
    for ch in body.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' => escaped.push_str("<br>"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Hosts of every http(s) link in `body`, or the raw match when it does not
/// parse. Presentation only; nothing here validates the links.
pub fn extract_domains(body: &str) -> Vec<String> {
    let domains: Vec<String> = URL_REGEX
        .find_iter(body)
        .map(|m| {
            Url::parse(m.as_str())
                .ok()
                .and_then(|url| url.host_str().map(str::to_string))
                .unwrap_or_else(|| m.as_str().to_string())
        })
        .collect();

    if domains.is_empty() {
        vec![NO_URLS.to_string()]
    } else {
        domains
    }
}
