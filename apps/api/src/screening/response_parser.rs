//! Model Response Parser: extracts the tagged-text fields from a raw model reply.
//!
//! Grammar (tags matched case-insensitively, first occurrence wins):
//! ```text
//! FIT_SCORE: <integer>
//! RISK_SCORE: <integer>
//! VERDICT: <single line>
//! REPORT:
//! <free-form body>
//! ```
//! Nothing here fails: a missing or malformed tag degrades to its fallback.
//! Scores are not range-checked.

use once_cell::sync::Lazy;
use regex::Regex;

/// Verdict used when the reply carries no usable `VERDICT:` line.
pub const NO_VERDICT: &str = "No verdict provided";

static FIT_SCORE_RE: Lazy<Regex> = Lazy::new(|| score_pattern("FIT_SCORE"));
static RISK_SCORE_RE: Lazy<Regex> = Lazy::new(|| score_pattern("RISK_SCORE"));
// [ \t]* rather than \s* so an empty verdict cannot swallow the next line.
static VERDICT_RE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)VERDICT:[ \t]*([^\r\n]*)"));
static REPORT_RE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)REPORT:"));

/// Structured fields pulled from one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub fit_score: Option<u32>,
    pub risk_score: Option<u32>,
    pub verdict: String,
    pub report: String,
}

/// Parses a raw model reply. Pure and stateless.
pub fn parse_reply(raw: &str) -> ParsedReply {
    ParsedReply {
        fit_score: extract_score(&FIT_SCORE_RE, raw),
        risk_score: extract_score(&RISK_SCORE_RE, raw),
        verdict: extract_verdict(raw),
        report: extract_report(raw),
    }
}

fn score_pattern(tag: &str) -> Regex {
    compile(&format!(r"(?i){tag}:\s*(\d+)"))
}

fn compile(pattern: &str) -> Regex {
    // Patterns are literals in this module; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid tag pattern {pattern:?}: {e}"))
}

/// Digits that overflow `u32` degrade to `None` like any other unparseable value.
fn extract_score(re: &Regex, raw: &str) -> Option<u32> {
    re.captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

fn extract_verdict(raw: &str) -> String {
    VERDICT_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(NO_VERDICT)
        .to_string()
}

fn extract_report(raw: &str) -> String {
    let Some(marker) = REPORT_RE.find(raw) else {
        // Fail open: never drop model output.
        return raw.to_string();
    };

    let rest = &raw[marker.end()..];
    match rest.find('\n') {
        Some(newline) => rest[newline + 1..].trim().to_string(),
        None => rest.trim().to_string(),
    }
}
