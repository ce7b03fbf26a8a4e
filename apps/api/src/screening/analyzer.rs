//! Batch Orchestrator: scores every submitted resume against one job description.
//!
//! Flow per non-blank resume, strictly in input order:
//!   build_prompt → model.invoke → parse_reply → AnalyzeResult
//!
//! A failed model call produces a degraded result for that candidate only;
//! it never aborts the batch and never fails the request.

use std::time::{Duration, Instant};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ValidationError;
use crate::llm_client::{LlmError, ModelInvoker};
use crate::screening::prompts::build_prompt;
use crate::screening::response_parser::{parse_reply, ParsedReply};

/// Verdict carried by a degraded result.
pub const ANALYSIS_FAILED_VERDICT: &str = "Analysis failed";

const MAX_SCORE: u32 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One candidate as submitted by the caller. `id` is a display label; uniqueness
/// is not enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// Request body for `POST /analyze`.
///
/// Both fields default to empty when absent or `null`, so that a missing
/// field surfaces as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub jd: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resumes: Vec<ResumeInput>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scored (or degraded) outcome for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub id: String,
    /// `None` when the reply had no parseable score; never defaulted to zero.
    pub fit_score: Option<u32>,
    pub risk_score: Option<u32>,
    pub verdict: String,
    pub report: String,
}

impl AnalyzeResult {
    fn parsed(id: &str, reply: ParsedReply) -> Self {
        Self {
            id: id.to_string(),
            fit_score: reply.fit_score,
            risk_score: reply.risk_score,
            verdict: reply.verdict,
            report: reply.report,
        }
    }

    fn degraded(id: &str, error: &LlmError) -> Self {
        Self {
            id: id.to_string(),
            fit_score: None,
            risk_score: None,
            verdict: ANALYSIS_FAILED_VERDICT.to_string(),
            report: format!("Error while analyzing this resume: {error}"),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.verdict == ANALYSIS_FAILED_VERDICT && self.fit_score.is_none()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Request-level gate. Runs before any model call.
pub fn validate(request: &AnalyzeRequest) -> Result<(), ValidationError> {
    if request.jd.trim().is_empty() {
        return Err(ValidationError::MissingJobDescription);
    }
    if request.resumes.is_empty() {
        return Err(ValidationError::NoResumes);
    }
    Ok(())
}

/// Validates the request, then analyzes each non-blank resume sequentially.
///
/// Returns one result per resume whose trimmed text is non-empty, in input order.
/// Only validation can make this fail.
pub async fn analyze(
    request: &AnalyzeRequest,
    model: &dyn ModelInvoker,
    timeout: Duration,
) -> Result<Vec<AnalyzeResult>, ValidationError> {
    validate(request)?;

    let mut results = Vec::with_capacity(request.resumes.len());

    for resume in &request.resumes {
        if resume.text.trim().is_empty() {
            debug!(candidate = %resume.id, "Skipping resume with blank text");
            continue;
        }
        results.push(analyze_one(&request.jd, resume, model, timeout).await);
    }

    let degraded = results.iter().filter(|r| r.is_degraded()).count();
    info!(
        "Analyzed {} of {} submitted resumes ({} degraded)",
        results.len(),
        request.resumes.len(),
        degraded
    );

    Ok(results)
}

async fn analyze_one(
    jd: &str,
    resume: &ResumeInput,
    model: &dyn ModelInvoker,
    timeout: Duration,
) -> AnalyzeResult {
    let prompt = build_prompt(jd, &resume.text);
    let started = Instant::now();

    match model.invoke(&prompt, timeout).await {
        Ok(reply) => {
            debug!(candidate = %resume.id, raw_reply = %reply, "Model reply received");

            let parsed = parse_reply(&reply);
            warn_out_of_range(&resume.id, "fit", parsed.fit_score);
            warn_out_of_range(&resume.id, "risk", parsed.risk_score);
            info!(
                candidate = %resume.id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                fit_score = ?parsed.fit_score,
                risk_score = ?parsed.risk_score,
                "Resume analyzed"
            );

            AnalyzeResult::parsed(&resume.id, parsed)
        }
        Err(e) => {
            warn!(
                candidate = %resume.id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Resume analysis failed: {e}"
            );
            AnalyzeResult::degraded(&resume.id, &e)
        }
    }
}

/// Scores are passed through as the model emitted them; out-of-range values are only logged.
fn warn_out_of_range(candidate: &str, kind: &str, score: Option<u32>) {
    if let Some(score) = score.filter(|s| *s > MAX_SCORE) {
        warn!(candidate, "Model returned {kind} score {score} outside 0-{MAX_SCORE}");
    }
}
