// Prompt Builder for resume screening.
// The tag names below are the contract with `response_parser`; change them together.

pub const JD_START: &str = "=== JOB DESCRIPTION START ===";
pub const JD_END: &str = "=== JOB DESCRIPTION END ===";
pub const RESUME_START: &str = "=== RESUME START ===";
pub const RESUME_END: &str = "=== RESUME END ===";

/// Persona, scoring criteria and output-format contract. Precedes the delimited inputs.
pub const SCREENING_INSTRUCTIONS: &str = r#"You are a senior technical recruiter and hiring manager screening candidates for the role below.
Judge the resume strictly against the job description. Be skeptical: do not reward buzzwords without evidence.

SCORING CRITERIA:
- FIT_SCORE (0-10): how well the candidate's demonstrated experience matches the role's requirements.
  10 = meets or exceeds every core requirement with concrete evidence; 0 = no relevant experience.
- RISK_SCORE (0-10): how likely the resume overstates the candidate's real experience.
  Look for vague claims, buzzword stuffing, implausible timelines, shallow project descriptions,
  and titles that do not match described responsibilities. 10 = very likely embellished; 0 = fully credible.

OUTPUT FORMAT (follow EXACTLY, one tag per line, in this order):
FIT_SCORE: <integer 0-10>
RISK_SCORE: <integer 0-10>
VERDICT: <one line summary of your recommendation>
REPORT:
Alignment: <where the resume matches the role>
Gaps: <required skills or experience that are missing>
Red Flags: <signs of embellishment or shallow experience>
Verdict: <final recommendation with reasoning>

Do NOT add any text before FIT_SCORE. Do NOT wrap the answer in code fences."#;

/// Renders the screening prompt for one resume.
///
/// Both inputs are interpolated verbatim; neither is escaped nor re-scanned,
/// so text that looks like a marker or placeholder is passed through untouched.
pub fn build_prompt(jd_text: &str, resume_text: &str) -> String {
    format!(
        "{SCREENING_INSTRUCTIONS}\n\n\
         {JD_START}\n{jd_text}\n{JD_END}\n\n\
         {RESUME_START}\n{resume_text}\n{RESUME_END}\n"
    )
}
