// Shared prompt constants.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that keeps the model on the tagged-text output channel.
pub const TAGGED_TEXT_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond in plain text using exactly the tag lines requested by the user. \
    Do NOT respond with JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies outside the requested format.";
