// Resume screening pipeline.
// Implements: prompt building, tagged-text reply parsing, sequential batch analysis.
// All model calls go through llm_client; no direct Anthropic calls here.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod response_parser;
