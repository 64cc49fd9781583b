// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Closing instruction for prompts that expect a single JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Respond ONLY in this exact JSON format (no markdown, no commentary):";

/// Opening line for prompts that act on behalf of a recruiter.
pub const RECRUITER_PERSONA: &str = "You are an expert technical recruiter.";
