// Shared prompt fragments. Each service that needs generation defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt so that responses stay within what the quiz can support.
pub const GROUNDING_INSTRUCTION: &str = "\
    Base every recommendation on the quiz answers provided. \
    Only suggest real, widely available products. \
    Do NOT give medical diagnoses; keep advice at the level of general skincare guidance.";
