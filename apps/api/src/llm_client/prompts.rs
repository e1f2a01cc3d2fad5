// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Persona shared by every stylist-facing call.
pub const STYLIST_PERSONA: &str = "You are a world-class, high-end fashion stylist. \
    You give concrete, wearable advice tailored to the person in front of you.";

/// Appended to every structured-output call.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with JSON only, matching the declared response schema exactly. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences.";
