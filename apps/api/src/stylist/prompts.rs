// All prompt text for the stylist module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, STYLIST_PERSONA};
use crate::stylist::request::StyleContext;

/// Weather assumed when the user gives none.
pub const DEFAULT_WEATHER: &str = "mild";

/// Aspect ratio requested for outfit renders.
pub const IMAGE_ASPECT_RATIO: &str = "3:4";

/// Most trend labels ever returned.
pub const MAX_TRENDS: usize = 5;

const RECOMMENDATION_INSTRUCTION: &str = "\
    Generate one personalized outfit recommendation from the user's context. \
    Every item needs a category (e.g. Top, Bottom, Shoes, Outerwear, Accessories), \
    a specific name and a one-sentence description; add color and style when they help. \
    Give at least two practical styling tips.";

/// Recommendation prompt. Replace `{image_instruction}` first, then `{context}`.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = "\
Generate a complete outfit recommendation for the following context:
{context}
{image_instruction}
Provide a cohesive look including top, bottom, shoes, and accessories.";

const IMAGE_INSTRUCTION: &str =
    "A photo from the user is attached. Build the look around the garments, colors or features it shows.\n";

/// Outfit render prompt. Replace `{description}`.
pub const IMAGE_PROMPT_TEMPLATE: &str = "\
A high-end fashion editorial photograph of a complete outfit: {description}. \
The style should be elegant, professional lighting, clean background, high fashion aesthetic. \
Show the full outfit clearly.";

pub const TRENDS_PROMPT: &str = "What are the top 5 fashion trends for the current season? \
    Provide a list of short, catchy trend names.";

pub fn recommendation_system() -> String {
    format!("{STYLIST_PERSONA} {RECOMMENDATION_INSTRUCTION} {JSON_ONLY_INSTRUCTION}")
}

pub fn trends_system() -> String {
    format!("{STYLIST_PERSONA} {JSON_ONLY_INSTRUCTION}")
}

/// Renders the user turn for a recommendation call. Absent fields are omitted,
/// except weather which falls back to [`DEFAULT_WEATHER`].
pub fn build_recommendation_prompt(context: &StyleContext) -> String {
    let mut lines = Vec::new();
    if let Some(gender) = &context.gender {
        lines.push(format!("- Dressing for: {gender}"));
    }
    if let Some(style) = &context.style_preference {
        lines.push(format!("- User Style Preferences: {style}"));
    }
    if let Some(body_type) = &context.body_type {
        lines.push(format!("- Body Type / Fit: {body_type}"));
    }
    if let Some(occasion) = &context.occasion {
        lines.push(format!("- Occasion: {occasion}"));
    }
    lines.push(format!(
        "- Current Weather / Location: {}",
        context.weather.as_deref().unwrap_or(DEFAULT_WEATHER)
    ));
    if let Some(notes) = &context.notes {
        lines.push(format!("- Additional Notes: {notes}"));
    }

    let image_instruction = if context.image.is_some() {
        IMAGE_INSTRUCTION
    } else {
        ""
    };

    RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{image_instruction}", image_instruction)
        .replace("{context}", &lines.join("\n"))
}

pub fn build_image_prompt(description: &str) -> String {
    IMAGE_PROMPT_TEMPLATE.replace("{description}", description.trim())
}
