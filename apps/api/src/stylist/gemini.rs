use async_trait::async_trait;

use crate::llm_client::{InlineData, LlmClient, Prompt};
use crate::stylist::prompts::{
    build_image_prompt, build_recommendation_prompt, recommendation_system, trends_system,
    IMAGE_ASPECT_RATIO, MAX_TRENDS, TRENDS_PROMPT,
};
use crate::stylist::request::StyleContext;
use crate::stylist::schema::{response_schema, trends_schema, OutfitRecommendation};
use crate::stylist::{Stylist, StylistError};

/// Production stylist backed by Gemini. Holds no state between calls.
pub struct GeminiStylist {
    llm: LlmClient,
}

impl GeminiStylist {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Stylist for GeminiStylist {
    async fn recommend(
        &self,
        context: &StyleContext,
    ) -> Result<OutfitRecommendation, StylistError> {
        context.ensure_has_input()?;

        let system = recommendation_system();
        let text = build_recommendation_prompt(context);
        let prompt = Prompt {
            system: Some(&system),
            text: &text,
            image: context.image.as_ref(),
        };

        let raw = self
            .llm
            .generate_json_text(prompt, &response_schema())
            .await
            .map_err(|e| StylistError::Unavailable(format!("recommendation call failed: {e}")))?;

        let mut recommendation = OutfitRecommendation::parse(&raw)
            .map_err(|e| StylistError::Unavailable(format!("recommendation rejected: {e}")))?;

        if recommendation.occasion.is_none() {
            recommendation.occasion = context.occasion.clone();
        }
        Ok(recommendation)
    }

    async fn render_image(&self, description: &str) -> Result<Option<InlineData>, StylistError> {
        if description.trim().is_empty() {
            return Err(StylistError::InvalidRequest(
                "An outfit description is required to render an image".into(),
            ));
        }

        let text = build_image_prompt(description);
        self.llm
            .generate_image(Prompt::text(&text), IMAGE_ASPECT_RATIO)
            .await
            .map_err(|e| StylistError::Unavailable(format!("image render failed: {e}")))
    }

    async fn trends(&self) -> Result<Vec<String>, StylistError> {
        let system = trends_system();
        let prompt = Prompt {
            system: Some(&system),
            text: TRENDS_PROMPT,
            image: None,
        };

        let labels: Vec<String> = self
            .llm
            .generate_json(prompt, &trends_schema())
            .await
            .map_err(|e| StylistError::Unavailable(format!("trend fetch failed: {e}")))?;

        Ok(labels
            .into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .take(MAX_TRENDS)
            .collect())
    }
}
