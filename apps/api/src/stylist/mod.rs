//! Stylist: the AI adapter. Turns a style context into a validated outfit
//! recommendation, optionally renders it as an image, and fetches trend labels.
//!
//! `AppState` holds an `Arc<dyn Stylist>`; production uses `GeminiStylist`.
//! All model calls go through llm_client; nothing here speaks HTTP.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::InlineData;

pub mod gemini;
pub mod handlers;
pub mod prompts;
pub mod request;
pub mod schema;

pub use gemini::GeminiStylist;
use request::StyleContext;
use schema::OutfitRecommendation;

/// Every adapter failure collapses into one of two kinds: the request was
/// refused before any call, or the recommendation is unavailable.
#[derive(Debug, Error)]
pub enum StylistError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("recommendation unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Stylist: Send + Sync {
    /// One model call producing a schema-valid recommendation.
    async fn recommend(
        &self,
        context: &StyleContext,
    ) -> Result<OutfitRecommendation, StylistError>;

    /// One image-model call. `Ok(None)` when the model returned no image part.
    async fn render_image(&self, description: &str) -> Result<Option<InlineData>, StylistError>;

    /// One model call for current trend labels.
    async fn trends(&self) -> Result<Vec<String>, StylistError>;
}

/// A recommendation plus its optional render, as returned to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct Look {
    pub recommendation: OutfitRecommendation,
    /// `data:` URL of the rendered outfit, if one was requested and produced.
    pub image: Option<String>,
}

/// Recommends a look and, when asked, renders it afterwards from the
/// recommendation's own items. A failed render never fails the look.
pub async fn generate_look(
    stylist: &dyn Stylist,
    context: &StyleContext,
    include_image: bool,
) -> Result<Look, StylistError> {
    context.ensure_has_input()?;

    let recommendation = stylist.recommend(context).await?;
    info!(
        "Generated look '{}' with {} items",
        recommendation.title,
        recommendation.items.len()
    );

    let image = if include_image {
        match stylist
            .render_image(&recommendation.image_description())
            .await
        {
            Ok(image) => image.map(|i| i.to_data_url()),
            Err(e) => {
                warn!("Outfit image render failed, returning look without image: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(Look {
        recommendation,
        image,
    })
}

/// Current trend labels. Any failure degrades to an empty list.
pub async fn current_trends(stylist: &dyn Stylist) -> Vec<String> {
    match stylist.trends().await {
        Ok(trends) => trends,
        Err(e) => {
            warn!("Trend fetch failed, serving no trends: {e}");
            Vec::new()
        }
    }
}

/// Scriptable stand-in used by handler and pipeline tests.
#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{Stylist, StylistError};
    use crate::llm_client::InlineData;
    use crate::stylist::request::StyleContext;
    use crate::stylist::schema::OutfitRecommendation;

    pub const LOOK_JSON: &str = r#"{
        "title": "Sharp Minimal",
        "description": "Clean lines in a tight palette.",
        "occasion": "Job Interview",
        "items": [
            {"category": "Top", "name": "Black merino crewneck", "description": "Fine gauge."},
            {"category": "Bottom", "name": "Charcoal tailored trousers", "description": "Tapered."}
        ],
        "stylingTips": ["Match belt and shoes.", "Skip the logo."]
    }"#;

    pub fn look() -> OutfitRecommendation {
        OutfitRecommendation::parse(LOOK_JSON).unwrap()
    }

    pub struct FakeStylist {
        pub recommend_fails: bool,
        pub image: Option<InlineData>,
        pub image_fails: bool,
        pub trends: Option<Vec<String>>,
        pub recommend_calls: AtomicUsize,
        pub image_calls: AtomicUsize,
    }

    impl Default for FakeStylist {
        fn default() -> Self {
            Self {
                recommend_fails: false,
                image: Some(InlineData {
                    mime_type: "image/png".into(),
                    data: "iVBORw0K".into(),
                }),
                image_fails: false,
                trends: Some(vec!["Quiet luxury".into(), "Sheer layers".into()]),
                recommend_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            }
        }
    }

    impl FakeStylist {
        pub fn recommend_calls(&self) -> usize {
            self.recommend_calls.load(Ordering::SeqCst)
        }

        pub fn image_calls(&self) -> usize {
            self.image_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Stylist for FakeStylist {
        async fn recommend(
            &self,
            context: &StyleContext,
        ) -> Result<OutfitRecommendation, StylistError> {
            self.recommend_calls.fetch_add(1, Ordering::SeqCst);
            if self.recommend_fails {
                return Err(StylistError::Unavailable("stub outage".into()));
            }
            let mut rec = look();
            if let Some(occasion) = &context.occasion {
                rec.occasion = Some(occasion.clone());
            }
            Ok(rec)
        }

        async fn render_image(
            &self,
            _description: &str,
        ) -> Result<Option<InlineData>, StylistError> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            if self.image_fails {
                return Err(StylistError::Unavailable("image model down".into()));
            }
            Ok(self.image.clone())
        }

        async fn trends(&self) -> Result<Vec<String>, StylistError> {
            self.trends
                .clone()
                .ok_or_else(|| StylistError::Unavailable("trends down".into()))
        }
    }
}
