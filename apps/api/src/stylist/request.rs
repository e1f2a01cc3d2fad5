//! Style requests: what the UI sends, and the validated context the adapter consumes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::llm_client::InlineData;
use crate::models::user::UserProfile;
use crate::stylist::StylistError;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// An uploaded photo, base64-encoded. `data` may be a full `data:` URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    #[serde(default, alias = "mimeType")]
    pub mime_type: Option<String>,
    pub data: String,
}

impl ImageUpload {
    /// Validates the upload and converts it to an inline model part.
    pub fn into_inline(self) -> Result<InlineData, StylistError> {
        let (url_mime, data) = split_data_url(&self.data);
        let mime_type = self
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .or(url_mime)
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());

        if !mime_type.starts_with("image/") {
            return Err(StylistError::InvalidRequest(format!(
                "Unsupported upload type '{mime_type}'; please upload an image"
            )));
        }

        let data = data.trim();
        let decoded = STANDARD
            .decode(data)
            .map_err(|_| StylistError::InvalidRequest("Image data is not valid base64".into()))?;
        if decoded.is_empty() {
            return Err(StylistError::InvalidRequest("Image data is empty".into()));
        }

        Ok(InlineData {
            mime_type,
            data: data.to_string(),
        })
    }

    /// Wraps raw file bytes, as received from a multipart upload.
    pub fn from_bytes(mime_type: Option<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type,
            data: STANDARD.encode(bytes),
        }
    }
}

/// Splits `data:image/png;base64,AAAA` into its mime type and payload.
/// Plain base64 passes through untouched.
fn split_data_url(data: &str) -> (Option<String>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header.split(';').next().unwrap_or_default();
            let mime = (!mime.is_empty()).then(|| mime.to_string());
            (mime, payload)
        }
        None => (None, data),
    }
}

/// Request body for `POST /api/recommendations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleRequest {
    #[serde(default, alias = "stylePreference")]
    pub style_preference: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Free-text question or extra context.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image: Option<ImageUpload>,
    /// When set, the stored profile fills in style preference and body type.
    #[serde(default, alias = "userId")]
    pub user_id: Option<i64>,
    /// Chain an outfit image render after the recommendation.
    #[serde(default, alias = "includeImage")]
    pub include_image: bool,
}

/// Validated, normalized input for one recommendation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleContext {
    pub style_preference: Option<String>,
    pub body_type: Option<String>,
    pub occasion: Option<String>,
    pub weather: Option<String>,
    pub gender: Option<String>,
    pub notes: Option<String>,
    pub image: Option<InlineData>,
}

impl StyleContext {
    /// True when any free-text field a stylist can work from is present.
    pub fn has_text(&self) -> bool {
        self.style_preference.is_some() || self.occasion.is_some() || self.notes.is_some()
    }

    /// Refuses a context with neither free text nor an image.
    pub fn ensure_has_input(&self) -> Result<(), StylistError> {
        if self.has_text() || self.image.is_some() {
            Ok(())
        } else {
            Err(StylistError::InvalidRequest(
                "Please describe your style or occasion, or upload a photo first".into(),
            ))
        }
    }
}

impl StyleRequest {
    /// Normalizes blanks away, folds in the stored profile, decodes any image and
    /// checks that there is something to style.
    pub fn into_context(self, profile: Option<&UserProfile>) -> Result<StyleContext, StylistError> {
        let style_preference = non_blank(self.style_preference)
            .or_else(|| profile.and_then(|p| non_blank(Some(p.style_preference.clone()))));
        let body_type = profile.and_then(|p| non_blank(Some(p.body_type.clone())));

        let image = self.image.map(ImageUpload::into_inline).transpose()?;

        let context = StyleContext {
            style_preference,
            body_type,
            occasion: non_blank(self.occasion),
            weather: non_blank(self.weather),
            gender: non_blank(self.gender),
            notes: non_blank(self.notes),
            image,
        };
        context.ensure_has_input()?;
        Ok(context)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
