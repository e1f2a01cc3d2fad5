//! Recommendation schema: the canonical outfit payload exchanged with the model,
//! returned to the UI and stored in `saved_outfits.outfit_json`.
//!
//! Parsing fails closed: unknown fields, missing fields and semantically empty
//! payloads are all rejected. There is no partial recommendation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::strip_json_fences;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed recommendation JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("recommendation title is empty")]
    MissingTitle,

    #[error("recommendation has no items")]
    NoItems,

    #[error("item {index} has an empty {field}")]
    BlankItemField { index: usize, field: &'static str },

    #[error("recommendation has no styling tips")]
    NoStylingTips,
}

/// A single garment or accessory in a look. No identity beyond its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutfitItem {
    pub category: String,
    #[serde(alias = "item")]
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// A complete styled look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OutfitRecommendation {
    pub title: String,
    pub description: String,
    pub items: Vec<OutfitItem>,
    pub styling_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
}

impl OutfitRecommendation {
    /// Strict parse of model (or client) text into a validated recommendation.
    /// Blank styling tips are dropped and the rest trimmed.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let mut recommendation: OutfitRecommendation =
            serde_json::from_str(strip_json_fences(text))?;
        recommendation.styling_tips = std::mem::take(&mut recommendation.styling_tips)
            .into_iter()
            .map(|tip| tip.trim().to_string())
            .filter(|tip| !tip.is_empty())
            .collect();
        recommendation.validate()?;
        Ok(recommendation)
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.title.trim().is_empty() {
            return Err(SchemaError::MissingTitle);
        }
        if self.items.is_empty() {
            return Err(SchemaError::NoItems);
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.category.trim().is_empty() {
                return Err(SchemaError::BlankItemField {
                    index,
                    field: "category",
                });
            }
            if item.name.trim().is_empty() {
                return Err(SchemaError::BlankItemField {
                    index,
                    field: "name",
                });
            }
            if item.description.trim().is_empty() {
                return Err(SchemaError::BlankItemField {
                    index,
                    field: "description",
                });
            }
        }
        if !self.styling_tips.iter().any(|tip| !tip.trim().is_empty()) {
            return Err(SchemaError::NoStylingTips);
        }
        Ok(())
    }

    /// Text handed to the image model: `"<title>. <category>: <name>, ..."`.
    pub fn image_description(&self) -> String {
        let items = self
            .items
            .iter()
            .map(|item| format!("{}: {}", item.category, item.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}. {}", self.title, items)
    }
}

/// Output schema declared to the model, in Gemini's OpenAPI-subset vocabulary.
/// `required` lists must stay in step with the serde types above.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "occasion": { "type": "STRING" },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "color": { "type": "STRING" },
                        "style": { "type": "STRING" }
                    },
                    "required": ["category", "name", "description"]
                }
            },
            "stylingTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["title", "description", "items", "stylingTips"]
    })
}

/// Schema for the trend list: a bare array of labels.
pub fn trends_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVIEW_LOOK: &str = r#"{
        "title": "Quiet Confidence",
        "description": "A pared-back navy look that reads polished without trying too hard.",
        "occasion": "Job Interview",
        "items": [
            {"category": "Top", "name": "Crisp white poplin shirt", "description": "Slim, no pocket.", "color": "white", "style": "minimalist"},
            {"category": "Bottom", "name": "Navy wool trousers", "description": "High rise, straight leg."},
            {"category": "Shoes", "name": "Black leather loafers", "description": "Polished, low profile."}
        ],
        "stylingTips": ["Keep jewelry to a single watch.", "Steam the shirt the night before."]
    }"#;

    #[test]
    fn test_full_recommendation_parses() {
        let rec = OutfitRecommendation::parse(INTERVIEW_LOOK).unwrap();
        assert_eq!(rec.title, "Quiet Confidence");
        assert_eq!(rec.items.len(), 3);
        assert_eq!(rec.items[0].color.as_deref(), Some("white"));
        assert!(rec.items[1].color.is_none());
        assert_eq!(rec.styling_tips.len(), 2);
        assert_eq!(rec.occasion.as_deref(), Some("Job Interview"));
    }

    #[test]
    fn test_item_alias_accepted() {
        let json = r#"{
            "title": "Weekend Ease",
            "description": "Relaxed layers.",
            "items": [{"category": "Outerwear", "item": "Chore jacket", "description": "Washed canvas."}],
            "stylingTips": ["Roll the sleeves once."]
        }"#;
        let rec = OutfitRecommendation::parse(json).unwrap();
        assert_eq!(rec.items[0].name, "Chore jacket");
        assert!(rec.occasion.is_none());
    }

    #[test]
    fn test_serializes_canonical_keys() {
        let rec = OutfitRecommendation::parse(INTERVIEW_LOOK).unwrap();
        let value = serde_json::to_value(&rec).unwrap();
        assert!(value.get("stylingTips").is_some());
        assert!(value.get("styling_tips").is_none());
        assert_eq!(value["items"][0]["name"], "Crisp white poplin shirt");
        assert!(value["items"][1].get("color").is_none());
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let json = r#"{"title": "No tips", "description": "d", "items": []}"#;
        assert!(matches!(
            OutfitRecommendation::parse(json),
            Err(SchemaError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_item_field_rejected() {
        let json = r#"{
            "title": "t", "description": "d",
            "items": [{"category": "Top", "name": "Tee"}],
            "stylingTips": ["x"]
        }"#;
        assert!(matches!(
            OutfitRecommendation::parse(json),
            Err(SchemaError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{
            "title": "t", "description": "d",
            "items": [{"category": "Top", "name": "Tee", "description": "x"}],
            "stylingTips": ["x"], "price": 100
        }"#;
        assert!(OutfitRecommendation::parse(json).is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let json = r#"{
            "title": "  ", "description": "d",
            "items": [{"category": "Top", "name": "Tee", "description": "x"}],
            "stylingTips": ["x"]
        }"#;
        assert!(matches!(
            OutfitRecommendation::parse(json),
            Err(SchemaError::MissingTitle)
        ));
    }

    #[test]
    fn test_empty_items_rejected() {
        let json = r#"{"title": "t", "description": "d", "items": [], "stylingTips": ["x"]}"#;
        assert!(matches!(
            OutfitRecommendation::parse(json),
            Err(SchemaError::NoItems)
        ));
    }

    #[test]
    fn test_blank_item_name_rejected() {
        let json = r#"{
            "title": "t", "description": "d",
            "items": [
                {"category": "Top", "name": "Tee", "description": "x"},
                {"category": "Shoes", "name": "", "description": "x"}
            ],
            "stylingTips": ["x"]
        }"#;
        match OutfitRecommendation::parse(json) {
            Err(SchemaError::BlankItemField { index, field }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "name");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_blank_item_description_rejected() {
        let json = r#"{
            "title": "t", "description": "d",
            "items": [{"category": "Top", "name": "Tee", "description": "   "}],
            "stylingTips": ["x"]
        }"#;
        match OutfitRecommendation::parse(json) {
            Err(SchemaError::BlankItemField { index, field }) => {
                assert_eq!(index, 0);
                assert_eq!(field, "description");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_blank_tips_dropped_from_mixed_list() {
        let json = r#"{
            "title": "t", "description": "d",
            "items": [{"category": "Top", "name": "Tee", "description": "x"}],
            "stylingTips": ["  Roll the sleeves ", "", "   "]
        }"#;
        let rec = OutfitRecommendation::parse(json).unwrap();
        assert_eq!(rec.styling_tips, ["Roll the sleeves"]);
    }

    #[test]
    fn test_blank_styling_tips_rejected() {
        let json = r#"{
            "title": "t", "description": "d",
            "items": [{"category": "Top", "name": "Tee", "description": "x"}],
            "stylingTips": [" "]
        }"#;
        assert!(matches!(
            OutfitRecommendation::parse(json),
            Err(SchemaError::NoStylingTips)
        ));
    }

    #[test]
    fn test_fenced_payload_accepted() {
        let fenced = format!("```json\n{INTERVIEW_LOOK}\n```");
        assert!(OutfitRecommendation::parse(&fenced).is_ok());
    }

    #[test]
    fn test_non_json_rejected() {
        assert!(OutfitRecommendation::parse("Sorry, I can't help with that.").is_err());
        assert!(OutfitRecommendation::parse("").is_err());
    }

    #[test]
    fn test_image_description_lists_items_in_order() {
        let rec = OutfitRecommendation::parse(INTERVIEW_LOOK).unwrap();
        assert_eq!(
            rec.image_description(),
            "Quiet Confidence. Top: Crisp white poplin shirt, Bottom: Navy wool trousers, Shoes: Black leather loafers"
        );
    }

    #[test]
    fn test_response_schema_required_fields() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, ["title", "description", "items", "stylingTips"]);
        assert_eq!(
            schema["properties"]["items"]["items"]["required"],
            serde_json::json!(["category", "name", "description"])
        );
    }
}
