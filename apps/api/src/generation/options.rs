//! Stylistic options for letter generation.
//!
//! Every option resolves to a fixed prompt fragment — a tone sentence, a
//! word-count band, a focus list. Unknown values are rejected at the serde
//! boundary; there is no free-form styling.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    #[default]
    Conversational,
    Technical,
}

impl Tone {
    /// The tone directive injected into the prompt.
    pub fn guidance(self) -> &'static str {
        match self {
            Tone::Formal => "Use formal language and traditional business writing style.",
            Tone::Conversational => "Maintain a professional but approachable tone.",
            Tone::Technical => {
                "Emphasize technical expertise and use industry-specific terminology."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    Technical,
    Leadership,
    Creativity,
    Growth,
}

impl FocusArea {
    pub fn label(self) -> &'static str {
        match self {
            FocusArea::Technical => "technical",
            FocusArea::Leadership => "leadership",
            FocusArea::Creativity => "creativity",
            FocusArea::Growth => "growth",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Concise,
    #[default]
    Standard,
    Detailed,
}

impl Length {
    /// Target word-count band for the letter body.
    pub fn word_band(self) -> &'static str {
        match self {
            Length::Concise => "250-300",
            Length::Standard => "300-400",
            Length::Detailed => "400-450",
        }
    }
}

/// Recognized generation options, all defaulted: conversational tone,
/// unconstrained focus, standard length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default, rename = "focusAreas")]
    pub focus_areas: Vec<FocusArea>,
    #[serde(default)]
    pub length: Length,
}

impl GenerationOptions {
    /// The focus directive: a comma-separated list, or "balanced" when
    /// unconstrained.
    pub fn focus_line(&self) -> String {
        if self.focus_areas.is_empty() {
            "balanced".to_string()
        } else {
            self.focus_areas
                .iter()
                .map(|area| area.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_conversational_standard_unconstrained() {
        let options = GenerationOptions::default();
        assert_eq!(options.tone, Tone::Conversational);
        assert_eq!(options.length, Length::Standard);
        assert!(options.focus_areas.is_empty());
        assert_eq!(options.focus_line(), "balanced");
    }

    #[test]
    fn test_options_deserialize_from_camel_case_json() {
        let options: GenerationOptions = serde_json::from_value(json!({
            "tone": "technical",
            "focusAreas": ["technical", "growth"],
            "length": "concise"
        }))
        .unwrap();
        assert_eq!(options.tone, Tone::Technical);
        assert_eq!(options.length, Length::Concise);
        assert_eq!(options.focus_line(), "technical, growth");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let options: GenerationOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, GenerationOptions::default());
    }

    #[test]
    fn test_unknown_tone_rejected() {
        let result: Result<GenerationOptions, _> =
            serde_json::from_value(json!({ "tone": "sarcastic" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_focus_area_rejected() {
        let result: Result<GenerationOptions, _> =
            serde_json::from_value(json!({ "focusAreas": ["charisma"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_word_bands() {
        assert_eq!(Length::Concise.word_band(), "250-300");
        assert_eq!(Length::Standard.word_band(), "300-400");
        assert_eq!(Length::Detailed.word_band(), "400-450");
    }
}
