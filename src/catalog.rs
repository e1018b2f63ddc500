//! Fixed selections offered to the user
//!
//! Templates, output languages, duration buckets and input modes are closed,
//! enumerated sets. Every language carries its own spoken-pace constant so the
//! duration calculator never has to guess a rate.

use crate::error::{Result, ReelscriptError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Duration id that selects a user-supplied number of minutes
pub const CUSTOM_DURATION_ID: &str = "custom";

/// A structural pattern the backend follows when shaping a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Stable identifier used on the command line and in config
    pub id: &'static str,
    /// Display title, also recorded in history
    pub title: &'static str,
    /// One-line description for listings
    pub description: &'static str,
    /// Emoji shown next to the title
    pub icon: &'static str,
    /// Structural guidance handed to the backend
    #[serde(skip)]
    pub guidance: &'static str,
}

/// A supported output language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// ISO-ish language id ("vi", "en", ...)
    pub id: &'static str,
    /// Native display label
    pub label: &'static str,
    /// Name used inside prompts
    pub prompt_name: &'static str,
    /// Characters spoken per minute at a natural narration pace
    pub chars_per_minute: u32,
}

/// A predefined target duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationOption {
    /// Identifier ("short", "medium", ..., "custom")
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// Fixed length in minutes; `None` for the custom bucket
    pub minutes: Option<u32>,
}

impl DurationOption {
    /// Whether this is the bucket that takes its minutes from the user
    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_DURATION_ID
    }
}

/// Script styles, in display order
pub const TEMPLATES: &[Template] = &[
    Template {
        id: "storytelling",
        title: "Storytelling",
        description: "Narrative arc with a hook, rising tension and a payoff",
        icon: "📖",
        guidance: "Open with a hook in the first sentence. Introduce a character or situation, \
build tension through a sequence of events, reach a turning point, and close with a payoff \
and a short takeaway for the viewer.",
    },
    Template {
        id: "listicle",
        title: "Top List",
        description: "Numbered list of points, each with a punchy explanation",
        icon: "🔢",
        guidance: "Start with a one-sentence promise of what the viewer will learn. Present the \
content as a numbered list of points, each introduced by its number and followed by a short, \
concrete explanation or example. End with a one-line recap and a call to action.",
    },
    Template {
        id: "explainer",
        title: "Explainer",
        description: "Break a topic down step by step for a general audience",
        icon: "💡",
        guidance: "Pose the central question up front. Explain the idea step by step, moving from \
simple to detailed, using everyday analogies. Address one common misconception. Finish with a \
clear summary of the key insight.",
    },
    Template {
        id: "review",
        title: "Review",
        description: "Balanced verdict with strengths, weaknesses and a recommendation",
        icon: "⭐",
        guidance: "Introduce what is being reviewed and who it is for. Cover strengths, then \
weaknesses, with specific observations for each. Compare briefly with alternatives and close \
with a clear verdict and recommendation.",
    },
    Template {
        id: "news",
        title: "News Recap",
        description: "Tight summary of what happened, why it matters and what is next",
        icon: "📰",
        guidance: "Lead with the single most important fact. Answer what happened, who is \
involved, when and where. Explain why it matters to the viewer, then what is likely to happen \
next. Keep a neutral, factual tone.",
    },
    Template {
        id: "motivational",
        title: "Motivational",
        description: "Emotional, energetic talk that ends with a call to action",
        icon: "🔥",
        guidance: "Open with a relatable struggle. Build emotion through short, rhythmic \
sentences and a concrete example of someone overcoming it. Deliver one memorable line and end \
with a direct call to action.",
    },
];

/// Output languages with their narration speed in characters per minute
pub const LANGUAGES: &[Language] = &[
    Language {
        id: "vi",
        label: "Tiếng Việt",
        prompt_name: "Vietnamese",
        chars_per_minute: 800,
    },
    Language {
        id: "en",
        label: "English",
        prompt_name: "English",
        chars_per_minute: 850,
    },
    Language {
        id: "ja",
        label: "日本語",
        prompt_name: "Japanese",
        chars_per_minute: 350,
    },
    Language {
        id: "ko",
        label: "한국어",
        prompt_name: "Korean",
        chars_per_minute: 450,
    },
    Language {
        id: "zh",
        label: "中文",
        prompt_name: "Chinese (Simplified)",
        chars_per_minute: 250,
    },
    Language {
        id: "es",
        label: "Español",
        prompt_name: "Spanish",
        chars_per_minute: 900,
    },
    Language {
        id: "fr",
        label: "Français",
        prompt_name: "French",
        chars_per_minute: 850,
    },
    Language {
        id: "de",
        label: "Deutsch",
        prompt_name: "German",
        chars_per_minute: 800,
    },
];

/// Length presets; the `custom` entry takes its minutes from the caller
pub const DURATIONS: &[DurationOption] = &[
    DurationOption {
        id: "short",
        label: "~1 min (Shorts/Reels)",
        minutes: Some(1),
    },
    DurationOption {
        id: "medium",
        label: "~3 min",
        minutes: Some(3),
    },
    DurationOption {
        id: "long",
        label: "~5 min",
        minutes: Some(5),
    },
    DurationOption {
        id: "extended",
        label: "~10 min",
        minutes: Some(10),
    },
    DurationOption {
        id: CUSTOM_DURATION_ID,
        label: "Custom",
        minutes: None,
    },
];

/// Look up a template by id
pub fn find_template(id: &str) -> Result<&'static Template> {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| unknown("template", id, TEMPLATES.iter().map(|t| t.id)))
}

/// Look up a language by id
pub fn find_language(id: &str) -> Result<&'static Language> {
    LANGUAGES
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| unknown("language", id, LANGUAGES.iter().map(|l| l.id)))
}

/// Look up a duration bucket by id
pub fn find_duration(id: &str) -> Result<&'static DurationOption> {
    DURATIONS
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| unknown("duration", id, DURATIONS.iter().map(|d| d.id)))
}

fn unknown<'a>(kind: &str, id: &str, valid: impl Iterator<Item = &'a str>) -> anyhow::Error {
    let valid: Vec<&str> = valid.collect();
    ReelscriptError::Config(format!(
        "Unknown {} id: {}. Must be one of: {}",
        kind,
        id,
        valid.join(", ")
    ))
    .into()
}

/// How the raw input should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Freeform idea or topic to expand into a script
    #[default]
    Idea,
    /// Source text to rewrite as a script
    Text,
    /// Link to an article or video the backend should adapt
    Link,
}

impl InputMode {
    /// Parse an input mode from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::catalog::InputMode;
    ///
    /// assert_eq!(InputMode::parse_str("LINK").unwrap(), InputMode::Link);
    /// assert!(InputMode::parse_str("video").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "idea" => Ok(Self::Idea),
            "text" => Ok(Self::Text),
            "link" | "url" => Ok(Self::Link),
            other => Err(format!(
                "Invalid input mode: {}. Must be one of: idea, text, link",
                other
            )),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idea => write!(f, "idea"),
            Self::Text => write!(f, "text"),
            Self::Link => write!(f, "link"),
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let t: HashSet<_> = TEMPLATES.iter().map(|t| t.id).collect();
        assert_eq!(t.len(), TEMPLATES.len());
        let l: HashSet<_> = LANGUAGES.iter().map(|l| l.id).collect();
        assert_eq!(l.len(), LANGUAGES.len());
        let d: HashSet<_> = DURATIONS.iter().map(|d| d.id).collect();
        assert_eq!(d.len(), DURATIONS.len());
    }

    #[test]
    fn test_every_language_has_positive_rate() {
        for lang in LANGUAGES {
            assert!(lang.chars_per_minute > 0, "{} has no rate", lang.id);
        }
    }

    #[test]
    fn test_only_custom_bucket_lacks_minutes() {
        for d in DURATIONS {
            assert_eq!(d.minutes.is_none(), d.is_custom(), "bucket {}", d.id);
        }
    }

    #[test]
    fn test_find_template_known_and_unknown() {
        assert_eq!(find_template("listicle").unwrap().title, "Top List");
        let err = find_template("haiku").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReelscriptError>(),
            Some(ReelscriptError::Config(_))
        ));
        assert!(err.to_string().contains("storytelling"));
    }

    #[test]
    fn test_find_language_unknown_is_config_error() {
        let err = find_language("xx").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReelscriptError>(),
            Some(ReelscriptError::Config(_))
        ));
    }

    #[test]
    fn test_find_duration_custom() {
        assert!(find_duration("custom").unwrap().is_custom());
        assert_eq!(find_duration("medium").unwrap().minutes, Some(3));
    }

    #[test]
    fn test_input_mode_parse_and_display() {
        for mode in [InputMode::Idea, InputMode::Text, InputMode::Link] {
            assert_eq!(InputMode::parse_str(&mode.to_string()).unwrap(), mode);
        }
        assert_eq!("url".parse::<InputMode>().unwrap(), InputMode::Link);
        assert_eq!(InputMode::default(), InputMode::Idea);
    }
}
