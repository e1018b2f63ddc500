//! Generation prompts
//!
//! Renders the system instruction and user message sent to the backend for a
//! script request. The character band is stated as a hard constraint; the
//! user message frames the raw input according to its input mode.

use crate::catalog::{InputMode, Language, Template};
use crate::duration::TargetStats;
use crate::providers::Message;

/// Builds the system instruction for a script
///
/// # Examples
///
/// ```
/// use reelscript::catalog::{find_language, find_template};
/// use reelscript::duration::TargetStats;
/// use reelscript::prompts::build_system_prompt;
///
/// let template = find_template("explainer").unwrap();
/// let language = find_language("en").unwrap();
/// let prompt = build_system_prompt(template, language, &TargetStats::around(850));
/// assert!(prompt.contains("English"));
/// assert!(prompt.contains("765"));
/// ```
pub fn build_system_prompt(template: &Template, language: &Language, stats: &TargetStats) -> String {
    format!(
        r#"You are a professional scriptwriter for short-form and long-form video narration.

TEMPLATE: {title}
{guidance}

LANGUAGE:
Write the entire script in {language}, even if the source material is in another language.

LENGTH (hard constraint):
- Aim for about {target} characters.
- The script MUST be between {min} and {max} characters long.
- Count every character of the spoken text, including spaces and punctuation.

OUTPUT RULES:
- Output only the narration that will be read aloud.
- Do not include titles, scene directions, timestamps, speaker labels or markdown.
- Do not add commentary before or after the script.
- If you cannot complete the task, reply with a single line starting with "⚠️" followed by the reason."#,
        title = template.title,
        guidance = template.guidance,
        language = language.prompt_name,
        target = stats.target_chars,
        min = stats.min_chars,
        max = stats.max_chars,
    )
}

/// Frames the raw input for the backend according to its input mode
pub fn build_user_prompt(input_mode: InputMode, raw_input: &str) -> String {
    let raw_input = raw_input.trim();
    match input_mode {
        InputMode::Idea => format!(
            "Develop the following idea into a complete narration script. \
Invent concrete details, examples and structure where the idea is brief.\n\nIDEA:\n{}",
            raw_input
        ),
        InputMode::Text => format!(
            "Rewrite the following source text as a narration script. Keep its facts and \
key points, but restructure and rephrase it to fit the template and length.\n\nSOURCE TEXT:\n{}",
            raw_input
        ),
        InputMode::Link => format!(
            "Read the content at the following link and adapt it into a narration script. \
Base the script on what the page actually says; do not invent facts that are not there.\n\nLINK:\n{}",
            raw_input
        ),
    }
}

/// Builds the full message list for one generation call
pub fn build_messages(
    template: &Template,
    language: &Language,
    stats: &TargetStats,
    input_mode: InputMode,
    raw_input: &str,
) -> Vec<Message> {
    vec![
        Message::system(build_system_prompt(template, language, stats)),
        Message::user(build_user_prompt(input_mode, raw_input)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find_language, find_template};

    #[test]
    fn test_system_prompt_states_band_and_language() {
        let template = find_template("storytelling").unwrap();
        let language = find_language("vi").unwrap();
        let stats = TargetStats::around(4000);
        let prompt = build_system_prompt(template, language, &stats);

        assert!(prompt.contains("Vietnamese"));
        assert!(prompt.contains("4000"));
        assert!(prompt.contains("3600"));
        assert!(prompt.contains("4400"));
        assert!(prompt.contains("Storytelling"));
        assert!(prompt.contains(template.guidance));
    }

    #[test]
    fn test_system_prompt_mentions_error_marker() {
        let template = find_template("news").unwrap();
        let language = find_language("en").unwrap();
        let prompt = build_system_prompt(template, language, &TargetStats::around(850));
        assert!(prompt.contains("⚠️"));
    }

    #[test]
    fn test_user_prompt_varies_by_mode() {
        let idea = build_user_prompt(InputMode::Idea, "  coffee  ");
        let text = build_user_prompt(InputMode::Text, "coffee");
        let link = build_user_prompt(InputMode::Link, "https://example.com/coffee");

        assert!(idea.contains("IDEA:\ncoffee"));
        assert!(text.contains("SOURCE TEXT:"));
        assert!(link.contains("LINK:\nhttps://example.com/coffee"));
        assert_ne!(idea, text);
    }

    #[test]
    fn test_build_messages_roles() {
        let template = find_template("listicle").unwrap();
        let language = find_language("ja").unwrap();
        let messages = build_messages(
            template,
            language,
            &TargetStats::around(350),
            InputMode::Idea,
            "sleep",
        );
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_system());
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("sleep"));
    }
}
