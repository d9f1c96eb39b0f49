//! Image directives embedded in generated replies.

use std::sync::OnceLock;

use regex::Regex;

/// A reply with its directives removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    /// Visible text with every directive stripped and trimmed.
    pub text: String,
    /// Prompt of the first image directive, when one is honored.
    pub image_prompt: Option<String>,
}

fn image_directive() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\[img:\s*"([^"]*)"\s*\]"#).expect("image directive pattern is valid")
    })
}

/// Format the audit marker recorded when an image is requested.
pub fn image_marker(prompt: &str) -> String {
    format!("[img:\"{}\"]", prompt)
}

/// Strip `[img:"..."]` markers from a reply.
///
/// The first marker with a non-blank prompt is captured when `allow_images`
/// is set; the rest are discarded.
pub fn parse_reply(reply: &str, allow_images: bool) -> ParsedReply {
    let pattern = image_directive();

    let image_prompt = if allow_images {
        pattern
            .captures_iter(reply)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .find(|p| !p.is_empty())
            .map(str::to_string)
    } else {
        None
    };

    let text = pattern.replace_all(reply, "").trim().to_string();

    ParsedReply { text, image_prompt }
}
