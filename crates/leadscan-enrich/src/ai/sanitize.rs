//! Repair of model output before JSON parsing.
//!
//! Models asked for strict JSON still wrap it in markdown fences, add
//! prose around it, use typographic quotes, or stop mid-object when the
//! token budget runs out. [`sanitize_ai_json`] undoes each of those in turn.

use std::sync::LazyLock;

use regex::Regex;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*```[A-Za-z0-9_-]*[ \t]*$\n?").expect("valid regex"));

/// Best-effort cleanup of a model response into parseable JSON text.
///
/// Steps, in order:
///
/// 1. strip markdown code fences (with or without a language tag);
/// 2. replace smart quotes with their ASCII equivalents;
/// 3. keep only the span from the first `{` to the `}` that balances it
///    (or to the end of the text if the object is never closed);
/// 4. close a string left open at the end of the text;
/// 5. append one `}` per unmatched `{`.
///
/// Braces and quotes inside string literals are not counted.
#[must_use]
pub fn sanitize_ai_json(raw: &str) -> String {
    let unfenced = FENCE.replace_all(raw, "").replace("```", "");

    let normalized = unfenced
        .replace(['\u{201C}', '\u{201D}', '\u{201E}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}', '\u{201A}'], "'");

    let mut text = extract_object_span(normalized.trim()).to_owned();

    let (in_string, depth) = scan_open_state(&text);
    if in_string {
        text.push('"');
    }
    for _ in 0..depth {
        text.push('}');
    }
    text
}

fn extract_object_span(text: &str) -> &str {
    let Some(start) = text.find('{') else {
        return text;
    };
    let object = &text[start..];
    match balanced_end(object) {
        Some(end) => &object[..=end],
        None => object,
    }
}

/// Byte index of the `}` that closes the leading `{`, ignoring braces inside
/// string literals. `None` if the object is truncated.
fn balanced_end(object: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    let mut depth: usize = 0;
    for (i, c) in object.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Returns whether the text ends inside a string literal, and how many `{`
/// are left unclosed outside string literals.
fn scan_open_state(text: &str) -> (bool, usize) {
    let mut in_string = false;
    let mut escaped = false;
    let mut depth: usize = 0;
    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    (in_string, depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_and_truncated_object_recovers_to_stripped_plus_brace() {
        let body = r#"{"lead_quality": "High", "scores": {"ui": 40, "seo": 30}"#;
        let fenced = format!("```json\n{body}\n```");

        let repaired = sanitize_ai_json(&fenced);
        let expected: serde_json::Value = serde_json::from_str(&format!("{body}}}")).unwrap();
        let actual: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn surrounding_prose_is_dropped() {
        let raw = "Here is the analysis you asked for:\n{\"a\": 1}\nLet me know!";
        assert_eq!(sanitize_ai_json(raw), "{\"a\": 1}");
    }

    #[test]
    fn smart_quotes_are_normalized() {
        let raw = "{\u{201C}name\u{201D}: \u{201C}Caf\u{00E9} M\u{00FC}ller\u{201D}}";
        let value: serde_json::Value = serde_json::from_str(&sanitize_ai_json(raw)).unwrap();
        assert_eq!(value["name"], "Caf\u{00E9} M\u{00FC}ller");
    }

    #[test]
    fn odd_trailing_quote_is_closed_before_braces() {
        let raw = r#"{"report_card": {"executive_summary": "The site loads slo"#;
        let value: serde_json::Value = serde_json::from_str(&sanitize_ai_json(raw)).unwrap();
        assert_eq!(
            value["report_card"]["executive_summary"],
            "The site loads slo"
        );
    }

    #[test]
    fn truncated_tail_after_closed_nested_object_is_kept() {
        let raw = r#"{"lead_quality":"High","scores":{"ui":1},"report_card":{"executive_summary":"x"},"email_pitch":{"subject":"Hi","body_text":"Hel"#;
        let value: serde_json::Value = serde_json::from_str(&sanitize_ai_json(raw)).unwrap();
        assert_eq!(value["lead_quality"], "High");
        assert_eq!(value["scores"]["ui"], 1);
        assert_eq!(value["email_pitch"]["subject"], "Hi");
        assert_eq!(value["email_pitch"]["body_text"], "Hel");
    }

    #[test]
    fn prose_with_braces_after_the_object_is_dropped() {
        let raw = "{\"a\": {\"b\": 2}} trailing note {not json}";
        assert_eq!(sanitize_ai_json(raw), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let raw = r#"{"note": "use {curly} and \"quotes\""}"#;
        assert_eq!(sanitize_ai_json(raw), raw);
    }

    #[test]
    fn text_without_object_passes_through_trimmed() {
        assert_eq!(sanitize_ai_json("  no json here  "), "no json here");
    }
}
