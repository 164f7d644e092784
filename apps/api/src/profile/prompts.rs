// Profile workflow prompt templates.
// Placeholders are `{name}` tokens replaced before sending.

/// Quiz prompt. Replace `{preference}`, `{language}`, `{reference}`.
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Based on the following user profile:
- Preference: {preference}
- Language: {language}
- Reference: {reference}

Generate 3 multiple-choice quiz questions to further understand their music taste.
Return the questions in a JSON list format like this:
[
    {"id": 1, "question": "...", "options": ["...", "...", "..."]},
    ...
]
Return ONLY the JSON list."#;

/// Recommendation prompt used after a quiz submission.
/// Replace `{age}`, `{gender}`, `{preference}`, `{language}`, `{answers}`.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Based on the following user profile:
- Age: {age}
- Gender: {gender}
- Preference: {preference}
- Language: {language}
- Answers: {answers}

Recommend 5 songs.
Return the recommendations as a JSON list of objects, where each object has "title" and "artist".
Example:
[
    {"title": "Song Title", "artist": "Artist Name"},
    ...
]
Return ONLY the JSON list."#;

/// Shorter prompt for the on-demand recommendations endpoint. Same output
/// contract as `RECOMMENDATION_PROMPT_TEMPLATE`.
pub const QUICK_RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Based on profile: Age {age}, Gender {gender}, Preference {preference}, Language {language},
and answers: {answers}, recommend music or songs.
Return ONLY a JSON list of objects with "title" and "artist", e.g. [{"title": "Song Title", "artist": "Artist Name"}]."#;

/// Fills `{name}` placeholders in one left-to-right pass. Inserted values are
/// never rescanned, so a value containing `{reference}` is sent verbatim.
/// Braces that do not name a known placeholder are copied as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let filled = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_does_not_rescan_inserted_values() {
        let filled = fill_template(
            "- Preference: {preference}\n- Reference: {reference}",
            &[
                ("preference", "songs like {reference}"),
                ("reference", "Miles Davis"),
            ],
        );
        assert_eq!(
            filled,
            "- Preference: songs like {reference}\n- Reference: Miles Davis"
        );
    }

    #[test]
    fn test_fill_template_keeps_json_examples() {
        let filled = fill_template(
            r#"[{"title": "Song Title"}] for {age}"#,
            &[("age", "30")],
        );
        assert_eq!(filled, r#"[{"title": "Song Title"}] for 30"#);
    }

    #[test]
    fn test_fill_template_unknown_and_unclosed_braces() {
        assert_eq!(
            fill_template("{unknown} {age} {", &[("age", "1")]),
            "{unknown} 1 {"
        );
    }

    #[test]
    fn test_quiz_template_has_every_placeholder_filled() {
        let filled = fill_template(
            QUIZ_PROMPT_TEMPLATE,
            &[("preference", "p"), ("language", "l"), ("reference", "r")],
        );
        assert!(filled.contains("- Preference: p"));
        assert!(filled.contains("- Reference: r"));
        assert!(filled.contains(r#"{"id": 1, "question": "...""#));
    }
}
