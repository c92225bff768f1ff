/// Escapes the characters that are significant in HTML text and attributes.
/// Non-ASCII characters pass through unchanged; output is assumed to be UTF-8.
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '<' {
            out.push(ch);
            continue;
        }
        // Drop everything up to the closing bracket; an unclosed tag eats the rest.
        for c in chars.by_ref() {
            if c == '>' {
                break;
            }
        }
    }
    out
}

/// Truncates to `max` characters, appending "..." when something was cut.
pub(crate) fn limit_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", input[..idx].trim_end()),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"Tom & Jerry's <"Show">"#),
            "Tom &amp; Jerry&#039;s &lt;&quot;Show&quot;&gt;"
        );
    }

    #[test]
    fn leaves_non_ascii_untouched() {
        assert_eq!(escape_html("Amélie & Co — 千と千尋"), "Amélie &amp; Co — 千と千尋");
    }

    #[test]
    fn strips_tags_and_limits_on_char_boundaries() {
        assert_eq!(strip_tags("<p>Great <b>film</b></p>"), "Great film");
        assert_eq!(limit_chars("héllo world", 5), "héllo...");
        assert_eq!(limit_chars("short", 200), "short");
    }
}
