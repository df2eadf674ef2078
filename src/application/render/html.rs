//! HTML escaping for hand-built fragments.

/// Escape the five characters that matter inside text nodes and
/// double-quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    escape_into(&mut out, input);
    out
}

pub fn escape_into(out: &mut String, input: &str) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror='alert(1)'> & more"#),
            "&lt;img src=&quot;x&quot; onerror=&#039;alert(1)&#039;&gt; &amp; more"
        );
    }

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(escape_html("WORLD's FIRST"), "WORLD&#039;s FIRST");
        assert_eq!(escape_html("plain text"), "plain text");
    }
}
