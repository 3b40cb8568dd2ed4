//! HTML escaping for text content and attribute values.

/// Escape text content: `&`, `<`, `>`.
pub fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

/// Escape an attribute value: text escapes plus `"`.
pub fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

/// Decode entity references. Unknown entities pass through literally, which
/// is the lenient direction for foreign input.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match rest.find(';') {
            // Entities are short; a distant terminator means this `&` was
            // literal text.
            Some(end) if end <= 10 => {
                let entity = &rest[1..end];
                match decode_entity(entity) {
                    Some(decoded) => {
                        out.push(decoded);
                        rest = &rest[end + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(text: &str) -> String {
        let mut out = String::new();
        escape_text(&mut out, text);
        out
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escaped("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escaped("plain"), "plain");
    }

    #[test]
    fn test_escape_attr_quotes() {
        let mut out = String::new();
        escape_attr(&mut out, "say \"hi\"");
        assert_eq!(out, "say &quot;hi&quot;");
    }

    #[test]
    fn test_unescape_named_and_numeric() {
        assert_eq!(unescape("&lt;b&gt; &amp; &quot;q&quot;"), "<b> & \"q\"");
        assert_eq!(unescape("&#65;&#x42;"), "AB");
        assert_eq!(unescape("&nbsp;"), "\u{a0}");
    }

    #[test]
    fn test_unescape_leaves_unknown_alone() {
        assert_eq!(unescape("&bogus; & bare"), "&bogus; & bare");
    }

    #[test]
    fn test_escape_unescape_round_trip() {
        let original = "tags <b> & \"attrs\" 'quoted'";
        let mut escaped_attr = String::new();
        escape_attr(&mut escaped_attr, original);
        assert_eq!(unescape(&escaped_attr), original);
    }
}
