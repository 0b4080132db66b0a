//! Cleanup of text recognized from images, before it is translated.

const KEPT_PUNCTUATION: &[char] = &['.', ',', '\'', '\u{2019}', '"', '?', '!', '-'];

/// Normalize OCR output.
///
/// Drops characters other than ASCII word characters, whitespace and basic
/// punctuation, collapses whitespace runs to one space, collapses runs of
/// `..` or `--` to a single period, trims and capitalizes the first letter.
/// Returns `None` if nothing readable is left.
pub fn clean_ocr_text(raw: &str) -> Option<String> {
    let kept: String = raw
        .trim()
        .chars()
        .filter(|&c| {
            c.is_ascii_alphanumeric()
                || c == '_'
                || c.is_whitespace()
                || KEPT_PUNCTUATION.contains(&c)
        })
        .collect();

    let spaced = collapse_whitespace(&kept);
    let punctuated = collapse_repeats(&spaced);
    let trimmed = punctuated.trim();

    let mut chars = trimmed.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Runs of two or more whitespace characters become one space; a lone
/// newline stays a newline.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Vec<char> = Vec::new();

    let flush = |run: &mut Vec<char>, out: &mut String| {
        match run.len() {
            0 => {}
            1 => out.push(run[0]),
            _ => out.push(' '),
        }
        run.clear();
    };

    for c in text.chars() {
        if c.is_whitespace() {
            run.push(c);
        } else {
            flush(&mut run, &mut out);
            out.push(c);
        }
    }
    flush(&mut run, &mut out);
    out
}

/// `..`, `...`, `--` and longer runs become a single `.`.
fn collapse_repeats(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if (c == '.' || c == '-') && chars.peek() == Some(&c) {
            while chars.peek() == Some(&c) {
                chars.next();
            }
            out.push('.');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_symbols_and_capitalizes() {
        assert_eq!(
            clean_ocr_text("  hello @world#  ").as_deref(),
            Some("Hello world")
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_ocr_text("a   b\tc").as_deref(), Some("A b\tc"));
        assert_eq!(clean_ocr_text("line one\nline two").as_deref(), Some("Line one\nline two"));
        assert_eq!(clean_ocr_text("para\n\n\nnext").as_deref(), Some("Para next"));
    }

    #[test]
    fn test_collapses_repeated_punctuation() {
        assert_eq!(clean_ocr_text("wait... what--no").as_deref(), Some("Wait. what.no"));
        assert_eq!(clean_ocr_text("well-known.").as_deref(), Some("Well-known."));
    }

    #[test]
    fn test_keeps_curly_apostrophe() {
        assert_eq!(clean_ocr_text("don\u{2019}t").as_deref(), Some("Don\u{2019}t"));
    }

    #[test]
    fn test_nothing_readable() {
        assert_eq!(clean_ocr_text(""), None);
        assert_eq!(clean_ocr_text(" @@ ## "), None);
    }
}
