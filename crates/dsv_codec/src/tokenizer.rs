//! Record-line tokenization.
//!
//! Splitting happens in two passes: a plain split on the separator, then a
//! best-effort merge of the tokens that take part in a quoted span. The
//! merge assumes quotes appear adjacent to separators — a quote in the
//! middle of an unquoted token is left alone, and a quoted value cannot
//! span physical lines.

use std::borrow::Cow;

// -----------------------------------------------------------------------------
// split_record

/// Splits one record line into field tokens.
///
/// Merge rules, applied per raw token:
///
/// - `"..."` (self-contained): surrounding quotes stripped.
/// - `"...` opens an accumulation; a bare `"` opens an empty one.
/// - inside an accumulation, tokens are rejoined with the separator that
///   split them; `..."` (or a bare `"`) closes the span.
/// - an accumulation still open at the end of the line is flushed as-is.
///
/// Doubled-quote escapes are *not* resolved here; see [`unescape_quotes`].
pub(crate) fn split_record(line: &str, separator: char, quote: char) -> Vec<String> {
    let quote_len = quote.len_utf8();
    let mut fields = Vec::new();
    let mut pending: Option<String> = None;

    for token in line.split(separator) {
        match pending.take() {
            None => {
                if token.len() >= quote_len * 2
                    && token.starts_with(quote)
                    && token.ends_with(quote)
                {
                    fields.push(token[quote_len..token.len() - quote_len].to_owned());
                } else if token.starts_with(quote) {
                    pending = Some(token[quote_len..].to_owned());
                } else {
                    fields.push(token.to_owned());
                }
            }
            Some(mut merged) => {
                if token.ends_with(quote) {
                    merged.push(separator);
                    merged.push_str(&token[..token.len() - quote_len]);
                    fields.push(merged);
                } else {
                    merged.push(separator);
                    merged.push_str(token);
                    pending = Some(merged);
                }
            }
        }
    }

    if let Some(merged) = pending {
        fields.push(merged);
    }
    fields
}

// -----------------------------------------------------------------------------
// unescape_quotes

/// Resolves doubled-quote escapes to a single quote character.
///
/// Applied during field assignment on the decode path only.
pub(crate) fn unescape_quotes(text: &str, quote: char) -> Cow<'_, str> {
    let mut pair = String::with_capacity(quote.len_utf8() * 2);
    pair.push(quote);
    pair.push(quote);
    if text.contains(&pair) {
        Cow::Owned(text.replace(&pair, quote.to_string().as_str()))
    } else {
        Cow::Borrowed(text)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{split_record, unescape_quotes};

    fn split(line: &str) -> Vec<String> {
        split_record(line, ',', '"')
    }

    #[test]
    fn plain_split() {
        assert_eq!(split("a,b,c"), ["a", "b", "c"]);
        assert_eq!(split("a,,c"), ["a", "", "c"]);
        assert_eq!(split(""), [""]);
    }

    #[test]
    fn self_contained_quotes_are_stripped() {
        assert_eq!(split(r#"a,"",c"#), ["a", "", "c"]);
        assert_eq!(split(r#"a," text ",c"#), ["a", " text ", "c"]);
    }

    #[test]
    fn separator_inside_quotes_is_merged() {
        assert_eq!(split(r#"a,"b,c",d"#), ["a", "b,c", "d"]);
        assert_eq!(split(r#""start,middle,end""#), ["start,middle,end"]);
    }

    #[test]
    fn bare_quote_tokens() {
        // A field holding just the separator: `","`.
        assert_eq!(split(r#"a,",",b"#), ["a", ",", "b"]);
        // A field ending in the separator: `"text,"`.
        assert_eq!(split(r#"a,"text,",b"#), ["a", "text,", "b"]);
    }

    #[test]
    fn unterminated_span_is_flushed() {
        assert_eq!(split(r#"a,"b,c"#), ["a", "b,c"]);
    }

    #[test]
    fn custom_separator() {
        assert_eq!(split_record("a;b;c", ';', '"'), ["a", "b", "c"]);
        assert_eq!(split_record(r#"a;"b;c";d"#, ';', '"'), ["a", "b;c", "d"]);
    }

    #[test]
    fn doubled_quotes_unescape() {
        assert_eq!(unescape_quotes(r#"say ""hi"""#, '"'), r#"say "hi""#);
        assert_eq!(unescape_quotes("untouched", '"'), "untouched");
    }
}
