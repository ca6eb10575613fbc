use crate::error::AnnotationError;

/// Splits an annotation body into ordered `(key, value)` pairs.
///
/// Pairs are separated by commas outside quoted spans, and each pair splits at
/// its first `:` outside quotes. Values may be double-quoted, single-quoted
/// (the other quote kind is literal inside) or bare. Empty segments, such as
/// the one after a trailing comma, are skipped.
pub fn tokenize(body: &str) -> Result<Vec<(String, String)>, AnnotationError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(AnnotationError::EmptyAnnotation);
    }

    let mut pairs = Vec::new();
    for segment in split_top_level(body, ',')? {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        pairs.push(split_pair(segment)?);
    }

    if pairs.is_empty() {
        return Err(AnnotationError::EmptyAnnotation);
    }
    Ok(pairs)
}

/// True if `key` is an identifier: a letter or `_` followed by letters, digits or `_`.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// True if `text` begins with `identifier` followed (after optional spaces) by `:`.
pub(crate) fn starts_with_key(text: &str) -> bool {
    let key_len = text
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(idx, _)| idx);
    is_valid_key(&text[..key_len]) && text[key_len..].trim_start().starts_with(':')
}

/// Byte offsets of every `delimiter` that sits outside a quoted span.
fn top_level_positions(text: &str, delimiter: char) -> Result<Vec<usize>, AnnotationError> {
    let mut open: Option<(char, usize)> = None;
    let mut positions = Vec::new();

    for (column, (idx, ch)) in text.char_indices().enumerate() {
        match open {
            Some((quote, _)) if ch == quote => open = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => open = Some((ch, column + 1)),
            None if ch == delimiter => positions.push(idx),
            None => {}
        }
    }

    match open {
        Some((quote, column)) => Err(AnnotationError::UnterminatedQuote { quote, column }),
        None => Ok(positions),
    }
}

fn split_top_level(text: &str, delimiter: char) -> Result<Vec<&str>, AnnotationError> {
    let mut segments = Vec::new();
    let mut start = 0;
    for idx in top_level_positions(text, delimiter)? {
        segments.push(&text[start..idx]);
        start = idx + delimiter.len_utf8();
    }
    segments.push(&text[start..]);
    Ok(segments)
}

fn split_pair(segment: &str) -> Result<(String, String), AnnotationError> {
    let colon = top_level_positions(segment, ':')?
        .first()
        .copied()
        .ok_or_else(|| AnnotationError::MissingSeparator {
            pair: segment.to_string(),
        })?;

    let key = segment[..colon].trim();
    if !is_valid_key(key) {
        return Err(AnnotationError::InvalidKey {
            key: key.to_string(),
        });
    }

    let value = unquote(key, &segment[colon + 1..])?;
    Ok((key.to_string(), value))
}

fn unquote(key: &str, raw: &str) -> Result<String, AnnotationError> {
    let raw = raw.trim();
    let mismatched = || AnnotationError::MismatchedQuotes {
        key: key.to_string(),
        value: raw.to_string(),
    };

    match raw.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = raw
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
                .ok_or_else(mismatched)?;
            if inner.contains(quote) {
                return Err(mismatched());
            }
            Ok(inner.to_string())
        }
        _ if raw.contains(['"', '\'']) => Err(mismatched()),
        _ => Ok(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_inside_quotes_do_not_split() {
        let pairs = tokenize(r#"label:"Load, clean", input:'a.csv, b.csv'"#).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("label".to_string(), "Load, clean".to_string()),
                ("input".to_string(), "a.csv, b.csv".to_string()),
            ]
        );
    }

    #[test]
    fn other_quote_kind_is_literal() {
        let pairs = tokenize(r#"label:"Bob's data", note:'say "hi"'"#).unwrap();
        assert_eq!(pairs[0].1, "Bob's data");
        assert_eq!(pairs[1].1, r#"say "hi""#);
    }

    #[test]
    fn colon_inside_value_is_kept() {
        let pairs = tokenize(r#"url:"https://example.org/a:b""#).unwrap();
        assert_eq!(pairs[0].1, "https://example.org/a:b");
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        let err = tokenize(r#"label:"Load, output:"x.csv""#).unwrap_err();
        assert!(matches!(err, AnnotationError::UnterminatedQuote { quote: '"', .. }));
    }

    #[test]
    fn mismatched_quotes_are_rejected() {
        let err = tokenize(r#"label:"Load'"#).unwrap_err();
        assert!(matches!(err, AnnotationError::UnterminatedQuote { .. }));

        let err = tokenize(r#"label:"a" "b""#).unwrap_err();
        assert!(matches!(err, AnnotationError::MismatchedQuotes { .. }));
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = tokenize(r#"label "Load""#).unwrap_err();
        assert!(matches!(err, AnnotationError::MissingSeparator { .. }));
    }

    #[test]
    fn bare_values_and_trailing_comma() {
        let pairs = tokenize("node_type: input, label:\"x\",").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("node_type".to_string(), "input".to_string()));
    }

    #[test]
    fn key_detection() {
        assert!(starts_with_key("label:\"x\""));
        assert!(starts_with_key("node_type :x"));
        assert!(!starts_with_key("the data: here"));
        assert!(!starts_with_key("1abc:x"));
    }
}
