use super::RawAnnotation;
use super::tokenizer::{starts_with_key, tokenize};
use crate::error::AnnotationError;
use crate::syntax::{BlockDelimiters, CommentGroup, Language};

/// An annotation head that could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAnnotation {
    pub line_number: usize,
    pub error: AnnotationError,
}

/// The text of a comment on one line, with its markers removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload<'a> {
    Line(&'a str),
    Block(&'a str),
}

impl<'a> Payload<'a> {
    fn text(self) -> &'a str {
        match self {
            Payload::Line(text) | Payload::Block(text) => text,
        }
    }

    fn same_kind(self, other: Payload<'_>) -> bool {
        matches!(
            (self, other),
            (Payload::Line(_), Payload::Line(_)) | (Payload::Block(_), Payload::Block(_))
        )
    }
}

/// Recognizes `put` annotations in the comments of one file.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationParser {
    group: CommentGroup,
    block: Option<BlockDelimiters>,
}

impl AnnotationParser {
    /// A parser that only looks at line comments of `group`.
    pub fn new(group: CommentGroup) -> Self {
        Self { group, block: None }
    }

    /// A parser using the line and block comment syntax registered for `language`.
    pub fn for_language(language: Language) -> Self {
        Self {
            group: language.comment_group(),
            block: language.block_delimiters(),
        }
    }

    pub fn with_block_delimiters(mut self, block: BlockDelimiters) -> Self {
        self.block = Some(block);
        self
    }

    pub fn comment_group(&self) -> CommentGroup {
        self.group
    }

    /// Parses every annotation in `lines`, in order.
    ///
    /// Each recognized head yields either a [`RawAnnotation`] or an
    /// [`InvalidAnnotation`]; a bad annotation never stops the ones after it.
    pub fn parse_lines<S: AsRef<str>>(
        &self,
        lines: &[S],
    ) -> Vec<Result<RawAnnotation, InvalidAnnotation>> {
        let lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        let payloads = self.comment_payloads(&lines);

        let mut results = Vec::new();
        let mut index = 0;
        while index < payloads.len() {
            let Some(payload) = payloads[index] else {
                index += 1;
                continue;
            };
            let Some(head_body) = annotation_body(payload.text()) else {
                index += 1;
                continue;
            };

            let head_index = index;
            let mut body = head_body.to_string();
            while let Some(stripped) = body.trim_end().strip_suffix('\\') {
                let stripped = stripped.trim_end().to_string();
                match payloads.get(index + 1).copied().flatten() {
                    Some(next) if next.same_kind(payload) => {
                        body = format!("{} {}", stripped, next.text().trim());
                        index += 1;
                    }
                    _ => {
                        body = stripped;
                        break;
                    }
                }
            }

            let line_number = head_index + 1;
            results.push(
                tokenize(&body)
                    .map(|pairs| RawAnnotation { line_number, pairs })
                    .map_err(|error| InvalidAnnotation { line_number, error }),
            );
            index += 1;
        }

        results
    }

    /// Parses a single line. `None` if the line is not an annotation head.
    pub fn parse_line(&self, line: &str) -> Option<Result<RawAnnotation, InvalidAnnotation>> {
        self.parse_lines(&[line]).into_iter().next()
    }

    /// Extracts the comment text of every line, tracking block comment state.
    fn comment_payloads<'a>(&self, lines: &[&'a str]) -> Vec<Option<Payload<'a>>> {
        let prefix = self.group.prefix();
        let mut in_block = false;

        lines
            .iter()
            .map(|line| {
                let trimmed = line.trim_start();
                match self.block {
                    Some(block) if in_block => {
                        let (text, closed) = cut_at_close(trimmed, block.close);
                        in_block = !closed;
                        Some(Payload::Block(strip_block_leader(text)))
                    }
                    Some(block) if trimmed.starts_with(block.open) => {
                        let (text, closed) = cut_at_close(&trimmed[block.open.len()..], block.close);
                        in_block = !closed;
                        Some(Payload::Block(strip_block_leader(text)))
                    }
                    _ => trimmed.strip_prefix(prefix).map(Payload::Line),
                }
            })
            .collect()
    }
}

fn cut_at_close<'a>(text: &'a str, close: &str) -> (&'a str, bool) {
    match text.find(close) {
        Some(idx) => (&text[..idx], true),
        None => (text, false),
    }
}

/// Drops the decorative `*` that starts lines inside C-style block comments.
fn strip_block_leader(text: &str) -> &str {
    let text = text.trim_start();
    text.strip_prefix('*').unwrap_or(text).trim_end()
}

/// Returns the property list of an annotation head, or `None` for ordinary comments.
///
/// After `put`, the separator is one of nothing, whitespace, `|` or `:`. Prose such
/// as "put the data here" is not an annotation: the body must carry a quote or a
/// continuation backslash, and with no separator it must also open with `key:`.
fn annotation_body(comment: &str) -> Option<&str> {
    let rest = comment.trim_start().strip_prefix("put")?;

    let (body, explicit_separator) = if let Some(body) = rest.strip_prefix(['|', ':']) {
        (body, true)
    } else if rest.starts_with(char::is_whitespace) {
        (rest, true)
    } else {
        (rest, false)
    };

    let body = body.trim();
    let quoted = body.contains(['"', '\'']);
    let continued = body.ends_with('\\');

    let is_head = if explicit_separator {
        quoted || continued
    } else {
        starts_with_key(body) && (quoted || continued)
    };
    is_head.then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_are_recognized() {
        for comment in [
            r#" put label:"x""#,
            r#"put label:"x""#,
            r#"put|label:"x""#,
            r#"put:label:"x""#,
            r#"putlabel:"x""#,
        ] {
            assert_eq!(annotation_body(comment), Some(r#"label:"x""#), "{comment}");
        }
    }

    #[test]
    fn prose_is_not_an_annotation() {
        assert_eq!(annotation_body(" put the data here"), None);
        assert_eq!(annotation_body(" putative: thing"), None);
        assert_eq!(annotation_body(" put"), None);
        assert_eq!(annotation_body(" output:\"x\""), None);
    }
}
