//! Annotation parsing, validation and generation tests.
//!
mod common;
use common::*;
use putgraph::annotation::{
    AnnotationLayout, AnnotationParser, AnnotationValidator, FileContext, RawAnnotation,
    annotation_for_node, format_annotation, tokenize,
};
use putgraph::prelude::*;
use rstest::rstest;
use std::collections::BTreeMap;

fn parse_one(group: CommentGroup, text: &str) -> RawAnnotation {
    let lines: Vec<&str> = text.lines().collect();
    let mut results = AnnotationParser::new(group).parse_lines(&lines);
    assert_eq!(results.len(), 1, "expected exactly one annotation in {text:?}");
    results.remove(0).expect("annotation should parse")
}

fn validate(line: &str, file: &str) -> putgraph::annotation::ValidatedNode {
    let language = Language::from_path(std::path::Path::new(file)).expect("known language");
    let raw = parse_one(language.comment_group(), line);
    AnnotationValidator::new().validate(&raw, &FileContext::new(file, language))
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[rstest]
    #[case("# put label:\"x\", output:\"a.csv\"")]
    #[case("#put label:\"x\", output:\"a.csv\"")]
    #[case("#put|label:\"x\", output:\"a.csv\"")]
    #[case("#put:label:\"x\", output:\"a.csv\"")]
    #[case("#putlabel:\"x\", output:\"a.csv\"")]
    #[case("    # put   label:\"x\", output:\"a.csv\"")]
    fn test_separators_and_indentation(#[case] line: &str) {
        let raw = parse_one(CommentGroup::Hash, line);
        assert_eq!(raw.pairs, pairs(&[("label", "x"), ("output", "a.csv")]));
        assert_eq!(raw.line_number, 1);
    }

    #[rstest]
    #[case("# put the data here")]
    #[case("# output the results")]
    #[case("# putting things together")]
    #[case("x <- 1 # put label:\"inline\"")]
    fn test_prose_and_code_lines_are_ignored(#[case] line: &str) {
        let results = AnnotationParser::new(CommentGroup::Hash).parse_lines(&[line]);
        assert!(results.is_empty(), "{line:?} should not be an annotation");
    }

    #[test]
    fn test_dash_group_matches_hash_group() {
        let sql = parse_one(
            Language::Sql.comment_group(),
            "--put label:\"Query\", output:\"t\"",
        );
        let r = parse_one(CommentGroup::Hash, "# put label:\"Query\", output:\"t\"");
        assert_eq!(Language::from_extension("sql").map(Language::comment_prefix), Some("--"));
        assert_eq!(sql.pairs, r.pairs);
    }

    #[test]
    fn test_continuation_matches_single_line() {
        let multiline = "# put id:\"load\", \\\n#     label:\"Load data\", \\\n#     output:\"data.csv\"";
        let single = "# put id:\"load\", label:\"Load data\", output:\"data.csv\"";

        let joined = parse_one(CommentGroup::Hash, multiline);
        let flat = parse_one(CommentGroup::Hash, single);
        assert_eq!(joined.to_map(), flat.to_map());
        assert_eq!(joined.line_number, 1);
    }

    #[test]
    fn test_dangling_backslash_ends_annotation() {
        let lines = ["# put label:\"Load\", \\", "data <- read.csv(\"x.csv\")"];
        let results = AnnotationParser::new(CommentGroup::Hash).parse_lines(&lines);
        assert_eq!(results.len(), 1);
        let raw = results[0].as_ref().expect("annotation should parse");
        assert_eq!(raw.pairs, pairs(&[("label", "Load")]));
    }

    #[test]
    fn test_block_comment_annotation() {
        let lines = [
            "/*",
            " * put label:\"Bundle\", output:\"bundle.js\"",
            " */",
            "const x = 1;",
            "/* put label:\"Inline block\" */",
        ];
        let parser = AnnotationParser::for_language(Language::JavaScript);
        let results: Vec<_> = parser
            .parse_lines(&lines)
            .into_iter()
            .map(|r| r.expect("annotation should parse"))
            .collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].line_number, 2);
        assert_eq!(results[0].get("output"), Some("bundle.js"));
        assert_eq!(results[1].line_number, 5);
        assert_eq!(results[1].get("label"), Some("Inline block"));
    }

    #[test]
    fn test_lua_block_comment() {
        let lines = ["--[[ put label:\"Lua block\", output:\"out.txt\" ]]"];
        let results = AnnotationParser::for_language(Language::Lua).parse_lines(&lines);
        assert_eq!(results.len(), 1);
        let raw = results[0].as_ref().expect("annotation should parse");
        assert_eq!(raw.get("label"), Some("Lua block"));
    }

    #[test]
    fn test_invalid_annotation_does_not_stop_the_file() {
        let lines = [
            "# put label:\"broken, output:\"x.csv\"",
            "# put label:\"fine\"",
        ];
        let results = AnnotationParser::new(CommentGroup::Hash).parse_lines(&lines);
        assert_eq!(results.len(), 2);

        let invalid = results[0].as_ref().expect_err("first annotation is malformed");
        assert_eq!(invalid.line_number, 1);
        assert!(matches!(invalid.error, AnnotationError::UnterminatedQuote { .. }));

        let raw = results[1].as_ref().expect("second annotation parses");
        assert_eq!(raw.line_number, 2);
    }

    #[rstest]
    #[case("label \"x\"", "Missing ':'")]
    #[case("1abc:\"x\"", "Invalid property name")]
    #[case("label:\"x\" \"y\"", "mismatched quotes")]
    fn test_tokenizer_errors(#[case] body: &str, #[case] message: &str) {
        let err = tokenize(body).expect_err("body should be rejected");
        assert!(err.to_string().contains(message), "{err}");
    }

    #[test]
    fn test_empty_body_is_rejected() {
        assert_eq!(tokenize("  , "), Err(AnnotationError::EmptyAnnotation));
    }
}

#[cfg(test)]
mod validator_tests {
    use super::*;

    #[test]
    fn test_output_defaults_to_file_name() {
        let validated = validate("# put label:\"Load\"", "scripts/load.R");
        assert_eq!(validated.node.output, vec!["load.R".to_string()]);
        assert!(validated.output_defaulted);
        assert_eq!(validated.node.file_name, "load.R");
        assert_eq!(validated.node.file_type, "r");
        assert!(validated.warnings.is_empty(), "{:?}", validated.warnings);
    }

    #[test]
    fn test_missing_id_is_marked_for_generation() {
        let validated = validate("# put label:\"Load\"", "load.R");
        assert!(validated.needs_id);
        assert!(validated.node.id.is_empty());
    }

    #[test]
    fn test_empty_id_stays_empty_with_warning() {
        let validated = validate("# put id:\"\", label:\"Load\"", "load.R");
        assert!(!validated.needs_id);
        assert_eq!(validated.node.id, "");
        assert!(validated.warnings.iter().any(|w| w.contains("Empty 'id'")));
    }

    #[test]
    fn test_missing_label_warns() {
        let validated = validate("# put output:\"x.csv\"", "load.R");
        assert_eq!(validated.node.label, None);
        assert!(validated.warnings.iter().any(|w| w.contains("Missing 'label'")));
    }

    #[rstest]
    #[case("input", NodeType::Input)]
    #[case("OUTPUT", NodeType::Output)]
    #[case(" decision ", NodeType::Decision)]
    #[case("artifact", NodeType::Artifact)]
    fn test_node_type_is_parsed(#[case] tag: &str, #[case] expected: NodeType) {
        let line = format!("# put label:\"x\", node_type:\"{tag}\"");
        let validated = validate(&line, "step.py");
        assert_eq!(validated.node.node_type, expected);
        assert!(validated.warnings.is_empty(), "{:?}", validated.warnings);
    }

    #[test]
    fn test_unknown_node_type_falls_back_to_process() {
        let validated = validate("# put label:\"x\", node_type:\"banana\"", "step.py");
        assert_eq!(validated.node.node_type, NodeType::Process);
        assert!(validated.warnings.iter().any(|w| w.contains("banana")));
    }

    #[test]
    fn test_internal_input_always_warns() {
        let validated = validate(
            "# put label:\"Fit\", input:\"model.internal, data.csv\", output:\"fit.internal\"",
            "fit.R",
        );
        let internal: Vec<_> = validated
            .warnings
            .iter()
            .filter(|w| w.contains(".internal"))
            .collect();
        assert_eq!(internal.len(), 1, "{:?}", validated.warnings);
        assert!(internal[0].contains("model.internal"));
        assert_eq!(validated.node.output, vec!["fit.internal".to_string()]);
    }

    #[test]
    fn test_input_without_extension_warns() {
        let validated = validate("# put label:\"x\", input:\"rawdata\"", "step.py");
        assert!(
            validated
                .warnings
                .iter()
                .any(|w| w.contains("rawdata") && w.contains("extension"))
        );
    }

    #[test]
    fn test_file_lists_are_split_and_trimmed() {
        let validated = validate(
            "# put label:\"x\", input:\" a.csv ,b.csv,, c.csv \", output:\"d.csv, e.csv\"",
            "step.py",
        );
        assert_eq!(validated.node.input, vec!["a.csv", "b.csv", "c.csv"]);
        assert_eq!(validated.node.output, vec!["d.csv", "e.csv"]);
    }

    #[test]
    fn test_duplicate_and_pass_through_keys() {
        let validated = validate(
            "# put label:\"first\", label:\"second\", owner:\"data team\", file_name:\"other.R\"",
            "step.R",
        );
        assert_eq!(validated.node.label.as_deref(), Some("second"));
        assert_eq!(validated.node.extra.get("owner").map(String::as_str), Some("data team"));
        assert_eq!(validated.node.file_name, "step.R");
        assert!(validated.warnings.iter().any(|w| w.contains("Duplicate property")));
        assert!(validated.warnings.iter().any(|w| w.contains("reserved")));
    }
}

#[cfg(test)]
mod generator_tests {
    use super::*;

    #[rstest]
    fn test_generated_text_parses_back(
        #[values(CommentGroup::Hash, CommentGroup::Dash, CommentGroup::Slash, CommentGroup::Percent)]
        group: CommentGroup,
        #[values(AnnotationLayout::SingleLine, AnnotationLayout::Multiline)] layout: AnnotationLayout,
    ) {
        let original = pairs(&[
            ("id", "load"),
            ("label", "Load, clean: and \"quote\""),
            ("input", "a.csv, b.csv"),
            ("owner", "Bob's team"),
        ]);

        let text = format_annotation(&original, group, layout).expect("pairs are quotable");
        let raw = parse_one(group, &text);
        let expected: BTreeMap<String, String> = original.into_iter().collect();
        assert_eq!(raw.to_map(), expected);
    }

    #[test]
    fn test_single_line_layout() {
        let text = format_annotation(
            &pairs(&[("label", "Load"), ("output", "data.csv")]),
            CommentGroup::Slash,
            AnnotationLayout::SingleLine,
        )
        .expect("pairs are quotable");
        assert_eq!(text, "// put label:\"Load\", output:\"data.csv\"");
    }

    #[test]
    fn test_multiline_layout() {
        let text = format_annotation(
            &pairs(&[("label", "Load"), ("output", "data.csv")]),
            CommentGroup::Hash,
            AnnotationLayout::Multiline,
        )
        .expect("pairs are quotable");
        assert_eq!(text, "# put label:\"Load\", \\\n#    output:\"data.csv\"");
    }

    #[test]
    fn test_unquotable_values_are_rejected() {
        let both = format_annotation(
            &pairs(&[("label", "it's \"x\"")]),
            CommentGroup::Hash,
            AnnotationLayout::SingleLine,
        );
        assert!(matches!(both, Err(GenerateError::UnquotableValue { .. })));

        let newline = format_annotation(
            &pairs(&[("label", "a\nb")]),
            CommentGroup::Hash,
            AnnotationLayout::SingleLine,
        );
        assert!(matches!(newline, Err(GenerateError::UnquotableValue { .. })));

        let key = format_annotation(
            &pairs(&[("bad key", "x")]),
            CommentGroup::Hash,
            AnnotationLayout::SingleLine,
        );
        assert_eq!(key, Err(GenerateError::InvalidKey("bad key".to_string())));

        let empty = format_annotation(&[], CommentGroup::Hash, AnnotationLayout::SingleLine);
        assert_eq!(empty, Err(GenerateError::Empty));
    }

    #[test]
    fn test_node_annotation_uses_file_syntax() {
        let node = Node::new("query")
            .with_label("Query")
            .with_file("sql/query.sql", "sql")
            .with_input(["raw.csv"])
            .with_output(["t"]);
        let text = annotation_for_node(&node, AnnotationLayout::SingleLine).expect("quotable");
        assert_eq!(
            text,
            "-- put id:\"query\", label:\"Query\", node_type:\"process\", input:\"raw.csv\", output:\"t\""
        );
    }
}
