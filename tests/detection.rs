//! Heuristic reference detection tests.
//!
use putgraph::detection::{DetectionPatternEngine, ReferenceKind};
use rstest::rstest;

#[cfg(test)]
mod detection_tests {
    use super::*;

    #[rstest]
    #[case("r", r#"df <- read.csv("raw/data.csv")"#, ReferenceKind::Input, "raw/data.csv")]
    #[case("r", r#"m <- readRDS(file = "model.rds")"#, ReferenceKind::Input, "model.rds")]
    #[case("r", r#"write.csv(df, "clean.csv", row.names = FALSE)"#, ReferenceKind::Output, "clean.csv")]
    #[case("r", r#"ggsave("plot.png", p)"#, ReferenceKind::Output, "plot.png")]
    #[case("r", r#"source("helpers.R")"#, ReferenceKind::Dependency, "helpers.R")]
    #[case("python", r#"df = pd.read_csv("input.csv")"#, ReferenceKind::Input, "input.csv")]
    #[case("python", r#"with open('notes.txt') as f:"#, ReferenceKind::Input, "notes.txt")]
    #[case("python", r#"df.to_parquet("out.parquet")"#, ReferenceKind::Output, "out.parquet")]
    #[case("python", r#"with open("log.txt", "w") as f:"#, ReferenceKind::Output, "log.txt")]
    #[case("python", r#"plt.savefig("fig.png")"#, ReferenceKind::Output, "fig.png")]
    #[case("python", r#"exec(open("setup.py").read())"#, ReferenceKind::Dependency, "setup.py")]
    #[case("sql", "SELECT * FROM raw_events e JOIN users u ON u.id = e.user_id", ReferenceKind::Input, "raw_events")]
    #[case("sql", "CREATE TABLE IF NOT EXISTS daily_summary AS", ReferenceKind::Output, "daily_summary")]
    #[case("sql", "INSERT INTO audit_log VALUES (1)", ReferenceKind::Output, "audit_log")]
    #[case("shell", "sort input.txt | uniq > counts.txt", ReferenceKind::Input, "input.txt")]
    #[case("shell", "sort input.txt | uniq > counts.txt", ReferenceKind::Output, "counts.txt")]
    #[case("shell", "source ./env.sh", ReferenceKind::Dependency, "./env.sh")]
    #[case("julia", r#"df = CSV.read("data.csv", DataFrame)"#, ReferenceKind::Input, "data.csv")]
    #[case("julia", r#"CSV.write("out.csv", df)"#, ReferenceKind::Output, "out.csv")]
    #[case("julia", r#"include("utils.jl")"#, ReferenceKind::Dependency, "utils.jl")]
    #[case("javascript", r#"const raw = fs.readFileSync("config.json", "utf8");"#, ReferenceKind::Input, "config.json")]
    #[case("javascript", r#"fs.writeFileSync('report.html', html);"#, ReferenceKind::Output, "report.html")]
    #[case("typescript", r#"import { helper } from "./helper";"#, ReferenceKind::Dependency, "./helper")]
    #[case("go", r#"f, err := os.Open("input.txt")"#, ReferenceKind::Input, "input.txt")]
    #[case("go", r#"out, err := os.Create("result.txt")"#, ReferenceKind::Output, "result.txt")]
    #[case("rust", r#"let text = fs::read_to_string("input.txt")?;"#, ReferenceKind::Input, "input.txt")]
    #[case("rust", r#"fs::write("output.txt", text)?;"#, ReferenceKind::Output, "output.txt")]
    #[case("java", r#"BufferedReader r = new BufferedReader(new FileReader("in.csv"));"#, ReferenceKind::Input, "in.csv")]
    #[case("java", r#"PrintWriter w = new PrintWriter("out.txt");"#, ReferenceKind::Output, "out.txt")]
    #[case("ruby", r#"rows = CSV.read("people.csv")"#, ReferenceKind::Input, "people.csv")]
    #[case("ruby", r#"File.write("summary.txt", text)"#, ReferenceKind::Output, "summary.txt")]
    #[case("ruby", r#"require_relative "lib/tools""#, ReferenceKind::Dependency, "lib/tools")]
    #[case("lua", r#"local f = io.open("data.txt", "r")"#, ReferenceKind::Input, "data.txt")]
    #[case("lua", r#"local f = io.open("out.txt", "w")"#, ReferenceKind::Output, "out.txt")]
    #[case("lua", r#"dofile("config.lua")"#, ReferenceKind::Dependency, "config.lua")]
    #[case("matlab", "T = readtable('measurements.csv');", ReferenceKind::Input, "measurements.csv")]
    #[case("matlab", "writetable(T, 'cleaned.csv');", ReferenceKind::Output, "cleaned.csv")]
    #[case("matlab", "run('setup_paths.m')", ReferenceKind::Dependency, "setup_paths.m")]
    #[case("c", r#"FILE *in = fopen("input.dat", "r");"#, ReferenceKind::Input, "input.dat")]
    #[case("cpp", r#"std::ofstream out("result.txt");"#, ReferenceKind::Output, "result.txt")]
    #[case("c", r#"#include "parser.h""#, ReferenceKind::Dependency, "parser.h")]
    fn test_detects_reference(
        #[case] language: &str,
        #[case] line: &str,
        #[case] kind: ReferenceKind,
        #[case] path: &str,
    ) {
        let detections = DetectionPatternEngine::detect_line(language, line, 7);
        assert!(
            detections
                .iter()
                .any(|d| d.kind == kind && d.path == path && d.line_number == 7),
            "{language}: expected {kind:?} {path:?} in {line:?}, got {detections:?}"
        );
    }

    #[test]
    fn test_covered_languages() {
        let languages = DetectionPatternEngine::languages();
        for tag in [
            "r", "python", "sql", "shell", "julia", "javascript", "typescript", "go", "rust", "java",
            "ruby", "lua", "matlab", "c", "cpp",
        ] {
            assert!(languages.contains(&tag), "missing pattern table for {tag}");
            assert!(DetectionPatternEngine::supports(tag));
        }
    }

    #[test]
    fn test_language_without_table_detects_nothing() {
        assert!(!DetectionPatternEngine::supports("haskell"));
        assert!(DetectionPatternEngine::detect_line("haskell", "readFile \"x.txt\"", 1).is_empty());
    }

    #[test]
    fn test_several_references_on_one_line() {
        let detections = DetectionPatternEngine::detect_line(
            "r",
            r#"a <- read.csv("a.csv"); b <- read.csv("b.csv")"#,
            1,
        );
        let paths: Vec<_> = detections.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_file_detections_are_deduplicated_in_order() {
        let lines = [
            r#"source("helpers.R")"#,
            r#"x <- read.csv("b.csv")"#,
            r#"y <- read.csv("a.csv")"#,
            r#"z <- read.csv("b.csv")"#,
            r#"write.csv(x, "out.csv")"#,
        ];
        let detections = DetectionPatternEngine::detect_file("r", &lines);
        assert_eq!(detections.inputs, vec!["b.csv", "a.csv"]);
        assert_eq!(detections.outputs, vec!["out.csv"]);
        assert_eq!(detections.dependencies, vec!["helpers.R"]);
    }

    #[test]
    fn test_dependency_is_not_also_an_input() {
        let lines = [r#"exec(open("setup.py").read())"#];
        let detections = DetectionPatternEngine::detect_file("python", &lines);
        assert_eq!(detections.dependencies, vec!["setup.py"]);
        assert!(detections.inputs.is_empty(), "{:?}", detections.inputs);
    }
}
