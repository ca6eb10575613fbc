use clap::{Parser, ValueEnum};
use putgraph::annotation::annotations_for_nodes;
use putgraph::config::set_default_verbosity;
use putgraph::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// What the CLI prints.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatCli {
    /// Mermaid flowchart text
    Mermaid,
    /// The workflow table as JSON
    Table,
    /// Suggested `put` annotations for every node
    Annotations,
}

/// Where nodes come from.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeCli {
    /// Only `put` annotations
    Annotations,
    /// Only detected file reads, writes and sourced scripts
    Auto,
    /// Both, combined with `--merge-strategy`
    Merge,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MergeCli {
    #[value(name = "manual_priority")]
    ManualPriority,
    Supplement,
    Union,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionCli {
    #[value(name = "TD", alias = "TB")]
    TopDown,
    #[value(name = "LR")]
    LeftRight,
    #[value(name = "BT")]
    BottomTop,
    #[value(name = "RL")]
    RightLeft,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LabelsCli {
    Label,
    Id,
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClicksCli {
    Vscode,
    File,
    Rstudio,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputCli {
    /// Text with a short header and an issue summary
    Console,
    /// Only the text, for piping
    Raw,
    /// Write to `--output-file`
    File,
}

/// Build Mermaid workflow diagrams from `put` annotations in source comments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File or directory to scan
    path: PathBuf,

    /// Where nodes come from
    #[arg(long, value_enum, default_value = "annotations")]
    mode: ModeCli,

    /// How merge mode combines nodes
    #[arg(long, value_enum, default_value = "manual_priority")]
    merge_strategy: MergeCli,

    /// Only scan the top level of a directory
    #[arg(long)]
    no_recursive: bool,

    /// Only scan files whose name matches this regular expression
    #[arg(long)]
    pattern: Option<String>,

    /// Color theme (light, dark, auto, minimal, github, viridis, magma, plasma, cividis)
    #[arg(long, default_value = "light")]
    theme: String,

    /// JSON file overriding theme colors per node type
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Flowchart direction
    #[arg(long, value_enum, ignore_case = true, default_value = "TD")]
    direction: DirectionCli,

    /// Node text
    #[arg(long, value_enum, default_value = "label")]
    node_labels: LabelsCli,

    /// Label connections with the shared file name
    #[arg(long)]
    show_files: bool,

    /// Draw files as nodes between producer and consumer
    #[arg(long)]
    show_artifacts: bool,

    /// Group nodes by source file
    #[arg(long)]
    group_by_file: bool,

    /// Render start/end nodes like process nodes
    #[arg(long)]
    no_boundaries: bool,

    /// Omit classDef/class styling
    #[arg(long)]
    no_styles: bool,

    /// Add click directives opening the source file
    #[arg(long, value_enum)]
    clicks: Option<ClicksCli>,

    /// Title comment at the top of the diagram
    #[arg(long)]
    title: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "mermaid")]
    format: FormatCli,

    /// Generate annotations one pair per line
    #[arg(long)]
    multiline: bool,

    /// Output sink
    #[arg(short, long, value_enum, default_value = "console")]
    output: OutputCli,

    /// Target of `--output file`
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Increase logging (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal.raised(cli.verbose)
    };
    set_default_verbosity(verbosity);
    // RUST_LOG wins over -v/-q when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("putgraph={}", verbosity.level_filter())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let output_mode = match cli.output {
        OutputCli::Console => OutputMode::Console,
        OutputCli::Raw => OutputMode::Raw,
        OutputCli::File => OutputMode::File,
    };
    if output_mode == OutputMode::File && cli.output_file.is_none() {
        exit_with_error("--output file requires --output-file <PATH>");
    }

    let table = scan(&cli);
    let text = match cli.format {
        FormatCli::Mermaid => render_diagram(&cli, &table),
        FormatCli::Table => table
            .rows_to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize table: {}", e))),
        FormatCli::Annotations => generate_annotations(&cli, &table),
    };

    match output_mode {
        OutputMode::Raw => println!("{}", text),
        OutputMode::Console => {
            let graph = WorkflowGraph::from_table(&table);
            println!(
                "--- {} nodes, {} connections ---\n",
                table.len(),
                graph.edges().len()
            );
            println!("{}", text);
        }
        OutputMode::File => {
            let Some(target) = &cli.output_file else {
                exit_with_error("--output file requires --output-file <PATH>");
            };
            fs::write(target, &text).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", target.display(), e))
            });
            if verbosity.warnings_enabled() {
                eprintln!("Wrote {}", target.display());
            }
        }
    }

    print_issue_summary(&table, verbosity);
}

fn scan(cli: &Cli) -> WorkflowTable {
    let mut builder = Scanner::builder()
        .recursive(!cli.no_recursive)
        .detection(match cli.mode {
            ModeCli::Annotations => DetectionMode::Annotations,
            ModeCli::Auto => DetectionMode::Auto,
            ModeCli::Merge => DetectionMode::Merge,
        })
        .merge_strategy(match cli.merge_strategy {
            MergeCli::ManualPriority => MergeStrategy::ManualPriority,
            MergeCli::Supplement => MergeStrategy::Supplement,
            MergeCli::Union => MergeStrategy::Union,
        });
    if let Some(pattern) = &cli.pattern {
        builder = builder.include_pattern(pattern);
    }
    let scanner = builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    scanner
        .scan(&cli.path)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn render_diagram(cli: &Cli, table: &WorkflowTable) -> String {
    let mut options = DiagramOptions::new()
        .with_theme(cli.theme.as_str())
        .with_direction(match cli.direction {
            DirectionCli::TopDown => Direction::TopDown,
            DirectionCli::LeftRight => Direction::LeftRight,
            DirectionCli::BottomTop => Direction::BottomTop,
            DirectionCli::RightLeft => Direction::RightLeft,
        })
        .with_node_labels(match cli.node_labels {
            LabelsCli::Label => NodeLabelMode::Label,
            LabelsCli::Id => NodeLabelMode::Id,
            LabelsCli::Both => NodeLabelMode::Both,
        })
        .with_show_files(cli.show_files)
        .with_show_artifacts(cli.show_artifacts)
        .with_group_by_file(cli.group_by_file)
        .with_boundaries(!cli.no_boundaries)
        .with_styles(!cli.no_styles);

    if let Some(path) = &cli.palette {
        let base = Theme::from_name(&cli.theme).unwrap_or_default();
        let json = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read palette '{}': {}", path.display(), e))
        });
        let palette =
            Palette::from_json(base, &json).unwrap_or_else(|e| exit_with_error(&e.to_string()));
        options = options.with_palette(palette);
    }
    if let Some(clicks) = cli.clicks {
        options = options.with_clicks(match clicks {
            ClicksCli::Vscode => ClickProtocol::Vscode,
            ClicksCli::File => ClickProtocol::File,
            ClicksCli::Rstudio => ClickProtocol::Rstudio,
        });
    }
    if let Some(title) = &cli.title {
        options = options.with_title(title.as_str());
    }

    DiagramRenderer::new(options).render(table).diagram
}

fn generate_annotations(cli: &Cli, table: &WorkflowTable) -> String {
    let layout = if cli.multiline {
        AnnotationLayout::Multiline
    } else {
        AnnotationLayout::SingleLine
    };
    let generated = annotations_for_nodes(&table.nodes, layout)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to generate annotations: {}", e)));

    generated
        .iter()
        .map(|g| format!("{} ({}):\n{}", g.file_path.display(), g.node_id, g.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn print_issue_summary(table: &WorkflowTable, verbosity: Verbosity) {
    if table.issues.is_empty() || !verbosity.warnings_enabled() {
        return;
    }
    let count = |kind| table.issues_of(kind).count();
    eprintln!(
        "\n{} issue(s): {} syntax, {} validation, {} io",
        table.issues.len(),
        count(IssueKind::Syntax),
        count(IssueKind::Validation),
        count(IssueKind::Io)
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
