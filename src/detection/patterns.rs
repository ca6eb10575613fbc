use super::{Capture, ReferenceKind};

/// Uncompiled form of a detection pattern.
pub(super) struct PatternSpec {
    pub language: &'static str,
    pub kind: ReferenceKind,
    pub capture: Capture,
    pub regex: &'static str,
}

/// Defines the pattern table for one or more languages.
///
/// Each row is `kind capture => regex`, where `capture` is either a group index
/// (`1`) or a group name (`path`).
macro_rules! define_patterns {
    ( $( [$($lang:literal),+] { $( $kind:ident $capture:tt => $regex:literal ),* $(,)? } )* ) => {
        pub(super) fn pattern_specs() -> Vec<PatternSpec> {
            let mut specs = Vec::new();
            $(
                for language in [$($lang),+] {
                    $(
                        specs.push(PatternSpec {
                            language,
                            kind: ReferenceKind::$kind,
                            capture: define_patterns!(@capture $capture),
                            regex: $regex,
                        });
                    )*
                }
            )*
            specs
        }
    };
    (@capture $pos:literal) => { Capture::Position($pos) };
    (@capture $name:ident) => { Capture::Named(stringify!($name)) };
}

define_patterns! {
    ["r"] {
        Input 1 => r#"\b(?:read\.(?:csv2?|delim2?|table)|read_(?:csv2?|tsv|delim|rds|lines|excel|parquet|feather)|readRDS|fread|read_xlsx|fromJSON|vroom)\s*\(\s*(?:file\s*=\s*)?["']([^"']+)["']"#,
        Input 1 => r#"\bload\s*\(\s*(?:file\s*=\s*)?["']([^"']+)["']"#,
        Output path => r#"\b(?:write\.(?:csv2?|table)|write_(?:csv|tsv|delim|rds|parquet|feather|xlsx)|saveRDS|fwrite|writeLines)\s*\([^,()]+,\s*(?:file\s*=\s*)?["'](?P<path>[^"']+)["']"#,
        Output path => r#"\bggsave\s*\(\s*(?:filename\s*=\s*)?["'](?P<path>[^"']+)["']"#,
        Output path => r#"\bsave\s*\(.*\bfile\s*=\s*["'](?P<path>[^"']+)["']"#,
        Dependency 1 => r#"\bsource\s*\(\s*(?:file\s*=\s*)?["']([^"']+)["']"#,
    }

    ["python"] {
        Input 1 => r#"\b(?:pd|pandas|pl|polars)\.(?:read_(?:csv|excel|json|parquet|table|pickle|feather|sql))\s*\(\s*["']([^"']+)["']"#,
        Input 1 => r#"\bopen\s*\(\s*["']([^"']+)["']\s*(?:\)|,\s*["']r[bt]?["'])"#,
        Input 1 => r#"\b(?:np|numpy)\.(?:load|loadtxt|genfromtxt)\s*\(\s*["']([^"']+)["']"#,
        Output path => r#"\.to_(?:csv|excel|json|parquet|pickle|feather)\s*\(\s*["'](?P<path>[^"']+)["']"#,
        Output path => r#"\bopen\s*\(\s*["'](?P<path>[^"']+)["']\s*,\s*["'][wax]b?\+?["']"#,
        Output path => r#"\b(?:np|numpy)\.(?:save|savetxt|savez)\s*\(\s*["'](?P<path>[^"']+)["']"#,
        Output path => r#"\b(?:plt|fig)\.savefig\s*\(\s*["'](?P<path>[^"']+)["']"#,
        Dependency 1 => r#"\bexec\s*\(\s*open\s*\(\s*["']([^"']+)["']"#,
        Dependency 1 => r#"\brunpy\.run_path\s*\(\s*["']([^"']+)["']"#,
    }

    ["sql"] {
        Input 1 => r#"(?i)\b(?:from|join)\s+([A-Za-z_][\w.]*)"#,
        Input 1 => r#"(?i)\bread_csv(?:_auto)?\s*\(\s*'([^']+)'"#,
        Output 1 => r#"(?i)\binsert\s+into\s+([A-Za-z_][\w.]*)"#,
        Output 1 => r#"(?i)\bcreate\s+(?:or\s+replace\s+)?(?:temp(?:orary)?\s+)?(?:table|view)\s+(?:if\s+not\s+exists\s+)?([A-Za-z_][\w.]*)"#,
        Output 1 => r#"(?i)\bcopy\s+.*\bto\s+'([^']+)'"#,
        Dependency 1 => r#"^\s*\\i(?:r)?\s+(\S+)"#,
    }

    ["shell"] {
        Input 1 => r#"\b(?:cat|head|tail|sort|wc|grep\s+\S+)\s+([\w./-]+\.\w+)"#,
        Input 1 => r#"<\s*([\w./-]+\.\w+)"#,
        Output 1 => r#">>?\s*([\w./-]+\.\w+)"#,
        Output 1 => r#"\btee\s+(?:-a\s+)?([\w./-]+\.\w+)"#,
        Dependency 1 => r#"(?:^|[;&|]\s*|\s)(?:source|\.)\s+([\w./-]+\.(?:sh|bash|zsh))"#,
        Dependency 1 => r#"\b(?:bash|sh|zsh)\s+([\w./-]+\.(?:sh|bash|zsh))"#,
    }

    ["julia"] {
        Input 1 => r#"\bCSV\.(?:read|File)\s*\(\s*"([^"]+)""#,
        Input 1 => r#"\breaddlm\s*\(\s*"([^"]+)""#,
        Input 1 => r#"\bopen\s*\(\s*"([^"]+)"\s*(?:\)|,\s*"r")"#,
        Output path => r#"\bCSV\.write\s*\(\s*"(?P<path>[^"]+)""#,
        Output path => r#"\bwritedlm\s*\(\s*"(?P<path>[^"]+)""#,
        Output path => r#"\bsavefig\s*\(\s*"(?P<path>[^"]+)""#,
        Output path => r#"\bopen\s*\(\s*"(?P<path>[^"]+)"\s*,\s*"[wa]""#,
        Dependency 1 => r#"\binclude\s*\(\s*"([^"]+)""#,
    }

    ["javascript", "typescript"] {
        Input 1 => r#"\bfs(?:\.promises)?\.(?:readFileSync|readFile|createReadStream)\s*\(\s*["'`]([^"'`]+)["'`]"#,
        Output 1 => r#"\bfs(?:\.promises)?\.(?:writeFileSync|writeFile|appendFileSync|appendFile|createWriteStream)\s*\(\s*["'`]([^"'`]+)["'`]"#,
        Dependency 1 => r#"\brequire\s*\(\s*["'](\.{1,2}/[^"']+)["']"#,
        Dependency 1 => r#"\bimport\s+(?:.+?\s+from\s+)?["'](\.{1,2}/[^"']+)["']"#,
    }

    ["go"] {
        Input 1 => r#"\b(?:os\.(?:Open|ReadFile)|ioutil\.ReadFile)\s*\(\s*"([^"]+)""#,
        Output 1 => r#"\b(?:os\.(?:Create|WriteFile)|ioutil\.WriteFile)\s*\(\s*"([^"]+)""#,
        Output 1 => r#"\bos\.OpenFile\s*\(\s*"([^"]+)"\s*,[^)]*O_(?:WRONLY|RDWR|APPEND|CREATE)"#,
    }

    ["rust"] {
        Input 1 => r#"\b(?:fs::read_to_string|fs::read|File::open)\s*\(\s*"([^"]+)""#,
        Input 1 => r#"\binclude_(?:str|bytes)!\s*\(\s*"([^"]+)""#,
        Output 1 => r#"\b(?:fs::write|File::create)\s*\(\s*"([^"]+)""#,
        Dependency 1 => r#"\binclude!\s*\(\s*"([^"]+)""#,
        Dependency 1 => r#"#\[path\s*=\s*"([^"]+)"\]"#,
    }

    ["java"] {
        Input 1 => r#"\bnew\s+(?:FileReader|FileInputStream|Scanner\s*\(\s*new\s+File)\s*\(\s*"([^"]+)""#,
        Input 1 => r#"\bFiles\.(?:readAllLines|readString|readAllBytes|newBufferedReader|lines)\s*\(\s*(?:Paths\.get|Path\.of)\s*\(\s*"([^"]+)""#,
        Output 1 => r#"\bnew\s+(?:FileWriter|FileOutputStream|PrintWriter)\s*\(\s*"([^"]+)""#,
        Output 1 => r#"\bFiles\.(?:write|writeString|newBufferedWriter)\s*\(\s*(?:Paths\.get|Path\.of)\s*\(\s*"([^"]+)""#,
    }

    ["ruby"] {
        Input 1 => r#"\b(?:File\.(?:read|readlines|foreach)|CSV\.(?:read|foreach)|YAML\.load_file|JSON\.load_file)\s*\(\s*["']([^"']+)["']"#,
        Input 1 => r#"\bFile\.open\s*\(\s*["']([^"']+)["']\s*(?:\)|,\s*["']r)"#,
        Output path => r#"\bFile\.write\s*\(\s*["'](?P<path>[^"']+)["']"#,
        Output path => r#"\b(?:File|CSV)\.open\s*\(\s*["'](?P<path>[^"']+)["']\s*,\s*["'][wa]"#,
        Dependency 1 => r#"\brequire_relative\s*\(?\s*["']([^"']+)["']"#,
        Dependency 1 => r#"\bload\s*\(?\s*["']([^"']+\.rb)["']"#,
    }

    ["lua"] {
        Input 1 => r#"\bio\.open\s*\(\s*["']([^"']+)["']\s*(?:\)|,\s*["']r)"#,
        Input 1 => r#"\bio\.lines\s*\(\s*["']([^"']+)["']"#,
        Output 1 => r#"\bio\.open\s*\(\s*["']([^"']+)["']\s*,\s*["'][wa]"#,
        Dependency 1 => r#"\bdofile\s*\(\s*["']([^"']+)["']"#,
        Dependency 1 => r#"\bloadfile\s*\(\s*["']([^"']+)["']"#,
    }

    ["matlab"] {
        Input 1 => r#"\b(?:readtable|readmatrix|readcell|csvread|dlmread|load|imread|fileread)\s*\(\s*'([^']+)'"#,
        Output 1 => r#"\b(?:writetable|writematrix|writecell|csvwrite|dlmwrite|imwrite)\s*\([^,()]+,\s*'([^']+)'"#,
        Output 1 => r#"\b(?:save|saveas|print)\s*\(\s*(?:[^,()]+,\s*)?'([^']+\.\w+)'"#,
        Dependency 1 => r#"\brun\s*\(\s*'([^']+)'"#,
    }

    ["c", "cpp"] {
        Input 1 => r#"\bfopen\s*\(\s*"([^"]+)"\s*,\s*"r"#,
        Input 1 => r#"\b(?:std::)?ifstream\s+\w+\s*[({]\s*"([^"]+)""#,
        Output 1 => r#"\bfopen\s*\(\s*"([^"]+)"\s*,\s*"[wa]"#,
        Output 1 => r#"\b(?:std::)?ofstream\s+\w+\s*[({]\s*"([^"]+)""#,
        Dependency 1 => r#"^\s*#\s*include\s+"([^"]+)""#,
    }
}
