//! Comment syntax registry.
//!
//! Maps file extensions to a [`Language`], and each language to the comment prefix
//! group its annotations use plus the block-comment delimiters it supports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The line-comment marker family a language belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentGroup {
    /// `#` (R, Python, shell, ...)
    Hash,
    /// `--` (SQL, Lua, Haskell, ...)
    Dash,
    /// `//` (C family, JavaScript, Rust, ...)
    Slash,
    /// `%` (MATLAB, LaTeX, Erlang)
    Percent,
}

impl CommentGroup {
    pub fn prefix(self) -> &'static str {
        match self {
            CommentGroup::Hash => "#",
            CommentGroup::Dash => "--",
            CommentGroup::Slash => "//",
            CommentGroup::Percent => "%",
        }
    }
}

impl fmt::Display for CommentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Opening and closing markers of a block comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDelimiters {
    pub open: &'static str,
    pub close: &'static str,
}

impl BlockDelimiters {
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self { open, close }
    }
}

const C_BLOCK: Option<BlockDelimiters> = Some(BlockDelimiters::new("/*", "*/"));
const LUA_BLOCK: Option<BlockDelimiters> = Some(BlockDelimiters::new("--[[", "]]"));
const HASKELL_BLOCK: Option<BlockDelimiters> = Some(BlockDelimiters::new("{-", "-}"));
const MATLAB_BLOCK: Option<BlockDelimiters> = Some(BlockDelimiters::new("%{", "%}"));
const JULIA_BLOCK: Option<BlockDelimiters> = Some(BlockDelimiters::new("#=", "=#"));
const POWERSHELL_BLOCK: Option<BlockDelimiters> = Some(BlockDelimiters::new("<#", "#>"));

/// Defines the language table: the enum, its tag, comment group, extensions and block delimiters.
macro_rules! define_languages {
    ( $( ($variant:ident, $tag:literal, $group:ident, [$($ext:literal),+ $(,)?], $block:expr) ),* $(,)? ) => {
        /// A source language recognized by the scanner.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Language {
            $( $variant, )*
        }

        impl Language {
            /// Every registered language, in registry order.
            pub const ALL: &'static [Language] = &[ $( Language::$variant, )* ];

            /// Short lowercase tag, also used as the `file_type` column.
            pub fn tag(self) -> &'static str {
                match self {
                    $( Language::$variant => $tag, )*
                }
            }

            pub fn comment_group(self) -> CommentGroup {
                match self {
                    $( Language::$variant => CommentGroup::$group, )*
                }
            }

            /// Lowercase extensions (without the dot) mapped to this language.
            pub fn extensions(self) -> &'static [&'static str] {
                match self {
                    $( Language::$variant => &[ $( $ext ),+ ], )*
                }
            }

            pub fn block_delimiters(self) -> Option<BlockDelimiters> {
                match self {
                    $( Language::$variant => $block, )*
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $tag => Some(Language::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_languages! {
    // `#` family
    (R, "r", Hash, ["r"], None),
    (Python, "python", Hash, ["py", "pyw", "pyi"], None),
    (Shell, "shell", Hash, ["sh", "bash", "zsh", "ksh"], None),
    (Julia, "julia", Hash, ["jl"], JULIA_BLOCK),
    (Ruby, "ruby", Hash, ["rb", "rake"], None),
    (Perl, "perl", Hash, ["pl", "pm"], None),
    (Yaml, "yaml", Hash, ["yml", "yaml"], None),
    (Toml, "toml", Hash, ["toml"], None),
    (PowerShell, "powershell", Hash, ["ps1", "psm1"], POWERSHELL_BLOCK),
    (Elixir, "elixir", Hash, ["ex", "exs"], None),
    (Nim, "nim", Hash, ["nim"], None),
    (Tcl, "tcl", Hash, ["tcl"], None),
    (CMake, "cmake", Hash, ["cmake"], None),
    (Makefile, "makefile", Hash, ["mk", "mak"], None),
    (Dockerfile, "dockerfile", Hash, ["dockerfile"], None),

    // `--` family
    (Sql, "sql", Dash, ["sql"], C_BLOCK),
    (Lua, "lua", Dash, ["lua"], LUA_BLOCK),
    (Haskell, "haskell", Dash, ["hs", "lhs"], HASKELL_BLOCK),
    (Elm, "elm", Dash, ["elm"], HASKELL_BLOCK),
    (Ada, "ada", Dash, ["adb", "ads"], None),
    (Vhdl, "vhdl", Dash, ["vhd", "vhdl"], None),

    // `//` family
    (JavaScript, "javascript", Slash, ["js", "mjs", "cjs", "jsx"], C_BLOCK),
    (TypeScript, "typescript", Slash, ["ts", "tsx", "mts", "cts"], C_BLOCK),
    (C, "c", Slash, ["c", "h"], C_BLOCK),
    (Cpp, "cpp", Slash, ["cpp", "cc", "cxx", "hpp", "hh", "hxx"], C_BLOCK),
    (Java, "java", Slash, ["java"], C_BLOCK),
    (Go, "go", Slash, ["go"], C_BLOCK),
    (Rust, "rust", Slash, ["rs"], C_BLOCK),
    (Swift, "swift", Slash, ["swift"], C_BLOCK),
    (Kotlin, "kotlin", Slash, ["kt", "kts"], C_BLOCK),
    (Scala, "scala", Slash, ["scala", "sc"], C_BLOCK),
    (CSharp, "csharp", Slash, ["cs"], C_BLOCK),
    (Php, "php", Slash, ["php"], C_BLOCK),
    (Dart, "dart", Slash, ["dart"], C_BLOCK),
    (Groovy, "groovy", Slash, ["groovy", "gradle"], C_BLOCK),
    (Zig, "zig", Slash, ["zig"], None),

    // `%` family
    (Matlab, "matlab", Percent, ["m"], MATLAB_BLOCK),
    (Tex, "tex", Percent, ["tex", "sty"], None),
    (Erlang, "erlang", Percent, ["erl", "hrl"], None),
}

impl Language {
    pub fn all() -> &'static [Language] {
        Language::ALL
    }

    /// Resolves a language from a bare extension, ignoring case and a leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&extension.as_str()))
    }

    /// Resolves a language from a path's extension, falling back to the file name
    /// for extension-less files such as `Dockerfile` or `Makefile`.
    pub fn from_path(path: &Path) -> Option<Self> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            return Self::from_extension(ext);
        }
        match path.file_name()?.to_str()? {
            "Dockerfile" => Some(Language::Dockerfile),
            "Makefile" | "makefile" | "GNUmakefile" => Some(Language::Makefile),
            _ => None,
        }
    }

    /// The line-comment prefix of this language's group.
    pub fn comment_prefix(self) -> &'static str {
        self.comment_group().prefix()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
