use crate::error::ConfigError;
use crate::model::NodeType;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Fill, stroke and text color of one node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
    pub color: String,
}

impl NodeStyle {
    /// Builds a style for `node_type`, rejecting anything that is not `#rgb` or `#rrggbb`.
    pub fn new(node_type: NodeType, fill: &str, stroke: &str, color: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            fill: checked_color(node_type, fill)?,
            stroke: checked_color(node_type, stroke)?,
            color: checked_color(node_type, color)?,
        })
    }

    fn from_static((fill, stroke, color): (&str, &str, &str)) -> Self {
        Self {
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            color: color.to_string(),
        }
    }
}

pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn checked_color(node_type: NodeType, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if is_hex_color(value) {
        Ok(value.to_string())
    } else {
        Err(ConfigError::InvalidColor {
            node_type: node_type.to_string(),
            value: value.to_string(),
        })
    }
}

macro_rules! define_themes {
    ( $( ($variant:ident, $name:literal, [ $( ($fill:literal, $stroke:literal, $color:literal) ),* $(,)? ]) ),* $(,)? ) => {
        /// The built-in color themes.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum Theme {
            #[default]
            $( $variant, )*
        }

        impl Theme {
            pub const ALL: &'static [Theme] = &[ $( Theme::$variant, )* ];

            pub fn name(self) -> &'static str {
                match self {
                    $( Theme::$variant => $name, )*
                }
            }

            /// Styles in [`NodeType::ALL`] order.
            fn table(self) -> [(&'static str, &'static str, &'static str); 7] {
                match self {
                    $( Theme::$variant => [ $( ($fill, $stroke, $color), )* ], )*
                }
            }
        }
    };
}

// Rows: input, process, output, decision, start, end, artifact.
define_themes! {
    (Light, "light", [
        ("#e1f5fe", "#0277bd", "#01579b"),
        ("#f3e5f5", "#7b1fa2", "#4a148c"),
        ("#e8f5e9", "#2e7d32", "#1b5e20"),
        ("#fff3e0", "#ef6c00", "#e65100"),
        ("#e0f2f1", "#00695c", "#004d40"),
        ("#ffebee", "#c62828", "#b71c1c"),
        ("#f5f5f5", "#616161", "#212121"),
    ]),
    (Dark, "dark", [
        ("#0d47a1", "#64b5f6", "#ffffff"),
        ("#4a148c", "#ce93d8", "#ffffff"),
        ("#1b5e20", "#81c784", "#ffffff"),
        ("#e65100", "#ffb74d", "#ffffff"),
        ("#004d40", "#4db6ac", "#ffffff"),
        ("#b71c1c", "#e57373", "#ffffff"),
        ("#424242", "#bdbdbd", "#ffffff"),
    ]),
    (Auto, "auto", [
        ("#4fc3f7", "#0288d1", "#000000"),
        ("#ba68c8", "#7b1fa2", "#000000"),
        ("#81c784", "#388e3c", "#000000"),
        ("#ffb74d", "#f57c00", "#000000"),
        ("#4db6ac", "#00796b", "#000000"),
        ("#e57373", "#d32f2f", "#000000"),
        ("#bdbdbd", "#616161", "#000000"),
    ]),
    (Minimal, "minimal", [
        ("#ffffff", "#333333", "#333333"),
        ("#ffffff", "#666666", "#333333"),
        ("#ffffff", "#333333", "#333333"),
        ("#f7f7f7", "#333333", "#333333"),
        ("#ffffff", "#000000", "#000000"),
        ("#ffffff", "#000000", "#000000"),
        ("#f7f7f7", "#999999", "#333333"),
    ]),
    (Github, "github", [
        ("#ddf4ff", "#0969da", "#0a3069"),
        ("#fbefff", "#8250df", "#3e1f79"),
        ("#dafbe1", "#1a7f37", "#044f1e"),
        ("#fff8c5", "#9a6700", "#4d2d00"),
        ("#dafbe1", "#1f883d", "#044f1e"),
        ("#ffebe9", "#cf222e", "#82071e"),
        ("#f6f8fa", "#57606a", "#24292f"),
    ]),
    (Viridis, "viridis", [
        ("#440154", "#2a0033", "#ffffff"),
        ("#443983", "#2c2458", "#ffffff"),
        ("#31688e", "#1f4561", "#ffffff"),
        ("#21918c", "#15605d", "#ffffff"),
        ("#35b779", "#237a51", "#000000"),
        ("#90d743", "#5f8f2c", "#000000"),
        ("#fde725", "#a89a18", "#000000"),
    ]),
    (Magma, "magma", [
        ("#000004", "#3b0f70", "#ffffff"),
        ("#2c115f", "#721f81", "#ffffff"),
        ("#721f81", "#b73779", "#ffffff"),
        ("#b73779", "#f1605d", "#ffffff"),
        ("#f1605d", "#feb078", "#000000"),
        ("#feb078", "#fcfdbf", "#000000"),
        ("#fcfdbf", "#feb078", "#000000"),
    ]),
    (Plasma, "plasma", [
        ("#0d0887", "#5302a3", "#ffffff"),
        ("#5302a3", "#8b0aa5", "#ffffff"),
        ("#8b0aa5", "#b83289", "#ffffff"),
        ("#b83289", "#db5c68", "#ffffff"),
        ("#db5c68", "#f48849", "#000000"),
        ("#f48849", "#febc2a", "#000000"),
        ("#f0f921", "#febc2a", "#000000"),
    ]),
    (Cividis, "cividis", [
        ("#00224e", "#123570", "#ffffff"),
        ("#123570", "#3b496c", "#ffffff"),
        ("#3b496c", "#575d6d", "#ffffff"),
        ("#575d6d", "#707173", "#ffffff"),
        ("#8a8779", "#a69d75", "#000000"),
        ("#c3b369", "#dfcb5d", "#000000"),
        ("#fee838", "#dfcb5d", "#000000"),
    ]),
}

impl Theme {
    /// Case-insensitive lookup. `None` for unknown names; the renderer then
    /// falls back to [`Theme::Light`] with a warning.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Theme::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub fn style(self, node_type: NodeType) -> NodeStyle {
        let index = NodeType::ALL
            .iter()
            .position(|t| *t == node_type)
            .unwrap_or_default();
        NodeStyle::from_static(self.table()[index])
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One partially specified entry of a JSON palette.
#[derive(Debug, Default, Deserialize)]
struct StyleOverride {
    fill: Option<String>,
    stroke: Option<String>,
    color: Option<String>,
}

/// A named base theme with per-node-type overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    base: Theme,
    overrides: BTreeMap<NodeType, NodeStyle>,
}

impl Palette {
    pub fn new(base: Theme) -> Self {
        Self {
            base,
            overrides: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> Theme {
        self.base
    }

    /// Replaces the style of one node type; colors are validated.
    pub fn with_style(
        mut self,
        node_type: NodeType,
        fill: &str,
        stroke: &str,
        color: &str,
    ) -> Result<Self, ConfigError> {
        self.overrides
            .insert(node_type, NodeStyle::new(node_type, fill, stroke, color)?);
        Ok(self)
    }

    /// Parses a JSON object keyed by node type, e.g.
    /// `{"input": {"fill": "#fff"}, "output": {"stroke": "#000", "color": "#333"}}`.
    ///
    /// Attributes left out of an entry are taken from `base`.
    pub fn from_json(base: Theme, json: &str) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, StyleOverride> =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidPalette(e.to_string()))?;

        let mut palette = Palette::new(base);
        for (tag, entry) in entries {
            let node_type: NodeType = tag.parse()?;
            let inherited = base.style(node_type);
            palette = palette.with_style(
                node_type,
                entry.fill.as_deref().unwrap_or(&inherited.fill),
                entry.stroke.as_deref().unwrap_or(&inherited.stroke),
                entry.color.as_deref().unwrap_or(&inherited.color),
            )?;
        }
        Ok(palette)
    }

    pub fn style(&self, node_type: NodeType) -> NodeStyle {
        self.overrides
            .get(&node_type)
            .cloned()
            .unwrap_or_else(|| self.base.style(node_type))
    }
}

impl From<Theme> for Palette {
    fn from(theme: Theme) -> Self {
        Palette::new(theme)
    }
}
