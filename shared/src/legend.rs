use crate::colors::{CategoryColors, safe_color_or_default};

/// One legend row: a swatch color and its category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

impl LegendEntry {
    pub fn swatch_style(&self) -> String {
        format!("background-color: {};", self.color)
    }
}

/// Legend rows in mapping order. Unsafe colors are shown as the default tint,
/// matching what the markers of that category use.
pub fn legend_entries(colors: &CategoryColors) -> Vec<LegendEntry> {
    colors
        .iter()
        .map(|(label, color)| LegendEntry {
            label: label.to_string(),
            color: safe_color_or_default(color).to_string(),
        })
        .collect()
}
