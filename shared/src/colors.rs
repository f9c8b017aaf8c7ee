use serde_json::{Map, Value};

/// Marker tint for categories missing from the color mapping.
pub const DEFAULT_MARKER_COLOR: &str = "#4f46e5";

const MAX_NAMED_COLOR_LEN: usize = 32;
const COLOR_FUNCTIONS: &[&str] = &["rgb(", "rgba(", "hsl(", "hsla("];

/// Category label to CSS color, in the order the server emitted them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryColors {
    entries: Vec<(String, String)>,
}

impl CategoryColors {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Build from a JSON object. Returns the mapping and how many entries were
    /// dropped because their value was not a string.
    pub fn from_json_object(object: &Map<String, Value>) -> (Self, usize) {
        let mut entries = Vec::with_capacity(object.len());
        let mut dropped = 0;
        for (category, value) in object {
            match value.as_str() {
                Some(color) => entries.push((category.clone(), color.trim().to_string())),
                None => dropped += 1,
            }
        }
        (Self { entries }, dropped)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    /// Color for a category, falling back to the default for unknown
    /// categories and for values that are not a plain CSS color.
    pub fn color_for(&self, category: &str) -> &str {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, color)| safe_color_or_default(color))
            .unwrap_or(DEFAULT_MARKER_COLOR)
    }
}

pub fn safe_color_or_default(color: &str) -> &str {
    if is_safe_css_color(color) {
        color
    } else {
        DEFAULT_MARKER_COLOR
    }
}

/// Accepts hex colors, bare named colors and the rgb/hsl function forms.
/// Anything else could break out of an inline `style` attribute.
pub fn is_safe_css_color(color: &str) -> bool {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }

    let lower = color.to_ascii_lowercase();
    if let Some(prefix) = COLOR_FUNCTIONS.iter().find(|f| lower.starts_with(**f)) {
        let Some(args) = lower[prefix.len()..].strip_suffix(')') else {
            return false;
        };
        return !args.is_empty()
            && args
                .bytes()
                .all(|b| b.is_ascii_digit() || b" .,%/-+deg".contains(&b));
    }

    !color.is_empty()
        && color.len() <= MAX_NAMED_COLOR_LEN
        && color.bytes().all(|b| b.is_ascii_alphabetic())
}
