use plotmap_shared::PopupTemplate;

pub const DATA_HOLDER_ID: &str = "property-data";
pub const LEGEND_ID: &str = "category-legend";
pub const PROPERTIES_ATTR: &str = "data-properties";
pub const CATEGORY_COLORS_ATTR: &str = "data-colors";

pub const DEFAULT_MAP_ID: &str = "propertyMap";
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const DEFAULT_MAX_ZOOM: u8 = 19;
pub const DEFAULT_GRACE_MS: u32 = 100;
pub const DEFAULT_READY_EVENT: &str = "plotmap:leaflet-ready";
pub const DEFAULT_READY_TIMEOUT_MS: u32 = 15_000;
pub const READY_POLL_MS: u32 = 200;
pub const REVALIDATE_DELAY_MS: u32 = 300;

const MAX_GRACE_MS: u32 = 2_000;
const MAX_TILE_ZOOM: u8 = 22;

/// Widget settings. Compiled defaults, optionally overridden per page by
/// `data-*` attributes on the data-holder element.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub map_id: String,
    pub tile_url: String,
    pub tile_attribution: String,
    pub max_zoom: u8,
    pub grace_ms: u32,
    pub ready_event: String,
    pub ready_timeout_ms: u32,
    pub popup: PopupTemplate,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_id: DEFAULT_MAP_ID.to_string(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
            max_zoom: DEFAULT_MAX_ZOOM,
            grace_ms: DEFAULT_GRACE_MS,
            ready_event: DEFAULT_READY_EVENT.to_string(),
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            popup: PopupTemplate::default(),
        }
    }
}

impl MapConfig {
    /// Apply overrides from an attribute lookup. Blank or unparsable values
    /// keep the default.
    pub fn with_overrides(mut self, attr: impl Fn(&str) -> Option<String>) -> Self {
        let text = |name: &str| {
            attr(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(id) = text("data-map-id") {
            self.map_id = id;
        }
        if let Some(url) = text("data-tile-url").filter(|u| u.contains("{z}")) {
            self.tile_url = url;
        }
        if let Some(attribution) = text("data-tile-attribution") {
            self.tile_attribution = attribution;
        }
        self.max_zoom = text("data-max-zoom")
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|z| (1..=MAX_TILE_ZOOM).contains(z))
            .unwrap_or(self.max_zoom);
        self.grace_ms = text("data-grace-ms")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|ms| *ms <= MAX_GRACE_MS)
            .unwrap_or(self.grace_ms);
        if let Some(event) = text("data-ready-event") {
            self.ready_event = event;
        }
        self.ready_timeout_ms = text("data-ready-timeout-ms")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(self.ready_timeout_ms);
        if let Some(path) = text("data-detail-path").filter(|p| p.contains("{id}")) {
            self.popup.detail_path = path;
        }
        if let Some(image) = text("data-placeholder-image") {
            self.popup.placeholder_image = image;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(attrs: &[(&str, &str)]) -> MapConfig {
        let attrs: HashMap<String, String> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MapConfig::default().with_overrides(|name| attrs.get(name).cloned())
    }

    #[test]
    fn defaults_match_server_template_anchors() {
        assert_eq!(DATA_HOLDER_ID, "property-data");
        assert_eq!(LEGEND_ID, "category-legend");
        assert_eq!(CATEGORY_COLORS_ATTR, "data-colors");
        assert_eq!(MapConfig::default().map_id, "propertyMap");
        assert_eq!(MapConfig::default().popup.detail_path, "/property/{id}");
    }

    #[test]
    fn no_overrides_keeps_defaults() {
        assert_eq!(with(&[]), MapConfig::default());
    }

    #[test]
    fn valid_overrides_apply() {
        let config = with(&[
            ("data-map-id", "listing-map"),
            ("data-max-zoom", "18"),
            ("data-grace-ms", "150"),
            ("data-ready-timeout-ms", "5000"),
            ("data-detail-path", "/plots/{id}"),
            ("data-tile-url", "https://tiles.example.com/{z}/{x}/{y}.png"),
        ]);
        assert_eq!(config.map_id, "listing-map");
        assert_eq!(config.max_zoom, 18);
        assert_eq!(config.grace_ms, 150);
        assert_eq!(config.ready_timeout_ms, 5000);
        assert_eq!(config.popup.detail_path, "/plots/{id}");
        assert_eq!(config.tile_url, "https://tiles.example.com/{z}/{x}/{y}.png");
    }

    #[test]
    fn invalid_overrides_fall_back() {
        let config = with(&[
            ("data-map-id", "   "),
            ("data-max-zoom", "40"),
            ("data-grace-ms", "soon"),
            ("data-ready-timeout-ms", "0"),
            ("data-detail-path", "/plots/"),
            ("data-tile-url", "https://tiles.example.com/static.png"),
        ]);
        assert_eq!(config, MapConfig::default());
    }
}
