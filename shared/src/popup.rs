use std::fmt::Write;

use crate::html::{escape, safe_image_src, safe_url, tel_digits};
use crate::price::{format_area, price_label};
use crate::property::Property;

pub const DEFAULT_DETAIL_PATH: &str = "/property/{id}";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/web/static/img/placeholder.png";
const ID_PLACEHOLDER: &str = "{id}";

/// Renders the popup card for a property. Every interpolated field is escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupTemplate {
    /// Detail page path with an `{id}` placeholder.
    pub detail_path: String,
    pub placeholder_image: String,
}

impl Default for PopupTemplate {
    fn default() -> Self {
        Self {
            detail_path: DEFAULT_DETAIL_PATH.to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl PopupTemplate {
    pub fn detail_href(&self, property: &Property) -> Option<String> {
        let id = property.id.trim();
        if id.is_empty() {
            return None;
        }
        let encoded: String = id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            .collect();
        if encoded.is_empty() {
            return None;
        }
        Some(self.detail_path.replace(ID_PLACEHOLDER, &encoded))
    }

    pub fn render(&self, property: &Property) -> String {
        let placeholder = safe_url(&self.placeholder_image).unwrap_or(DEFAULT_PLACEHOLDER_IMAGE);
        let image = property
            .image_url
            .as_deref()
            .and_then(safe_image_src)
            .unwrap_or(placeholder);
        let name = escape(&property.name);

        let mut html = String::with_capacity(768);
        html.push_str(r#"<div class="plotmap-popup">"#);
        let _ = write!(
            html,
            r#"<img class="plotmap-popup__image" src="{}" alt="{name}" data-fallback="{}" onerror="this.onerror=null;this.src=this.dataset.fallback;" />"#,
            escape(image),
            escape(placeholder),
        );
        html.push_str(r#"<div class="plotmap-popup__body">"#);
        let _ = write!(html, r#"<h4 class="plotmap-popup__title">{name}</h4>"#);
        if !property.property_type.is_empty() {
            let _ = write!(
                html,
                r#"<div class="plotmap-popup__category">{}</div>"#,
                escape(&property.property_type)
            );
        }
        if !property.address.is_empty() {
            let _ = write!(
                html,
                r#"<div class="plotmap-popup__address">{}</div>"#,
                escape(&property.address)
            );
        }
        let _ = write!(
            html,
            r#"<div class="plotmap-popup__price">{}</div>"#,
            escape(&price_label(property.listed_price()))
        );
        if let Some(area) = property.listed_plot_area() {
            let _ = write!(
                html,
                r#"<div class="plotmap-popup__area">Plot Area: {}</div>"#,
                escape(&format_area(area))
            );
        }

        html.push_str(r#"<div class="plotmap-popup__actions">"#);
        if let Some(href) = self.detail_href(property) {
            let _ = write!(
                html,
                r#"<a class="plotmap-popup__details" href="{}">View Details</a>"#,
                escape(&href)
            );
        }
        if let Some(tel) = property.contact_phone.as_deref().and_then(tel_digits) {
            let _ = write!(
                html,
                r#"<a class="plotmap-popup__call" href="tel:{tel}">Call</a>"#
            );
        }
        html.push_str("</div></div></div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sea_view() -> Property {
        Property {
            id: "1".into(),
            name: "Sea View".into(),
            property_type: "Villa".into(),
            latitude: Some(19.07),
            longitude: Some(72.87),
            price: Some(2_500_000.0),
            ..Property::default()
        }
    }

    #[test]
    fn renders_core_fields() {
        let html = PopupTemplate::default().render(&sea_view());
        assert!(html.contains(">Sea View</h4>"));
        assert!(html.contains(">Villa</div>"));
        assert!(html.contains("\u{20B9}25,00,000"));
        assert!(html.contains(r#"href="/property/1""#));
    }

    #[test]
    fn optional_sections_follow_data() {
        let template = PopupTemplate::default();
        let html = template.render(&sea_view());
        assert!(!html.contains("Plot Area"));
        assert!(!html.contains("tel:"));

        let property = Property {
            plot_area: Some(1200.0),
            contact_phone: Some("+91 98765 43210".into()),
            ..sea_view()
        };
        let html = template.render(&property);
        assert!(html.contains("Plot Area: 1,200 sq.ft"));
        assert!(html.contains(r#"href="tel:+919876543210""#));
    }

    #[test]
    fn missing_image_uses_placeholder() {
        let html = PopupTemplate::default().render(&sea_view());
        assert!(html.contains(&format!(r#"src="{DEFAULT_PLACEHOLDER_IMAGE}""#)));
        assert!(html.contains(&format!(r#"data-fallback="{DEFAULT_PLACEHOLDER_IMAGE}""#)));
    }

    #[test]
    fn inline_image_is_rendered() {
        let property = Property {
            image_url: Some("data:image/png;base64,iVBORw0KGgo=".into()),
            ..sea_view()
        };
        let html = PopupTemplate::default().render(&property);
        assert!(html.contains(r#"src="data:image/png;base64,iVBORw0KGgo=""#));
    }

    #[test]
    fn hostile_fields_are_escaped() {
        let property = Property {
            name: "<script>alert(1)</script>".into(),
            address: r#"" onmouseover="x"#.into(),
            property_type: "<b>Villa</b>".into(),
            image_url: Some("javascript:alert(1)".into()),
            ..sea_view()
        };
        let html = PopupTemplate::default().render(&property);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&quot; onmouseover=&quot;x"));
    }

    #[test]
    fn unpriced_property_asks() {
        let property = Property {
            price: None,
            ..sea_view()
        };
        let html = PopupTemplate::default().render(&property);
        assert!(html.contains(">Price on Request</div>"));
    }

    #[test]
    fn detail_link_is_omitted_without_id() {
        let property = Property {
            id: String::new(),
            ..sea_view()
        };
        let template = PopupTemplate::default();
        assert_eq!(template.detail_href(&property), None);
        assert!(!template.render(&property).contains("View Details"));

        let custom = PopupTemplate {
            detail_path: "/listing/{id}".into(),
            ..PopupTemplate::default()
        };
        assert_eq!(custom.detail_href(&sea_view()).as_deref(), Some("/listing/1"));
    }
}
