use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::viewport::LatLng;

/// One listing as embedded by the server in the page.
///
/// Numeric fields tolerate numeric strings (decimal columns serialize that way),
/// and blank or `null` values read as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub property_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    /// Sent as `full_address` (street, city and zip joined by the server).
    #[serde(
        default,
        rename = "full_address",
        alias = "address",
        deserialize_with = "lenient_string"
    )]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub plot_area: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub contact_phone: Option<String>,
}

impl Property {
    /// Map position, present only when both coordinates are set and in range.
    pub fn position(&self) -> Option<LatLng> {
        let lat = self.latitude?;
        let lng = self.longitude?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(LatLng::new(lat, lng))
    }

    /// Price that should be shown as an amount; `None` means "ask".
    pub fn listed_price(&self) -> Option<f64> {
        self.price.filter(|p| *p > 0.0)
    }

    pub fn listed_plot_area(&self) -> Option<f64> {
        self.plot_area.filter(|a| *a > 0.0)
    }
}

pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_from_value).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(text_from_value)
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Property {
        serde_json::from_str(json).expect("valid property json")
    }

    #[test]
    fn reads_numbers_and_numeric_strings() {
        let p = parse(
            r#"{"id": 7, "name": "Plot A", "latitude": "19.0760", "longitude": 72.8777, "price": "2,500,000"}"#,
        );
        assert_eq!(p.id, "7");
        assert_eq!(p.latitude, Some(19.076));
        assert_eq!(p.longitude, Some(72.8777));
        assert_eq!(p.price, Some(2_500_000.0));
    }

    #[test]
    fn blank_and_null_fields_read_as_absent() {
        let p = parse(
            r#"{"name": null, "latitude": "", "longitude": null, "image_url": "  ", "contact_phone": null}"#,
        );
        assert_eq!(p.name, "");
        assert_eq!(p.latitude, None);
        assert_eq!(p.longitude, None);
        assert_eq!(p.image_url, None);
        assert_eq!(p.contact_phone, None);
    }

    #[test]
    fn position_requires_both_coordinates() {
        let p = parse(r#"{"latitude": 19.07}"#);
        assert_eq!(p.position(), None);

        let p = parse(r#"{"latitude": 19.07, "longitude": 72.87}"#);
        assert_eq!(p.position(), Some(LatLng::new(19.07, 72.87)));
    }

    #[test]
    fn position_rejects_out_of_range_coordinates() {
        let p = parse(r#"{"latitude": 120.0, "longitude": 72.87}"#);
        assert_eq!(p.position(), None);
        let p = parse(r#"{"latitude": 12.0, "longitude": -200.0}"#);
        assert_eq!(p.position(), None);
    }

    #[test]
    fn non_positive_price_is_unlisted() {
        assert_eq!(parse(r#"{"price": 0}"#).listed_price(), None);
        assert_eq!(parse(r#"{"price": -10}"#).listed_price(), None);
        assert_eq!(parse(r#"{}"#).listed_price(), None);
        assert_eq!(parse(r#"{"price": 10}"#).listed_price(), Some(10.0));
    }

    #[test]
    fn reads_server_field_names() {
        let p = parse(
            r##"{"id": 42, "full_address": "Marine Drive, Mumbai, 400020", "street": "Marine Drive", "city": "Mumbai", "marker_color": "#ff0000"}"##,
        );
        assert_eq!(p.address, "Marine Drive, Mumbai, 400020");

        let p = parse(r#"{"address": "Baner Road, Pune"}"#);
        assert_eq!(p.address, "Baner Road, Pune");
    }

    #[test]
    fn numeric_phone_is_kept_as_text() {
        let p = parse(r#"{"contact_phone": 9876543210}"#);
        assert_eq!(p.contact_phone.as_deref(), Some("9876543210"));
    }
}
