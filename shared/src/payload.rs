use serde_json::Value;
use thiserror::Error;

use crate::colors::CategoryColors;
use crate::property::Property;
use crate::viewport::LatLng;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("{field}: attribute is missing")]
    Missing { field: &'static str },
    #[error("{field}: malformed JSON: {source}")]
    Malformed {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field}: expected a JSON {expected}")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
}

/// Everything the widget reads from the page.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub properties: Vec<Property>,
    pub colors: CategoryColors,
    /// Array entries or mapping values that were not usable and were skipped.
    pub skipped_entries: usize,
}

impl Payload {
    /// Parse both attributes. Never fails: each broken input degrades to
    /// empty data and is reported in the returned error list.
    pub fn parse(properties: Option<&str>, colors: Option<&str>) -> (Self, Vec<PayloadError>) {
        let mut payload = Self::default();
        let mut errors = Vec::new();

        match parse_properties(properties) {
            Ok((list, skipped)) => {
                payload.properties = list;
                payload.skipped_entries += skipped;
            }
            Err(err) => errors.push(err),
        }
        match parse_category_colors(colors) {
            Ok((map, skipped)) => {
                payload.colors = map;
                payload.skipped_entries += skipped;
            }
            Err(err) => errors.push(err),
        }

        (payload, errors)
    }

    /// Properties that can be placed on the map, with their positions.
    pub fn geolocated(&self) -> impl Iterator<Item = (&Property, LatLng)> {
        self.properties
            .iter()
            .filter_map(|p| p.position().map(|pos| (p, pos)))
    }
}

const PROPERTIES_FIELD: &str = "properties";
const COLORS_FIELD: &str = "category colors";

pub fn parse_properties(raw: Option<&str>) -> Result<(Vec<Property>, usize), PayloadError> {
    let Some(value) = parse_json(raw, PROPERTIES_FIELD)? else {
        return Ok((Vec::new(), 0));
    };
    let Value::Array(items) = value else {
        return Err(PayloadError::WrongShape {
            field: PROPERTIES_FIELD,
            expected: "array",
        });
    };
    let mut properties = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        if !item.is_object() {
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<Property>(item) {
            Ok(p) => properties.push(p),
            Err(_) => skipped += 1,
        }
    }
    Ok((properties, skipped))
}

pub fn parse_category_colors(raw: Option<&str>) -> Result<(CategoryColors, usize), PayloadError> {
    let Some(value) = parse_json(raw, COLORS_FIELD)? else {
        return Ok((CategoryColors::default(), 0));
    };
    let Value::Object(object) = value else {
        return Err(PayloadError::WrongShape {
            field: COLORS_FIELD,
            expected: "object",
        });
    };
    Ok(CategoryColors::from_json_object(&object))
}

/// `Ok(None)` for a present but blank attribute.
fn parse_json(raw: Option<&str>, field: &'static str) -> Result<Option<Value>, PayloadError> {
    let raw = raw.ok_or(PayloadError::Missing { field })?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|source| PayloadError::Malformed { field, source })
}
