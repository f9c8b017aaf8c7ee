use serde::{Deserialize, Serialize};

/// Geographic center of India; used when no property has coordinates.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 20.5937,
    lng: 78.9629,
};
pub const DEFAULT_ZOOM: f64 = 5.0;
pub const SINGLE_MARKER_ZOOM: f64 = 15.0;
pub const FIT_PADDING: f64 = 0.1;
pub const MIN_FIT_ZOOM: f64 = 8.0;
pub const FALLBACK_FIT_ZOOM: f64 = 10.0;

const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for p in &points[1..] {
            bounds.south = bounds.south.min(p.lat);
            bounds.west = bounds.west.min(p.lng);
            bounds.north = bounds.north.max(p.lat);
            bounds.east = bounds.east.max(p.lng);
        }
        Some(bounds)
    }

    /// Grow each side by `ratio` of the span, like Leaflet's `LatLngBounds.pad`.
    pub fn pad(&self, ratio: f64) -> Self {
        let dlat = (self.north - self.south).abs() * ratio;
        let dlng = (self.east - self.west).abs() * ratio;
        Self {
            south: self.south - dlat,
            west: self.west - dlng,
            north: self.north + dlat,
            east: self.east + dlng,
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.north - self.south <= 0.0 && self.east - self.west <= 0.0
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }
}

/// Zoom levels and padding used to pick the initial view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPolicy {
    pub default_center: LatLng,
    pub default_zoom: f64,
    pub single_zoom: f64,
    pub padding: f64,
    pub min_fit_zoom: f64,
    pub fallback_zoom: f64,
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            single_zoom: SINGLE_MARKER_ZOOM,
            padding: FIT_PADDING,
            min_fit_zoom: MIN_FIT_ZOOM,
            fallback_zoom: FALLBACK_FIT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewPlan {
    Center { center: LatLng, zoom: f64 },
    Fit { bounds: Bounds },
}

impl ViewPolicy {
    /// First-pass view for a set of marker positions.
    pub fn plan(&self, points: &[LatLng]) -> ViewPlan {
        let Some(bounds) = Bounds::from_points(points) else {
            return ViewPlan::Center {
                center: self.default_center,
                zoom: self.default_zoom,
            };
        };
        if points.len() == 1 || bounds.is_degenerate() {
            return ViewPlan::Center {
                center: points[0],
                zoom: self.single_zoom,
            };
        }
        ViewPlan::Fit {
            bounds: bounds.pad(self.padding),
        }
    }

    /// Settle a fit once the map reports the zoom it would use for `bounds`.
    /// Fits that would zoom out past the floor center on the box instead.
    pub fn resolve_fit(&self, bounds: Bounds, fitted_zoom: f64) -> ViewPlan {
        if fitted_zoom.is_finite() && fitted_zoom >= self.min_fit_zoom {
            ViewPlan::Fit { bounds }
        } else {
            ViewPlan::Center {
                center: bounds.center(),
                zoom: self.fallback_zoom,
            }
        }
    }
}

/// Largest whole zoom at which `bounds` fits a `width`×`height` pixel
/// container in Web Mercator, clamped to `0..=max_zoom`.
pub fn estimate_bounds_zoom(bounds: &Bounds, width: f64, height: f64, max_zoom: f64) -> f64 {
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    let span_x = (bounds.east - bounds.west).abs() / 360.0 * TILE_SIZE;
    let span_y = (mercator_y(bounds.north) - mercator_y(bounds.south)).abs()
        / (2.0 * std::f64::consts::PI)
        * TILE_SIZE;
    let scale_x = if span_x > 0.0 { width / span_x } else { f64::INFINITY };
    let scale_y = if span_y > 0.0 { height / span_y } else { f64::INFINITY };
    let scale = scale_x.min(scale_y);
    if !scale.is_finite() {
        return max_zoom;
    }
    scale.log2().floor().clamp(0.0, max_zoom)
}

fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-85.051_128_78, 85.051_128_78).to_radians();
    (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln()
}
