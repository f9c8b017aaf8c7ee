use gloo_timers::callback::Timeout;

use plotmap_shared::viewport::estimate_bounds_zoom;
use plotmap_shared::{LatLng, ViewPlan, ViewPolicy};

use crate::config::REVALIDATE_DELAY_MS;
use crate::leaflet::{self, Map};

/// Set the initial view for the placed markers, then re-measure the
/// container once layout has settled.
pub fn fit_to_markers(map: &Map, container: &web_sys::Element, points: &[LatLng], max_zoom: u8) {
    let policy = ViewPolicy::default();
    let plan = match policy.plan(points) {
        ViewPlan::Fit { bounds } => {
            let mut zoom = map.get_bounds_zoom(&leaflet::lat_lng_bounds(&bounds));
            if !zoom.is_finite() {
                zoom = estimate_bounds_zoom(
                    &bounds,
                    f64::from(container.client_width()),
                    f64::from(container.client_height()),
                    f64::from(max_zoom),
                );
            }
            policy.resolve_fit(bounds, zoom)
        }
        plan => plan,
    };
    apply(map, &plan);

    let map = map.clone();
    Timeout::new(REVALIDATE_DELAY_MS, move || {
        map.invalidate_size();
    })
    .forget();
}

fn apply(map: &Map, plan: &ViewPlan) {
    match plan {
        ViewPlan::Center { center, zoom } => {
            map.set_view(&leaflet::lat_lng(*center), *zoom);
        }
        ViewPlan::Fit { bounds } => {
            map.fit_bounds(&leaflet::lat_lng_bounds(bounds));
        }
    }
}
