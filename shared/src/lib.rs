pub mod colors;
pub mod html;
pub mod hover;
pub mod legend;
pub mod payload;
pub mod popup;
pub mod price;
pub mod property;
pub mod viewport;

pub use colors::{CategoryColors, DEFAULT_MARKER_COLOR};
pub use hover::{CloseTicket, HoverCommand, HoverState, MarkerIndex};
pub use legend::LegendEntry;
pub use payload::{Payload, PayloadError};
pub use popup::PopupTemplate;
pub use property::Property;
pub use viewport::{Bounds, LatLng, ViewPlan, ViewPolicy};
