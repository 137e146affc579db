pub mod overlay;
pub mod scroll;

pub use overlay::{active_entry, OverlaySink, OverlaySync};
pub use scroll::{Pane, ScrollMetrics, ScrollSync};
