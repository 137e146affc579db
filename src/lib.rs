pub mod config;
pub mod error;
pub mod fetch;
pub mod interactive;
pub mod manifest;
pub mod player;
pub mod present;
pub mod resolve;
pub mod selection;
pub mod subtitle;
pub mod sync;
pub mod viewer;

pub use config::Config;
pub use error::{Result, ViewerError};
pub use manifest::{Manifest, Video};
pub use resolve::resolve_path;
pub use selection::{Selection, Transition};
pub use subtitle::{SubtitleEntry, SubtitleTrack};
pub use viewer::{LoadedTracks, PendingLoad, Viewer};
