pub mod clock;

pub use clock::{ClockPlayer, ClockPlayerFactory};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Playback states reported by the embedded video widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing)
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerState::Unstarted => write!(f, "unstarted"),
            PlayerState::Ended => write!(f, "ended"),
            PlayerState::Playing => write!(f, "playing"),
            PlayerState::Paused => write!(f, "paused"),
            PlayerState::Buffering => write!(f, "buffering"),
            PlayerState::Cued => write!(f, "cued"),
        }
    }
}

/// Lifecycle notifications from a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Ready,
    StateChange(PlayerState),
}

/// A live video player bound to one external video.
pub trait Player: Send + Sync {
    fn current_time(&self) -> Duration;
    fn state(&self) -> PlayerState;
    /// Release the player. Further queries report an unstarted player at zero.
    fn destroy(&self);
}

/// Builds players; `events` receives the player's ready and state-change callbacks.
pub trait PlayerFactory: Send + Sync {
    fn create(&self, youtube_id: &str, events: UnboundedSender<PlayerEvent>) -> Arc<dyn Player>;
}
