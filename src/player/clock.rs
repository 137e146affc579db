//! Player that advances along a wall clock instead of rendering video.

use super::{Player, PlayerEvent, PlayerFactory, PlayerState};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::debug;

struct ClockInner {
    state: PlayerState,
    /// Position at the moment playback last started or was paused.
    offset: Duration,
    started_at: Option<Instant>,
    destroyed: bool,
}

pub struct ClockPlayer {
    youtube_id: String,
    inner: Mutex<ClockInner>,
    events: UnboundedSender<PlayerEvent>,
}

impl ClockPlayer {
    pub fn new(youtube_id: impl Into<String>, events: UnboundedSender<PlayerEvent>) -> Self {
        let player = Self {
            youtube_id: youtube_id.into(),
            inner: Mutex::new(ClockInner {
                state: PlayerState::Unstarted,
                offset: Duration::ZERO,
                started_at: None,
                destroyed: false,
            }),
            events,
        };
        let _ = player.events.send(PlayerEvent::Ready);
        player
    }

    pub fn youtube_id(&self) -> &str {
        &self.youtube_id
    }

    fn lock(&self) -> MutexGuard<'_, ClockInner> {
        // State stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn position(inner: &ClockInner) -> Duration {
        match inner.started_at {
            Some(started) => inner.offset + started.elapsed(),
            None => inner.offset,
        }
    }

    fn transition(&self, state: PlayerState, f: impl FnOnce(&mut ClockInner)) {
        let mut inner = self.lock();
        if inner.destroyed || inner.state == state {
            return;
        }
        f(&mut *inner);
        inner.state = state;
        drop(inner);

        debug!("Player {} -> {}", self.youtube_id, state);
        let _ = self.events.send(PlayerEvent::StateChange(state));
    }

    pub fn play(&self) {
        self.transition(PlayerState::Playing, |inner| {
            inner.started_at = Some(Instant::now());
        });
    }

    pub fn pause(&self) {
        self.transition(PlayerState::Paused, |inner| {
            inner.offset = Self::position(inner);
            inner.started_at = None;
        });
    }

    pub fn end(&self) {
        self.transition(PlayerState::Ended, |inner| {
            inner.offset = Self::position(inner);
            inner.started_at = None;
        });
    }

    pub fn seek(&self, to: Duration) {
        let mut inner = self.lock();
        if inner.destroyed {
            return;
        }
        inner.offset = to;
        if inner.started_at.is_some() {
            inner.started_at = Some(Instant::now());
        }
    }
}

impl Player for ClockPlayer {
    fn current_time(&self) -> Duration {
        let inner = self.lock();
        if inner.destroyed {
            return Duration::ZERO;
        }
        Self::position(&inner)
    }

    fn state(&self) -> PlayerState {
        let inner = self.lock();
        if inner.destroyed {
            PlayerState::Unstarted
        } else {
            inner.state
        }
    }

    fn destroy(&self) {
        let mut inner = self.lock();
        inner.destroyed = true;
        inner.started_at = None;
        inner.offset = Duration::ZERO;
        debug!("Destroyed player for {}", self.youtube_id);
    }
}

/// Builds [`ClockPlayer`]s and remembers the most recent one so a front-end
/// can drive it.
#[derive(Default)]
pub struct ClockPlayerFactory {
    current: Mutex<Option<Arc<ClockPlayer>>>,
}

impl ClockPlayerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<ClockPlayer>> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl PlayerFactory for ClockPlayerFactory {
    fn create(&self, youtube_id: &str, events: UnboundedSender<PlayerEvent>) -> Arc<dyn Player> {
        let player = Arc::new(ClockPlayer::new(youtube_id, events));
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(player.clone());
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_clock_advances_only_while_playing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let player = ClockPlayer::new("abc", tx);
        assert_eq!(rx.recv().await, Some(PlayerEvent::Ready));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(player.current_time(), Duration::ZERO);

        player.play();
        assert_eq!(
            rx.recv().await,
            Some(PlayerEvent::StateChange(PlayerState::Playing))
        );
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(player.current_time(), Duration::from_millis(1500));

        player.pause();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(player.current_time(), Duration::from_millis(1500));
        assert_eq!(player.state(), PlayerState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_and_destroy() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let player = ClockPlayer::new("abc", tx);

        player.seek(Duration::from_secs(10));
        assert_eq!(player.current_time(), Duration::from_secs(10));

        player.play();
        tokio::time::advance(Duration::from_millis(250)).await;
        assert_eq!(player.current_time(), Duration::from_millis(10_250));

        player.destroy();
        assert_eq!(player.state(), PlayerState::Unstarted);
        assert_eq!(player.current_time(), Duration::ZERO);

        player.play();
        assert_eq!(player.state(), PlayerState::Unstarted);
    }

    #[tokio::test]
    async fn test_repeated_state_is_not_reported_twice() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let player = ClockPlayer::new("abc", tx);
        player.play();
        player.play();
        player.pause();
        drop(player);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                PlayerEvent::Ready,
                PlayerEvent::StateChange(PlayerState::Playing),
                PlayerEvent::StateChange(PlayerState::Paused),
            ]
        );
    }
}
