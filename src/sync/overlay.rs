//! Playback-driven subtitle overlay.

use crate::player::Player;
use crate::subtitle::{SubtitleEntry, SubtitleTrack};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Receives overlay updates.
pub trait OverlaySink: Send + Sync {
    fn show(&self, text: &str);
    fn hide(&self);
}

/// Entry covering `at`, both ends inclusive.
///
/// Linear scan; at a shared boundary the earlier entry in file order wins.
pub fn active_entry(entries: &[SubtitleEntry], at: Duration) -> Option<&SubtitleEntry> {
    active_index(entries, at).map(|i| &entries[i])
}

fn active_index(entries: &[SubtitleEntry], at: Duration) -> Option<usize> {
    let ms = at.as_millis().min(u64::MAX as u128) as u64;
    entries.iter().position(|entry| entry.contains(ms))
}

/// Polls a player while it plays and mirrors the active entry onto a sink.
pub struct OverlaySync {
    sink: Arc<dyn OverlaySink>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
    /// Cleared under lock by `stop` so an in-flight tick cannot show text afterwards.
    active: Arc<Mutex<bool>>,
}

impl OverlaySync {
    pub fn new(sink: Arc<dyn OverlaySink>, interval: Duration) -> Self {
        Self {
            sink,
            interval,
            task: None,
            active: Arc::new(Mutex::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start polling, replacing any running poll.
    pub fn start(&mut self, player: Arc<dyn Player>, track: Arc<SubtitleTrack>) {
        self.stop();

        let active = Arc::new(Mutex::new(true));
        self.active = active.clone();
        let sink = self.sink.clone();
        let interval = self.interval;

        debug!(
            "Overlay polling every {}ms over {} entries ({})",
            interval.as_millis(),
            track.len(),
            track.language
        );

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut shown: Option<usize> = None;

            loop {
                ticker.tick().await;

                let current = active_index(&track.entries, player.current_time());

                {
                    let still_active = active.lock().unwrap_or_else(|e| e.into_inner());
                    if !*still_active {
                        break;
                    }
                    if !player.state().is_playing() {
                        sink.hide();
                        break;
                    }
                    match current {
                        Some(i) if shown != Some(i) => sink.show(&track.entries[i].text),
                        None if shown.is_some() => sink.hide(),
                        _ => {}
                    }
                }
                shown = current;
            }
        }));
    }

    /// Stop polling and hide the overlay. Safe to call when already stopped.
    pub fn stop(&mut self) {
        {
            let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
            *active = false;
            self.sink.hide();
        }
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Overlay polling stopped");
        }
    }
}

impl Drop for OverlaySync {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
