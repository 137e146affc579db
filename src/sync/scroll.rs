//! Relative-scroll lockstep between the English and translated transcripts.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    English,
    Translated,
}

impl Pane {
    pub fn other(self) -> Pane {
        match self {
            Pane::English => Pane::Translated,
            Pane::Translated => Pane::English,
        }
    }
}

impl std::fmt::Display for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pane::English => write!(f, "English"),
            Pane::Translated => write!(f, "Translated"),
        }
    }
}

/// Scroll geometry of a pane, in any consistent unit (pixels, rows).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Position in `[0, 1]`; a pane that cannot scroll sits at 0.
    pub fn fraction(&self) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 {
            0.0
        } else {
            (self.scroll_top / max).clamp(0.0, 1.0)
        }
    }

    pub fn top_for(&self, fraction: f64) -> f64 {
        fraction.clamp(0.0, 1.0) * self.max_scroll()
    }
}

/// Mirrors a user scroll in one pane onto the other.
///
/// After a sync the lock swallows scroll events for `lock`, which covers the
/// event the programmatic scroll itself fires.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    lock: Duration,
    locked_until: Option<Instant>,
}

impl ScrollSync {
    pub fn new(lock: Duration) -> Self {
        Self {
            lock,
            locked_until: None,
        }
    }

    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Handle a scroll of `source`; returns the new `scroll_top` for the other
    /// pane, or `None` while locked.
    pub fn on_scroll(
        &mut self,
        source: ScrollMetrics,
        target: ScrollMetrics,
        now: Instant,
    ) -> Option<f64> {
        if self.is_locked(now) {
            return None;
        }
        self.locked_until = Some(now + self.lock);
        Some(target.top_for(source.fraction()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        assert_eq!(ScrollMetrics::new(50.0, 300.0, 100.0).fraction(), 0.25);
        assert_eq!(ScrollMetrics::new(0.0, 80.0, 100.0).fraction(), 0.0);
        assert_eq!(ScrollMetrics::new(500.0, 300.0, 100.0).fraction(), 1.0);
    }

    #[test]
    fn test_proportional_target() {
        let mut sync = ScrollSync::new(Duration::from_millis(50));
        let english = ScrollMetrics::new(100.0, 500.0, 100.0);
        let translated = ScrollMetrics::new(0.0, 900.0, 100.0);

        let top = sync.on_scroll(english, translated, Instant::now());
        assert_eq!(top, Some(200.0));
    }

    #[test]
    fn test_lock_ignores_echo_then_releases() {
        let mut sync = ScrollSync::new(Duration::from_millis(50));
        let a = ScrollMetrics::new(100.0, 500.0, 100.0);
        let b = ScrollMetrics::new(0.0, 900.0, 100.0);
        let t0 = Instant::now();

        assert!(sync.on_scroll(a, b, t0).is_some());
        assert!(sync.is_locked(t0 + Duration::from_millis(10)));
        assert_eq!(sync.on_scroll(b, a, t0 + Duration::from_millis(10)), None);
        assert!(sync.on_scroll(b, a, t0 + Duration::from_millis(50)).is_some());
    }

    #[test]
    fn test_pane_other() {
        assert_eq!(Pane::English.other(), Pane::Translated);
        assert_eq!(Pane::Translated.other(), Pane::English);
    }
}
