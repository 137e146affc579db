use crate::config::Config;
use crate::error::{Result, ViewerError};
use crate::fetch::{fetch_manifest, Fetcher};
use crate::manifest::Manifest;
use crate::player::{Player, PlayerEvent, PlayerFactory};
use crate::present::{
    language_options, method_options, video_options, PaneView, Presenter, APP_LOAD_FAILED,
    LOAD_FAILED, NO_SUBTITLES, PLACEHOLDER,
};
use crate::selection::{Selection, Transition};
use crate::subtitle::SubtitleTrack;
use crate::sync::{OverlaySink, OverlaySync, Pane, ScrollSync};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// A subtitle file to load into one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRequest {
    pub path: String,
    pub language: String,
    pub label: String,
}

impl TrackRequest {
    async fn fetch(&self, fetcher: &dyn Fetcher) -> Result<SubtitleTrack> {
        let raw = fetcher.fetch_text(&self.path).await?;
        let track = SubtitleTrack::from_srt(&self.language, &self.label, &self.path, &raw);
        info!("Loaded {} entries from {}", track.len(), self.path);
        Ok(track)
    }
}

/// Fetches issued by a selection change, detached from the viewer so the
/// viewer can keep handling input while they run.
pub struct PendingLoad {
    generation: u64,
    selection: Selection,
    fetcher: Arc<dyn Fetcher>,
    english: Option<TrackRequest>,
    translated: Option<TrackRequest>,
}

impl PendingLoad {
    pub fn english(&self) -> Option<&TrackRequest> {
        self.english.as_ref()
    }

    pub fn translated(&self) -> Option<&TrackRequest> {
        self.translated.as_ref()
    }

    pub async fn fetch(self) -> LoadedTracks {
        let PendingLoad {
            generation,
            selection,
            fetcher,
            english,
            translated,
        } = self;

        let fetch_one = |request: &Option<TrackRequest>| {
            let fetcher = fetcher.clone();
            let request = request.clone();
            async move {
                match request {
                    Some(request) => Some(request.fetch(fetcher.as_ref()).await),
                    None => None,
                }
            }
        };

        let (english, translated) =
            futures::join!(fetch_one(&english), fetch_one(&translated));

        LoadedTracks {
            generation,
            selection,
            english,
            translated,
        }
    }
}

/// Results of a [`PendingLoad`]; `None` for a pane that was not requested.
pub struct LoadedTracks {
    generation: u64,
    selection: Selection,
    pub english: Option<Result<SubtitleTrack>>,
    pub translated: Option<Result<SubtitleTrack>>,
}

/// Owns the selection, loaded tracks, player and overlay for one page.
pub struct Viewer {
    fetcher: Arc<dyn Fetcher>,
    presenter: Arc<dyn Presenter>,
    players: Arc<dyn PlayerFactory>,
    player_events: UnboundedSender<PlayerEvent>,
    manifest_path: String,
    scroll_lock: Duration,

    manifest: Option<Arc<Manifest>>,
    player_api_ready: bool,
    defaults_applied: bool,
    selection: Selection,
    player: Option<Arc<dyn Player>>,
    english: Option<Arc<SubtitleTrack>>,
    translated: Option<Arc<SubtitleTrack>>,
    english_pending: bool,
    generation: u64,
    overlay: OverlaySync,
    scroll: Option<ScrollSync>,
}

impl Viewer {
    /// Build a viewer. Events from every player it creates arrive on the
    /// returned receiver; feed them back through [`Viewer::on_player_event`].
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        presenter: Arc<dyn Presenter>,
        overlay: Arc<dyn OverlaySink>,
        players: Arc<dyn PlayerFactory>,
    ) -> (Self, UnboundedReceiver<PlayerEvent>) {
        let (player_events, events_rx) = mpsc::unbounded_channel();

        let viewer = Self {
            fetcher,
            presenter,
            players,
            player_events,
            manifest_path: config.manifest_path.clone(),
            scroll_lock: config.scroll_lock(),
            manifest: None,
            player_api_ready: false,
            defaults_applied: false,
            selection: Selection::new(),
            player: None,
            english: None,
            translated: None,
            english_pending: false,
            generation: 0,
            overlay: OverlaySync::new(overlay, config.poll_interval()),
            scroll: None,
        };

        (viewer, events_rx)
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_deref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn english_track(&self) -> Option<&SubtitleTrack> {
        self.english.as_deref()
    }

    pub fn translated_track(&self) -> Option<&SubtitleTrack> {
        self.translated.as_deref()
    }

    /// Track driving the overlay: translated when loaded, else English.
    pub fn overlay_track(&self) -> Option<Arc<SubtitleTrack>> {
        self.translated.clone().or_else(|| self.english.clone())
    }

    pub fn player(&self) -> Option<Arc<dyn Player>> {
        self.player.clone()
    }

    pub fn is_overlay_running(&self) -> bool {
        self.overlay.is_running()
    }

    /// Load the manifest. Failure is fatal for the page.
    pub async fn init(&mut self) -> Result<()> {
        let manifest = match fetch_manifest(self.fetcher.as_ref(), &self.manifest_path).await {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Failed to load manifest {}: {}", self.manifest_path, e);
                self.presenter.show_global_error(APP_LOAD_FAILED);
                return Err(e);
            }
        };

        self.presenter.show_videos(&video_options(&manifest));
        self.manifest = Some(Arc::new(manifest));
        self.show_controls();
        self.show_placeholders();

        self.apply_defaults_when_ready().await;
        Ok(())
    }

    /// The playback capability became available.
    pub async fn player_api_ready(&mut self) {
        self.player_api_ready = true;
        self.apply_defaults_when_ready().await;
    }

    async fn apply_defaults_when_ready(&mut self) {
        if self.defaults_applied || !self.player_api_ready {
            return;
        }
        let Some(manifest) = self.manifest.clone() else {
            return;
        };

        self.defaults_applied = true;
        let transition = self.selection.apply_defaults(&manifest);
        debug!("Default selection: {:?}", self.selection);
        self.apply(transition).await;
    }

    pub async fn select_video(&mut self, video: Option<usize>) -> Transition {
        let Some(manifest) = self.manifest.clone() else {
            return Transition::default();
        };
        let transition = self.selection.select_video(&manifest, video);
        self.apply(transition).await;
        transition
    }

    pub async fn select_language(&mut self, language: Option<&str>) -> Transition {
        let Some(manifest) = self.manifest.clone() else {
            return Transition::default();
        };
        let transition = self.selection.select_language(&manifest, language);
        self.apply(transition).await;
        transition
    }

    pub async fn select_method(&mut self, method: Option<&str>) -> Transition {
        let Some(manifest) = self.manifest.clone() else {
            return Transition::default();
        };
        let transition = self.selection.select_method(&manifest, method);
        if transition.rejected {
            debug!("Rejected method {:?} for {:?}", method, self.selection.language());
        }
        self.apply(transition).await;
        transition
    }

    async fn apply(&mut self, transition: Transition) {
        self.show_controls();
        if transition.video_changed {
            self.replace_player();
        }
        if let Some(pending) = self.begin_load(transition) {
            let loaded = pending.fetch().await;
            self.finish_load(loaded);
        }
    }

    fn show_controls(&self) {
        let Some(manifest) = self.manifest.as_deref() else {
            return;
        };
        let video = self.selection.video();
        self.presenter.show_controls(
            &self.selection,
            &language_options(manifest, video),
            &method_options(manifest, video, self.selection.language()),
        );
    }

    fn show_placeholders(&self) {
        self.presenter
            .show_pane(Pane::English, PaneView::Placeholder(PLACEHOLDER));
        self.presenter
            .show_pane(Pane::Translated, PaneView::Placeholder(PLACEHOLDER));
    }

    fn replace_player(&mut self) {
        if let Some(old) = self.player.take() {
            self.overlay.stop();
            old.destroy();
        }

        let video = self
            .manifest
            .as_deref()
            .zip(self.selection.video())
            .and_then(|(manifest, index)| manifest.video(index));

        if let Some(video) = video {
            info!("Creating player for {} ({})", video.title, video.youtube_id);
            self.player = Some(
                self.players
                    .create(&video.youtube_id, self.player_events.clone()),
            );
        }
    }

    /// Work out which panes need fetching after `transition`, clearing the
    /// rest. Bumps the load generation so earlier loads are discarded.
    pub fn begin_load(&mut self, transition: Transition) -> Option<PendingLoad> {
        let manifest = self.manifest.clone()?;

        if self.selection.video().is_none() {
            self.overlay.stop();
            self.english = None;
            self.translated = None;
            self.english_pending = false;
            self.generation += 1;
            self.show_placeholders();
            return None;
        }

        let english = if transition.video_changed || self.english_pending {
            self.selection
                .english_path(&manifest)
                .map(|path| TrackRequest {
                    path,
                    language: "en".to_string(),
                    label: manifest.language_name("en").to_string(),
                })
        } else {
            None
        };

        let translated = self.selection.translated_path(&manifest).map(|path| {
            let language = self.selection.language().unwrap_or_default().to_string();
            TrackRequest {
                label: manifest.language_name(&language).to_string(),
                path,
                language,
            }
        });

        if translated.is_none() {
            self.translated = None;
            self.presenter
                .show_pane(Pane::Translated, PaneView::Placeholder(PLACEHOLDER));
        }

        if english.is_none() && translated.is_none() {
            self.generation += 1;
            self.refresh_overlay();
            return None;
        }

        self.overlay.stop();
        self.generation += 1;

        if english.is_some() {
            self.english = None;
            self.english_pending = true;
            self.presenter.show_pane(Pane::English, PaneView::Loading);
        }
        if translated.is_some() {
            self.translated = None;
            self.presenter.show_pane(Pane::Translated, PaneView::Loading);
        }

        Some(PendingLoad {
            generation: self.generation,
            selection: self.selection.clone(),
            fetcher: self.fetcher.clone(),
            english,
            translated,
        })
    }

    /// Apply fetched tracks unless a newer selection has superseded them.
    /// Returns whether the results were applied.
    pub fn finish_load(&mut self, loaded: LoadedTracks) -> bool {
        if loaded.generation != self.generation || loaded.selection != self.selection {
            debug!(
                "Discarding superseded load (generation {} vs {})",
                loaded.generation, self.generation
            );
            return false;
        }

        if let Some(result) = loaded.english {
            self.english_pending = false;
            self.english = self.present_result(Pane::English, result);
        }
        if let Some(result) = loaded.translated {
            self.translated = self.present_result(Pane::Translated, result);
        }

        self.refresh_overlay();
        true
    }

    fn present_result(
        &self,
        pane: Pane,
        result: Result<SubtitleTrack>,
    ) -> Option<Arc<SubtitleTrack>> {
        match result {
            Ok(track) => {
                if track.is_empty() {
                    self.presenter.show_pane(pane, PaneView::Empty(NO_SUBTITLES));
                } else {
                    self.presenter.show_pane(pane, PaneView::Track(&track));
                }
                Some(Arc::new(track))
            }
            Err(e) => {
                warn!("Error loading {} subtitles: {}", pane, e);
                self.presenter.show_pane(pane, PaneView::Error(LOAD_FAILED));
                None
            }
        }
    }

    /// Restart the overlay against the current track if the player is playing.
    fn refresh_overlay(&mut self) {
        let playing = self
            .player
            .as_ref()
            .filter(|player| player.state().is_playing());

        match (playing.cloned(), self.overlay_track()) {
            (Some(player), Some(track)) => self.overlay.start(player, track),
            _ => self.overlay.stop(),
        }
    }

    pub fn on_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Ready => debug!("Player ready"),
            PlayerEvent::StateChange(state) => {
                debug!("Player state changed to {}", state);
                if state.is_playing() {
                    self.refresh_overlay();
                } else {
                    self.overlay.stop();
                }
            }
        }
    }

    /// Pane scroll lockstep, created on first use and kept for the viewer's lifetime.
    pub fn scroll_sync(&mut self) -> &mut ScrollSync {
        let lock = self.scroll_lock;
        self.scroll.get_or_insert_with(|| {
            debug!("Wiring pane scroll sync ({}ms lock)", lock.as_millis());
            ScrollSync::new(lock)
        })
    }

    /// Tear down the player and overlay.
    pub fn shutdown(&mut self) {
        self.overlay.stop();
        if let Some(player) = self.player.take() {
            player.destroy();
        }
    }

    /// The manifest, or an error when [`Viewer::init`] has not succeeded.
    pub fn require_manifest(&self) -> Result<Arc<Manifest>> {
        self.manifest
            .clone()
            .ok_or_else(|| ViewerError::Manifest("manifest not loaded".to_string()))
    }
}
