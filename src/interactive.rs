//! Terminal front-end: menus for the three selectors, a side-by-side
//! transcript pager and an overlay line that follows simulated playback.

use crate::config::Config;
use crate::player::{ClockPlayerFactory, Player, PlayerEvent, PlayerState};
use crate::present::{LanguageOption, MethodOption, PaneView, Presenter, VideoOption};
use crate::selection::Selection;
use crate::subtitle::{format_timestamp, SubtitleTrack};
use crate::sync::{OverlaySink, Pane, ScrollMetrics};
use crate::viewer::Viewer;
use console::{pad_str, style, Alignment, Term};
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

const NONE_ITEM: &str = "(none)";

/// Owned copy of what a pane shows, kept for the pager.
#[derive(Debug, Clone, PartialEq)]
pub enum PaneContent {
    Placeholder(String),
    Loading,
    Track(SubtitleTrack),
    Empty(String),
    Error(String),
}

impl From<PaneView<'_>> for PaneContent {
    fn from(view: PaneView<'_>) -> Self {
        match view {
            PaneView::Placeholder(m) => PaneContent::Placeholder(m.to_string()),
            PaneView::Loading => PaneContent::Loading,
            PaneView::Track(track) => PaneContent::Track(track.clone()),
            PaneView::Empty(m) => PaneContent::Empty(m.to_string()),
            PaneView::Error(m) => PaneContent::Error(m.to_string()),
        }
    }
}

#[derive(Default)]
struct ScreenState {
    videos: Vec<VideoOption>,
    languages: Vec<LanguageOption>,
    methods: Vec<MethodOption>,
    panes: HashMap<Pane, PaneContent>,
}

#[derive(Default)]
pub struct TerminalPresenter {
    state: Mutex<ScreenState>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScreenState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn videos(&self) -> Vec<VideoOption> {
        self.lock().videos.clone()
    }

    pub fn languages(&self) -> Vec<LanguageOption> {
        self.lock().languages.clone()
    }

    pub fn methods(&self) -> Vec<MethodOption> {
        self.lock().methods.clone()
    }

    pub fn pane(&self, pane: Pane) -> Option<PaneContent> {
        self.lock().panes.get(&pane).cloned()
    }
}

impl Presenter for TerminalPresenter {
    fn show_videos(&self, options: &[VideoOption]) {
        self.lock().videos = options.to_vec();
    }

    fn show_controls(
        &self,
        selection: &Selection,
        languages: &[LanguageOption],
        methods: &[MethodOption],
    ) {
        let mut state = self.lock();
        state.languages = languages.to_vec();
        state.methods = methods.to_vec();

        let video = selection
            .video()
            .and_then(|i| state.videos.get(i))
            .map(|v| v.title.clone());
        let language = selection.language().map(|code| {
            languages
                .iter()
                .find(|l| l.code == code)
                .map_or_else(|| code.to_string(), |l| l.name.clone())
        });
        let unset = || style("-").dim().to_string();

        println!(
            "  {} {}  {} {}  {} {}",
            style("Video:").bold(),
            video.map_or_else(unset, |v| style(v).cyan().to_string()),
            style("Language:").bold(),
            language.map_or_else(unset, |l| style(l).cyan().to_string()),
            style("Method:").bold(),
            selection
                .method()
                .map_or_else(unset, |m| style(m).cyan().to_string()),
        );
    }

    fn show_pane(&self, pane: Pane, view: PaneView<'_>) {
        match view {
            PaneView::Track(track) => println!(
                "  {} {} ({})",
                style("✓").green(),
                pane,
                track.count_label()
            ),
            PaneView::Loading => println!("  {} {}: loading subtitles...", style("…").dim(), pane),
            PaneView::Error(message) => {
                println!("  {} {}: {}", style("✗").red(), pane, style(message).red())
            }
            PaneView::Empty(message) => println!("  {} {}: {}", style("!").yellow(), pane, message),
            PaneView::Placeholder(_) => {}
        }
        self.lock().panes.insert(pane, view.into());
    }

    fn show_global_error(&self, message: &str) {
        eprintln!("{} {}", style("Error:").red().bold(), message);
    }
}

/// Overlay drawn as a spinner line while a playback session is active.
#[derive(Default)]
pub struct TerminalOverlay {
    bar: Mutex<Option<ProgressBar>>,
    text: Mutex<Option<String>>,
}

impl TerminalOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown, if any.
    pub fn text(&self) -> Option<String> {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn begin_session(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn end_session(&self) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pb.finish_and_clear();
        }
    }

    fn render(&self, text: Option<&str>) {
        *self.text.lock().unwrap_or_else(|e| e.into_inner()) = text.map(str::to_string);
        if let Some(pb) = self.bar.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            pb.set_message(text.unwrap_or_default().replace('\n', " / "));
        }
    }
}

impl OverlaySink for TerminalOverlay {
    fn show(&self, text: &str) {
        self.render(Some(text));
    }

    fn hide(&self) {
        self.render(None);
    }
}

/// Everything the interactive loop drives.
pub struct Session {
    pub viewer: Viewer,
    pub events: UnboundedReceiver<PlayerEvent>,
    pub presenter: Arc<TerminalPresenter>,
    pub overlay: Arc<TerminalOverlay>,
    pub players: Arc<ClockPlayerFactory>,
    pub config: Config,
    pub interrupted: Arc<AtomicBool>,
}

pub fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║         subview - Subtitle Transcript Viewer      ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

pub async fn run_interactive(mut session: Session) -> anyhow::Result<()> {
    loop {
        drain_player_events(&mut session);

        let items = [
            "Choose video",
            "Choose language",
            "Choose method",
            "Read transcripts",
            "Play with overlay",
            "Quit",
        ];
        println!();
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact()?;

        match choice {
            0 => choose_video(&mut session).await?,
            1 => choose_language(&mut session).await?,
            2 => choose_method(&mut session).await?,
            3 => read_transcripts(&mut session)?,
            4 => play(&mut session).await?,
            _ => break,
        }
    }

    session.viewer.shutdown();
    Ok(())
}

fn drain_player_events(session: &mut Session) {
    while let Ok(event) = session.events.try_recv() {
        session.viewer.on_player_event(event);
    }
}

/// Prompt with a leading "(none)" entry; `None` means the sentinel was picked.
fn select_with_none(
    prompt: &str,
    items: &[String],
    current: Option<usize>,
) -> anyhow::Result<Option<usize>> {
    let mut options = vec![NONE_ITEM.to_string()];
    options.extend(items.iter().cloned());

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&options)
        .default(current.map_or(0, |i| i + 1))
        .interact()?;

    Ok(selection.checked_sub(1))
}

async fn choose_video(session: &mut Session) -> anyhow::Result<()> {
    let videos = session.presenter.videos();
    let titles: Vec<String> = videos.iter().map(|v| v.title.clone()).collect();
    let picked = select_with_none(
        "Select a video",
        &titles,
        session.viewer.selection().video(),
    )?;

    session
        .viewer
        .select_video(picked.map(|i| videos[i].index))
        .await;
    Ok(())
}

async fn choose_language(session: &mut Session) -> anyhow::Result<()> {
    let languages = session.presenter.languages();
    if languages.is_empty() {
        println!("  {} Select a video first", style("!").yellow());
        return Ok(());
    }

    let names: Vec<String> = languages
        .iter()
        .map(|l| format!("{} ({})", l.name, l.code))
        .collect();
    let current = session
        .viewer
        .selection()
        .language()
        .and_then(|code| languages.iter().position(|l| l.code == code));
    let picked = select_with_none("Select a language", &names, current)?;

    session
        .viewer
        .select_language(picked.map(|i| languages[i].code.as_str()))
        .await;
    Ok(())
}

async fn choose_method(session: &mut Session) -> anyhow::Result<()> {
    let methods = session.presenter.methods();
    if methods.is_empty() {
        println!("  {} Select a video first", style("!").yellow());
        return Ok(());
    }

    let labels: Vec<String> = methods
        .iter()
        .map(|m| {
            if m.enabled {
                m.label.clone()
            } else {
                style(&m.label).dim().to_string()
            }
        })
        .collect();
    let current = session
        .viewer
        .selection()
        .method()
        .and_then(|id| methods.iter().position(|m| m.id == id));
    let picked = select_with_none("Select a translation method", &labels, current)?;

    let transition = session
        .viewer
        .select_method(picked.map(|i| methods[i].id.as_str()))
        .await;
    if transition.rejected {
        println!(
            "  {} That method has no subtitles for the selected language",
            style("!").yellow()
        );
    }
    Ok(())
}

/// Display rows of a pane: a timestamp row per entry followed by its text.
pub fn pane_rows(content: Option<&PaneContent>) -> Vec<String> {
    match content {
        Some(PaneContent::Track(track)) => track
            .entries
            .iter()
            .flat_map(|entry| {
                let mut rows = vec![format!(
                    "{} → {}",
                    format_timestamp(entry.start()),
                    format_timestamp(entry.end())
                )];
                rows.extend(entry.text.lines().map(|line| format!("  {}", line)));
                rows
            })
            .collect(),
        Some(PaneContent::Loading) => vec!["Loading subtitles...".to_string()],
        Some(PaneContent::Error(message)) => vec![format!("Error: {}", message)],
        Some(PaneContent::Placeholder(message)) | Some(PaneContent::Empty(message)) => {
            vec![message.clone()]
        }
        None => Vec::new(),
    }
}

/// Move a viewport top by `delta` rows, kept within the scrollable range.
pub fn scroll_step(top: usize, delta: isize, rows: usize, page: usize) -> usize {
    let max = rows.saturating_sub(page);
    top.saturating_add_signed(delta).min(max)
}

/// Lay two viewports out in columns of `width` characters each.
pub fn side_by_side(left: &[String], right: &[String], width: usize) -> Vec<String> {
    let height = left.len().max(right.len());
    (0..height)
        .map(|i| {
            let cell = |rows: &[String]| {
                let text = rows.get(i).map(String::as_str).unwrap_or("");
                pad_str(text, width, Alignment::Left, Some("…")).into_owned()
            };
            format!("{} │ {}", cell(left), cell(right))
        })
        .collect()
}

fn viewport(rows: &[String], top: usize, page: usize) -> Vec<String> {
    rows.iter().skip(top).take(page).cloned().collect()
}

fn read_transcripts(session: &mut Session) -> anyhow::Result<()> {
    let page = session.config.page_size;
    let english = pane_rows(session.presenter.pane(Pane::English).as_ref());
    let translated = pane_rows(session.presenter.pane(Pane::Translated).as_ref());
    let rows_of = |pane: Pane| match pane {
        Pane::English => english.len(),
        Pane::Translated => translated.len(),
    };
    let metrics =
        |pane: Pane, top: usize| ScrollMetrics::new(top as f64, rows_of(pane) as f64, page as f64);

    let (_, columns) = Term::stdout().size();
    let width = (columns as usize).saturating_sub(3) / 2;
    let mut tops: HashMap<Pane, usize> = HashMap::from([(Pane::English, 0), (Pane::Translated, 0)]);

    loop {
        println!();
        println!(
            "{}",
            style(pad_str("English", width, Alignment::Left, None).into_owned()
                + " │ "
                + "Translated")
            .bold()
        );
        for line in side_by_side(
            &viewport(&english, tops[&Pane::English], page),
            &viewport(&translated, tops[&Pane::Translated], page),
            width,
        ) {
            println!("{}", line);
        }

        let items = [
            "Scroll English down",
            "Scroll English up",
            "Scroll translated down",
            "Scroll translated up",
            "Back",
        ];
        let choice = Select::new()
            .with_prompt("Transcripts")
            .items(&items)
            .default(0)
            .interact()?;

        let (source, delta) = match choice {
            0 => (Pane::English, page as isize),
            1 => (Pane::English, -(page as isize)),
            2 => (Pane::Translated, page as isize),
            3 => (Pane::Translated, -(page as isize)),
            _ => break,
        };

        let top = scroll_step(tops[&source], delta, rows_of(source), page);
        tops.insert(source, top);

        let target = source.other();
        let now = Instant::now();
        let sync = session.viewer.scroll_sync();
        if let Some(target_top) =
            sync.on_scroll(metrics(source, top), metrics(target, tops[&target]), now)
        {
            let target_top = target_top.round() as usize;
            tops.insert(target, target_top);
            // The programmatic scroll reports back like a user scroll and is swallowed.
            let echo = sync.on_scroll(metrics(target, target_top), metrics(source, top), now);
            debug_assert!(echo.is_none());
        }
    }

    Ok(())
}

async fn play(session: &mut Session) -> anyhow::Result<()> {
    let Some(track) = session.viewer.overlay_track() else {
        println!("  {} No subtitles loaded yet", style("!").yellow());
        return Ok(());
    };
    let Some(player) = session.players.current() else {
        println!("  {} Select a video first", style("!").yellow());
        return Ok(());
    };

    let duration = track
        .entries
        .iter()
        .map(|e| e.end())
        .max()
        .unwrap_or_default();
    println!(
        "  Playing {} ({}), Ctrl+C to pause",
        player.youtube_id(),
        format_timestamp(duration)
    );

    session.interrupted.store(false, Ordering::Relaxed);
    session.overlay.begin_session();
    if player.state() == PlayerState::Ended {
        player.seek(Duration::ZERO);
    }
    player.play();

    let mut ticker = tokio::time::interval(Duration::from_millis(200));
    loop {
        tokio::select! {
            event = session.events.recv() => {
                let Some(event) = event else { break };
                session.viewer.on_player_event(event);
                if matches!(event, PlayerEvent::StateChange(state) if !state.is_playing()) {
                    break;
                }
            }
            _ = ticker.tick() => {
                if session.interrupted.load(Ordering::Relaxed) {
                    player.pause();
                } else if player.current_time() >= duration {
                    player.end();
                }
            }
        }
    }

    session.overlay.end_session();
    println!(
        "  {} at {}",
        player.state(),
        format_timestamp(player.current_time())
    );
    Ok(())
}
