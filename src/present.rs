//! Interface to whatever renders the controls, transcript panes and errors.

use crate::manifest::Manifest;
use crate::selection::Selection;
use crate::subtitle::SubtitleTrack;
use crate::sync::Pane;

pub const PLACEHOLDER: &str = "Select a video, translation method, and language to view subtitles";
pub const NO_SUBTITLES: &str = "No subtitles found";
pub const LOAD_FAILED: &str = "Failed to load subtitles";
pub const APP_LOAD_FAILED: &str = "Failed to load application data";
pub const NO_TRANSLATIONS_SUFFIX: &str = "(no translations yet)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOption {
    pub index: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOption {
    pub id: String,
    pub label: String,
    pub enabled: bool,
}

/// What a transcript pane currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneView<'a> {
    Placeholder(&'a str),
    Loading,
    Track(&'a SubtitleTrack),
    Empty(&'a str),
    Error(&'a str),
}

pub trait Presenter: Send + Sync {
    fn show_videos(&self, options: &[VideoOption]);
    fn show_controls(
        &self,
        selection: &Selection,
        languages: &[LanguageOption],
        methods: &[MethodOption],
    );
    fn show_pane(&self, pane: Pane, view: PaneView<'_>);
    fn show_global_error(&self, message: &str);
}

pub fn video_options(manifest: &Manifest) -> Vec<VideoOption> {
    manifest
        .videos
        .iter()
        .enumerate()
        .map(|(index, video)| VideoOption {
            index,
            title: video.title.clone(),
        })
        .collect()
}

pub fn language_options(manifest: &Manifest, video: Option<usize>) -> Vec<LanguageOption> {
    let Some(video) = video else {
        return Vec::new();
    };

    manifest
        .available_languages(video)
        .into_iter()
        .map(|code| LanguageOption {
            code: code.to_string(),
            name: manifest.language_name(code).to_string(),
        })
        .collect()
}

/// Every method of the video; unpublished ones carry a suffix, and methods
/// not offering the chosen language are disabled.
pub fn method_options(
    manifest: &Manifest,
    video: Option<usize>,
    language: Option<&str>,
) -> Vec<MethodOption> {
    let Some(index) = video else {
        return Vec::new();
    };
    let Some(video) = manifest.video(index) else {
        return Vec::new();
    };

    video
        .methods
        .iter()
        .map(|method| {
            let available = video.is_method_available(method);
            let label = if available {
                method.clone()
            } else {
                format!("{} {}", method, NO_TRANSLATIONS_SUFFIX)
            };
            let enabled = available && language.map_or(true, |l| video.supports(method, l));
            MethodOption {
                id: method.clone(),
                label,
                enabled,
            }
        })
        .collect()
}
