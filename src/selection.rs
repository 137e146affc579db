//! The (video, language, method) selection and its consistency rules.
//!
//! A set `language` is always published for the current video, and a set
//! `method` always publishes the current language. Clearing cascades from
//! video to language to method, never the other way.

use crate::manifest::Manifest;
use crate::resolve::{english_path, resolve_path};

/// Language picked by default when the first video offers it.
pub const PREFERRED_LANGUAGE: &str = "es";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    video: Option<usize>,
    language: Option<String>,
    method: Option<String>,
}

/// What a selection change did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub video_changed: bool,
    /// Language or method differs from before.
    pub translation_changed: bool,
    /// The requested value was not valid and the field was left unset.
    pub rejected: bool,
}

impl Transition {
    fn merge(self, other: Transition) -> Transition {
        Transition {
            video_changed: self.video_changed || other.video_changed,
            translation_changed: self.translation_changed || other.translation_changed,
            rejected: self.rejected || other.rejected,
        }
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video(&self) -> Option<usize> {
        self.video
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Video, language and method are all set.
    pub fn is_complete(&self) -> bool {
        self.video.is_some() && self.language.is_some() && self.method.is_some()
    }

    fn report(&self, previous: &Selection, rejected: bool) -> Transition {
        Transition {
            video_changed: previous.video != self.video,
            translation_changed: previous.language != self.language
                || previous.method != self.method,
            rejected,
        }
    }

    /// Switch video, keeping language and method where the new video still offers them.
    pub fn select_video(&mut self, manifest: &Manifest, video: Option<usize>) -> Transition {
        let previous = self.clone();

        let Some(index) = video.filter(|&i| manifest.video(i).is_some()) else {
            *self = Selection::default();
            return self.report(&previous, video.is_some());
        };

        self.video = Some(index);

        let languages = manifest.available_languages(index);
        if !self
            .language
            .as_deref()
            .is_some_and(|language| languages.contains(&language))
        {
            self.language = None;
        }

        let methods = manifest.methods_supporting(index, self.language.as_deref());
        if !self
            .method
            .as_deref()
            .is_some_and(|method| methods.contains(&method))
        {
            self.method = None;
        }

        self.report(&previous, false)
    }

    /// Switch language, keeping the method if it also publishes the new language.
    pub fn select_language(&mut self, manifest: &Manifest, language: Option<&str>) -> Transition {
        let previous = self.clone();

        let valid = match (self.video, language) {
            (Some(video), Some(code)) if manifest.available_languages(video).contains(&code) => {
                Some((video, code))
            }
            _ => None,
        };

        let Some((video, code)) = valid else {
            self.language = None;
            self.method = None;
            return self.report(&previous, language.is_some());
        };

        self.language = Some(code.to_string());
        if !self
            .method
            .as_deref()
            .is_some_and(|method| manifest.methods_supporting(video, Some(code)).contains(&method))
        {
            self.method = None;
        }

        self.report(&previous, false)
    }

    /// Switch method. A method that does not publish the current language is
    /// rejected and leaves the method unset.
    pub fn select_method(&mut self, manifest: &Manifest, method: Option<&str>) -> Transition {
        let previous = self.clone();

        let rejected = match method {
            None => {
                self.method = None;
                false
            }
            Some(id) if manifest.is_supported(self.video, Some(id), self.language()) => {
                self.method = Some(id.to_string());
                false
            }
            Some(_) => {
                self.method = None;
                true
            }
        };

        self.report(&previous, rejected)
    }

    /// Startup choice: first video, Spanish if offered (else its first
    /// language), then the first method publishing that language.
    pub fn apply_defaults(&mut self, manifest: &Manifest) -> Transition {
        if manifest.videos.is_empty() {
            return Transition::default();
        }

        let mut transition = self.select_video(manifest, Some(0));

        let languages = manifest.available_languages(0);
        let language = languages
            .iter()
            .copied()
            .find(|code| *code == PREFERRED_LANGUAGE)
            .or_else(|| languages.first().copied());
        transition = transition.merge(self.select_language(manifest, language));

        let method = manifest
            .methods_supporting(0, self.language())
            .first()
            .copied();
        transition.merge(self.select_method(manifest, method))
    }

    /// English transcript path for the selected video.
    pub fn english_path(&self, manifest: &Manifest) -> Option<String> {
        self.video
            .and_then(|v| manifest.video(v))
            .map(english_path)
    }

    /// Translated transcript path once the selection is complete.
    pub fn translated_path(&self, manifest: &Manifest) -> Option<String> {
        let video = self.video.and_then(|v| manifest.video(v))?;
        Some(resolve_path(video, self.method()?, self.language()?))
    }
}
