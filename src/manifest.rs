//! Catalog of videos, translation methods and languages.
//!
//! The manifest is read-only once loaded. Every query treats an unknown
//! video, method or language as "nothing available" rather than an error.

use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub language_names: HashMap<String, String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_filename: Option<String>,
    pub youtube_id: String,
    pub title: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub languages: HashMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub julia_run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl Video {
    /// Filename stem used for subtitle files, `id` unless overridden.
    pub fn base_filename(&self) -> &str {
        match self.base_filename.as_deref() {
            Some(stem) if !stem.is_empty() => stem,
            _ => &self.id,
        }
    }

    /// Languages published under `method`, empty for unknown methods.
    pub fn languages_for(&self, method: &str) -> &[String] {
        self.languages
            .get(method)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// A method is available when at least one language was published for it.
    pub fn is_method_available(&self, method: &str) -> bool {
        !self.languages_for(method).is_empty()
    }

    pub fn supports(&self, method: &str, language: &str) -> bool {
        self.methods.iter().any(|m| m == method)
            && self.languages_for(method).iter().any(|l| l == language)
    }
}

impl Manifest {
    /// Parse and sanity-check a manifest document.
    pub fn from_json(text: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(text)?;
        manifest.check_unique_ids()?;
        Ok(manifest)
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for video in &self.videos {
            if !seen.insert(video.id.as_str()) {
                return Err(ViewerError::Manifest(format!(
                    "duplicate video id '{}'",
                    video.id
                )));
            }
        }
        Ok(())
    }

    pub fn video(&self, index: usize) -> Option<&Video> {
        self.videos.get(index)
    }

    /// Display name for a language code, falling back to the code itself.
    pub fn language_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.language_names
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }

    /// Union of the video's language codes, in first-seen order across its methods.
    pub fn available_languages(&self, video: usize) -> Vec<&str> {
        let Some(video) = self.video(video) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        video
            .methods
            .iter()
            .flat_map(|method| video.languages_for(method))
            .map(String::as_str)
            .filter(|code| seen.insert(*code))
            .collect()
    }

    /// The video's methods (in manifest order) that publish `language`.
    pub fn methods_supporting(&self, video: usize, language: Option<&str>) -> Vec<&str> {
        let (Some(video), Some(language)) = (self.video(video), language) else {
            return Vec::new();
        };

        video
            .methods
            .iter()
            .filter(|method| video.languages_for(method).iter().any(|l| l == language))
            .map(String::as_str)
            .collect()
    }

    pub fn is_supported(
        &self,
        video: Option<usize>,
        method: Option<&str>,
        language: Option<&str>,
    ) -> bool {
        match (video.and_then(|v| self.video(v)), method, language) {
            (Some(video), Some(method), Some(language)) => video.supports(method, language),
            _ => false,
        }
    }
}
