//! Integration tests for subview
//!
//! These tests exercise the manifest, selection, path resolution, parsing
//! and overlay lookup together, without any I/O.

use subview::config::Config;
use subview::manifest::Manifest;
use subview::present::{language_options, method_options};
use subview::resolve::{english_path, resolve_path};
use subview::selection::Selection;
use subview::subtitle::{parse, SubtitleTrack};
use subview::sync::{active_entry, ScrollMetrics, ScrollSync};

use std::time::{Duration, Instant};

const MANIFEST: &str = r#"{
    "languageNames": {"en": "English", "es": "Spanish", "fr": "French", "de": "German"},
    "videos": [
        {
            "id": "talk",
            "youtubeId": "yt-talk",
            "title": "The Talk",
            "methods": ["gpt-4o-mini", "deepl", "julia", "advanced"],
            "languages": {
                "gpt-4o-mini": ["en", "es"],
                "deepl": ["es", "fr"],
                "julia": ["de"],
                "advanced": []
            },
            "juliaRunId": "run3"
        },
        {
            "id": "quantum-lecture",
            "baseFilename": "ql",
            "youtubeId": "yt-ql",
            "title": "Quantum Lecture",
            "methods": ["gpt-5", "deepl"],
            "languages": {"gpt-5": ["es"], "deepl": ["fr"]}
        },
        {
            "id": "silent",
            "youtubeId": "yt-silent",
            "title": "No Translations",
            "methods": []
        }
    ]
}"#;

fn manifest() -> Manifest {
    Manifest::from_json(MANIFEST).unwrap()
}

// ============================================================================
// Manifest + Path Resolution
// ============================================================================

mod resolution_tests {
    use super::*;

    #[test]
    fn test_every_declared_combination_resolves() {
        let m = manifest();
        for video in &m.videos {
            for method in &video.methods {
                for language in video.languages_for(method) {
                    let path = resolve_path(video, method, language);
                    assert!(!path.is_empty());
                    assert!(path.starts_with(&format!("videos/{}/", video.id)));
                    assert!(path.ends_with(".srt"));
                }
            }
        }
    }

    #[test]
    fn test_manifest_driven_paths() {
        let m = manifest();
        let talk = m.video(0).unwrap();
        let ql = m.video(1).unwrap();

        assert_eq!(english_path(talk), "videos/talk/talk-en.srt");
        assert_eq!(
            resolve_path(talk, "julia", "de"),
            "videos/talk/julia/output_de_run3.srt"
        );
        assert_eq!(english_path(ql), "videos/quantum-lecture/ql-en.srt");
        assert_eq!(
            resolve_path(ql, "gpt-5", "es"),
            "videos/quantum-lecture/gpt-5/ql-output-deepl-gpt-5-es.srt"
        );
        assert_eq!(
            resolve_path(ql, "deepl", "fr"),
            "videos/quantum-lecture/deepl/ql-output-deepl-fr.srt"
        );
    }

    #[test]
    fn test_video_without_methods() {
        let m = manifest();
        assert!(m.available_languages(2).is_empty());
        assert!(method_options(&m, Some(2), None).is_empty());
        assert!(language_options(&m, Some(2)).is_empty());
    }
}

// ============================================================================
// Selection Flow Tests
// ============================================================================

mod selection_flow_tests {
    use super::*;

    #[test]
    fn test_defaults_then_paths() {
        let m = manifest();
        let mut selection = Selection::new();
        selection.apply_defaults(&m);

        assert_eq!(selection.language(), Some("es"));
        assert_eq!(selection.method(), Some("gpt-4o-mini"));
        assert_eq!(
            selection.translated_path(&m).as_deref(),
            Some("videos/talk/gpt-4o-mini/talk-output-gpt-4o-mini-es.srt")
        );
    }

    #[test]
    fn test_video_language_invalid_method_sequence() {
        let m = manifest();
        let mut selection = Selection::new();
        selection.select_video(&m, Some(0));
        selection.select_language(&m, Some("de"));

        let transition = selection.select_method(&m, Some("deepl"));
        assert!(transition.rejected);
        assert_eq!(selection.method(), None);
        assert_eq!(selection.translated_path(&m), None);

        // Known but unpublished methods are rejected too.
        selection.select_method(&m, Some("advanced"));
        assert_eq!(selection.method(), None);
    }

    #[test]
    fn test_switching_videos_keeps_what_still_applies() {
        let m = manifest();
        let mut selection = Selection::new();
        selection.select_video(&m, Some(0));
        selection.select_language(&m, Some("fr"));
        selection.select_method(&m, Some("deepl"));

        let transition = selection.select_video(&m, Some(1));
        assert!(!transition.translation_changed);
        assert_eq!(selection.language(), Some("fr"));
        assert_eq!(selection.method(), Some("deepl"));

        let transition = selection.select_video(&m, Some(2));
        assert!(transition.translation_changed);
        assert_eq!(selection.video(), Some(2));
        assert_eq!(selection.language(), None);
        assert_eq!(selection.method(), None);
    }

    #[test]
    fn test_method_options_follow_language() {
        let m = manifest();
        let options = method_options(&m, Some(0), Some("de"));
        let enabled: Vec<&str> = options
            .iter()
            .filter(|o| o.enabled)
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(enabled, vec!["julia"]);
        assert_eq!(options[3].label, "advanced (no translations yet)");
    }
}

// ============================================================================
// Parsing + Overlay Lookup
// ============================================================================

mod track_tests {
    use super::*;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\
                       2\n00:00:02,000 --> 00:00:03,000\nB\n\n\
                       3\n00:00:05,000 --> 00:00:06,500\nC\nsecond line\n";

    #[test]
    fn test_track_from_srt() {
        let track = SubtitleTrack::from_srt("es", "Spanish", "videos/x.srt", SRT);
        assert_eq!(track.len(), 3);
        assert_eq!(track.count_label(), "3 entries");
        assert_eq!(track.entries[2].text, "C\nsecond line");
    }

    #[test]
    fn test_overlay_lookup_over_parsed_track() {
        let entries = parse(SRT);
        let text_at = |ms: u64| {
            active_entry(&entries, Duration::from_millis(ms)).map(|e| e.text.clone())
        };

        assert_eq!(text_at(500), None);
        assert_eq!(text_at(2000).as_deref(), Some("A"));
        assert_eq!(text_at(2500).as_deref(), Some("B"));
        assert_eq!(text_at(4000), None);
        assert_eq!(text_at(6500).as_deref(), Some("C\nsecond line"));
    }

    #[test]
    fn test_parse_twice_is_equal() {
        assert_eq!(parse(SRT), parse(SRT));
    }
}

// ============================================================================
// Scroll Sync + Config
// ============================================================================

mod scroll_tests {
    use super::*;

    #[test]
    fn test_scroll_round_trip_uses_configured_lock() {
        let config = Config::default();
        let mut sync = ScrollSync::new(config.scroll_lock());
        let english = ScrollMetrics::new(40.0, 100.0, 20.0);
        let translated = ScrollMetrics::new(0.0, 220.0, 20.0);
        let t0 = Instant::now();

        assert_eq!(sync.on_scroll(english, translated, t0), Some(100.0));
        assert_eq!(
            sync.on_scroll(translated, english, t0 + Duration::from_millis(49)),
            None
        );
        assert_eq!(
            sync.on_scroll(
                ScrollMetrics::new(200.0, 220.0, 20.0),
                english,
                t0 + config.scroll_lock()
            ),
            Some(80.0)
        );
    }
}
