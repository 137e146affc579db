//! Subtitle file locations.
//!
//! Each translation method wrote its output with its own filename
//! convention. The mapping below mirrors what exists on disk, so entries
//! are data: add a row for a new method rather than a new branch.

use crate::manifest::Video;

/// Root of the per-video subtitle tree, relative to the source.
pub const VIDEOS_DIR: &str = "videos";

/// Run id used by the `julia` pipeline when a video does not name one.
pub const DEFAULT_JULIA_RUN_ID: &str = "run1";

/// Inputs available to a filename template.
pub struct PathContext<'a> {
    pub video: &'a Video,
    pub method: &'a str,
    pub language: &'a str,
}

impl PathContext<'_> {
    fn base(&self) -> &str {
        self.video.base_filename()
    }

    fn julia_run_id(&self) -> &str {
        [&self.video.julia_run_id, &self.video.run_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|id| !id.is_empty())
            .unwrap_or(DEFAULT_JULIA_RUN_ID)
    }
}

pub type Template = fn(&PathContext<'_>) -> String;

/// Method name to filename template. Methods not listed use [`gpt_4o_mini`].
pub const CONVENTIONS: &[(&str, Template)] = &[
    ("deepl", deepl),
    ("gpt-5", gpt_5),
    ("deepl-gpt-5", deepl_gpt_5),
    ("advanced", advanced),
    ("advanced-v2", advanced),
    ("julia", julia),
    ("gpt-5-sentence", sentence),
    ("gpt-5-paragraph", paragraph),
];

/// (method, video id) pairs whose files were produced under a different
/// convention than the method's usual one.
pub const VIDEO_OVERRIDES: &[(&str, &str, Template)] =
    &[("gpt-5", "quantum-lecture", deepl_gpt_5)];

fn deepl(ctx: &PathContext<'_>) -> String {
    format!("{}/{}-output-deepl-{}.srt", ctx.method, ctx.base(), ctx.language)
}

fn gpt_5(ctx: &PathContext<'_>) -> String {
    format!("{}/{}-output-gpt-5-{}.srt", ctx.method, ctx.base(), ctx.language)
}

fn deepl_gpt_5(ctx: &PathContext<'_>) -> String {
    format!(
        "{}/{}-output-deepl-gpt-5-{}.srt",
        ctx.method,
        ctx.base(),
        ctx.language
    )
}

fn advanced(ctx: &PathContext<'_>) -> String {
    format!(
        "{}/{}__output_{}_advanced.srt",
        ctx.method,
        ctx.base(),
        ctx.language
    )
}

fn julia(ctx: &PathContext<'_>) -> String {
    format!("julia/output_{}_{}.srt", ctx.language, ctx.julia_run_id())
}

fn sentence(ctx: &PathContext<'_>) -> String {
    format!(
        "sentence/{}__output_{}_sentence.srt",
        ctx.base(),
        ctx.language
    )
}

fn paragraph(ctx: &PathContext<'_>) -> String {
    format!(
        "paragraph/{}__output_{}_paragraph.srt",
        ctx.base(),
        ctx.language
    )
}

fn gpt_4o_mini(ctx: &PathContext<'_>) -> String {
    format!(
        "{}/{}-output-gpt-4o-mini-{}.srt",
        ctx.method,
        ctx.base(),
        ctx.language
    )
}

/// Template for `method`, honoring per-video overrides first.
pub fn template_for(video_id: &str, method: &str) -> Template {
    VIDEO_OVERRIDES
        .iter()
        .find(|(m, id, _)| *m == method && *id == video_id)
        .map(|(_, _, template)| *template)
        .or_else(|| {
            CONVENTIONS
                .iter()
                .find(|(m, _)| *m == method)
                .map(|(_, template)| *template)
        })
        .unwrap_or(gpt_4o_mini)
}

pub fn is_known_method(method: &str) -> bool {
    CONVENTIONS.iter().any(|(m, _)| *m == method)
}

/// Canonical English track of a video, shared by every method.
pub fn english_path(video: &Video) -> String {
    format!(
        "{}/{}/{}-en.srt",
        VIDEOS_DIR,
        video.id,
        video.base_filename()
    )
}

/// Location of the subtitle file for (video, method, language).
///
/// Never fails: a combination that was never published resolves to a path
/// that will not be found when fetched.
pub fn resolve_path(video: &Video, method: &str, language: &str) -> String {
    if language == "en" {
        return english_path(video);
    }

    let ctx = PathContext {
        video,
        method,
        language,
    };
    let template = template_for(&video.id, method);
    format!("{}/{}/{}", VIDEOS_DIR, video.id, template(&ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            youtube_id: "yt".to_string(),
            title: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_english_ignores_method() {
        let v = video("talk");
        assert_eq!(resolve_path(&v, "deepl", "en"), "videos/talk/talk-en.srt");
        assert_eq!(resolve_path(&v, "julia", "en"), "videos/talk/talk-en.srt");
        assert_eq!(english_path(&v), "videos/talk/talk-en.srt");
    }

    #[test]
    fn test_base_filename_override() {
        let mut v = video("talk");
        v.base_filename = Some("talk-v2".to_string());
        assert_eq!(resolve_path(&v, "en", "en"), "videos/talk/talk-v2-en.srt");
        assert_eq!(
            resolve_path(&v, "deepl", "es"),
            "videos/talk/deepl/talk-v2-output-deepl-es.srt"
        );
    }

    #[test]
    fn test_method_conventions() {
        let v = video("talk");
        let cases = [
            ("deepl", "videos/talk/deepl/talk-output-deepl-es.srt"),
            ("gpt-5", "videos/talk/gpt-5/talk-output-gpt-5-es.srt"),
            (
                "deepl-gpt-5",
                "videos/talk/deepl-gpt-5/talk-output-deepl-gpt-5-es.srt",
            ),
            ("advanced", "videos/talk/advanced/talk__output_es_advanced.srt"),
            (
                "advanced-v2",
                "videos/talk/advanced-v2/talk__output_es_advanced.srt",
            ),
            ("julia", "videos/talk/julia/output_es_run1.srt"),
            (
                "gpt-5-sentence",
                "videos/talk/sentence/talk__output_es_sentence.srt",
            ),
            (
                "gpt-5-paragraph",
                "videos/talk/paragraph/talk__output_es_paragraph.srt",
            ),
            (
                "gpt-4o-mini",
                "videos/talk/gpt-4o-mini/talk-output-gpt-4o-mini-es.srt",
            ),
        ];

        for (method, expected) in cases {
            assert_eq!(resolve_path(&v, method, "es"), expected, "method {method}");
        }
    }

    #[test]
    fn test_unknown_method_uses_legacy_convention() {
        let v = video("talk");
        assert!(!is_known_method("whisper-x"));
        assert_eq!(
            resolve_path(&v, "whisper-x", "fr"),
            "videos/talk/whisper-x/talk-output-gpt-4o-mini-fr.srt"
        );
    }

    #[test]
    fn test_override_applies_only_to_named_video() {
        let special = video("quantum-lecture");
        assert_eq!(
            resolve_path(&special, "gpt-5", "de"),
            "videos/quantum-lecture/gpt-5/quantum-lecture-output-deepl-gpt-5-de.srt"
        );

        let similar = video("quantum-lecture-2");
        assert_eq!(
            resolve_path(&similar, "gpt-5", "de"),
            "videos/quantum-lecture-2/gpt-5/quantum-lecture-2-output-gpt-5-de.srt"
        );

        // The override is keyed on method as well as video.
        assert_eq!(
            resolve_path(&special, "deepl", "de"),
            "videos/quantum-lecture/deepl/quantum-lecture-output-deepl-de.srt"
        );
    }

    #[test]
    fn test_julia_run_id_fields() {
        let mut v = video("talk");
        v.run_id = Some("run7".to_string());
        assert_eq!(
            resolve_path(&v, "julia", "ja"),
            "videos/talk/julia/output_ja_run7.srt"
        );

        v.julia_run_id = Some("run9".to_string());
        assert_eq!(
            resolve_path(&v, "julia", "ja"),
            "videos/talk/julia/output_ja_run9.srt"
        );

        v.julia_run_id = Some(String::new());
        assert_eq!(
            resolve_path(&v, "julia", "ja"),
            "videos/talk/julia/output_ja_run7.srt"
        );
    }
}
