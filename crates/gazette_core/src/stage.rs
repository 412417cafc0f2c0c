use std::fmt;

/// Step label shown while the document is still being uploaded.
pub(crate) const UPLOADING_STEP: &str = "Uploading...";

/// Discrete, ordered pipeline position shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Stage {
    #[default]
    Uploading,
    ProcessingDocument,
    ExtractingText,
    DetectingArticles,
    ExtractingKeywords,
    CroppingImages,
    Finalizing,
    Completed,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Uploading,
        Stage::ProcessingDocument,
        Stage::ExtractingText,
        Stage::DetectingArticles,
        Stage::ExtractingKeywords,
        Stage::CroppingImages,
        Stage::Finalizing,
        Stage::Completed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Uploading => "Uploading...",
            Stage::ProcessingDocument => "Processing PDF...",
            Stage::ExtractingText => "Extracting text...",
            Stage::DetectingArticles => "Detecting articles...",
            Stage::ExtractingKeywords => "Extracting keywords...",
            Stage::CroppingImages => "Cropping images...",
            Stage::Finalizing => "Finalizing...",
            Stage::Completed => "Completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered (substring, stage) rules. Evaluated top to bottom and the first
/// rule whose substring occurs in the step wins, so longer labels must come
/// before their prefixes ("Processing PDF pages" before "Processing PDF").
const STEP_RULES: &[(&str, Stage)] = &[
    ("Extracting text from PDF", Stage::ExtractingText),
    ("Processing PDF pages", Stage::ExtractingText),
    ("Processing PDF", Stage::ProcessingDocument),
    ("Detecting and splitting articles", Stage::DetectingArticles),
    ("Detecting articles", Stage::DetectingArticles),
    ("Enhancing content", Stage::DetectingArticles),
    ("AI enhancement", Stage::DetectingArticles),
    ("Extracting keywords", Stage::ExtractingKeywords),
    ("Computing related articles", Stage::CroppingImages),
    ("Cropping", Stage::CroppingImages),
    ("Generating summary", Stage::CroppingImages),
    ("Storing articles in database", Stage::Finalizing),
    ("Finalizing", Stage::Finalizing),
    ("Completed", Stage::Completed),
    ("Initializing", Stage::Uploading),
    ("Starting", Stage::Uploading),
    ("Uploading", Stage::Uploading),
];

/// Maps a free-text backend step and a percentage onto a [`Stage`].
///
/// The step rules are authoritative. The progress ladder is only consulted
/// when no rule matches, so unknown labels still land somewhere sensible.
/// Nothing here is monotonic: a step that regresses maps to an earlier stage.
pub fn map_stage(step: &str, progress: u32) -> Stage {
    STEP_RULES
        .iter()
        .find(|(needle, _)| step.contains(needle))
        .map(|(_, stage)| *stage)
        .unwrap_or_else(|| stage_for_progress(progress))
}

fn stage_for_progress(progress: u32) -> Stage {
    match progress {
        0..=9 => Stage::Uploading,
        10..=29 => Stage::ExtractingText,
        30..=49 => Stage::DetectingArticles,
        50..=69 => Stage::ExtractingKeywords,
        70..=89 => Stage::CroppingImages,
        90..=99 => Stage::Finalizing,
        _ => Stage::Completed,
    }
}
