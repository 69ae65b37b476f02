//! Format selection for the external tool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the external tool should produce for a job.
///
/// `"audio"` is the only token with special meaning: extract the audio
/// track and transcode it. Anything else is handed to the tool verbatim
/// as a format specifier (e.g. `best`, `bestvideo+bestaudio`, `22`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormatSelector {
    /// Extract audio and transcode to [`FormatSelector::AUDIO_CODEC`].
    Audio,
    /// Raw format specifier passed through to the tool.
    Format(String),
}

impl FormatSelector {
    /// Token that selects audio extraction.
    pub const AUDIO_TOKEN: &'static str = "audio";
    /// Codec used when extracting audio.
    pub const AUDIO_CODEC: &'static str = "mp3";
    /// Format used when the caller does not pick one.
    pub const DEFAULT_FORMAT: &'static str = "best";

    /// Parse an optional, user-supplied token.
    ///
    /// Missing or blank input falls back to [`FormatSelector::DEFAULT_FORMAT`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::default(),
            Some(Self::AUDIO_TOKEN) => Self::Audio,
            Some(other) => Self::Format(other.to_string()),
        }
    }

    /// The token as the user would write it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Audio => Self::AUDIO_TOKEN,
            Self::Format(spec) => spec,
        }
    }

    #[must_use]
    pub const fn is_audio(&self) -> bool {
        matches!(self, Self::Audio)
    }
}

impl Default for FormatSelector {
    fn default() -> Self {
        Self::Format(Self::DEFAULT_FORMAT.to_string())
    }
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FormatSelector {
    fn from(raw: String) -> Self {
        Self::parse(Some(&raw))
    }
}

impl From<FormatSelector> for String {
    fn from(format: FormatSelector) -> Self {
        match format {
            FormatSelector::Audio => FormatSelector::AUDIO_TOKEN.to_string(),
            FormatSelector::Format(spec) => spec,
        }
    }
}
