use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// The four mutually exclusive matching protocols. Exactly one is active per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    TextMatch,
    ImageMatch,
    MultiTextMatch,
    MultiImageMatch,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::TextMatch,
        Mode::ImageMatch,
        Mode::MultiTextMatch,
        Mode::MultiImageMatch,
    ];

    /// Backend path serving this mode.
    pub fn endpoint(self) -> &'static str {
        match self {
            Mode::TextMatch => "/match-text",
            Mode::ImageMatch => "/match-image",
            Mode::MultiTextMatch => "/match-text-multiple",
            Mode::MultiImageMatch => "/match-image-multiple",
        }
    }

    /// Short name used on the console (`mode multi-text`).
    pub fn slug(self) -> &'static str {
        match self {
            Mode::TextMatch => "text",
            Mode::ImageMatch => "image",
            Mode::MultiTextMatch => "multi-text",
            Mode::MultiImageMatch => "multi-image",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::TextMatch => "Text",
            Mode::ImageMatch => "Image",
            Mode::MultiTextMatch => "Multi Text",
            Mode::MultiImageMatch => "Multi Image",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '_'], "-");
        Mode::ALL
            .into_iter()
            .find(|m| m.slug() == wanted)
            .ok_or(InputError::Usage("mode <text|image|multi-text|multi-image>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_mode_has_distinct_endpoint() {
        let endpoints: std::collections::HashSet<_> =
            Mode::ALL.iter().map(|m| m.endpoint()).collect();
        assert_eq!(endpoints.len(), 4);
        assert_eq!(Mode::MultiImageMatch.endpoint(), "/match-image-multiple");
    }

    #[test]
    fn test_mode_parses_slug_and_label() {
        assert_eq!("multi-text".parse::<Mode>().unwrap(), Mode::MultiTextMatch);
        assert_eq!("Multi Image".parse::<Mode>().unwrap(), Mode::MultiImageMatch);
        assert_eq!(" IMAGE ".parse::<Mode>().unwrap(), Mode::ImageMatch);
        assert!("video".parse::<Mode>().is_err());
    }

    #[test]
    fn test_default_mode_is_text() {
        assert_eq!(Mode::default(), Mode::TextMatch);
    }
}
