//! Conversational operating modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the fixed operating contexts selected per conversational turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Lecture authoring (`/lec`).
    #[serde(rename = "lec")]
    Lecture,
    /// Review and study (`/rev`).
    #[serde(rename = "rev")]
    Review,
    /// Assignment work (`/work`).
    Work,
    /// Session wrap-up (`/done`).
    Done,
    /// No command given.
    #[default]
    Default,
}

impl Mode {
    /// Command modes in detection priority order. [`Mode::Default`] is never
    /// selected by a command.
    pub const COMMANDS: [Mode; 4] = [Mode::Lecture, Mode::Review, Mode::Work, Mode::Done];

    /// Short name used as the command token and on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::Lecture => "lec",
            Self::Review => "rev",
            Self::Work => "work",
            Self::Done => "done",
            Self::Default => "default",
        }
    }

    /// Parse a short mode name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lec" => Some(Self::Lecture),
            "rev" => Some(Self::Review),
            "work" => Some(Self::Work),
            "done" => Some(Self::Done),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for mode in [Mode::Lecture, Mode::Review, Mode::Work, Mode::Done, Mode::Default] {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Mode::from_name("WORK"), Some(Mode::Work));
        assert_eq!(Mode::from_name("lecture"), None);
    }

    #[test]
    fn serde_uses_short_names() {
        assert_eq!(serde_json::to_string(&Mode::Lecture).unwrap(), "\"lec\"");
        assert_eq!(serde_json::to_string(&Mode::Default).unwrap(), "\"default\"");
        let back: Mode = serde_json::from_str("\"rev\"").unwrap();
        assert_eq!(back, Mode::Review);
    }

    #[test]
    fn command_priority_order() {
        let names: Vec<_> = Mode::COMMANDS.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["lec", "rev", "work", "done"]);
    }
}
