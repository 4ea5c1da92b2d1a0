//! Command detection and instruction assembly.
//!
//! A turn's mode comes from an optional leading command token (`/lec`,
//! `/rev`, `/work`, `/done`). The instruction text handed to the generation
//! collaborator is the base block, the mode block, and the context bundle,
//! in that order.

use std::sync::LazyLock;

use quire_core::Mode;
use regex::Regex;

const BASE_PROMPT: &str = include_str!("prompts/base.md");
const LECTURE_PROMPT: &str = include_str!("prompts/lec.md");
const REVIEW_PROMPT: &str = include_str!("prompts/rev.md");
const WORK_PROMPT: &str = include_str!("prompts/work.md");
const DONE_PROMPT: &str = include_str!("prompts/done.md");
const DEFAULT_PROMPT: &str = include_str!("prompts/default.md");

/// Separator between the instruction blocks and the context bundle.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n## Pre-loaded Notebook Context\n\n\
The following content is from the student's notebook. Use it to inform your responses.\n\n";

static ASSIGNMENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(hw\d+)").unwrap());

/// Result of [`detect_mode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    /// Selected mode.
    pub mode: Mode,
    /// The message with the command token removed, trimmed.
    pub residual: String,
}

/// Select the mode for a message.
///
/// The command token is matched case-insensitively as a prefix of the
/// trimmed message, so `/Done.` and `/Work: hw2` select their modes. The
/// residual is whatever follows the token, trimmed. Without a command the
/// whole trimmed message is the residual.
pub fn detect_mode(message: &str) -> Detection {
    let trimmed = message.trim();

    for mode in Mode::COMMANDS {
        let name = mode.name();
        let token_len = name.len() + 1;
        let Some(head) = trimmed.get(..token_len) else {
            continue;
        };
        if head.starts_with('/') && head[1..].eq_ignore_ascii_case(name) {
            return Detection {
                mode,
                residual: trimmed[token_len..].trim().to_string(),
            };
        }
    }

    Detection {
        mode: Mode::Default,
        residual: trimmed.to_string(),
    }
}

/// Leading assignment id (`hwN`) of a work-mode residual, lower-cased.
pub fn assignment_id(residual: &str) -> Option<String> {
    ASSIGNMENT_ID_RE
        .captures(residual.trim_start())
        .map(|caps| caps[1].to_ascii_lowercase())
}

/// Values substituted into the base instruction block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptParams {
    /// Human-readable class name.
    pub class_name: String,
    /// Base URL under which compiled documents are served.
    pub backend_url: String,
    /// Workspace directory name.
    pub class_slug: String,
}

/// Instruction block for one mode.
pub fn mode_prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Lecture => LECTURE_PROMPT,
        Mode::Review => REVIEW_PROMPT,
        Mode::Work => WORK_PROMPT,
        Mode::Done => DONE_PROMPT,
        Mode::Default => DEFAULT_PROMPT,
    }
}

/// Full instruction text: base block, mode block, separator, context.
pub fn build_instructions(mode: Mode, context: &str, params: &PromptParams) -> String {
    let base = BASE_PROMPT
        .replace("{className}", &params.class_name)
        .replace("{backendUrl}", params.backend_url.trim_end_matches('/'))
        .replace("{classSlug}", &params.class_slug);

    format!(
        "{}\n\n{}{CONTEXT_SEPARATOR}{context}",
        base.trim_end(),
        mode_prompt(mode).trim_end()
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detect(message: &str) -> (Mode, String) {
        let d = detect_mode(message);
        (d.mode, d.residual)
    }

    #[test]
    fn commands_select_modes() {
        assert_eq!(detect("/Work hw2 please"), (Mode::Work, "hw2 please".into()));
        assert_eq!(detect("/lec Today: topology"), (Mode::Lecture, "Today: topology".into()));
        assert_eq!(detect("  /REV quiz me  "), (Mode::Review, "quiz me".into()));
        assert_eq!(detect("/Done"), (Mode::Done, String::new()));
        assert_eq!(detect("/done\nthanks"), (Mode::Done, "thanks".into()));
    }

    #[test]
    fn plain_messages_are_default() {
        assert_eq!(detect("hello"), (Mode::Default, "hello".into()));
        assert_eq!(detect("  what is a compact set?\n"), (Mode::Default, "what is a compact set?".into()));
        assert_eq!(detect(""), (Mode::Default, String::new()));
    }

    #[test]
    fn token_matches_as_prefix() {
        assert_eq!(detect("/done."), (Mode::Done, ".".into()));
        assert_eq!(detect("/Done."), (Mode::Done, ".".into()));
        assert_eq!(detect("/Work: hw2"), (Mode::Work, ": hw2".into()));
        assert_eq!(detect("/workhw2"), (Mode::Work, "hw2".into()));
        assert_eq!(
            detect("/Lecture notes on topology"),
            (Mode::Lecture, "ture notes on topology".into())
        );
        assert_eq!(detect("/review"), (Mode::Review, "iew".into()));
    }

    #[test]
    fn command_must_lead() {
        assert_eq!(detect("please /work"), (Mode::Default, "please /work".into()));
    }

    #[test]
    fn non_ascii_prefix_does_not_panic() {
        assert_eq!(detect("/é"), (Mode::Default, "/é".into()));
        assert_eq!(detect("/wör"), (Mode::Default, "/wör".into()));
    }

    #[test]
    fn assignment_ids() {
        assert_eq!(assignment_id("hw2 please"), Some("hw2".into()));
        assert_eq!(assignment_id("HW12"), Some("hw12".into()));
        assert_eq!(assignment_id("help with hw3"), None);
        assert_eq!(assignment_id("hw"), None);
        assert_eq!(assignment_id(""), None);
    }

    #[test]
    fn instructions_are_ordered() {
        let params = PromptParams {
            class_name: "Math 104".into(),
            backend_url: "http://localhost:8200/".into(),
            class_slug: "math-104".into(),
        };
        let text = build_instructions(Mode::Review, "CONTEXT BODY", &params);

        assert!(text.starts_with("You are Quire, a study companion for Math 104."));
        assert!(text.contains("http://localhost:8200/pdf/math-104/"));
        assert!(!text.contains("{className}"));
        assert!(!text.contains("{backendUrl}"));
        assert!(!text.contains("{classSlug}"));

        let mode_at = text.find("## Mode: Review").unwrap();
        let sep_at = text.find("## Pre-loaded Notebook Context").unwrap();
        assert!(mode_at < sep_at);
        assert!(text.ends_with("Use it to inform your responses.\n\nCONTEXT BODY"));
    }

    #[test]
    fn every_mode_has_a_block() {
        for mode in [Mode::Lecture, Mode::Review, Mode::Work, Mode::Done, Mode::Default] {
            assert!(mode_prompt(mode).starts_with("## Mode:"), "{mode}");
        }
    }

    #[test]
    fn mode_blocks_carry_their_ground_rules() {
        let lec = mode_prompt(Mode::Lecture);
        assert!(lec.contains("### Transcribe only"));
        assert!(lec.contains("| `A int B` | `A \\cap B` |"));
        assert!(lec.contains("| `A~B` | `A \\sim B` |"));
        assert!(lec.contains("call `create_lecture` first"));

        let work = mode_prompt(Mode::Work);
        assert!(work.contains("### Guide, do not solve"));
        assert!(work.contains("hw/hwN/explainers/pM/explainerM.tex"));

        let done = mode_prompt(Mode::Done);
        for arg in ["`date`", "`mode`", "`summary`", "`topics`", "`covered`", "`next_steps`"] {
            assert!(done.contains(arg), "{arg}");
        }

        assert!(mode_prompt(Mode::Review).contains("That belongs to `/lec`"));
        for command in ["/lec", "/rev", "/work", "/done"] {
            assert!(mode_prompt(Mode::Default).contains(command), "{command}");
        }
    }

    proptest! {
        #[test]
        fn plain_text_is_always_default(message in "[a-zA-Z0-9 ?.,]{0,40}") {
            let d = detect_mode(&message);
            prop_assert_eq!(d.mode, Mode::Default);
            prop_assert_eq!(d.residual, message.trim());
        }

        #[test]
        fn command_strips_token(index in 0usize..4, upper in any::<bool>(), rest in "[a-z0-9][a-z0-9 ]{0,20}") {
            let mode = Mode::COMMANDS[index];
            let token = if upper { mode.name().to_uppercase() } else { mode.name().to_string() };
            let d = detect_mode(&format!("/{token} {rest}"));
            prop_assert_eq!(d.mode, mode);
            prop_assert_eq!(d.residual, rest.trim());
        }
    }
}
