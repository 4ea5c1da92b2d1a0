//! Argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quire_core::Mode;
use quire_passes::PassKind;
use quire_settings::QuireSettings;

/// Quire notebook agent.
#[derive(Parser, Debug)]
#[command(name = "quire", version, about = "Quire notebook agent")]
pub struct Cli {
    /// Settings file (defaults to ~/.quire/settings.json).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Class slug, overriding workspace.activeClass.
    #[arg(long, global = true)]
    pub class: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, mut settings: QuireSettings) -> QuireSettings {
        if let Some(class) = &self.class {
            settings.workspace.active_class.clone_from(class);
        }
        settings
    }
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the context bundle for a mode.
    Context {
        /// Mode: lec, rev, work, done, or default.
        #[arg(long, value_parser = parse_mode, default_value = "default")]
        mode: Mode,
        /// Assignment to focus on in work mode (e.g. hw2).
        #[arg(long)]
        assignment: Option<String>,
    },
    /// Print the instructions and user prompt a message would produce.
    Prompt {
        /// The user message, including any command such as `/work hw2`.
        message: String,
    },
    /// Invoke a notebook tool directly.
    Tool {
        /// Tool name, e.g. read_file.
        name: String,
        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Compile the notebook or a single lecture.
    Compile {
        /// `master` or a lecture id.
        #[arg(default_value = "master")]
        target: String,
    },
    /// List documents a pass would process next.
    Changed {
        /// Which pass.
        #[arg(long, value_enum)]
        pass: PassArg,
    },
    /// Print the fact-check digest.
    Report,
    /// Print the progress narrative.
    Progress,
}

/// Pass selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PassArg {
    /// Fact-check pass.
    FactCheck,
    /// Progress pass.
    Progress,
}

impl From<PassArg> for PassKind {
    fn from(arg: PassArg) -> Self {
        match arg {
            PassArg::FactCheck => PassKind::FactCheck,
            PassArg::Progress => PassKind::Progress,
        }
    }
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    Mode::from_name(&value.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown mode {value:?} (expected lec, rev, work, done, default)"))
}
