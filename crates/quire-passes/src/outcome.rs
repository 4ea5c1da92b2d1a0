//! Result of one pass run.

use std::fmt;

/// What a pass did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// Nothing changed since the cursor; no work was done.
    Skipped {
        /// Why the pass did nothing.
        reason: String,
    },
    /// The pass produced output and advanced its cursor.
    Completed {
        /// Number of changed documents processed.
        documents: usize,
        /// Raw collaborator output.
        output: String,
    },
    /// The pass failed; the cursor was not advanced.
    Failed {
        /// Rendered failure.
        message: String,
    },
}

impl PassOutcome {
    /// Whether the pass did work and advanced its cursor.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Whether the pass found nothing to do.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for PassOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped { reason } => f.write_str(reason),
            Self::Completed { output, .. } => f.write_str(output),
            Self::Failed { message } => f.write_str(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_text() {
        let skipped = PassOutcome::Skipped {
            reason: "No sessions to synthesize.".into(),
        };
        assert!(skipped.is_skipped());
        assert_eq!(skipped.to_string(), "No sessions to synthesize.");

        let done = PassOutcome::Completed {
            documents: 2,
            output: "[]".into(),
        };
        assert!(done.is_completed());
        assert_eq!(done.to_string(), "[]");
    }
}
