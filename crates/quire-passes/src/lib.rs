//! # quire-passes
//!
//! Background passes that run after a wrap-up conversation.
//!
//! Both passes are incremental. Each keeps a cursor (a timestamp persisted in
//! the workspace) and only looks at documents modified after it:
//!
//! - **State** ([`state`]): cursor load/save and change detection
//! - **Fact-check** ([`factcheck`]): verifies claims in changed lectures with
//!   web search and writes `fact-check-report.json`
//! - **Progress** ([`progress`]): rewrites the progress narrative from the
//!   session logs and recently edited documents
//!
//! A pass with nothing to do returns [`PassOutcome::Skipped`] and leaves its
//! cursor alone. A failed pass leaves the cursor alone too, so the next run
//! retries the same delta.

#![deny(unsafe_code)]

pub mod errors;
pub mod factcheck;
pub mod outcome;
pub mod progress;
pub mod state;

pub use errors::PassError;
pub use factcheck::{FactCheckPass, Finding, FindingStatus, Report, load_fact_check_report};
pub use outcome::PassOutcome;
pub use progress::{ProgressPass, load_progress};
pub use state::{PassKind, changed_since, load_cursor, now_seconds, save_cursor};

#[cfg(test)]
pub(crate) mod testutil;
