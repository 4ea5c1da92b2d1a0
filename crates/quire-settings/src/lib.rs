//! # quire-settings
//!
//! Configuration management with layered sources for the Quire notebook agent.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`QuireSettings::default()`]
//! 2. **User file**: `~/.quire/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `QUIRE_*` overrides (highest priority)
//!
//! There is no process-wide instance. The binary loads a [`QuireSettings`]
//! once and passes it by reference to every component that needs it.
//!
//! # Usage
//!
//! ```no_run
//! let settings = quire_settings::load_settings()?;
//! println!("active class: {}", settings.workspace.active_class);
//! # Ok::<(), quire_settings::SettingsError>(())
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
