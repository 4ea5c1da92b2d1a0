//! # quire-runtime
//!
//! One conversational turn, end to end.
//!
//! A [`Session`] holds everything a turn needs: the workspace layout, the
//! notebook toolset, the generation collaborator, and the background passes.
//! [`Session::run_turn`] detects the mode from the latest user message,
//! assembles context and instructions, drives the collaborator, and streams
//! the result as [`quire_core::ChatEvent`]s. A successful wrap-up turn
//! schedules the background passes.
//!
//! [`Services`] builds the production components from a
//! [`quire_settings::QuireSettings`] value.

#![deny(unsafe_code)]

pub mod background;
pub mod errors;
pub mod messages;
pub mod services;
pub mod session;

pub use background::{BackgroundPasses, PassHandle};
pub use errors::RuntimeError;
pub use messages::{ChatMessage, Role, build_prompt};
pub use services::Services;
pub use session::{ChatEventStream, Session, SessionOptions, context_options, prepare_request};
