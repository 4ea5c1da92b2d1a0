//! # quire-core
//!
//! Foundation types for the Quire notebook agent.
//!
//! This crate provides the shared vocabulary that all other Quire crates depend on:
//!
//! - **Workspace layout**: [`workspace::WorkspaceLayout`] names every conventional path
//!   inside one class notebook
//! - **Modes**: [`mode::Mode`], the closed set of conversational operating contexts
//! - **Tool schema and results**: [`tools::Tool`], [`tools::ToolResult`]
//! - **Events**: [`events::ChatEvent`] (outbound, closed) and [`events::GenerationEvent`]
//!   (inbound from the generation collaborator)
//! - **Generation seam**: [`generation::Generator`] and [`generation::ToolDispatch`]
//! - **Logging**: [`logging::init_subscriber`]

#![deny(unsafe_code)]

pub mod events;
pub mod generation;
pub mod logging;
pub mod mode;
pub mod tools;
pub mod workspace;

pub use events::{ChatEvent, GenerationEvent};
pub use mode::Mode;
pub use workspace::WorkspaceLayout;
