//! # quire-tools
//!
//! Everything the agent can do to a notebook.
//!
//! - **Sandbox** ([`sandbox`]): resolves relative paths and rejects any that
//!   escape the workspace root before touching the filesystem
//! - **Notebook operations** ([`notebook`]): read, write, list, create
//!   lecture, create session, built on [`splice`] and [`template`]
//! - **Compile pipeline** ([`compile`]): external typesetting through an
//!   injectable [`traits::ProcessRunner`]
//! - **Web search** ([`search`]) and **Drive import** ([`drive`]): clients
//!   over an injectable [`traits::HttpClient`]
//! - **Tool adapters** ([`tools`]) and the [`registry::ToolRegistry`] that
//!   dispatches the collaborator's tool calls

#![deny(unsafe_code)]

pub mod compile;
pub mod drive;
pub mod errors;
pub mod notebook;
pub mod providers;
pub mod registry;
pub mod sandbox;
pub mod search;
pub mod splice;
pub mod template;
pub mod tools;
pub mod traits;
pub mod utils;

#[cfg(test)]
pub(crate) mod testutil;

pub use compile::{CompileOptions, Compiler};
pub use drive::{ComposioDriveClient, DriveClient};
pub use errors::{
    CompileError, DriveError, HttpError, NotebookError, ProcessError, SearchError, ToolError,
};
pub use notebook::Notebook;
pub use registry::ToolRegistry;
pub use sandbox::Sandbox;
pub use search::{SearchClient, SearchHit, YouSearchClient};
