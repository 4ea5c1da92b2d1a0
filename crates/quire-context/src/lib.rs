//! # quire-context
//!
//! Decides what the generation collaborator sees on each turn.
//!
//! - **Metadata extraction** ([`metadata`], [`page_map`]): targeted pattern
//!   extraction from lecture documents and compiler output. Malformed input
//!   degrades to empty fields, never to an error.
//! - **Discovery** ([`discovery`]): enumerates lectures, sessions, and
//!   assignments in a workspace.
//! - **Context assembly** ([`assembler`]): the mode-specific context bundle,
//!   recomputed on every call.
//! - **Mode resolution** ([`modes`]): command detection and instruction
//!   assembly.

#![deny(unsafe_code)]

pub mod assembler;
pub mod discovery;
pub mod metadata;
pub mod modes;
pub mod page_map;

pub use assembler::{ContextOptions, build_context};
pub use metadata::{LectureMetadata, extract_metadata, extract_preamble};
pub use modes::{Detection, PromptParams, assignment_id, build_instructions, detect_mode};
pub use page_map::{PageMap, parse_page_map};
