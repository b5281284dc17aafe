//! Core types for the TRPG log viewer: documents, entries, chapters, and style rules.
//!
//! This crate defines the data model that session logs are loaded into. It
//! knows nothing about presentation; the `tlv-view` crate derives channel
//! groups, pages, and styles from a [`Document`].

/// Chapter markers and chapter extraction.
pub mod chapter;
/// The top-level document container.
pub mod document;
/// Transcript entries and roll payloads.
pub mod entry;
/// Load errors and their diagnostic rendering.
pub mod error;
/// JSON parsing and normalization into a [`Document`].
pub mod load;
/// Character, channel, and global style rule types.
pub mod rules;
/// Locating the log file to load.
pub mod source;
/// Best-effort timestamp parsing and display.
pub mod time;

/// Re-export chapter types.
pub use chapter::Chapter;
/// Re-export the document container.
pub use document::Document;
/// Re-export entry types.
pub use entry::{LogEntry, RollPayload, SurfaceOverride};
/// Re-export error types.
pub use error::{LoadError, LoadResult};
/// Re-export loading entry points.
pub use load::{load_document, parse_document};
/// Re-export rule types.
pub use rules::{ChannelRule, CharacterRule};
/// Re-export the log locator.
pub use source::LogLocator;
