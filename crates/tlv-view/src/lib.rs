//! Presentation engine for TRPG session logs.
//!
//! Given a loaded [`tlv_core::Document`], this crate decides how it is shown:
//! which style source wins for every surface, which lane each entry lands in,
//! how roll results are categorised, and which entries make up the current
//! page.

/// Dice and extend result classification.
pub mod classify;
/// Viewer configuration.
pub mod config;
/// Navigation errors.
pub mod error;
/// HTML, Markdown and plain-text output.
pub mod render;
/// Channel lanes and collapsing.
pub mod segment;
/// Style cascade and per-surface resolution.
pub mod style;
/// Filter, search and pagination state.
pub mod view;
/// Load lifecycle and session ownership.
pub mod viewer;

/// Re-export classification entry points.
pub use classify::{ResultCategory, RollOutcome, classify, roll_outcome};
/// Re-export configuration.
pub use config::{SystemChannelScan, ViewerConfig};
/// Re-export error types.
pub use error::{ViewError, ViewResult};
/// Re-export segmentation.
pub use segment::{ChannelGroup, channel_groups, is_non_main_channel};
/// Re-export style types.
pub use style::{Background, Style, StyleResolver};
/// Re-export view state.
pub use view::{DateRange, ViewMode, ViewState};
/// Re-export the viewer controller.
pub use viewer::{LoadStatus, LoadTicket, Viewer};
