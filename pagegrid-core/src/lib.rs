//! # PageGrid Core
//!
//! Section-tiling engine for a visual page editor.
//! Compiles to WASM for use from the browser front-end.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              pagegrid-core.wasm             │
//! ├─────────────────────────────────────────────┤
//! │  Editor (controller)  │  History            │
//! │  - Input events       │  - past/present/    │
//! │  - Selection, hover   │    future snapshots │
//! │  - Merge/pan drags    │  - Undo/redo        │
//! ├─────────────────────────────────────────────┤
//! │  Geometry Engine      │  Layout / Sections  │
//! │  - Split              │  - Tiling invariant │
//! │  - Delete + reclaim   │  - Hit-testing      │
//! │  - Merge              │  - Content variants │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod section;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EditorConfig;
pub use editor::{Editor, Guideline, Outcome, PanDrag, Phase};
pub use error::{EditorError, EditorResult};
pub use event::{InputEvent, KeyModifiers};
pub use geometry::{MergePolicy, Orientation};
pub use history::History;
pub use layout::Layout;
pub use section::{
    Content, ContentKind, Framing, FramingUpdate, Point, Rect, Section, SectionId,
};

/// Core engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
