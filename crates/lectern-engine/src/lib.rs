//! Lectern Engine
//!
//! The top-level orchestrator of the reading-enhancement pipeline. The
//! engine adapts an externally-owned, continuously-mutating document
//! tree: it synthesizes a presentation ruleset from reader preferences,
//! hides advertising/popup subtrees as the tree changes, tags the
//! primary content region, and defers off-screen media until first
//! visibility.
//!
//! All collaborators stay behind narrow seams: preference persistence is
//! a [`SettingsStore`], the single style surface is a [`StyleSink`], and
//! tree/region events arrive through explicit entry points on
//! [`Engine`]. Everything runs on the thread delivering the event; no
//! entry point blocks.
//!
//! # Example
//! ```rust,ignore
//! use std::time::Duration;
//! use lectern_engine::{Engine, MemoryStore, StyleBuffer, Viewport};
//!
//! let mut engine = Engine::new(
//!     MemoryStore::new(),
//!     StyleBuffer::new(),
//!     Duration::from_millis(250),
//! )?;
//! engine.attach(&mut tree, &Viewport::new(0.0, 0.0, 1280.0, 720.0));
//! ```

mod debounce;
mod engine;
mod sink;
mod store;

pub use debounce::Debounce;
pub use engine::{Engine, EngineError};
pub use sink::{StyleBuffer, StyleSink};
pub use store::{MemoryStore, SettingsStore, StoreError};

pub use lectern_css::{ContentAlign, ReaderSettings, Ruleset, synthesize};
pub use lectern_dom::{DocumentTree, MutationBatch, NodeId, Rect, Tree};
pub use lectern_lazy::Viewport;
