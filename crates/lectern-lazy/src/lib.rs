//! Lectern Lazy
//!
//! Defers loading of off-screen media: at initialization every media
//! node outside the visible region is swapped to a cheap placeholder,
//! and the first time a node enters the region its real source is
//! restored and the watch is dropped. Also strips media autoplay during
//! the initial pass.

mod loader;
mod media;
mod viewport;

pub use loader::{PLACEHOLDER_SRC, ViewportLoader};
pub use media::suppress_autoplay;
pub use viewport::Viewport;
