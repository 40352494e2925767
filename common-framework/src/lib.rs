//! Common Framework
//!
//! Position and text types shared by the source adapter and the PEG engine.

pub mod line_cache;
pub mod position;
pub mod slice;

pub use line_cache::LineCache;
pub use position::Position;
pub use slice::Slice;
