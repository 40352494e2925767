pub mod source;
pub mod traits;

pub use common_framework::{LineCache, Position, Slice};
pub use source::StrSource;
pub use traits::ParseSource;
