pub mod stream;
pub mod work;

pub use stream::Stream;
pub use work::{Work, WorkFn};
