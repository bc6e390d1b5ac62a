//! Shared building blocks: constants, the lock helper, sort directions,
//! naming conventions and the operation context.

mod constants;
mod context;
mod lock;
mod naming;
mod sort_order;

pub use constants::*;
pub use context::*;
pub use lock::*;
pub use naming::*;
pub use sort_order::*;
