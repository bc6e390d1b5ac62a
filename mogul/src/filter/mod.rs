//! Filter expressions built by chaining predicates.
//!
//! A [`Condition`] accumulates `(key, value)` entries in call order. Leaf
//! predicates wrap their operand under an operator key (`{age: {$gt: 18}}`),
//! composers embed a previously built condition as an ordered array of
//! single-entry documents (`{$or: [{a: 1}, {b: 2}]}`).
//!
//! Construction failures (a malformed identifier, a failed sub-condition,
//! an unusable `filter_by` source) do not break the chain. The first one is
//! latched and returned by every later [`Condition::filters`] call; entries
//! appended after it are still recorded.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mogul::filter::{Condition, Predicates};
//!
//! let condition = Condition::new()
//!     .eq("status", "active")
//!     .gt("age", 18)
//!     .or(Condition::new().eq("role", "admin").eq("role", "owner"));
//!
//! let expression = condition.filters()?;
//! // {status: "active", age: {$gt: 18}, $or: [{role: "admin"}, {role: "owner"}]}
//! let filter = expression.to_document();
//! ```

mod condition;
mod identifier;
mod predicates;
mod source;

pub use condition::*;
pub use identifier::*;
pub use predicates::*;
pub use source::*;
