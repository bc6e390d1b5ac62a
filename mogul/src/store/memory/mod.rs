mod compare;
mod matcher;
mod store;
mod updater;

pub use store::*;
