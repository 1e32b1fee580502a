//! Pooled storage for transient simulation objects and the memory sweep.

mod object_pool;
mod pools;
mod sweep;

pub use object_pool::*;
pub use pools::*;
pub use sweep::*;
