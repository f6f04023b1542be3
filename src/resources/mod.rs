//! Resource storage
//!
//! The render graph only tracks handles. This module is the other side of
//! that boundary: a container that issues the handles and a manager that
//! enforces the access each pass declared.

mod container;
mod manager;

pub use container::*;
pub use manager::*;
