//! Split resolution and settlement computation
//!
//! Both are pure functions of `(expenses, profiles)` with no internal state,
//! so they are safe to call from any number of readers at once.

pub mod engine;
pub mod split;

pub use engine::*;
pub use split::*;
