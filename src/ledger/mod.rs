//! Household ledger: expense and template management plus orchestration

pub mod expense;
pub mod household;
pub mod template;

pub use expense::*;
pub use household::*;
pub use template::*;
