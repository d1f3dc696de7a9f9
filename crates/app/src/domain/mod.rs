//! Benchmark Domain Concerns

pub mod money;
pub mod orders;
pub mod pagination;
pub mod users;
pub mod validation;
