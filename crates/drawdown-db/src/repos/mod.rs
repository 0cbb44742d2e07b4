//! Repository modules implementing CRUD operations for Drawdown entities.
//!
//! Each module adds methods to `DrawdownService` via `impl DrawdownService` blocks.

pub mod audit;
pub mod request;
pub mod user;
