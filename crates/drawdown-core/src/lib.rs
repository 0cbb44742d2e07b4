//! # drawdown-core
//!
//! Core types shared across all Drawdown crates.
//!
//! This crate provides:
//! - Entity structs for withdrawal requests, user profiles, and audit entries
//! - Status enums, including the withdrawal stage machine
//! - ID prefix constants
//! - The `WorkflowStore` storage contract and its error type
//! - Update payloads used by the store and the workflow engine
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod store;
pub mod updates;
