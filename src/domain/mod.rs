//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `document` - Format detection, text normalization, PDF scan, classifier
//! - `verdict` - Analysis verdict and status normalization
//! - `approval` - Application aggregate, lifecycle and auto-approval policy
//! - `notification` - MarkdownV2 message composition

pub mod approval;
pub mod document;
pub mod foundation;
pub mod notification;
pub mod verdict;
