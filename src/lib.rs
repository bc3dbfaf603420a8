//! NDA Approval - Document intake and chat-based approval workflow
//!
//! Uploaded NDAs and contracts are reduced to text, sent to an external
//! analysis service, and either approved automatically or routed to a
//! Telegram chat where approvers decide with inline buttons.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
