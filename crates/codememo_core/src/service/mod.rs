//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own transaction boundaries; repositories only run statements.
//! - Keep CLI/embedding layers decoupled from storage details.

pub mod error;
pub mod memo_service;
pub mod note_service;
