//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate scheduler calls and snapshot persistence into the two
//!   user-facing reconciliation operations.
//! - Keep UI layers decoupled from scheduler and storage details.

pub mod chime_service;
