//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and postal lookup calls into use-case level APIs.
//! - Keep callers (CLI, future HTTP layer) decoupled from storage details.

pub mod employee_service;
