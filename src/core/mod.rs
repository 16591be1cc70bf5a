//! Core skill logic.
//!
//! This module contains:
//! - ShortFilmSkill: The search / featured surface the host calls into

pub mod skill;

// Re-export commonly used types
pub use skill::{sync_manager_for, ShortFilmSkill, SUPPORTED_MEDIA};
