//! Core types for the branch analytics assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Chat messages and the append-only transcript
//! - Dashboard snapshot records returned by the analytics backend
//! - The closed set of chat intents
//! - Branch directory (database names to display names)
//! - Session context and its repository
//! - Error types

pub mod error;
pub mod conversation;
pub mod snapshot;
pub mod intent;
pub mod branch;
pub mod session;

pub use error::{Error, Result};
pub use conversation::{ChatMessage, Sender, Transcript, MessageIdGenerator};
pub use snapshot::{DashboardSnapshot, FootfallDay, BranchComparison, RealTimeStats};
pub use intent::Intent;
pub use branch::{BranchDirectory, BranchProfile};
pub use session::{
    SessionContext, CurrentUser, UserRole, SessionRepository,
    InMemorySessionRepository, JsonFileSessionRepository,
};
