//! Fleet advisor
//!
//! Glue integration to an external chat-completion API for natural-language
//! fleet summaries. The API is a black box consumed over HTTP; credentials
//! and endpoint come from configuration. Failures are structured errors, not
//! panics, so a failed advisor call degrades to an inline error message while
//! the rest of the dashboard data stays usable.

mod client;
mod context;

pub use client::{AdvisorError, ChatMessage, CompletionClient};
pub use context::build_fleet_context;
