//! Entity resolution for free-text references to backlog items.
//!
//! # Responsibility
//! - Score and rank backlog candidates for a user utterance.
//! - Leave "no match" handling to the caller (ask again or create new).

pub mod fuzzy;
