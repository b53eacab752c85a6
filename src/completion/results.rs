//! Completion result types
//!
//! Defines the outcome returned by the completion gateway.

/// Outcome of one completion request
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    Success(String),
    Failure(String),
}

impl CompletionResult {
    /// Text shown to the user. Failures become an in-band apology so the chat
    /// widget always has something to display.
    pub fn into_reply(self) -> String {
        match self {
            CompletionResult::Success(text) => text,
            CompletionResult::Failure(reason) => apology(&reason),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionResult::Success(_))
    }
}

pub fn apology(reason: &str) -> String {
    format!(
        "Sorry, I couldn't reach the shop assistant right now ({}). Please try again in a moment.",
        reason
    )
}
