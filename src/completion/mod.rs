//! Completion gateway
//!
//! Talks to (or, in demo mode, stands in for) the hosted chat model.

pub mod gateway;
pub mod openai;
pub mod results;

pub use gateway::{CompletionGateway, demo_reply};
pub use openai::OpenAiClient;
pub use results::CompletionResult;
