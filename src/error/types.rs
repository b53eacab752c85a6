//! Error types
//!
//! Defines domain-specific error types for each module of the chat server.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Catalog loading errors (fatal at startup)
#[derive(Debug)]
pub enum CatalogError {
    Io(PathBuf, io::Error),
    Parse(PathBuf, serde_json::Error),
    InvalidProduct(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(path, e) => {
                write!(f, "Cannot read catalog {}: {}", path.display(), e)
            }
            CatalogError::Parse(path, e) => {
                write!(f, "Malformed catalog {}: {}", path.display(), e)
            }
            CatalogError::InvalidProduct(msg) => write!(f, "Invalid product: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Admission guard rejections
#[derive(Debug)]
pub enum AdmissionError {
    ForbiddenOrigin(String),
    RateLimited(String),
}

impl fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdmissionError::ForbiddenOrigin(host) => write!(f, "Forbidden origin: {}", host),
            AdmissionError::RateLimited(client) => write!(f, "Rate limited: {}", client),
        }
    }
}

impl std::error::Error for AdmissionError {}

/// Chat request validation errors
#[derive(Debug)]
pub enum RequestError {
    EmptyMessage,
    MalformedBody(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::EmptyMessage => write!(f, "Empty message"),
            RequestError::MalformedBody(e) => write!(f, "Malformed body: {}", e),
        }
    }
}

impl std::error::Error for RequestError {}

/// Chat-completion upstream errors
///
/// These never leave the completion gateway as HTTP errors; the handler turns
/// them into an in-band apology.
#[derive(Debug)]
pub enum CompletionError {
    ClientSetup(String),
    Transport(String),
    Status { code: u16, body: String },
    MalformedResponse(String),
    EmptyReply,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::ClientSetup(e) => write!(f, "HTTP client setup failed: {}", e),
            CompletionError::Transport(e) => write!(f, "request failed: {}", e),
            CompletionError::Status { code, body } => {
                write!(f, "upstream returned {}: {}", code, body)
            }
            CompletionError::MalformedResponse(e) => write!(f, "malformed response: {}", e),
            CompletionError::EmptyReply => write!(f, "response contained no reply"),
        }
    }
}

impl std::error::Error for CompletionError {}

/// Configuration errors (fatal at startup)
#[derive(Debug)]
pub enum ConfigurationError {
    Load(String),
    Invalid(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::Load(e) => write!(f, "Failed to load configuration: {}", e),
            ConfigurationError::Invalid(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// General chat server error that encompasses all error types
#[derive(Debug)]
pub enum ChatServerError {
    Catalog(CatalogError),
    Admission(AdmissionError),
    Request(RequestError),
    Completion(CompletionError),
    Configuration(ConfigurationError),
    IoError(io::Error),
}

impl fmt::Display for ChatServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatServerError::Catalog(e) => write!(f, "Catalog error: {}", e),
            ChatServerError::Admission(e) => write!(f, "Admission error: {}", e),
            ChatServerError::Request(e) => write!(f, "Request error: {}", e),
            ChatServerError::Completion(e) => write!(f, "Completion error: {}", e),
            ChatServerError::Configuration(e) => write!(f, "Configuration error: {}", e),
            ChatServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ChatServerError {}

impl From<CatalogError> for ChatServerError {
    fn from(error: CatalogError) -> Self {
        ChatServerError::Catalog(error)
    }
}

impl From<AdmissionError> for ChatServerError {
    fn from(error: AdmissionError) -> Self {
        ChatServerError::Admission(error)
    }
}

impl From<RequestError> for ChatServerError {
    fn from(error: RequestError) -> Self {
        ChatServerError::Request(error)
    }
}

impl From<CompletionError> for ChatServerError {
    fn from(error: CompletionError) -> Self {
        ChatServerError::Completion(error)
    }
}

impl From<ConfigurationError> for ChatServerError {
    fn from(error: ConfigurationError) -> Self {
        ChatServerError::Configuration(error)
    }
}

impl From<io::Error> for ChatServerError {
    fn from(error: io::Error) -> Self {
        ChatServerError::IoError(error)
    }
}
