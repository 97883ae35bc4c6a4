use thiserror::Error;

/// Errors that can occur while converting a wire-format specification into a `FormSpec`.
#[derive(Error, Debug, Clone)]
pub enum SpecError {
    #[error("Failed to parse form specification JSON: {0}")]
    JsonParseError(String),

    #[error("The specification root must be an array of nodes or an object, found {0}")]
    InvalidRoot(String),

    #[error("Invalid field path '{0}': {1}")]
    InvalidPath(String, String),
}

/// Raised by a computed property while it is being resolved.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct PropertyError(pub String);

impl PropertyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that abort a resolution pass.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("Property '{property}' of node '{node}' failed to resolve: {source}")]
    Property {
        node: String,
        property: &'static str,
        #[source]
        source: PropertyError,
    },

    #[error("Control strategy '{strategy}' failed for field '{field}': {message}")]
    Control {
        strategy: String,
        field: String,
        message: String,
    },
}

/// Errors reported by the host's finish handler during submission.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("No finish handler is registered on this form")]
    NoHandler,

    #[error("Submission rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur while loading an `EngineConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid engine config: {0}")]
    Parse(String),
}

/// Errors that can occur when converting a custom screen format into a `FormSpec`.
#[derive(Error, Debug, Clone)]
pub enum SpecConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
