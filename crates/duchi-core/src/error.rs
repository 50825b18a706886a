//! Error types for duchi
//!
//! Malformed colors, corrupted theme lists and unknown theme ids are
//! degraded state, not errors, and never show up here. These variants cover
//! the remaining faults: storage backends that refuse a write, configuration
//! files that cannot be read, and logging setup.

use std::collections::HashMap;
use thiserror::Error;

/// Context information for errors to aid in debugging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Operation that was being performed when the error occurred
    pub operation: String,
    /// Component or module where the error occurred
    pub component: String,
    /// Additional contextual data
    pub metadata: HashMap<String, String>,
    /// Call path if available
    pub call_path: Option<String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            component: component.into(),
            metadata: HashMap::new(),
            call_path: None,
        }
    }

    /// Add metadata to the context
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Add call path information
    pub fn with_call_path(mut self, path: impl Into<String>) -> Self {
        self.call_path = Some(path.into());
        self
    }

    /// Format context for logging
    pub fn format_for_log(&self) -> String {
        let mut parts = vec![
            format!("operation={}", self.operation),
            format!("component={}", self.component),
        ];

        if !self.metadata.is_empty() {
            let mut entries: Vec<_> = self.metadata.iter().collect();
            entries.sort();
            let metadata_str = entries
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("metadata=[{}]", metadata_str));
        }

        if let Some(ref path) = self.call_path {
            parts.push(format!("call_path={}", path));
        }

        parts.join(", ")
    }
}

/// Main error type for duchi operations
#[derive(Debug, Error)]
pub enum DuchiError {
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Initialization error: {message}")]
    Initialization {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DuchiError {
    /// Create a storage error with context
    pub fn storage_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::Storage {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create a configuration error with context
    pub fn configuration_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::Configuration {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create an initialization error with context
    pub fn initialization_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::Initialization {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create a storage error from a string
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage {
            message: msg.into(),
            context: None,
        }
    }

    /// Create an initialization error from a string
    pub fn initialization<S: Into<String>>(msg: S) -> Self {
        Self::Initialization {
            message: msg.into(),
            context: None,
        }
    }

    /// Get the error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Storage { context, .. }
            | Self::Configuration { context, .. }
            | Self::Initialization { context, .. } => context.as_ref(),
            Self::Io(_) | Self::Serialization(_) => None,
        }
    }

    /// Format error with context for logging
    pub fn format_for_log(&self) -> String {
        let base_msg = self.to_string();
        if let Some(context) = self.context() {
            format!("{} [{}]", base_msg, context.format_for_log())
        } else {
            base_msg
        }
    }
}

/// Result type alias for duchi operations
pub type Result<T> = std::result::Result<T, DuchiError>;
