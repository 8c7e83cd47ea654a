//! Error types for selection, aggregation and loading.
//!
//! Errors carry a structured [`ErrorContext`] so the HTTP layer and the logs
//! can report which operation and which entity were involved. Data-quality
//! problems found in individual records are not errors: they are reported as
//! [`IntegrityWarning`]s and the record is left out of the affected result.

use std::fmt;

use crate::models::RecordId;

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Structured context for analytics errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "select", "layout")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "airline", "airport", "date_range")
    pub entity: Option<String>,
    /// The offending value if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.entity.is_none()
            && self.entity_id.is_none()
            && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The filter references unknown codes or an impossible range.
    #[error("Invalid filter: {message} {context}")]
    InvalidFilter {
        message: String,
        context: ErrorContext,
    },

    /// Configuration file missing or malformed.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Input file unreadable or structurally wrong.
    #[error("Load error: {message} {context}")]
    Load {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl AnalyticsError {
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn invalid_filter_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InvalidFilter {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn load_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Load {
            message: message.into(),
            context,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, Self::InvalidFilter { .. })
    }

    /// The bare message, without the context suffix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidFilter { message, .. }
            | Self::Configuration { message, .. }
            | Self::Load { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidFilter { context, .. }
            | Self::Configuration { context, .. }
            | Self::Load { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::InvalidFilter { context, .. }
            | Self::Configuration { context, .. }
            | Self::Load { context, .. }
            | Self::Internal { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}

/// A record that violates the cancellation invariants. Logged and excluded,
/// never propagated as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityWarning {
    #[error("record {id}: cancelled flight carries actual departure/arrival times")]
    CancelledWithActualTimes { id: RecordId },

    #[error("record {id}: operated flight has no scheduled departure")]
    MissingScheduledDeparture { id: RecordId },
}

impl IntegrityWarning {
    pub fn record_id(&self) -> RecordId {
        match self {
            Self::CancelledWithActualTimes { id } | Self::MissingScheduledDeparture { id } => *id,
        }
    }
}
