//! Reduces raw request failures to a single classified error.
//!
//! Signals are consulted in a fixed order and the first one that applies wins:
//!
//! 1. reachability: an unreachable network always yields `ConnectionLost`
//! 2. response status: 401, 403, 404 and 5xx map to their dedicated kinds
//! 3. failures that are already classified pass through unchanged
//! 4. anything else becomes `Unknown`

use crate::error::{ClassifiedError, RequestFailure};
use crate::traits::ErrorClassifier;

/// Default implementation of the error classifier
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifierImpl;

impl ErrorClassifierImpl {
    pub fn new() -> Self {
        Self
    }

    /// Map a status code to its dedicated kind, if it has one
    pub fn classify_status(status: u16) -> Option<ClassifiedError> {
        match status {
            401 => Some(ClassifiedError::Unauthorized),
            403 => Some(ClassifiedError::Forbidden),
            404 => Some(ClassifiedError::NotFound),
            500..=599 => Some(ClassifiedError::ServerError),
            _ => None,
        }
    }
}

impl ErrorClassifier for ErrorClassifierImpl {
    fn classify(
        &self,
        failure: RequestFailure,
        status: Option<u16>,
        is_reachable: bool,
    ) -> ClassifiedError {
        if !is_reachable {
            return ClassifiedError::ConnectionLost;
        }

        if let Some(classified) = status.and_then(Self::classify_status) {
            return classified;
        }

        if let Some(recognized) = failure.recognized() {
            return recognized;
        }

        ClassifiedError::Unknown {
            source: failure.into_cause(),
        }
    }
}
