//! # Delivery outcomes.
//!
//! [`DeliveryOutcome`] is the value every delivery attempt resolves to:
//! either the endpoint's response text or a failure description, never
//! both and never neither.

use std::fmt;

use crate::error::DeliveryError;

/// Result of one cloud delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint accepted the scan; carries the response body verbatim.
    Delivered {
        /// Opaque response text.
        response: String,
    },
    /// The attempt failed; carries the error description.
    Failed {
        /// Human-readable failure text.
        error: String,
    },
}

impl DeliveryOutcome {
    /// Creates a success outcome from the endpoint's response text.
    pub fn delivered(response: impl Into<String>) -> Self {
        DeliveryOutcome::Delivered {
            response: response.into(),
        }
    }

    /// Creates a failure outcome from an error description.
    pub fn failed(error: impl Into<String>) -> Self {
        DeliveryOutcome::Failed {
            error: error.into(),
        }
    }

    /// Returns true for successful deliveries.
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    /// Response text on success, failure text otherwise.
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            DeliveryOutcome::Delivered { response } => response,
            DeliveryOutcome::Failed { error } => error,
        }
    }
}

impl From<DeliveryError> for DeliveryOutcome {
    fn from(err: DeliveryError) -> Self {
        DeliveryOutcome::failed(err.to_string())
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered { response } => {
                write!(f, "scan delivered ({response})")
            }
            DeliveryOutcome::Failed { error } => write!(f, "delivery failed ({error})"),
        }
    }
}
