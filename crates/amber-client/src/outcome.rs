//! The data-or-error result every API operation returns

use crate::{ClientError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Result of one API call: either the decoded data or an error, never both.
///
/// Unlike a bare `Result`, an `Outcome` is the normal return value of every
/// operation, failures included. Use [`Outcome::into_result`] to switch to
/// `?`-style propagation.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    /// The call succeeded and the body decoded as `T`
    Data(T),
    /// The call failed
    Error(ClientError),
}

impl<T> Outcome<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Borrow the data, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    /// Take the data, if any
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    /// Borrow the error, if any
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Data(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    /// The diagnostic string of a failed call
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ClientError::message)
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Data(data) => Ok(data),
            Self::Error(err) => Err(err),
        }
    }

    /// Transform the data, leaving an error untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Data(data) => Outcome::Data(f(data)),
            Self::Error(err) => Outcome::Error(err),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::Data(data),
            Err(err) => Self::Error(err),
        }
    }
}

/// Serializes as `{"data": ...}` or `{"error": "..."}`.
impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Data(data) => map.serialize_entry("data", data)?,
            Self::Error(err) => map.serialize_entry("error", &err.message())?,
        }
        map.end()
    }
}
