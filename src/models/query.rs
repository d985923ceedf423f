use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Rejection reasons for user input at the pipeline boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// The input was empty or contained only whitespace.
    #[error("Query cannot be empty")]
    Empty,
}

/// A user's original request.
///
/// Always non-blank and trimmed, so the pipeline never sees empty input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Creates a query from raw user input.
    ///
    /// # Examples
    ///
    /// ```
    /// use askweb::Query;
    ///
    /// let query = Query::new("  latest rust release ").unwrap();
    /// assert_eq!(query.as_str(), "latest rust release");
    /// assert!(Query::new(" \t ").is_err());
    /// ```
    pub fn new(input: impl AsRef<str>) -> Result<Self, QueryError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The search string the language model derived from a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterpretedQuery(String);

impl InterpretedQuery {
    /// Wraps a model response, returning `None` if it is blank.
    pub fn from_model_output(output: &str) -> Option<Self> {
        let trimmed = output.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterpretedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
