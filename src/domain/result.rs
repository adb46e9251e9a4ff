//! Result type alias for Scribe

use super::errors::ScribeError;

/// Result type alias for Scribe operations
///
/// # Examples
///
/// ```
/// use scribe::domain::result::Result;
/// use scribe::domain::errors::ScribeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ScribeError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScribeError>;
