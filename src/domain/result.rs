//! Result type alias for nbexport

use super::errors::NbExportError;

/// Result type alias for nbexport operations
///
/// # Examples
///
/// ```
/// use nbexport::domain::result::Result;
/// use nbexport::domain::errors::NbExportError;
///
/// fn failing_function() -> Result<()> {
///     Err(NbExportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, NbExportError>;
