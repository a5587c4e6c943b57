//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - human-readable console output on stderr
//! - optional JSON log files with daily or hourly rotation
//! - level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use nbexport::logging::init_logging;
//! use nbexport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(document = "intro.ipynb", "Exporting");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of processing for one development document
///
/// # Example
///
/// ```no_run
/// use nbexport::log_document_start;
///
/// log_document_start!("01_intro.ipynb", 3);
/// ```
#[macro_export]
macro_rules! log_document_start {
    ($document:expr, $variants:expr) => {
        tracing::info!(
            document = %$document,
            variants = $variants,
            "Exporting document"
        );
    };
}

/// Log one written output notebook
///
/// # Example
///
/// ```no_run
/// use nbexport::log_variant_written;
///
/// log_variant_written!("01_intro.ipynb", "STUDENTS_EN", "DRIVE_MATERIAL/STUDENTS_EN/lab1/01_intro.ipynb");
/// ```
#[macro_export]
macro_rules! log_variant_written {
    ($document:expr, $label:expr, $location:expr) => {
        tracing::debug!(
            document = %$document,
            variant = %$label,
            location = %$location,
            "Wrote output notebook"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use nbexport::log_error_with_context;
/// use nbexport::domain::NbExportError;
///
/// let error = NbExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::NbExportError;

    #[test]
    fn test_macros_expand() {
        let error = NbExportError::Configuration("bad".to_string());
        crate::log_document_start!("a.ipynb", 3);
        crate::log_variant_written!("a.ipynb", "STUDENTS_EN", "out/a.ipynb");
        crate::log_error_with_context!(&error, "loading");
    }
}
