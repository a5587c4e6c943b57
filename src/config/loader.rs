//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::NbExportConfig;
use crate::domain::errors::NbExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "nbexport.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into NbExportConfig
/// 4. Applies environment variable overrides (NBEXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`NbExportError::Configuration`] if the file cannot be read or
/// parsed, a referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use nbexport::config::loader::load_config;
///
/// let config = load_config("nbexport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NbExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NbExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        NbExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the built-in defaults
/// (still subject to environment overrides and validation)
///
/// # Errors
///
/// Same as [`load_config`] for a file that exists.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<NbExportConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults"
    );
    let mut config = NbExportConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Parses configuration text: substitution, TOML, overrides, validation
///
/// # Errors
///
/// Returns [`NbExportError::Configuration`] on any failure.
pub fn parse_config(contents: &str) -> Result<NbExportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: NbExportConfig = toml::from_str(&contents)
        .map_err(|e| NbExportError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &NbExportConfig) -> Result<()> {
    config.validate().map_err(|e| {
        NbExportError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

fn env_var_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid"))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_re();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(NbExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using NBEXPORT_* prefix
///
/// Environment variables follow the pattern: NBEXPORT_<SECTION>_<KEY>,
/// for example NBEXPORT_EXPORT_OUTPUT_DIR.
///
/// # Errors
///
/// Returns an error if a numeric override does not parse.
fn apply_env_overrides(config: &mut NbExportConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("NBEXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("NBEXPORT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Export overrides
    if let Ok(val) = std::env::var("NBEXPORT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("NBEXPORT_EXPORT_EMBED_IMAGES") {
        config.export.embed_images = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("NBEXPORT_EXPORT_PARALLEL_DOCUMENTS") {
        config.export.parallel_documents = val.parse().map_err(|_| {
            NbExportError::Configuration(format!(
                "NBEXPORT_EXPORT_PARALLEL_DOCUMENTS must be a number, got '{val}'"
            ))
        })?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("NBEXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("NBEXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
