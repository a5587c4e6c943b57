//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "nbexport.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing nbexport configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your languages and variants", self.output);
                println!("  2. Validate configuration: nbexport validate-config");
                println!("  3. Run export: nbexport export --lab-subdir <LAB_DIR>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# nbexport Configuration File

[application]
log_level = "info"
dry_run = false

[export]
output_dir = "DRIVE_MATERIAL"
embed_images = true
parallel_documents = 4

[tags]
languages = ["en", "sk"]

[[variants]]
label = "STUDENTS_SK"
audience = "student"
language = "sk"

[[variants]]
label = "STUDENTS_EN"
audience = "student"
language = "en"

[[variants]]
label = "TEACHERS_EN"
audience = "teacher"
language = "en"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# nbexport Configuration File
# Projects tagged development notebooks into per-audience, per-language
# course notebooks.
#
# Values may reference environment variables as ${VAR}. Any setting can
# also be overridden with NBEXPORT_<SECTION>_<KEY>, for example
# NBEXPORT_EXPORT_OUTPUT_DIR=/srv/material.

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# Project every notebook but write nothing
dry_run = false

[export]
# Outputs land in <output_dir>/<variant label>/<lab subdir>/<notebook>
output_dir = "DRIVE_MATERIAL"

# Inline images referenced from markdown cells (![alt](img.png) becomes a
# cell attachment, <img src="img.png"> becomes a data URI)
embed_images = true

# Number of notebooks processed concurrently (1-64)
parallel_documents = 4

[tags]
# Language tags a cell may carry, in addition to the reserved tags
# drop, keep, student and teacher
languages = ["en", "sk"]

# One [[variants]] table per output notebook set, exported in this order.
# audience: "student" (teacher-only cells removed, outputs cleared)
#           "teacher" (student-only cells removed, outputs kept)
# language: one of tags.languages
[[variants]]
label = "STUDENTS_SK"
audience = "student"
language = "sk"

[[variants]]
label = "STUDENTS_EN"
audience = "student"
language = "en"

[[variants]]
label = "TEACHERS_EN"
audience = "teacher"
language = "en"

# [[variants]]
# label = "TEACHERS_SK"
# audience = "teacher"
# language = "sk"

[logging]
# Also write JSON logs to local_path
local_enabled = false
local_path = "logs"

# Rotation: daily, hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "nbexport.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "nbexport.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let content = InitArgs::generate_minimal_config();
        assert!(content.contains("[application]"));
        assert!(content.contains("[[variants]]"));

        let config = parse_config(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.variants.len(), 3);
    }

    #[test]
    fn test_generate_config_with_examples() {
        let content = InitArgs::generate_config_with_examples();
        assert!(content.contains("# nbexport Configuration File"));
        assert!(content.contains("parallel_documents"));

        let config = parse_config(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.tags.languages, vec!["en", "sk"]);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nbexport.toml");
        std::fs::write(&path, "# mine").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[[variants]]"));
    }
}
