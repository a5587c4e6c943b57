//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the nbexport configuration file.

use crate::config::load_config_or_default;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        if Path::new(config_path).exists() {
            println!("🔍 Validating configuration file: {config_path}");
        } else {
            println!("🔍 {config_path} not found, validating built-in defaults");
        }
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let matrix = match config.version_matrix() {
            Ok(m) => m,
            Err(e) => {
                println!("❌ Variant configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Embed Images: {}", config.export.embed_images);
        println!("  Parallel Documents: {}", config.export.parallel_documents);
        println!("  Languages: {}", config.tags.languages.join(", "));
        println!("  Variants:");
        for variant in matrix.variants() {
            println!("    - {variant}");
        }
        println!();
        Ok(0)
    }
}
