//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use nbexport::config::{load_config, load_config_or_default};
use nbexport::domain::Audience;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("NBEXPORT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("NBEXPORT_APPLICATION_DRY_RUN");
    std::env::remove_var("NBEXPORT_EXPORT_OUTPUT_DIR");
    std::env::remove_var("NBEXPORT_EXPORT_EMBED_IMAGES");
    std::env::remove_var("NBEXPORT_EXPORT_PARALLEL_DOCUMENTS");
    std::env::remove_var("TEST_NBEXPORT_MATERIAL_DIR");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[export]
output_dir = "PUBLISHED"
embed_images = false
parallel_documents = 8

[tags]
languages = ["en", "sk", "de"]

[[variants]]
label = "STUDENTS_DE"
audience = "student"
language = "de"

[[variants]]
label = "TEACHERS_SK"
audience = "teacher"
language = "sk"

[logging]
local_enabled = true
local_path = "/tmp/nbexport-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.export.output_dir, "PUBLISHED");
    assert!(!config.export.embed_images);
    assert_eq!(config.export.parallel_documents, 8);
    assert_eq!(config.tags.languages, vec!["en", "sk", "de"]);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    let matrix = config.version_matrix().unwrap();
    assert_eq!(matrix.len(), 2);
    assert_eq!(matrix.variants()[0].label.as_str(), "STUDENTS_DE");
    assert_eq!(matrix.variants()[1].audience, Audience::Teacher);
}

#[test]
fn test_missing_sections_use_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[application]\nlog_level = \"warn\"\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.export.output_dir, "DRIVE_MATERIAL");
    assert!(config.export.embed_images);
    let labels: Vec<String> = config
        .version_matrix()
        .unwrap()
        .variants()
        .iter()
        .map(|v| v.label.to_string())
        .collect();
    assert_eq!(labels, vec!["STUDENTS_SK", "STUDENTS_EN", "TEACHERS_EN"]);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_NBEXPORT_MATERIAL_DIR", "/srv/material");

    let file = write_config(
        "# output_dir = \"${UNSET_IN_COMMENT}\"\n[export]\noutput_dir = \"${TEST_NBEXPORT_MATERIAL_DIR}\"\n",
    );
    let config = load_config(file.path());
    cleanup_env_vars();

    assert_eq!(config.unwrap().export.output_dir, "/srv/material");
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("NBEXPORT_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("NBEXPORT_EXPORT_OUTPUT_DIR", "OVERRIDDEN");
    std::env::set_var("NBEXPORT_EXPORT_EMBED_IMAGES", "false");
    std::env::set_var("NBEXPORT_EXPORT_PARALLEL_DOCUMENTS", "2");

    let file = write_config("[export]\noutput_dir = \"FROM_FILE\"\n");
    let config = load_config(file.path());
    cleanup_env_vars();

    let config = config.unwrap();
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.export.output_dir, "OVERRIDDEN");
    assert!(!config.export.embed_images);
    assert_eq!(config.export.parallel_documents, 2);
}

#[test]
fn test_invalid_env_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("NBEXPORT_EXPORT_PARALLEL_DOCUMENTS", "many");

    let result = load_config_or_default("does-not-exist.toml");
    cleanup_env_vars();

    assert!(result.is_err());
}

#[test]
fn test_missing_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    assert!(load_config("does-not-exist.toml").is_err());
    let config = load_config_or_default("does-not-exist.toml").unwrap();
    assert_eq!(config.variants.len(), 3);
}

#[test]
fn test_invalid_configs_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"loud\"\n",
        "[export]\nparallel_documents = 0\n",
        "[tags]\nlanguages = []\n",
        "[[variants]]\nlabel = \"X\"\naudience = \"parent\"\nlanguage = \"en\"\n",
        "[[variants]]\nlabel = \"X\"\naudience = \"student\"\nlanguage = \"fr\"\n",
        "[[variants]]\nlabel = \"X\"\naudience = \"student\"\nlanguage = \"en\"\n\n[[variants]]\nlabel = \"X\"\naudience = \"teacher\"\nlanguage = \"en\"\n",
        "this is not toml",
    ];

    for content in cases {
        let file = write_config(content);
        assert!(load_config(file.path()).is_err(), "accepted: {content}");
    }
}
