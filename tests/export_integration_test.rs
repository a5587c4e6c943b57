//! End-to-end export tests against a real lab directory
//!
//! Each test builds a lab in a temporary directory, runs the coordinator
//! and inspects `<output_dir>/<label>/<lab>/` afterwards.

use nbexport::config::NbExportConfig;
use nbexport::core::export::{ExportCoordinator, FailureKind};
use nbexport::domain::{Cell, Notebook};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

struct Lab {
    _root: TempDir,
    lab_dir: PathBuf,
    output_dir: PathBuf,
}

impl Lab {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let lab_dir = root.path().join("L1_python_intro");
        let output_dir = root.path().join("DRIVE_MATERIAL");
        fs::create_dir_all(lab_dir.join("img")).unwrap();
        Self {
            _root: root,
            lab_dir,
            output_dir,
        }
    }

    fn add_notebook(&self, name: &str, notebook: &Notebook) {
        fs::write(self.lab_dir.join(name), notebook.to_ipynb_bytes().unwrap()).unwrap();
    }

    fn add_file(&self, relative: &str, bytes: &[u8]) {
        fs::write(self.lab_dir.join(relative), bytes).unwrap();
    }

    fn config(&self) -> NbExportConfig {
        let mut config = NbExportConfig::default();
        config.export.output_dir = self.output_dir.to_string_lossy().into_owned();
        config
    }

    fn output(&self, label: &str, name: &str) -> PathBuf {
        self.output_dir.join(label).join("L1_python_intro").join(name)
    }
}

fn coordinator(lab: &Lab, config: &NbExportConfig) -> ExportCoordinator {
    let matrix = config.version_matrix().unwrap();
    ExportCoordinator::from_config(config, matrix, &lab.lab_dir).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

fn lesson() -> Notebook {
    Notebook::builder()
        .cell(Cell::markdown("# Loops\n\n![loop](img/loop.png)"))
        .cell(Cell::markdown("Cykly").with_tags(["sk"]))
        .cell(Cell::markdown("Loops").with_tags(["en"]))
        .cell(
            Cell::code("print(sum(range(10)))")
                .with_tags(["teacher"])
                .with_outputs(
                    vec![json!({"output_type": "stream", "name": "stdout", "text": ["45\n"]})],
                    Some(3),
                ),
        )
        .cell(Cell::code("x = 1").with_outputs(
            vec![json!({"output_type": "stream", "name": "stdout", "text": ["1\n"]})],
            Some(4),
        ))
        .build()
}

#[tokio::test]
async fn test_export_writes_every_variant() {
    let lab = Lab::new();
    lab.add_file("img/loop.png", PNG);
    lab.add_notebook("01_loops.ipynb", &lesson());

    let summary = coordinator(&lab, &lab.config())
        .execute_export()
        .await
        .unwrap();

    assert!(summary.is_successful());
    assert_eq!(summary.documents_total, 1);
    assert_eq!(summary.outputs_written, 3);

    let student_sk = read_json(&lab.output("STUDENTS_SK", "01_loops.ipynb"));
    let cells = student_sk["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[1]["source"], "Cykly");
    assert_eq!(cells[2]["outputs"], json!([]));
    assert_eq!(cells[2]["execution_count"], Value::Null);

    // the image became an attachment of the first markdown cell
    let first = &cells[0];
    assert!(first["source"]
        .as_str()
        .unwrap()
        .contains("attachment:loop.png"));
    assert!(first["attachments"]["loop.png"]["image/png"].is_string());

    let teacher_en = read_json(&lab.output("TEACHERS_EN", "01_loops.ipynb"));
    let cells = teacher_en["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 4);
    assert_eq!(cells[1]["source"], "Loops");
    assert_eq!(cells[2]["execution_count"], 3);
    assert_eq!(cells[3]["execution_count"], 4);

    assert!(lab.output("STUDENTS_EN", "01_loops.ipynb").exists());
}

#[tokio::test]
async fn test_missing_image_fails_only_that_notebook() {
    let lab = Lab::new();
    lab.add_notebook(
        "01_broken.ipynb",
        &Notebook::builder()
            .cell(Cell::markdown("![gone](img/gone.png)"))
            .build(),
    );
    lab.add_notebook(
        "02_fine.ipynb",
        &Notebook::builder().cell(Cell::markdown("plain")).build(),
    );

    let summary = coordinator(&lab, &lab.config())
        .execute_export()
        .await
        .unwrap();

    assert!(!summary.is_successful());
    assert_eq!(summary.documents_succeeded, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].document, "01_broken.ipynb");
    assert_eq!(summary.failures[0].kind, FailureKind::MissingAsset);

    for label in ["STUDENTS_SK", "STUDENTS_EN", "TEACHERS_EN"] {
        assert!(!lab.output(label, "01_broken.ipynb").exists());
        assert!(lab.output(label, "02_fine.ipynb").exists());
    }
}

#[tokio::test]
async fn test_no_image_embed_keeps_references() {
    let lab = Lab::new();
    lab.add_notebook(
        "01_refs.ipynb",
        &Notebook::builder()
            .cell(Cell::markdown("![gone](img/gone.png)"))
            .build(),
    );

    let mut config = lab.config();
    config.export.embed_images = false;
    let summary = coordinator(&lab, &config).execute_export().await.unwrap();

    assert!(summary.is_successful());
    let out = read_json(&lab.output("STUDENTS_EN", "01_refs.ipynb"));
    assert_eq!(out["cells"][0]["source"], "![gone](img/gone.png)");
}

#[tokio::test]
async fn test_private_and_non_notebook_files_skipped() {
    let lab = Lab::new();
    lab.add_notebook("_scratch.ipynb", &lesson());
    lab.add_file("notes.md", b"# notes");
    lab.add_file("img/loop.png", PNG);
    lab.add_notebook(
        "01_intro.ipynb",
        &Notebook::builder().cell(Cell::markdown("hi")).build(),
    );

    let summary = coordinator(&lab, &lab.config())
        .execute_export()
        .await
        .unwrap();

    assert_eq!(summary.documents_total, 1);
    assert!(!lab.output("STUDENTS_EN", "_scratch.ipynb").exists());
    assert!(lab.output("STUDENTS_EN", "01_intro.ipynb").exists());
}

#[tokio::test]
async fn test_invalid_notebook_reported() {
    let lab = Lab::new();
    lab.add_file("01_bad.ipynb", b"{ not json");

    let summary = coordinator(&lab, &lab.config())
        .execute_export()
        .await
        .unwrap();

    assert_eq!(summary.documents_failed, 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Notebook);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let lab = Lab::new();
    lab.add_file("img/loop.png", PNG);
    lab.add_notebook("01_loops.ipynb", &lesson());

    let mut config = lab.config();
    config.application.dry_run = true;
    let summary = coordinator(&lab, &config).execute_export().await.unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.outputs_written, 3);
    assert!(summary.outputs.iter().all(|o| o.checksum.len() == 64));
    assert!(!lab.output_dir.exists());
}

#[tokio::test]
async fn test_selected_variants_only() {
    let lab = Lab::new();
    lab.add_notebook(
        "01_intro.ipynb",
        &Notebook::builder().cell(Cell::markdown("hi")).build(),
    );

    let config = lab.config();
    let matrix = config
        .version_matrix()
        .unwrap()
        .select(&["TEACHERS_EN"])
        .unwrap();
    let summary = ExportCoordinator::from_config(&config, matrix, &lab.lab_dir)
        .unwrap()
        .execute_export()
        .await
        .unwrap();

    assert_eq!(summary.outputs_written, 1);
    assert!(lab.output("TEACHERS_EN", "01_intro.ipynb").exists());
    assert!(!lab.output("STUDENTS_EN", "01_intro.ipynb").exists());
}

#[tokio::test]
async fn test_repeated_export_is_byte_identical() {
    let lab = Lab::new();
    lab.add_file("img/loop.png", PNG);
    lab.add_notebook("01_loops.ipynb", &lesson());
    let config = lab.config();

    coordinator(&lab, &config).execute_export().await.unwrap();
    let first = fs::read(lab.output("STUDENTS_EN", "01_loops.ipynb")).unwrap();

    coordinator(&lab, &config).execute_export().await.unwrap();
    let second = fs::read(lab.output("STUDENTS_EN", "01_loops.ipynb")).unwrap();

    assert_eq!(first, second);
}
