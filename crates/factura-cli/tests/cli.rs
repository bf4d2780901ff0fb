//! End-to-end tests for the `factura` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVOICE: &str = "FERRETERÍA LÓPEZ S.L.\n\
                       CIF: B12345678\n\
                       Factura #F2024-0042\n\
                       Fecha: 05/03/24\n\
                       C/ Mayor 12, 28013, Madrid\n\
                       IVA (21%): 210,00 €\n\
                       TOTAL: 1.210,00 €\n";

/// Runs the binary with its config directory pointed inside `dir`.
fn factura(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("factura").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config-home"))
        .env("HOME", dir)
        .env_remove("RUST_LOG");
    cmd
}

fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("factura.txt");
    fs::write(&input, INVOICE).unwrap();
    (dir, input)
}

fn stored(path: &Path) -> Vec<serde_json::Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn parse_appends_to_store() {
    let (dir, input) = setup();
    let store = dir.path().join("datos.json");

    factura(dir.path())
        .arg("parse")
        .arg(&input)
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"NumeroFactura\": \"F2024-0042\""))
        .stdout(predicate::str::contains("\"Total\": 1210.00"));

    factura(dir.path())
        .args(["parse", "-", "--store"])
        .arg(&store)
        .write_stdin("Número de factura: A-17\nIVA 8,40 €")
        .assert()
        .success();

    let values = stored(&store);
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["Fecha"], "05/03/2024");
    assert_eq!(values[0]["CP_Ciudad"][0], "28013, Madrid");
    assert_eq!(values[1]["NumeroFactura"], "A-17");
    assert_eq!(values[1]["IVA_Porcentaje"], serde_json::Value::Null);
}

#[test]
fn parse_uses_default_store_in_working_directory() {
    let (dir, input) = setup();

    factura(dir.path()).arg("parse").arg(&input).assert().success();

    assert_eq!(stored(&dir.path().join("datos_extraidos.json")).len(), 1);
}

#[test]
fn dry_run_does_not_write() {
    let (dir, input) = setup();
    let store = dir.path().join("datos.json");

    factura(dir.path())
        .arg("parse")
        .arg(&input)
        .arg("--store")
        .arg(&store)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"CIF\": \"B12345678\""));

    assert!(!store.exists());
}

#[test]
fn explain_reports_patterns() {
    let (dir, input) = setup();

    factura(dir.path())
        .args(["parse", "--dry-run", "--explain"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("IVA <- pattern 0"))
        .stderr(predicate::str::contains("NIF not found"));
}

#[test]
fn list_prints_saved_records() {
    let (dir, input) = setup();
    let store = dir.path().join("datos.json");

    for _ in 0..2 {
        factura(dir.path())
            .arg("parse")
            .arg(&input)
            .arg("--store")
            .arg(&store)
            .assert()
            .success();
    }

    let output = factura(dir.path())
        .args(["list", "--format", "csv", "--store"])
        .arg(&store)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Fecha,NumeroFactura"));
    assert!(lines[1].starts_with("05/03/2024,F2024-0042,"));
}

#[test]
fn list_empty_store() {
    let dir = tempfile::tempdir().unwrap();

    factura(dir.path())
        .args(["list", "--store", "nada.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No records"));
}

#[test]
fn process_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    factura(dir.path())
        .args(["process", "no-such-invoice.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_reports_missing_tesseract() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("factura.png");
    fs::write(&image, include_bytes!("fixtures/blank.png")).unwrap();

    factura(dir.path())
        .args(["process", "--backend", "tesseract", "--tesseract-path", "/nonexistent/tesseract"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/tesseract"));

    assert!(!dir.path().join("datos_extraidos.json").exists());
}

#[cfg(unix)]
#[test]
fn process_with_configured_tesseract() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("factura.png");
    fs::write(&image, include_bytes!("fixtures/blank.png")).unwrap();

    let script = dir.path().join("fake-tesseract");
    fs::write(&script, format!("#!/bin/sh\ncat <<'TXT'\n{}TXT\n", INVOICE)).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let config = dir.path().join("config.json");
    fs::write(
        &config,
        serde_json::json!({ "ocr": { "tesseract_path": script } }).to_string(),
    )
    .unwrap();

    factura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["process", "--show-text", "--format", "text"])
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted text:"))
        .stdout(predicate::str::contains("NumeroFactura   F2024-0042"));

    let values = stored(&dir.path().join("datos_extraidos.json"));
    assert_eq!(values.len(), 1);
    assert_eq!(values[0]["CIF"], "B12345678");

    factura(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("text")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL: 1.210,00 €"));
}

#[test]
fn config_commands_use_given_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("conf").join("factura.json");

    factura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    factura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "ocr.tesseract_path", "/opt/tesseract/bin/tesseract"])
        .assert()
        .success();

    factura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "ocr.tesseract_path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/opt/tesseract/bin/tesseract"));

    factura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "ocr.nonexistent", "1"])
        .assert()
        .failure();

    factura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
