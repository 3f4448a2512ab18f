// End-to-end tests for the `multas` binary.
// Run with: cargo test -p multas-cli --test cli

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use httpmock::prelude::*;
use multas_core::{QuerySource, ViolationRecord};
use multas_io::xlsx::{read_table, write_table};
use multas_recon::build_report_table;
use serde_json::{json, Value};

fn multas(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_multas"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn multas")
}

fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("settings.toml");
    let body = format!(
        "db_path = {:?}\noutput_dir = {:?}\n{}",
        dir.join("DB-CONSULTA.xlsx"),
        dir.join("consultas"),
        extra
    );
    fs::write(&path, body).unwrap();
    path
}

fn stdout_json(out: &Output) -> Value {
    serde_json::from_slice(&out.stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", String::from_utf8_lossy(&out.stdout)))
}

fn write_plate_report(dir: &Path, name: &str, codes: &[&str]) {
    let records: Vec<ViolationRecord> = codes
        .iter()
        .map(|code| {
            let mut cells = vec![String::new(); 20];
            cells[1] = code.to_string();
            ViolationRecord::new("PBA1234", cells)
        })
        .collect();
    fs::create_dir_all(dir).unwrap();
    write_table(&dir.join(name), &build_report_table(QuerySource::Plate, &records)).unwrap();
}

// ── unify ───────────────────────────────────────────────────────────

#[test]
fn unify_writes_consolidated_report() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "download_prefix = \"/static/consultas\"\n");
    let reports = tmp.path().join("consultas");
    write_plate_report(&reports, "PLA-CON-a.xlsx", &["INF-1", "INF-2"]);
    write_plate_report(&reports, "PLA-CON-b.xlsx", &["INF-2", "INF-3"]);

    let out = multas(&config, &["unify", "--json"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let outcome = stdout_json(&out);
    assert_eq!(outcome["success"], true);
    let path = PathBuf::from(outcome["path"].as_str().unwrap());
    let name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("Consulta_Unificada_"), "{name}");
    assert_eq!(outcome["download_url"], format!("/static/consultas/{name}"));

    let table = read_table(&path).unwrap();
    assert_eq!(table.len(), 3);
}

#[test]
fn unify_empty_directory_exits_4() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "");

    let out = multas(&config, &["unify", "--json"]);
    assert_eq!(out.status.code(), Some(4));
    let outcome = stdout_json(&out);
    assert_eq!(outcome["success"], false);
    assert_eq!(outcome["code"], "EMPTY_INPUT");
    assert!(outcome.get("path").is_none());
}

#[test]
fn unify_missing_directory_without_create_exits_7() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "create_dirs = false\n");

    let out = multas(&config, &["unify"]);
    assert_eq!(out.status.code(), Some(7));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("does not exist"), "{stderr}");
    assert!(stderr.contains("hint:"), "{stderr}");
}

#[test]
fn unify_unreadable_file_exits_6() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let reports = tmp.path().join("consultas");
    write_plate_report(&reports, "PLA-CON-a.xlsx", &["INF-1"]);
    fs::write(reports.join("broken.xlsx"), "garbage").unwrap();

    let out = multas(&config, &["unify", "--json"]);
    assert_eq!(out.status.code(), Some(6));
    assert_eq!(stdout_json(&out)["code"], "UNREADABLE_FILE");
}

#[test]
fn dir_flag_overrides_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let other = tmp.path().join("elsewhere");
    write_plate_report(&other, "PLA-CON-a.xlsx", &["INF-1"]);

    let out = multas(&config, &["unify", "--dir", other.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("1 rows from 1 files"));
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn invalid_settings_exit_8() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "timeout = 3\n");

    let out = multas(&config, &["unify"]);
    assert_eq!(out.status.code(), Some(8));
}

#[test]
fn missing_settings_file_exit_8() {
    let tmp = tempfile::tempdir().unwrap();
    let out = multas(&tmp.path().join("nope.toml"), &["unify"]);
    assert_eq!(out.status.code(), Some(8));
}

// ── db ──────────────────────────────────────────────────────────────

#[test]
fn db_import_rejects_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let csv = tmp.path().join("input.csv");
    fs::write(&csv, "PLACA\n").unwrap();

    let out = multas(&config, &["db", "import", csv.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn db_import_then_check() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let upload = tmp.path().join("upload.xlsx");
    write_input(&upload, &["PBA1234"]);

    let out = multas(&config, &["db", "import", upload.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    assert!(tmp.path().join("DB-CONSULTA.xlsx").is_file());

    let out = multas(&config, &["db", "check", "--json"]);
    assert_eq!(out.status.code(), Some(0));
    let statuses = stdout_json(&out);
    assert_eq!(statuses[0]["source"], "plate");
    assert_eq!(statuses[0]["identifiers"], 1);
    assert_eq!(statuses[3]["identifiers"], 0);
}

// ── query ───────────────────────────────────────────────────────────

fn write_input(path: &Path, plates: &[&str]) {
    let mut wb = rust_xlsxwriter::Workbook::new();
    for source in QuerySource::ALL {
        let ws = wb.add_worksheet();
        ws.set_name(source.sheet_name()).unwrap();
        ws.write_string(0, 0, source.input_column()).unwrap();
        if source == QuerySource::Plate {
            for (i, p) in plates.iter().enumerate() {
                ws.write_string(i as u32 + 1, 0, *p).unwrap();
            }
        }
    }
    wb.save(path).unwrap();
}

#[test]
fn query_plate_against_mock_portal() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    let config = write_config(tmp.path(), &format!("base_url = {:?}\ntimeout_secs = 5\n", server.base_url()));
    write_input(&tmp.path().join("DB-CONSULTA.xlsx"), &["PBA1234"]);

    server.mock(|when, then| {
        when.method(GET)
            .path("/clp_json_citaciones.jsp")
            .query_param("ps_placa", "PBA1234");
        then.status(200).json_body(json!({
            "records": 1,
            "rows": [{ "cell": ["1", "INF-77", "ANT"] }]
        }));
    });

    let out = multas(&config, &["query", "plate", "--json"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let outcome = stdout_json(&out);
    let path = PathBuf::from(outcome["path"].as_str().unwrap());
    assert!(path.starts_with(tmp.path().join("consultas")));
    let table = read_table(&path).unwrap();
    assert_eq!(table.rows()[0][0], "PBA1234");
    assert!(table.rows()[0].contains(&"INF-77".to_string()));
}

#[test]
fn query_all_with_only_empty_sheets_exits_4() {
    let tmp = tempfile::tempdir().unwrap();
    let server = MockServer::start();
    let config = write_config(tmp.path(), &format!("base_url = {:?}\n", server.base_url()));
    write_input(&tmp.path().join("DB-CONSULTA.xlsx"), &[]);

    let out = multas(&config, &["query", "all", "--json"]);
    assert_eq!(out.status.code(), Some(4));
    let outcomes = stdout_json(&out);
    assert_eq!(outcomes.as_array().unwrap().len(), 4);
    assert!(outcomes.as_array().unwrap().iter().all(|o| o["code"] == "EMPTY_INPUT"));
}

#[test]
fn unknown_source_is_usage_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "");
    let out = multas(&config, &["query", "passport"]);
    assert_eq!(out.status.code(), Some(2));
}

// ── config init ─────────────────────────────────────────────────────

#[test]
fn config_init_writes_loadable_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("cfg").join("settings.toml");
    let reports = tmp.path().join("reports");

    let out = multas(&config, &["config", "init", "--output-dir", reports.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(config.is_file());

    let again = multas(&config, &["config", "init"]);
    assert_eq!(again.status.code(), Some(2));

    // the written file loads; the empty report directory is created on demand
    let out = multas(&config, &["unify", "--json"]);
    assert_eq!(out.status.code(), Some(4));
    assert!(reports.is_dir());
}

#[test]
fn long_version_names_target() {
    let out = Command::new(env!("CARGO_BIN_EXE_multas")).arg("--version").output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("target:"));

    let short = Command::new(env!("CARGO_BIN_EXE_multas")).arg("-V").output().unwrap();
    assert!(String::from_utf8_lossy(&short.stdout).starts_with("multas "));
}
