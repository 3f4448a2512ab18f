use std::fs;
use std::path::Path;

use multas_core::{QuerySource, Table, ViolationRecord};
use multas_io::xlsx::{read_table, write_table};
use multas_recon::{build_report_table, unify_directory, UnifyError, UnifyOptions, UNIFIED_PREFIX};

fn citation(id: &str, code: &str, fine: &str) -> ViolationRecord {
    let mut cells: Vec<String> = (0..20).map(|i| format!("c{i}")).collect();
    cells[1] = code.to_string();
    cells[14] = fine.to_string();
    ViolationRecord::new(id, cells)
}

fn write_report(dir: &Path, name: &str, source: QuerySource, records: &[ViolationRecord]) {
    let table = build_report_table(source, records);
    write_table(&dir.join(name), &table).unwrap();
}

fn unified_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(UNIFIED_PREFIX))
        .collect();
    names.sort();
    names
}

fn column<'a>(table: &'a Table, name: &str) -> Vec<&'a str> {
    let idx = table.column_index(name).unwrap();
    table.column(idx).collect()
}

// -------------------------------------------------------------------------
// Happy path
// -------------------------------------------------------------------------

#[test]
fn duplicate_codes_keep_first_file() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(
        tmp.path(),
        "PLA-CON-2024-01-01_00-00-00.xlsx",
        QuerySource::Plate,
        &[citation("PBA1234", "INF-1", "45.00")],
    );
    write_report(
        tmp.path(),
        "RUC-CON-2024-01-01_00-00-00.xlsx",
        QuerySource::TaxId,
        &[
            citation("1790012345001", "INF-1", "99.00"),
            citation("1790012345001", "INF-2", "10.00"),
        ],
    );

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_written, 2);
    assert_eq!(report.duplicates_removed, 1);

    let unified = read_table(&report.output).unwrap();
    assert_eq!(&unified.headers()[..2], ["Query Type", "Identification"]);
    assert!(unified.headers().iter().all(|h| !h.starts_with("Col_")));
    assert_eq!(column(&unified, "# Infracción"), ["INF-1", "INF-2"]);
    // PLA-CON sorts before RUC-CON
    assert_eq!(column(&unified, "Multa"), ["45.00", "10.00"]);
    assert_eq!(column(&unified, "Query Type"), ["PLATE", "TAX_ID"]);
}

#[test]
fn disjoint_reports_sum_rows() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(
        tmp.path(),
        "in-ced-con-a.xlsx",
        QuerySource::NationalId,
        &[citation("0102030405", "INF-10", "1"), citation("0102030405", "INF-11", "2")],
    );
    write_report(
        tmp.path(),
        "ex-ced-con-a.xlsx",
        QuerySource::ForeignId,
        &[citation("0912345678", "INF-20", "3")],
    );

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    assert_eq!(report.rows_written, 3);
    assert_eq!(report.duplicates_removed, 0);
    assert_eq!(unified_files(tmp.path()).len(), 1);
}

#[test]
fn leading_zeros_survive() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(
        tmp.path(),
        "in-ced-con-a.xlsx",
        QuerySource::NationalId,
        &[citation("0102030405", "INF-1", "45.00")],
    );

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    let unified = read_table(&report.output).unwrap();
    assert_eq!(column(&unified, "Identification"), ["0102030405"]);
    assert_eq!(column(&unified, "Query Type"), ["NATIONAL_ID"]);
}

#[test]
fn numeric_cells_render_without_decimals() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("legacy.xlsx");

    let mut wb = rust_xlsxwriter::Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "RUC").unwrap();
    ws.write_string(0, 1, "# Infracción").unwrap();
    ws.write_number(1, 0, 1790012345001.0).unwrap();
    ws.write_number(1, 1, 778899.0).unwrap();
    wb.save(&path).unwrap();

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    let unified = read_table(&report.output).unwrap();
    assert_eq!(column(&unified, "Identification"), ["1790012345001"]);
    assert_eq!(column(&unified, "# Infracción"), ["778899"]);
    assert_eq!(column(&unified, "Query Type"), ["TAX_ID"]);
}

#[test]
fn previous_unified_report_is_reabsorbed() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(
        tmp.path(),
        "PLA-CON-a.xlsx",
        QuerySource::Plate,
        &[citation("PBA1234", "INF-1", "45.00")],
    );

    let first = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    fs::rename(&first.output, tmp.path().join("Consulta_Unificada_old.xlsx")).unwrap();

    let second = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    assert_eq!(second.files_scanned, 2);
    assert_eq!(second.rows_read, 2);
    assert_eq!(second.rows_written, 1);
    assert_eq!(second.duplicates_removed, 1);
}

#[test]
fn blank_codes_across_files_keep_one_row() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(
        tmp.path(),
        "PLA-CON-a.xlsx",
        QuerySource::Plate,
        &[citation("PBA1234", "", "45.00"), citation("PBA1234", "INF-1", "10.00")],
    );
    write_report(
        tmp.path(),
        "PLA-CON-b.xlsx",
        QuerySource::Plate,
        &[citation("GYE0001", "", "99.00")],
    );

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.duplicates_removed, 1);

    let unified = read_table(&report.output).unwrap();
    assert_eq!(column(&unified, "# Infracción"), ["", "INF-1"]);
    assert_eq!(column(&unified, "Identification"), ["PBA1234", "PBA1234"]);
}

#[test]
fn repeated_blank_headers_keep_their_cells() {
    let tmp = tempfile::tempdir().unwrap();
    for (name, plate, code) in [("PLA-CON-a.xlsx", "PBA1234", "INF-1"), ("PLA-CON-b.xlsx", "GYE0001", "INF-2")] {
        let mut table = Table::new(["Placas", "# Infracción", "", ""]);
        table.push_row(vec![plate.into(), code.into(), format!("{plate}-left"), format!("{plate}-right")]);
        write_table(&tmp.path().join(name), &table).unwrap();
    }

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    let unified = read_table(&report.output).unwrap();
    assert_eq!(unified.width(), 5);
    assert_eq!(unified.rows()[0], ["PLATE", "PBA1234", "INF-1", "PBA1234-left", "PBA1234-right"]);
    assert_eq!(unified.rows()[1], ["PLATE", "GYE0001", "INF-2", "GYE0001-left", "GYE0001-right"]);
}

#[test]
fn spanish_legacy_unified_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut legacy = Table::new(["Tipo de consulta", "Identificación", "# Infracción", "Col_L"]);
    legacy.push_row(vec!["PLACA".into(), "PBA1234".into(), "INF-1".into(), "".into()]);
    write_table(&tmp.path().join("Consulta_Unificada_2023.xlsx"), &legacy).unwrap();

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    let unified = read_table(&report.output).unwrap();
    assert_eq!(unified.headers(), ["Query Type", "Identification", "# Infracción"]);
    assert_eq!(unified.rows()[0], ["PLATE", "PBA1234", "INF-1"]);
}

// -------------------------------------------------------------------------
// Failure modes
// -------------------------------------------------------------------------

#[test]
fn empty_directory_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("notes.txt"), "not a report").unwrap();

    let err = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap_err();
    assert!(matches!(err, UnifyError::EmptyInput { .. }));
    assert!(err.is_empty_result());
    assert!(unified_files(tmp.path()).is_empty());
}

#[test]
fn header_only_reports_are_no_data() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(tmp.path(), "PLA-CON-a.xlsx", QuerySource::Plate, &[]);

    let err = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap_err();
    assert_eq!(err.code(), "NO_DATA");
    assert!(unified_files(tmp.path()).is_empty());
}

#[test]
fn missing_identification_is_schema_mismatch() {
    let tmp = tempfile::tempdir().unwrap();
    let mut table = Table::new(["Entidad", "# Infracción"]);
    table.push_row(vec!["ANT".into(), "INF-1".into()]);
    write_table(&tmp.path().join("other.xlsx"), &table).unwrap();

    let err = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap_err();
    match err {
        UnifyError::SchemaMismatch { path, column } => {
            assert!(path.ends_with("other.xlsx"));
            assert_eq!(column, "Identification");
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
    assert!(unified_files(tmp.path()).is_empty());
}

#[test]
fn corrupt_file_is_unreadable() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(
        tmp.path(),
        "PLA-CON-a.xlsx",
        QuerySource::Plate,
        &[citation("PBA1234", "INF-1", "45.00")],
    );
    fs::write(tmp.path().join("RUC-CON-broken.xlsx"), b"definitely not a zip").unwrap();

    let err = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap_err();
    assert_eq!(err.code(), "UNREADABLE_FILE");
    assert!(err.to_string().contains("RUC-CON-broken.xlsx"), "{err}");
    assert!(unified_files(tmp.path()).is_empty());
}

#[test]
fn lock_files_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    write_report(
        tmp.path(),
        "PLA-CON-a.xlsx",
        QuerySource::Plate,
        &[citation("PBA1234", "INF-1", "45.00")],
    );
    fs::write(tmp.path().join("~$PLA-CON-a.xlsx"), b"lock").unwrap();

    let report = unify_directory(tmp.path(), &UnifyOptions::default()).unwrap();
    assert_eq!(report.files_scanned, 1);
}
