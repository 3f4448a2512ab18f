//! `multas query`: run one source's identifiers against the portal and
//! write the citations found to a timestamped report.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use multas_config::Settings;
use multas_core::{JobOutcome, QuerySource};
use multas_io::input::read_source_identifiers;
use multas_io::scan::report_file_name;
use multas_io::xlsx::write_table;
use multas_recon::build_report_table;

use crate::error::CliError;
use crate::exit_codes::EXIT_DIR_NOT_FOUND;
use crate::fetch::PortalClient;

/// Query every identifier of `source` listed in the input workbook.
///
/// Per-identifier failures (network, unexpected body, unknown person) are
/// logged and skipped. A run with nothing to query, or that finds no
/// citations at all, is an unsuccessful outcome rather than an error.
pub fn run_query(
    source: QuerySource,
    settings: &Settings,
    client: &PortalClient,
) -> Result<JobOutcome, CliError> {
    let identifiers = read_source_identifiers(&settings.db_path, source)?;
    if identifiers.is_empty() {
        return Ok(JobOutcome::failed(
            "EMPTY_INPUT",
            format!(
                "no {} listed in sheet {} of {}",
                source.plural_noun(),
                source.sheet_name(),
                settings.db_path.display()
            ),
        ));
    }

    let total = identifiers.len();
    let mut records = Vec::new();
    let mut failed = 0usize;
    for (i, raw) in identifiers.iter().enumerate() {
        let id = source.normalize_identifier(raw);
        info!("[{}/{}] {} {}", i + 1, total, source, id);

        match client.query(source, &id) {
            Ok(found) => {
                debug!("{}: {} citations", id, found.len());
                records.extend(found);
            }
            Err(e) => {
                warn!("{}: {}; skipping", id, e);
                failed += 1;
            }
        }
    }

    if records.is_empty() {
        return Ok(JobOutcome::failed(
            "NO_DATA",
            format!(
                "no citations found for {} {} ({} failed)",
                total,
                source.plural_noun(),
                failed
            ),
        ));
    }

    let table = build_report_table(source, &records);
    ensure_output_dir(&settings.output_dir, settings.create_dirs)?;

    let name = report_file_name(source.file_prefix(), chrono::Local::now().naive_local());
    let path = settings.output_dir.join(&name);
    write_table(&path, &table)?;
    info!("wrote {} citations to {}", table.len(), path.display());

    let mut message = format!(
        "{} citations for {} {} written to {}",
        table.len(),
        total,
        source.plural_noun(),
        name
    );
    if failed > 0 {
        message.push_str(&format!(" ({failed} identifiers failed, see log)"));
    }

    let download_url = settings.download_url(&name);
    Ok(JobOutcome::written(message, path, download_url))
}

pub(crate) fn ensure_output_dir(dir: &Path, create: bool) -> Result<(), CliError> {
    if dir.is_dir() {
        return Ok(());
    }
    if !create || dir.exists() {
        return Err(CliError::new(
            EXIT_DIR_NOT_FOUND,
            format!("output directory {} does not exist", dir.display()),
        )
        .with_hint("set create_dirs = true in settings or create the directory"));
    }
    fs::create_dir_all(dir)
        .map_err(|e| CliError::io(format!("cannot create {}: {}", dir.display(), e)))
}
