use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::domain::JobApplication;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format for a snapshot export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Picks JSON for `.json` files and CSV for everything else.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Writes a snapshot of applications to disk. There is no matching import:
/// the board itself never reads these files back.
pub struct SnapshotExporter;

impl SnapshotExporter {
    /// Writes the snapshot to `filename`. An existing file is only replaced
    /// when `overwrite` is set; otherwise `AlreadyExists` is returned.
    pub fn export(
        applications: &[JobApplication],
        filename: &str,
        overwrite: bool,
    ) -> Result<String, ExportError> {
        let path = Path::new(filename);
        let file = if overwrite {
            File::create(path)?
        } else {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(file) => file,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(ExportError::AlreadyExists(filename.to_string()));
                }
                Err(err) => return Err(err.into()),
            }
        };
        match ExportFormat::for_path(path) {
            ExportFormat::Csv => Self::write_csv(applications, file)?,
            ExportFormat::Json => Self::write_json(applications, file)?,
        }
        tracing::info!(path = %path.display(), count = applications.len(), "snapshot exported");
        Ok(filename.to_string())
    }

    pub fn write_csv<W: Write>(applications: &[JobApplication], writer: W) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_writer(writer);
        if applications.is_empty() {
            writer.write_record(["id", "company", "position", "stage", "dateApplied", "notes"])?;
        }
        for application in applications {
            writer.serialize(application)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(applications: &[JobApplication], mut writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut writer, applications)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
