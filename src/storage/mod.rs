// src/storage/mod.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extractors::ScanReport;
use crate::records::models::COLUMNS;
use crate::records::{ResultRecord, ResultTable};
use crate::utils::error::StorageError;

/// Sidecar describing one persisted extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    pub table_id: String,
    pub source_file: String,
    pub page_count: usize,
    pub record_count: usize,
    pub student_count: usize,
    pub extraction_timestamp: String,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Fresh opaque identifier for a table produced by one upload.
    pub fn new_table_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    pub fn table_path(&self, id: &Uuid) -> PathBuf {
        self.base_dir.join(format!("{}.csv", id))
    }

    pub fn metadata_path(&self, id: &Uuid) -> PathBuf {
        self.base_dir.join(format!("{}.json", id))
    }

    /// A reference is either a table id issued by this store or a path to a
    /// table file.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        match Uuid::parse_str(reference.trim()) {
            Ok(id) => self.table_path(&id),
            Err(_) => PathBuf::from(reference),
        }
    }

    /// Persists `table` under `id`, replacing any file already there.
    pub fn save_table(&self, id: &Uuid, table: &ResultTable) -> Result<PathBuf, StorageError> {
        let file_path = self.table_path(id);
        let file = fs::File::create(&file_path)?;
        write_table(table, file)?;

        tracing::info!("Saved {} records to {}", table.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the extraction in JSON format
    pub fn save_table_metadata(
        &self,
        id: &Uuid,
        source: &Path,
        report: &ScanReport,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.metadata_path(id);

        let metadata = TableMetadata {
            table_id: id.to_string(),
            source_file: source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            page_count: report.pages,
            record_count: report.table.len(),
            student_count: report.table.student_count(),
            extraction_timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    /// Loads a previously persisted table. Missing files and files that are
    /// not result tables are read errors.
    pub fn load_table(&self, reference: &str) -> Result<ResultTable, StorageError> {
        let path = self.resolve(reference);
        if !path.is_file() {
            return Err(StorageError::TableNotFound(reference.to_string()));
        }

        let unparsable = |reason: String| StorageError::Unparsable {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| unparsable(e.to_string()))?;

        let headers = reader.headers().map_err(|e| unparsable(e.to_string()))?;
        if headers.iter().ne(COLUMNS.iter().copied()) {
            return Err(unparsable(format!("unexpected columns {:?}", headers)));
        }

        let records = reader
            .deserialize::<ResultRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| unparsable(e.to_string()))?;

        tracing::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records.into())
    }

    /// Writes a filtered table into the store under its download name.
    pub fn save_filtered(&self, subject_code: &str, table: &ResultTable) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(filtered_file_name(subject_code));
        let file = fs::File::create(&file_path)?;
        write_table(table, file)?;

        tracing::info!("Saved {} filtered records to {}", table.len(), file_path.display());
        Ok(file_path)
    }
}

/// Download name for a filtered export, with path separators neutralised.
pub fn filtered_file_name(subject_code: &str) -> String {
    let safe: String = subject_code
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("filtered_results_{}.csv", safe)
}

/// Serialises `table` as CSV. The header row is written even when the
/// table is empty.
pub fn write_table<W: Write>(table: &ResultTable, writer: W) -> Result<(), StorageError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for record in table {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::result_sheet::ScanState;
    use crate::records::Outcome;

    fn sample_table() -> ResultTable {
        vec![
            ResultRecord::new("2201001", "JOHN DOE", "1234", Outcome::Pass),
            ResultRecord::new("2201001", "JOHN DOE", "5678", Outcome::Fail),
            ResultRecord::new("2201002", "", "0123", Outcome::Absent),
        ]
        .into()
    }

    #[test]
    fn test_table_round_trip_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("results")).unwrap();
        let id = storage.new_table_id();

        let path = storage.save_table(&id, &sample_table()).unwrap();
        assert!(path.ends_with(format!("{}.csv", id)));

        let loaded = storage.load_table(&id.to_string()).unwrap();
        assert_eq!(loaded, sample_table());
        // Leading zeros in codes survive as text
        assert_eq!(loaded.records()[2].subject_code, "0123");
    }

    #[test]
    fn test_empty_table_keeps_header_row() {
        let mut buf = Vec::new();
        write_table(&ResultTable::new(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Roll_Number,Name,Subject_Code,Result\n");

        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let id = storage.new_table_id();
        storage.save_table(&id, &ResultTable::new()).unwrap();
        assert!(storage.load_table(&id.to_string()).unwrap().is_empty());
    }

    #[test]
    fn test_distinct_uploads_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let a = storage.new_table_id();
        let b = storage.new_table_id();
        assert_ne!(storage.table_path(&a), storage.table_path(&b));
    }

    #[test]
    fn test_load_by_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(&path, "Roll_Number,Name,Subject_Code,Result\n2201003,ASHOK,1234,Unknown\n").unwrap();

        let table = storage.load_table(path.to_str().unwrap()).unwrap();
        assert_eq!(table.records()[0].result, Outcome::Unknown);
    }

    #[test]
    fn test_missing_and_malformed_tables_are_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();

        let missing = storage.new_table_id().to_string();
        assert!(matches!(storage.load_table(&missing), Err(StorageError::TableNotFound(_))));

        let wrong_columns = dir.path().join("wrong.csv");
        fs::write(&wrong_columns, "Roll,Name\n1,A\n").unwrap();
        assert!(matches!(
            storage.load_table(wrong_columns.to_str().unwrap()),
            Err(StorageError::Unparsable { .. })
        ));

        let bad_result = dir.path().join("bad.csv");
        fs::write(&bad_result, "Roll_Number,Name,Subject_Code,Result\n2201001,A,1234,Maybe\n").unwrap();
        assert!(matches!(
            storage.load_table(bad_result.to_str().unwrap()),
            Err(StorageError::Unparsable { .. })
        ));
    }

    #[test]
    fn test_metadata_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let id = storage.new_table_id();
        let report = ScanReport {
            table: sample_table(),
            pages: 2,
            blocks_seen: 3,
            blocks_dropped: 1,
            final_state: ScanState::Seeking,
        };

        let path = storage
            .save_table_metadata(&id, Path::new("/uploads/sem5.pdf"), &report)
            .unwrap();
        let meta: TableMetadata = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(meta.table_id, id.to_string());
        assert_eq!(meta.source_file, "sem5.pdf");
        assert_eq!(meta.record_count, 3);
        assert_eq!(meta.student_count, 2);
        assert_eq!(meta.page_count, 2);
    }

    #[test]
    fn test_filtered_file_name_is_sanitised() {
        assert_eq!(filtered_file_name("1234"), "filtered_results_1234.csv");
        assert_eq!(filtered_file_name("../12"), "filtered_results____12.csv");
    }
}
