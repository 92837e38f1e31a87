//! Persistencia en archivos CSV de sólo anexado.
//!
//! El encabezado se escribe únicamente cuando el archivo no existe o está vacío;
//! las filas existentes nunca se modifican ni se borran.


use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;


#[derive(Error, Debug)]
pub enum StorageError {
    #[error("error de E/S en {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("error CSV en {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}


/// Archivo CSV de sólo anexado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLog {
    path: PathBuf,
}


impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv { path: self.path.clone(), source }
    }

    /// `true` si hay que escribir el encabezado antes de anexar.
    fn needs_header(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true)
    }

    /// Anexa las filas y devuelve cuántas se escribieron.
    pub fn append<T: Serialize>(&self, rows: &[T]) -> Result<usize, StorageError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let has_headers = self.needs_header();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(has_headers)
            .from_writer(file);

        for row in rows {
            writer.serialize(row).map_err(|e| self.csv_error(e))?;
        }
        writer.flush().map_err(|e| self.io_error(e))?;

        Ok(rows.len())
    }

    /// Lee todas las filas. Un archivo inexistente equivale a un log vacío.
    pub fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.csv_error(e))?;
        reader
            .deserialize()
            .collect::<Result<Vec<T>, csv::Error>>()
            .map_err(|e| self.csv_error(e))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::domain::{Platform, PoeLogRow, PortRecord, PowerRecord};

    fn power(platform: Platform, port: &str, watts: Option<f64>) -> PowerRecord {
        PowerRecord {
            platform,
            timestamp: "2024-06-03T12:30:00Z".to_string(),
            switch_name: "SW-A".to_string(),
            switch_id: "sw1".to_string(),
            port_id: port.to_string(),
            port_name: format!("Gi1/0/{port}"),
            watts,
            ap_name: "Skog-AP1".to_string(),
            ap_id: "ap1".to_string(),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvLog::new(dir.path().join("poe.csv"));

        log.append(&[PoeLogRow::from(&power(Platform::Catalyst, "1", Some(7.4)))]).unwrap();
        log.append(&[PoeLogRow::from(&power(Platform::Meraki, "2", None))]).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "platform,timestamp,switch_name,switch_id,watts,port_id,ap_name,ap_id");
        assert_eq!(lines[1], "catalyst,2024-06-03T12:30:00Z,SW-A,sw1,7.4,1,Skog-AP1,ap1");
        assert_eq!(lines[2], "meraki,2024-06-03T12:30:00Z,SW-A,sw1,,2,Skog-AP1,ap1");
    }

    #[test]
    fn test_empty_existing_file_gets_header() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let log = CsvLog::new(file.path());

        let row = PoeLogRow::from(&power(Platform::Catalyst, "1", Some(7.4)));
        log.append(&[row.clone()]).unwrap();

        let rows: Vec<PoeLogRow> = log.read_all().unwrap();
        assert_eq!(rows, vec![row]);
    }

    #[test]
    fn test_empty_batch_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvLog::new(dir.path().join("poe.csv"));

        assert_eq!(log.append::<PoeLogRow>(&[]).unwrap(), 0);
        assert!(!log.path().exists());
    }

    #[test]
    fn test_snapshot_rows_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvLog::new(dir.path().join("ports.csv"));
        let rows = vec![
            PortRecord::from(&power(Platform::Catalyst, "1", Some(7.4))),
            PortRecord::from(&power(Platform::Meraki, "5", None)),
        ];

        log.append(&rows).unwrap();
        let read: Vec<PortRecord> = log.read_all().unwrap();

        assert_eq!(read, rows);
        assert_eq!(read[1].platform, "meraki");
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvLog::new(dir.path().join("none.csv"));
        assert!(log.read_all::<PortRecord>().unwrap().is_empty());
    }
}
