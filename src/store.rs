use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::distance::DistanceProvenance;

const LANGUAGE_KEY: &str = "language";

/// Debug record appended per completed calculation. Write-only: the
/// language preference is the only key ever read back.
#[derive(Debug, Serialize)]
pub struct CalculationRecord {
    pub from: String,
    pub to: String,
    pub coordinates: Option<String>,
    pub distance_km: f64,
    pub provenance: DistanceProvenance,
    pub ride_price: f64,
    pub processing_fee: f64,
    pub final_amount: f64,
    pub map_link: String,
    pub timestamp: DateTime<Utc>,
}

/// File-backed key-value store for the language preference and the
/// per-calculation audit trail.
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl LocalStore {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn language(&self) -> Option<String> {
        self.lock()
            .get(LANGUAGE_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn set_language(&self, language: &str) -> io::Result<()> {
        let mut entries = self.lock();
        entries.insert(LANGUAGE_KEY.to_string(), Value::String(language.to_string()));
        self.flush(&entries)
    }

    pub fn record_calculation(
        &self,
        quote_id: Uuid,
        record: &CalculationRecord,
    ) -> io::Result<()> {
        let mut entries = self.lock();
        entries.insert(
            format!("payment_{}", quote_id.simple()),
            serde_json::to_value(record)?,
        );
        self.flush(&entries)
    }

    fn flush(&self, entries: &HashMap<String, Value>) -> io::Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().expect("local store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("taxi-store-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_language_round_trip_across_reopen() {
        let path = temp_store_path();

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.language(), None);
        store.set_language("cs").unwrap();

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.language(), Some("cs".to_string()));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_calculation_record_is_persisted() {
        let path = temp_store_path();
        let store = LocalStore::open(&path).unwrap();

        let quote_id = Uuid::new_v4();
        let record = CalculationRecord {
            from: "Praha".to_string(),
            to: "Brno".to_string(),
            coordinates: None,
            distance_km: 205.3,
            provenance: DistanceProvenance::Road,
            ride_price: 1756.58,
            processing_fee: 28.08,
            final_amount: 1785.0,
            map_link: "https://www.openstreetmap.org/".to_string(),
            timestamp: Utc::now(),
        };
        store.record_calculation(quote_id, &record).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains(&format!("payment_{}", quote_id.simple())));
        assert!(contents.contains("Brno"));

        fs::remove_file(&path).ok();
    }
}
