// File: src/storage.rs
use crate::model::{DoseSchedule, Medicine};
use crate::paths::AppPaths;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use fs2::FileExt;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub struct LocalStorage;

impl LocalStorage {
    /// Helper to get a sidecar lock file path (e.g., "schedules.json.lock")
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Execute a closure while holding an exclusive lock on the sidecar file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    pub fn save_medicines_to(path: &Path, medicines: &[Medicine]) -> Result<()> {
        Self::with_lock(path, || {
            let json = serde_json::to_string_pretty(medicines)?;
            Self::atomic_write(path, json)
        })
    }

    pub fn load_medicines_from(path: &Path) -> Result<Vec<Medicine>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(path, || {
            let json = fs::read_to_string(path)?;
            let medicines = serde_json::from_str::<Vec<Medicine>>(&json)
                .with_context(|| format!("Corrupt medicine list at {:?}", path))?;
            Ok(medicines)
        })
    }

    pub fn save_medicines(medicines: &[Medicine]) -> Result<()> {
        Self::save_medicines_to(&AppPaths::get_medicines_path()?, medicines)
    }

    pub fn load_medicines() -> Result<Vec<Medicine>> {
        Self::load_medicines_from(&AppPaths::get_medicines_path()?)
    }
}

/// Per-medicine dose schedule persistence. One whole record per id, so the
/// dosage, pill count and target are always written together.
pub trait ScheduleStore {
    fn get(&self, medicine_id: &str) -> Result<Option<DoseSchedule>>;

    fn put(&mut self, medicine_id: &str, schedule: &DoseSchedule) -> Result<()>;

    fn remove(&mut self, medicine_id: &str) -> Result<()>;

    /// Stored schedule, or the defaults when nothing is stored or the
    /// store could not be read.
    fn load_or_default(&self, medicine_id: &str, now: DateTime<Local>) -> DoseSchedule {
        match self.get(medicine_id) {
            Ok(Some(schedule)) => schedule,
            Ok(None) => DoseSchedule::defaults(now),
            Err(e) => {
                log::warn!("Could not load schedule for {}: {:#}", medicine_id, e);
                DoseSchedule::defaults(now)
            }
        }
    }
}

/// Schedules kept in a single JSON object keyed by medicine id.
#[derive(Debug, Clone)]
pub struct JsonScheduleStore {
    path: PathBuf,
}

/// Records stay raw until looked up, so one damaged entry cannot make the
/// others unreadable or block writes.
type ScheduleMap = BTreeMap<String, serde_json::Value>;

impl JsonScheduleStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store located in the application data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(AppPaths::get_schedules_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<ScheduleMap> {
        if !self.path.exists() {
            return Ok(ScheduleMap::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let map = serde_json::from_str::<ScheduleMap>(&json)
            .with_context(|| format!("Corrupt schedule store at {:?}", self.path))?;
        Ok(map)
    }

    /// Read for a write. An unreadable file is moved aside to `<file>.corrupt`
    /// and replaced by an empty store.
    fn read_map_for_update(&self) -> Result<ScheduleMap> {
        match self.read_map() {
            Ok(map) => Ok(map),
            Err(e) => {
                let mut backup = self.path.clone().into_os_string();
                backup.push(".corrupt");
                log::error!("{:#}; moving it to {:?}", e, backup);
                fs::rename(&self.path, &backup)?;
                Ok(ScheduleMap::new())
            }
        }
    }

    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ScheduleMap) -> Result<()>,
    {
        LocalStorage::with_lock(&self.path, || {
            let mut map = self.read_map_for_update()?;
            f(&mut map)?;
            let json = serde_json::to_string_pretty(&map)?;
            LocalStorage::atomic_write(&self.path, json)
        })
    }
}

impl ScheduleStore for JsonScheduleStore {
    fn get(&self, medicine_id: &str) -> Result<Option<DoseSchedule>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = LocalStorage::with_lock(&self.path, || {
            Ok(self.read_map()?.remove(medicine_id))
        })?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match serde_json::from_value::<DoseSchedule>(raw) {
            Ok(schedule) => Ok(Some(schedule)),
            Err(e) => {
                log::warn!("Ignoring malformed schedule for {}: {}", medicine_id, e);
                Ok(None)
            }
        }
    }

    fn put(&mut self, medicine_id: &str, schedule: &DoseSchedule) -> Result<()> {
        let value = serde_json::to_value(schedule)?;
        self.update(|map| {
            map.insert(medicine_id.to_string(), value);
            Ok(())
        })?;
        log::debug!("Saved schedule for {}", medicine_id);
        Ok(())
    }

    fn remove(&mut self, medicine_id: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| {
            map.remove(medicine_id);
            Ok(())
        })
    }
}

/// In-process store, nothing touches the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    records: HashMap<String, DoseSchedule>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn get(&self, medicine_id: &str) -> Result<Option<DoseSchedule>> {
        Ok(self.records.get(medicine_id).cloned())
    }

    fn put(&mut self, medicine_id: &str, schedule: &DoseSchedule) -> Result<()> {
        self.records
            .insert(medicine_id.to_string(), schedule.clone());
        Ok(())
    }

    fn remove(&mut self, medicine_id: &str) -> Result<()> {
        self.records.remove(medicine_id);
        Ok(())
    }
}
