//! Discovered/lab device stores and their JSON persistence.
//!
//! Both documents are JSON objects keyed by hardware address. They are read
//! once at startup (missing or corrupt files give an empty map) and always
//! written whole: serialize to `<file>.tmp`, then rename over the original.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::network::Network;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything ever observed for one hardware address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    pub ssid: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub last_signal: u8,
    pub security: String,
}

/// Operator flag for one hardware address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabDevice {
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub active: bool,
}

pub type DiscoveredMap = BTreeMap<String, DiscoveredDevice>;
pub type LabMap = BTreeMap<String, LabDevice>;

/// Result of folding one scan into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub observed: usize,
    pub new_devices: usize,
    pub new_lab_entries: usize,
}

pub struct DeviceStore {
    discovered: DiscoveredMap,
    lab: LabMap,
    discovered_path: PathBuf,
    lab_path: PathBuf,
}

impl DeviceStore {
    /// Open both documents, falling back to empty maps.
    pub fn open(discovered_path: PathBuf, lab_path: PathBuf) -> Self {
        let discovered: DiscoveredMap = load_json_or_default(&discovered_path);
        let lab: LabMap = load_json_or_default(&lab_path);
        info!(
            "device store: {} discovered, {} lab entries",
            discovered.len(),
            lab.len()
        );
        Self {
            discovered,
            lab,
            discovered_path,
            lab_path,
        }
    }

    pub fn discovered(&self) -> &DiscoveredMap {
        &self.discovered
    }

    pub fn lab(&self) -> &LabMap {
        &self.lab
    }

    pub fn is_lab_active(&self, bssid: &str) -> bool {
        self.lab.get(bssid).map(|d| d.active).unwrap_or(false)
    }

    /// Fold `observations` into the discovered map. Returns how many keys
    /// were seen for the first time. Entries are never removed.
    pub fn merge(&mut self, observations: &[Network], now: DateTime<Utc>) -> usize {
        let mut created = 0;
        for net in observations {
            if net.bssid.is_empty() {
                continue;
            }
            match self.discovered.get_mut(&net.bssid) {
                Some(dev) => {
                    dev.ssid = net.ssid.clone();
                    dev.last_seen = now;
                    dev.last_signal = net.signal;
                    dev.security = net.security.clone();
                }
                None => {
                    self.discovered.insert(
                        net.bssid.clone(),
                        DiscoveredDevice {
                            ssid: net.ssid.clone(),
                            first_seen: now,
                            last_seen: now,
                            last_signal: net.signal,
                            security: net.security.clone(),
                        },
                    );
                    created += 1;
                }
            }
        }
        created
    }

    /// Give every discovered key a lab entry (`active = false`). The lab
    /// document is written once when at least one entry was added.
    pub fn ensure_defaults(&mut self) -> usize {
        let mut inserted = 0;
        for (bssid, dev) in &self.discovered {
            if !self.lab.contains_key(bssid) {
                self.lab.insert(
                    bssid.clone(),
                    LabDevice {
                        ssid: dev.ssid.clone(),
                        active: false,
                    },
                );
                inserted += 1;
            }
        }
        if inserted > 0 {
            self.persist_lab();
        }
        inserted
    }

    /// Flip the lab flag of `bssid`, creating the entry if needed, and write
    /// the lab document.
    pub fn toggle(&mut self, bssid: &str) -> LabDevice {
        let ssid = self
            .discovered
            .get(bssid)
            .map(|d| d.ssid.clone())
            .unwrap_or_default();
        let entry = self
            .lab
            .entry(bssid.to_string())
            .or_insert_with(|| LabDevice {
                ssid,
                active: false,
            });
        entry.active = !entry.active;
        let updated = entry.clone();
        info!("lab: toggled {} active={}", bssid, updated.active);
        self.persist_lab();
        updated
    }

    /// Merge a scan, write the discovered document and add default lab
    /// entries for new keys.
    pub fn record_scan(&mut self, observations: &[Network], now: DateTime<Utc>) -> ScanReport {
        let new_devices = self.merge(observations, now);
        self.persist_discovered();
        let new_lab_entries = self.ensure_defaults();
        ScanReport {
            observed: observations.len(),
            new_devices,
            new_lab_entries,
        }
    }

    pub fn save_discovered(&self) -> Result<(), StoreError> {
        write_json_atomic(&self.discovered_path, &self.discovered)
    }

    pub fn save_lab(&self) -> Result<(), StoreError> {
        write_json_atomic(&self.lab_path, &self.lab)
    }

    fn persist_discovered(&self) {
        if let Err(e) = self.save_discovered() {
            warn!("device store: {}", e);
        }
    }

    fn persist_lab(&self) {
        if let Err(e) = self.save_lab() {
            warn!("device store: {}", e);
        }
    }
}

/// Read a JSON document, returning `T::default()` when it is missing or
/// cannot be parsed.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!("load {}: {}", path.display(), e);
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("ignoring corrupt {}: {}", path.display(), e);
            T::default()
        }
    }
}

/// Replace `path` with the pretty-printed JSON of `value`.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                op: "create dir",
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let json = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = temp_path(path);
    {
        let mut file = std::fs::File::create(&tmp).map_err(|source| StoreError::Io {
            op: "create",
            path: tmp.clone(),
            source,
        })?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|source| StoreError::Io {
                op: "write",
                path: tmp.clone(),
                source,
            })?;
    }
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        op: "rename",
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn net(bssid: &str, ssid: &str, signal: u8) -> Network {
        Network {
            ssid: ssid.to_string(),
            signal,
            security: "WPA2".to_string(),
            bssid: bssid.to_string(),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn store_in(dir: &Path) -> DeviceStore {
        DeviceStore::open(
            dir.join("discovered_devices.json"),
            dir.join("lab_devices.json"),
        )
    }

    #[test]
    fn test_merge_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        assert_eq!(store.merge(&[net("AA:BB", "first", 40)], at(0)), 1);
        assert_eq!(store.merge(&[net("AA:BB", "renamed", 70)], at(30)), 0);

        let dev = &store.discovered()["AA:BB"];
        assert_eq!(dev.last_signal, 70);
        assert_eq!(dev.ssid, "renamed");
        assert_eq!(dev.first_seen, at(0));
        assert_eq!(dev.last_seen, at(30));
    }

    #[test]
    fn test_merge_skips_empty_keys_and_keeps_stale() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.merge(&[net("K1", "a", 10)], at(0));
        store.merge(&[net("", "nokey", 99), net("K2", "b", 20)], at(5));

        assert_eq!(store.discovered().len(), 2);
        assert!(store.discovered().contains_key("K1"));
        assert!(!store.discovered().contains_key(""));
    }

    #[test]
    fn test_ensure_defaults_persists_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.merge(&[net("K1", "alpha", 10), net("K2", "beta", 20)], at(0));

        assert_eq!(store.ensure_defaults(), 2);
        assert_eq!(store.lab()["K1"], LabDevice { ssid: "alpha".into(), active: false });
        let lab_path = dir.path().join("lab_devices.json");
        assert!(lab_path.exists());

        std::fs::remove_file(&lab_path).unwrap();
        assert_eq!(store.ensure_defaults(), 0);
        assert!(!lab_path.exists());
    }

    #[test]
    fn test_toggle_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        let entry = store.toggle("DE:AD");
        assert_eq!(entry, LabDevice { ssid: String::new(), active: true });

        let saved: LabMap = load_json_or_default(&dir.path().join("lab_devices.json"));
        assert_eq!(saved["DE:AD"], entry);
    }

    #[test]
    fn test_toggle_twice_restores_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.record_scan(&[net("K1", "alpha", 10)], at(0));

        assert!(store.toggle("K1").active);
        assert!(store.is_lab_active("K1"));
        let entry = store.toggle("K1");
        assert_eq!(entry.ssid, "alpha");
        assert!(!entry.active);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("discovered_devices.json"), "{ not json").unwrap();
        let store = store_in(dir.path());
        assert!(store.discovered().is_empty());
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab_devices.json");
        let mut lab = LabMap::new();
        lab.insert("K".into(), LabDevice::default());
        write_json_atomic(&path, &lab).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("lab_devices.json.tmp").exists());
    }
}
