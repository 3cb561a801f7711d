use chrono::{TimeZone, Utc};
use proxscan_proto::network::parse_nmcli_terse;
use proxscan_proto::store::{DeviceStore, DiscoveredMap, LabMap};
use std::path::Path;

const FIRST_SCAN: &str = "\
HomeNet:72:WPA2:AA\\:BB\\:CC\\:DD\\:EE\\:01
:31::AA\\:BB\\:CC\\:DD\\:EE\\:02
garbage
";

const SECOND_SCAN: &str = "\
HomeNet:40:WPA2:AA\\:BB\\:CC\\:DD\\:EE\\:01
Cafe:88:WPA1 WPA2:AA\\:BB\\:CC\\:DD\\:EE\\:03
";

fn open(dir: &Path) -> DeviceStore {
    DeviceStore::open(
        dir.join("discovered_devices.json"),
        dir.join("lab_devices.json"),
    )
}

fn read<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn scans_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 21).unwrap();

    {
        let mut store = open(dir.path());
        let report = store.record_scan(&parse_nmcli_terse(FIRST_SCAN), t0);
        assert_eq!(report.observed, 2);
        assert_eq!(report.new_devices, 2);
        assert_eq!(report.new_lab_entries, 2);
        store.toggle("AA:BB:CC:DD:EE:02");
    }

    let mut store = open(dir.path());
    assert_eq!(store.discovered().len(), 2);
    assert!(store.is_lab_active("AA:BB:CC:DD:EE:02"));
    assert_eq!(store.lab()["AA:BB:CC:DD:EE:02"].ssid, "<hidden>");

    let report = store.record_scan(&parse_nmcli_terse(SECOND_SCAN), t1);
    assert_eq!(report.new_devices, 1);
    assert_eq!(report.new_lab_entries, 1);

    let discovered: DiscoveredMap = read(&dir.path().join("discovered_devices.json"));
    let home = &discovered["AA:BB:CC:DD:EE:01"];
    assert_eq!(home.first_seen, t0);
    assert_eq!(home.last_seen, t1);
    assert_eq!(home.last_signal, 40);
    assert_eq!(discovered["AA:BB:CC:DD:EE:03"].security, "WPA1 WPA2");

    let lab: LabMap = read(&dir.path().join("lab_devices.json"));
    assert_eq!(lab.len(), 3);
    assert!(lab["AA:BB:CC:DD:EE:02"].active);
    assert!(!lab["AA:BB:CC:DD:EE:03"].active);
}

#[test]
fn timestamps_are_rfc3339_utc() {
    let dir = tempfile::tempdir().unwrap();
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let mut store = open(dir.path());
    store.record_scan(&parse_nmcli_terse("x:50:WPA2:K1\n"), t0);

    let raw = std::fs::read_to_string(dir.path().join("discovered_devices.json")).unwrap();
    assert!(raw.contains("\"first_seen\": \"2024-05-01T12:00:00Z\""));
}

#[test]
fn lab_file_with_missing_fields_loads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("lab_devices.json"),
        r#"{ "K1": { "active": true }, "K2": {} }"#,
    )
    .unwrap();

    let store = open(dir.path());
    assert!(store.is_lab_active("K1"));
    assert!(!store.is_lab_active("K2"));
    assert_eq!(store.lab()["K1"].ssid, "");
}
