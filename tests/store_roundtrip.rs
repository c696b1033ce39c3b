//! Persistence Tests
//!
//! Stores written with `save`/`write_to` read back to the same headers and
//! records, including values that need quoting.

use ais_store::record::Record;
use ais_store::schema::Headers;
use ais_store::store::{RecordSet, Resource, StoreConfig};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn tricky_records() -> Vec<Record> {
    vec![
        Record::from_fields(["367000001", "2017-12-05T00:00:01", "EVER GIVEN"]),
        Record::from_fields(["367000002", "2017-12-05T00:00:02", "SMITH, JONES & CO"]),
        Record::from_fields(["367000003", "2017-12-05T00:00:03", "THE \"BIG\" ONE"]),
        Record::from_fields(["367000004", "2017-12-05T00:00:04", "#1 TUG"]),
        Record::from_fields(["367000005", "2017-12-05T00:00:05", ""]),
        Record::from_fields(["367000006", "2017-12-05T00:00:06", " LEADING"]),
    ]
}

fn memory_store(records: &[Record]) -> RecordSet {
    let mut set = RecordSet::new();
    set.set_headers(Headers::from_fields(["MMSI", "BaseDateTime", "VesselName"]));
    for rec in records {
        set.write(rec).unwrap();
    }
    set.flush().unwrap();
    set
}

fn drain(set: &mut RecordSet) -> Vec<Record> {
    set.records().collect()
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_save_and_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    let records = tricky_records();

    let mut set = memory_store(&records);
    assert_eq!(set.save(&path).unwrap(), records.len());

    let mut back = RecordSet::open_path(&path, StoreConfig::default()).unwrap();
    assert_eq!(back.headers(), set.headers());
    assert_eq!(drain(&mut back), records);
}

#[test]
fn test_write_to_and_reopen_from_bytes() {
    let records = tricky_records();
    let mut set = memory_store(&records);

    let mut bytes = Vec::new();
    set.write_to(&mut bytes).unwrap();

    let mut back = RecordSet::open(Resource::from_bytes(bytes)).unwrap();
    assert_eq!(drain(&mut back), records);
}

#[test]
fn test_round_trip_with_other_delimiter() {
    let config = StoreConfig {
        delimiter: '|',
        comment: None,
        ..StoreConfig::default()
    };
    let records = vec![
        Record::from_fields(["1", "a|b", "#not a comment"]),
        Record::from_fields(["2", "c,d", "e"]),
    ];

    let mut set = RecordSet::with_config(config.clone()).unwrap();
    set.set_headers(Headers::from_fields(["A", "B", "C"]));
    for rec in &records {
        set.write(rec).unwrap();
    }
    set.flush().unwrap();

    let mut bytes = Vec::new();
    set.write_to(&mut bytes).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.starts_with("A|B|C\n1|\"a|b\"|#not a comment\n"));

    let mut back = RecordSet::open_with_config(Resource::from_bytes(bytes), config).unwrap();
    assert_eq!(drain(&mut back), records);
}

// =============================================================================
// File Resource Lifecycle
// =============================================================================

#[test]
fn test_appended_records_visible_after_flush() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(&path, "MMSI,VesselName\n1,A\n").unwrap();

    let mut set = RecordSet::open_path(&path, StoreConfig::default()).unwrap();
    set.write(&Record::from_fields(["2", "B"])).unwrap();
    set.flush().unwrap();

    let ids: Vec<_> = drain(&mut set).iter().map(|r| r[0].to_string()).collect();
    assert_eq!(ids, ["1", "2"]);
    set.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "MMSI,VesselName\n1,A\n2,B\n");
}

#[test]
fn test_save_over_existing_file_truncates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    fs::write(&path, "old contents that are much longer than the new file\n").unwrap();

    let mut set = memory_store(&tricky_records()[..1]);
    set.save(&path).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "MMSI,BaseDateTime,VesselName\n367000001,2017-12-05T00:00:01,EVER GIVEN\n"
    );
}

#[test]
fn test_hash_survives_round_trip() {
    let records = tricky_records();
    let mut set = memory_store(&records);
    let mut bytes = Vec::new();
    set.write_to(&mut bytes).unwrap();
    let mut back = RecordSet::open(Resource::from_bytes(bytes)).unwrap();

    let before: Vec<u64> = records.iter().map(Record::hash).collect();
    let after: Vec<u64> = drain(&mut back).iter().map(Record::hash).collect();
    assert_eq!(before, after);
}
