//! Validation of on-disk sources

use std::fs;
use std::path::Path;
use tpms_validator::{Source, Validator, ValidatorConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_capture_file_end_to_end() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("tpms_realworld.jsonl");
    write(
        &capture,
        r#"{"time":"2024-05-01 08:00:01","model":"Ford","type":"TPMS","id":"0x3a7b2c1d","pressure_PSI":26.5}
{"time":"2024-05-01 08:00:02","model":"Ford","type":"TPMS","id":"0x3a7b2c1d","pressure_PSI":26.5}

{"time":"2024-05-01 08:00:03","model":"Schrader-EG53MA4","type":"TPMS","id":"0x55","pressure_kPa":250.0,"temperature_F":68}
{"time":"2024-05-01 08:00:04","model":"Acurite-5n1","type":"Weather","id":1}
"#,
    );

    let tally = Validator::new().validate_source(&Source::capture(&capture));

    // Ford pressure, EG53MA4 pressure (2.5) and temperature pass; the 2.75
    // hypothesis disagrees; Acurite is excluded
    assert_eq!(tally.passed(), 3);
    assert_eq!(tally.failed(), 1);
    assert_eq!(tally.skipped(), 1);
    assert!(tally.failures()[0].contains("discrepancy"));
}

#[test]
fn test_reference_tree_pools_files() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("rtl_433").join("tests");
    let record = r#"{"time":"@0.262s","model":"Elantra2012","type":"TPMS","id":"4a3b2c1d","pressure_kPa":62.0,"temperature_C":25,"mic":"CRC"}"#;

    write(&root.join("elantra2012").join("01").join("g001.json"), record);
    write(
        &root.join("elantra2012").join("02").join("g002.json"),
        &record.replace("@0.262s", "@1.018s"),
    );
    write(&root.join("elantra2012").join("README.md"), "# samples");

    let tally = Validator::new().validate_source(&Source::reference(&root));

    assert_eq!(tally.passed(), 2);
    assert!(tally.is_success());
}

#[test]
fn test_malformed_reference_line_names_file_and_line() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("tpms").join("bad.json");
    write(
        &file,
        "{\"model\":\"Renault\",\"type\":\"TPMS\",\"id\":\"1\",\"pressure_kPa\":210.0}\n{\"model\":\n",
    );

    let tally = Validator::new().validate_source(&Source::reference(dir.path()));

    assert_eq!(tally.failed(), 1);
    assert!(tally.failures()[0].contains("bad.json line 2"));
    // the Renault reading still counts
    assert_eq!(tally.passed(), 1);
}

#[test]
fn test_missing_sources_are_skipped() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let validator = Validator::new();

    let mut tally = validator.validate_source(&Source::capture(dir.path().join("tpms_sample.jsonl")));
    tally.merge(validator.validate_source(&Source::reference(dir.path().join("tests"))));

    assert_eq!(tally.skipped(), 2);
    assert_eq!(tally.passed() + tally.failed(), 0);
}

#[test]
fn test_custom_reference_extensions() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("ford.jsonl"),
        r#"{"model":"Ford","type":"TPMS","id":9,"pressure_PSI":30.25}"#,
    );

    let default = Validator::new().validate_source(&Source::reference(dir.path()));
    assert_eq!(default.total(), 0);

    let config = ValidatorConfig::new().with_reference_extensions(vec!["jsonl".to_string()]);
    let tally = Validator::with_config(config).validate_source(&Source::reference(dir.path()));
    assert_eq!(tally.passed(), 1);
}
