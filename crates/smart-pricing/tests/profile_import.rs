//! File-based profile loading through the public importer.

use std::fs;
use std::path::PathBuf;

use smart_pricing::workflows::pricing::profiles::{export_template_csv, export_template_json};
use smart_pricing::workflows::pricing::{analyze_user, ProfileImportError, ProfileImporter};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("smart-pricing-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("write scratch file");
    path
}

#[test]
fn loads_json_template_from_disk() {
    let path = scratch_file("template.json", &export_template_json().expect("json template"));
    let profiles = ProfileImporter::from_path(&path).expect("json file imports");
    fs::remove_file(&path).ok();

    assert_eq!(profiles.len(), 3);
    assert_eq!(analyze_user(&profiles[1]).discount, 75);
}

#[test]
fn loads_csv_template_from_disk() {
    let path = scratch_file("template.csv", &export_template_csv().expect("csv template"));
    let profiles = ProfileImporter::from_path(&path).expect("csv file imports");
    fs::remove_file(&path).ok();

    let discounts: Vec<u8> = profiles
        .iter()
        .map(|profile| analyze_user(profile).discount)
        .collect();
    assert_eq!(discounts, vec![45, 75, 0]);
}

#[test]
fn missing_file_surfaces_io_error() {
    let path = std::env::temp_dir().join("smart-pricing-does-not-exist.json");
    let err = ProfileImporter::from_path(path).expect_err("missing file");
    assert!(matches!(err, ProfileImportError::Io(_)));
}

#[test]
fn json_file_with_wrong_shape_is_rejected() {
    let path = scratch_file("object.json", r#"{"users":[]}"#);
    let err = ProfileImporter::from_path(&path).expect_err("object rejected");
    fs::remove_file(&path).ok();
    assert!(matches!(err, ProfileImportError::NotAnArray));
}
