//! Schemas whose types live in imported files.

use proto_compat::{
    CompareError, ComparerConfig, Compatibility, ContractComparer, DirectoryFileSystem,
    MemoryFileSystem, SchemaSource,
};
use std::fs;

const ORDER: &str = r#"
syntax = "proto3";
package shop;

import "common/money.proto";

message Order {
  string id = 1;
  common.Money total = 2;
}
"#;

const MONEY_V1: &str = r#"
syntax = "proto3";
package common;

message Money {
  string currency = 1;
  int64 units = 2;
}
"#;

const MONEY_V2: &str = r#"
syntax = "proto3";
package common;

import "common/currency.proto";

message Money {
  string currency = 1;
  int64 units = 2;
  int32 nanos = 3;
  CurrencyCode code = 4;
}
"#;

const CURRENCY: &str = r#"
syntax = "proto3";
package common;

enum CurrencyCode { CURRENCY_UNSPECIFIED = 0; EUR = 1; USD = 2; }
"#;

#[test]
fn test_imported_types_are_compared() {
    let file_system = MemoryFileSystem::new().with_file("common/money.proto", MONEY_V1);
    let comparer = ContractComparer::new(
        SchemaSource::new("order.proto", ORDER),
        SchemaSource::new("order.proto", ORDER),
    )
    .unwrap()
    .with_file_system(file_system);

    assert_eq!(
        comparer.compare_message_type("shop.Order", "Order").unwrap(),
        Compatibility::Equal
    );
    assert_eq!(
        comparer.compare_message_type("common.Money", ".common.Money").unwrap(),
        Compatibility::Equal
    );
}

#[test]
fn test_transitive_imports_are_resolved() {
    let file_system = MemoryFileSystem::new()
        .with_file("common/money.proto", MONEY_V2)
        .with_file("common/currency.proto", CURRENCY);
    let comparer = ContractComparer::new(
        SchemaSource::new("order.proto", ORDER),
        SchemaSource::new("order.proto", ORDER),
    )
    .unwrap()
    .with_file_system(file_system);

    assert_eq!(
        comparer.compare_enum_type("common.CurrencyCode", "common.CurrencyCode").unwrap(),
        Compatibility::Equal
    );
    assert_eq!(comparer.consumer_tree().unwrap().files().len(), 3);
}

#[test]
fn test_directory_import_roots_from_config() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("common")).unwrap();
    fs::write(root.path().join("common/money.proto"), MONEY_V1).unwrap();

    let producer_order = r#"
syntax = "proto3";
package shop;

import "common/money.proto";

message Order {
  string id = 1;
  common.Money total = 2;
  string note = 3;
}
"#;
    let config = ComparerConfig {
        import_roots: vec![root.path().into()],
        ..Default::default()
    };

    let comparer = ContractComparer::new(
        SchemaSource::new("order.proto", ORDER),
        SchemaSource::new("order.proto", producer_order),
    )
    .unwrap()
    .with_config(config);

    assert_eq!(
        comparer.compare_message_type("Order", "Order").unwrap(),
        Compatibility::SubSet
    );
}

#[test]
fn test_directory_file_system_picks_first_root() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    fs::create_dir_all(first.path().join("common")).unwrap();
    fs::create_dir_all(second.path().join("common")).unwrap();
    fs::write(first.path().join("common/money.proto"), MONEY_V1).unwrap();
    fs::write(second.path().join("common/money.proto"), "not a schema").unwrap();

    let comparer = ContractComparer::new(
        SchemaSource::new("order.proto", ORDER),
        SchemaSource::new("order.proto", ORDER),
    )
    .unwrap()
    .with_file_system(DirectoryFileSystem::new([first.path(), second.path()]));

    assert_eq!(
        comparer.compare_message_type("Order", "Order").unwrap(),
        Compatibility::Equal
    );
}

#[test]
fn test_unused_missing_import_is_stubbed_by_default() {
    let proto = r#"
syntax = "proto3";
import "vendor/unused.proto";
message M { int32 x = 1; }
"#;

    let comparer = ContractComparer::new(
        SchemaSource::new("a.proto", proto),
        SchemaSource::new("b.proto", proto),
    )
    .unwrap();

    assert_eq!(comparer.compare_message_type("M", "M").unwrap(), Compatibility::Equal);
}

#[test]
fn test_missing_import_is_malformed_without_stubs() {
    let proto = r#"
syntax = "proto3";
import "vendor/unused.proto";
message M { int32 x = 1; }
"#;
    let config = ComparerConfig::from_yaml_str(
        r#"
compatibility:
  stub_unresolved_imports: false
"#,
    )
    .unwrap();

    let comparer = ContractComparer::new(
        SchemaSource::new("a.proto", proto),
        SchemaSource::new("b.proto", proto),
    )
    .unwrap()
    .with_config(config);

    assert!(matches!(
        comparer.compare_message_type("M", "M"),
        Err(CompareError::MalformedSchema { ref schema, .. }) if schema == "a.proto"
    ));
}

#[test]
fn test_well_known_types_need_no_file_system() {
    let proto = r#"
syntax = "proto3";
import "google/protobuf/timestamp.proto";
message Event { google.protobuf.Timestamp at = 1; }
"#;

    let comparer = ContractComparer::new(
        SchemaSource::new("a.proto", proto),
        SchemaSource::new("b.proto", proto),
    )
    .unwrap();

    assert_eq!(
        comparer.compare_message_type("Event", "Event").unwrap(),
        Compatibility::Equal
    );
}
