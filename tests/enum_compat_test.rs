use proto_compat::{CompareError, Compatibility, ContractComparer, SchemaSource};

fn compare_enum(consumer: &str, producer: &str, name: &str) -> proto_compat::Result<Compatibility> {
    ContractComparer::new(
        SchemaSource::new("consumer.proto", consumer),
        SchemaSource::new("producer.proto", producer),
    )?
    .compare_enum_type(name, name)
}

#[test]
fn test_renamed_values_are_equal() {
    let consumer = r#"
syntax = "proto3";
enum Color { RED = 0; GREEN = 1; BLUE = 2; }
"#;
    let producer = r#"
syntax = "proto3";
enum Color { ROUGE = 0; VERT = 1; BLEU = 2; }
"#;

    assert_eq!(compare_enum(consumer, producer, "Color").unwrap(), Compatibility::Equal);
}

#[test]
fn test_added_value_changes_direction() {
    let small = r#"
syntax = "proto3";
enum Color { RED = 0; GREEN = 1; }
"#;
    let large = r#"
syntax = "proto3";
enum Color { RED = 0; GREEN = 1; BLUE = 2; }
"#;

    assert_eq!(compare_enum(small, large, "Color").unwrap(), Compatibility::SubSet);
    assert_eq!(compare_enum(large, small, "Color").unwrap(), Compatibility::SuperSet);
}

#[test]
fn test_renumbered_value_is_not_compatible() {
    let consumer = r#"
syntax = "proto3";
enum Color { RED = 0; GREEN = 1; }
"#;
    let producer = r#"
syntax = "proto3";
enum Color { RED = 0; GREEN = 5; }
"#;

    assert_eq!(
        compare_enum(consumer, producer, "Color").unwrap(),
        Compatibility::NotCompatible
    );
}

#[test]
fn test_aliases_collapse_to_one_number() {
    let consumer = r#"
syntax = "proto3";
enum Mode {
  option allow_alias = true;
  OFF = 0;
  DISABLED = 0;
  ON = 1;
}
"#;
    let producer = r#"
syntax = "proto3";
enum Mode { OFF = 0; ON = 1; }
"#;

    assert_eq!(compare_enum(consumer, producer, "Mode").unwrap(), Compatibility::Equal);
}

#[test]
fn test_nested_enum_resolves_by_qualified_name() {
    let consumer = r#"
syntax = "proto3";
package billing;
message Invoice {
  enum State { DRAFT = 0; SENT = 1; }
  State state = 1;
}
"#;
    let producer = r#"
syntax = "proto3";
package billing;
message Invoice {
  enum State { DRAFT = 0; SENT = 1; PAID = 2; }
  State state = 1;
}
"#;

    assert_eq!(
        compare_enum(consumer, producer, "billing.Invoice.State").unwrap(),
        Compatibility::SubSet
    );
    assert_eq!(
        compare_enum(consumer, producer, "Invoice.State").unwrap(),
        Compatibility::SubSet
    );
}

#[test]
fn test_message_name_is_not_an_enum() {
    let proto = r#"
syntax = "proto3";
message Color { int32 rgb = 1; }
"#;

    assert!(matches!(
        compare_enum(proto, proto, "Color"),
        Err(CompareError::TypeNotFound { .. })
    ));
}
