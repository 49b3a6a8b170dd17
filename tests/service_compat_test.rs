use proto_compat::{CompareError, Compatibility, ContractComparer, SchemaSource};

fn comparer(consumer: &str, producer: &str) -> ContractComparer {
    ContractComparer::new(
        SchemaSource::new("consumer.proto", consumer),
        SchemaSource::new("producer.proto", producer),
    )
    .expect("Failed to create comparer")
}

const BASE: &str = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; }
message HelloReply { string message = 1; }

service Greeter {
  rpc SayHello(HelloRequest) returns (HelloReply);
}
"#;

#[test]
fn test_identical_service_is_equal() {
    assert_eq!(
        comparer(BASE, BASE).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::Equal
    );
}

#[test]
fn test_request_difference_is_not_compatible() {
    let producer = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; string locale = 2; }
message HelloReply { string message = 1; }

service Greeter {
  rpc SayHello(HelloRequest) returns (HelloReply);
}
"#;

    assert_eq!(
        comparer(BASE, producer).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::NotCompatible
    );
    assert_eq!(
        comparer(producer, BASE).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::NotCompatible
    );
}

#[test]
fn test_response_difference_passes_through() {
    let producer = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; }
message HelloReply { string message = 1; int64 sent_at = 2; }

service Greeter {
  rpc SayHello(HelloRequest) returns (HelloReply);
}
"#;

    assert_eq!(
        comparer(BASE, producer).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::SubSet
    );
    assert_eq!(
        comparer(producer, BASE).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::SuperSet
    );
}

#[test]
fn test_added_method_changes_direction() {
    let producer = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; }
message HelloReply { string message = 1; }

service Greeter {
  rpc SayHello(HelloRequest) returns (HelloReply);
  rpc SayGoodbye(HelloRequest) returns (HelloReply);
}
"#;

    assert_eq!(
        comparer(BASE, producer).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::SubSet
    );
    assert_eq!(
        comparer(producer, BASE).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::SuperSet
    );
}

#[test]
fn test_renamed_method_is_not_compatible() {
    let producer = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; }
message HelloReply { string message = 1; }

service Greeter {
  rpc Greet(HelloRequest) returns (HelloReply);
}
"#;

    assert_eq!(
        comparer(BASE, producer).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::NotCompatible
    );
}

#[test]
fn test_streaming_methods_compare_their_messages() {
    let proto = r#"
syntax = "proto3";

message Chunk { bytes data = 1; }
message Ack { uint64 offset = 1; }

service Upload {
  rpc Send(stream Chunk) returns (stream Ack);
}
"#;

    assert_eq!(
        comparer(proto, proto).compare_service("Upload", "Upload").unwrap(),
        Compatibility::Equal
    );
}

#[test]
fn test_missing_service_is_type_not_found() {
    let result = comparer(BASE, BASE).compare_service("Greeter", "Farewell");
    assert!(matches!(
        result,
        Err(CompareError::TypeNotFound { ref name, ref schema })
            if name == "Farewell" && schema == "producer.proto"
    ));
}

#[test]
fn test_message_name_is_not_a_service() {
    assert!(matches!(
        comparer(BASE, BASE).compare_service("HelloRequest", "HelloRequest"),
        Err(CompareError::TypeNotFound { .. })
    ));
}

#[test]
fn test_streaming_mode_change_is_not_compatible() {
    let producer = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; }
message HelloReply { string message = 1; }

service Greeter {
  rpc SayHello(HelloRequest) returns (stream HelloReply);
}
"#;

    assert_eq!(
        comparer(BASE, producer).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::NotCompatible
    );
    assert_eq!(
        comparer(producer, BASE).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::NotCompatible
    );
}

#[test]
fn test_extra_method_and_opposite_response_direction_conflict() {
    // The consumer has one more method, but a shared method's response has
    // fewer fields than the producer's.
    let consumer = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; }
message HelloReply { string message = 1; }

service Greeter {
  rpc SayHello(HelloRequest) returns (HelloReply);
  rpc SayGoodbye(HelloRequest) returns (HelloReply);
}
"#;
    let producer = r#"
syntax = "proto3";
package greet.v1;

message HelloRequest { string name = 1; }
message HelloReply { string message = 1; int64 sent_at = 2; }

service Greeter {
  rpc SayHello(HelloRequest) returns (HelloReply);
}
"#;

    assert_eq!(
        comparer(consumer, producer).compare_service("Greeter", "Greeter").unwrap(),
        Compatibility::NotCompatible
    );
}
