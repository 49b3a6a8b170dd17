//! Converts the raw `FileDescriptorProto` AST from the `protobuf` crate
//! into the arena-backed [`DescriptorTree`].

use crate::descriptor::{
    DescriptorTree, EnumId, EnumNode, EnumValueNode, FieldNode, FieldOptionSet, FileScope,
    MessageId, MessageNode, MethodNode, ServiceId, ServiceNode, TypeHandle,
};
use protobuf::descriptor::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldOptions,
    FileDescriptorProto, ServiceDescriptorProto,
};

/// Builds a tree from the root file and its (transitive) imports.
///
/// `root` becomes the first scope; `imports` follow in the given order.
pub fn normalize_files<'a, I>(root: &FileDescriptorProto, imports: I) -> DescriptorTree
where
    I: IntoIterator<Item = &'a FileDescriptorProto>,
{
    let mut tree = DescriptorTree::default();
    normalize_file(&mut tree, root);
    for file in imports {
        normalize_file(&mut tree, file);
    }
    tree
}

fn normalize_file(tree: &mut DescriptorTree, file: &FileDescriptorProto) {
    let package = file.package().to_string();
    let mut scope = FileScope {
        name: file.name().to_string(),
        package: package.clone(),
        ..Default::default()
    };

    for msg in file.message_type.iter() {
        let id = normalize_message(tree, msg, &package);
        scope.types.push(TypeHandle::Message(id));
    }

    for en in file.enum_type.iter() {
        let id = normalize_enum(tree, en, &package);
        scope.types.push(TypeHandle::Enum(id));
    }

    for svc in file.service.iter() {
        let id = normalize_service(tree, svc, &package);
        scope.services.push(id);
    }

    tree.files.push(scope);
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn normalize_message(tree: &mut DescriptorTree, msg: &DescriptorProto, prefix: &str) -> MessageId {
    let full_name = qualify(prefix, msg.name());

    // Reserve the slot first so nested ids come after their parent.
    let id = MessageId(tree.messages.len());
    tree.messages.push(MessageNode {
        name: msg.name().to_string(),
        full_name: full_name.clone(),
        fields: msg.field.iter().map(normalize_field).collect(),
        nested: Vec::new(),
    });

    let mut nested = Vec::with_capacity(msg.nested_type.len() + msg.enum_type.len());
    for nested_msg in msg.nested_type.iter() {
        nested.push(TypeHandle::Message(normalize_message(
            tree, nested_msg, &full_name,
        )));
    }
    for nested_enum in msg.enum_type.iter() {
        nested.push(TypeHandle::Enum(normalize_enum(tree, nested_enum, &full_name)));
    }

    tree.messages[id.0].nested = nested;
    id
}

fn normalize_field(field: &FieldDescriptorProto) -> FieldNode {
    // For primitive types `type_name` is empty; message, group and enum
    // fields carry the fully qualified referenced name.
    let type_name = if field.type_name().is_empty() {
        None
    } else {
        Some(field.type_name().to_string())
    };

    // The parser attaches an empty `FieldOptions` for bracket entries that are
    // not options (`json_name`, `default`); only a populated one counts.
    let options = field
        .options
        .as_ref()
        .filter(|opts| **opts != FieldOptions::default())
        .map(|opts| FieldOptionSet {
            packed: opts.packed,
        });

    FieldNode {
        name: field.name().to_string(),
        number: field.number(),
        kind: field.type_(),
        label: field.label(),
        type_name,
        options,
    }
}

fn normalize_enum(tree: &mut DescriptorTree, en: &EnumDescriptorProto, prefix: &str) -> EnumId {
    let id = EnumId(tree.enums.len());
    tree.enums.push(EnumNode {
        name: en.name().to_string(),
        full_name: qualify(prefix, en.name()),
        values: en
            .value
            .iter()
            .map(|val| EnumValueNode {
                name: val.name().to_string(),
                number: val.number(),
            })
            .collect(),
    });
    id
}

fn normalize_service(
    tree: &mut DescriptorTree,
    svc: &ServiceDescriptorProto,
    prefix: &str,
) -> ServiceId {
    let id = ServiceId(tree.services.len());
    tree.services.push(ServiceNode {
        name: svc.name().to_string(),
        full_name: qualify(prefix, svc.name()),
        methods: svc
            .method
            .iter()
            .map(|method| MethodNode {
                name: method.name().to_string(),
                input_type: method.input_type().to_string(),
                output_type: method.output_type().to_string(),
                client_streaming: method.client_streaming(),
                server_streaming: method.server_streaming(),
            })
            .collect(),
    });
    id
}
