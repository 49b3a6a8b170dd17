//! Arena representation of a parsed schema and the type resolver over it.
//!
//! Every message, enum and service of the root file and of all files it
//! imports lives in a flat vector and is addressed by a typed index. Field and
//! method type references stay as fully qualified names and go through
//! [`DescriptorTree::resolve`], so self-referential messages never form
//! owning cycles.

use protobuf::descriptor::field_descriptor_proto::{Label, Type};

/// Index of a message node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) usize);

/// Index of an enum node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub(crate) usize);

/// Index of a service node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub(crate) usize);

/// A named type declaration (message or enum) inside a file or message scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHandle {
    Message(MessageId),
    Enum(EnumId),
}

/// What a resolved name points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    Message(MessageId),
    Enum(EnumId),
    Service(ServiceId),
}

/// The top-level declarations of one `.proto` file.
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    pub name: String,
    /// Empty when the file declares no package.
    pub package: String,
    pub types: Vec<TypeHandle>,
    pub services: Vec<ServiceId>,
}

#[derive(Debug, Clone)]
pub struct MessageNode {
    pub name: String,
    pub full_name: String,
    pub fields: Vec<FieldNode>,
    /// Nested messages first, then nested enums, each in declared order.
    pub nested: Vec<TypeHandle>,
}

/// Field options that carry wire meaning. Only `packed` is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldOptionSet {
    pub packed: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct FieldNode {
    pub name: String,
    pub number: i32,
    pub kind: Type,
    pub label: Label,
    /// Fully qualified (`.pkg.Outer.Inner`) for message, group and enum fields.
    pub type_name: Option<String>,
    /// `None` when the field declares no options at all.
    pub options: Option<FieldOptionSet>,
}

impl FieldNode {
    pub fn is_message(&self) -> bool {
        matches!(self.kind, Type::TYPE_MESSAGE | Type::TYPE_GROUP)
    }

    pub fn is_enum(&self) -> bool {
        self.kind == Type::TYPE_ENUM
    }
}

#[derive(Debug, Clone)]
pub struct EnumNode {
    pub name: String,
    pub full_name: String,
    pub values: Vec<EnumValueNode>,
}

#[derive(Debug, Clone)]
pub struct EnumValueNode {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone)]
pub struct ServiceNode {
    pub name: String,
    pub full_name: String,
    pub methods: Vec<MethodNode>,
}

#[derive(Debug, Clone)]
pub struct MethodNode {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

/// A parsed schema: the root file plus everything it imports.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTree {
    /// Root file first, then imports in parser order.
    pub(crate) files: Vec<FileScope>,
    pub(crate) messages: Vec<MessageNode>,
    pub(crate) enums: Vec<EnumNode>,
    pub(crate) services: Vec<ServiceNode>,
}

impl DescriptorTree {
    pub fn root(&self) -> Option<&FileScope> {
        self.files.first()
    }

    pub fn files(&self) -> &[FileScope] {
        &self.files
    }

    pub fn message(&self, id: MessageId) -> &MessageNode {
        &self.messages[id.0]
    }

    pub fn enumeration(&self, id: EnumId) -> &EnumNode {
        &self.enums[id.0]
    }

    pub fn service(&self, id: ServiceId) -> &ServiceNode {
        &self.services[id.0]
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Resolves a dotted or absolute (`.`-prefixed) name to a declaration.
    ///
    /// Scopes are tried root file first. A package prefix matching the scope's
    /// package is stripped; non-absolute names are also tried unqualified
    /// against the root file. Services only resolve at the top level.
    pub fn resolve(&self, name: &str) -> Option<Declaration> {
        let (absolute, name) = match name.strip_prefix('.') {
            Some(rest) => (true, rest),
            None => (false, name),
        };
        if name.is_empty() {
            return None;
        }

        for (index, scope) in self.files.iter().enumerate() {
            if scope.package.is_empty() {
                if let Some(found) = self.resolve_in_scope(scope, name) {
                    return Some(found);
                }
                continue;
            }

            let qualified = name
                .strip_prefix(scope.package.as_str())
                .and_then(|rest| rest.strip_prefix('.'));
            if let Some(found) = qualified.and_then(|rest| self.resolve_in_scope(scope, rest)) {
                return Some(found);
            }

            if index == 0 && !absolute {
                if let Some(found) = self.resolve_in_scope(scope, name) {
                    return Some(found);
                }
            }
        }

        None
    }

    /// Resolves a name that must denote a message.
    pub fn resolve_message(&self, name: &str) -> Option<MessageId> {
        match self.resolve(name)? {
            Declaration::Message(id) => Some(id),
            _ => None,
        }
    }

    /// Resolves a name that must denote an enum.
    pub fn resolve_enum(&self, name: &str) -> Option<EnumId> {
        match self.resolve(name)? {
            Declaration::Enum(id) => Some(id),
            _ => None,
        }
    }

    /// Resolves a name that must denote a service.
    pub fn resolve_service(&self, name: &str) -> Option<ServiceId> {
        match self.resolve(name)? {
            Declaration::Service(id) => Some(id),
            _ => None,
        }
    }

    fn resolve_in_scope(&self, scope: &FileScope, relative: &str) -> Option<Declaration> {
        let mut segments = relative.split('.');
        let first = segments.next()?;
        let rest: Vec<&str> = segments.collect();

        if rest.is_empty() {
            if let Some(service) = scope
                .services
                .iter()
                .find(|id| self.service(**id).name == first)
            {
                return Some(Declaration::Service(*service));
            }
        }

        let mut current = self.find_type(&scope.types, first)?;
        for segment in rest {
            let TypeHandle::Message(parent) = current else {
                return None;
            };
            current = self.find_type(&self.message(parent).nested, segment)?;
        }

        Some(match current {
            TypeHandle::Message(id) => Declaration::Message(id),
            TypeHandle::Enum(id) => Declaration::Enum(id),
        })
    }

    fn find_type(&self, handles: &[TypeHandle], name: &str) -> Option<TypeHandle> {
        handles.iter().copied().find(|handle| match handle {
            TypeHandle::Message(id) => self.message(*id).name == name,
            TypeHandle::Enum(id) => self.enumeration(*id).name == name,
        })
    }
}
