//! Whole-schema comparison of the root files' top-level declarations.

use super::shape::compare_keyed;
use super::{Compatibility, Comparison, Side};
use crate::descriptor::{EnumId, MessageId, ServiceId, TypeHandle};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
enum DeclarationKind {
    Message,
    Enum,
    Service,
}

/// Top-level declarations of a root file, keyed by simple name.
struct RootDeclarations<'a> {
    messages: Vec<(&'a str, MessageId)>,
    enums: Vec<(&'a str, EnumId)>,
    services: Vec<(&'a str, ServiceId)>,
}

impl<'a> RootDeclarations<'a> {
    fn collect(side: Side<'a>) -> Self {
        let tree = side.tree;
        let mut declarations = RootDeclarations {
            messages: Vec::new(),
            enums: Vec::new(),
            services: Vec::new(),
        };
        let Some(root) = tree.root() else {
            return declarations;
        };

        for handle in &root.types {
            match *handle {
                TypeHandle::Message(id) => {
                    declarations.messages.push((tree.message(id).name.as_str(), id))
                }
                TypeHandle::Enum(id) => {
                    declarations.enums.push((tree.enumeration(id).name.as_str(), id))
                }
            }
        }
        for id in &root.services {
            declarations
                .services
                .push((tree.service(*id).name.as_str(), *id));
        }
        declarations
    }
}

impl<'a> Comparison<'a> {
    /// Compares every top-level message, enum and service of the two root
    /// files. Each kind is a keyed collection (by name) under the usual
    /// cardinality policy, and the three verdicts are aggregated.
    pub fn compare_roots(&mut self) -> Result<Compatibility> {
        let consumer = RootDeclarations::collect(self.consumer);
        let producer = RootDeclarations::collect(self.producer);

        Compatibility::try_aggregate(
            [
                DeclarationKind::Message,
                DeclarationKind::Enum,
                DeclarationKind::Service,
            ]
            .into_iter()
            .map(|kind| match kind {
                DeclarationKind::Message => compare_keyed(
                    "message",
                    &consumer.messages,
                    &producer.messages,
                    |entry| entry.0,
                    |c, p| self.compare_message(c.1, p.1),
                ),
                DeclarationKind::Enum => compare_keyed(
                    "enum",
                    &consumer.enums,
                    &producer.enums,
                    |entry| entry.0,
                    |c, p| self.compare_enum(c.1, p.1),
                ),
                DeclarationKind::Service => compare_keyed(
                    "service",
                    &consumer.services,
                    &producer.services,
                    |entry| entry.0,
                    |c, p| self.compare_service(c.1, p.1),
                ),
            }),
        )
    }
}
