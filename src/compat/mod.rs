//! Structural compatibility engine.
//!
//! A [`Comparison`] walks a consumer and a producer [`DescriptorTree`]
//! field-by-field, value-by-value and method-by-method, reducing everything to
//! a single [`Compatibility`] through [`Compatibility::aggregate`].

pub mod field;
pub mod lattice;
pub mod message;
pub mod schema;
pub mod service;
pub mod shape;

pub use lattice::Compatibility;

use crate::descriptor::{DescriptorTree, EnumId, MessageId, ServiceId};
use crate::error::{CompareError, Result};
use std::collections::HashSet;

/// One schema of a comparison: its tree plus the name used in errors.
#[derive(Debug, Clone, Copy)]
pub struct Side<'a> {
    pub tree: &'a DescriptorTree,
    pub schema: &'a str,
}

impl<'a> Side<'a> {
    pub fn new(tree: &'a DescriptorTree, schema: &'a str) -> Self {
        Self { tree, schema }
    }

    pub fn message(&self, name: &str) -> Result<MessageId> {
        self.tree
            .resolve_message(name)
            .ok_or_else(|| CompareError::type_not_found(name, self.schema))
    }

    pub fn enumeration(&self, name: &str) -> Result<EnumId> {
        self.tree
            .resolve_enum(name)
            .ok_or_else(|| CompareError::type_not_found(name, self.schema))
    }

    pub fn service(&self, name: &str) -> Result<ServiceId> {
        self.tree
            .resolve_service(name)
            .ok_or_else(|| CompareError::type_not_found(name, self.schema))
    }
}

/// State of a single comparison call.
///
/// The trees are only borrowed; the one piece of mutable state is the set of
/// message pairs currently being compared, which makes recursive message
/// types terminate. A pair met again while still on the stack contributes
/// `Equal` and leaves the verdict to the enclosing comparison of that pair.
#[derive(Debug)]
pub struct Comparison<'a> {
    consumer: Side<'a>,
    producer: Side<'a>,
    in_progress: HashSet<(MessageId, MessageId)>,
}

impl<'a> Comparison<'a> {
    pub fn new(consumer: Side<'a>, producer: Side<'a>) -> Self {
        Self {
            consumer,
            producer,
            in_progress: HashSet::new(),
        }
    }

    pub fn consumer(&self) -> Side<'a> {
        self.consumer
    }

    pub fn producer(&self) -> Side<'a> {
        self.producer
    }
}
