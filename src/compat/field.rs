//! Comparison of two fields that share a field number.

use super::{Compatibility, Comparison};
use crate::descriptor::FieldNode;
use crate::error::{CompareError, Result};
use tracing::trace;

impl<'a> Comparison<'a> {
    /// Compares a consumer field with the producer field of the same number.
    ///
    /// Kind, label and options must match exactly. Message and enum fields
    /// then recurse into the referenced types; scalars are `Equal`.
    pub fn compare_field(
        &mut self,
        consumer: &FieldNode,
        producer: &FieldNode,
    ) -> Result<Compatibility> {
        if consumer.kind != producer.kind {
            trace!(
                field = consumer.number,
                consumer = ?consumer.kind,
                producer = ?producer.kind,
                "Field type differs"
            );
            return Ok(Compatibility::NotCompatible);
        }

        if consumer.label != producer.label {
            trace!(
                field = consumer.number,
                consumer = ?consumer.label,
                producer = ?producer.label,
                "Field label differs"
            );
            return Ok(Compatibility::NotCompatible);
        }

        if consumer.options != producer.options {
            trace!(
                field = consumer.number,
                consumer = ?consumer.options,
                producer = ?producer.options,
                "Field options differ"
            );
            return Ok(Compatibility::NotCompatible);
        }

        let (consumer_side, producer_side) = (self.consumer, self.producer);

        if consumer.is_message() {
            let consumer_type =
                consumer_side.message(referenced_type(consumer, consumer_side.schema)?)?;
            let producer_type =
                producer_side.message(referenced_type(producer, producer_side.schema)?)?;
            return self.compare_message(consumer_type, producer_type);
        }

        if consumer.is_enum() {
            let consumer_type =
                consumer_side.enumeration(referenced_type(consumer, consumer_side.schema)?)?;
            let producer_type =
                producer_side.enumeration(referenced_type(producer, producer_side.schema)?)?;
            return self.compare_enum(consumer_type, producer_type);
        }

        Ok(Compatibility::Equal)
    }
}

fn referenced_type<'f>(field: &'f FieldNode, schema: &str) -> Result<&'f str> {
    field.type_name.as_deref().ok_or_else(|| {
        CompareError::type_not_found(&format!("<type of field {}>", field.name), schema)
    })
}
