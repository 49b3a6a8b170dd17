//! Message and enum comparison.

use super::shape::compare_keyed;
use super::{Compatibility, Comparison};
use crate::descriptor::{EnumId, MessageId};
use crate::error::Result;
use std::collections::BTreeSet;
use tracing::trace;

impl<'a> Comparison<'a> {
    /// Compares two messages by their fields, keyed by field number.
    pub fn compare_message(
        &mut self,
        consumer: MessageId,
        producer: MessageId,
    ) -> Result<Compatibility> {
        if !self.in_progress.insert((consumer, producer)) {
            trace!(?consumer, ?producer, "Recursive message pair already being compared");
            return Ok(Compatibility::Equal);
        }

        let (consumer_tree, producer_tree) = (self.consumer.tree, self.producer.tree);
        let consumer_msg = consumer_tree.message(consumer);
        let producer_msg = producer_tree.message(producer);

        let result = compare_keyed(
            "field",
            &consumer_msg.fields,
            &producer_msg.fields,
            |field| field.number,
            |consumer_field, producer_field| {
                self.compare_field(consumer_field, producer_field)
            },
        );

        self.in_progress.remove(&(consumer, producer));

        if let Ok(verdict) = &result {
            trace!(
                consumer = %consumer_msg.full_name,
                producer = %producer_msg.full_name,
                %verdict,
                "Compared messages"
            );
        }
        result
    }

    /// Compares two enums by the set of their value numbers. Value names and
    /// aliases carry no wire meaning and are ignored.
    pub fn compare_enum(&mut self, consumer: EnumId, producer: EnumId) -> Result<Compatibility> {
        let consumer_enum = self.consumer.tree.enumeration(consumer);
        let producer_enum = self.producer.tree.enumeration(producer);

        let consumer_numbers: Vec<i32> = consumer_enum
            .values
            .iter()
            .map(|value| value.number)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let producer_numbers: Vec<i32> = producer_enum
            .values
            .iter()
            .map(|value| value.number)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        compare_keyed(
            "enum value",
            &consumer_numbers,
            &producer_numbers,
            |number| *number,
            |_, _| Ok(Compatibility::Equal),
        )
    }
}
