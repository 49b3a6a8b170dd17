//! Cardinality policy shared by every keyed collection comparison.

use super::Compatibility;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::trace;

/// Compares two keyed collections.
///
/// With equal sizes every consumer element must find a producer element with
/// the same key. Otherwise the smaller side is iterated against the larger
/// one and a `SuperSet` (consumer larger) or `SubSet` (producer larger) marker
/// leads the aggregation. A key missing from the looked-up side is
/// `NotCompatible`. `compare` always receives `(consumer, producer)`.
pub fn compare_keyed<'t, T, K, E>(
    what: &'static str,
    consumer: &'t [T],
    producer: &'t [T],
    key: impl Fn(&'t T) -> K,
    mut compare: impl FnMut(&'t T, &'t T) -> Result<Compatibility, E>,
) -> Result<Compatibility, E>
where
    K: Eq + Hash + Debug,
{
    let (marker, iterated, indexed, consumer_iterated) = match consumer.len().cmp(&producer.len())
    {
        Ordering::Equal => (None, consumer, producer, true),
        Ordering::Greater => (Some(Compatibility::SuperSet), producer, consumer, false),
        Ordering::Less => (Some(Compatibility::SubSet), consumer, producer, true),
    };

    let mut index: HashMap<K, &'t T> = HashMap::with_capacity(indexed.len());
    for element in indexed {
        if let Entry::Vacant(slot) = index.entry(key(element)) {
            slot.insert(element);
        }
    }

    let elements = iterated.iter().map(|element| {
        let element_key = key(element);
        match index.get(&element_key) {
            Some(&other) if consumer_iterated => compare(element, other),
            Some(&other) => compare(other, element),
            None => {
                trace!(what, key = ?element_key, "No counterpart on the other side");
                Ok(Compatibility::NotCompatible)
            }
        }
    });

    Compatibility::try_aggregate(marker.map(Ok).into_iter().chain(elements))
}
