//! The four-value compatibility lattice and its aggregation rule.

use serde::{Deserialize, Serialize};

/// Verdict of comparing a consumer schema element with a producer one.
///
/// `Equal` is the identity of aggregation and `NotCompatible` absorbs
/// everything. `SuperSet` and `SubSet` each combine with themselves and with
/// `Equal`, but together they are `NotCompatible`: a consumer cannot have both
/// more and less structure than the same producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compatibility {
    /// Both sides declare the same wire structure.
    Equal,
    /// The consumer declares strictly more structure than the producer.
    SuperSet,
    /// The consumer declares strictly less structure than the producer.
    SubSet,
    /// The two sides cannot interoperate.
    NotCompatible,
}

impl Compatibility {
    /// Combines two verdicts.
    pub fn merge(self, other: Compatibility) -> Compatibility {
        use Compatibility::*;
        match (self, other) {
            (NotCompatible, _) | (_, NotCompatible) => NotCompatible,
            (SuperSet, SubSet) | (SubSet, SuperSet) => NotCompatible,
            (Equal, other) => other,
            (current, _) => current,
        }
    }

    /// Folds a sequence of verdicts, starting from `Equal`.
    ///
    /// Stops pulling from the iterator at the first `NotCompatible`, whether
    /// it appears in the input or arises from a `SuperSet`/`SubSet` conflict.
    pub fn aggregate<I>(results: I) -> Compatibility
    where
        I: IntoIterator<Item = Compatibility>,
    {
        let mut aggregated = Compatibility::Equal;
        for result in results {
            aggregated = aggregated.merge(result);
            if aggregated == Compatibility::NotCompatible {
                break;
            }
        }
        aggregated
    }

    /// [`aggregate`](Self::aggregate) over fallible results; the first error
    /// is returned as is.
    pub fn try_aggregate<I, E>(results: I) -> Result<Compatibility, E>
    where
        I: IntoIterator<Item = Result<Compatibility, E>>,
    {
        let mut aggregated = Compatibility::Equal;
        for result in results {
            aggregated = aggregated.merge(result?);
            if aggregated == Compatibility::NotCompatible {
                break;
            }
        }
        Ok(aggregated)
    }

    /// `true` unless the verdict is `NotCompatible`.
    pub fn is_compatible(&self) -> bool {
        *self != Compatibility::NotCompatible
    }

    /// Stable string identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Compatibility::Equal => "EQUAL",
            Compatibility::SuperSet => "SUPERSET",
            Compatibility::SubSet => "SUBSET",
            Compatibility::NotCompatible => "NOT_COMPATIBLE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Compatibility::Equal => "Consumer and producer declare the same wire structure.",
            Compatibility::SuperSet => {
                "Consumer declares more structure than producer; every producer element is satisfied."
            }
            Compatibility::SubSet => {
                "Consumer declares less structure than producer; every consumer element is satisfied."
            }
            Compatibility::NotCompatible => "Consumer and producer cannot interoperate.",
        }
    }

    /// Parse from string ID
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "EQUAL" => Some(Compatibility::Equal),
            "SUPERSET" => Some(Compatibility::SuperSet),
            "SUBSET" => Some(Compatibility::SubSet),
            "NOT_COMPATIBLE" => Some(Compatibility::NotCompatible),
            _ => None,
        }
    }

    pub fn all() -> [Compatibility; 4] {
        [
            Compatibility::Equal,
            Compatibility::SuperSet,
            Compatibility::SubSet,
            Compatibility::NotCompatible,
        ]
    }
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Compatibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown compatibility result: {s}"))
    }
}
