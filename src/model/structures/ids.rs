use serde::{Deserialize, Serialize};

/// Position of a competitor in the engine's registry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompetitorId(pub usize);

/// Position of an observation in the engine's observation list.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationId(pub usize);

/// Weak reference to a rating node: the owning competitor plus the node's
/// index in that competitor's chain. Nodes are never removed, so a stored
/// reference always resolves to the node it was taken from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub competitor: CompetitorId,
    pub index: usize
}
