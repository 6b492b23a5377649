use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How chains read their opponents' strengths during one pass.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UpdateSchedule {
    /// Chains are updated one after another in registration order. A chain
    /// sees the strengths its opponents hold at the moment it rebuilds its
    /// likelihood terms, so earlier chains in the pass are already updated.
    #[default]
    Sequential,
    /// Every chain reads a snapshot taken before the pass and chains are
    /// updated in parallel. The pass ends once all of them are done.
    Simultaneous
}
