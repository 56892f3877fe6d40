//! bid decisions and the counters they accumulate.

use serde::{Deserialize, Serialize};

use crate::macros::string_enum;

string_enum!(
    /// a responsible user's verdict on a bid.
    Decision, InvalidDecision {
        Approved,
        Rejected,
    }
);

/// approval and rejection tallies of a bid.
///
/// counters live beside the bid row but are not part of its versioned
/// attributes, so rollbacks never touch them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionCounters {
    pub approvals: u32,
    pub rejections: u32,
}

impl DecisionCounters {
    /// counters after recording `decision`.
    pub fn record(self, decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self {
                approvals: self.approvals + 1,
                ..self
            },
            Decision::Rejected => Self {
                rejections: self.rejections + 1,
                ..self
            },
        }
    }
}
