//! the quorum evaluation engine.

use serde::{Deserialize, Serialize};
use tenderhub_types::{BidAuthor, Decision, DecisionCounters, OrganizationId};

use crate::error::{Error, Result};

/// upper bound on the number of approvals a bid needs.
pub const MAX_QUORUM: u32 = 3;

/// how the quorum size is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuorumPolicy {
    /// quorum follows the membership of the deciding organization at the
    /// moment each decision is submitted. adding or removing responsible
    /// users changes the threshold for bids that are still open.
    #[default]
    LiveMembership,
}

/// decision state of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuorumState {
    /// no rejection and fewer approvals than the quorum.
    Open,
    /// approvals reached the quorum. terminal.
    Approved,
    /// at least one rejection. terminal.
    Rejected,
}

/// outcome of accepting a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// counters to persist.
    pub counters: DecisionCounters,
    /// whether the parent tender must be closed along with the counter write.
    pub closes_tender: bool,
}

/// stateless decision evaluator.
///
/// all methods take &self and touch no shared state, so a single engine is
/// shared across request handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuorumEngine {
    policy: QuorumPolicy,
}

impl QuorumEngine {
    /// create an engine with the given policy.
    pub fn new(policy: QuorumPolicy) -> Self {
        Self { policy }
    }

    /// pick the organization whose responsible users decide on a bid.
    ///
    /// an organization author decides for itself. a user author is
    /// represented by the organizations they are responsible for; the
    /// lowest organization id wins so repeated calls agree.
    pub fn deciding_organization(
        &self,
        author: BidAuthor,
        memberships: &[OrganizationId],
    ) -> Result<OrganizationId> {
        match author {
            BidAuthor::Organization(org_id) => Ok(org_id),
            BidAuthor::User(_) => memberships.iter().min().copied().ok_or(Error::NoOrganization),
        }
    }

    /// approvals needed given the number of responsible users.
    pub fn quorum(&self, organization_id: OrganizationId, responsible: usize) -> Result<u32> {
        match self.policy {
            QuorumPolicy::LiveMembership => {
                if responsible == 0 {
                    return Err(Error::NoResponsibleUsers(organization_id));
                }
                let responsible = u32::try_from(responsible).unwrap_or(u32::MAX);
                Ok(responsible.min(MAX_QUORUM))
            }
        }
    }

    /// classify counters against a quorum.
    pub fn state(&self, counters: DecisionCounters, quorum: u32) -> QuorumState {
        if counters.rejections > 0 {
            QuorumState::Rejected
        } else if counters.approvals >= quorum {
            QuorumState::Approved
        } else {
            QuorumState::Open
        }
    }

    /// accept `decision` on top of `counters`, or refuse it if the bid is final.
    pub fn evaluate(
        &self,
        counters: DecisionCounters,
        quorum: u32,
        decision: Decision,
    ) -> Result<Verdict> {
        match self.state(counters, quorum) {
            QuorumState::Rejected => return Err(Error::AlreadyRejected),
            QuorumState::Approved => return Err(Error::AlreadyApproved),
            QuorumState::Open => {}
        }

        let counters = counters.record(decision);
        let closes_tender =
            decision == Decision::Approved && self.state(counters, quorum) == QuorumState::Approved;

        Ok(Verdict {
            counters,
            closes_tender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderhub_types::UserId;
    use uuid::Uuid;

    fn org(n: u128) -> OrganizationId {
        OrganizationId(Uuid::from_u128(n))
    }

    fn counters(approvals: u32, rejections: u32) -> DecisionCounters {
        DecisionCounters {
            approvals,
            rejections,
        }
    }

    #[test]
    fn test_quorum_is_capped_at_three() {
        let engine = QuorumEngine::default();
        assert_eq!(engine.quorum(org(1), 1), Ok(1));
        assert_eq!(engine.quorum(org(1), 2), Ok(2));
        assert_eq!(engine.quorum(org(1), 3), Ok(3));
        assert_eq!(engine.quorum(org(1), 5), Ok(3));
    }

    #[test]
    fn test_quorum_requires_responsible_users() {
        let engine = QuorumEngine::default();
        assert_eq!(
            engine.quorum(org(7), 0),
            Err(Error::NoResponsibleUsers(org(7)))
        );
    }

    #[test]
    fn test_organization_author_decides_for_itself() {
        let engine = QuorumEngine::default();
        let author = BidAuthor::Organization(org(9));
        assert_eq!(engine.deciding_organization(author, &[]), Ok(org(9)));
    }

    #[test]
    fn test_user_author_picks_lowest_organization() {
        let engine = QuorumEngine::default();
        let author = BidAuthor::User(UserId::new_v4());
        assert_eq!(
            engine.deciding_organization(author, &[org(5), org(2), org(8)]),
            Ok(org(2))
        );
        assert_eq!(
            engine.deciding_organization(author, &[]),
            Err(Error::NoOrganization)
        );
    }

    #[test]
    fn test_state_classification() {
        let engine = QuorumEngine::default();
        assert_eq!(engine.state(counters(0, 0), 2), QuorumState::Open);
        assert_eq!(engine.state(counters(1, 0), 2), QuorumState::Open);
        assert_eq!(engine.state(counters(2, 0), 2), QuorumState::Approved);
        assert_eq!(engine.state(counters(1, 1), 2), QuorumState::Rejected);
    }

    #[test]
    fn test_approval_reaching_quorum_closes_tender() {
        let engine = QuorumEngine::default();

        let first = engine
            .evaluate(counters(0, 0), 2, Decision::Approved)
            .unwrap();
        assert_eq!(first.counters, counters(1, 0));
        assert!(!first.closes_tender);

        let second = engine
            .evaluate(first.counters, 2, Decision::Approved)
            .unwrap();
        assert_eq!(second.counters, counters(2, 0));
        assert!(second.closes_tender);

        assert_eq!(
            engine.evaluate(second.counters, 2, Decision::Rejected),
            Err(Error::AlreadyApproved)
        );
    }

    #[test]
    fn test_rejection_is_final() {
        let engine = QuorumEngine::default();
        let verdict = engine
            .evaluate(counters(1, 0), 3, Decision::Rejected)
            .unwrap();
        assert_eq!(verdict.counters, counters(1, 1));
        assert!(!verdict.closes_tender);

        for decision in [Decision::Approved, Decision::Rejected] {
            assert_eq!(
                engine.evaluate(verdict.counters, 3, decision),
                Err(Error::AlreadyRejected)
            );
        }
    }

    #[test]
    fn test_shrunk_membership_locks_bid() {
        // two approvals were enough once the org lost its third member
        let engine = QuorumEngine::default();
        assert_eq!(
            engine.evaluate(counters(2, 0), 2, Decision::Approved),
            Err(Error::AlreadyApproved)
        );
    }
}
