//! Pipeline Stages
//!
//! The five fixed stages a client can occupy, and the linear
//! advance/revert flow between the first four. Lost sits outside the
//! flow and is only reachable by dropping a card onto its column.

use serde::{Deserialize, Serialize};

/// Pipeline stage of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    New,
    Contacted,
    Proposal,
    Closed,
    /// Outside the advance/revert flow; drag-only
    Lost,
}

impl Stage {
    /// All stages in board column order
    pub const ALL: [Stage; 5] = [
        Stage::New,
        Stage::Contacted,
        Stage::Proposal,
        Stage::Closed,
        Stage::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::Contacted => "contacted",
            Stage::Proposal => "proposal",
            Stage::Closed => "closed",
            Stage::Lost => "lost",
        }
    }

    /// Parse a stored stage value. Anything unrecognized maps to New.
    pub fn from_str(s: &str) -> Self {
        match s {
            "contacted" => Stage::Contacted,
            "proposal" => Stage::Proposal,
            "closed" => Stage::Closed,
            "lost" => Stage::Lost,
            _ => Stage::New,
        }
    }

    /// Index used to group board columns when sorting
    pub fn order_index(self) -> usize {
        match self {
            Stage::New => 0,
            Stage::Contacted => 1,
            Stage::Proposal => 2,
            Stage::Closed => 3,
            Stage::Lost => 4,
        }
    }

    /// Next stage in the flow. Closed has no forward edge; Lost is
    /// outside the flow. Both return self.
    pub fn advance(self) -> Stage {
        match self {
            Stage::New => Stage::Contacted,
            Stage::Contacted => Stage::Proposal,
            Stage::Proposal => Stage::Closed,
            Stage::Closed => Stage::Closed,
            Stage::Lost => Stage::Lost,
        }
    }

    /// Previous stage in the flow. New has no backward edge; Lost is
    /// outside the flow. Both return self.
    pub fn revert(self) -> Stage {
        match self {
            Stage::New => Stage::New,
            Stage::Contacted => Stage::New,
            Stage::Proposal => Stage::Contacted,
            Stage::Closed => Stage::Proposal,
            Stage::Lost => Stage::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_walks_the_chain() {
        let mut stage = Stage::New;
        stage = stage.advance();
        assert_eq!(stage, Stage::Contacted);
        stage = stage.advance();
        assert_eq!(stage, Stage::Proposal);
        stage = stage.advance();
        assert_eq!(stage, Stage::Closed);
        // No forward edge past Closed
        assert_eq!(stage.advance(), Stage::Closed);
    }

    #[test]
    fn test_revert_walks_the_chain_backwards() {
        assert_eq!(Stage::Closed.revert(), Stage::Proposal);
        assert_eq!(Stage::Proposal.revert(), Stage::Contacted);
        assert_eq!(Stage::Contacted.revert(), Stage::New);
        assert_eq!(Stage::New.revert(), Stage::New);
    }

    #[test]
    fn test_lost_is_outside_the_flow() {
        assert_eq!(Stage::Lost.advance(), Stage::Lost);
        assert_eq!(Stage::Lost.revert(), Stage::Lost);
    }

    #[test]
    fn test_stage_string_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_str(stage.as_str()), stage);
        }
        // Unknown values default to New
        assert_eq!(Stage::from_str("archived"), Stage::New);
        assert_eq!(Stage::from_str(""), Stage::New);
    }
}
