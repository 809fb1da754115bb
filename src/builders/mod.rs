//! Per-call calldata builders
//!
//! Each builder validates its whole parameter set first, reporting every
//! violated constraint in one [`ValidationError`], and only then encodes.
//! A failed build never yields partial calldata.
//!
//! - `bridge` - bridge tokens to a destination chain
//! - `staking` - delegate stake and claim
//! - `governance` - vote on and create proposals

pub mod bridge;
pub mod governance;
pub mod staking;

pub use bridge::{encode_bridge, BridgeParams, BRIDGE_EXTRA_DATA_OFFSET};
pub use governance::{
    encode_create_proposal, encode_vote, ProposalOffsets, ProposalParams, VoteParams,
    PROPOSAL_HEAD_SIZE, VOTE_REASON_OFFSET,
};
pub use staking::{
    encode_claim, encode_delegate, ClaimParams, DelegateParams, DEFAULT_STAKE_DENOM,
    DELEGATE_DENOM_OFFSET,
};

use alloy::primitives::U256;

use crate::error::ValidationError;
use crate::word::{parse_address, parse_uint};

/// Collects violations across all fields of one builder call
#[derive(Debug, Default)]
pub(crate) struct Checks {
    errors: ValidationError,
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn address(&mut self, field: &'static str, value: &str) {
        if let Err(e) = parse_address(value) {
            self.errors.push(field, e.to_string());
        }
    }

    /// Any integer in `0..=2^256-1`
    pub(crate) fn uint(&mut self, field: &'static str, value: &str) {
        if let Err(e) = parse_uint(value) {
            self.errors.push(field, e.to_string());
        }
    }

    /// Integer in `1..=2^256-1`
    pub(crate) fn positive_uint(&mut self, field: &'static str, value: &str) {
        match parse_uint(value) {
            Ok(v) if v == U256::ZERO => self.errors.push(field, "must be a positive integer"),
            Ok(_) => {}
            Err(e) => self.errors.push(field, e.to_string()),
        }
    }

    pub(crate) fn positive(&mut self, field: &'static str, value: u64) {
        if value == 0 {
            self.errors.push(field, "must be a positive integer");
        }
    }

    pub(crate) fn non_empty(&mut self, field: &'static str, value: &str) {
        if value.is_empty() {
            self.errors.push(field, "is required");
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        self.errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks_collect_everything() {
        let mut checks = Checks::new();
        checks.address("a", "0x1234");
        checks.positive_uint("b", "0");
        checks.positive_uint("c", "-3");
        checks.uint("d", "0");
        checks.positive("e", 0);
        checks.non_empty("f", "");

        let err = checks.finish().unwrap_err();
        assert_eq!(err.fields(), vec!["a", "b", "c", "e", "f"]);
    }
}
