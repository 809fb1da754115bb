//! Delegation and claim calldata
//!
//! ```text
//! delegate(address delegator, address validator, uint256 amount, string denom)  0xf5e56040
//! claim(address delegator, uint256 amountOrId)                                    0x2efe8a5f
//! ```
//!
//! Amounts are taken in the smallest unit. Use [`crate::word::to_base_units`]
//! beforehand when starting from a human-readable figure.

use crate::error::{CalldataError, ValidationError};
use crate::frame::{Arg, CallFrame, CallKind};
use crate::word::{encode_address, encode_string, encode_uint};

use super::Checks;

/// Staking denomination used when the caller does not supply one
pub const DEFAULT_STAKE_DENOM: &str = "ahelios";

/// Offset of `denom`: four head words
pub const DELEGATE_DENOM_OFFSET: usize = 128;

const _: () = assert!(CallKind::Delegate.head_size() == DELEGATE_DENOM_OFFSET);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateParams {
    pub delegator: String,
    pub validator: String,
    /// Amount in the smallest unit
    pub amount: String,
    /// Falls back to [`DEFAULT_STAKE_DENOM`]
    pub denom: Option<String>,
}

impl DelegateParams {
    pub fn new(
        delegator: impl Into<String>,
        validator: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            delegator: delegator.into(),
            validator: validator.into(),
            amount: amount.into(),
            denom: None,
        }
    }

    pub fn with_denom(mut self, denom: impl Into<String>) -> Self {
        self.denom = Some(denom.into());
        self
    }

    /// The denomination that will be encoded
    pub fn denom(&self) -> &str {
        self.denom.as_deref().unwrap_or(DEFAULT_STAKE_DENOM)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks.address("delegator", &self.delegator);
        checks.address("validator", &self.validator);
        checks.positive_uint("amount", &self.amount);
        checks.non_empty("denom", self.denom());
        checks.finish()
    }
}

/// Build delegate calldata
pub fn encode_delegate(params: &DelegateParams) -> Result<CallFrame, CalldataError> {
    params.validate()?;

    let frame = CallFrame::encode(
        CallKind::Delegate,
        vec![
            Arg::Word(encode_address(&params.delegator)?),
            Arg::Word(encode_address(&params.validator)?),
            Arg::Word(encode_uint(params.amount.as_str())?),
            Arg::Dynamic(encode_string(params.denom())),
        ],
    )?;

    tracing::debug!(
        kind = %CallKind::Delegate,
        validator = %params.validator,
        denom = params.denom(),
        bytes = frame.len(),
        "Built calldata"
    );

    Ok(frame)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimParams {
    pub delegator: String,
    /// Reward amount or entry id; zero is allowed
    pub amount_or_id: String,
}

impl ClaimParams {
    pub fn new(delegator: impl Into<String>, amount_or_id: impl Into<String>) -> Self {
        Self {
            delegator: delegator.into(),
            amount_or_id: amount_or_id.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks.address("delegator", &self.delegator);
        checks.uint("amount_or_id", &self.amount_or_id);
        checks.finish()
    }
}

/// Build claim calldata; static head only
pub fn encode_claim(params: &ClaimParams) -> Result<CallFrame, CalldataError> {
    params.validate()?;

    let frame = CallFrame::encode(
        CallKind::Claim,
        vec![
            Arg::Word(encode_address(&params.delegator)?),
            Arg::Word(encode_uint(params.amount_or_id.as_str())?),
        ],
    )?;

    tracing::debug!(kind = %CallKind::Claim, bytes = frame.len(), "Built calldata");

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELEGATOR: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const VALIDATOR: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    #[test]
    fn test_delegate_default_denom() {
        let frame = encode_delegate(&DelegateParams::new(
            DELEGATOR,
            VALIDATOR,
            "1000000000000000000",
        ))
        .unwrap();

        assert!(frame.to_hex().starts_with("0xf5e56040"));
        assert_eq!(frame.read_offset(3).unwrap(), DELEGATE_DENOM_OFFSET);
        assert_eq!(frame.read_string(3).unwrap(), DEFAULT_STAKE_DENOM);
        assert_eq!(frame.read_uint(2).unwrap().to_string(), "1000000000000000000");
        // 4 head words + length word + one data word
        assert_eq!(frame.len(), 4 + 6 * 32);
    }

    #[test]
    fn test_delegate_custom_denom() {
        let params = DelegateParams::new(DELEGATOR, VALIDATOR, "5").with_denom("ustake");
        let frame = encode_delegate(&params).unwrap();
        assert_eq!(frame.read_string(3).unwrap(), "ustake");
    }

    #[test]
    fn test_delegate_validation() {
        let params = DelegateParams::new(DELEGATOR, "0x1234", "0").with_denom("");
        let err = encode_delegate(&params).unwrap_err();
        let report = err.as_validation().unwrap();
        assert_eq!(report.fields(), vec!["validator", "amount", "denom"]);
    }

    #[test]
    fn test_claim_exact_bytes() {
        let frame = encode_claim(&ClaimParams::new(DELEGATOR, "0")).unwrap();
        assert_eq!(
            frame.to_hex(),
            concat!(
                "0x2efe8a5f",
                "000000000000000000000000f39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                "0000000000000000000000000000000000000000000000000000000000000000",
            )
        );
    }

    #[test]
    fn test_claim_rejects_negative() {
        let err = encode_claim(&ClaimParams::new(DELEGATOR, "-1")).unwrap_err();
        assert_eq!(err.as_validation().unwrap().fields(), vec!["amount_or_id"]);
    }
}
