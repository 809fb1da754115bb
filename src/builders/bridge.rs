//! Bridge calldata
//!
//! ```text
//! bridge(uint256 destChainId, string extraData, address token, uint256 amountWei, uint256 feeOrGas)
//! selector 0x7ae4a8ff
//! ```
//!
//! `extraData` sits second in declaration order, so its offset word is the
//! second head word while its bytes follow all five head words.

use crate::error::{CalldataError, ValidationError};
use crate::frame::{Arg, CallFrame, CallKind};
use crate::word::{encode_address, encode_string, encode_uint};

use super::Checks;

/// Offset of `extraData`: five head words
pub const BRIDGE_EXTRA_DATA_OFFSET: usize = 160;

const _: () = assert!(CallKind::Bridge.head_size() == BRIDGE_EXTRA_DATA_OFFSET);

/// Parameters for a bridge transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeParams {
    /// Destination chain id, e.g. `11155111` for Sepolia
    pub dest_chain_id: u64,
    /// Token contract on the source chain
    pub token: String,
    /// Amount in wei
    pub amount_wei: String,
    /// Fee or destination gas budget in wei
    pub fee_or_gas: String,
    /// Recipient address on the destination chain, as hex text
    pub extra_data: String,
}

impl BridgeParams {
    pub fn new(
        dest_chain_id: u64,
        token: impl Into<String>,
        amount_wei: impl Into<String>,
        fee_or_gas: impl Into<String>,
        extra_data: impl Into<String>,
    ) -> Self {
        Self {
            dest_chain_id,
            token: token.into(),
            amount_wei: amount_wei.into(),
            fee_or_gas: fee_or_gas.into(),
            extra_data: extra_data.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks.positive("dest_chain_id", self.dest_chain_id);
        checks.address("token", &self.token);
        checks.positive_uint("amount_wei", &self.amount_wei);
        checks.positive_uint("fee_or_gas", &self.fee_or_gas);
        checks.address("extra_data", &self.extra_data);
        checks.finish()
    }
}

/// Build bridge calldata
pub fn encode_bridge(params: &BridgeParams) -> Result<CallFrame, CalldataError> {
    params.validate()?;

    let frame = CallFrame::encode(
        CallKind::Bridge,
        vec![
            Arg::Word(encode_uint(params.dest_chain_id)?),
            Arg::Dynamic(encode_string(&params.extra_data)),
            Arg::Word(encode_address(&params.token)?),
            Arg::Word(encode_uint(params.amount_wei.as_str())?),
            Arg::Word(encode_uint(params.fee_or_gas.as_str())?),
        ],
    )?;

    tracing::debug!(
        kind = %CallKind::Bridge,
        dest_chain_id = params.dest_chain_id,
        token = %params.token,
        bytes = frame.len(),
        "Built calldata"
    );

    Ok(frame)
}
