//! Transaction parameters handed to the signer
//!
//! Nothing here signs or submits; the external submitter owns nonces, gas
//! pricing and broadcast.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use serde::Serialize;

use crate::error::EncodingError;
use crate::frame::CallFrame;
use crate::word::parse_address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    pub target_contract: Address,
    pub calldata: CallFrame,
    pub gas_limit: u64,
    pub nonce: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

impl TransactionParams {
    pub fn new(
        target_contract: &str,
        calldata: CallFrame,
        gas_limit: u64,
        nonce: u64,
    ) -> Result<Self, EncodingError> {
        Ok(Self {
            target_contract: parse_address(target_contract)?,
            calldata,
            gas_limit,
            nonce,
            value: None,
        })
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Convert into an alloy request for a signer/provider
    pub fn into_request(self) -> TransactionRequest {
        let request = TransactionRequest::default()
            .with_to(self.target_contract)
            .with_input(self.calldata)
            .with_gas_limit(self.gas_limit)
            .with_nonce(self.nonce);

        match self.value {
            Some(value) => request.with_value(value),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{encode_claim, ClaimParams};
    use alloy::primitives::TxKind;

    const CONTRACT: &str = "0x0000000000000000000000000000000000000800";
    const WALLET: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_into_request() {
        let calldata = encode_claim(&ClaimParams::new(WALLET, "1")).unwrap();
        let expected_input = calldata.as_bytes().to_vec();

        let request = TransactionParams::new(CONTRACT, calldata, 300_000, 7)
            .unwrap()
            .with_value(U256::from(5))
            .into_request();

        assert_eq!(
            request.to,
            Some(TxKind::Call(parse_address(CONTRACT).unwrap()))
        );
        assert_eq!(request.gas, Some(300_000));
        assert_eq!(request.nonce, Some(7));
        assert_eq!(request.value, Some(U256::from(5)));
        assert_eq!(
            request.input.input().map(|b| b.to_vec()),
            Some(expected_input)
        );
    }

    #[test]
    fn test_serializes_calldata_as_hex() {
        let calldata = encode_claim(&ClaimParams::new(WALLET, "1")).unwrap();
        let hex = calldata.to_hex();
        let params = TransactionParams::new(CONTRACT, calldata, 21_000, 0).unwrap();

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["calldata"], hex);
        assert_eq!(json["gasLimit"], 21_000);
        assert!(json.get("value").is_none());
    }

    #[test]
    fn test_rejects_bad_target() {
        let calldata = encode_claim(&ClaimParams::new(WALLET, "1")).unwrap();
        assert!(TransactionParams::new("0xabc", calldata, 21_000, 0).is_err());
    }
}
