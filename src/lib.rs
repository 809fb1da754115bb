//! calldata-rs: hand-rolled ABI calldata for testnet automation
//!
//! Builds raw contract-call payloads without a contract ABI definition:
//!
//! - **Word Encoder** - `uint256`/`address`/`bool` words and padded `string` fields
//! - **Call Frames** - selector plus head/tail layout per [`CallKind`]
//! - **Builders** - bridge, delegate, claim, vote and create-proposal calls
//! - **Transaction Params** - hand-off struct for an external signer
//!
//! Every builder is a pure function: identical inputs give byte-identical
//! output, and invalid inputs are reported in full before anything is encoded.
//!
//! ## Usage
//!
//! ```ignore
//! use calldata_rs::builders::{encode_vote, VoteParams};
//!
//! let params = VoteParams::new("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266", "12", true, "");
//! let calldata = encode_vote(&params)?;
//! println!("{}", calldata); // 0x9ec4d363...
//! ```

pub mod address;
pub mod builders;
pub mod config;
pub mod error;
pub mod frame;
pub mod tx;
pub mod word;

pub use builders::{
    encode_bridge, encode_claim, encode_create_proposal, encode_delegate, encode_vote,
    BridgeParams, ClaimParams, DelegateParams, ProposalOffsets, ProposalParams, VoteParams,
};
pub use error::{CalldataError, EncodingError, FieldViolation, ValidationError};
pub use frame::{selector_of, Arg, CallFrame, CallKind, ParamKind};
pub use tx::TransactionParams;
pub use word::{
    encode_address, encode_bool, encode_string, encode_uint, EncodedDynamicField, EncodedWord,
};
