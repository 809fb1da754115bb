//! Call frames: selector + static head + dynamic tail
//!
//! A [`CallKind`] names one contract call shape and carries its 4-byte
//! selector and parameter layout. [`CallFrame::encode`] lays out the head and
//! tail for a kind; the offset written for each dynamic parameter is the byte
//! position, counted from just after the selector, where that parameter's
//! length word starts.
//!
//! ## Layout
//!
//! ```text
//! | selector (4) | head: one word per param (32 * n) | tail: dynamic fields in order |
//! ```

use std::fmt;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Serialize, Serializer};
use tiny_keccak::{Hasher, Keccak};

use crate::error::EncodingError;
use crate::word::{round_up_to_word, EncodedDynamicField, EncodedWord, WORD_SIZE};

// ============================================================================
// Call Kinds
// ============================================================================

/// ABI parameter type as far as the head/tail split is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Uint,
    Address,
    Bool,
    String,
}

impl ParamKind {
    /// Whether the parameter lives in the tail behind an offset word
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, ParamKind::String)
    }
}

/// Contract call shapes this crate can encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `(uint destChainId, string extraData@offset, address token, uint amountWei, uint feeOrGas)`
    Bridge,
    /// `(address delegator, address validator, uint amount, string denom)`
    Delegate,
    /// `(address delegator, uint amountOrId)`
    Claim,
    /// `(address voter, uint proposalId, bool support, string reason)`
    Vote,
    /// `(string title, string description, string messages, uint deposit, address proposer)`
    CreateProposal,
}

const BRIDGE_LAYOUT: &[ParamKind] = &[
    ParamKind::Uint,
    ParamKind::String,
    ParamKind::Address,
    ParamKind::Uint,
    ParamKind::Uint,
];

const DELEGATE_LAYOUT: &[ParamKind] = &[
    ParamKind::Address,
    ParamKind::Address,
    ParamKind::Uint,
    ParamKind::String,
];

const CLAIM_LAYOUT: &[ParamKind] = &[ParamKind::Address, ParamKind::Uint];

const VOTE_LAYOUT: &[ParamKind] = &[
    ParamKind::Address,
    ParamKind::Uint,
    ParamKind::Bool,
    ParamKind::String,
];

const CREATE_PROPOSAL_LAYOUT: &[ParamKind] = &[
    ParamKind::String,
    ParamKind::String,
    ParamKind::String,
    ParamKind::Uint,
    ParamKind::Address,
];

impl CallKind {
    pub const ALL: [CallKind; 5] = [
        CallKind::Bridge,
        CallKind::Delegate,
        CallKind::Claim,
        CallKind::Vote,
        CallKind::CreateProposal,
    ];

    /// 4-byte function selector used by the target contract
    pub const fn selector(&self) -> [u8; 4] {
        match self {
            CallKind::Bridge => [0x7a, 0xe4, 0xa8, 0xff],
            CallKind::Delegate => [0xf5, 0xe5, 0x60, 0x40],
            CallKind::Claim => [0x2e, 0xfe, 0x8a, 0x5f],
            CallKind::Vote => [0x9e, 0xc4, 0xd3, 0x63],
            CallKind::CreateProposal => [0xcb, 0x0d, 0xdd, 0xfe],
        }
    }

    /// Parameter layout in declaration order
    pub const fn layout(&self) -> &'static [ParamKind] {
        match self {
            CallKind::Bridge => BRIDGE_LAYOUT,
            CallKind::Delegate => DELEGATE_LAYOUT,
            CallKind::Claim => CLAIM_LAYOUT,
            CallKind::Vote => VOTE_LAYOUT,
            CallKind::CreateProposal => CREATE_PROPOSAL_LAYOUT,
        }
    }

    /// Size of the static head in bytes; also the offset of the first tail field
    pub const fn head_size(&self) -> usize {
        self.layout().len() * WORD_SIZE
    }

    /// Offsets of the dynamic parameters, in declaration order
    ///
    /// `dynamic_lens` holds the raw byte length of each dynamic parameter.
    /// Each field starts right after the previous one's length word and
    /// padded data, the first one right after the head.
    pub fn tail_offsets(&self, dynamic_lens: &[usize]) -> Vec<usize> {
        let mut next = self.head_size();
        dynamic_lens
            .iter()
            .map(|len| {
                let offset = next;
                next += WORD_SIZE + round_up_to_word(*len);
                offset
            })
            .collect()
    }

    /// The kind whose selector is `selector`, if any
    pub fn from_selector(selector: [u8; 4]) -> Option<CallKind> {
        Self::ALL.into_iter().find(|kind| kind.selector() == selector)
    }

    /// Short name used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Bridge => "bridge",
            CallKind::Delegate => "delegate",
            CallKind::Claim => "claim",
            CallKind::Vote => "vote",
            CallKind::CreateProposal => "create_proposal",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute a selector from a canonical signature such as `transfer(address,uint256)`
pub fn selector_of(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak::v256();
    hasher.update(signature.as_bytes());
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    [output[0], output[1], output[2], output[3]]
}

/// Convert a selector to `0x`-prefixed hex
pub fn selector_to_hex(selector: &[u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

// ============================================================================
// Frame Assembly
// ============================================================================

/// One already-encoded argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Word(EncodedWord),
    Dynamic(EncodedDynamicField),
}

/// Complete calldata: selector followed by the ABI-encoded parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallFrame(Vec<u8>);

impl CallFrame {
    /// Lay out `args` for `kind`
    ///
    /// Fails if the argument count or any argument's static/dynamic shape
    /// disagrees with the kind's layout.
    pub fn encode(kind: CallKind, args: Vec<Arg>) -> Result<Self, EncodingError> {
        let layout = kind.layout();
        if args.len() != layout.len() {
            return Err(EncodingError::LayoutMismatch {
                kind,
                reason: format!("expected {} arguments, got {}", layout.len(), args.len()),
            });
        }

        let dynamic_lens: Vec<usize> = args
            .iter()
            .filter_map(|arg| match arg {
                Arg::Dynamic(field) => Some(field.byte_len()),
                Arg::Word(_) => None,
            })
            .collect();
        let mut offsets = kind.tail_offsets(&dynamic_lens).into_iter();

        let mut head = Vec::with_capacity(kind.head_size());
        let mut tail = Vec::new();

        for (index, (param, arg)) in layout.iter().zip(args).enumerate() {
            match (param.is_dynamic(), arg) {
                (false, Arg::Word(word)) => head.extend_from_slice(word.as_bytes()),
                (true, Arg::Dynamic(field)) => {
                    let offset = offsets.next().unwrap_or_default();
                    debug_assert_eq!(offset, kind.head_size() + tail.len());
                    head.extend_from_slice(EncodedWord::from_usize(offset).as_bytes());
                    field.write_to(&mut tail);
                }
                (dynamic, _) => {
                    return Err(EncodingError::LayoutMismatch {
                        kind,
                        reason: format!(
                            "argument {} must be {}",
                            index,
                            if dynamic { "dynamic" } else { "a single word" }
                        ),
                    });
                }
            }
        }

        let mut bytes = Vec::with_capacity(4 + head.len() + tail.len());
        bytes.extend_from_slice(&kind.selector());
        bytes.extend_from_slice(&head);
        bytes.extend_from_slice(&tail);
        Ok(CallFrame(bytes))
    }

    /// Parse `0x`-prefixed (or bare) hex calldata for inspection
    pub fn parse(calldata: &str) -> Result<Self, EncodingError> {
        let hex_str = calldata.strip_prefix("0x").unwrap_or(calldata);
        let bytes =
            hex::decode(hex_str).map_err(|e| EncodingError::Decode(format!("invalid hex: {}", e)))?;
        Self::from_bytes(bytes)
    }

    /// Wrap raw calldata, checking that the parameter area is word-aligned
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EncodingError> {
        if bytes.len() < 4 {
            return Err(EncodingError::Decode(format!(
                "calldata shorter than a selector: {} bytes",
                bytes.len()
            )));
        }
        if (bytes.len() - 4) % WORD_SIZE != 0 {
            return Err(EncodingError::Decode(format!(
                "parameter area is not word-aligned: {} bytes",
                bytes.len() - 4
            )));
        }
        Ok(CallFrame(bytes))
    }

    /// Raw calldata, selector included
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Total length in bytes, selector included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a frame built or parsed by this crate
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// The leading 4-byte function selector
    pub fn selector(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    /// The kind this frame's selector belongs to, if known
    pub fn kind(&self) -> Option<CallKind> {
        CallKind::from_selector(self.selector())
    }

    /// Parameter area (everything after the selector)
    pub fn params(&self) -> &[u8] {
        &self.0[4..]
    }

    /// Number of 32-byte words in the parameter area
    pub fn word_count(&self) -> usize {
        self.params().len() / WORD_SIZE
    }

    /// Word at `index` in the parameter area
    pub fn word(&self, index: usize) -> Result<EncodedWord, EncodingError> {
        self.word_at(index * WORD_SIZE)
    }

    fn word_at(&self, offset: usize) -> Result<EncodedWord, EncodingError> {
        let params = self.params();
        let end = offset
            .checked_add(WORD_SIZE)
            .filter(|end| *end <= params.len())
            .ok_or_else(|| {
                EncodingError::Decode(format!("word at byte {} is out of bounds", offset))
            })?;
        let mut word = [0u8; 32];
        word.copy_from_slice(&params[offset..end]);
        Ok(EncodedWord(word))
    }

    /// Head word `index` as an unsigned integer
    pub fn read_uint(&self, index: usize) -> Result<U256, EncodingError> {
        self.word(index).map(|w| w.to_u256())
    }

    /// Head word `index` as a bool; anything but 0 or 1 is rejected
    pub fn read_bool(&self, index: usize) -> Result<bool, EncodingError> {
        let value = self.read_uint(index)?;
        match value {
            v if v == U256::ZERO => Ok(false),
            v if v == U256::from(1) => Ok(true),
            v => Err(EncodingError::Decode(format!("word {} is not a bool: {}", index, v))),
        }
    }

    /// Head word `index` as an address; the 12 padding bytes must be zero
    pub fn read_address(&self, index: usize) -> Result<Address, EncodingError> {
        let word = self.word(index)?;
        if word.0[..12].iter().any(|&b| b != 0) {
            return Err(EncodingError::Decode(format!(
                "word {} has non-zero address padding",
                index
            )));
        }
        Ok(Address::from_slice(&word.0[12..]))
    }

    /// Follow the offset stored in head word `index` and read the bytes there
    pub fn read_dynamic(&self, index: usize) -> Result<Vec<u8>, EncodingError> {
        let offset = self.read_offset(index)?;
        let length = usize::try_from(self.word_at(offset)?.to_u256()).map_err(|_| {
            EncodingError::Decode(format!("length at byte {} does not fit usize", offset))
        })?;

        let start = offset + WORD_SIZE;
        let params = self.params();
        if length > params.len() {
            return Err(EncodingError::Decode(format!(
                "dynamic field at byte {} claims {} bytes",
                offset, length
            )));
        }
        let padded_end = start
            .checked_add(round_up_to_word(length))
            .filter(|end| *end <= params.len())
            .ok_or_else(|| {
                EncodingError::Decode(format!(
                    "dynamic field at byte {} overruns calldata ({} bytes)",
                    offset, length
                ))
            })?;

        if params[start + length..padded_end].iter().any(|&b| b != 0) {
            return Err(EncodingError::Decode(format!(
                "dynamic field at byte {} has non-zero padding",
                offset
            )));
        }

        Ok(params[start..start + length].to_vec())
    }

    /// Read a dynamic field as UTF-8 text
    pub fn read_string(&self, index: usize) -> Result<String, EncodingError> {
        let bytes = self.read_dynamic(index)?;
        String::from_utf8(bytes)
            .map_err(|e| EncodingError::Decode(format!("word {} is not UTF-8: {}", index, e)))
    }

    /// The byte offset stored in head word `index`
    pub fn read_offset(&self, index: usize) -> Result<usize, EncodingError> {
        usize::try_from(self.read_uint(index)?)
            .map_err(|_| EncodingError::Decode(format!("offset in word {} is too large", index)))
    }
}

impl fmt::Display for CallFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for CallFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<CallFrame> for Bytes {
    fn from(frame: CallFrame) -> Self {
        Bytes::from(frame.0)
    }
}

impl Serialize for CallFrame {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_hex().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{encode_address, encode_bool, encode_string, encode_uint};

    #[test]
    fn test_selector_of_known_signature() {
        assert_eq!(
            selector_to_hex(&selector_of("transfer(address,uint256)")),
            "0xa9059cbb"
        );
        assert_eq!(
            selector_to_hex(&selector_of("approve(address,uint256)")),
            "0x095ea7b3"
        );
    }

    #[test]
    fn test_head_sizes() {
        assert_eq!(CallKind::Bridge.head_size(), 160);
        assert_eq!(CallKind::Delegate.head_size(), 128);
        assert_eq!(CallKind::Claim.head_size(), 64);
        assert_eq!(CallKind::Vote.head_size(), 128);
        assert_eq!(CallKind::CreateProposal.head_size(), 160);
    }

    #[test]
    fn test_selector_lookup() {
        for kind in CallKind::ALL {
            assert_eq!(CallKind::from_selector(kind.selector()), Some(kind));
        }
        assert_eq!(CallKind::from_selector([0, 0, 0, 0]), None);
    }

    #[test]
    fn test_encode_claim_static_only() {
        let frame = CallFrame::encode(
            CallKind::Claim,
            vec![
                Arg::Word(encode_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap()),
                Arg::Word(encode_uint(3u8).unwrap()),
            ],
        )
        .unwrap();

        assert_eq!(
            frame.to_hex(),
            concat!(
                "0x2efe8a5f",
                "000000000000000000000000f39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                "0000000000000000000000000000000000000000000000000000000000000003",
            )
        );
        assert_eq!(frame.kind(), Some(CallKind::Claim));
    }

    #[test]
    fn test_encode_vote_offset_and_tail() {
        let frame = CallFrame::encode(
            CallKind::Vote,
            vec![
                Arg::Word(encode_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap()),
                Arg::Word(encode_uint(7u8).unwrap()),
                Arg::Word(encode_bool(true)),
                Arg::Dynamic(encode_string("yes")),
            ],
        )
        .unwrap();

        assert_eq!(
            frame.to_hex(),
            concat!(
                "0x9ec4d363",
                "000000000000000000000000f39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                "0000000000000000000000000000000000000000000000000000000000000007",
                "0000000000000000000000000000000000000000000000000000000000000001",
                "0000000000000000000000000000000000000000000000000000000000000080",
                "0000000000000000000000000000000000000000000000000000000000000003",
                "7965730000000000000000000000000000000000000000000000000000000000",
            )
        );
        assert_eq!(frame.read_string(3).unwrap(), "yes");
        assert!(frame.read_bool(2).unwrap());
    }

    #[test]
    fn test_tail_offsets_chain_through_padding() {
        assert_eq!(CallKind::Vote.tail_offsets(&[0]), vec![128]);
        assert_eq!(
            CallKind::CreateProposal.tail_offsets(&[1, 2, 50]),
            vec![160, 224, 288]
        );
        assert_eq!(
            CallKind::CreateProposal.tail_offsets(&[32, 33, 0]),
            vec![160, 224, 320]
        );
    }

    #[test]
    fn test_unaligned_dynamic_field_never_reaches_a_frame() {
        let unaligned = EncodedDynamicField::from_parts(EncodedWord::from_usize(3), b"yes".to_vec());
        assert!(matches!(unaligned, Err(EncodingError::MalformedField(_))));

        let field = EncodedDynamicField::from_parts(
            EncodedWord::from_usize(3),
            encode_string("yes").padded_data().to_vec(),
        )
        .unwrap();
        let frame = CallFrame::encode(
            CallKind::Vote,
            vec![
                Arg::Word(EncodedWord::ZERO),
                Arg::Word(encode_uint(1u8).unwrap()),
                Arg::Word(encode_bool(false)),
                Arg::Dynamic(field),
            ],
        )
        .unwrap();

        assert_eq!(frame.params().len() % WORD_SIZE, 0);
        assert_eq!(CallFrame::parse(&frame.to_hex()).unwrap(), frame);
        assert_eq!(frame.read_string(3).unwrap(), "yes");
    }

    #[test]
    fn test_encode_rejects_wrong_arity() {
        let result = CallFrame::encode(CallKind::Claim, vec![Arg::Word(EncodedWord::ZERO)]);
        assert!(matches!(result, Err(EncodingError::LayoutMismatch { .. })));
    }

    #[test]
    fn test_encode_rejects_wrong_shape() {
        let result = CallFrame::encode(
            CallKind::Claim,
            vec![Arg::Word(EncodedWord::ZERO), Arg::Dynamic(encode_string("x"))],
        );
        assert!(matches!(result, Err(EncodingError::LayoutMismatch { .. })));
    }

    #[test]
    fn test_parse_round_trip_and_errors() {
        let frame = CallFrame::encode(
            CallKind::Claim,
            vec![Arg::Word(EncodedWord::ZERO), Arg::Word(EncodedWord::ZERO)],
        )
        .unwrap();
        let parsed = CallFrame::parse(&frame.to_hex()).unwrap();
        assert_eq!(parsed, frame);

        assert!(CallFrame::parse("0x1234").is_err());
        assert!(CallFrame::parse("0x2efe8a5f00").is_err());
        assert!(CallFrame::parse("0xnothex!").is_err());
    }

    #[test]
    fn test_read_out_of_bounds() {
        let frame = CallFrame::parse("0x2efe8a5f").unwrap();
        assert_eq!(frame.word_count(), 0);
        assert!(frame.word(0).is_err());
        assert!(frame.read_string(0).is_err());
    }

    #[test]
    fn test_read_address_rejects_dirty_padding() {
        let frame = CallFrame::encode(
            CallKind::Claim,
            vec![Arg::Word(EncodedWord([0xff; 32])), Arg::Word(EncodedWord::ZERO)],
        )
        .unwrap();
        assert!(frame.read_address(0).is_err());
    }
}
