//! Governance calldata
//!
//! ```text
//! vote(address voter, uint256 proposalId, bool support, string reason)                      0x9ec4d363
//! createProposal(string title, string description, string messages, uint256 deposit, address proposer)  0xcb0dddfe
//! ```
//!
//! ## Proposal offsets
//!
//! The three proposal strings are laid out back to back after the 5-word
//! head, so each offset depends on the padded size of everything before it:
//!
//! ```text
//! title       = 160
//! description = title       + 32 + roundUp32(len(title))
//! messages    = description + 32 + roundUp32(len(description))
//! ```
//!
//! The `messages` field carries a JSON array of message objects encoded as one
//! plain string, not as an ABI array. The receiving contract parses the JSON
//! itself.

use alloy::primitives::Address;
use serde_json::Value;

use crate::error::{CalldataError, EncodingError, ValidationError};
use crate::frame::{Arg, CallFrame, CallKind};
use crate::word::{address_word, encode_address, encode_bool, encode_string, encode_uint};

use super::Checks;

/// Offset of `reason`: four head words
pub const VOTE_REASON_OFFSET: usize = 128;

/// Head size of a create-proposal frame: five words
pub const PROPOSAL_HEAD_SIZE: usize = 160;

const _: () = assert!(CallKind::Vote.head_size() == VOTE_REASON_OFFSET);
const _: () = assert!(CallKind::CreateProposal.head_size() == PROPOSAL_HEAD_SIZE);

// ============================================================================
// Vote
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteParams {
    pub voter: String,
    pub proposal_id: String,
    pub support: bool,
    /// May be empty
    pub reason: String,
}

impl VoteParams {
    pub fn new(
        voter: impl Into<String>,
        proposal_id: impl Into<String>,
        support: bool,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            voter: voter.into(),
            proposal_id: proposal_id.into(),
            support,
            reason: reason.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks.address("voter", &self.voter);
        checks.positive_uint("proposal_id", &self.proposal_id);
        checks.finish()
    }
}

/// Build vote calldata
pub fn encode_vote(params: &VoteParams) -> Result<CallFrame, CalldataError> {
    params.validate()?;

    let frame = CallFrame::encode(
        CallKind::Vote,
        vec![
            Arg::Word(encode_address(&params.voter)?),
            Arg::Word(encode_uint(params.proposal_id.as_str())?),
            Arg::Word(encode_bool(params.support)),
            Arg::Dynamic(encode_string(&params.reason)),
        ],
    )?;

    tracing::debug!(
        kind = %CallKind::Vote,
        proposal_id = %params.proposal_id,
        support = params.support,
        bytes = frame.len(),
        "Built calldata"
    );

    Ok(frame)
}

// ============================================================================
// Create Proposal
// ============================================================================

/// Tail offsets of the three proposal strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalOffsets {
    pub title: usize,
    pub description: usize,
    pub messages: usize,
}

impl ProposalOffsets {
    /// Offsets for a proposal with the given title and description
    ///
    /// The messages length never moves any of the three offsets.
    pub fn compute(title: &str, description: &str) -> Self {
        let offsets = CallKind::CreateProposal.tail_offsets(&[title.len(), description.len(), 0]);
        Self {
            title: offsets[0],
            description: offsets[1],
            messages: offsets[2],
        }
    }

    /// Read the offsets back out of an encoded create-proposal frame
    pub fn from_frame(frame: &CallFrame) -> Result<Self, EncodingError> {
        Ok(Self {
            title: frame.read_offset(0)?,
            description: frame.read_offset(1)?,
            messages: frame.read_offset(2)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProposalParams {
    pub title: String,
    pub description: String,
    /// Message objects; serialized to a JSON array
    pub messages: Vec<Value>,
    /// Deposit in the smallest unit
    pub deposit: String,
}

impl ProposalParams {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        messages: Vec<Value>,
        deposit: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            messages,
            deposit: deposit.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks.non_empty("title", &self.title);
        checks.non_empty("description", &self.description);
        checks.positive_uint("deposit", &self.deposit);
        checks.finish()
    }

    /// The exact text placed in the `messages` field
    pub fn messages_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.messages)
    }

    pub fn offsets(&self) -> ProposalOffsets {
        ProposalOffsets::compute(&self.title, &self.description)
    }
}

/// Build create-proposal calldata
///
/// The proposer word is always the zero address; the receiving contract
/// overwrites it with the sender.
pub fn encode_create_proposal(params: &ProposalParams) -> Result<CallFrame, CalldataError> {
    params.validate()?;
    let messages = params.messages_json()?;

    let frame = CallFrame::encode(
        CallKind::CreateProposal,
        vec![
            Arg::Dynamic(encode_string(&params.title)),
            Arg::Dynamic(encode_string(&params.description)),
            Arg::Dynamic(encode_string(&messages)),
            Arg::Word(encode_uint(params.deposit.as_str())?),
            Arg::Word(address_word(&Address::ZERO)),
        ],
    )?;

    let offsets = ProposalOffsets::from_frame(&frame)?;
    tracing::debug!(
        kind = %CallKind::CreateProposal,
        title_offset = offsets.title,
        description_offset = offsets.description,
        messages_offset = offsets.messages,
        messages = params.messages.len(),
        bytes = frame.len(),
        "Built calldata"
    );

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VOTER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_vote_layout() {
        let frame = encode_vote(&VoteParams::new(VOTER, "12", false, "not convinced")).unwrap();
        assert!(frame.to_hex().starts_with("0x9ec4d363"));
        assert!(!frame.read_bool(2).unwrap());
        assert_eq!(frame.read_offset(3).unwrap(), VOTE_REASON_OFFSET);
        assert_eq!(frame.read_string(3).unwrap(), "not convinced");
    }

    #[test]
    fn test_vote_empty_reason() {
        let frame = encode_vote(&VoteParams::new(VOTER, "1", true, "")).unwrap();
        // 4 head words + zero length word, no data words
        assert_eq!(frame.len(), 4 + 5 * 32);
        assert_eq!(frame.read_uint(4).unwrap().to::<u64>(), 0);
        assert_eq!(frame.read_string(3).unwrap(), "");
    }

    #[test]
    fn test_vote_validation() {
        let err = encode_vote(&VoteParams::new("nope", "0", true, "")).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().fields(),
            vec!["voter", "proposal_id"]
        );
    }

    #[test]
    fn test_proposal_offsets_single_words() {
        let offsets = ProposalOffsets::compute("A", "BB");
        assert_eq!(offsets.title, 160);
        assert_eq!(offsets.description, 224);
        assert_eq!(offsets.messages, 288);
    }

    #[test]
    fn test_proposal_offsets_word_boundaries() {
        // 32 bytes fits one word; 33 needs two
        let exact = ProposalOffsets::compute(&"t".repeat(32), "");
        assert_eq!(exact.description, 160 + 32 + 32);
        assert_eq!(exact.messages, exact.description + 32);

        let over = ProposalOffsets::compute(&"t".repeat(33), &"d".repeat(65));
        assert_eq!(over.description, 160 + 32 + 64);
        assert_eq!(over.messages, over.description + 32 + 96);
    }

    #[test]
    fn test_create_proposal_frame_matches_offsets() {
        let params = ProposalParams::new(
            "A",
            "BB",
            vec![json!({"@type": "/cosmos.gov.v1.MsgExecLegacyContent"})],
            "1000000000000000000",
        );
        let frame = encode_create_proposal(&params).unwrap();
        let offsets = params.offsets();

        assert!(frame.to_hex().starts_with("0xcb0dddfe"));
        assert_eq!(frame.read_offset(0).unwrap(), offsets.title);
        assert_eq!(frame.read_offset(1).unwrap(), offsets.description);
        assert_eq!(frame.read_offset(2).unwrap(), offsets.messages);
        assert_eq!(ProposalOffsets::from_frame(&frame).unwrap(), offsets);
        assert_eq!(frame.read_uint(3).unwrap().to_string(), "1000000000000000000");
        assert_eq!(frame.read_address(4).unwrap(), Address::ZERO);

        assert_eq!(frame.read_string(0).unwrap(), "A");
        assert_eq!(frame.read_string(1).unwrap(), "BB");
        assert_eq!(
            frame.read_string(2).unwrap(),
            r#"[{"@type":"/cosmos.gov.v1.MsgExecLegacyContent"}]"#
        );
    }

    #[test]
    fn test_create_proposal_keeps_message_key_order() {
        let raw = r#"[{"@type":"/x","title":"t","authority":"a"}]"#;
        let messages: Vec<Value> = serde_json::from_str(raw).unwrap();
        let params = ProposalParams::new("Title", "Body", messages, "1");

        let frame = encode_create_proposal(&params).unwrap();
        assert_eq!(frame.read_string(2).unwrap(), raw);

        let built = ProposalParams::new(
            "Title",
            "Body",
            vec![json!({"@type": "/x", "title": "t", "authority": "a"})],
            "1",
        );
        assert_eq!(built.messages_json().unwrap(), raw);
    }

    #[test]
    fn test_create_proposal_empty_messages() {
        let params = ProposalParams::new("Title", "Body", vec![], "1");
        let frame = encode_create_proposal(&params).unwrap();
        assert_eq!(frame.read_string(2).unwrap(), "[]");
    }

    #[test]
    fn test_create_proposal_validation() {
        let params = ProposalParams::new("", "", vec![], "-10");
        let err = encode_create_proposal(&params).unwrap_err();
        assert_eq!(
            err.as_validation().unwrap().fields(),
            vec!["title", "description", "deposit"]
        );
    }
}
