//! Word Encoder
//!
//! Converts scalars and strings into their ABI head/tail representations:
//!
//! - `uint256`, `address` and `bool` become a single 32-byte big-endian word
//! - `string` becomes a length word followed by the UTF-8 bytes, right-padded
//!   with zeros to a multiple of 32 bytes
//!
//! Every integer input resolves to exactly one word regardless of how it was
//! represented (native integer, `U256`, decimal string, `0x` hex string).

use std::fmt;

use alloy::primitives::utils::{parse_units, ParseUnits};
use alloy::primitives::{Address, U256};

use crate::error::EncodingError;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// Round a byte length up to the next multiple of [`WORD_SIZE`]
pub const fn round_up_to_word(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}

// ============================================================================
// Encoded Values
// ============================================================================

/// One 32-byte ABI word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncodedWord(pub [u8; 32]);

impl EncodedWord {
    pub const ZERO: EncodedWord = EncodedWord([0u8; 32]);

    /// Big-endian word holding `value`
    pub fn from_u256(value: U256) -> Self {
        EncodedWord(value.to_be_bytes::<32>())
    }

    /// Build a word from a byte offset or length
    pub fn from_usize(value: usize) -> Self {
        Self::from_u256(U256::from(value))
    }

    /// The raw 32 bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Read the word back as a big-endian integer
    pub fn to_u256(&self) -> U256 {
        U256::from_be_bytes(self.0)
    }

    /// 64 lowercase hex characters, no prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EncodedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Length word plus zero-padded data for a variable-length byte sequence
///
/// Only built through [`encode_bytes`], [`encode_string`] or the checked
/// [`EncodedDynamicField::from_parts`], so the padded data is always a whole
/// number of words with zeros past the declared length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDynamicField {
    length: EncodedWord,
    padded_data: Vec<u8>,
}

impl EncodedDynamicField {
    /// Assemble a field from an already-encoded length word and padded data
    ///
    /// Fails unless the data is word-aligned, long enough for the declared
    /// length, and zero past it.
    pub fn from_parts(length: EncodedWord, padded_data: Vec<u8>) -> Result<Self, EncodingError> {
        let declared = usize::try_from(length.to_u256()).map_err(|_| {
            EncodingError::MalformedField(format!("length {} does not fit usize", length.to_u256()))
        })?;

        if padded_data.len() % WORD_SIZE != 0 {
            return Err(EncodingError::MalformedField(format!(
                "padded data is {} bytes, not a multiple of {}",
                padded_data.len(),
                WORD_SIZE
            )));
        }
        if declared > padded_data.len() || padded_data.len() != round_up_to_word(declared) {
            return Err(EncodingError::MalformedField(format!(
                "length {} needs {} padded bytes, got {}",
                declared,
                round_up_to_word(declared),
                padded_data.len()
            )));
        }
        if padded_data[declared..].iter().any(|&b| b != 0) {
            return Err(EncodingError::MalformedField(
                "non-zero bytes past the declared length".to_string(),
            ));
        }

        Ok(Self {
            length,
            padded_data,
        })
    }

    /// The length word
    pub fn length(&self) -> &EncodedWord {
        &self.length
    }

    /// Data right-padded with zeros to a multiple of [`WORD_SIZE`]
    pub fn padded_data(&self) -> &[u8] {
        &self.padded_data
    }

    /// Raw (unpadded) byte length of the source
    pub fn byte_len(&self) -> usize {
        // The length word was built from a usize, so the low 8 bytes hold it.
        let bytes = self.length.as_bytes();
        let mut low = [0u8; 8];
        low.copy_from_slice(&bytes[24..32]);
        u64::from_be_bytes(low) as usize
    }

    /// Bytes this field occupies in the tail: length word plus padded data
    pub fn encoded_len(&self) -> usize {
        WORD_SIZE + self.padded_data.len()
    }

    /// Append the length word and padded data to `out`
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.length.as_bytes());
        out.extend_from_slice(&self.padded_data);
    }
}

// ============================================================================
// Unsigned Integer Inputs
// ============================================================================

/// Anything that can be normalized into a `uint256`
///
/// Native signed integers are accepted so negative inputs are reported as
/// [`EncodingError::Negative`] instead of wrapping.
pub trait UintInput {
    fn to_u256(&self) -> Result<U256, EncodingError>;
}

macro_rules! impl_uint_input_unsigned {
    ($($t:ty),*) => {
        $(
            impl UintInput for $t {
                fn to_u256(&self) -> Result<U256, EncodingError> {
                    Ok(U256::from(*self))
                }
            }
        )*
    };
}

macro_rules! impl_uint_input_signed {
    ($($t:ty),*) => {
        $(
            impl UintInput for $t {
                fn to_u256(&self) -> Result<U256, EncodingError> {
                    u128::try_from(*self)
                        .map(U256::from)
                        .map_err(|_| EncodingError::Negative(self.to_string()))
                }
            }
        )*
    };
}

impl_uint_input_unsigned!(u8, u16, u32, u64, u128, usize);
impl_uint_input_signed!(i8, i16, i32, i64, i128, isize);

impl UintInput for U256 {
    fn to_u256(&self) -> Result<U256, EncodingError> {
        Ok(*self)
    }
}

impl UintInput for bool {
    fn to_u256(&self) -> Result<U256, EncodingError> {
        Ok(U256::from(u8::from(*self)))
    }
}

impl UintInput for str {
    fn to_u256(&self) -> Result<U256, EncodingError> {
        parse_uint(self)
    }
}

impl UintInput for String {
    fn to_u256(&self) -> Result<U256, EncodingError> {
        parse_uint(self)
    }
}

impl<T: UintInput + ?Sized> UintInput for &T {
    fn to_u256(&self) -> Result<U256, EncodingError> {
        (**self).to_u256()
    }
}

/// Parse a decimal or `0x`-prefixed hex string into a `uint256`
///
/// The string must be non-empty and contain only digits of its radix; no
/// whitespace, sign, or separators are allowed except a leading `-`, which is
/// reported as [`EncodingError::Negative`].
pub fn parse_uint(value: &str) -> Result<U256, EncodingError> {
    if let Some(rest) = value.strip_prefix('-') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::Negative(value.to_string()));
        }
        return Err(EncodingError::InvalidNumber(value.to_string()));
    }

    if let Some(hex_digits) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        if hex_digits.is_empty() || !hex_digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EncodingError::InvalidNumber(value.to_string()));
        }
        let significant = hex_digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(EncodingError::Overflow(value.to_string()));
        }
        if significant.is_empty() {
            return Ok(U256::ZERO);
        }
        return U256::from_str_radix(significant, 16)
            .map_err(|_| EncodingError::Overflow(value.to_string()));
    }

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidNumber(value.to_string()));
    }

    // Digits are already checked, so the only remaining failure is range.
    U256::from_str_radix(value, 10).map_err(|_| EncodingError::Overflow(value.to_string()))
}

/// Convert a human-readable decimal amount into smallest units
///
/// `to_base_units("1.5", 18)` yields `1_500_000_000_000_000_000`. Builders
/// never convert units themselves; callers do this beforehand.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, EncodingError> {
    let parsed = parse_units(amount, decimals)
        .map_err(|e| EncodingError::InvalidNumber(format!("{}: {}", amount, e)))?;
    match parsed {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(EncodingError::Negative(amount.to_string())),
    }
}

// ============================================================================
// Encoders
// ============================================================================

/// Encode an unsigned integer as a left-padded 32-byte word
pub fn encode_uint<T: UintInput>(value: T) -> Result<EncodedWord, EncodingError> {
    value.to_u256().map(EncodedWord::from_u256)
}

/// Encode a boolean as `0` or `1`
pub fn encode_bool(value: bool) -> EncodedWord {
    EncodedWord::from_u256(U256::from(u8::from(value)))
}

/// Parse a 20-byte hex address
///
/// Accepts an optional `0x` prefix. All-lowercase and all-uppercase hex is
/// taken as-is; mixed case must be a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> Result<Address, EncodingError> {
    let hex_str = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);

    if hex_str.len() != 40 {
        return Err(EncodingError::InvalidAddressLength(hex_str.len()));
    }

    let bytes =
        hex::decode(hex_str).map_err(|_| EncodingError::InvalidAddressHex(address.to_string()))?;
    let parsed = Address::from_slice(&bytes);

    let has_lower = hex_str.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex_str.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = parsed.to_checksum(None);
        if checksummed[2..] != *hex_str {
            return Err(EncodingError::InvalidChecksum(address.to_string()));
        }
    }

    Ok(parsed)
}

/// Encode an address left-padded with 12 zero bytes
pub fn encode_address(address: &str) -> Result<EncodedWord, EncodingError> {
    parse_address(address).map(|addr| address_word(&addr))
}

/// Encode an already-parsed address
pub fn address_word(address: &Address) -> EncodedWord {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    EncodedWord(word)
}

/// Encode a UTF-8 string as a dynamic field
pub fn encode_string(text: &str) -> EncodedDynamicField {
    encode_bytes(text.as_bytes())
}

/// Encode raw bytes as a dynamic field
pub fn encode_bytes(data: &[u8]) -> EncodedDynamicField {
    let mut padded_data = vec![0u8; round_up_to_word(data.len())];
    padded_data[..data.len()].copy_from_slice(data);
    EncodedDynamicField {
        length: EncodedWord::from_usize(data.len()),
        padded_data,
    }
}
