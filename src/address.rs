//! Address input normalization
//!
//! The chain's staking and governance tooling shows accounts and validators
//! in bech32 form (`helios1...`, `heliosvaloper1...`) while the precompiles
//! take 20-byte EVM addresses. Both forms carry the same 20 bytes, so a bech32
//! input is converted to `0x` hex before it reaches a builder.

use alloy::primitives::Address;
use bech32::{self, FromBase32, ToBase32, Variant};

use crate::error::EncodingError;
use crate::word::parse_address;

/// Decode a bech32 account or validator address
///
/// Returns the EVM address it carries together with its human-readable prefix.
pub fn decode_bech32_address(addr: &str) -> Result<(Address, String), EncodingError> {
    let (hrp, data, _) =
        bech32::decode(addr).map_err(|e| EncodingError::InvalidBech32(e.to_string()))?;

    let payload = Vec::<u8>::from_base32(&data)
        .map_err(|e| EncodingError::InvalidBech32(format!("{}: {}", addr, e)))?;

    match <[u8; 20]>::try_from(payload.as_slice()) {
        Ok(raw) => Ok((Address::from(raw), hrp)),
        Err(_) => Err(EncodingError::InvalidBech32(format!(
            "{} carries {} bytes, not an account",
            addr,
            payload.len()
        ))),
    }
}

/// Encode raw 20 bytes to a bech32 address with given prefix
pub fn encode_bech32_address(bytes: &[u8; 20], hrp: &str) -> Result<String, EncodingError> {
    bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| EncodingError::InvalidBech32(e.to_string()))
}

/// Turn either address form into lowercase `0x` hex
pub fn normalize_address(input: &str) -> Result<String, EncodingError> {
    let looks_hex = input.starts_with("0x")
        || input.starts_with("0X")
        || (input.len() == 40 && input.bytes().all(|b| b.is_ascii_hexdigit()));

    if looks_hex {
        let addr = parse_address(input)?;
        Ok(format!("0x{}", hex::encode(addr.as_slice())))
    } else {
        let (addr, _) = decode_bech32_address(input)?;
        Ok(format!("0x{}", hex::encode(addr.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: [u8; 20] = [
        0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72, 0x79,
        0xcf, 0xff, 0xb9, 0x22, 0x66,
    ];

    #[test]
    fn test_bech32_roundtrip() {
        let encoded = encode_bech32_address(&RAW, "helios").unwrap();
        assert!(encoded.starts_with("helios1"));

        let (decoded, hrp) = decode_bech32_address(&encoded).unwrap();
        assert_eq!(decoded.as_slice(), &RAW[..]);
        assert_eq!(hrp, "helios");
    }

    #[test]
    fn test_normalize_bech32_and_hex_agree() {
        let valoper = encode_bech32_address(&RAW, "heliosvaloper").unwrap();
        let from_bech32 = normalize_address(&valoper).unwrap();
        let from_hex = normalize_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();

        assert_eq!(from_bech32, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        assert_eq!(from_bech32, from_hex);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_address("0x1234").is_err());
        assert!(matches!(
            normalize_address("helios1notvalid"),
            Err(EncodingError::InvalidBech32(_))
        ));
    }
}
