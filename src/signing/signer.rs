use std::{
    fmt,
    sync::atomic::{Ordering, compiler_fence},
};

use alloy::{
    hex,
    primitives::{Address, B256, Signature, U256, eip191_hash_message},
    signers::{SignerSync, local::PrivateKeySigner},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Key or signature material was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("PRIVATE_KEY not set")]
    MissingKey,

    #[error("malformed private key: {0}")]
    MalformedKey(String),

    #[error("private key is not a valid secp256k1 scalar")]
    InvalidScalar,

    #[error("signing failed: {0}")]
    Ecdsa(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("signature must be 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("invalid recovery id {0}, expected one of 0, 1, 27, 28")]
    InvalidRecoveryId(u8),

    #[error("signer recovery failed: {0}")]
    Recovery(String),
}

/// Raw secp256k1 private key.
///
/// Holds only the key bytes and the derived address. The signing key itself
/// is materialized inside [`sign_digest`] and dropped when the call returns.
pub struct PrivateKey {
    bytes: B256,
    address: Address,
}

impl PrivateKey {
    /// Parses a 32-byte hex key, with or without `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self, SigningError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SigningError::MissingKey);
        }
        let digits = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);
        if digits.len() != 64 {
            return Err(SigningError::MalformedKey(format!(
                "expected 64 hex digits, got {}",
                digits.len()
            )));
        }
        let bytes = digits
            .parse::<B256>()
            .map_err(|err| SigningError::MalformedKey(err.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Validates the key is a non-zero scalar below the curve order.
    pub fn from_bytes(bytes: B256) -> Result<Self, SigningError> {
        let address = local_signer(&bytes)?.address();
        Ok(Self { bytes, address })
    }

    /// Address derived from the key.
    pub fn address(&self) -> Address {
        self.address
    }
}

fn local_signer(bytes: &B256) -> Result<PrivateKeySigner, SigningError> {
    PrivateKeySigner::from_bytes(bytes).map_err(|_| SigningError::InvalidScalar)
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.0.fill(0);
        compiler_fence(Ordering::SeqCst);
    }
}

/// Encoding of the recovery ID in the last signature byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecoveryIdFormat {
    /// `v` in {27, 28}, as expected by `ecrecover` based verifiers.
    #[default]
    Electrum,
    /// `v` in {0, 1}, the bare y-parity.
    Raw,
}

impl RecoveryIdFormat {
    pub fn offset(&self) -> u8 {
        match self {
            Self::Electrum => 27,
            Self::Raw => 0,
        }
    }

    pub fn from_offset(offset: u8) -> Option<Self> {
        match offset {
            27 => Some(Self::Electrum),
            0 => Some(Self::Raw),
            _ => None,
        }
    }
}

/// ECDSA signature with recovery ID, serialized as `r ‖ s ‖ v`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecoverableSignature {
    r: U256,
    s: U256,
    y_parity: bool,
    format: RecoveryIdFormat,
}

impl RecoverableSignature {
    pub fn new(r: U256, s: U256, y_parity: bool, format: RecoveryIdFormat) -> Self {
        Self {
            r,
            s,
            y_parity,
            format,
        }
    }

    pub fn r(&self) -> U256 {
        self.r
    }

    pub fn s(&self) -> U256 {
        self.s
    }

    pub fn y_parity(&self) -> bool {
        self.y_parity
    }

    pub fn format(&self) -> RecoveryIdFormat {
        self.format
    }

    /// Recovery byte as emitted on the wire.
    pub fn v(&self) -> u8 {
        self.format.offset() + u8::from(self.y_parity)
    }

    /// Same signature with `v` re-encoded in another format.
    pub fn with_format(self, format: RecoveryIdFormat) -> Self {
        Self { format, ..self }
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        bytes[64] = self.v();
        bytes
    }

    /// `0x` followed by 130 hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SigningError> {
        if bytes.len() != 65 {
            return Err(SigningError::InvalidSignatureLength(bytes.len()));
        }
        let (format, y_parity) = match bytes[64] {
            0 => (RecoveryIdFormat::Raw, false),
            1 => (RecoveryIdFormat::Raw, true),
            27 => (RecoveryIdFormat::Electrum, false),
            28 => (RecoveryIdFormat::Electrum, true),
            v => return Err(SigningError::InvalidRecoveryId(v)),
        };
        Ok(Self::new(
            U256::from_be_slice(&bytes[..32]),
            U256::from_be_slice(&bytes[32..64]),
            y_parity,
            format,
        ))
    }

    pub fn from_hex(input: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(input.trim())
            .map_err(|err| SigningError::MalformedSignature(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Recovers the signer address of `digest`.
    pub fn recover_address(&self, digest: &B256) -> Result<Address, SigningError> {
        Signature::new(self.r, self.s, self.y_parity)
            .recover_address_from_prehash(digest)
            .map_err(|err| SigningError::Recovery(err.to_string()))
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Signs a 32-byte digest with RFC 6979 deterministic ECDSA.
///
/// The signing key lives only for the duration of this call.
pub fn sign_digest(
    key: &PrivateKey,
    digest: &B256,
    format: RecoveryIdFormat,
) -> Result<RecoverableSignature, SigningError> {
    let signer = local_signer(&key.bytes)?;
    let signature = signer
        .sign_hash_sync(digest)
        .map_err(|err| SigningError::Ecdsa(err.to_string()))?;
    debug!(%digest, signer = %signer.address(), ?format, "signed digest");

    Ok(RecoverableSignature::new(
        signature.r(),
        signature.s(),
        signature.v(),
        format,
    ))
}

/// EIP-191 digest: `keccak256("\x19Ethereum Signed Message:\n" ‖ len ‖ message)`.
pub fn personal_message_digest(message: &str) -> B256 {
    eip191_hash_message(message)
}
