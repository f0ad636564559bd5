//! Recoverable ECDSA signatures over secp256k1

use fugue_primitives::{Address, H256};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};

use crate::error::CryptoError;
use crate::hash::keccak256;

/// Length of an encoded signature in bytes (r=32 + s=32 + v=1)
pub const SIGNATURE_LENGTH: usize = 65;

/// A secp256k1 private key
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a random private key from OS entropy
    pub fn random() -> Self {
        Self {
            inner: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Create a private key from raw scalar bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let inner =
            SigningKey::from_bytes(bytes.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// Return the raw scalar bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// Derive the corresponding public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte message hash
    ///
    /// The message is already a hash; no further hashing is applied.
    pub fn sign(&self, message: &H256) -> Result<Signature, CryptoError> {
        let (sig, recovery_id) = self
            .inner
            .sign_prehash_recoverable(message.as_bytes())
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(Signature::from_ecdsa(&sig, recovery_id))
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A secp256k1 public key (uncompressed, without the 0x04 prefix)
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; 64],
}

impl PublicKey {
    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let encoded = key.to_encoded_point(false);
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&encoded.as_bytes()[1..65]);
        Self { bytes }
    }

    /// Create from uncompressed bytes (64 bytes, no 0x04 prefix)
    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self, CryptoError> {
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..65].copy_from_slice(bytes);
        VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { bytes: *bytes })
    }

    /// Return the uncompressed bytes
    pub fn to_bytes(&self) -> [u8; 64] {
        self.bytes
    }

    /// Derive the Ethereum-style address: `keccak256(pubkey)[12..32]`
    pub fn to_address(&self) -> Address {
        let hash = keccak256(&self.bytes);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash.as_bytes()[12..32]);
        Address::from_bytes(addr)
    }

    /// Verify a signature over a message hash against this key
    pub fn verify(&self, signature: &Signature, message: &H256) -> bool {
        signature.verify(self, message)
    }

    fn to_verifying_key(&self) -> Option<VerifyingKey> {
        let mut sec1 = [0u8; 65];
        sec1[0] = 0x04;
        sec1[1..65].copy_from_slice(&self.bytes);
        VerifyingKey::from_sec1_bytes(&sec1).ok()
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey(")?;
        for b in &self.bytes {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// An ECDSA signature with recovery ID
///
/// `v` is stored Ethereum-style as `recovery_id + 27`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component (32 bytes)
    pub r: [u8; 32],
    /// s component (32 bytes)
    pub s: [u8; 32],
    /// recovery id, stored as 27 or 28
    pub v: u8,
}

impl Signature {
    fn from_ecdsa(sig: &EcdsaSignature, recovery_id: RecoveryId) -> Self {
        Self {
            r: sig.r().to_bytes().into(),
            s: sig.s().to_bytes().into(),
            v: recovery_id.to_byte() + 27,
        }
    }

    /// The recovery ID (0 or 1)
    pub fn recovery_id(&self) -> u8 {
        if self.v >= 27 {
            self.v - 27
        } else {
            self.v
        }
    }

    /// Encode as 65 bytes: `r || s || v`
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..64].copy_from_slice(&self.s);
        bytes[64] = self.v;
        bytes
    }

    /// Parse from the 65-byte encoding, validating `r`, `s`, and `v`
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Result<Self, CryptoError> {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        let v = bytes[64];

        if r == [0u8; 32] || s == [0u8; 32] {
            return Err(CryptoError::InvalidSignature("zero r or s".into()));
        }
        if v != 27 && v != 28 {
            return Err(CryptoError::InvalidSignature(format!("bad v: {}", v)));
        }
        // r and s must be valid curve scalars
        EcdsaSignature::from_scalars(k256::FieldBytes::from(r), k256::FieldBytes::from(s))
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

        Ok(Self { r, s, v })
    }

    fn to_ecdsa(&self) -> Result<EcdsaSignature, CryptoError> {
        EcdsaSignature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        )
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }

    /// Verify this signature over a message hash against a public key
    pub fn verify(&self, pubkey: &PublicKey, message: &H256) -> bool {
        let verifying_key = match pubkey.to_verifying_key() {
            Some(vk) => vk,
            None => return false,
        };
        let sig = match self.to_ecdsa() {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        verifying_key.verify_prehash(message.as_bytes(), &sig).is_ok()
    }

    /// Recover the signer's public key from a message hash
    pub fn recover(&self, message: &H256) -> Result<PublicKey, CryptoError> {
        let sig = self.to_ecdsa()?;
        let recovery_id = RecoveryId::try_from(self.recovery_id())
            .map_err(|_| CryptoError::InvalidRecoveryId(self.recovery_id()))?;
        let key = VerifyingKey::recover_from_prehash(message.as_bytes(), &sig, recovery_id)
            .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;
        Ok(PublicKey::from_verifying_key(&key))
    }
}
