//! Ethereum personal-sign identity used to authenticate calls.

use alloy::{
    hex,
    primitives::{Address, Signature},
    signers::{local::PrivateKeySigner, SignerSync},
};

use crate::{prelude::*, Error};

/// Auth type the gateway expects for EIP-191 secp256k1 signatures.
pub const AUTH_TYPE_ETH_PERSONAL: &str = "secp256k1_ep";

/// Signs messages with the EIP-191 `personal_sign` scheme.
#[derive(Clone)]
pub struct EthPersonalSigner {
    wallet: PrivateKeySigner,
}

// Never print key material
impl std::fmt::Debug for EthPersonalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthPersonalSigner")
            .field("address", &self.wallet.address())
            .field("key", &"<redacted>")
            .finish()
    }
}

impl EthPersonalSigner {
    pub fn new(wallet: PrivateKeySigner) -> Self {
        Self { wallet }
    }

    /// Build a signer from a hex-encoded secp256k1 private key, with or without `0x`.
    pub fn from_hex(private_key: &str) -> Result<Self> {
        let trimmed = private_key.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(stripped).map_err(|e| Error::PrivateKeyParse(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(Error::PrivateKeyParse(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let wallet = PrivateKeySigner::from_slice(&bytes)
            .map_err(|e| Error::PrivateKeyParse(e.to_string()))?;
        Ok(Self { wallet })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn auth_type(&self) -> &'static str {
        AUTH_TYPE_ETH_PERSONAL
    }

    /// Personal-sign `message` and return the raw signature.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        self.wallet
            .sign_message_sync(message)
            .map_err(|e| Error::signature_failure(e.to_string()))
    }

    /// Personal-sign `message` and return `0x` + hex(r || s || v), with `v` in {27, 28}.
    pub fn sign_personal(&self, message: &[u8]) -> Result<String> {
        let sig = self.sign(message)?;
        Ok(hex::encode_prefixed(signature_bytes(&sig)))
    }
}

pub(crate) fn signature_bytes(sig: &Signature) -> [u8; 65] {
    let mut out = [0u8; 65];
    out[..32].copy_from_slice(&sig.r().to_be_bytes::<32>());
    out[32..64].copy_from_slice(&sig.s().to_be_bytes::<32>());
    out[64] = 27 + sig.v() as u8;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known hardhat account #0
    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_from_hex_with_and_without_prefix() {
        let a = EthPersonalSigner::from_hex(KEY).unwrap();
        let b = EthPersonalSigner::from_hex(&format!("0x{KEY}")).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(a.address(), ADDRESS.parse::<Address>().unwrap());
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            EthPersonalSigner::from_hex("not-hex"),
            Err(Error::PrivateKeyParse(_))
        ));
        assert!(matches!(
            EthPersonalSigner::from_hex("abcd"),
            Err(Error::PrivateKeyParse(_))
        ));
        // zero is not a valid secp256k1 scalar
        assert!(EthPersonalSigner::from_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_signature_recovers_to_signer() {
        let signer = EthPersonalSigner::from_hex(KEY).unwrap();
        let sig = signer.sign(b"hello").unwrap();
        let recovered = sig.recover_address_from_msg(b"hello").unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn test_sign_personal_encoding() {
        let signer = EthPersonalSigner::from_hex(KEY).unwrap();
        let encoded = signer.sign_personal(b"hello").unwrap();
        assert!(encoded.starts_with("0x"));
        // 65 bytes -> 130 hex chars
        assert_eq!(encoded.len(), 132);
        let v = u8::from_str_radix(&encoded[130..], 16).unwrap();
        assert!(v == 27 || v == 28);
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = EthPersonalSigner::from_hex(KEY).unwrap();
        let debug = format!("{signer:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(KEY));
    }
}
