//! Stream ids and locators.

use std::fmt;
use std::str::FromStr;

use alloy::{hex, primitives::Address};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{prelude::*, Error};

const STREAM_ID_PREFIX: &str = "st";
const STREAM_ID_HEX_LEN: usize = 30;

/// Identifier of a stream: `st` followed by 30 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StreamId(String);

impl StreamId {
    /// Derive an id from a human readable stream name.
    pub fn generate(name: &str) -> StreamId {
        let digest = Sha256::digest(name.as_bytes());
        let encoded = hex::encode(digest);
        StreamId(format!(
            "{STREAM_ID_PREFIX}{}",
            &encoded[..STREAM_ID_HEX_LEN]
        ))
    }

    /// Accept an already formed id.
    pub fn parse(s: &str) -> Result<StreamId> {
        if Self::is_valid(s) {
            Ok(StreamId(s.to_string()))
        } else {
            Err(Error::InvalidStreamId(s.to_string()))
        }
    }

    /// Use `s` verbatim when it is already a stream id, otherwise hash it as a name.
    pub fn from_name_or_id(s: &str) -> StreamId {
        Self::parse(s).unwrap_or_else(|_| Self::generate(s))
    }

    pub fn is_valid(s: &str) -> bool {
        match s.strip_prefix(STREAM_ID_PREFIX) {
            Some(rest) => {
                rest.len() == STREAM_ID_HEX_LEN
                    && rest
                        .bytes()
                        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StreamId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StreamId::parse(s)
    }
}

impl TryFrom<String> for StreamId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        StreamId::parse(&s)
    }
}

impl From<StreamId> for String {
    fn from(id: StreamId) -> String {
        id.0
    }
}

/// Parse a data provider address, mapping failures to [`Error::InvalidAddress`].
pub fn parse_data_provider(s: &str) -> Result<Address> {
    s.trim()
        .parse::<Address>()
        .map_err(|e| Error::InvalidAddress(format!("{s}: {e}")))
}

/// A stream scoped to the provider that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamLocator {
    pub stream_id: StreamId,
    pub data_provider: Address,
}

impl StreamLocator {
    pub fn new(stream_id: StreamId, data_provider: Address) -> Self {
        Self {
            stream_id,
            data_provider,
        }
    }

    /// Lowercase `0x` address, the form stream actions expect.
    pub fn provider_hex(&self) -> String {
        hex::encode_prefixed(self.data_provider)
    }
}

impl fmt::Display for StreamLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider_hex(), self.stream_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let id = StreamId::generate("TRUUK");
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().starts_with("st"));
        assert!(StreamId::is_valid(id.as_str()));
    }

    #[test]
    fn test_generate_is_sha256_prefix() {
        // sha256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            StreamId::generate("").as_str(),
            "ste3b0c44298fc1c149afbf4c8996fb9"
        );
    }

    #[test]
    fn test_generate_deterministic() {
        assert_eq!(StreamId::generate("TRUUK"), StreamId::generate("TRUUK"));
        assert_ne!(StreamId::generate("TRUUK"), StreamId::generate("TRUUS"));
    }

    #[test]
    fn test_parse() {
        assert!(StreamId::parse("stf389ad7681059ca7750dda907735b2").is_ok());
        assert!(StreamId::parse("st15889445eac65d03159da7c882a895").is_ok());
        // uppercase hex, wrong prefix, wrong length
        assert!(StreamId::parse("stF389AD7681059CA7750DDA907735B2").is_err());
        assert!(StreamId::parse("xx15889445eac65d03159da7c882a895").is_err());
        assert!(StreamId::parse("st1588").is_err());
    }

    #[test]
    fn test_from_name_or_id() {
        let id = "stf389ad7681059ca7750dda907735b2";
        assert_eq!(StreamId::from_name_or_id(id).as_str(), id);
        assert_eq!(
            StreamId::from_name_or_id("TRUUK"),
            StreamId::generate("TRUUK")
        );
    }

    #[test]
    fn test_serde_rejects_invalid_id() {
        let ok: StreamId = serde_json::from_str("\"st15889445eac65d03159da7c882a895\"").unwrap();
        assert_eq!(ok.as_str(), "st15889445eac65d03159da7c882a895");
        assert!(serde_json::from_str::<StreamId>("\"TRUUK\"").is_err());
    }

    #[test]
    fn test_parse_data_provider() {
        let addr = parse_data_provider("0x4710a8d8f0d845da110086812a32de6d90d7ff5c").unwrap();
        let locator = StreamLocator::new(StreamId::generate("x"), addr);
        assert_eq!(
            locator.provider_hex(),
            "0x4710a8d8f0d845da110086812a32de6d90d7ff5c"
        );
        assert!(matches!(
            parse_data_provider("0x1234"),
            Err(Error::InvalidAddress(_))
        ));
    }
}
