use std::fmt;

use crate::{
    consts::{LOCAL_API_URL, MAINNET_API_URL, STAGING_API_URL},
    prelude::*,
    Error,
};

/// Gateway a client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseUrl {
    Mainnet,
    Staging,
    Localhost,
    /// Any other gateway, e.g. the value of `PROVIDER_URL`.
    Custom(String),
}

impl BaseUrl {
    pub fn get_url(&self) -> String {
        match self {
            BaseUrl::Mainnet => MAINNET_API_URL.to_string(),
            BaseUrl::Staging => STAGING_API_URL.to_string(),
            BaseUrl::Localhost => LOCAL_API_URL.to_string(),
            BaseUrl::Custom(url) => url.trim_end_matches('/').to_string(),
        }
    }

    /// Parse a network name (`mainnet`, `staging`, `localhost`) or an
    /// `http(s)://` URL.
    pub fn parse(s: &str) -> Result<BaseUrl> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "mainnet" => Ok(BaseUrl::Mainnet),
            "staging" => Ok(BaseUrl::Staging),
            "localhost" | "local" => Ok(BaseUrl::Localhost),
            lower if lower.starts_with("http://") || lower.starts_with("https://") => {
                Ok(BaseUrl::Custom(trimmed.to_string()))
            }
            _ => Err(Error::InvalidBaseUrl(s.to_string())),
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_networks() {
        assert_eq!(BaseUrl::parse("mainnet").unwrap(), BaseUrl::Mainnet);
        assert_eq!(BaseUrl::parse("Staging").unwrap(), BaseUrl::Staging);
        assert_eq!(BaseUrl::parse("localhost").unwrap(), BaseUrl::Localhost);
    }

    #[test]
    fn test_parse_custom_url_strips_trailing_slash() {
        let url = BaseUrl::parse("https://node.example.org/").unwrap();
        assert_eq!(url.get_url(), "https://node.example.org");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            BaseUrl::parse("ftp://nope"),
            Err(Error::InvalidBaseUrl(_))
        ));
        assert!(BaseUrl::parse("").is_err());
    }

    #[test]
    fn test_staging_url() {
        assert_eq!(
            BaseUrl::Staging.get_url(),
            "https://staging.tsn.truflation.com"
        );
    }
}
