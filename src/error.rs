use std::io;
use thiserror::Error;

use crate::bucket::BucketId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("client not found: {0}")]
    ClientNotFound(BucketId),
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Client error: {0}")]
    Client(String),
    #[error("Metadata error: {0}")]
    Metadata(String),
    #[error("load cancelled")]
    Cancelled,
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// True when the error only means the shard is unknown to the registry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ClientNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguished() {
        assert!(Error::ClientNotFound(BucketId::nil()).is_not_found());
        assert!(!Error::Metadata("tx aborted".into()).is_not_found());
        assert!(!Error::Cancelled.is_not_found());
    }

    #[test]
    fn display_includes_endpoint() {
        let err = Error::InvalidEndpoint {
            endpoint: "http://bad host".into(),
            source: url::ParseError::InvalidDomainCharacter,
        };
        let msg = err.to_string();
        assert!(msg.contains("http://bad host"));
    }
}
