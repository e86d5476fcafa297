use std::convert::From;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone)]
pub enum Error {
    #[error("{0}")]
    Error(String),

    #[error("authentication error: {0}")]
    AuthError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<crate::pam::PamError> for Error {
    fn from(error: crate::pam::PamError) -> Self {
        Error::AuthError(error.to_string())
    }
}

impl From<crate::pam::converse::CredentialError> for Error {
    fn from(error: crate::pam::converse::CredentialError) -> Self {
        Error::AuthError(error.to_string())
    }
}

impl From<getopts::Fail> for Error {
    fn from(error: getopts::Fail) -> Self {
        Error::ConfigError(error.to_string())
    }
}

impl From<nix::Error> for Error {
    fn from(error: nix::Error) -> Self {
        Error::Error(error.to_string())
    }
}
