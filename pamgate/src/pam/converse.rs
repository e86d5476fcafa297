use std::ffi::{CStr, CString};
use std::{fmt, mem};

use thiserror::Error as ThisError;

use super::PAM_MAX_MSG_SIZE;
use crate::scrambler::Scrambler;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password is empty")]
    Empty,

    #[error("password is longer than {} bytes", PAM_MAX_MSG_SIZE - 1)]
    TooLong,

    #[error("password contains a NUL byte")]
    Nul,
}

/// A password for exactly one authentication attempt
///
/// The bytes are checked once, on construction: they must be non-empty, free
/// of NUL bytes, and fit in a single PAM message together with their
/// terminator. The contents are never exposed through `Debug`, and are
/// scrambled when the credential is dropped.
pub struct Credential(CString);

impl Credential {
    pub fn new<T: AsRef<[u8]>>(password: T) -> Result<Credential, CredentialError> {
        let bytes = password.as_ref();
        if bytes.is_empty() {
            return Err(CredentialError::Empty);
        }
        if bytes.len() >= PAM_MAX_MSG_SIZE {
            return Err(CredentialError::TooLong);
        }
        CString::new(bytes)
            .map(Credential)
            .map_err(|_| CredentialError::Nul)
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        mem::take(&mut self.0).into_bytes_with_nul().scramble();
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// A non-interactive conversation handler bound to a single password
///
/// The handler answers every hidden-input prompt with the password and
/// leaves every other message unanswered. It is handed to libpam as the
/// conversation's application data and must outlive the PAM handle that
/// references it.
#[derive(Debug)]
pub struct PasswordConv {
    passwd: Credential,
}

impl PasswordConv {
    pub fn new(passwd: Credential) -> PasswordConv {
        PasswordConv { passwd }
    }

    pub fn secret(&self) -> &CStr {
        self.passwd.as_c_str()
    }
}
