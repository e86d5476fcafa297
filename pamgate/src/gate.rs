use libc::c_int;
use pam_sys::{PamFlag, PamReturnCode};

use crate::error::Error;
use crate::pam::converse::{Credential, PasswordConv};
use crate::pam::ffi::make_conversation;
use crate::pam::session::{Backend, SystemPam};

/// PAM service name, selecting /etc/pam.d/pamgate.
pub const SERVICE: &str = "pamgate";

const AUTH_FLAGS: c_int = PamFlag::SILENT as c_int | PamFlag::DISALLOW_NULL_AUTHTOK as c_int;

/// How a single authentication attempt ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttemptOutcome {
    Success,
    /// The stack refused the credentials or the account.
    Rejected(PamReturnCode),
    /// The stack, a module, or the conversation failed.
    Error(PamReturnCode),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        *self == AttemptOutcome::Success
    }
}

impl From<PamReturnCode> for AttemptOutcome {
    fn from(code: PamReturnCode) -> Self {
        match code {
            PamReturnCode::SUCCESS => AttemptOutcome::Success,
            PamReturnCode::AUTH_ERR
            | PamReturnCode::USER_UNKNOWN
            | PamReturnCode::MAXTRIES
            | PamReturnCode::CRED_INSUFFICIENT
            | PamReturnCode::PERM_DENIED => AttemptOutcome::Rejected(code),
            _ => AttemptOutcome::Error(code),
        }
    }
}

/// Runs one-shot password checks against a PAM backend.
pub struct Gate<B: Backend> {
    backend: B,
}

impl<B: Backend> Gate<B> {
    pub fn new(backend: B) -> Gate<B> {
        Gate { backend }
    }

    /// Returns true only if the backend accepted the password for the user.
    pub fn check_authentication(&self, username: &str, password: &str) -> bool {
        match self.attempt(username, password) {
            Ok(AttemptOutcome::Success) => {
                log::info!("authenticated user {}", username);
                true
            }
            Ok(outcome) => {
                log::info!("authentication failed for user {}: {:?}", username, outcome);
                false
            }
            Err(e) => {
                log::warn!("authentication not attempted for user {}: {}", username, e);
                false
            }
        }
    }

    /// Runs exactly one attempt: start, authenticate, end.
    ///
    /// Input that can never be passed to PAM is refused before the backend is
    /// touched. Once a session is started it is always ended with the
    /// authentication result.
    pub fn attempt(&self, username: &str, password: &str) -> Result<AttemptOutcome, Error> {
        if username.contains('\0') {
            return Err(Error::AuthError("username contains a NUL byte".to_string()));
        }
        let passwd_conv = PasswordConv::new(Credential::new(password)?);
        let conv = make_conversation(&passwd_conv);

        let mut handle = self.backend.start(SERVICE, username, &conv)?;
        let code = self.backend.authenticate(&mut handle, AUTH_FLAGS);
        log::debug!("pam_authenticate for user {} returned {:?}", username, code);
        if let Err(e) = self.backend.end(handle, code) {
            log::warn!("unable to end pam session: {}", e);
        }

        Ok(AttemptOutcome::from(code))
    }
}

/// Checks a username and password against the system PAM stack.
pub fn check_authentication(username: &str, password: &str) -> bool {
    Gate::new(SystemPam).check_authentication(username, password)
}
