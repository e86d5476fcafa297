use std::ptr;

use libc::c_int;
use pam_sys::{PamConversation, PamHandle, PamReturnCode};

use super::PamError;

/// The three calls an authentication attempt makes into a PAM stack
///
/// `start` receives the conversation binding; the binding, and whatever its
/// application data points at, must stay alive until `end` has returned.
pub trait Backend {
    type Handle;

    fn start(
        &self,
        service: &str,
        user: &str,
        conv: &PamConversation,
    ) -> Result<Self::Handle, PamError>;

    fn authenticate(&self, handle: &mut Self::Handle, flags: c_int) -> PamReturnCode;

    fn end(&self, handle: Self::Handle, status: PamReturnCode) -> Result<(), PamError>;
}

/// The host's libpam.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPam;

pub struct PamSession {
    handle: *mut PamHandle,
}

impl Backend for SystemPam {
    type Handle = PamSession;

    fn start(
        &self,
        service: &str,
        user: &str,
        conv: &PamConversation,
    ) -> Result<PamSession, PamError> {
        let mut pam_handle: *mut PamHandle = ptr::null_mut();
        match pam_sys::start(service, Some(user), conv, &mut pam_handle) {
            PamReturnCode::SUCCESS if !pam_handle.is_null() => Ok(PamSession {
                handle: pam_handle,
            }),
            PamReturnCode::SUCCESS => Err(PamReturnCode::SYSTEM_ERR.into()),
            code => Err(code.into()),
        }
    }

    fn authenticate(&self, session: &mut PamSession, flags: c_int) -> PamReturnCode {
        // The wrapped pam_sys::authenticate takes a single PamFlag, so the
        // combined mask goes through the raw binding.
        PamReturnCode::from(unsafe { pam_sys::raw::pam_authenticate(session.handle, flags) })
    }

    fn end(&self, session: PamSession, status: PamReturnCode) -> Result<(), PamError> {
        match pam_sys::end(unsafe { &mut *session.handle }, status) {
            PamReturnCode::SUCCESS => Ok(()),
            code => Err(code.into()),
        }
    }
}
