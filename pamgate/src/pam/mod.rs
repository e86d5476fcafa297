pub mod converse;
pub(crate) mod ffi;
pub mod session;

pub use pam_sys::PamReturnCode;

/// Largest number of messages libpam passes in one conversation turn.
pub const PAM_MAX_NUM_MSG: usize = 32;

/// Largest message libpam exchanges, terminator included.
pub const PAM_MAX_MSG_SIZE: usize = 512;

pub struct PamError(PamReturnCode);

impl PamError {
    pub fn code(&self) -> PamReturnCode {
        self.0
    }
}

impl std::fmt::Debug for PamError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "PamError({:?})", self.0)
    }
}

impl std::fmt::Display for PamError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{:?}", self.0)
    }
}

impl std::error::Error for PamError {}

impl From<PamReturnCode> for PamError {
    fn from(err: PamReturnCode) -> PamError {
        PamError(err)
    }
}
