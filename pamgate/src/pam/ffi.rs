use std::convert::TryFrom;
use std::ffi::CStr;
use std::{mem, ptr, slice};

use libc::{c_char, c_int, c_void, size_t};
use pam_sys::{PamConversation, PamMessage, PamMessageStyle, PamResponse, PamReturnCode};

use super::converse::PasswordConv;
use super::PAM_MAX_NUM_MSG;

/// Allocator for memory that is handed over to libpam
///
/// libpam releases conversation responses with free(3), so production code
/// must use `Libc`. Other implementations exist to exercise failure paths.
pub trait RawAlloc {
    unsafe fn calloc(&self, n: size_t, size: size_t) -> *mut c_void;
    unsafe fn malloc(&self, size: size_t) -> *mut c_void;
    unsafe fn free(&self, p: *mut c_void);
}

pub struct Libc;

impl RawAlloc for Libc {
    unsafe fn calloc(&self, n: size_t, size: size_t) -> *mut c_void {
        libc::calloc(n, size)
    }
    unsafe fn malloc(&self, size: size_t) -> *mut c_void {
        libc::malloc(size)
    }
    unsafe fn free(&self, p: *mut c_void) {
        libc::free(p)
    }
}

/// A zeroed array of responses that owns every answer written into it.
///
/// Dropping the batch frees each answer and then the array itself, so any
/// early return out of a conversation turn leaves nothing allocated.
/// `into_raw` gives up ownership once the batch is complete.
struct ResponseBatch<'a, A: RawAlloc> {
    ptr: *mut PamResponse,
    len: usize,
    alloc: &'a A,
}

impl<'a, A: RawAlloc> ResponseBatch<'a, A> {
    fn new(len: usize, alloc: &'a A) -> Option<Self> {
        // calloc(0, ..) may legitimately return NULL, so always ask for a slot.
        let ptr = unsafe { alloc.calloc(len.max(1), mem::size_of::<PamResponse>() as size_t) }
            as *mut PamResponse;
        if ptr.is_null() {
            return None;
        }
        Some(ResponseBatch { ptr, len, alloc })
    }

    fn slots(&mut self) -> &mut [PamResponse] {
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    fn answer(&mut self, idx: usize, secret: &CStr) -> Result<(), ()> {
        let bytes = secret.to_bytes_with_nul();
        let buf = unsafe { self.alloc.malloc(bytes.len() as size_t) } as *mut c_char;
        if buf.is_null() {
            return Err(());
        }
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr() as *const c_char, buf, bytes.len()) };
        self.slots()[idx].resp = buf;
        Ok(())
    }

    fn into_raw(self) -> *mut PamResponse {
        let ptr = self.ptr;
        mem::forget(self);
        ptr
    }
}

impl<'a, A: RawAlloc> Drop for ResponseBatch<'a, A> {
    fn drop(&mut self) {
        let alloc = self.alloc;
        for slot in self.slots() {
            if !slot.resp.is_null() {
                unsafe { alloc.free(slot.resp as *mut c_void) };
                slot.resp = ptr::null_mut();
            }
        }
        unsafe { alloc.free(self.ptr as *mut c_void) };
    }
}

pub fn make_conversation(passwd_conv: &PasswordConv) -> PamConversation {
    PamConversation {
        conv: Some(converse),
        data_ptr: passwd_conv as *const PasswordConv as *mut c_void,
    }
}

pub extern "C" fn converse(
    num_msg: c_int,
    msg: *mut *mut PamMessage,
    out_resp: *mut *mut PamResponse,
    appdata_ptr: *mut c_void,
) -> c_int {
    respond(num_msg, msg, out_resp, appdata_ptr, &Libc) as c_int
}

/// Answers one conversation turn.
///
/// Hidden-input prompts get a fresh copy of the password, everything else is
/// left empty. On failure `out_resp` is left untouched and no memory remains
/// allocated.
pub fn respond<A: RawAlloc>(
    num_msg: c_int,
    msg: *mut *mut PamMessage,
    out_resp: *mut *mut PamResponse,
    appdata_ptr: *mut c_void,
    alloc: &A,
) -> PamReturnCode {
    let count = match usize::try_from(num_msg) {
        Ok(n) if n <= PAM_MAX_NUM_MSG => n,
        Ok(n) => {
            log::warn!("pam_conv: refusing conversation of {} messages", n);
            return PamReturnCode::BUF_ERR;
        }
        Err(_) => return PamReturnCode::CONV_ERR,
    };
    if out_resp.is_null() || appdata_ptr.is_null() || (count > 0 && msg.is_null()) {
        return PamReturnCode::CONV_ERR;
    }

    let handler = unsafe { &*(appdata_ptr as *const PasswordConv) };
    let requests: &[*mut PamMessage] = if count == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(msg as *const *mut PamMessage, count) }
    };

    let mut batch = match ResponseBatch::new(count, alloc) {
        Some(b) => b,
        None => return PamReturnCode::BUF_ERR,
    };

    for (idx, m) in requests.iter().enumerate() {
        if m.is_null() {
            return PamReturnCode::CONV_ERR;
        }
        if unsafe { (**m).msg_style } != PamMessageStyle::PROMPT_ECHO_OFF as c_int {
            continue;
        }
        if batch.answer(idx, handler.secret()).is_err() {
            return PamReturnCode::BUF_ERR;
        }
    }

    unsafe { *out_resp = batch.into_raw() };
    PamReturnCode::SUCCESS
}
