//! One-shot username and password checks against the host's PAM stack.
//!
//! The PAM conversation answers hidden-input prompts with the supplied
//! password and leaves every other message unanswered. The outcome of an
//! attempt is reduced to a boolean by [`check_authentication`].

pub mod error;
mod gate;
pub mod pam;
pub mod scrambler;

pub use gate::{check_authentication, AttemptOutcome, Gate, SERVICE};
