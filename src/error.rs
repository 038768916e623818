//! Error conditions the video core can raise.
//!
//! The core distinguishes guest-ROM programming errors from internal bugs.
//! Neither is a normal control-flow signal: IRQ delivery (OR-ing bits into
//! `if_`) is the normal channel and never goes through [`VideoError`].

use thiserror::Error;

/// A condition the video core refuses to render through.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VideoError {
    /// `DISPCNT` selected a background mode this core does not implement
    /// (1, 2, 6, or 7). This is a guest-ROM programming error: the core
    /// fails fast rather than attempting a best-effort render.
    #[error("invalid video mode {mode}: only modes 0, 3, 4, 5 are implemented")]
    InvalidVideoMode { mode: u8 },

    /// An address computed while rendering fell outside the memory region
    /// it indexes into. The data model guarantees this cannot happen by
    /// construction, so reaching this variant indicates a core bug rather
    /// than a guest-ROM mistake.
    #[error("internal invariant violated: {detail}")]
    InternalInvariantViolated { detail: &'static str },
}
