//! LCD I/O registers the video core reads and writes.
//!
//! # Register map
//!
//! | Field      | Address       | Description                          |
//! |------------|---------------|--------------------------------------|
//! | `dispcnt`  | `0x0400_0000` | LCD control (mode, layer enables)    |
//! | `dispstat` | `0x0400_0004` | LCD status (vblank/hblank/vcount)    |
//! | `vcount`   | `0x0400_0006` | Current scanline (0-227)             |
//! | `bg0cnt`   | `0x0400_0008` | BG0 control                          |
//! | `bg1cnt`   | `0x0400_000A` | BG1 control                          |
//! | `bg2cnt`   | `0x0400_000C` | BG2 control                          |
//! | `bg3cnt`   | `0x0400_000E` | BG3 control                          |
//! | `bg{n}hofs`/`bg{n}vofs` | `0x0400_0010`.. | per-background scroll   |
//! | `if_`      | `0x0400_0202` | Interrupt Request Flags              |
//!
//! Window, mosaic, blend, and affine-matrix registers a full GBA exposes in
//! this address range are out of scope (see the crate's non-goals) and are
//! not modeled here.
//!
//! # Background modes
//!
//! `dispcnt` bits 0-2 select the mode. This core implements modes 0 (four
//! text backgrounds), 3, 4, and 5 (bitmap, on BG2 only); modes 1, 2, 6, 7
//! are rejected by the compositor with [`crate::error::VideoError`].

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;

/// LCD control and status registers, plus the interrupt-request flags the
/// video core contributes to.
#[derive(Default, Serialize, Deserialize)]
pub struct IoRegisters {
    /// LCD Control.
    pub dispcnt: u16,
    /// General LCD Status (STAT, LYC).
    pub dispstat: u16,
    /// Vertical Counter (LY).
    pub vcount: u16,
    /// BG0 Control.
    pub bg0cnt: u16,
    /// BG1 Control.
    pub bg1cnt: u16,
    /// BG2 Control.
    pub bg2cnt: u16,
    /// BG3 Control.
    pub bg3cnt: u16,
    /// BG0 X-Offset.
    pub bg0hofs: u16,
    /// BG0 Y-Offset.
    pub bg0vofs: u16,
    /// BG1 X-Offset.
    pub bg1hofs: u16,
    /// BG1 Y-Offset.
    pub bg1vofs: u16,
    /// BG2 X-Offset.
    pub bg2hofs: u16,
    /// BG2 Y-Offset.
    pub bg2vofs: u16,
    /// BG3 X-Offset.
    pub bg3hofs: u16,
    /// BG3 Y-Offset.
    pub bg3vofs: u16,
    /// Interrupt Request Flags. OR-written by the video core; acknowledged
    /// (cleared) by the CPU side, which is out of scope here.
    pub if_: u16,
}

impl IoRegisters {
    /// Zero every register, as happens on a system reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Background mode (`dispcnt` bits 0-2).
    #[must_use]
    pub fn get_bg_mode(&self) -> u8 {
        self.dispcnt.get_bits(0..=2) as u8
    }

    /// Forced-blank bit (`dispcnt` bit 7).
    #[must_use]
    pub fn get_forced_blank(&self) -> bool {
        self.dispcnt.get_bit(7)
    }

    /// Bitmap page select for modes 4/5 (`dispcnt` bit 4).
    #[must_use]
    pub fn get_frame_select(&self) -> bool {
        self.dispcnt.get_bit(4)
    }

    #[must_use]
    pub fn get_bg0_enabled(&self) -> bool {
        self.dispcnt.get_bit(8)
    }

    #[must_use]
    pub fn get_bg1_enabled(&self) -> bool {
        self.dispcnt.get_bit(9)
    }

    #[must_use]
    pub fn get_bg2_enabled(&self) -> bool {
        self.dispcnt.get_bit(10)
    }

    #[must_use]
    pub fn get_bg3_enabled(&self) -> bool {
        self.dispcnt.get_bit(11)
    }

    /// LYC comparison value (`dispstat` bits 8-15).
    #[must_use]
    pub fn get_vcount_setting(&self) -> u16 {
        self.dispstat >> 8
    }

    #[must_use]
    pub fn get_vblank_irq_enable(&self) -> bool {
        self.dispstat.get_bit(3)
    }

    #[must_use]
    pub fn get_hblank_irq_enable(&self) -> bool {
        self.dispstat.get_bit(4)
    }

    #[must_use]
    pub fn get_vcounter_irq_enable(&self) -> bool {
        self.dispstat.get_bit(5)
    }

    pub fn set_vblank_flag(&mut self, value: bool) {
        self.dispstat.set_bit(0, value);
    }

    pub fn set_hblank_flag(&mut self, value: bool) {
        self.dispstat.set_bit(1, value);
    }

    pub fn set_vcounter_flag(&mut self, value: bool) {
        self.dispstat.set_bit(2, value);
    }

    pub fn request_vblank_irq(&mut self) {
        self.if_ |= 1 << 0;
    }

    pub fn request_hblank_irq(&mut self) {
        self.if_ |= 1 << 1;
    }

    pub fn request_vcounter_irq(&mut self) {
        self.if_ |= 1 << 2;
    }

    /// Priority (0-3, lower = in front) and control word for background `n`.
    #[must_use]
    pub fn bgcnt(&self, n: u8) -> u16 {
        match n {
            0 => self.bg0cnt,
            1 => self.bg1cnt,
            2 => self.bg2cnt,
            3 => self.bg3cnt,
            _ => unreachable!("only BG0-BG3 exist"),
        }
    }

    /// Scroll offsets `(hofs, vofs)` for background `n`.
    #[must_use]
    pub fn bg_scroll(&self, n: u8) -> (u16, u16) {
        match n {
            0 => (self.bg0hofs, self.bg0vofs),
            1 => (self.bg1hofs, self.bg1vofs),
            2 => (self.bg2hofs, self.bg2vofs),
            3 => (self.bg3hofs, self.bg3vofs),
            _ => unreachable!("only BG0-BG3 exist"),
        }
    }

    #[must_use]
    pub fn bg_enabled(&self, n: u8) -> bool {
        match n {
            0 => self.get_bg0_enabled(),
            1 => self.get_bg1_enabled(),
            2 => self.get_bg2_enabled(),
            3 => self.get_bg3_enabled(),
            _ => unreachable!("only BG0-BG3 exist"),
        }
    }
}

/// Decode a `bgcnt` control word's priority field (bits 0-1).
#[must_use]
pub fn priority(bgcnt: u16) -> u8 {
    bgcnt.get_bits(0..=1) as u8
}
