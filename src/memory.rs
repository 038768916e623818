//! Video memory — Palette RAM, VRAM, and OAM.
//!
//! These are the memory regions the PPU reads to render backgrounds. In a
//! full system they are memory-mapped and shared with the CPU and DMA
//! controller; this crate models them as a plain value the video core is
//! handed each step, per the borrowed-handle design in `DESIGN.md`.
//!
//! # Palette RAM layout
//!
//! 1 KiB, 512 little-endian 15-bit-RGB entries, 2 bytes each:
//! - Background palette: entries 0–255, byte offset `0x000`.
//! - Sprite (OBJ) palette: entries 256–511, byte offset `0x200`.
//!
//! Modeled as a single flat array (rather than two separately-typed BG/OBJ
//! arrays) so [`crate::pixel::read_palette_entry`] can take an explicit
//! `palette_base`, matching how the reference renderer indexes palette RAM.
//!
//! # VRAM layout
//!
//! 96 KiB. Interpreted differently depending on the active video mode —
//! tile pixel blocks and tile maps in mode 0, linear bitmap pages in modes
//! 3–5. See `compositor` and `tile` for the concrete offsets.
//!
//! # OAM
//!
//! 1 KiB, present for completeness. Sprite (OBJ) rendering is out of scope
//! for this crate, so OAM is never read by anything here.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Byte size of palette RAM.
pub const PAL_SIZE: usize = 0x400;
/// Byte offset of the background palette half within [`VideoMemory::pal`].
pub const BG_PALETTE_BASE: usize = 0x000;
/// Byte offset of the sprite palette half within [`VideoMemory::pal`].
pub const OBJ_PALETTE_BASE: usize = 0x200;

/// Byte size of VRAM.
pub const VRAM_SIZE: usize = 0x1_8000;

/// Byte size of OAM.
pub const OAM_SIZE: usize = 0x400;

/// Palette RAM, VRAM, and OAM — the memory the video core reads to render.
#[serde_as]
#[derive(Serialize, Deserialize)]
pub struct VideoMemory {
    /// Palette RAM (`0x0500_0000`-`0x0500_03FF`): BG half then OBJ half.
    #[serde_as(as = "Box<[_; PAL_SIZE]>")]
    pub pal: Box<[u8; PAL_SIZE]>,

    /// Video RAM (`0x0600_0000`-`0x0601_7FFF`).
    #[serde_as(as = "Box<[_; VRAM_SIZE]>")]
    pub vram: Box<[u8; VRAM_SIZE]>,

    /// Object Attribute Memory (`0x0700_0000`-`0x0700_03FF`). Unused.
    #[serde_as(as = "Box<[_; OAM_SIZE]>")]
    pub oam: Box<[u8; OAM_SIZE]>,
}

impl Default for VideoMemory {
    fn default() -> Self {
        Self {
            pal: Box::new([0; PAL_SIZE]),
            vram: Box::new([0; VRAM_SIZE]),
            oam: Box::new([0; OAM_SIZE]),
        }
    }
}

impl VideoMemory {
    /// Zero every byte, as happens on a system reset.
    pub fn reset(&mut self) {
        self.pal.fill(0);
        self.vram.fill(0);
        self.oam.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zeroed() {
        let mem = VideoMemory::default();
        assert!(mem.pal.iter().all(|&b| b == 0));
        assert!(mem.vram.iter().all(|&b| b == 0));
        assert!(mem.oam.iter().all(|&b| b == 0));
    }

    #[test]
    fn reset_clears_prior_writes() {
        let mut mem = VideoMemory::default();
        mem.pal[4] = 0xAB;
        mem.vram[1000] = 0xCD;
        mem.oam[10] = 0xEF;

        mem.reset();

        assert_eq!(mem.pal[4], 0);
        assert_eq!(mem.vram[1000], 0);
        assert_eq!(mem.oam[10], 0);
    }

    #[test]
    fn obj_palette_base_is_past_bg_half() {
        assert_eq!(OBJ_PALETTE_BASE, BG_PALETTE_BASE + 256 * 2);
    }
}
