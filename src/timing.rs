//! The Scanline/HBlank/VBlank timing state machine.
//!
//! Drives one dot-clock tick per call. Tick thresholds (960/272/1232) and
//! the transition table match the reference PPU's `Step()`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registers::IoRegisters;

/// Duration of the visible-drawing phase of a scanline, in ticks.
const SCANLINE_TICKS: u32 = 960;
/// Duration of the horizontal blanking phase, in ticks.
const HBLANK_TICKS: u32 = 272;
/// Duration of one full scanline while in vertical blank, in ticks.
const VBLANK_LINE_TICKS: u32 = 1232;

/// Last visible scanline (0-indexed); line 160 begins VBlank.
const LAST_VISIBLE_LINE: u16 = 159;
/// `vcount` value at which VBlank wraps back to 0 (reached, not exceeded).
const LAST_VCOUNT_LINE: u16 = 227;

/// Which phase of the scanline the display is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingState {
    /// Drawing the visible portion of the current line.
    Scanline,
    /// Horizontal blanking after a visible line has been drawn.
    HBlank,
    /// Vertical blanking (lines 160-227).
    VBlank,
}

impl Default for TimingState {
    fn default() -> Self {
        Self::Scanline
    }
}

/// The timing state machine's mutable state.
#[derive(Default, Serialize, Deserialize)]
pub struct Timing {
    /// Current phase.
    pub state: TimingState,
    /// Ticks elapsed since the last state transition.
    pub ticks: u32,
    /// Set for exactly one `step()` per visible line, on the
    /// Scanline→HBlank transition; cleared at the start of every `step()`.
    pub scanline_ready: bool,
}

impl Timing {
    /// Reset to the initial state: Scanline, ticks 0, `scanline_ready`
    /// false. Does not touch `io` (callers reset registers separately).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one dot-clock tick. Returns `true` exactly when the
    /// Scanline→HBlank transition fires this call, meaning the caller
    /// should composite line `io.vcount` before observing `scanline_ready`.
    pub fn step(&mut self, io: &mut IoRegisters) -> bool {
        self.scanline_ready = false;
        self.ticks += 1;

        let should_render = match self.state {
            TimingState::Scanline => self.step_scanline(io),
            TimingState::HBlank => {
                self.step_hblank(io);
                false
            }
            TimingState::VBlank => {
                self.step_vblank(io);
                false
            }
        };

        self.update_vcounter_match(io);
        should_render
    }

    fn step_scanline(&mut self, io: &mut IoRegisters) -> bool {
        if self.ticks < SCANLINE_TICKS {
            return false;
        }
        self.ticks = 0;
        self.state = TimingState::HBlank;
        io.set_hblank_flag(true);
        if io.get_hblank_irq_enable() {
            io.request_hblank_irq();
        }
        self.scanline_ready = true;
        debug!(vcount = io.vcount, "entering HBlank");
        true
    }

    fn step_hblank(&mut self, io: &mut IoRegisters) {
        if self.ticks < HBLANK_TICKS {
            return;
        }
        self.ticks = 0;
        io.set_hblank_flag(false);
        io.vcount += 1;
        self.check_vcounter_irq(io);

        if io.vcount > LAST_VISIBLE_LINE {
            self.state = TimingState::VBlank;
            io.set_vblank_flag(true);
            debug!("entering VBlank");
        } else {
            self.state = TimingState::Scanline;
        }
    }

    fn step_vblank(&mut self, io: &mut IoRegisters) {
        if self.ticks < VBLANK_LINE_TICKS {
            return;
        }
        self.ticks = 0;
        io.vcount += 1;
        self.check_vcounter_irq(io);

        if io.vcount == LAST_VISIBLE_LINE + 2 && io.get_vblank_irq_enable() {
            io.request_vblank_irq();
        }

        if io.vcount >= LAST_VCOUNT_LINE {
            io.vcount = 0;
            io.set_vblank_flag(false);
            self.state = TimingState::Scanline;
            self.check_vcounter_irq(io);
            debug!("VBlank wrapped to line 0");
        }
    }

    fn check_vcounter_irq(&self, io: &mut IoRegisters) {
        if io.vcount == io.get_vcount_setting() && io.get_vcounter_irq_enable() {
            io.request_vcounter_irq();
        }
    }

    fn update_vcounter_match(&self, io: &mut IoRegisters) {
        let matched = io.vcount == io.get_vcount_setting();
        io.set_vcounter_flag(matched);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_reset_then_one_scanline() {
        let mut timing = Timing::default();
        let mut io = IoRegisters::default();
        assert_eq!(timing.state, TimingState::Scanline);

        for _ in 0..SCANLINE_TICKS - 1 {
            let rendered = timing.step(&mut io);
            assert!(!rendered);
            assert!(!timing.scanline_ready);
        }
        let rendered = timing.step(&mut io);
        assert!(rendered);
        assert!(timing.scanline_ready);
        assert_eq!(timing.state, TimingState::HBlank);
    }

    #[test]
    fn hblank_irq_requested_when_enabled() {
        let mut timing = Timing::default();
        let mut io = IoRegisters {
            dispstat: 1 << 4, // HBlank IRQ enable
            ..Default::default()
        };
        for _ in 0..SCANLINE_TICKS {
            timing.step(&mut io);
        }
        assert_eq!(io.if_ & 0b010, 0b010);
        assert!(io.dispstat & 0b10 != 0, "hblank status bit set");
    }

    #[test]
    fn vblank_entered_after_160_lines() {
        let mut timing = Timing::default();
        let mut io = IoRegisters::default();

        for _ in 0..160 {
            for _ in 0..SCANLINE_TICKS {
                timing.step(&mut io);
            }
            for _ in 0..HBLANK_TICKS {
                timing.step(&mut io);
            }
        }
        assert_eq!(timing.state, TimingState::VBlank);
        assert_eq!(io.vcount, 160);
        assert_eq!(io.dispstat & 0b01, 0b01);
    }

    #[test]
    fn vcount_match_raises_irq_with_enable() {
        let mut timing = Timing::default();
        let mut io = IoRegisters {
            dispstat: (5 << 8) | (1 << 5), // LYC=5, VCounter IRQ enable
            ..Default::default()
        };
        // Drive through 5 full lines (scanline + hblank each).
        for _ in 0..5 {
            for _ in 0..SCANLINE_TICKS {
                timing.step(&mut io);
            }
            for _ in 0..HBLANK_TICKS {
                timing.step(&mut io);
            }
        }
        assert_eq!(io.vcount, 5);
        assert_eq!(io.if_ & 0b100, 0b100);
        assert!(io.get_vcounter_irq_enable());
    }

    #[test]
    fn scanline_ready_pulses_once_per_visible_line_per_frame() {
        let mut timing = Timing::default();
        let mut io = IoRegisters::default();
        let mut pulses = 0;

        // A full frame is 227 lines (vcount 0..=226, wrapping on reaching
        // 227), each 1232 ticks (960+272 while visible, 1232 while
        // blanking), whether the state machine is drawing, h-blanking, or
        // v-blanking.
        let ticks_per_frame = 227 * (SCANLINE_TICKS + HBLANK_TICKS);
        for _ in 0..ticks_per_frame {
            if timing.step(&mut io) {
                pulses += 1;
            }
        }
        assert_eq!(pulses, 160);
        assert_eq!(io.vcount, 0);
        assert_eq!(timing.state, TimingState::Scanline);
    }
}
