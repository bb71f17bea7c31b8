use std::fmt;

use crate::{plat::Terminal, report};

bitflags::bitflags! {
    /// The Z80 flag register (the low half of AF).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        /// Carry.
        const C = 1 << 0;
        /// Add/subtract.
        const N = 1 << 1;
        /// Parity/overflow.
        const PV = 1 << 2;
        /// Undocumented copy of bit 3 of the result.
        const X = 1 << 3;
        /// Half carry.
        const H = 1 << 4;
        /// Undocumented copy of bit 5 of the result.
        const Y = 1 << 5;
        /// Zero.
        const Z = 1 << 6;
        /// Sign.
        const S = 1 << 7;
    }
}

impl fmt::Display for Flags {
    /// Renders the flags MSB first as `SZ5H3PNC`, with `-` for each clear bit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, char); 8] = [
            (Flags::S, 'S'),
            (Flags::Z, 'Z'),
            (Flags::Y, '5'),
            (Flags::H, 'H'),
            (Flags::X, '3'),
            (Flags::PV, 'P'),
            (Flags::N, 'N'),
            (Flags::C, 'C'),
        ];
        for (flag, name) in NAMES {
            let c = if self.contains(flag) { name } else { '-' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// The programmer-visible Z80 register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub af: u16,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub af_alt: u16,
    pub bc_alt: u16,
    pub de_alt: u16,
    pub hl_alt: u16,
    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    pub r: u8,
    pub iff1: bool,
    pub iff2: bool,
}

impl Registers {
    /// The state the CPU is left in after /RESET: PC, I, R cleared, interrupts off, AF and SP all ones.
    pub fn power_on() -> Self {
        Self {
            af: 0xffff,
            bc: 0,
            de: 0,
            hl: 0,
            af_alt: 0xffff,
            bc_alt: 0,
            de_alt: 0,
            hl_alt: 0,
            ix: 0,
            iy: 0,
            sp: 0xffff,
            pc: 0,
            i: 0,
            r: 0,
            iff1: false,
            iff2: false,
        }
    }

    pub fn flags(&self) -> Flags {
        Flags::from_bits_retain((self.af & 0xff) as u8)
    }

    /// Writes the register dump shown by the `regs` command.
    pub fn dump(&self, out: &mut dyn Terminal) {
        report!(
            out,
            "PC={:04x} SP={:04x} AF={:04x} BC={:04x} DE={:04x} HL={:04x} IX={:04x} IY={:04x}\r\n",
            self.pc,
            self.sp,
            self.af,
            self.bc,
            self.de,
            self.hl,
            self.ix,
            self.iy
        );
        report!(
            out,
            "AF'={:04x} BC'={:04x} DE'={:04x} HL'={:04x} I={:02x} R={:02x} IFF1={} IFF2={} F={}\r\n",
            self.af_alt,
            self.bc_alt,
            self.de_alt,
            self.hl_alt,
            self.i,
            self.r,
            self.iff1 as u8,
            self.iff2 as u8,
            self.flags()
        );
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::power_on()
    }
}
