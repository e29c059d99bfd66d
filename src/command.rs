/*
    fdc1772-rs

    Copyright 2025 the fdc1772-rs contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    command.rs

    Command byte classification for the WD1772-class command set.
*/

use std::fmt::Display;

use modular_bitfield::{bitfield, prelude::*};

/// Flag layout of a Type I command byte.
///
/// `op` selects Restore/Seek/Step/Step-In/Step-Out from the high bits;
/// `update` is only meaningful for the three step variants. The verify flag
/// is decoded but this core performs no verify pass.
#[bitfield]
#[derive(Copy, Clone)]
pub struct TypeIByte {
    pub rate:    B2,
    pub verify:  bool,
    pub spin_up: bool,
    pub update:  bool,
    pub op:      B3,
}

/// Flag layout of a Type IV (Force Interrupt) command byte. Bit 3 of the
/// condition nibble requests an immediate interrupt.
#[bitfield]
#[derive(Copy, Clone)]
pub struct TypeIvByte {
    pub condition: B4,
    #[skip]
    unused: B4,
}

pub const FORCE_INTERRUPT_IMMEDIATE: u8 = 0b1000;

/// The four command classes of the controller, determining which engine
/// governs execution.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CommandFamily {
    #[default]
    TypeI,
    TypeII,
    TypeIII,
    TypeIV,
}

/// A decoded command byte. Immutable once latched until the next command
/// register write.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Command {
    #[default]
    None,
    Restore {
        spin_up: bool,
        rate: u8,
    },
    Seek {
        spin_up: bool,
        rate: u8,
    },
    Step {
        update: bool,
        spin_up: bool,
        rate: u8,
    },
    StepIn {
        update: bool,
        spin_up: bool,
        rate: u8,
    },
    StepOut {
        update: bool,
        spin_up: bool,
        rate: u8,
    },
    ReadSector,
    WriteSector,
    ReadAddress,
    ReadTrack,
    WriteTrack,
    ForceInterrupt {
        condition: u8,
    },
}

impl Command {
    /// Classify a command byte. Every byte value decodes to some command;
    /// there is no invalid opcode in this command set.
    pub fn decode(byte: u8) -> Command {
        let t1 = TypeIByte::from_bytes([byte]);
        let spin_up = t1.spin_up();
        let update = t1.update();
        let rate = t1.rate();

        match byte >> 4 {
            0x0 => Command::Restore { spin_up, rate },
            0x1 => Command::Seek { spin_up, rate },
            0x2 | 0x3 => Command::Step { update, spin_up, rate },
            0x4 | 0x5 => Command::StepIn { update, spin_up, rate },
            0x6 | 0x7 => Command::StepOut { update, spin_up, rate },
            0x8 | 0x9 => Command::ReadSector,
            0xA | 0xB => Command::WriteSector,
            0xC => Command::ReadAddress,
            0xD => Command::ForceInterrupt {
                condition: TypeIvByte::from_bytes([byte]).condition(),
            },
            0xE => Command::ReadTrack,
            _ => Command::WriteTrack,
        }
    }

    pub fn family(&self) -> CommandFamily {
        match self {
            Command::None
            | Command::Restore { .. }
            | Command::Seek { .. }
            | Command::Step { .. }
            | Command::StepIn { .. }
            | Command::StepOut { .. } => CommandFamily::TypeI,
            Command::ReadSector | Command::WriteSector => CommandFamily::TypeII,
            Command::ReadAddress | Command::ReadTrack | Command::WriteTrack => CommandFamily::TypeIII,
            Command::ForceInterrupt { .. } => CommandFamily::TypeIV,
        }
    }

    /// Whether latching this command should request the motor spin-up
    /// sequence when the motor is stopped. Type II/III commands always
    /// require the motor; only Type I carries an explicit flag.
    pub fn wants_spin_up(&self) -> bool {
        match self {
            Command::None | Command::ForceInterrupt { .. } => false,
            Command::Restore { spin_up, .. }
            | Command::Seek { spin_up, .. }
            | Command::Step { spin_up, .. }
            | Command::StepIn { spin_up, .. }
            | Command::StepOut { spin_up, .. } => *spin_up,
            _ => true,
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::None => write!(f, "None"),
            Command::Restore { .. } => write!(f, "Restore"),
            Command::Seek { .. } => write!(f, "Seek"),
            Command::Step { .. } => write!(f, "Step"),
            Command::StepIn { .. } => write!(f, "Step In"),
            Command::StepOut { .. } => write!(f, "Step Out"),
            Command::ReadSector => write!(f, "Read Sector"),
            Command::WriteSector => write!(f, "Write Sector"),
            Command::ReadAddress => write!(f, "Read Address"),
            Command::ReadTrack => write!(f, "Read Track"),
            Command::WriteTrack => write!(f, "Write Track"),
            Command::ForceInterrupt { .. } => write!(f, "Force Interrupt"),
        }
    }
}
