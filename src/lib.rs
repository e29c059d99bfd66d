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

    lib.rs
*/

//! A WD1772-class floppy disk controller core.
//!
//! This crate models the command-processing heart of the controller: the
//! four-register host interface, the command state machine, and its
//! timing-critical sub-engines for motor spin-up, head stepping and
//! sector transfer through a 1 KiB staging buffer.
//!
//! The physical drive is a collaborator, not part of this crate's core: the
//! controller consumes a per-tick [`DriveSignals`] sample and produces
//! [`ControlLines`] back. A reference rotating-drive model, [`SimDrive`],
//! is bundled for embedders and scenario tests.
//!
//! ```
//! use fdc1772::{DriveGeometry, Fdc, SimDrive};
//!
//! let mut fdc = Fdc::default();
//! let mut drive = SimDrive::new(DriveGeometry::default());
//!
//! // Seek to track 4 with spin-up.
//! fdc.write_register(3, 4);
//! fdc.write_register(0, 0x18);
//!
//! while fdc.busy() {
//!     let signals = drive.tick(fdc.control_lines());
//!     fdc.tick(&signals);
//! }
//! assert_eq!(drive.track(), 4);
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod drive;
pub mod latches;
pub mod motor;
pub mod staging;
pub mod stepper;
pub mod transfer;

pub use command::{Command, CommandFamily};
pub use config::FdcConfig;
pub use controller::{Fdc, FdcDebugState};
pub use drive::{ControlLines, DriveGeometry, DriveSignals, SimDrive};
pub use motor::MotorState;
pub use staging::{StagingBuffer, STAGING_CAPACITY};
pub use stepper::StepDirection;
pub use transfer::SECTOR_SIZE;
