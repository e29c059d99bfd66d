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

    controller.rs

    The controller core: register file, command sequencing and the
    host-visible status byte.
*/

use crate::{
    command::{Command, CommandFamily, FORCE_INTERRUPT_IMMEDIATE},
    config::FdcConfig,
    drive::{ControlLines, DriveSignals},
    latches::StickyLatch,
    motor::{MotorEngine, MotorState},
    staging::StagingBuffer,
    stepper::{StepDirection, StepEngine},
    transfer::TransferEngine,
};

pub const FDC_REGISTER_COMMAND: u16 = 0;
pub const FDC_REGISTER_STATUS: u16 = 0;
pub const FDC_REGISTER_TRACK: u16 = 1;
pub const FDC_REGISTER_SECTOR: u16 = 2;
pub const FDC_REGISTER_DATA: u16 = 3;

// Status byte bit definitions
// --------------------------------------------------------------------------------
// Write-protect, record-not-found and CRC-error are fixed zero in this model;
// the collaborating drive model owns none of those conditions here.
pub const STATUS_MOTOR_ON: u8 = 0b1000_0000;
pub const STATUS_WRITE_PROTECT: u8 = 0b0100_0000;
// Spin-up-done in Type I status; data-mark position otherwise (fixed 0).
pub const STATUS_SPIN_UP_DONE: u8 = 0b0010_0000;
pub const STATUS_RECORD_NOT_FOUND: u8 = 0b0001_0000;
pub const STATUS_CRC_ERROR: u8 = 0b0000_1000;
pub const STATUS_TRACK_ZERO: u8 = 0b0000_0100;
// Bit 1 is the inverted index pulse in Type I status, the data-request
// latch otherwise.
pub const STATUS_INDEX: u8 = 0b0000_0010;
pub const STATUS_DATA_REQUEST: u8 = 0b0000_0010;
pub const STATUS_BUSY: u8 = 0b0000_0001;

/// Snapshot of controller internals for debug frontends.
#[derive(Clone, Debug)]
pub struct FdcDebugState {
    pub busy: bool,
    pub command: Command,
    pub command_reg: u8,
    pub track_reg: u8,
    pub sector_reg: u8,
    pub data_reg: u8,
    pub motor: MotorState,
    pub intrq: bool,
    pub drq: bool,
    pub staging_write: usize,
    pub staging_read: usize,
}

/// The WD1772-class controller core.
///
/// Host access is through [`read_register`](Fdc::read_register) and
/// [`write_register`](Fdc::write_register); each call models exactly one
/// recognized strobe edge, so a caller holding a strobe must not repeat the
/// call. The simulation advances through [`tick`](Fdc::tick), once per
/// disk-domain tick, consuming one [`DriveSignals`] sample and producing the
/// [`ControlLines`] for the drive.
///
/// A host write never blocks: it only records state. Completion is observed
/// through the status byte and the two sticky latches. Latching a new
/// command while busy overwrites the in-flight command state, matching the
/// reference behavior.
pub struct Fdc {
    config: FdcConfig,

    command_reg: u8,
    track_reg: u8,
    sector_reg: u8,
    data_reg: u8,

    command: Command,
    busy: bool,
    command_pulse: bool,

    motor: MotorEngine,
    stepper: StepEngine,
    transfer: TransferEngine,
    staging: StagingBuffer,

    intrq: StickyLatch,
    drq: StickyLatch,

    last_signals: DriveSignals,
    lines: ControlLines,
}

impl Default for Fdc {
    fn default() -> Self {
        Self::new(FdcConfig::default())
    }
}

impl Fdc {
    pub fn new(config: FdcConfig) -> Self {
        Self {
            config,
            command_reg: 0,
            track_reg: 0,
            sector_reg: 0,
            data_reg: 0,
            command: Command::None,
            busy: false,
            command_pulse: false,
            motor: MotorEngine::new(),
            stepper: StepEngine::new(),
            transfer: TransferEngine::new(),
            staging: StagingBuffer::new(),
            intrq: StickyLatch::new(),
            drq: StickyLatch::new(),
            last_signals: DriveSignals::default(),
            lines: ControlLines::default(),
        }
    }

    /// Host write strobe. One call per recognized rising edge.
    pub fn write_register(&mut self, reg: u16, data: u8) {
        match reg {
            FDC_REGISTER_COMMAND => self.latch_command(data),
            FDC_REGISTER_TRACK => {
                self.warn_if_transferring("track");
                self.track_reg = data;
            }
            FDC_REGISTER_SECTOR => {
                self.warn_if_transferring("sector");
                self.sector_reg = data;
            }
            FDC_REGISTER_DATA => {
                self.data_reg = data;
            }
            _ => {
                // Address decoding belongs to the host adapter; tolerate
                // strays rather than panic.
                log::warn!("write to unmapped register {}", reg);
            }
        }
    }

    /// Host read strobe. Reading Status acknowledges the interrupt latch;
    /// reading Data acknowledges the data-request latch.
    pub fn read_register(&mut self, reg: u16) -> u8 {
        match reg {
            FDC_REGISTER_STATUS => {
                self.intrq.clear();
                self.status_byte()
            }
            FDC_REGISTER_TRACK => self.track_reg,
            FDC_REGISTER_SECTOR => self.sector_reg,
            FDC_REGISTER_DATA => {
                self.drq.clear();
                self.data_reg
            }
            _ => {
                log::warn!("read from unmapped register {}", reg);
                0
            }
        }
    }

    /// Bulk-supply channel: append one byte to the staging buffer. Bytes
    /// beyond capacity are silently dropped.
    pub fn supply_byte(&mut self, byte: u8) {
        if !self.staging.push(byte) {
            log::trace!("staging buffer full; supplied byte dropped");
        }
    }

    pub fn supply_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.supply_byte(byte);
        }
    }

    /// Advance every engine by one disk-domain tick.
    pub fn tick(&mut self, signals: &DriveSignals) -> ControlLines {
        self.intrq.begin_tick();
        self.drq.begin_tick();
        self.last_signals = *signals;

        if signals.index_pulse {
            self.motor.index_edge();
        }
        // Engines need the motor at speed and the drive reporting ready;
        // either gate down means stall, never spontaneous failure.
        let engines_ready = self.motor.is_ready() && signals.ready;

        let mut lines = ControlLines::default();

        if self.stepper.active() {
            let step = self.stepper.tick(signals.track, engines_ready);
            lines.step_in = step.step_in;
            lines.step_out = step.step_out;
            if step.complete {
                self.command_complete();
            }
        }

        if self.transfer.active() {
            let xfer = self
                .transfer
                .tick(signals, self.sector_reg, &mut self.staging, engines_ready);
            if let Some(byte) = xfer.data {
                self.data_reg = byte;
            }
            if xfer.drq {
                self.drq.set();
            }
            if xfer.complete {
                self.command_complete();
            }
        }

        // An idle controller with the motor at speed arms the idle-rotation
        // countdown. This covers every completion path, forced or not.
        if !self.busy {
            self.motor.arm_idle(self.config.idle_rotations);
        }

        lines.motor_enable = self.motor.is_on();
        self.command_pulse = false;
        self.lines = lines;
        lines
    }

    /// External reset. Staging-buffer pointers are left alone; the next
    /// command latch resets them.
    pub fn reset(&mut self) {
        log::debug!("fdc: external reset");
        self.busy = false;
        self.command = Command::None;
        self.command_reg = 0;
        self.track_reg = 0;
        self.sector_reg = 0;
        self.data_reg = 0;
        self.command_pulse = false;
        self.intrq.clear();
        self.drq.clear();
        self.motor.stop();
        self.stepper.cancel();
        self.transfer.cancel();
        self.last_signals = DriveSignals::default();
        self.lines = ControlLines::default();
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Interrupt-request level signal.
    pub fn intrq(&self) -> bool {
        self.intrq.get()
    }

    /// Data-request level signal.
    pub fn drq(&self) -> bool {
        self.drq.get()
    }

    /// The "command received" pulse: asserted from a command latch until the
    /// end of the following tick.
    pub fn command_pulse(&self) -> bool {
        self.command_pulse
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn motor_state(&self) -> MotorState {
        self.motor.state()
    }

    /// Control lines produced by the most recent tick.
    pub fn control_lines(&self) -> ControlLines {
        self.lines
    }

    pub fn config(&self) -> &FdcConfig {
        &self.config
    }

    pub fn staging_pointers(&self) -> (usize, usize) {
        (self.staging.write_pointer(), self.staging.read_pointer())
    }

    pub fn debug_state(&self) -> FdcDebugState {
        FdcDebugState {
            busy: self.busy,
            command: self.command,
            command_reg: self.command_reg,
            track_reg: self.track_reg,
            sector_reg: self.sector_reg,
            data_reg: self.data_reg,
            motor: self.motor.state(),
            intrq: self.intrq.get(),
            drq: self.drq.get(),
            staging_write: self.staging.write_pointer(),
            staging_read: self.staging.read_pointer(),
        }
    }

    fn latch_command(&mut self, byte: u8) {
        let command = Command::decode(byte);
        log::debug!("fdc: command latched: {} ({:02X})", command, byte);
        self.command_reg = byte;

        if let Command::ForceInterrupt { condition } = command {
            self.command = command;
            self.force_interrupt(condition);
            return;
        }

        if self.busy {
            log::debug!("fdc: busy; in-flight command state overwritten");
        }

        self.command = command;
        self.busy = true;
        self.command_pulse = true;
        self.staging.reset_pointers();
        self.stepper.cancel();
        self.transfer.cancel();
        self.motor
            .command_received(command.wants_spin_up(), self.config.spin_up_rotations);

        match command {
            Command::Restore { rate, .. } => {
                self.track_reg = 0;
                self.begin_step(0, rate);
            }
            Command::Seek { rate, .. } => {
                // The track register reflects the destination ahead of the
                // mechanical motion.
                self.track_reg = self.data_reg;
                self.begin_step(self.data_reg, rate);
            }
            Command::Step { update, rate, .. } => {
                let target = self.step_target(self.stepper.direction());
                if update {
                    self.track_reg = target;
                }
                self.begin_step(target, rate);
            }
            Command::StepIn { update, rate, .. } => {
                self.stepper.set_direction(StepDirection::In);
                let target = self.step_target(StepDirection::In);
                if update {
                    self.track_reg = target;
                }
                self.begin_step(target, rate);
            }
            Command::StepOut { update, rate, .. } => {
                self.stepper.set_direction(StepDirection::Out);
                let target = self.step_target(StepDirection::Out);
                if update {
                    self.track_reg = target;
                }
                self.begin_step(target, rate);
            }
            Command::ReadSector => {
                self.transfer.begin_read_sector();
            }
            Command::ReadAddress => {
                self.transfer.begin_read_address();
            }
            Command::WriteSector | Command::ReadTrack | Command::WriteTrack => {
                log::warn!("fdc: {} has no modeled data path; completing at next index", command);
                self.transfer.begin_await_index();
            }
            Command::None | Command::ForceInterrupt { .. } => unreachable!(),
        }
    }

    fn step_target(&self, direction: StepDirection) -> u8 {
        match direction {
            StepDirection::In => self.track_reg.saturating_add(1),
            StepDirection::Out => self.track_reg.saturating_sub(1),
        }
    }

    fn begin_step(&mut self, target: u8, rate: u8) {
        self.stepper.begin(
            target,
            self.config.step_pulse_ticks(),
            self.config.step_rate_ticks(rate),
        );
    }

    /// Type IV: terminate whatever is in flight. The only cancellation path.
    /// Does not reset staging pointers and must not start a stopped motor.
    fn force_interrupt(&mut self, condition: u8) {
        log::debug!("fdc: force interrupt, condition {:01X}", condition);
        self.busy = false;
        self.stepper.cancel();
        self.transfer.cancel();
        self.motor.cancel_idle();

        if condition & FORCE_INTERRUPT_IMMEDIATE != 0 {
            self.intrq.set();
        }
        else if condition != 0 {
            log::debug!("fdc: force-interrupt condition bits {:01X} not modeled", condition);
        }
    }

    fn command_complete(&mut self) {
        log::trace!("fdc: {} complete", self.command);
        self.busy = false;
        self.intrq.set();
    }

    /// Compose the status byte. Never stored; recomputed on every host read.
    fn status_byte(&self) -> u8 {
        let mut status = 0;

        if self.motor.is_on() {
            status |= STATUS_MOTOR_ON;
        }

        match self.command.family() {
            CommandFamily::TypeI | CommandFamily::TypeIV => {
                if self.motor.is_ready() {
                    status |= STATUS_SPIN_UP_DONE;
                }
                if self.last_signals.track == 0 {
                    status |= STATUS_TRACK_ZERO;
                }
                if !self.last_signals.index_pulse {
                    status |= STATUS_INDEX;
                }
            }
            _ => {
                if self.drq.get() {
                    status |= STATUS_DATA_REQUEST;
                }
            }
        }

        if self.busy {
            status |= STATUS_BUSY;
        }

        status
    }

    fn warn_if_transferring(&self, name: &str) {
        if self.transfer.active() {
            log::warn!("fdc: {} register written during transfer", name);
        }
    }
}
