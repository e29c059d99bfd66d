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

    motor.rs

    Motor and spin-up sequencing.
*/

//! The motor engine gates the step and transfer engines: neither makes
//! progress until the motor reports ready. Spin-up and the idle timeout are
//! both paced by rotation-index edges from the drive, not by the host clock.

/// Motor engine state. `SpinningUp` and `IdleCountdown` carry rotations
/// remaining.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MotorState {
    #[default]
    Stopped,
    SpinningUp(u8),
    Ready,
    IdleCountdown(u8),
}

#[derive(Debug, Default)]
pub struct MotorEngine {
    state: MotorState,
}

impl MotorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Motor-enable level presented to the drive.
    pub fn is_on(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }

    /// Whether the sub-engines are permitted to proceed. The idle countdown
    /// keeps the motor at speed, so it still counts as ready.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, MotorState::Ready | MotorState::IdleCountdown(_))
    }

    /// A command has been latched. Cancels any idle countdown; starts the
    /// spin-up sequence if the motor is stopped and the command asked for it,
    /// otherwise the motor is considered at speed immediately.
    pub fn command_received(&mut self, spin_up: bool, spin_up_rotations: u8) {
        match self.state {
            MotorState::Stopped => {
                if spin_up && spin_up_rotations > 0 {
                    log::trace!("motor: spin-up started, {} rotations", spin_up_rotations);
                    self.state = MotorState::SpinningUp(spin_up_rotations);
                }
                else {
                    self.state = MotorState::Ready;
                }
            }
            MotorState::IdleCountdown(_) => {
                self.state = MotorState::Ready;
            }
            _ => {}
        }
    }

    /// Cancel a running idle countdown without otherwise disturbing the
    /// motor. Used by Force Interrupt, which must not start a stopped motor.
    pub fn cancel_idle(&mut self) {
        if let MotorState::IdleCountdown(_) = self.state {
            self.state = MotorState::Ready;
        }
    }

    /// Begin the idle-rotation countdown. Only meaningful from `Ready`; the
    /// controller calls this whenever it sits idle with the motor at speed.
    pub fn arm_idle(&mut self, idle_rotations: u8) {
        if let MotorState::Ready = self.state {
            if idle_rotations > 0 {
                self.state = MotorState::IdleCountdown(idle_rotations);
            }
        }
    }

    /// One rotation-index edge observed from the drive.
    pub fn index_edge(&mut self) {
        match self.state {
            MotorState::SpinningUp(n) => {
                if n <= 1 {
                    log::trace!("motor: spin-up complete");
                    self.state = MotorState::Ready;
                }
                else {
                    self.state = MotorState::SpinningUp(n - 1);
                }
            }
            MotorState::IdleCountdown(n) => {
                if n <= 1 {
                    log::trace!("motor: idle timeout, stopping");
                    self.state = MotorState::Stopped;
                }
                else {
                    self.state = MotorState::IdleCountdown(n - 1);
                }
            }
            _ => {}
        }
    }

    /// External reset: motor off, counters discarded.
    pub fn stop(&mut self) {
        self.state = MotorState::Stopped;
    }
}
