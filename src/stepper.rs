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

    stepper.rs

    Head step-pulse generation toward a target track.
*/

/// Head movement direction. `In` moves toward higher track numbers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StepDirection {
    #[default]
    In,
    Out,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum StepPhase {
    #[default]
    Idle,
    Pulse(u32),
    Recovery(u32),
}

/// Per-tick output of the step engine.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepTick {
    pub step_in: bool,
    pub step_out: bool,
    pub complete: bool,
}

/// Generates direction-qualified step pulses at the programmed rate until
/// the drive reports the target track.
///
/// The engine never counts steps: completion is positional, because a
/// physical seek may take fewer pulses than expected at the track-0 stop.
/// Direction is re-evaluated between pulses from the reported position, and
/// persists after completion so a plain Step command can reuse it.
#[derive(Debug, Default)]
pub struct StepEngine {
    active: bool,
    target: u8,
    direction: StepDirection,
    phase: StepPhase,
    pulse_ticks: u32,
    rate_ticks: u32,
}

impl StepEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Direction of the most recent step movement.
    pub fn direction(&self) -> StepDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: StepDirection) {
        self.direction = direction;
    }

    /// Arm the engine. `rate_ticks` is the full step interval; the pulse
    /// itself occupies the first `pulse_ticks` of it. A rate at or below the
    /// pulse width is stretched by the one-tick deassert between pulses.
    pub fn begin(&mut self, target: u8, pulse_ticks: u32, rate_ticks: u32) {
        log::trace!("stepper: seeking to track {}", target);
        self.active = true;
        self.target = target;
        self.phase = StepPhase::Idle;
        self.pulse_ticks = pulse_ticks;
        self.rate_ticks = rate_ticks.max(pulse_ticks);
    }

    /// Abandon any in-flight pulse timing. Used by Force Interrupt and
    /// external reset.
    pub fn cancel(&mut self) {
        self.active = false;
        self.phase = StepPhase::Idle;
    }

    /// Advance one tick against the drive-reported track. Stalls (no pulse,
    /// no completion) until the motor is ready. A pulse already in flight is
    /// always played out before position is re-examined.
    pub fn tick(&mut self, current_track: u8, motor_ready: bool) -> StepTick {
        let mut out = StepTick::default();
        if !self.active {
            return out;
        }

        match self.phase {
            StepPhase::Idle => {
                if !motor_ready {
                    return out;
                }
                if current_track == self.target {
                    log::trace!("stepper: reached track {}", current_track);
                    self.active = false;
                    out.complete = true;
                    return out;
                }
                self.direction = if current_track < self.target {
                    StepDirection::In
                }
                else {
                    StepDirection::Out
                };
                self.assert_pulse(&mut out);
                self.phase = self.after_pulse_tick(self.pulse_ticks);
            }
            StepPhase::Pulse(remaining) => {
                self.assert_pulse(&mut out);
                self.phase = self.after_pulse_tick(remaining);
            }
            StepPhase::Recovery(remaining) => {
                self.phase = if remaining > 1 {
                    StepPhase::Recovery(remaining - 1)
                }
                else {
                    StepPhase::Idle
                };
            }
        }

        out
    }

    // Next phase after a tick that asserted the pulse, with `remaining`
    // pulse ticks counting the one just spent. The line always deasserts for
    // at least one tick so an edge-detecting drive sees one edge per pulse,
    // even when the step rate equals the pulse width.
    fn after_pulse_tick(&self, remaining: u32) -> StepPhase {
        if remaining > 1 {
            StepPhase::Pulse(remaining - 1)
        }
        else {
            StepPhase::Recovery(self.rate_ticks.saturating_sub(self.pulse_ticks).max(1))
        }
    }

    fn assert_pulse(&self, out: &mut StepTick) {
        match self.direction {
            StepDirection::In => out.step_in = true,
            StepDirection::Out => out.step_out = true,
        }
    }
}
