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

    config.rs

    Controller timing configuration.
*/

use serde::Deserialize;

/// Timing parameters for the controller core.
///
/// All engine countdowns are derived from these values. The defaults carry
/// the reference WD1772 behavior: a 1 µs tick, six rotations of spin-up, ten
/// rotations of idle before motor-off, step rates of 2/3/5/6 ms and a 1 ms
/// step pulse. Deserializable so an embedding machine configuration can
/// override individual fields from its TOML.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FdcConfig {
    /// Simulation ticks per millisecond. Tests shrink this to keep scenario
    /// runs short.
    pub ticks_per_ms: u32,
    /// Rotation-index edges counted before the motor reports ready.
    pub spin_up_rotations: u8,
    /// Rotation-index edges of inactivity before the motor stops.
    pub idle_rotations: u8,
    /// Milliseconds per step, indexed by the two rate bits of a Type I
    /// command.
    pub step_rates_ms: [u32; 4],
    /// Width of the direction-qualified step pulse, in milliseconds.
    pub step_pulse_ms: u32,
}

impl Default for FdcConfig {
    fn default() -> Self {
        Self {
            ticks_per_ms: 1000,
            spin_up_rotations: 6,
            idle_rotations: 10,
            step_rates_ms: [2, 3, 5, 6],
            step_pulse_ms: 1,
        }
    }
}

impl FdcConfig {
    /// Full step interval in ticks for the given rate selector.
    pub fn step_rate_ticks(&self, rate: u8) -> u32 {
        self.step_rates_ms[(rate & 0x03) as usize] * self.ticks_per_ms
    }

    /// Step pulse width in ticks. Never less than one tick.
    pub fn step_pulse_ticks(&self) -> u32 {
        (self.step_pulse_ms * self.ticks_per_ms).max(1)
    }
}
