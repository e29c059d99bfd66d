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

    latches.rs

    Sticky interrupt and data-request latches.
*/

//! The controller exposes two level signals to the host environment: the
//! interrupt request and the data request. Both are sticky: a completion
//! event raises them and they stay raised until the host acknowledges by
//! reading the corresponding register, or until an external reset.
//!
//! The set and clear edges originate in different clock domains. In this
//! single-threaded tick model both are folded into one settlement window per
//! tick, with clear taking priority over a simultaneous set so that a host
//! that just acknowledged a latch never observes it set again for free.

/// A set/clear flag with "clear wins" priority inside one tick window.
#[derive(Debug, Default)]
pub struct StickyLatch {
    value: bool,
    cleared_this_tick: bool,
}

impl StickyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new settlement window. Called once at the top of each
    /// controller tick.
    pub fn begin_tick(&mut self) {
        self.cleared_this_tick = false;
    }

    /// Request the latch be raised. Suppressed if a clear was already seen
    /// in the current window.
    pub fn set(&mut self) {
        if !self.cleared_this_tick {
            self.value = true;
        }
    }

    /// Lower the latch and suppress any set for the remainder of the window.
    pub fn clear(&mut self) {
        self.value = false;
        self.cleared_this_tick = true;
    }

    pub fn get(&self) -> bool {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_is_sticky() {
        let mut latch = StickyLatch::new();
        latch.begin_tick();
        latch.set();
        assert!(latch.get());

        // The setting condition going away does not lower the latch.
        latch.begin_tick();
        assert!(latch.get());

        latch.clear();
        assert!(!latch.get());
    }

    #[test]
    fn clear_wins_over_simultaneous_set() {
        let mut latch = StickyLatch::new();
        latch.begin_tick();
        latch.clear();
        latch.set();
        assert!(!latch.get(), "set in the same window as a clear must lose");

        // A set in the next window succeeds again.
        latch.begin_tick();
        latch.set();
        assert!(latch.get());
    }

    #[test]
    fn clear_wins_regardless_of_order() {
        let mut latch = StickyLatch::new();
        latch.begin_tick();
        latch.set();
        latch.clear();
        latch.set();
        assert!(!latch.get());
    }
}
