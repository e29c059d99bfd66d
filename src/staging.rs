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

    staging.rs

    Fixed-capacity staging buffer between the bulk-supply channel and the
    sector transfer engine.
*/

/// Staging buffer capacity in bytes. Equal to one sector.
pub const STAGING_CAPACITY: usize = 1024;

/// A fixed-capacity byte buffer with independent, non-wrapping write and
/// read pointers.
///
/// The external bulk-supply channel appends at the write pointer while the
/// transfer engine consumes at the read pointer; the two sides never contend
/// because ownership is time-sliced by command boundaries. Both pointers are
/// reset to zero when a new command is latched. Contents of the previous
/// command are invalidated by the pointer reset alone; the memory is never
/// cleared, so a reader that outruns the supplier sees stale bytes.
///
/// Once a pointer reaches capacity, further operations on that side are
/// silent no-ops. Overrun and underrun are unsignaled by design.
pub struct StagingBuffer {
    data: [u8; STAGING_CAPACITY],
    wptr: usize,
    rptr: usize,
}

impl StagingBuffer {
    pub fn new() -> Self {
        Self {
            data: [0; STAGING_CAPACITY],
            wptr: 0,
            rptr: 0,
        }
    }

    /// Reset both pointers to zero. Does not touch the backing memory.
    pub fn reset_pointers(&mut self) {
        self.wptr = 0;
        self.rptr = 0;
    }

    /// Append one byte at the write pointer. Returns false if the buffer was
    /// already full and the byte was dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.wptr < STAGING_CAPACITY {
            self.data[self.wptr] = byte;
            self.wptr += 1;
            true
        }
        else {
            false
        }
    }

    /// Consume one byte at the read pointer, or None once the read pointer
    /// has reached capacity.
    pub fn pop(&mut self) -> Option<u8> {
        if self.rptr < STAGING_CAPACITY {
            let byte = self.data[self.rptr];
            self.rptr += 1;
            Some(byte)
        }
        else {
            None
        }
    }

    pub fn write_pointer(&self) -> usize {
        self.wptr
    }

    pub fn read_pointer(&self) -> usize {
        self.rptr
    }
}
