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

    transfer.rs

    Sector transfer engine: header matching and the byte-transfer pipeline.
*/

use crate::{drive::DriveSignals, staging::StagingBuffer};

/// Sector payload length in bytes.
pub const SECTOR_SIZE: usize = 1024;

/// Size code reported in an ID field for a 1024-byte sector.
pub const SECTOR_SIZE_CODE: u8 = 0x03;

/// Checksum bytes appended to a Read Address response. Stub constants, not
/// computed CRCs.
pub const ID_CRC_STUB: [u8; 2] = [0xDE, 0xAD];

const ID_FIELD_LEN: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum TransferPhase {
    #[default]
    Idle,
    /// Read Address: waiting for any sector-header pulse.
    AwaitHeader,
    /// Read Address: streaming the captured 6-byte ID field.
    StreamId { idx: usize, id: [u8; ID_FIELD_LEN] },
    /// Read Sector: waiting for a header matching the sector register with
    /// at least one staged byte available.
    AwaitSector,
    /// Read Sector: streaming bytes from the staging buffer.
    StreamSector { remaining: usize },
    /// Unimplemented data operation: terminate at the next index pulse.
    AwaitIndex,
}

/// Per-tick output of the transfer engine.
#[derive(Copy, Clone, Debug, Default)]
pub struct TransferTick {
    /// Byte delivered to the data register this tick, if any.
    pub data: Option<u8>,
    /// Raise the data-request latch. Suppressed on the terminal byte.
    pub drq: bool,
    /// Final byte delivered; command is complete.
    pub complete: bool,
}

/// Matches drive position against the requested sector and clocks bytes out
/// of the staging buffer at the disk's own data rate. Byte pacing comes from
/// the drive's data clock, never from host speed.
#[derive(Debug, Default)]
pub struct TransferEngine {
    phase: TransferPhase,
}

impl TransferEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> bool {
        self.phase != TransferPhase::Idle
    }

    pub fn begin_read_address(&mut self) {
        self.phase = TransferPhase::AwaitHeader;
    }

    pub fn begin_read_sector(&mut self) {
        self.phase = TransferPhase::AwaitSector;
    }

    /// Arm a recognized command with no modeled data path. The command holds
    /// busy until the next index pulse, then completes.
    pub fn begin_await_index(&mut self) {
        self.phase = TransferPhase::AwaitIndex;
    }

    /// Abandon any transfer in progress. Staging-buffer pointers are left
    /// where they are.
    pub fn cancel(&mut self) {
        self.phase = TransferPhase::Idle;
    }

    pub fn tick(
        &mut self,
        signals: &DriveSignals,
        sector_reg: u8,
        staging: &mut StagingBuffer,
        motor_ready: bool,
    ) -> TransferTick {
        let mut out = TransferTick::default();
        if !motor_ready {
            return out;
        }

        self.phase = match std::mem::take(&mut self.phase) {
            TransferPhase::Idle => TransferPhase::Idle,
            TransferPhase::AwaitHeader => {
                if signals.sector_header {
                    log::trace!("transfer: id field for track {} sector {}", signals.track, signals.sector);
                    let id = [
                        signals.track,
                        0,
                        signals.sector,
                        SECTOR_SIZE_CODE,
                        ID_CRC_STUB[0],
                        ID_CRC_STUB[1],
                    ];
                    TransferPhase::StreamId { idx: 0, id }
                }
                else {
                    TransferPhase::AwaitHeader
                }
            }
            TransferPhase::StreamId { mut idx, id } => {
                if signals.data_clock {
                    out.data = Some(id[idx]);
                    idx += 1;
                    if idx == ID_FIELD_LEN {
                        out.complete = true;
                        TransferPhase::Idle
                    }
                    else {
                        out.drq = true;
                        TransferPhase::StreamId { idx, id }
                    }
                }
                else {
                    TransferPhase::StreamId { idx, id }
                }
            }
            TransferPhase::AwaitSector => {
                // Do not declare transfer-start before the bulk supplier has
                // delivered anything; wait for the next matching header.
                if signals.sector_header && signals.sector == sector_reg && staging.write_pointer() > 0 {
                    log::trace!("transfer: sector {} found on track {}", sector_reg, signals.track);
                    TransferPhase::StreamSector {
                        remaining: SECTOR_SIZE,
                    }
                }
                else {
                    TransferPhase::AwaitSector
                }
            }
            TransferPhase::StreamSector { mut remaining } => {
                if signals.data_clock && signals.sector_data {
                    // An exhausted read pointer is an unsignaled underrun:
                    // the byte counter still advances.
                    out.data = staging.pop();
                    remaining -= 1;
                    if remaining == 0 {
                        out.complete = true;
                        TransferPhase::Idle
                    }
                    else {
                        out.drq = out.data.is_some();
                        TransferPhase::StreamSector { remaining }
                    }
                }
                else {
                    TransferPhase::StreamSector { remaining }
                }
            }
            TransferPhase::AwaitIndex => {
                if signals.index_pulse {
                    out.complete = true;
                    TransferPhase::Idle
                }
                else {
                    TransferPhase::AwaitIndex
                }
            }
        };

        out
    }
}
