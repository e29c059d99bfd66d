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

    drive.rs

    Drive-signal contract and a reference drive model.
*/

//! The controller core consumes the drive through a small per-tick signal
//! contract and produces three control lines back. Any drive model that
//! fills in a [`DriveSignals`] each tick can sit behind the controller;
//! scenario tests may also script the signal structs by hand. [`SimDrive`]
//! is a bundled reference model with a simple rotation schedule.

use anyhow::{anyhow, Error};

use crate::transfer::SECTOR_SIZE;

/// Signals sampled from the drive once per tick. Pulse fields are asserted
/// for exactly the tick of their edge.
#[derive(Copy, Clone, Debug, Default)]
pub struct DriveSignals {
    /// One pulse per full medium rotation.
    pub index_pulse: bool,
    /// Drive-ready level. While deasserted the controller's step and
    /// transfer engines stall in place.
    pub ready: bool,
    /// Current head position (7 bits used).
    pub track: u8,
    /// Sector number currently under the head (4 bits used).
    pub sector: u8,
    /// A sector ID header is passing under the head.
    pub sector_header: bool,
    /// The head is inside a sector's data region.
    pub sector_data: bool,
    /// One pulse per byte at the disk's native data rate.
    pub data_clock: bool,
}

/// Control lines driven by the controller core.
#[derive(Copy, Clone, Debug, Default)]
pub struct ControlLines {
    pub step_in: bool,
    pub step_out: bool,
    pub motor_enable: bool,
}

/// Geometry and rotation schedule of a [`SimDrive`].
#[derive(Copy, Clone, Debug)]
pub struct DriveGeometry {
    pub tracks: u8,
    pub sectors_per_track: u8,
    /// Idle ticks between one sector's data region and the next header.
    pub gap_ticks: u32,
}

impl Default for DriveGeometry {
    fn default() -> Self {
        Self {
            tracks: 80,
            sectors_per_track: 5,
            gap_ticks: 16,
        }
    }
}

impl DriveGeometry {
    /// Ticks occupied by one sector slot: header, data bytes, gap.
    fn slot_ticks(&self) -> u32 {
        1 + SECTOR_SIZE as u32 + self.gap_ticks
    }

    fn rotation_ticks(&self) -> u32 {
        self.sectors_per_track as u32 * self.slot_ticks()
    }
}

/// A minimal rotating-drive model implementing the signal contract.
///
/// Per rotation it emits an index pulse, then for each sector slot one
/// header pulse followed by `SECTOR_SIZE` data-clock ticks with the
/// sector-data qualifier asserted, then a gap. The platter turns only while
/// motor-enable is held; the controller's spin-up counter models the time to
/// reach speed. Step pulses move the head on their rising edge, clamped at
/// both geometry edges.
///
/// Media content is held per sector for harnesses to feed the controller's
/// bulk-supply channel; this model does not serialize data bits itself.
pub struct SimDrive {
    geometry: DriveGeometry,
    media: Vec<Vec<Vec<u8>>>,
    track: u8,
    rotation_pos: u32,
    spinning: bool,
    prev_step_in: bool,
    prev_step_out: bool,
}

impl SimDrive {
    pub fn new(geometry: DriveGeometry) -> Self {
        let media = (0..geometry.tracks)
            .map(|_| vec![Vec::new(); geometry.sectors_per_track as usize])
            .collect();

        Self {
            geometry,
            media,
            track: 0,
            rotation_pos: 0,
            spinning: false,
            prev_step_in: false,
            prev_step_out: false,
        }
    }

    pub fn geometry(&self) -> DriveGeometry {
        self.geometry
    }

    pub fn track(&self) -> u8 {
        self.track
    }

    /// Park the head at an arbitrary track. Test/harness setup only.
    pub fn set_track(&mut self, track: u8) {
        self.track = track.min(self.geometry.tracks.saturating_sub(1));
    }

    /// Store media content for one sector. Up to `SECTOR_SIZE` bytes.
    pub fn load_sector(&mut self, track: u8, sector: u8, data: &[u8]) -> Result<(), Error> {
        if track >= self.geometry.tracks || sector >= self.geometry.sectors_per_track {
            return Err(anyhow!("sector {}/{} outside drive geometry", track, sector));
        }
        if data.len() > SECTOR_SIZE {
            return Err(anyhow!("sector data of {} bytes exceeds sector size", data.len()));
        }

        self.media[track as usize][sector as usize] = data.to_vec();
        Ok(())
    }

    /// Media content of one sector, for feeding the bulk-supply channel.
    pub fn sector_bytes(&self, track: u8, sector: u8) -> Option<&[u8]> {
        self.media
            .get(track as usize)
            .and_then(|t| t.get(sector as usize))
            .map(|s| s.as_slice())
    }

    /// Advance one tick against the controller's control lines and report
    /// the resulting drive signals.
    pub fn tick(&mut self, lines: ControlLines) -> DriveSignals {
        // Head movement on step-pulse rising edges.
        if lines.step_in && !self.prev_step_in {
            self.track = self.track.saturating_add(1).min(self.geometry.tracks.saturating_sub(1));
        }
        if lines.step_out && !self.prev_step_out {
            self.track = self.track.saturating_sub(1);
        }
        self.prev_step_in = lines.step_in;
        self.prev_step_out = lines.step_out;

        self.spinning = lines.motor_enable;

        let mut signals = DriveSignals {
            track: self.track,
            ..Default::default()
        };

        let rotation_ticks = self.geometry.rotation_ticks();
        if !self.spinning || rotation_ticks == 0 {
            return signals;
        }

        self.rotation_pos = (self.rotation_pos + 1) % rotation_ticks;

        let slot_ticks = self.geometry.slot_ticks();
        let slot = self.rotation_pos / slot_ticks;
        let within = self.rotation_pos % slot_ticks;

        signals.ready = true;
        signals.sector = slot as u8;
        signals.index_pulse = self.rotation_pos == 0;
        signals.sector_header = within == 0;
        if (1..=SECTOR_SIZE as u32).contains(&within) {
            signals.sector_data = true;
            signals.data_clock = true;
        }

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin(lines_motor: bool) -> ControlLines {
        ControlLines {
            motor_enable: lines_motor,
            ..Default::default()
        }
    }

    #[test]
    fn rotation_schedule_emits_headers_and_data() {
        let geometry = DriveGeometry {
            tracks: 2,
            sectors_per_track: 3,
            gap_ticks: 2,
        };
        let mut drive = SimDrive::new(geometry);

        let mut headers = 0;
        let mut data_clocks = 0;
        let mut index = 0;
        for _ in 0..geometry.rotation_ticks() {
            let signals = drive.tick(spin(true));
            headers += signals.sector_header as usize;
            data_clocks += signals.data_clock as usize;
            index += signals.index_pulse as usize;
        }

        assert_eq!(headers, 3);
        assert_eq!(data_clocks, 3 * SECTOR_SIZE);
        assert_eq!(index, 1);
    }

    #[test]
    fn stationary_when_motor_off() {
        let mut drive = SimDrive::new(DriveGeometry::default());
        for _ in 0..1000 {
            let signals = drive.tick(spin(false));
            assert!(!signals.ready);
            assert!(!signals.index_pulse && !signals.data_clock);
        }
    }

    #[test]
    fn step_pulses_move_head_on_rising_edge_only() {
        let mut drive = SimDrive::new(DriveGeometry {
            tracks: 3,
            ..Default::default()
        });

        let step_in = ControlLines {
            step_in: true,
            motor_enable: true,
            ..Default::default()
        };

        // Held pulse: one movement.
        drive.tick(step_in);
        drive.tick(step_in);
        drive.tick(step_in);
        assert_eq!(drive.track(), 1);

        drive.tick(spin(true));
        drive.tick(step_in);
        assert_eq!(drive.track(), 2);

        // Clamped at the top edge.
        drive.tick(spin(true));
        drive.tick(step_in);
        assert_eq!(drive.track(), 2);
    }

    #[test]
    fn step_out_clamps_at_track_zero() {
        let mut drive = SimDrive::new(DriveGeometry::default());
        let step_out = ControlLines {
            step_out: true,
            motor_enable: true,
            ..Default::default()
        };
        drive.tick(step_out);
        assert_eq!(drive.track(), 0);
    }

    #[test]
    fn load_sector_validates_geometry() {
        let mut drive = SimDrive::new(DriveGeometry {
            tracks: 2,
            sectors_per_track: 2,
            gap_ticks: 2,
        });
        assert!(drive.load_sector(0, 1, &[1, 2, 3]).is_ok());
        assert!(drive.load_sector(2, 0, &[1]).is_err());
        assert!(drive.load_sector(0, 0, &vec![0; SECTOR_SIZE + 1]).is_err());
        assert_eq!(drive.sector_bytes(0, 1), Some(&[1u8, 2, 3][..]));
    }
}
