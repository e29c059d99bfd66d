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

    tests/scenarios.rs

    End-to-end controller scenarios against the reference drive model.
*/

use fdc1772::{
    DriveGeometry, DriveSignals, Fdc, FdcConfig, MotorState, SimDrive, SECTOR_SIZE,
};

use rand::Rng;

// Shrunk tick scale so scenario runs stay short. Rotation and spin-up
// semantics are unchanged; only the millisecond granularity is coarser.
fn test_config() -> FdcConfig {
    FdcConfig {
        ticks_per_ms: 4,
        ..Default::default()
    }
}

fn test_geometry() -> DriveGeometry {
    DriveGeometry {
        tracks: 42,
        sectors_per_track: 5,
        gap_ticks: 8,
    }
}

struct Harness {
    fdc: Fdc,
    drive: SimDrive,
}

impl Harness {
    fn new() -> Self {
        Self {
            fdc: Fdc::new(test_config()),
            drive: SimDrive::new(test_geometry()),
        }
    }

    fn tick(&mut self) -> DriveSignals {
        let lines = self.fdc.control_lines();
        let signals = self.drive.tick(lines);
        self.fdc.tick(&signals);
        signals
    }

    fn run_until_idle(&mut self, max_ticks: usize) {
        for _ in 0..max_ticks {
            self.tick();
            if !self.fdc.busy() {
                return;
            }
        }
        panic!("controller still busy after {} ticks", max_ticks);
    }
}

#[test]
fn restore_steps_out_to_track_zero() {
    let mut h = Harness::new();
    h.drive.set_track(5);

    // Restore with spin-up, 2 ms rate.
    h.fdc.write_register(0, 0x08);
    assert!(h.fdc.busy());

    let mut index_edges_before_first_step = 0;
    let mut first_step_seen = false;
    let mut step_out_pulses = 0;
    let mut prev_step_out = false;

    for _ in 0..300_000 {
        let signals = h.tick();
        let lines = h.fdc.control_lines();

        if !first_step_seen && signals.index_pulse {
            index_edges_before_first_step += 1;
        }
        if lines.step_out && !prev_step_out {
            first_step_seen = true;
            step_out_pulses += 1;
        }
        prev_step_out = lines.step_out;

        if !h.fdc.busy() {
            break;
        }
    }

    assert!(!h.fdc.busy());
    assert!(h.fdc.intrq());
    assert_eq!(h.drive.track(), 0);
    assert_eq!(h.fdc.read_register(1), 0);
    assert_eq!(step_out_pulses, 5);
    // No stepping until the full spin-up sequence has elapsed.
    assert_eq!(index_edges_before_first_step, 6);
}

#[test]
fn seek_updates_track_register_ahead_of_motion() {
    let mut h = Harness::new();

    h.fdc.write_register(3, 40);
    h.fdc.write_register(0, 0x18);

    // Destination visible immediately, long before the head arrives.
    assert_eq!(h.fdc.read_register(1), 40);
    assert!(h.fdc.busy());
    assert_ne!(h.drive.track(), 40);

    h.run_until_idle(500_000);

    assert_eq!(h.drive.track(), 40);
    assert!(h.fdc.intrq());
}

#[test]
fn read_sector_delivers_staged_bytes_in_order() {
    let mut h = Harness::new();
    let mut rng = rand::thread_rng();
    let payload: Vec<u8> = (0..SECTOR_SIZE).map(|_| rng.gen()).collect();

    h.fdc.write_register(2, 3);
    h.fdc.write_register(0, 0x80);
    // Bulk supply follows the latch; the latch reset the pointers.
    h.fdc.supply_bytes(&payload);

    let mut received = Vec::new();
    let mut drq_count = 0;
    let mut completed = false;

    for _ in 0..200_000 {
        h.tick();
        if h.fdc.drq() {
            drq_count += 1;
            received.push(h.fdc.read_register(3));
        }
        if !h.fdc.busy() && h.fdc.intrq() {
            // Terminal byte raised the interrupt instead of a data request.
            received.push(h.fdc.read_register(3));
            completed = true;
            break;
        }
    }

    assert!(completed, "read sector never completed");
    assert_eq!(drq_count, SECTOR_SIZE - 1);
    assert_eq!(received, payload);
}

#[test]
fn read_sector_waits_for_staged_data() {
    let mut h = Harness::new();

    h.fdc.write_register(2, 1);
    h.fdc.write_register(0, 0x80);

    // Nothing staged: several rotations pass with no transfer start.
    for _ in 0..30_000 {
        h.tick();
        assert!(!h.fdc.drq());
    }
    assert!(h.fdc.busy());

    h.fdc.supply_bytes(&[0xA5; 16]);
    h.run_until_idle(100_000);
    assert!(h.fdc.intrq());
}

#[test]
fn force_interrupt_abandons_transfer_mid_sector() {
    let mut h = Harness::new();
    let payload: Vec<u8> = (0..SECTOR_SIZE).map(|i| (i % 256) as u8).collect();

    h.fdc.write_register(2, 3);
    h.fdc.write_register(0, 0x80);
    h.fdc.supply_bytes(&payload);

    let mut received = Vec::new();
    for _ in 0..200_000 {
        h.tick();
        if h.fdc.drq() {
            received.push(h.fdc.read_register(3));
        }
        if received.len() == 200 {
            break;
        }
    }
    assert_eq!(received.len(), 200);
    assert!(h.fdc.busy());

    h.fdc.write_register(0, 0xD8);
    assert!(!h.fdc.busy());
    assert!(h.fdc.intrq());

    // Remaining bytes are never delivered and pointers stay where the
    // transfer stopped.
    let pointers_at_interrupt = h.fdc.staging_pointers();
    assert_eq!(pointers_at_interrupt, (SECTOR_SIZE, 200));
    for _ in 0..20_000 {
        h.tick();
        assert!(!h.fdc.drq());
    }
    assert_eq!(h.fdc.staging_pointers(), pointers_at_interrupt);

    // The next command latch is what resets them.
    h.fdc.write_register(0, 0x80);
    assert_eq!(h.fdc.staging_pointers(), (0, 0));
}

#[test]
fn read_address_streams_id_field() {
    let mut h = Harness::new();
    h.drive.set_track(12);

    h.fdc.write_register(0, 0xC0);

    let mut received = Vec::new();
    let mut completed = false;
    for _ in 0..100_000 {
        h.tick();
        if h.fdc.drq() {
            received.push(h.fdc.read_register(3));
        }
        if !h.fdc.busy() && h.fdc.intrq() {
            received.push(h.fdc.read_register(3));
            completed = true;
            break;
        }
    }

    assert!(completed, "read address never completed");
    assert_eq!(received.len(), 6);
    assert_eq!(received[0], 12);
    assert_eq!(received[1], 0);
    assert!(received[2] < test_geometry().sectors_per_track);
    assert_eq!(received[3], 0x03);
    assert_eq!(&received[4..], &[0xDE, 0xAD]);
}

#[test]
fn motor_proceeds_immediately_when_already_spinning() {
    let mut h = Harness::new();

    h.fdc.write_register(0, 0x08);
    h.run_until_idle(300_000);
    assert!(h.fdc.motor_state() != MotorState::Stopped);

    // Step In while the motor is at speed: first pulse within one step
    // interval, no new spin-up.
    h.fdc.write_register(0, 0x48);
    let mut saw_pulse = false;
    for _ in 0..16 {
        h.tick();
        if h.fdc.control_lines().step_in {
            saw_pulse = true;
            break;
        }
    }
    assert!(saw_pulse);
}

#[test]
fn motor_stops_after_exact_idle_rotations() {
    let mut h = Harness::new();

    h.fdc.write_register(0, 0x08);
    h.run_until_idle(300_000);

    let mut index_edges = 0;
    for _ in 0..200_000 {
        let signals = h.tick();
        if signals.index_pulse {
            index_edges += 1;
        }
        if !h.fdc.control_lines().motor_enable {
            break;
        }
    }

    assert!(!h.fdc.control_lines().motor_enable);
    assert_eq!(index_edges, 10);
    assert_eq!(h.fdc.motor_state(), MotorState::Stopped);
}

#[test]
fn command_latch_restarts_idle_countdown() {
    let mut h = Harness::new();

    h.fdc.write_register(0, 0x08);
    h.run_until_idle(300_000);

    // Let part of the countdown elapse, then latch another command.
    let mut index_edges = 0;
    while index_edges < 5 {
        let signals = h.tick();
        index_edges += signals.index_pulse as usize;
    }
    h.fdc.write_register(0, 0x30);
    h.run_until_idle(10_000);

    // A full countdown runs again from the second completion.
    let mut index_edges = 0;
    for _ in 0..200_000 {
        let signals = h.tick();
        index_edges += signals.index_pulse as usize;
        if !h.fdc.control_lines().motor_enable {
            break;
        }
    }
    assert_eq!(index_edges, 10);
}

#[test]
fn write_sector_without_data_path_completes_at_index() {
    let mut h = Harness::new();

    h.fdc.write_register(0, 0xA0);
    assert!(h.fdc.busy());

    let mut saw_drq = false;
    for _ in 0..100_000 {
        h.tick();
        saw_drq |= h.fdc.drq();
        if !h.fdc.busy() {
            break;
        }
    }

    assert!(!h.fdc.busy());
    assert!(h.fdc.intrq());
    assert!(!saw_drq);
}

#[test]
fn absent_drive_signals_stall_until_forced() {
    let mut fdc = Fdc::new(test_config());

    fdc.write_register(2, 1);
    fdc.write_register(0, 0x80);
    fdc.supply_bytes(&[0x11; 4]);

    // A dead drive: no pulses, never ready. The controller must not fail
    // spontaneously.
    let dead = DriveSignals::default();
    for _ in 0..50_000 {
        fdc.tick(&dead);
        assert!(fdc.busy());
    }

    fdc.write_register(0, 0xD8);
    assert!(!fdc.busy());
    assert!(fdc.intrq());
}

#[test]
fn reset_mid_spin_up_discards_engine_state() {
    let mut h = Harness::new();

    h.fdc.write_register(0, 0x08);
    let mut index_edges = 0;
    while index_edges < 2 {
        let signals = h.tick();
        index_edges += signals.index_pulse as usize;
    }
    assert!(matches!(h.fdc.motor_state(), MotorState::SpinningUp(_)));

    h.fdc.reset();
    assert!(!h.fdc.busy());
    assert_eq!(h.fdc.motor_state(), MotorState::Stopped);

    h.tick();
    assert!(!h.fdc.control_lines().motor_enable);
}
