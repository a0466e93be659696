use crate::frame::{Byte, FRAME_LEN, Frame};
use chrono::{DateTime, Local};

/// Number of accumulator channels the meter reports.
pub const ENERGY_GROUPS: usize = 10;

/// Byte offset of the first accumulator slot; slots are 8 bytes wide.
const ENERGY_GROUPS_OFFSET: usize = 16;

/// One accumulator channel: cumulative charge and energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnergyGroup {
    pub charge_mah: u32,
    pub energy_mwh: u32,
}

/// Decoded, scaled measurements from one [`Frame`].
///
/// Every field sits at a fixed byte offset with a fixed big-endian width;
/// this layout is the wire contract with the meter. The divisors replicate
/// the device's reporting units and are not independently calibrated.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    /// Local clock at decode time. The meter does not transmit one.
    pub timestamp: DateTime<Local>,
    pub voltage_v: f64,
    pub current_a: f64,
    pub power_w: f64,
    pub temperature_c: i16,
    pub temperature_f: i16,
    pub energy_groups: [EnergyGroup; ENERGY_GROUPS],
    pub data_line_pos_v: f64,
    pub data_line_neg_v: f64,
    pub resistance_ohm: f64,
}

impl From<&Frame> for Telemetry {
    fn from(frame: &Frame) -> Self {
        let d = frame.as_bytes();

        let mut energy_groups = [EnergyGroup::default(); ENERGY_GROUPS];
        for (slot, group) in energy_groups.iter_mut().enumerate() {
            let at = ENERGY_GROUPS_OFFSET + slot * 8;
            group.charge_mah = be_u32(d, at);
            group.energy_mwh = be_u32(d, at + 4);
        }

        Telemetry {
            timestamp: Local::now(),
            voltage_v: f64::from(be_i16(d, 2)) / 1000.0,
            current_a: f64::from(be_i16(d, 4)) / 10000.0,
            power_w: f64::from(be_u32(d, 6)) / 1000.0,
            temperature_c: be_i16(d, 10),
            temperature_f: be_i16(d, 12),
            energy_groups,
            data_line_pos_v: f64::from(be_i16(d, 96)) / 100.0,
            data_line_neg_v: f64::from(be_i16(d, 98)) / 100.0,
            resistance_ohm: f64::from(be_u32(d, 122)) / 10.0,
        }
    }
}

fn be_i16(d: &[Byte; FRAME_LEN], at: usize) -> i16 {
    i16::from_be_bytes([d[at], d[at + 1]])
}

fn be_u32(d: &[Byte; FRAME_LEN], at: usize) -> u32 {
    u32::from_be_bytes([d[at], d[at + 1], d[at + 2], d[at + 3]])
}
