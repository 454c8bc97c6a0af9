use crate::types::{Buttons, Pose};

// -- USB identifiers --
// ST microcontroller VID; the CV1 head marker enumerates under it.
pub const VID: u16 = 0x0483;
pub const PID: u16 = 0x5750;

// -- Report geometry --
pub const REPORT_SIZE: usize = 64;
/// Feature-report exchanges use the same 64-byte buffer as streamed reports.
pub const FEATURE_BUFFER_SIZE: usize = REPORT_SIZE;

// -- Report tags (byte 0 of every streamed report) --
pub const TAG_CONTROLLERS: u8 = 0xa5;
pub const TAG_HMD: u8 = 0xa6;

// -- Record geometry --
// Controller record: 3 header bytes, position triplet + quaternion at 2
// bytes per component, button mask, trigger, touch flag.
pub const CONTROLLER_RECORD_LEN: usize = 3 + (3 + 4) * 2 + 2 + 2 + 1;
/// Primary controller record starts right after the tag byte.
pub const CONTROLLER0_OFFSET: usize = 1;
/// Secondary controller record is right-aligned to the end of the report.
pub const CONTROLLER1_OFFSET: usize = REPORT_SIZE - CONTROLLER_RECORD_LEN;

pub const HMD_MARKER_OFFSET: usize = 0x15;
pub const BASE_STATION_OFFSET: usize = 0x36;
pub const MARKER_RECORD_LEN: usize = BASE_STATION_OFFSET - HMD_MARKER_OFFSET;
pub const STATION_RECORD_LEN: usize = REPORT_SIZE - BASE_STATION_OFFSET;

// The windows below are sliced with fixed offsets out of a fixed-size
// buffer. Any change to the constants that would make a window overlap its
// neighbour or run past the report must fail the build, not corrupt poses.
const _: () = assert!(CONTROLLER0_OFFSET + CONTROLLER_RECORD_LEN <= CONTROLLER1_OFFSET);
const _: () = assert!(CONTROLLER1_OFFSET + CONTROLLER_RECORD_LEN == REPORT_SIZE);
const _: () = assert!(HMD_MARKER_OFFSET + MARKER_RECORD_LEN <= BASE_STATION_OFFSET);
const _: () = assert!(BASE_STATION_OFFSET + STATION_RECORD_LEN <= REPORT_SIZE);

// -- Fixed-point scales --
/// Position components are i16 in 0.1 mm units.
pub const POSITION_SCALE: f32 = 1e-4;
/// Quaternion components are i16 scaled by 2^-14 = 1/16384.
pub const ROTATION_SCALE: f32 = 1.0 / 16384.0;

/// Report kind, decoded once from the tag byte.
///
/// `Unknown` carries the raw tag so the dispatcher can log exactly what the
/// transport delivered; the hardware shares the endpoint with message types
/// this driver never defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Controllers,
    Hmd,
    Unknown(u8),
}

impl ReportKind {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            TAG_CONTROLLERS => ReportKind::Controllers,
            TAG_HMD => ReportKind::Hmd,
            other => ReportKind::Unknown(other),
        }
    }
}

/// One decoded hand-controller record.
#[derive(Debug, Clone, Copy)]
pub struct ControllerRecord {
    pub version: u8,
    pub battery: u8,
    pub state: u8,
    pub pose: Pose,
    pub buttons: Buttons,
    pub trigger: f32,
    pub touching: bool,
}

/// One decoded HMD marker record.
#[derive(Debug, Clone, Copy)]
pub struct MarkerRecord {
    pub pose: Pose,
}

/// One decoded base-station record.
#[derive(Debug, Clone, Copy)]
pub struct StationRecord {
    pub battery: u8,
    pub position: [f32; 3],
}

fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Read a position triplet: 3x i16 LE scaled to meters.
fn read_position(data: &[u8], offset: usize) -> [f32; 3] {
    [
        read_i16(data, offset) as f32 * POSITION_SCALE,
        read_i16(data, offset + 2) as f32 * POSITION_SCALE,
        read_i16(data, offset + 4) as f32 * POSITION_SCALE,
    ]
}

/// Read an orientation quaternion: wire order [w, x, y, z], 4x i16 LE.
/// Stored as [x, y, z, w].
fn read_rotation(data: &[u8], offset: usize) -> [f32; 4] {
    let w = read_i16(data, offset) as f32 * ROTATION_SCALE;
    let x = read_i16(data, offset + 2) as f32 * ROTATION_SCALE;
    let y = read_i16(data, offset + 4) as f32 * ROTATION_SCALE;
    let z = read_i16(data, offset + 6) as f32 * ROTATION_SCALE;
    [x, y, z, w]
}

/// Parse a 22-byte controller record.
///
/// Layout:
/// - `[0]`: hardware protocol version
/// - `[1]`: battery level
/// - `[2]`: connection state
/// - `[3..9)`: position, 3x i16 LE, 0.1 mm units
/// - `[9..17)`: quaternion [w, x, y, z], 4x i16 LE, 2^-14 scale
/// - `[17..19)`: button bitmask, u16 LE
/// - `[19..21)`: analog trigger, u16 LE full scale
/// - `[21]`: touchpad contact flag
pub fn parse_controller_record(data: &[u8]) -> Option<ControllerRecord> {
    if data.len() < CONTROLLER_RECORD_LEN {
        return None;
    }

    Some(ControllerRecord {
        version: data[0],
        battery: data[1],
        state: data[2],
        pose: Pose {
            position: read_position(data, 3),
            rotation: read_rotation(data, 9),
        },
        buttons: Buttons::from_bits_truncate(read_u16(data, 17)),
        trigger: read_u16(data, 19) as f32 / u16::MAX as f32,
        touching: data[21] != 0,
    })
}

/// Parse a 33-byte HMD marker record.
///
/// Layout:
/// - `[0..6)`: position, 3x i16 LE, 0.1 mm units
/// - `[6..14)`: quaternion [w, x, y, z], 4x i16 LE, 2^-14 scale
/// - `[14..33)`: reserved by firmware
pub fn parse_hmd_marker(data: &[u8]) -> Option<MarkerRecord> {
    if data.len() < MARKER_RECORD_LEN {
        return None;
    }

    Some(MarkerRecord {
        pose: Pose {
            position: read_position(data, 0),
            rotation: read_rotation(data, 6),
        },
    })
}

/// Parse a 10-byte base-station record.
///
/// Layout:
/// - `[0]`: battery level
/// - `[1..7)`: position, 3x i16 LE, 0.1 mm units
/// - `[7..10)`: reserved
///
/// The station reports no orientation; its pose keeps the identity
/// quaternion.
pub fn parse_base_station(data: &[u8]) -> Option<StationRecord> {
    if data.len() < STATION_RECORD_LEN {
        return None;
    }

    Some(StationRecord {
        battery: data[0],
        position: read_position(data, 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_i16(buf: &mut [u8], offset: usize, value: i16) {
        buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    #[test]
    fn test_window_constants() {
        assert_eq!(CONTROLLER_RECORD_LEN, 22);
        assert_eq!(CONTROLLER0_OFFSET, 1);
        assert_eq!(CONTROLLER1_OFFSET, 42);
        assert_eq!(HMD_MARKER_OFFSET, 21);
        assert_eq!(BASE_STATION_OFFSET, 54);
        // Disjoint controller windows inside the 64-byte report.
        assert!(CONTROLLER0_OFFSET + CONTROLLER_RECORD_LEN <= CONTROLLER1_OFFSET);
        assert_eq!(CONTROLLER1_OFFSET + CONTROLLER_RECORD_LEN, REPORT_SIZE);
    }

    #[test]
    fn test_report_kind_from_tag() {
        assert_eq!(ReportKind::from_tag(0xa5), ReportKind::Controllers);
        assert_eq!(ReportKind::from_tag(0xa6), ReportKind::Hmd);
        assert_eq!(ReportKind::from_tag(0xff), ReportKind::Unknown(0xff));
        assert_eq!(ReportKind::from_tag(0x00), ReportKind::Unknown(0x00));
    }

    #[test]
    fn test_parse_controller_record() {
        let mut data = [0u8; CONTROLLER_RECORD_LEN];
        data[0] = 2; // version
        data[1] = 87; // battery
        put_i16(&mut data, 3, 10_000); // x = 1.0 m
        put_i16(&mut data, 5, -5_000); // y = -0.5 m
        put_i16(&mut data, 7, 2_500); // z = 0.25 m
        put_i16(&mut data, 9, 16_384); // w = 1.0
        put_i16(&mut data, 17, 0b0_0110); // TRIGGER | MENU
        put_i16(&mut data, 19, i16::MAX);
        data[21] = 1;

        let rec = parse_controller_record(&data).unwrap();
        assert_eq!(rec.version, 2);
        assert_eq!(rec.battery, 87);
        assert!((rec.pose.position[0] - 1.0).abs() < 1e-6);
        assert!((rec.pose.position[1] + 0.5).abs() < 1e-6);
        assert!((rec.pose.position[2] - 0.25).abs() < 1e-6);
        // Identity quaternion: w=1, rest 0, stored as [x, y, z, w].
        assert!((rec.pose.rotation[3] - 1.0).abs() < 1e-6);
        assert!(rec.pose.rotation[0].abs() < 1e-6);
        assert_eq!(rec.buttons, Buttons::TRIGGER | Buttons::MENU);
        assert!((rec.trigger - 0.5).abs() < 0.01);
        assert!(rec.touching);
    }

    #[test]
    fn test_parse_controller_record_short() {
        let data = [0u8; CONTROLLER_RECORD_LEN - 1];
        assert!(parse_controller_record(&data).is_none());
    }

    #[test]
    fn test_parse_hmd_marker() {
        let mut data = [0u8; MARKER_RECORD_LEN];
        put_i16(&mut data, 0, 20_000); // x = 2.0 m
        put_i16(&mut data, 6, 0); // w = 0
        put_i16(&mut data, 8, 16_384); // x component = 1.0

        let rec = parse_hmd_marker(&data).unwrap();
        assert!((rec.pose.position[0] - 2.0).abs() < 1e-6);
        assert!((rec.pose.rotation[0] - 1.0).abs() < 1e-6);
        assert!(rec.pose.rotation[3].abs() < 1e-6);
    }

    #[test]
    fn test_parse_base_station() {
        let mut data = [0u8; STATION_RECORD_LEN];
        data[0] = 64;
        put_i16(&mut data, 1, -10_000);

        let rec = parse_base_station(&data).unwrap();
        assert_eq!(rec.battery, 64);
        assert!((rec.position[0] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parsers_reject_short_slices() {
        assert!(parse_hmd_marker(&[0u8; MARKER_RECORD_LEN - 1]).is_none());
        assert!(parse_base_station(&[0u8; STATION_RECORD_LEN - 1]).is_none());
    }
}
