use crate::protocol;
use crate::report::RecordSink;
use crate::types::{ControllerState, FloatValue, Pose, TrackedDevice};
use crate::{NoloError, Result};

/// Last-known state of every device in the tracking set.
///
/// One pose per device, overwritten in place by each decoded record.
/// Owned by the driver instance and mutated only from its polling call
/// path; cross-thread reads need external synchronization.
#[derive(Debug, Clone, Default)]
pub struct TrackingState {
    hmd: Pose,
    controllers: [ControllerState; 2],
    station: Pose,
    station_battery: u8,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pose of one tracked device.
    pub fn pose(&self, device: TrackedDevice) -> Pose {
        match device {
            TrackedDevice::Hmd => self.hmd,
            TrackedDevice::Controller0 => self.controllers[0].pose,
            TrackedDevice::Controller1 => self.controllers[1].pose,
            TrackedDevice::BaseStation => self.station,
        }
    }

    /// Full controller state, `None` for indices other than 0 and 1.
    pub fn controller(&self, index: usize) -> Option<&ControllerState> {
        self.controllers.get(index)
    }

    pub fn station_battery(&self) -> u8 {
        self.station_battery
    }

    /// Copy the requested value out of a device's current pose.
    ///
    /// Serves `RotationQuat` (4 floats) and `PositionVector` (3 floats),
    /// returning the count written. Every other kind is a caller-visible
    /// [`NoloError::UnsupportedValue`], never a silent default.
    pub fn float_value(
        &self,
        device: TrackedDevice,
        value: FloatValue,
        out: &mut [f32],
    ) -> Result<usize> {
        let pose = self.pose(device);
        let src: &[f32] = match value {
            FloatValue::RotationQuat => &pose.rotation,
            FloatValue::PositionVector => &pose.position,
            other => return Err(NoloError::UnsupportedValue(other)),
        };
        if out.len() < src.len() {
            return Err(NoloError::OutputTooShort {
                needed: src.len(),
                got: out.len(),
            });
        }
        out[..src.len()].copy_from_slice(src);
        Ok(src.len())
    }

    fn controller_record(&mut self, index: usize, record: &[u8]) {
        let Some(rec) = protocol::parse_controller_record(record) else {
            log::warn!("controller {} record too short, ignored", index);
            return;
        };
        self.controllers[index] = ControllerState {
            pose: rec.pose,
            buttons: rec.buttons,
            trigger: rec.trigger,
            battery: rec.battery,
            touching: rec.touching,
        };
    }
}

impl RecordSink for TrackingState {
    fn record(&mut self, device: TrackedDevice, record: &[u8]) {
        match device {
            TrackedDevice::Controller0 => self.controller_record(0, record),
            TrackedDevice::Controller1 => self.controller_record(1, record),
            TrackedDevice::Hmd => {
                if let Some(rec) = protocol::parse_hmd_marker(record) {
                    self.hmd = rec.pose;
                } else {
                    log::warn!("hmd marker record too short, ignored");
                }
            }
            TrackedDevice::BaseStation => {
                if let Some(rec) = protocol::parse_base_station(record) {
                    self.station.position = rec.position;
                    self.station_battery = rec.battery;
                } else {
                    log::warn!("base station record too short, ignored");
                }
            }
        }
    }
}
