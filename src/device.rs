use crate::hid::HidTransport;
use crate::protocol::{FEATURE_BUFFER_SIZE, PID, VID};
use crate::report;
use crate::tracking::TrackingState;
use crate::types::{ControllerState, DeviceInfo, FloatValue, Pose, TrackedDevice};
use crate::{NoloError, Result};
use hidapi::HidApi;
use std::ffi::CStr;

/// Check if a hidapi DeviceInfo is the CV1's tracking interface.
fn is_cv1(d: &hidapi::DeviceInfo) -> bool {
    d.vendor_id() == VID && d.product_id() == PID
}

fn create_hid_api() -> Result<HidApi> {
    let api = HidApi::new()?;
    #[cfg(target_os = "macos")]
    {
        // Keep HID opens shared on macOS to avoid seizing the interface.
        api.set_open_exclusive(false);
    }
    Ok(api)
}

/// Turn a libusb-style HID path ("bus:device:iface" in hex) into a
/// permissions hint naming the /dev node, so an open failure tells the user
/// which file to chmod. Falls back to a generic hint for other path styles.
fn open_hint(path: &str) -> String {
    let mut parts = path.split(':');
    if let (Some(bus), Some(dev)) = (parts.next(), parts.next()) {
        if let (Ok(bus), Ok(dev)) = (u32::from_str_radix(bus, 16), u32::from_str_radix(dev, 16)) {
            return format!("Check your rights on /dev/bus/usb/{:03}/{:03}.", bus, dev);
        }
    }
    "Check your rights.".to_string()
}

/// List all connected CV1 tracking sets.
pub fn list_devices() -> Result<Vec<DeviceInfo>> {
    let api = create_hid_api()?;
    let mut devices = Vec::new();

    for d in api.device_list() {
        if !is_cv1(d) {
            continue;
        }
        devices.push(DeviceInfo {
            path: d.path().to_owned(),
            manufacturer: d
                .manufacturer_string()
                .unwrap_or("LYRobotix")
                .to_string(),
            product: d.product_string().unwrap_or("NOLO CV1").to_string(),
            serial: d.serial_number().map(|s| s.to_string()),
        });
    }

    Ok(devices)
}

/// An opened CV1 tracking set.
///
/// Owns the HID handle and the per-device pose state. Dropping the device
/// closes the handle.
pub struct Device {
    transport: HidTransport,
    state: TrackingState,
}

impl Device {
    /// Open the first available CV1.
    pub fn open_first() -> Result<Device> {
        let api = create_hid_api()?;
        let path = api
            .device_list()
            .find(|d| is_cv1(d))
            .map(|d| d.path().to_owned())
            .ok_or(NoloError::DeviceNotFound)?;
        Self::open_on(&api, &path)
    }

    /// Open a specific device found by [`list_devices`].
    pub fn open(info: &DeviceInfo) -> Result<Device> {
        let api = create_hid_api()?;
        Self::open_on(&api, &info.path)
    }

    /// Open by raw platform HID path.
    pub fn open_path(path: &CStr) -> Result<Device> {
        let api = create_hid_api()?;
        Self::open_on(&api, path)
    }

    fn open_on(api: &HidApi, path: &CStr) -> Result<Device> {
        let path_str = path.to_string_lossy().into_owned();
        let handle = api.open_path(path).map_err(|_| NoloError::Open {
            hint: open_hint(&path_str),
            path: path_str,
        })?;
        let transport = HidTransport::new(handle)?;

        log::info!("opened NOLO CV1 tracking set");

        Ok(Device {
            transport,
            state: TrackingState::new(),
        })
    }

    /// Drain all queued tracking reports into the pose state.
    ///
    /// Call once per host frame. A transport failure is logged and
    /// swallowed; the device stays usable and the next call retries.
    pub fn update(&mut self) {
        match report::poll_reports(&mut self.transport, &mut self.state) {
            Ok(n) => log::trace!("dispatched {} report(s)", n),
            Err(e) => log::warn!("error reading from device: {}", e),
        }
    }

    /// Current pose of one tracked device.
    pub fn pose(&self, device: TrackedDevice) -> Pose {
        self.state.pose(device)
    }

    /// Full controller state, `None` for indices other than 0 and 1.
    pub fn controller(&self, index: usize) -> Option<&ControllerState> {
        self.state.controller(index)
    }

    /// Copy the requested float value for a device; see
    /// [`TrackingState::float_value`].
    pub fn float_value(
        &self,
        device: TrackedDevice,
        value: FloatValue,
        out: &mut [f32],
    ) -> Result<usize> {
        self.state.float_value(device, value, out)
    }

    /// The whole tracking state, for hosts that read more than poses.
    pub fn tracking(&self) -> &TrackingState {
        &self.state
    }

    /// Issue a feature-report request and return the device's answer.
    ///
    /// The request/response payloads are firmware-defined (calibration and
    /// configuration); this driver only frames the exchange.
    pub fn feature_report(&self, cmd: u8) -> Result<Vec<u8>> {
        let mut buf = [0u8; FEATURE_BUFFER_SIZE];
        let len = self.transport.get_feature_report(cmd, &mut buf)?;
        Ok(buf[..len].to_vec())
    }

    /// Send a feature report. `data[0]` is the command byte.
    pub fn send_feature_report(&self, data: &[u8]) -> Result<usize> {
        self.transport.send_feature_report(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_hint_libusb_path() {
        assert_eq!(
            open_hint("0003:000a:00"),
            "Check your rights on /dev/bus/usb/003/010."
        );
    }

    #[test]
    fn test_open_hint_hidraw_path() {
        assert_eq!(open_hint("/dev/hidraw4"), "Check your rights.");
    }
}
