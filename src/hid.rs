use crate::protocol::{FEATURE_BUFFER_SIZE, REPORT_SIZE};
use crate::{NoloError, Result};
use hidapi::HidDevice;

/// Source of streamed tracking reports.
///
/// The polling loop in [`crate::report`] consumes the transport through
/// this seam so it can be driven from tests with scripted report queues.
pub trait ReportSource {
    /// Read one report without blocking.
    ///
    /// Returns the number of bytes read, or `Ok(0)` when the queue is empty
    /// (the normal end-of-poll outcome, not an error).
    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize>;
}

/// HID transport layer for one opened CV1 handle.
///
/// The handle is switched to non-blocking at construction, so a read never
/// stalls the per-frame caller; an empty queue is observed immediately as
/// `Ok(0)`.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    pub fn new(device: HidDevice) -> Result<Self> {
        device.set_blocking_mode(false)?;
        Ok(Self { device })
    }

    /// Request a feature report.
    ///
    /// Zeroes the buffer and stamps the command byte into byte 0 before the
    /// GET_FEATURE exchange, matching the firmware's request framing.
    /// Returns the number of bytes the device answered with.
    pub fn get_feature_report(
        &self,
        cmd: u8,
        buf: &mut [u8; FEATURE_BUFFER_SIZE],
    ) -> Result<usize> {
        buf.fill(0);
        buf[0] = cmd;
        self.device
            .get_feature_report(buf)
            .map_err(|e| NoloError::FeatureReport(format!("get 0x{:02x}: {}", cmd, e)))
    }

    /// Send a feature report. `data[0]` is the report/command byte.
    pub fn send_feature_report(&self, data: &[u8]) -> Result<usize> {
        self.device
            .send_feature_report(data)
            .map(|_| data.len())
            .map_err(|e| NoloError::FeatureReport(format!("send: {}", e)))
    }
}

impl ReportSource for HidTransport {
    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize> {
        self.device
            .read(buf)
            .map_err(|e| NoloError::Transport(e.to_string()))
    }
}
