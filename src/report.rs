//! Report framing and dispatch.
//!
//! Every streamed report is a fixed 64-byte buffer whose first byte selects
//! the layout of the rest. A controllers report carries two 22-byte records
//! packed into the same buffer (the second right-aligned to its end); an
//! HMD report carries the head marker and base-station records at fixed
//! offsets. This module owns the offset arithmetic and hands each record,
//! already bounds-checked, to a [`RecordSink`].

use crate::hid::ReportSource;
use crate::protocol::{
    BASE_STATION_OFFSET, CONTROLLER0_OFFSET, CONTROLLER1_OFFSET, CONTROLLER_RECORD_LEN,
    HMD_MARKER_OFFSET, MARKER_RECORD_LEN, REPORT_SIZE, ReportKind, STATION_RECORD_LEN,
};
use crate::types::TrackedDevice;
use crate::Result;

/// Consumer of extracted device records.
///
/// Implementations decode the record bytes into the device's pose. The
/// dispatcher guarantees `record` is the exact fixed-length window for the
/// given device and never crosses the report's bounds.
pub trait RecordSink {
    fn record(&mut self, device: TrackedDevice, record: &[u8]);
}

/// Route one report to the sink, switching on the tag byte.
///
/// Unknown tags are logged and discarded without touching any pose; the
/// transport carries message types this driver never defines, and one of
/// them must not halt polling.
pub fn dispatch_report(report: &[u8; REPORT_SIZE], sink: &mut impl RecordSink) {
    match ReportKind::from_tag(report[0]) {
        ReportKind::Controllers => {
            sink.record(
                TrackedDevice::Controller0,
                &report[CONTROLLER0_OFFSET..CONTROLLER0_OFFSET + CONTROLLER_RECORD_LEN],
            );
            sink.record(
                TrackedDevice::Controller1,
                &report[CONTROLLER1_OFFSET..CONTROLLER1_OFFSET + CONTROLLER_RECORD_LEN],
            );
        }
        ReportKind::Hmd => {
            sink.record(
                TrackedDevice::Hmd,
                &report[HMD_MARKER_OFFSET..HMD_MARKER_OFFSET + MARKER_RECORD_LEN],
            );
            sink.record(
                TrackedDevice::BaseStation,
                &report[BASE_STATION_OFFSET..BASE_STATION_OFFSET + STATION_RECORD_LEN],
            );
        }
        ReportKind::Unknown(tag) => {
            log::warn!("unknown report tag: 0x{:02x}", tag);
        }
    }
}

/// Drain the transport's report queue into the sink.
///
/// Loops until the source reports an empty queue (`Ok(0)`), which ends the
/// poll normally, or fails, which ends it with the error propagated to the
/// caller. Reads shorter than [`REPORT_SIZE`] are logged and skipped; the
/// fixed-offset extraction must never see a truncated buffer.
///
/// Returns the number of reports dispatched.
pub fn poll_reports(source: &mut impl ReportSource, sink: &mut impl RecordSink) -> Result<usize> {
    let mut dispatched = 0;

    loop {
        let mut buf = [0u8; REPORT_SIZE];
        let size = source.read_report(&mut buf)?;
        if size == 0 {
            // No more messages queued.
            return Ok(dispatched);
        }
        if size < REPORT_SIZE {
            log::warn!("short report ({} bytes), dropped", size);
            continue;
        }

        dispatch_report(&buf, sink);
        dispatched += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{TAG_CONTROLLERS, TAG_HMD};
    use crate::NoloError;

    /// Scripted transport: pops pre-queued reads front to back.
    struct ScriptedSource {
        queue: Vec<Result<Vec<u8>>>,
        reads: usize,
    }

    impl ScriptedSource {
        fn new(queue: Vec<Result<Vec<u8>>>) -> Self {
            Self { queue, reads: 0 }
        }
    }

    impl ReportSource for ScriptedSource {
        fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize> {
            self.reads += 1;
            match self.queue.remove(0) {
                Ok(data) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                Err(e) => Err(e),
            }
        }
    }

    /// Records which (device, window contents) pairs the dispatcher produced.
    #[derive(Default)]
    struct RecordingSink {
        seen: Vec<(TrackedDevice, Vec<u8>)>,
    }

    impl RecordSink for RecordingSink {
        fn record(&mut self, device: TrackedDevice, record: &[u8]) {
            self.seen.push((device, record.to_vec()));
        }
    }

    fn report_with_tag(tag: u8) -> Vec<u8> {
        let mut r = vec![0u8; REPORT_SIZE];
        r[0] = tag;
        r
    }

    #[test]
    fn test_controllers_report_windows() {
        let mut report = [0u8; REPORT_SIZE];
        report[0] = TAG_CONTROLLERS;
        // Distinct markers at each window's first and last byte.
        report[CONTROLLER0_OFFSET] = 0x11;
        report[CONTROLLER0_OFFSET + CONTROLLER_RECORD_LEN - 1] = 0x22;
        report[CONTROLLER1_OFFSET] = 0x33;
        report[REPORT_SIZE - 1] = 0x44;

        let mut sink = RecordingSink::default();
        dispatch_report(&report, &mut sink);

        assert_eq!(sink.seen.len(), 2);
        let (dev0, win0) = &sink.seen[0];
        let (dev1, win1) = &sink.seen[1];
        assert_eq!(*dev0, TrackedDevice::Controller0);
        assert_eq!(*dev1, TrackedDevice::Controller1);
        assert_eq!(win0.len(), CONTROLLER_RECORD_LEN);
        assert_eq!(win1.len(), CONTROLLER_RECORD_LEN);
        assert_eq!(win0[0], 0x11);
        assert_eq!(win0[CONTROLLER_RECORD_LEN - 1], 0x22);
        assert_eq!(win1[0], 0x33);
        assert_eq!(win1[CONTROLLER_RECORD_LEN - 1], 0x44);
    }

    #[test]
    fn test_hmd_report_windows() {
        let mut report = [0u8; REPORT_SIZE];
        report[0] = TAG_HMD;
        report[HMD_MARKER_OFFSET] = 0xaa;
        report[BASE_STATION_OFFSET] = 0xbb;

        let mut sink = RecordingSink::default();
        dispatch_report(&report, &mut sink);

        // Marker and station each delivered exactly once, in order.
        assert_eq!(sink.seen.len(), 2);
        assert_eq!(sink.seen[0].0, TrackedDevice::Hmd);
        assert_eq!(sink.seen[0].1[0], 0xaa);
        assert_eq!(sink.seen[0].1.len(), MARKER_RECORD_LEN);
        assert_eq!(sink.seen[1].0, TrackedDevice::BaseStation);
        assert_eq!(sink.seen[1].1[0], 0xbb);
        assert_eq!(sink.seen[1].1.len(), STATION_RECORD_LEN);
    }

    #[test]
    fn test_unknown_tag_mutates_nothing() {
        let report = {
            let mut r = [0u8; REPORT_SIZE];
            r[0] = 0xff;
            r
        };
        let mut sink = RecordingSink::default();
        dispatch_report(&report, &mut sink);
        assert!(sink.seen.is_empty());
    }

    #[test]
    fn test_poll_drains_queue_then_stops() {
        let mut source = ScriptedSource::new(vec![
            Ok(report_with_tag(TAG_CONTROLLERS)),
            Ok(report_with_tag(TAG_HMD)),
            Ok(vec![]),
        ]);
        let mut sink = RecordingSink::default();

        let n = poll_reports(&mut source, &mut sink).unwrap();
        assert_eq!(n, 2);
        // Queued reports plus the terminating empty read.
        assert_eq!(source.reads, 3);
        assert_eq!(sink.seen.len(), 4);
    }

    #[test]
    fn test_poll_empty_queue_reads_once() {
        let mut source = ScriptedSource::new(vec![Ok(vec![])]);
        let mut sink = RecordingSink::default();

        let n = poll_reports(&mut source, &mut sink).unwrap();
        assert_eq!(n, 0);
        assert_eq!(source.reads, 1);
        assert!(sink.seen.is_empty());
    }

    #[test]
    fn test_unknown_tag_does_not_halt_polling() {
        let mut source = ScriptedSource::new(vec![
            Ok(report_with_tag(0xff)),
            Ok(report_with_tag(TAG_CONTROLLERS)),
            Ok(vec![]),
        ]);
        let mut sink = RecordingSink::default();

        poll_reports(&mut source, &mut sink).unwrap();
        // Only the 0xa5 report produced records.
        assert_eq!(sink.seen.len(), 2);
        assert_eq!(sink.seen[0].0, TrackedDevice::Controller0);
    }

    #[test]
    fn test_short_read_is_skipped() {
        let mut source = ScriptedSource::new(vec![
            Ok(vec![TAG_CONTROLLERS; 10]),
            Ok(report_with_tag(TAG_HMD)),
            Ok(vec![]),
        ]);
        let mut sink = RecordingSink::default();

        let n = poll_reports(&mut source, &mut sink).unwrap();
        assert_eq!(n, 1);
        assert_eq!(sink.seen[0].0, TrackedDevice::Hmd);
    }

    #[test]
    fn test_read_error_terminates_poll() {
        let mut source = ScriptedSource::new(vec![
            Ok(report_with_tag(TAG_HMD)),
            Err(NoloError::Transport("unplugged".into())),
        ]);
        let mut sink = RecordingSink::default();

        let err = poll_reports(&mut source, &mut sink).unwrap_err();
        assert!(matches!(err, NoloError::Transport(_)));
        // The report before the failure was still dispatched.
        assert_eq!(sink.seen.len(), 2);
    }
}
