//! # nolovr - Rust driver for the LYRobotix NOLO CV1 6DOF tracking set
//!
//! Cross-platform userspace driver using hidapi. Provides:
//! - Device discovery and opening over USB HID
//! - Per-frame polling of the 64-byte tracking reports (HMD marker, two
//!   hand controllers, base station)
//! - Pose and controller-state accessors for the host
//! - C FFI for integration with C/C++ runtimes
//!
//! ## Quick Start
//! ```no_run
//! use nolovr::{Device, FloatValue, TrackedDevice};
//!
//! let mut device = Device::open_first().unwrap();
//!
//! // Once per host frame: drain the report queue, then read poses.
//! device.update();
//! let hmd = device.pose(TrackedDevice::Hmd);
//! println!("hmd pos: {:?}", hmd.position);
//!
//! let mut quat = [0.0f32; 4];
//! device
//!     .float_value(TrackedDevice::Controller0, FloatValue::RotationQuat, &mut quat)
//!     .unwrap();
//! ```

pub mod device;
pub mod error;
pub mod ffi;
pub mod hid;
pub mod protocol;
pub mod report;
pub mod tracking;
pub mod types;

pub use device::Device;
pub use error::NoloError;
pub use report::RecordSink;
pub use tracking::TrackingState;
pub use types::*;

/// Result type alias for nolovr operations.
pub type Result<T> = std::result::Result<T, NoloError>;
