//! C FFI layer for nolovr.
//!
//! Provides opaque handle-based API for C/C++ host runtimes.
//! The generated C header is written to `include/nolovr.h` by cbindgen.

use crate::device::Device;
use crate::error::LastError;
use crate::types::{FloatValue, TrackedDevice};
use std::ffi::{c_char, c_int};

/// Thread-safe last error message for C consumers.
static LAST_ERROR: LastError = LastError::new();

/// Opaque device handle for C consumers.
pub struct NoloDevice(Device);

/// Pose data in C-compatible layout.
#[repr(C)]
pub struct NoloPose {
    /// Orientation quaternion [x, y, z, w].
    pub rotation: [f32; 4],
    /// Position [x, y, z] in meters.
    pub position: [f32; 3],
}

fn tracked_device_from_int(device: c_int) -> Option<TrackedDevice> {
    match device {
        0 => Some(TrackedDevice::Hmd),
        1 => Some(TrackedDevice::Controller0),
        2 => Some(TrackedDevice::Controller1),
        3 => Some(TrackedDevice::BaseStation),
        _ => None,
    }
}

/// Count connected CV1 tracking sets. Returns -1 on error.
#[no_mangle]
pub extern "C" fn nolo_count_devices() -> c_int {
    match crate::device::list_devices() {
        Ok(devices) => devices.len() as c_int,
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Open the first available CV1 tracking set.
/// Returns NULL on error (check nolo_last_error()).
#[no_mangle]
pub extern "C" fn nolo_open_first() -> *mut NoloDevice {
    match Device::open_first() {
        Ok(dev) => Box::into_raw(Box::new(NoloDevice(dev))),
        Err(e) => {
            LAST_ERROR.set(&e);
            std::ptr::null_mut()
        }
    }
}

/// Close a device and free its resources.
///
/// # Safety
/// `dev` must be a pointer returned by `nolo_open_first`, or null.
#[no_mangle]
pub unsafe extern "C" fn nolo_close_device(dev: *mut NoloDevice) {
    if !dev.is_null() {
        drop(Box::from_raw(dev));
    }
}

/// Drain all queued tracking reports into the device's pose state.
/// Call once per host frame.
///
/// # Safety
/// `dev` must be a valid device pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn nolo_device_update(dev: *mut NoloDevice) {
    if dev.is_null() {
        return;
    }
    let dev = &mut *dev;
    dev.0.update();
}

/// Read the current pose of one tracked device.
/// `device`: 0 = HMD, 1 = controller 0, 2 = controller 1, 3 = base station.
/// Returns 0 on success, -1 on error.
///
/// # Safety
/// `dev` and `pose` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn nolo_device_get_pose(
    dev: *const NoloDevice,
    device: c_int,
    pose: *mut NoloPose,
) -> c_int {
    if dev.is_null() || pose.is_null() {
        return -1;
    }
    let Some(tracked) = tracked_device_from_int(device) else {
        return -1;
    };
    let dev = &*dev;

    let p = dev.0.pose(tracked);
    pose.write(NoloPose {
        rotation: p.rotation,
        position: p.position,
    });
    0
}

/// Copy a requested float value for one tracked device.
/// `value`: 0 = rotation quaternion (4 floats), 1 = position vector (3 floats).
/// Returns the number of floats written, or -1 on error (including
/// unsupported value kinds — check nolo_last_error()).
///
/// # Safety
/// `out` must point to an array of at least `len` floats, or be null.
#[no_mangle]
pub unsafe extern "C" fn nolo_device_get_float(
    dev: *const NoloDevice,
    device: c_int,
    value: c_int,
    out: *mut f32,
    len: c_int,
) -> c_int {
    if dev.is_null() || out.is_null() || len < 0 {
        return -1;
    }
    let Some(tracked) = tracked_device_from_int(device) else {
        return -1;
    };
    let kind = match value {
        0 => FloatValue::RotationQuat,
        1 => FloatValue::PositionVector,
        2 => FloatValue::ScreenHorizontalSize,
        3 => FloatValue::LensSeparation,
        4 => FloatValue::ControlsState,
        _ => return -1,
    };
    let dev = &*dev;

    let slice = std::slice::from_raw_parts_mut(out, len as usize);
    match dev.0.float_value(tracked, kind, slice) {
        Ok(written) => written as c_int,
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Get the last error message. Returns NULL if no error.
/// The returned pointer is valid until the next nolovr API call.
#[no_mangle]
pub extern "C" fn nolo_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}
