use crate::types::FloatValue;
use std::fmt;

/// Errors that can occur when interacting with the NOLO CV1 tracking set.
#[derive(Debug, thiserror::Error)]
pub enum NoloError {
    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("Device not found (VID=0483 PID=5750)")]
    DeviceNotFound,

    #[error("Could not open {path}. {hint}")]
    Open { path: String, hint: String },

    #[error("Transport read failed: {0}")]
    Transport(String),

    #[error("Unsupported float value kind: {0:?}")]
    UnsupportedValue(FloatValue),

    #[error("Output buffer too short: need {needed}, got {got}")]
    OutputTooShort { needed: usize, got: usize },

    #[error("Feature report failed: {0}")]
    FeatureReport(String),
}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &NoloError) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = fmt::format(format_args!("{}\0", err));
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}
