/// 6DOF pose of one tracked device.
///
/// Overwritten in place on every decoded record; no history is kept. Not
/// inherently thread-safe: reads from a thread other than the one calling
/// `Device::update` need external synchronization.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Orientation quaternion [x, y, z, w].
    pub rotation: [f32; 4],
    /// Position in meters [x, y, z].
    pub position: [f32; 3],
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            rotation: [0.0, 0.0, 0.0, 1.0],
            position: [0.0, 0.0, 0.0],
        }
    }
}

/// Identity of one physical device tracked by the CV1 set.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedDevice {
    /// The marker puck strapped to the headset.
    Hmd = 0,
    /// Left/primary hand controller.
    Controller0 = 1,
    /// Right/secondary hand controller.
    Controller1 = 2,
    /// The stationary base station.
    BaseStation = 3,
}

bitflags::bitflags! {
    /// Button bitmask reported by a hand controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(C)]
    pub struct Buttons: u16 {
        const TOUCHPAD = 1 << 0;
        const TRIGGER  = 1 << 1;
        const MENU     = 1 << 2;
        const SYSTEM   = 1 << 3;
        const GRIP     = 1 << 4;
    }
}

/// Full state of one hand controller.
#[derive(Debug, Clone, Copy)]
pub struct ControllerState {
    pub pose: Pose,
    pub buttons: Buttons,
    /// Analog trigger, normalized to 0.0..=1.0.
    pub trigger: f32,
    /// Battery level as reported by the hardware.
    pub battery: u8,
    /// Whether a finger is resting on the touchpad.
    pub touching: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            buttons: Buttons::empty(),
            trigger: 0.0,
            battery: 0,
            touching: false,
        }
    }
}

/// Float value kinds a host may request through the accessor.
///
/// Only `RotationQuat` and `PositionVector` are served by this driver; the
/// remaining kinds exist on the host API surface and yield
/// [`NoloError::UnsupportedValue`](crate::NoloError::UnsupportedValue).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatValue {
    /// Orientation quaternion, 4 floats [x, y, z, w].
    RotationQuat = 0,
    /// Position vector, 3 floats [x, y, z] in meters.
    PositionVector = 1,
    /// Physical horizontal screen size; HMD optics, not served here.
    ScreenHorizontalSize = 2,
    /// Lens center separation; HMD optics, not served here.
    LensSeparation = 3,
    /// Raw digital control state block; not served here.
    ControlsState = 4,
}

impl FloatValue {
    /// Number of floats the kind occupies, for kinds this driver serves.
    pub fn float_count(self) -> Option<usize> {
        match self {
            FloatValue::RotationQuat => Some(4),
            FloatValue::PositionVector => Some(3),
            _ => None,
        }
    }
}

/// Identification of one enumerated CV1 HID interface.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Platform HID path used to open the device.
    pub path: std::ffi::CString,
    pub manufacturer: String,
    pub product: String,
    pub serial: Option<String>,
}
