use std::fmt;

/// Parts of the device whose lifecycle the app tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    Led,
    MotionSensor,
    Camera,
    Display,
    Controller,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Led => "status LED",
            Component::MotionSensor => "motion sensor",
            Component::Camera => "camera",
            Component::Display => "score board",
            Component::Controller => "detection loop",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Stopped,
    Starting,
    Running,
    /// Line missing; the feature is inert but the device keeps running
    Degraded,
    Stopping,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShutdownReason {
    Signal(String),
    UserRequest,
}
