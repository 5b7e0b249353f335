use crate::error::GpioError;
use std::fmt;
use std::sync::Arc;

/// Logic level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Parse the textual value exposed by sysfs ("0"/"1")
    pub fn parse(line: u32, raw: &str) -> Result<Self, GpioError> {
        match raw.trim() {
            "0" => Ok(Level::Low),
            "1" => Ok(Level::High),
            other => Err(GpioError::InvalidValue {
                line,
                value: other.to_string(),
            }),
        }
    }

    pub(crate) fn as_sysfs(self) -> &'static str {
        match self {
            Level::Low => "0",
            Level::High => "1",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "low"),
            Level::High => write!(f, "high"),
        }
    }
}

/// Direction of a transition on an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    /// Edge produced by moving from `from` to `to`, if the level changed
    pub fn between(from: Level, to: Level) -> Option<Self> {
        match (from, to) {
            (Level::Low, Level::High) => Some(Edge::Rising),
            (Level::High, Level::Low) => Some(Edge::Falling),
            _ => None,
        }
    }

    /// Level the line settles at after this edge
    pub fn level_after(self) -> Level {
        match self {
            Edge::Rising => Level::High,
            Edge::Falling => Level::Low,
        }
    }
}

pub type EdgeCallback = Box<dyn Fn(Edge) + Send + Sync + 'static>;

/// A line configured as input. Edge callbacks run outside the caller's task.
pub trait InputLine: Send + Sync {
    fn line(&self) -> u32;

    fn read(&self) -> Result<Level, GpioError>;

    /// Register a callback invoked on every transition of the line
    fn on_edge(&self, callback: EdgeCallback) -> Result<(), GpioError>;
}

/// A line configured as output
pub trait OutputLine: Send + Sync {
    fn line(&self) -> u32;

    fn write(&self, level: Level) -> Result<(), GpioError>;
}

/// Source of digital lines. Direction is fixed when a line is opened.
pub trait GpioController: Send + Sync {
    fn open_input(&self, line: u32) -> Result<Arc<dyn InputLine>, GpioError>;

    /// Open an output line, driving `initial` before switching direction
    fn open_output(&self, line: u32, initial: Level) -> Result<Arc<dyn OutputLine>, GpioError>;
}
