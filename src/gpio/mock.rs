use super::line::{Edge, EdgeCallback, GpioController, InputLine, Level, OutputLine};
use crate::error::GpioError;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// In-memory GPIO controller for testing without real hardware
#[derive(Default)]
pub struct MockGpio {
    missing: HashSet<u32>,
    inputs: Mutex<HashMap<u32, Arc<MockInputLine>>>,
    outputs: Mutex<HashMap<u32, Arc<MockOutputLine>>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller on which the given lines cannot be opened
    pub fn without_lines(lines: &[u32]) -> Self {
        Self {
            missing: lines.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Handle to an input line opened through this controller
    pub fn input(&self, line: u32) -> Option<Arc<MockInputLine>> {
        self.inputs.lock().get(&line).cloned()
    }

    /// Handle to an output line opened through this controller
    pub fn output(&self, line: u32) -> Option<Arc<MockOutputLine>> {
        self.outputs.lock().get(&line).cloned()
    }
}

impl GpioController for MockGpio {
    fn open_input(&self, line: u32) -> Result<Arc<dyn InputLine>, GpioError> {
        if self.missing.contains(&line) {
            return Err(GpioError::LineUnavailable { line });
        }

        let input: Arc<dyn InputLine> = self
            .inputs
            .lock()
            .entry(line)
            .or_insert_with(|| Arc::new(MockInputLine::new(line)))
            .clone();
        Ok(input)
    }

    fn open_output(&self, line: u32, initial: Level) -> Result<Arc<dyn OutputLine>, GpioError> {
        if self.missing.contains(&line) {
            return Err(GpioError::LineUnavailable { line });
        }

        let output = Arc::new(MockOutputLine::new(line, initial));
        self.outputs.lock().insert(line, Arc::clone(&output));
        let output: Arc<dyn OutputLine> = output;
        Ok(output)
    }
}

pub struct MockInputLine {
    line: u32,
    level: Mutex<Level>,
    callbacks: Mutex<Vec<EdgeCallback>>,
}

impl MockInputLine {
    pub fn new(line: u32) -> Self {
        Self {
            line,
            level: Mutex::new(Level::Low),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Simulate a transition, delivering it to every registered callback
    pub fn trigger(&self, edge: Edge) {
        *self.level.lock() = edge.level_after();
        debug!("Mock GPIO line {} edge {:?}", self.line, edge);

        for callback in self.callbacks.lock().iter() {
            callback(edge);
        }
    }
}

impl InputLine for MockInputLine {
    fn line(&self) -> u32 {
        self.line
    }

    fn read(&self) -> Result<Level, GpioError> {
        Ok(*self.level.lock())
    }

    fn on_edge(&self, callback: EdgeCallback) -> Result<(), GpioError> {
        self.callbacks.lock().push(callback);
        Ok(())
    }
}

pub struct MockOutputLine {
    line: u32,
    history: Mutex<Vec<Level>>,
}

impl MockOutputLine {
    pub fn new(line: u32, initial: Level) -> Self {
        Self {
            line,
            history: Mutex::new(vec![initial]),
        }
    }

    /// Most recently driven level
    pub fn level(&self) -> Level {
        self.history.lock().last().copied().unwrap_or(Level::Low)
    }

    /// Every level driven since the line was opened, initial level first
    pub fn history(&self) -> Vec<Level> {
        self.history.lock().clone()
    }
}

impl OutputLine for MockOutputLine {
    fn line(&self) -> u32 {
        self.line
    }

    fn write(&self, level: Level) -> Result<(), GpioError> {
        self.history.lock().push(level);
        Ok(())
    }
}
