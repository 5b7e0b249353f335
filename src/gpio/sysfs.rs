use super::line::{Edge, EdgeCallback, GpioController, InputLine, Level, OutputLine};
use crate::error::GpioError;
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// GPIO access through the Linux sysfs interface (`/sys/class/gpio`)
pub struct SysfsGpio {
    base: PathBuf,
    poll_interval: Duration,
}

impl SysfsGpio {
    pub fn new<P: Into<PathBuf>>(base: P, poll_interval: Duration) -> Self {
        Self {
            base: base.into(),
            poll_interval,
        }
    }

    fn line_dir(&self, line: u32) -> PathBuf {
        self.base.join(format!("gpio{}", line))
    }

    /// Export the line if the kernel has not done so already
    fn export(&self, line: u32) -> Result<PathBuf, GpioError> {
        let dir = self.line_dir(line);
        if dir.exists() {
            debug!("GPIO line {} already exported", line);
            return Ok(dir);
        }

        fs::write(self.base.join("export"), line.to_string()).map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::InvalidInput => GpioError::LineUnavailable { line },
            _ => GpioError::Io {
                line,
                details: format!("export failed: {}", e),
            },
        })?;

        if !dir.exists() {
            return Err(GpioError::LineUnavailable { line });
        }

        info!("Exported GPIO line {}", line);
        Ok(dir)
    }

    fn write_attr(line: u32, path: &Path, value: &str) -> Result<(), GpioError> {
        fs::write(path, value).map_err(|e| GpioError::Io {
            line,
            details: format!("write {}: {}", path.display(), e),
        })
    }
}

impl GpioController for SysfsGpio {
    fn open_input(&self, line: u32) -> Result<Arc<dyn InputLine>, GpioError> {
        let dir = self.export(line)?;
        Self::write_attr(line, &dir.join("direction"), "in")?;

        info!("GPIO line {} configured as input", line);
        let input: Arc<dyn InputLine> = Arc::new(SysfsInputLine {
            line,
            value_path: dir.join("value"),
            poll_interval: self.poll_interval,
            watchers: Mutex::new(Vec::new()),
        });
        Ok(input)
    }

    fn open_output(&self, line: u32, initial: Level) -> Result<Arc<dyn OutputLine>, GpioError> {
        let dir = self.export(line)?;
        // "high"/"low" sets direction and initial value in one step, avoiding a glitch
        let direction = match initial {
            Level::High => "high",
            Level::Low => "low",
        };
        Self::write_attr(line, &dir.join("direction"), direction)?;

        info!("GPIO line {} configured as output ({})", line, initial);
        let output: Arc<dyn OutputLine> = Arc::new(SysfsOutputLine {
            line,
            value_path: dir.join("value"),
            write_lock: Mutex::new(()),
        });
        Ok(output)
    }
}

struct SysfsInputLine {
    line: u32,
    value_path: PathBuf,
    poll_interval: Duration,
    watchers: Mutex<Vec<JoinHandle<()>>>,
}

impl SysfsInputLine {
    async fn watch(line: u32, value_path: PathBuf, poll_interval: Duration, callback: EdgeCallback) {
        let mut last = match read_level(line, &value_path).await {
            Ok(level) => level,
            Err(e) => {
                warn!("Initial read of GPIO line {} failed: {}", line, e);
                Level::Low
            }
        };
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let level = match read_level(line, &value_path).await {
                Ok(level) => level,
                Err(e) => {
                    warn!("Reading GPIO line {} failed: {}", line, e);
                    continue;
                }
            };

            if let Some(edge) = Edge::between(last, level) {
                trace!("GPIO line {} edge {:?}", line, edge);
                callback(edge);
            }
            last = level;
        }
    }
}

async fn read_level(line: u32, path: &Path) -> Result<Level, GpioError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| GpioError::Io {
            line,
            details: e.to_string(),
        })?;
    Level::parse(line, &raw)
}

impl InputLine for SysfsInputLine {
    fn line(&self) -> u32 {
        self.line
    }

    fn read(&self) -> Result<Level, GpioError> {
        let raw = fs::read_to_string(&self.value_path).map_err(|e| GpioError::Io {
            line: self.line,
            details: e.to_string(),
        })?;
        Level::parse(self.line, &raw)
    }

    fn on_edge(&self, callback: EdgeCallback) -> Result<(), GpioError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| GpioError::Io {
            line: self.line,
            details: format!("edge watcher needs a tokio runtime: {}", e),
        })?;

        let task = handle.spawn(Self::watch(
            self.line,
            self.value_path.clone(),
            self.poll_interval,
            callback,
        ));
        self.watchers.lock().push(task);

        debug!(
            "Watching GPIO line {} for edges every {:?}",
            self.line, self.poll_interval
        );
        Ok(())
    }
}

impl Drop for SysfsInputLine {
    fn drop(&mut self) {
        for task in self.watchers.lock().drain(..) {
            task.abort();
        }
    }
}

struct SysfsOutputLine {
    line: u32,
    value_path: PathBuf,
    write_lock: Mutex<()>,
}

impl OutputLine for SysfsOutputLine {
    fn line(&self) -> u32 {
        self.line
    }

    fn write(&self, level: Level) -> Result<(), GpioError> {
        let _guard = self.write_lock.lock();
        SysfsGpio::write_attr(self.line, &self.value_path, level.as_sysfs())?;
        trace!("GPIO line {} set {}", self.line, level);
        Ok(())
    }
}
