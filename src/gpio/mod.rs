mod line;
mod mock;
mod sysfs;

#[cfg(test)]
mod tests;

pub use line::{Edge, EdgeCallback, GpioController, InputLine, Level, OutputLine};
pub use mock::{MockGpio, MockInputLine, MockOutputLine};
pub use sysfs::SysfsGpio;
