//! Construction-time settings for a `Machine`.

use std::time::Duration;

use crate::memory::MemoryMode;

/// How long a blocking channel operation waits before a `watchdog` machine faults.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
  pub memory_mode : MemoryMode,
  /// `None` blocks indefinitely on channel reads and (bounded) writes.
  pub io_timeout  : Option<Duration>,
  /// `None` lets a machine run for as many instructions as it likes.
  pub step_limit  : Option<u64>,
}

impl Config {
  pub fn new() -> Config {
    Config::default()
  }

  /**
    The default settings, but giving up on any channel operation that blocks for longer than
    `DEFAULT_IO_TIMEOUT`. A machine whose neighbor computes for longer than that before writing
    will fault with `IoTimeout`, so this suits searches and tests rather than arbitrary programs.
  */
  pub fn watchdog() -> Config {
    Config::default().io_timeout(Some(DEFAULT_IO_TIMEOUT))
  }

  pub fn memory_mode(mut self, memory_mode: MemoryMode) -> Config {
    self.memory_mode = memory_mode;
    self
  }

  pub fn io_timeout(mut self, io_timeout: Option<Duration>) -> Config {
    self.io_timeout = io_timeout;
    self
  }

  pub fn step_limit(mut self, step_limit: Option<u64>) -> Config {
    self.step_limit = step_limit;
    self
  }
}

/// Extended memory, channel operations block for as long as they need to, no step limit.
impl Default for Config {
  fn default() -> Config {
    Config {
      memory_mode : MemoryMode::Extended,
      io_timeout  : None,
      step_limit  : None,
    }
  }
}
