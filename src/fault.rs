/*!
  Faults are fatal, non-recoverable interpreter errors. A fault aborts the run loop of the machine
  that raised it and is returned to whoever owns that machine. Faults are never retried, because
  the machine state after a fault is not well-defined for resumption.

  A `PipelineFailure` is what the pipeline composer reports when one or more of the machines it
  started did not halt cleanly. It is never accompanied by a partial result.
*/

use std::fmt::{Display, Formatter};
use std::time::Duration;

use string_cache::DefaultAtom;
use thiserror::Error;

use crate::address::Value;

/// Errors raised by a blocking `Channel` operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ChannelError {
  /// The channel is closed and has no buffered values left.
  #[error("channel is closed")]
  Closed,
  /// No value (or no free slot) became available within the timeout.
  #[error("channel operation timed out after {0:?}")]
  Timeout(Duration),
}

/// Fatal faults raised by the execution core.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Fault {
  /// The two low decimal digits of the cell at `address` name no operation.
  #[error("invalid opcode {value} at address {address}")]
  InvalidOpcode {
    address: usize,
    value: Value
  },

  /// A mode digit other than 0, 1 or 2.
  #[error("invalid addressing mode {mode} in instruction {value} at address {address}")]
  InvalidAddressingMode {
    address: usize,
    value: Value,
    mode: Value
  },

  /// A write operand resolved to `Immediate` mode.
  #[error("immediate mode write target in instruction at address {address}")]
  InvalidWriteTarget {
    address: usize
  },

  /// An access outside `[0, len)` under fixed memory.
  #[error("address {address} is outside of fixed memory of length {len}")]
  OutOfBoundsAccess {
    address: usize,
    len: usize
  },

  /// Any resolved address below zero, under either memory mode.
  #[error("negative address {0}")]
  NegativeAddress(Value),

  /// Arithmetic on 64 bit values overflowed.
  #[error("arithmetic overflow in instruction at address {address}")]
  Overflow {
    address: usize
  },

  /// Memory written so far above the program is too sparse to copy out densely.
  #[error("memory extent {extent} exceeds the snapshot limit of {limit} cells")]
  SnapshotTooLarge {
    extent: usize,
    limit: usize
  },

  /// A non-negative operand too large for this platform's address space.
  #[error("address {0} is not addressable on this platform")]
  Unaddressable(Value),

  /// A blocking read or write on a channel that can never be serviced again.
  #[error("channel closed while {}", direction(.reading))]
  ChannelClosed {
    reading: bool
  },

  /// A blocking read or write waited longer than the configured timeout.
  #[error("timed out after {0:?} waiting on a channel")]
  IoTimeout(Duration),

  /// The configured instruction budget was exhausted before the machine halted.
  #[error("step limit of {0} instructions exceeded")]
  StepLimitExceeded(u64),
}

impl Fault {
  /// Converts a channel error into the corresponding fault.
  pub fn from_channel(error: ChannelError, reading: bool) -> Fault {
    match error {
      ChannelError::Closed           => Fault::ChannelClosed { reading },
      ChannelError::Timeout(waited) => Fault::IoTimeout(waited),
    }
  }

  /// Faults that are a consequence of another machine stopping rather than a cause in themselves.
  pub fn is_starvation(&self) -> bool {
    match self {
      | Fault::ChannelClosed { .. }
      | Fault::IoTimeout(_) => true,
      _                     => false
    }
  }
}

/// A fault together with the label of the machine that raised it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MachineFault {
  pub label: DefaultAtom,
  pub fault: Fault,
}

impl Display for MachineFault {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}", self.label, self.fault)
  }
}

/// Failures reported by the pipeline composer.
#[derive(Debug, Error)]
pub enum PipelineFailure {
  /// At least one machine faulted. Faults are listed in machine order.
  #[error("{} machine(s) faulted: {}", .0.len(), join_faults(.0))]
  Faulted(Vec<MachineFault>),

  /// A machine thread panicked.
  #[error("machine thread {0} panicked")]
  Panicked(DefaultAtom),

  /// The operating system refused to start a machine thread.
  #[error("could not spawn thread for {label}: {source}")]
  Spawn {
    label: DefaultAtom,
    source: std::io::Error
  },

  /// A pipeline needs at least one phase.
  #[error("pipeline has no machines")]
  Empty,

  /// Every machine halted but the terminal channel holds no value.
  #[error("pipeline halted without producing a signal")]
  NoSignal,
}

impl PipelineFailure {
  /**
    The fault most likely to be the root cause: the first fault that is not merely a machine
    starving because its neighbor stopped. Falls back to the first fault.
  */
  pub fn root_cause(&self) -> Option<&MachineFault> {
    match self {
      PipelineFailure::Faulted(faults) => {
        faults.iter()
              .find(|f| !f.fault.is_starvation())
              .or_else(|| faults.first())
      }
      _ => None
    }
  }
}

fn direction(reading: &bool) -> &'static str {
  match *reading {
    true  => "reading input",
    false => "writing output"
  }
}

fn join_faults(faults: &[MachineFault]) -> String {
  faults.iter()
        .map(MachineFault::to_string)
        .collect::<Vec<String>>()
        .join("; ")
}
