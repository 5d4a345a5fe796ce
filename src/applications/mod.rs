/*!
  Drivers that put the interpreter to work. Each one loads a program, wires its channels the way
  its puzzle requires, and interprets the values that come back.

   * `gravity_assist`: patches a noun and verb into fixed memory and reads back address 0.
   * `diagnostics`: runs a self test and extracts the diagnostic code.
   * `amplifiers`: searches phase orderings of a chained or looped amplifier pipeline.
   * `boost`: runs an extended memory program with a single mode input.
   * `painting_robot`: drives a robot on a hull, feeding it sensor readings as it runs.
*/

pub mod amplifiers;
pub mod boost;
pub mod diagnostics;
pub mod gravity_assist;
pub mod painting_robot;

use thiserror::Error;

use crate::address::Value;
use crate::bytecode::ProgramParseError;
use crate::fault::{Fault, PipelineFailure};

#[derive(Debug, Error)]
pub enum ApplicationError {
  #[error(transparent)]
  Parse(#[from] ProgramParseError),

  #[error(transparent)]
  Fault(#[from] Fault),

  #[error(transparent)]
  Pipeline(#[from] PipelineFailure),

  /// A diagnostic test before the final output reported a nonzero deviation.
  #[error("diagnostic test {index} failed, off by {value}")]
  DiagnosticFailed {
    index: usize,
    value: Value
  },

  #[error("program halted without producing output")]
  NoOutput,

  #[error("no noun and verb below {limit} produce {target}")]
  NoSolution {
    target: Value,
    limit: Value
  },

  /// The robot produced a value that is neither a colour nor a turn.
  #[error("robot produced invalid {what} {value}")]
  InvalidRobotOutput {
    what: &'static str,
    value: Value
  },

  #[error("robot thread panicked")]
  RobotPanicked,
}
