//! The Basic Operation Of System Test: exercises relative addressing and memory past the program.

use std::iter::once;

use tracing::info;

use crate::address::Value;
use crate::applications::ApplicationError;
use crate::channel::Channel;
use crate::machine::Machine;
use crate::memory::MemoryMode;

pub const TEST_MODE: Value = 1;
pub const SENSOR_BOOST_MODE: Value = 2;

/// Runs the program with a single mode input under extended memory and returns all of its output.
pub fn run_boost(program: &[Value], mode: Value) -> Result<Vec<Value>, ApplicationError> {
  let input = Channel::from_values(once(mode));
  input.close();

  let mut machine = Machine::new(program, Some(input), None, MemoryMode::Extended).labeled("boost");
  machine.run()?;

  let outputs = machine.output().drain();
  info!(mode, outputs = outputs.len(), steps = machine.steps(), "boost finished");
  match outputs.is_empty() {
    true  => Err(ApplicationError::NoOutput),
    false => Ok(outputs)
  }
}
