/*!
  The diagnostic program reads a single system ID, then runs a series of self tests. Every test
  but the last outputs how far its result was off, which must be zero. The final output is the
  diagnostic code.
*/

use std::iter::once;

use tracing::info;

use crate::address::Value;
use crate::applications::ApplicationError;
use crate::channel::Channel;
use crate::machine::Machine;
use crate::memory::MemoryMode;

/// System ID of the ship's air conditioner unit.
pub const AIR_CONDITIONER: Value = 1;
/// System ID of the thermal radiator controller.
pub const THERMAL_RADIATOR: Value = 5;

pub fn run_diagnostics(program: &[Value], system_id: Value) -> Result<Value, ApplicationError> {
  let input = Channel::from_values(once(system_id));
  input.close();

  let mut machine = Machine::new(program, Some(input), None, MemoryMode::Fixed).labeled("diagnostics");
  machine.run()?;

  let outputs = machine.output().drain();
  let (code, tests) = outputs.split_last().ok_or(ApplicationError::NoOutput)?;

  if let Some((index, &value)) = tests.iter().enumerate().find(|(_, value)| **value != 0) {
    return Err(ApplicationError::DiagnosticFailed { index, value });
  }

  info!(system_id, tests = tests.len(), code, "diagnostics passed");
  Ok(*code)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::parse_program;
  use crate::fault::Fault;

  const COMPARE_TO_EIGHT: &str = "3,21,1008,21,8,20,1005,20,22,107,8,21,20,1006,20,31,1106,0,36,\
    98,0,0,1002,21,125,20,4,20,1105,1,46,104,999,1105,1,46,1101,1000,1,20,4,20,1105,1,46,98,99";

  #[test]
  fn diagnostic_code(){
    let program = parse_program(COMPARE_TO_EIGHT).unwrap();
    assert_eq!(run_diagnostics(&program, 7).unwrap(), 999);
    assert_eq!(run_diagnostics(&program, 8).unwrap(), 1000);
    assert_eq!(run_diagnostics(&program, 9).unwrap(), 1001);
  }

  #[test]
  fn passing_tests_then_code(){
    let program = parse_program("3,0,104,0,104,0,4,0,99").unwrap();
    assert_eq!(run_diagnostics(&program, THERMAL_RADIATOR).unwrap(), 5);
  }

  #[test]
  fn failing_test_is_reported(){
    let program = parse_program("104,0,104,3,104,0,104,77,99").unwrap();
    match run_diagnostics(&program, AIR_CONDITIONER) {
      Err(ApplicationError::DiagnosticFailed { index: 1, value: 3 }) => {}
      other => panic!("expected a failed test, got {:?}", other),
    }
  }

  #[test]
  fn no_output(){
    match run_diagnostics(&[3, 0, 99], AIR_CONDITIONER) {
      Err(ApplicationError::NoOutput) => {}
      other => panic!("expected no output, got {:?}", other),
    }
  }

  #[test]
  fn second_input_faults(){
    match run_diagnostics(&[3, 0, 3, 0, 99], AIR_CONDITIONER) {
      Err(ApplicationError::Fault(Fault::ChannelClosed { reading: true })) => {}
      other => panic!("expected a closed input, got {:?}", other),
    }
  }
}
