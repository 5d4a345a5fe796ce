//! Amplifier controller software: five amplifiers, each running the same program, tuned by a phase.

use std::ops::Range;

use crate::address::Value;
use crate::applications::ApplicationError;
use crate::config::Config;
use crate::pipeline::{max_signal, Topology};

pub const CHAIN_PHASES: Range<Value> = 0..5;
pub const FEEDBACK_PHASES: Range<Value> = 5..10;

/// The signal fed into the first amplifier.
pub const INITIAL_SIGNAL: Value = 0;

/**
  The phase ordering that drives the thrusters hardest, and the signal it produces. Chained
  amplifiers use phases `0..5`; amplifiers in a feedback loop use phases `5..10`.
*/
pub fn max_thruster_signal(program: &[Value], feedback: bool)
  -> Result<(Vec<Value>, Value), ApplicationError>
{
  let topology = Topology::from_feedback(feedback);
  let phases: Vec<Value> = match topology {
    Topology::Chain    => CHAIN_PHASES.collect(),
    Topology::Feedback => FEEDBACK_PHASES.collect(),
  };

  Ok(max_signal(program, &phases, topology, INITIAL_SIGNAL, Config::watchdog())?)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::parse_program;

  #[test]
  fn chained(){
    let program = parse_program(
      "3,23,3,24,1002,24,10,24,1002,23,-1,23,101,5,23,23,1,24,23,23,4,23,99,0,0"
    ).unwrap();
    let (phases, signal) = max_thruster_signal(&program, false).unwrap();
    assert_eq!(phases, vec![0, 1, 2, 3, 4]);
    assert_eq!(signal, 54321);
  }

  #[test]
  fn looped(){
    let program = parse_program(
      "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5"
    ).unwrap();
    let (phases, signal) = max_thruster_signal(&program, true).unwrap();
    assert_eq!(phases, vec![9, 8, 7, 6, 5]);
    assert_eq!(signal, 139629729);
  }

  #[test]
  fn faulting_amplifier(){
    match max_thruster_signal(&[3, 0, 4, 0, 42], false) {
      Err(ApplicationError::Pipeline(_)) => {}
      other => panic!("expected a pipeline failure, got {:?}", other),
    }
  }
}
