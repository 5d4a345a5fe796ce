//! The gravity assist program: arithmetic only, fixed memory, inputs patched into addresses 1 and 2.

use tracing::{debug, info};

use crate::address::{Address, Value};
use crate::applications::ApplicationError;
use crate::fault::Fault;
use crate::machine::Machine;
use crate::memory::MemoryMode;

/// Nouns and verbs are searched in `0..SEARCH_LIMIT`.
pub const SEARCH_LIMIT: Value = 100;

const NOUN_ADDRESS: usize = 1;
const VERB_ADDRESS: usize = 2;

/// Runs `program` with `noun` at address 1 and `verb` at address 2, returning the value left at
/// address 0 once it halts.
pub fn run_with(program: &[Value], noun: Value, verb: Value) -> Result<Value, Fault> {
  let mut patched = program.to_vec();
  for &(address, value) in &[(NOUN_ADDRESS, noun), (VERB_ADDRESS, verb)] {
    match patched.get_mut(address) {
      Some(cell) => *cell = value,
      None       => return Err(Fault::OutOfBoundsAccess { address, len: program.len() })
    }
  }

  let mut machine = Machine::new(&patched, None, None, MemoryMode::Fixed).labeled("gravity-assist");
  machine.run()?;
  machine.memory().read(Address::new(0))
}

/**
  Finds the noun and verb that make the program produce `target`, returning `100 * noun + verb`.
  Pairs are tried noun first, both in `0..100`. A pair whose run faults cannot be the answer and
  is skipped.
*/
pub fn find_noun_verb(program: &[Value], target: Value) -> Result<Value, ApplicationError> {
  info!(target, "searching for noun and verb");

  for noun in 0..SEARCH_LIMIT {
    for verb in 0..SEARCH_LIMIT {
      match run_with(program, noun, verb) {
        Ok(value) if value == target => return Ok(100 * noun + verb),
        Ok(_)                        => {}
        Err(fault)                   => debug!(noun, verb, %fault, "skipping pair"),
      }
    }
  }

  Err(ApplicationError::NoSolution { target, limit: SEARCH_LIMIT })
}
