/*!
  This module is responsible for the decoding and encoding of instruction words. Decoding is a
  pure function of the cell at the instruction pointer; it never touches machine state.
*/
use std::convert::TryFrom;

use super::{AddressingMode, Instruction, Opcode, MAX_OPERANDS};
use crate::address::{Address, Value};
use crate::fault::Fault;

/// The instruction word of `halt` with no mode digits.
pub const HALT_WORD: Value = 99;

const OPCODE_MODULUS: Value = 100;
const MODE_RADIX: Value = 10;

/**
  Decodes the instruction word `word` found at address `at`. The address is only used to give
  faults context.

  The two least-significant decimal digits select the opcode. Each further digit, moving left,
  selects the mode of the next operand.
*/
pub fn decode_instruction(word: Value, at: Address) -> Result<Instruction, Fault> {
  let invalid_opcode = Fault::InvalidOpcode { address: at.idx(), value: word };
  if word < 0 {
    return Err(invalid_opcode);
  }

  let opcode = match Opcode::try_from((word % OPCODE_MODULUS) as u8) {
    Ok(opcode) => opcode,
    Err(_e)    => return Err(invalid_opcode)
  };

  let mut modes = [AddressingMode::Position; MAX_OPERANDS];
  let mut digits = word / OPCODE_MODULUS;
  for slot in modes.iter_mut().take(opcode.arity()) {
    let digit = digits % MODE_RADIX;
    *slot = match AddressingMode::try_from(digit as u8) {
      Ok(mode) => mode,
      Err(_e)  => {
        return Err(Fault::InvalidAddressingMode { address: at.idx(), value: word, mode: digit });
      }
    };
    digits /= MODE_RADIX;
  }

  Ok(Instruction::new(opcode, &modes))
}

/// Encodes an instruction back to its canonical instruction word.
pub fn encode_instruction(instruction: &Instruction) -> Value {
  let mut word  = instruction.opcode.code() as Value;
  let mut scale = OPCODE_MODULUS;
  for mode in instruction.modes() {
    word  += Into::<u8>::into(*mode) as Value * scale;
    scale *= MODE_RADIX;
  }
  word
}
