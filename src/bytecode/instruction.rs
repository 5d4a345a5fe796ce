use std::fmt::{Display, Formatter};

use super::{AddressingMode, Opcode};

/// The largest arity of any opcode.
pub const MAX_OPERANDS: usize = 3;

/// The decoded view of an instruction word: an opcode and one addressing mode per operand slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  pub opcode : Opcode,
  modes      : [AddressingMode; MAX_OPERANDS],
}

impl Instruction {

  /// Modes past the arity of `opcode` are dropped; missing modes default to `Position`.
  pub fn new(opcode: Opcode, modes: &[AddressingMode]) -> Instruction {
    let mut padded = [AddressingMode::Position; MAX_OPERANDS];
    for (slot, mode) in padded.iter_mut().zip(modes.iter().take(opcode.arity())) {
      *slot = *mode;
    }
    Instruction { opcode, modes: padded }
  }

  /// One mode per operand slot of the opcode, in operand order.
  pub fn modes(&self) -> &[AddressingMode] {
    &self.modes[..self.opcode.arity()]
  }

  pub fn mode(&self, operand: usize) -> AddressingMode {
    self.modes()[operand]
  }

  /// The number of memory cells the instruction occupies, the instruction word included.
  pub fn width(&self) -> usize {
    1 + self.opcode.arity()
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let modes =
      self.modes()
          .iter()
          .map(|mode| format!("{}", mode))
          .collect::<Vec<String>>()
          .join(", ");
    write!(f, "{}({})", self.opcode, modes)
  }
}
