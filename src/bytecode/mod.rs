/*!

  Instructions are stored in memory as ordinary integer cells; there is no separate code store.
  The cell at the instruction pointer is the instruction word, and the cells following it are its
  operands, one cell per operand. The instruction word is read as a decimal number:

    ... C B A D E
            │ │ └┴── opcode, the two least-significant digits
            │ └───── mode of operand 1
            └─────── mode of operand 2, and so on leftward

  Missing leading digits are zero, so `1002` is `multiply` with modes `(Position, Immediate,
  Position)`. Mode digits beyond the arity of the opcode are ignored.

  As in the rest of this crate, an enum is used for the opcode itself rather than for the whole
  instruction. The decoded `Instruction` is a transient view recomputed at every fetch; programs
  are free to overwrite their own instructions.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{disassemble, encode_program, parse_program, ProgramParseError};
pub use binary::{decode_instruction, encode_instruction, HALT_WORD};
pub use instruction::{Instruction, MAX_OPERANDS};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/**
  Opcodes of the virtual machine. The discriminant of each variant is its numeric code, so
  `Opcode::try_from` on the low two digits of an instruction word is the whole opcode lookup.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum Opcode {
  Add                = 1,  // add( a, b, dst )
  Multiply           = 2,  // multiply( a, b, dst )
  Input              = 3,  // input( dst )
  Output             = 4,  // output( a )
  JumpIfTrue         = 5,  // jump-if-true( a, target )
  JumpIfFalse        = 6,  // jump-if-false( a, target )
  LessThan           = 7,  // less-than( a, b, dst )
  Equals             = 8,  // equals( a, b, dst )
  AdjustRelativeBase = 9,  // adjust-relative-base( a )
  Halt               = 99, // halt
}

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The number of operand cells following the instruction word.
  pub fn arity(&self) -> usize {
    match self {
      | Opcode::Add
      | Opcode::Multiply
      | Opcode::LessThan
      | Opcode::Equals             => 3,
      | Opcode::JumpIfTrue
      | Opcode::JumpIfFalse        => 2,
      | Opcode::Input
      | Opcode::Output
      | Opcode::AdjustRelativeBase => 1,
      Opcode::Halt                 => 0,
    }
  }

  /// The index of the operand the instruction writes its result to, if it writes one.
  pub fn write_operand(&self) -> Option<usize> {
    match self {
      | Opcode::Add
      | Opcode::Multiply
      | Opcode::LessThan
      | Opcode::Equals => Some(2),
      Opcode::Input    => Some(0),
      _                => None
    }
  }
}

/// Per-operand interpretation of a mode digit.
#[derive(
StrumDisplay, IntoStaticStr, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,               PartialEq,     Debug, Hash
)]
#[repr(u8)]
pub enum AddressingMode {
  /// The operand is the address of the value.
  Position  = 0,
  /// The operand is the value itself. Illegal as a write target.
  Immediate = 1,
  /// The operand is an offset from the relative base to the address of the value.
  Relative  = 2,
}

impl Default for AddressingMode {
  fn default() -> AddressingMode {
    AddressingMode::Position
  }
}
