/*!
  The textual forms of a program. The transport form is a single line of comma-separated decimal
  integers, which this module parses with `nom` and emits again with `encode_program`. The
  human readable listing produced by `disassemble` leverages the `strum` derives of `Opcode` for
  its mnemonics.
*/

use std::fmt::Write as FmtWrite;

use nom::{
  character::complete::{
    char as one_char,
    digit1,
    multispace0
  },
  combinator::{all_consuming, map_res, opt, recognize},
  multi::separated_nonempty_list,
  sequence::{delimited, pair},
  IResult
};
use thiserror::Error;

use crate::address::{Address, Value};
use crate::bytecode::{decode_instruction, AddressingMode, Instruction};

// Number of characters of the offending text quoted in a parse error.
const CONTEXT_WIDTH: usize = 16;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ProgramParseError {
  #[error("program text is empty")]
  Empty,
  #[error("malformed program text at offset {offset} near `{near}`")]
  Malformed {
    offset: usize,
    near: String
  },
}

fn value_p(input: &str) -> IResult<&str, Value> {
  map_res(
    recognize(pair(opt(one_char('-')), digit1)),
    |text: &str| text.parse::<Value>()
  )(input)
}

fn program_p(input: &str) -> IResult<&str, Vec<Value>> {
  all_consuming(
    delimited(
      multispace0,
      separated_nonempty_list(
        delimited(multispace0, one_char(','), multispace0),
        value_p
      ),
      multispace0
    )
  )(input)
}

/// Parses the comma-separated transport form of a program. Surrounding whitespace is ignored.
pub fn parse_program(text: &str) -> Result<Vec<Value>, ProgramParseError> {
  if text.trim().is_empty() {
    return Err(ProgramParseError::Empty);
  }

  match program_p(text) {
    Ok((_rest, program)) => Ok(program),
    | Err(nom::Err::Error((rest, _kind)))
    | Err(nom::Err::Failure((rest, _kind))) => {
      Err(ProgramParseError::Malformed {
        offset: text.len() - rest.len(),
        near: rest.chars().take(CONTEXT_WIDTH).collect()
      })
    }
    Err(nom::Err::Incomplete(_needed)) => {
      Err(ProgramParseError::Malformed { offset: text.len(), near: String::new() })
    }
  }
}

/// Emits the comma-separated transport form of a program or memory snapshot.
pub fn encode_program(program: &[Value]) -> String {
  program.iter()
         .map(Value::to_string)
         .collect::<Vec<String>>()
         .join(",")
}

fn format_operand(mode: AddressingMode, raw: Value) -> String {
  match mode {
    AddressingMode::Position  => format!("[{}]", raw),
    AddressingMode::Immediate => format!("{}", raw),
    AddressingMode::Relative  => format!("[rb{:+}]", raw),
  }
}

fn format_instruction(instruction: &Instruction, operands: &[Value]) -> String {
  let mut line = format!("{}", instruction.opcode);
  for (i, (mode, raw)) in instruction.modes().iter().zip(operands).enumerate() {
    let separator = if i == 0 { " " } else { ", " };
    // Writing into a `String` cannot fail.
    let _ = write!(line, "{}{}", separator, format_operand(*mode, *raw));
  }
  line
}

/**
  Renders a best-effort listing of `program`, one line per instruction. Because code and data
  share memory, a linear sweep cannot tell them apart in general: any cell that does not decode,
  or whose operands would run past the end of the program, is listed as data.
*/
pub fn disassemble(program: &[Value]) -> Vec<String> {
  let mut listing = Vec::new();
  let mut at = 0;

  while at < program.len() {
    let decoded = decode_instruction(program[at], Address::new(at)).ok()
                    .filter(|instruction| at + instruction.width() <= program.len());
    match decoded {

      Some(instruction) => {
        let operands = &program[at + 1..at + instruction.width()];
        listing.push(format!("{:>5}: {}", at, format_instruction(&instruction, operands)));
        at += instruction.width();
      }

      None => {
        listing.push(format!("{:>5}: data {}", at, program[at]));
        at += 1;
      }

    }
  }

  listing
}
