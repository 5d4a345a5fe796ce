//! Structures and functions for the Intcode machine: one memory, one execution core, and the two
//! channels it reads its input from and writes its output to.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use prettytable::{format as TableFormat, Table};
use string_cache::DefaultAtom;
use strum_macros::{Display as StrumDisplay, IntoStaticStr};
use tracing::{debug, warn};
#[cfg(feature = "trace_computation")]
use tracing::trace;

use crate::address::{Address, Value};
use crate::bytecode::{decode_instruction, AddressingMode, Instruction, Opcode, HALT_WORD};
use crate::channel::Channel;
use crate::config::Config;
use crate::fault::Fault;
use crate::memory::{Memory, MemoryMode};

pub const DEFAULT_LABEL: &str = "intcode";

/**
  The lifecycle of a machine. `Halted` and `Faulted` are terminal.

  ```text
  Ready ──> Running ──> Halted
              │  ↑ ↓
              │  BlockedOnInput / BlockedOnOutput
              └───────> Faulted
  ```
*/
#[derive(
StrumDisplay, IntoStaticStr, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,               PartialEq,     Debug, Hash
)]
#[repr(u8)]
pub enum MachineState {
  Ready,
  Running,
  BlockedOnInput,
  BlockedOnOutput,
  Halted,
  Faulted,
}

impl MachineState {
  pub fn is_terminal(&self) -> bool {
    match self {
      | MachineState::Halted
      | MachineState::Faulted => true,
      _                       => false
    }
  }
}

/// A cloneable, thread-safe view of a machine's current `MachineState`.
#[derive(Clone, Debug)]
pub struct StateMonitor {
  state: Arc<AtomicU8>
}

impl StateMonitor {
  fn new() -> StateMonitor {
    StateMonitor {
      state: Arc::new(AtomicU8::new(MachineState::Ready.into()))
    }
  }

  pub fn get(&self) -> MachineState {
    // Only `set` writes, and it only stores valid discriminants.
    MachineState::try_from(self.state.load(Ordering::Acquire)).unwrap_or(MachineState::Faulted)
  }

  fn set(&self, state: MachineState) {
    self.state.store(state.into(), Ordering::Release);
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StepOutcome {
  Continue,
  Halted
}

/// Everything needed to resume execution elsewhere: memory contents and both registers.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Snapshot {
  pub memory              : Vec<Value>,
  pub instruction_pointer : usize,
  pub relative_base       : Value,
}

pub struct Machine {
  label  : DefaultAtom,   // Identity in logs and pipeline failures
  memory : Memory,        // Exclusively owned, never shared with another machine

  // Registers //
  ip     : Address,       // Instruction pointer
  rb     : Value,         // Relative base

  state  : StateMonitor,
  fault  : Option<Fault>, // The fault that stopped the machine, if any
  steps  : u64,           // Instructions executed so far

  input  : Channel,
  output : Channel,
  config : Config,
}

impl Machine {

  // region Construction

  /**
    Loads a copy of `program` into a fresh machine. Omitted channels default to freshly created,
    empty, unbounded channels.
  */
  pub fn new(
    program     : &[Value],
    input       : Option<Channel>,
    output      : Option<Channel>,
    memory_mode : MemoryMode
  ) -> Machine {
    Machine::with_config(program, input, output, Config::default().memory_mode(memory_mode))
  }

  pub fn with_config(
    program : &[Value],
    input   : Option<Channel>,
    output  : Option<Channel>,
    config  : Config
  ) -> Machine {
    Machine {
      label  : DefaultAtom::from(DEFAULT_LABEL),
      memory : Memory::new(program, config.memory_mode),
      ip     : Address::default(),
      rb     : 0,
      state  : StateMonitor::new(),
      fault  : None,
      steps  : 0,
      input  : input.unwrap_or_default(),
      output : output.unwrap_or_default(),
      config,
    }
  }

  /// Builds a machine that continues from `snapshot` as if it had never stopped.
  pub fn restore(
    snapshot : &Snapshot,
    input    : Option<Channel>,
    output   : Option<Channel>,
    config   : Config
  ) -> Machine {
    let mut machine = Machine::with_config(&snapshot.memory, input, output, config);
    machine.ip = Address::new(snapshot.instruction_pointer);
    machine.rb = snapshot.relative_base;
    machine
  }

  pub fn labeled<L>(mut self, label: L) -> Machine
    where L: Into<DefaultAtom>
  {
    self.label = label.into();
    self
  }

  // endregion

  // region Accessors

  pub fn label(&self) -> &DefaultAtom {
    &self.label
  }

  pub fn state(&self) -> MachineState {
    self.state.get()
  }

  /// A handle for observing this machine's state from another thread.
  pub fn monitor(&self) -> StateMonitor {
    self.state.clone()
  }

  pub fn fault(&self) -> Option<&Fault> {
    self.fault.as_ref()
  }

  pub fn input(&self) -> &Channel {
    &self.input
  }

  pub fn output(&self) -> &Channel {
    &self.output
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn instruction_pointer(&self) -> usize {
    self.ip.idx()
  }

  pub fn relative_base(&self) -> Value {
    self.rb
  }

  pub fn steps(&self) -> u64 {
    self.steps
  }

  /// Fails with `SnapshotTooLarge` if the program has written too far past its end.
  pub fn snapshot(&self) -> Result<Snapshot, Fault> {
    Ok(Snapshot {
      memory              : self.memory.snapshot()?,
      instruction_pointer : self.ip.idx(),
      relative_base       : self.rb,
    })
  }

  // endregion

  // region Execution

  /**
    Runs until the machine halts or faults, blocking the calling thread while waiting on its
    channels. Either way the output channel is closed on return, so downstream readers never
    wait on a machine that has stopped.
  */
  pub fn run(&mut self) -> Result<(), Fault> {
    loop {
      if self.step()? == StepOutcome::Halted {
        return Ok(());
      }
      #[cfg(feature = "trace_computation")] trace!("\n{}", self);
    }
  }

  /**
    Executes exactly one instruction. Stepping a halted machine is a no-op that reports
    `Halted` again; stepping a faulted machine reports its fault again.
  */
  pub fn step(&mut self) -> Result<StepOutcome, Fault> {
    if let Some(fault) = &self.fault {
      return Err(fault.clone());
    }
    match self.state() {
      MachineState::Halted => return Ok(StepOutcome::Halted),
      MachineState::Ready  => {
        debug!(machine = %self.label, memory = %self.memory.mode(), "starting");
        self.state.set(MachineState::Running);
      }
      _ => {}
    }

    let result = match self.config.step_limit {
      Some(limit) if self.steps >= limit => Err(Fault::StepLimitExceeded(limit)),
      _                                  => self.execute()
    };

    match result {

      Ok(StepOutcome::Continue) => {
        self.steps += 1;
        Ok(StepOutcome::Continue)
      }

      Ok(StepOutcome::Halted) => {
        debug!(machine = %self.label, steps = self.steps, "halted");
        self.finish(MachineState::Halted);
        Ok(StepOutcome::Halted)
      }

      Err(fault) => {
        warn!(machine = %self.label, address = self.ip.idx(), %fault, "faulted");
        self.fault = Some(fault.clone());
        self.finish(MachineState::Faulted);
        Err(fault)
      }

    }
  }

  fn finish(&mut self, state: MachineState) {
    self.state.set(state);
    self.output.close();
  }

  /// Fetch, decode and execute the instruction at the instruction pointer.
  fn execute(&mut self) -> Result<StepOutcome, Fault> {
    let at = self.ip;
    let word = self.memory.read(at)?;
    if word == HALT_WORD {
      return Ok(StepOutcome::Halted);
    }

    let instruction = decode_instruction(word, at)?;
    #[cfg(feature = "trace_computation")]
      trace!(machine = %self.label, address = at.idx(), %instruction, "execute");

    // Operands are always read from the cells following the instruction word.
    self.ip = at + 1;

    match instruction.opcode {

      Opcode::Add => {
        let (a, b) = self.binary_operands(&instruction, at)?;
        let sum = a.checked_add(b).ok_or(Fault::Overflow { address: at.idx() })?;
        self.store(&instruction, 2, at, sum)?;
      }

      Opcode::Multiply => {
        let (a, b) = self.binary_operands(&instruction, at)?;
        let product = a.checked_mul(b).ok_or(Fault::Overflow { address: at.idx() })?;
        self.store(&instruction, 2, at, product)?;
      }

      Opcode::Input => {
        let target = self.write_target(instruction.mode(0), at)?;
        let value = self.receive()?;
        self.memory.write(target, value)?;
      }

      Opcode::Output => {
        let value = self.read_operand(instruction.mode(0), at)?;
        self.send(value)?;
      }

      Opcode::JumpIfTrue => {
        let (condition, target) = self.binary_operands(&instruction, at)?;
        if condition != 0 {
          self.ip = Address::resolve(target)?;
        }
      }

      Opcode::JumpIfFalse => {
        let (condition, target) = self.binary_operands(&instruction, at)?;
        if condition == 0 {
          self.ip = Address::resolve(target)?;
        }
      }

      Opcode::LessThan => {
        let (a, b) = self.binary_operands(&instruction, at)?;
        self.store(&instruction, 2, at, (a < b) as Value)?;
      }

      Opcode::Equals => {
        let (a, b) = self.binary_operands(&instruction, at)?;
        self.store(&instruction, 2, at, (a == b) as Value)?;
      }

      Opcode::AdjustRelativeBase => {
        let offset = self.read_operand(instruction.mode(0), at)?;
        self.rb = self.rb.checked_add(offset).ok_or(Fault::Overflow { address: at.idx() })?;
      }

      // A halt word carrying mode digits, e.g. `199`.
      Opcode::Halt => {
        self.ip = at;
        return Ok(StepOutcome::Halted);
      }

    }

    Ok(StepOutcome::Continue)
  }

  // endregion

  // region Operand access

  /// Reads the operand cell at the instruction pointer and advances past it.
  fn next_cell(&mut self) -> Result<Value, Fault> {
    let raw = self.memory.read(self.ip)?;
    self.ip = self.ip + 1;
    Ok(raw)
  }

  fn read_operand(&mut self, mode: AddressingMode, at: Address) -> Result<Value, Fault> {
    let raw = self.next_cell()?;
    match mode {
      AddressingMode::Position  => self.memory.read(Address::resolve(raw)?),
      AddressingMode::Immediate => Ok(raw),
      AddressingMode::Relative  => self.memory.read(Address::resolve_relative(self.rb, raw, at)?),
    }
  }

  /// Resolves a write operand to the address it names. Immediate operands cannot be written.
  fn write_target(&mut self, mode: AddressingMode, at: Address) -> Result<Address, Fault> {
    let raw = self.next_cell()?;
    match mode {
      AddressingMode::Position  => Address::resolve(raw),
      AddressingMode::Immediate => Err(Fault::InvalidWriteTarget { address: at.idx() }),
      AddressingMode::Relative  => Address::resolve_relative(self.rb, raw, at),
    }
  }

  fn binary_operands(&mut self, instruction: &Instruction, at: Address)
    -> Result<(Value, Value), Fault>
  {
    let first  = self.read_operand(instruction.mode(0), at)?;
    let second = self.read_operand(instruction.mode(1), at)?;
    Ok((first, second))
  }

  fn store(&mut self, instruction: &Instruction, operand: usize, at: Address, value: Value)
    -> Result<(), Fault>
  {
    let target = self.write_target(instruction.mode(operand), at)?;
    self.memory.write(target, value)
  }

  // endregion

  // region Channel I/O

  fn receive(&mut self) -> Result<Value, Fault> {
    if self.input.is_empty() {
      debug!(machine = %self.label, "waiting for input");
      self.state.set(MachineState::BlockedOnInput);
    }
    let result = self.input.get_timeout(self.config.io_timeout);
    self.state.set(MachineState::Running);

    let value = result.map_err(|error| Fault::from_channel(error, true))?;
    debug!(machine = %self.label, value, "got input");
    Ok(value)
  }

  fn send(&mut self, value: Value) -> Result<(), Fault> {
    if self.output.is_full() {
      debug!(machine = %self.label, "waiting for room to write output");
      self.state.set(MachineState::BlockedOnOutput);
    }
    let result = self.output.put_timeout(value, self.config.io_timeout);
    self.state.set(MachineState::Running);

    result.map_err(|error| Fault::from_channel(error, false))?;
    debug!(machine = %self.label, value, "wrote output");
    Ok(())
  }

  // endregion

  // region Display methods

  fn make_memory_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (idx, value) in self.memory.iter() {
      match idx == self.ip.idx() {

        true  => {
          table.add_row(row![r->format!("* --> [{}] =", idx), value]);
        }

        false => {
          table.add_row(row![r->format!("[{}] =", idx), value]);
        }

      } // end match on highlight
    } // end for
    table
  }

  fn make_register_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Register", ubl->"Contents"]);
    table.add_row(row![r->"IP =", self.ip.idx()]);
    table.add_row(row![r->"RB =", self.rb]);
    table.add_row(row![r->"Steps =", self.steps]);
    table.add_row(row![r->"Input =", self.input.len()]);
    table.add_row(row![r->"Output =", self.output.len()]);
    table
  }

  // endregion

}

impl Drop for Machine {
  // A machine dropped mid-run (a panicking thread, say) must not strand its consumer.
  fn drop(&mut self) {
    self.output.close();
  }
}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let m_table = self.make_memory_table();
    let r_table = self.make_register_table();

    let mut combined_table = table!([m_table, r_table]);

    combined_table.set_titles(row![ub->"Memory", ub->"Registers"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    let status = match &self.fault {
      Some(fault) => format!("Faulted: {}", fault),
      None        => format!("{}", self.state())
    };

    write!(f, "Machine: {}\tMode: {}\t{}\n{}", self.label, self.memory.mode(), status, combined_table)
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::parse_program;
  use std::thread;
  use std::time::Duration;

  fn load(text: &str, mode: MemoryMode) -> Machine {
    Machine::new(&parse_program(text).unwrap(), None, None, mode)
  }

  fn run_with_input(text: &str, input: &[Value]) -> (Machine, Vec<Value>) {
    let mut machine = Machine::new(
      &parse_program(text).unwrap(),
      Some(Channel::from_values(input.iter().copied())),
      None,
      MemoryMode::Extended
    );
    machine.run().unwrap();
    let output = machine.output().drain();
    (machine, output)
  }

  #[test]
  fn fixed_memory_arithmetic(){
    let mut machine = load("1,9,10,3,2,3,11,0,99,30,40,50", MemoryMode::Fixed);
    assert_eq!(machine.state(), MachineState::Ready);
    machine.run().unwrap();
    assert_eq!(machine.state(), MachineState::Halted);
    assert_eq!(machine.memory().snapshot().unwrap()[0], 3500);
    assert_eq!(machine.instruction_pointer(), 8);
    assert_eq!(machine.steps(), 2);
  }

  #[test]
  fn immediate_mode_multiply(){
    let mut machine = load("1002,4,3,4,33", MemoryMode::Fixed);
    machine.run().unwrap();
    assert_eq!(machine.memory().read(Address::new(4)), Ok(99));
  }

  #[test]
  fn echo(){
    let (_machine, output) = run_with_input("3,0,4,0,99", &[42]);
    assert_eq!(output, vec![42]);
  }

  #[test]
  fn comparisons(){
    // Position mode "equal to 8" and immediate mode "less than 8".
    assert_eq!(run_with_input("3,9,8,9,10,9,4,9,99,-1,8", &[8]).1, vec![1]);
    assert_eq!(run_with_input("3,9,8,9,10,9,4,9,99,-1,8", &[7]).1, vec![0]);
    assert_eq!(run_with_input("3,3,1107,-1,8,3,4,3,99", &[5]).1, vec![1]);
    assert_eq!(run_with_input("3,3,1107,-1,8,3,4,3,99", &[9]).1, vec![0]);
  }

  #[test]
  fn jumps(){
    let position = "3,12,6,12,15,1,13,14,13,4,13,99,-1,0,1,9";
    let immediate = "3,3,1105,-1,9,1101,0,0,12,4,12,99,1";
    for program in &[position, immediate] {
      assert_eq!(run_with_input(program, &[0]).1, vec![0]);
      assert_eq!(run_with_input(program, &[-4]).1, vec![1]);
    }
  }

  #[test]
  fn relative_mode_quine(){
    let text = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";
    let (machine, output) = run_with_input(text, &[]);
    assert_eq!(output, parse_program(text).unwrap());
    assert_eq!(machine.relative_base(), 16);
  }

  #[test]
  fn large_values(){
    assert_eq!(run_with_input("104,1125899906842624,99", &[]).1, vec![1125899906842624]);
    let output = run_with_input("1102,34915192,34915192,7,4,7,99,0", &[]).1;
    assert_eq!(output[0].to_string().len(), 16);
  }

  #[test]
  fn immediate_write_target_faults(){
    let mut position = load("1101,1,1,1,99", MemoryMode::Fixed);
    assert!(position.run().is_ok());

    let mut immediate = load("11101,1,1,1,99", MemoryMode::Fixed);
    assert_eq!(immediate.run(), Err(Fault::InvalidWriteTarget{ address: 0 }));
    assert_eq!(immediate.state(), MachineState::Faulted);
    assert!(immediate.output().is_closed());
  }

  #[test]
  fn invalid_opcode_faults(){
    let mut machine = load("1,0,0,0,42", MemoryMode::Fixed);
    assert_eq!(machine.run(), Err(Fault::InvalidOpcode{ address: 4, value: 42 }));
    // Faults are sticky.
    assert_eq!(machine.step(), Err(Fault::InvalidOpcode{ address: 4, value: 42 }));
  }

  #[test]
  fn fixed_memory_boundary(){
    // Reads address 5, one past the end of the program.
    let mut fixed = load("4,5,99,0,0", MemoryMode::Fixed);
    assert_eq!(fixed.run(), Err(Fault::OutOfBoundsAccess{ address: 5, len: 5 }));

    let mut extended = load("4,5,99,0,0", MemoryMode::Extended);
    extended.run().unwrap();
    assert_eq!(extended.output().drain(), vec![0]);
  }

  #[test]
  fn running_off_the_end(){
    let mut fixed = load("1101,0,0,0", MemoryMode::Fixed);
    assert_eq!(fixed.run(), Err(Fault::OutOfBoundsAccess{ address: 4, len: 4 }));

    let mut extended = load("1101,0,0,0", MemoryMode::Extended);
    assert_eq!(extended.run(), Err(Fault::InvalidOpcode{ address: 4, value: 0 }));
  }

  #[test]
  fn negative_addresses_fault(){
    let mut position = load("4,-1,99", MemoryMode::Extended);
    assert_eq!(position.run(), Err(Fault::NegativeAddress(-1)));

    let mut relative = load("109,-5,204,2,99", MemoryMode::Extended);
    assert_eq!(relative.run(), Err(Fault::NegativeAddress(-3)));

    let mut jump = load("1105,1,-7,99", MemoryMode::Extended);
    assert_eq!(jump.run(), Err(Fault::NegativeAddress(-7)));
  }

  #[test]
  fn overflow_faults(){
    let text = format!("1101,{},1,0,99", Value::max_value());
    let mut machine = load(&text, MemoryMode::Fixed);
    assert_eq!(machine.run(), Err(Fault::Overflow{ address: 0 }));
  }

  #[test]
  fn halt_with_mode_digits(){
    let mut machine = load("1199", MemoryMode::Fixed);
    machine.run().unwrap();
    assert_eq!(machine.instruction_pointer(), 0);
    assert_eq!(machine.step(), Ok(StepOutcome::Halted));
  }

  #[test]
  fn input_on_closed_channel_faults(){
    let input = Channel::new();
    input.close();
    let mut machine = Machine::new(&[3, 0, 99], Some(input), None, MemoryMode::Fixed);
    assert_eq!(machine.run(), Err(Fault::ChannelClosed{ reading: true }));
  }

  #[test]
  fn input_times_out(){
    let timeout = Duration::from_millis(10);
    let config = Config::new().memory_mode(MemoryMode::Fixed).io_timeout(Some(timeout));
    let mut machine = Machine::with_config(&[3, 0, 99], None, None, config);
    assert_eq!(machine.run(), Err(Fault::IoTimeout(timeout)));
  }

  #[test]
  fn step_limit(){
    // An infinite loop: jump-if-true 1 to address 0.
    let config = Config::new().step_limit(Some(50));
    let mut machine = Machine::with_config(&[1105, 1, 0], None, None, config);
    assert_eq!(machine.run(), Err(Fault::StepLimitExceeded(50)));
    assert_eq!(machine.steps(), 50);
  }

  #[test]
  fn blocked_on_input_is_observable(){
    let input = Channel::new();
    let mut machine =
      Machine::new(&[3, 0, 4, 0, 99], Some(input.clone()), None, MemoryMode::Fixed)
        .labeled("echo");
    let monitor = machine.monitor();
    let output = machine.output().clone();

    let handle = thread::spawn(move || machine.run());
    while monitor.get() != MachineState::BlockedOnInput {
      thread::yield_now();
    }
    input.put(17).unwrap();
    assert_eq!(output.get(), Ok(17));
    handle.join().unwrap().unwrap();
    assert_eq!(monitor.get(), MachineState::Halted);
  }

  #[test]
  fn bounded_output_blocks(){
    let output = Channel::bounded(1);
    let mut machine =
      Machine::new(&[104, 1, 104, 2, 99], None, Some(output.clone()), MemoryMode::Fixed);
    let monitor = machine.monitor();

    let handle = thread::spawn(move || machine.run());
    while monitor.get() != MachineState::BlockedOnOutput {
      thread::yield_now();
    }
    assert_eq!(output.get(), Ok(1));
    assert_eq!(output.get(), Ok(2));
    handle.join().unwrap().unwrap();
  }

  #[test]
  fn snapshot_restore_continues(){
    let text = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";
    let mut original = load(text, MemoryMode::Extended);
    for _ in 0..10 {
      original.step().unwrap();
    }
    let snapshot = original.snapshot().unwrap();
    let mut restored = Machine::restore(&snapshot, None, None, Config::default());

    original.run().unwrap();
    restored.run().unwrap();
    assert_eq!(restored.memory().snapshot(), original.memory().snapshot());

    let original_output = original.output().drain();
    assert_eq!(original_output.len(), 16);
    // Two full loops, one output each, ran before the snapshot.
    assert_eq!(restored.output().drain(), original_output[2..].to_vec());
  }

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn snapshot_after_distant_write_faults(){
    let far: Value = 1 << 62;
    let mut machine = load(&format!("1101,1,1,{},99", far), MemoryMode::Extended);
    machine.run().unwrap();
    assert_eq!(machine.memory().read(Address::new(far as usize)), Ok(2));
    match machine.snapshot() {
      Err(Fault::SnapshotTooLarge { extent, .. }) => assert_eq!(extent, far as usize + 1),
      other => panic!("expected an oversized snapshot, got {:?}", other),
    }
  }

  #[test]
  fn display_renders_tables(){
    let mut machine = load("1002,4,3,4,33", MemoryMode::Fixed).labeled("display");
    machine.run().unwrap();
    let text = format!("{}", machine);
    assert!(text.starts_with("Machine: display\tMode: Fixed\tHalted"));
    assert!(text.contains("* --> [4] ="));
  }
}
