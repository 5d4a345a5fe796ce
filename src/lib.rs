/*!
  An Intcode virtual machine. A `Machine` executes a program of 64 bit integer cells, reading its
  input from one `Channel` and writing its output to another. Wiring one machine's output channel
  to another's input composes them into a pipeline; the `pipeline` module builds chains and
  feedback loops of machines and runs each on its own thread.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod applications;
pub mod bytecode;
pub mod channel;
pub mod config;
pub mod fault;
pub mod machine;
pub mod memory;
pub mod permutations;
pub mod pipeline;

pub use address::{Address, Value};
pub use bytecode::{disassemble, encode_program, parse_program, AddressingMode, Instruction, Opcode};
pub use channel::Channel;
pub use config::Config;
pub use fault::{ChannelError, Fault, MachineFault, PipelineFailure};
pub use machine::{Machine, MachineState, Snapshot, StepOutcome};
pub use memory::{Memory, MemoryMode};
pub use pipeline::{build_chain, build_pipeline, max_signal, run_all, run_pipeline, Topology};
