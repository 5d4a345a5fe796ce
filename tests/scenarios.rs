//! End-to-end runs of single machines and pipelines through the public interface.

use std::thread;
use std::time::{Duration, Instant};

use intcode::{
  build_chain,
  encode_program,
  parse_program,
  run_all,
  Address,
  Channel,
  Config,
  Fault,
  Machine,
  MachineState,
  MemoryMode,
  PipelineFailure,
  Value,
};

const CHAIN_PROGRAM: &str = "3,15,3,16,1002,16,10,16,1001,16,15,16,4,16,1005,16,0,99,0,0";
const FEEDBACK_PROGRAM: &str =
  "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5";
const QUINE: &str = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";

fn program(text: &str) -> Vec<Value> {
  parse_program(text).unwrap()
}

#[test]
fn arithmetic_leaves_result_at_zero(){
  let mut machine = Machine::new(&program("1,9,10,3,2,3,11,0,99,30,40,50"), None, None, MemoryMode::Fixed);
  machine.run().unwrap();
  assert_eq!(machine.memory().read(Address::new(0)), Ok(3500));
  assert_eq!(machine.state(), MachineState::Halted);
}

#[test]
fn echoes_input(){
  let input = Channel::from_values(vec![42]);
  let mut machine = Machine::new(&program("3,0,4,0,99"), Some(input), None, MemoryMode::Fixed);
  machine.run().unwrap();
  assert_eq!(machine.output().drain(), vec![42]);
}

#[test]
fn immediate_operand_writes_halt(){
  let mut machine = Machine::new(&program("1002,4,3,4,33"), None, None, MemoryMode::Fixed);
  machine.run().unwrap();
  assert_eq!(machine.memory().read(Address::new(4)), Ok(99));
}

#[test]
fn quine_outputs_itself(){
  let mut machine = Machine::new(&program(QUINE), None, None, MemoryMode::Extended);
  machine.run().unwrap();
  assert_eq!(machine.output().drain(), program(QUINE));
}

#[test]
fn chain_produces_signal(){
  let (machines, terminal) = build_chain(&program(CHAIN_PROGRAM), &[4, 3, 2, 1, 0], false, 0);
  run_all(machines).unwrap();
  assert_eq!(terminal.drain(), vec![43210]);
}

#[test]
fn feedback_loop_terminates(){
  let started = Instant::now();
  let (machines, terminal) = build_chain(&program(FEEDBACK_PROGRAM), &[9, 8, 7, 6, 5], true, 0);
  let monitors: Vec<_> = machines.iter().map(Machine::monitor).collect();

  run_all(machines).unwrap();

  assert!(monitors.iter().all(|monitor| monitor.get() == MachineState::Halted));
  assert_eq!(terminal.drain(), vec![139629729]);
  assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn fixed_and_extended_boundary(){
  let text = "4,3,99";
  let mut fixed = Machine::new(&program(text), None, None, MemoryMode::Fixed);
  assert_eq!(fixed.run(), Err(Fault::OutOfBoundsAccess { address: 3, len: 3 }));
  assert_eq!(fixed.state(), MachineState::Faulted);

  let mut extended = Machine::new(&program(text), None, None, MemoryMode::Extended);
  extended.run().unwrap();
  assert_eq!(extended.output().drain(), vec![0]);
}

#[test]
fn snapshot_text_round_trip(){
  let mut original = Machine::new(&program(QUINE), None, None, MemoryMode::Extended);
  for _ in 0..25 {
    original.step().unwrap();
  }
  let emitted = original.output().drain();

  // Continue from the transport form of the snapshot.
  let mut snapshot = original.snapshot().unwrap();
  snapshot.memory = parse_program(&encode_program(&snapshot.memory)).unwrap();
  let mut restored = Machine::restore(&snapshot, None, None, Config::default());

  original.run().unwrap();
  restored.run().unwrap();

  let remaining = original.output().drain();
  assert_eq!(restored.output().drain(), remaining);
  assert_eq!(restored.memory().snapshot(), original.memory().snapshot());

  let mut whole = emitted;
  whole.extend(remaining);
  assert_eq!(whole, program(QUINE));
}

#[test]
fn reading_a_drained_closed_channel_faults(){
  // The producer halts after writing one value; the consumer wants two.
  let link = Channel::new();
  let mut producer = Machine::new(&[104, 7, 99], None, Some(link.clone()), MemoryMode::Fixed);
  let mut consumer = Machine::new(&[3, 0, 3, 0, 99], Some(link), None, MemoryMode::Fixed);

  let consumer = thread::spawn(move || consumer.run());
  producer.run().unwrap();

  assert_eq!(consumer.join().unwrap(), Err(Fault::ChannelClosed { reading: true }));
}

#[test]
fn starved_feedback_loop_times_out(){
  // Neither machine ever writes, so each waits on the other until the timeout elapses.
  let timeout = Duration::from_millis(50);
  let config = Config::new().io_timeout(Some(timeout));
  let first_input  = Channel::new();
  let second_input = Channel::new();
  let first =
    Machine::with_config(&[3, 0, 4, 0, 99], Some(first_input.clone()), Some(second_input.clone()), config)
      .labeled("first");
  let second =
    Machine::with_config(&[3, 0, 4, 0, 99], Some(second_input), Some(first_input), config)
      .labeled("second");

  match run_all(vec![first, second]) {
    Err(PipelineFailure::Faulted(faults)) => {
      // Whichever machine times out first closes the other's input.
      assert_eq!(faults.len(), 2);
      assert!(faults.iter().all(|f| f.fault.is_starvation()));
      assert!(faults.iter().any(|f| f.fault == Fault::IoTimeout(timeout)));
    }
    other => panic!("expected the pipeline to fail, got {:?}", other),
  }
}

#[test]
fn faulting_machine_fails_the_pipeline(){
  // Forwards one value, except with phase 7, which jumps to the invalid opcode at address 20.
  let forwarder = program("3,100,1008,100,7,101,1005,101,20,3,102,4,102,99,0,0,0,0,0,0,42");
  let (machines, terminal) = build_chain(&forwarder, &[9, 8, 7, 6, 5], false, 0);

  let started = Instant::now();
  match run_all(machines) {
    Err(failure @ PipelineFailure::Faulted(_)) => {
      let root = failure.root_cause().unwrap();
      assert_eq!(&*root.label, "stage-2");
      assert_eq!(root.fault, Fault::InvalidOpcode { address: 20, value: 42 });
    }
    other => panic!("expected the pipeline to fail, got {:?}", other),
  }
  // Closed channels, not timeouts, stopped the machines downstream.
  assert!(started.elapsed() < Duration::from_secs(5));
  assert!(terminal.is_empty());
}

#[test]
fn default_config_waits_for_a_slow_neighbor(){
  assert_eq!(Config::default().io_timeout, None);

  let link = Channel::new();
  let mut consumer = Machine::with_config(&[3, 0, 4, 0, 99], Some(link.clone()), None, Config::default());
  let producer = thread::spawn(move || {
    thread::sleep(Duration::from_millis(200));
    link.put(11)
  });

  consumer.run().unwrap();
  producer.join().unwrap().unwrap();
  assert_eq!(consumer.output().drain(), vec![11]);
}
