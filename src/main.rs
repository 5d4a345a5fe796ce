use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use intcode::applications::amplifiers::max_thruster_signal;
use intcode::{disassemble, parse_program, Channel, Machine, MemoryMode};

// Outputs its input compared to 8: 999 below, 1000 equal, 1001 above.
const COMPARE_TO_EIGHT: &str = "3,21,1008,21,8,20,1005,20,22,107,8,21,20,1006,20,31,1106,0,36,\
  98,0,0,1002,21,125,20,4,20,1105,1,46,104,999,1105,1,46,1101,1000,1,20,4,20,1105,1,46,98,99";

const AMPLIFIER_LOOP: &str =
  "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5";

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  #[cfg(feature = "trace_computation")]
  info!("Computation tracing ENABLED");

  if let Err(message) = demo() {
    error!("{}", message);
    std::process::exit(1);
  }
}

fn demo() -> Result<(), Box<dyn std::error::Error>> {
  let program = parse_program(COMPARE_TO_EIGHT)?;
  println!("Program:\n{}\n", disassemble(&program).join("\n"));

  let mut machine =
    Machine::new(&program, Some(Channel::from_values(vec![8])), None, MemoryMode::Fixed)
      .labeled("compare");
  machine.run()?;
  println!("{}", machine);
  println!("Output: {:?}\n", machine.output().drain());

  let program = parse_program(AMPLIFIER_LOOP)?;
  let (phases, signal) = max_thruster_signal(&program, true)?;
  println!("Feedback loop: phases {:?} produce signal {}", phases, signal);

  Ok(())
}
