/*!
  The pipeline composer wires several machines, each loaded with its own copy of the same
  program, into a directed graph of channels and runs them concurrently, one thread per machine.

  Two topologies are supported:

   1. `Chain`: the output of machine `k` is the input of machine `k + 1`. Machine 0's input holds
      its phase followed by the seed and is then closed. The output of the last machine is the
      terminal channel.
   2. `Feedback`: as `Chain`, but the last machine's output is wired back into machine 0's input,
      forming a cycle. That channel is also the terminal channel.

  ```text
           ┌─────────────────── Feedback only ───────────────────┐
           ↓                                                      │
  phase₀, seed ──> [stage-0] ──> [stage-1] ──> ... ──> [stage-n] ──┴──> terminal
                      ↑             ↑                      ↑
                    phase₀        phase₁                 phaseₙ
  ```

  Every machine closes its output when it stops, halted or faulted. A machine waiting on a
  neighbor that has stopped therefore faults with `ChannelClosed` rather than blocking forever.
  Only a cycle of machines all waiting on each other can still block; configure an I/O timeout
  (`Config::watchdog`) to have such a cycle fault with `IoTimeout` instead.
*/

use std::iter::once;
use std::thread;

use rayon::prelude::*;
use strum_macros::{Display as StrumDisplay, EnumString};
use tracing::{debug, error, info};

use crate::address::Value;
use crate::channel::Channel;
use crate::config::Config;
use crate::fault::{MachineFault, PipelineFailure};
use crate::machine::Machine;
use crate::permutations::Permutations;

#[derive(StrumDisplay, EnumString, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Topology {
  Chain,
  Feedback
}

impl Topology {
  pub fn from_feedback(feedback: bool) -> Topology {
    match feedback {
      true  => Topology::Feedback,
      false => Topology::Chain
    }
  }
}

/// Label of the machine at position `k` of a pipeline.
pub fn stage_label(k: usize) -> String {
  format!("stage-{}", k)
}

/**
  Wires one machine per phase with the default configuration. Returns the machines in pipeline
  order together with the terminal channel.
*/
pub fn build_chain(program: &[Value], phases: &[Value], feedback: bool, seed: Value)
  -> (Vec<Machine>, Channel)
{
  build_pipeline(program, phases, Topology::from_feedback(feedback), seed, Config::default())
}

/**
  Wires one machine per phase. Each machine's input channel is preloaded with its phase, and
  machine 0's input additionally with `seed`. With no phases at all there are no machines and the
  seed passes straight through to the terminal channel.
*/
pub fn build_pipeline(
  program  : &[Value],
  phases   : &[Value],
  topology : Topology,
  seed     : Value,
  config   : Config
) -> (Vec<Machine>, Channel)
{
  let inputs: Vec<Channel> =
    phases.iter()
          .enumerate()
          .map(|(k, &phase)| {
            match k {
              0 => Channel::from_values(vec![phase, seed]),
              _ => Channel::from_values(once(phase))
            }
          })
          .collect();

  let terminal = match (topology, inputs.first()) {
    (Topology::Feedback, Some(first)) => first.clone(),
    (_, Some(_))                      => Channel::new(),
    (_, None)                         => Channel::from_values(once(seed)),
  };

  let machines: Vec<Machine> =
    inputs.iter()
          .enumerate()
          .map(|(k, input)| {
            let output = inputs.get(k + 1).unwrap_or(&terminal).clone();
            Machine::with_config(program, Some(input.clone()), Some(output), config)
              .labeled(stage_label(k))
          })
          .collect();

  // Nothing but the last machine feeds machine 0 in a feedback loop, and nothing at all does in
  // a chain once the seed is in.
  if topology == Topology::Chain {
    if let Some(first) = inputs.first() {
      first.close();
    }
  }

  debug!(machines = machines.len(), %topology, seed, "pipeline built");
  (machines, terminal)
}

/**
  Runs every machine on its own thread and waits for all of them to stop. Succeeds only if every
  machine halted; otherwise reports every fault, in machine order, rather than a result derived
  from a partially run pipeline.
*/
pub fn run_all(machines: Vec<Machine>) -> Result<(), PipelineFailure> {
  info!(machines = machines.len(), "starting pipeline");

  let mut handles = Vec::with_capacity(machines.len());
  let mut spawn_failure = None;

  for mut machine in machines {
    let label = machine.label().clone();
    let spawned =
      thread::Builder::new()
        .name(label.to_string())
        .spawn(move || machine.run());

    match spawned {
      Ok(handle) => handles.push((label, handle)),
      // The unspawned machine was dropped, closing its output, so its neighbors still terminate.
      Err(source) => {
        error!(machine = %label, %source, "could not spawn machine thread");
        if spawn_failure.is_none() {
          spawn_failure = Some(PipelineFailure::Spawn { label, source });
        }
      }
    }
  }

  let mut faults   = Vec::new();
  let mut panicked = None;

  for (label, handle) in handles {
    match handle.join() {

      Ok(Ok(())) => {
        debug!(machine = %label, "joined");
      }

      Ok(Err(fault)) => {
        error!(machine = %label, %fault, "machine faulted");
        faults.push(MachineFault { label, fault });
      }

      Err(_panic) => {
        error!(machine = %label, "machine thread panicked");
        if panicked.is_none() {
          panicked = Some(label);
        }
      }

    }
  }

  if let Some(failure) = spawn_failure {
    return Err(failure);
  }
  if let Some(label) = panicked {
    return Err(PipelineFailure::Panicked(label));
  }
  if !faults.is_empty() {
    return Err(PipelineFailure::Faulted(faults));
  }

  info!("pipeline halted");
  Ok(())
}

/**
  Builds and runs a pipeline, returning the final signal: the last value left on the terminal
  channel once every machine has halted.
*/
pub fn run_pipeline(
  program  : &[Value],
  phases   : &[Value],
  topology : Topology,
  seed     : Value,
  config   : Config
) -> Result<Value, PipelineFailure>
{
  if phases.is_empty() {
    return Err(PipelineFailure::Empty);
  }

  let (machines, terminal) = build_pipeline(program, phases, topology, seed, config);
  run_all(machines)?;

  terminal.drain()
          .last()
          .copied()
          .ok_or(PipelineFailure::NoSignal)
}

/**
  Tries every ordering of `phase_settings` as the phases of an independent pipeline and returns
  the ordering yielding the greatest final signal, along with that signal.

  Pipelines share nothing but the immutable program, so they run in parallel. Results are only
  reduced once every pipeline has finished; if any pipeline failed, the failure of the first
  failing ordering (in lexicographic order) is returned instead.
*/
pub fn max_signal(
  program        : &[Value],
  phase_settings : &[Value],
  topology       : Topology,
  seed           : Value,
  config         : Config
) -> Result<(Vec<Value>, Value), PipelineFailure>
{
  let orderings: Vec<Vec<Value>> = Permutations::new(phase_settings).collect();
  info!(orderings = orderings.len(), %topology, "searching phase orderings");

  let results: Vec<(Vec<Value>, Result<Value, PipelineFailure>)> =
    orderings.into_par_iter()
             .map(|phases| {
               let signal = run_pipeline(program, &phases, topology, seed, config);
               (phases, signal)
             })
             .collect();

  let mut best: Option<(Vec<Value>, Value)> = None;
  for (phases, signal) in results {
    let signal = signal?;
    let improves = match &best {
      Some((_, best_signal)) => signal > *best_signal,
      None                   => true
    };
    if improves {
      best = Some((phases, signal));
    }
  }

  best.ok_or(PipelineFailure::Empty)
}
