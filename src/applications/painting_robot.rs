/*!
  The emergency hull painting robot. The robot's program runs on its own thread while this module
  plays the environment: it reports the colour of the panel under the robot, then receives the
  colour to paint that panel and the direction to turn, and moves the robot one panel forward.
  The exchange ends when the program halts and its output channel closes.

  ```text
             sensor: colour under robot
  ┌─────────┐ ─────────────────────────> ┌─────────┐
  │  hull   │                            │ machine │
  └─────────┘ <───────────────────────── └─────────┘
             actuator: (paint colour, turn)
  ```
*/

use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::thread;
use std::time::Duration;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display as StrumDisplay;
use tracing::{debug, info};

use crate::address::Value;
use crate::applications::ApplicationError;
use crate::channel::Channel;
use crate::config::Config;
use crate::fault::{ChannelError, Fault, PipelineFailure};
use crate::machine::Machine;

/// A panel coordinate; `y` grows upward.
pub type Position = (i64, i64);

#[derive(StrumDisplay, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, PartialEq, Debug, Hash)]
#[repr(i64)]
pub enum Colour {
  Black = 0,
  White = 1,
}

impl Default for Colour {
  fn default() -> Colour {
    Colour::Black
  }
}

#[derive(StrumDisplay, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, PartialEq, Debug, Hash)]
#[repr(i64)]
pub enum Turn {
  Left  = 0,
  Right = 1,
}

#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Heading {
  Up,
  Right,
  Down,
  Left,
}

impl Heading {
  pub fn turn(self, turn: Turn) -> Heading {
    match (self, turn) {
      (Heading::Up,    Turn::Left)  => Heading::Left,
      (Heading::Left,  Turn::Left)  => Heading::Down,
      (Heading::Down,  Turn::Left)  => Heading::Right,
      (Heading::Right, Turn::Left)  => Heading::Up,
      (Heading::Up,    Turn::Right) => Heading::Right,
      (Heading::Right, Turn::Right) => Heading::Down,
      (Heading::Down,  Turn::Right) => Heading::Left,
      (Heading::Left,  Turn::Right) => Heading::Up,
    }
  }

  fn step(self, (x, y): Position) -> Position {
    match self {
      Heading::Up    => (x, y + 1),
      Heading::Right => (x + 1, y),
      Heading::Down  => (x, y - 1),
      Heading::Left  => (x - 1, y),
    }
  }
}

/// The hull surface. Panels never seen are black.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hull {
  panels  : HashMap<Position, Colour>,
  painted : HashSet<Position>,        // Panels painted at least once, in any colour
}

impl Hull {
  pub fn new() -> Hull {
    Hull::default()
  }

  pub fn colour_at(&self, position: Position) -> Colour {
    self.panels.get(&position).copied().unwrap_or_default()
  }

  pub fn paint(&mut self, position: Position, colour: Colour) {
    self.panels.insert(position, colour);
    self.painted.insert(position);
  }

  /// The number of distinct panels painted at least once.
  pub fn painted(&self) -> usize {
    self.painted.len()
  }

  /**
    Renders the bounding box of every known panel, painted or the starting one, top row first,
    white as `█` and black as a space. Black panels on the edge therefore pad the picture. A hull
    with no known panels renders as the empty string.
  */
  pub fn render(&self) -> String {
    let known: Vec<Position> = self.panels.keys().copied().collect();

    let (min_x, max_x, min_y, max_y) = match bounds(&known) {
      Some(bounds) => bounds,
      None         => return String::new()
    };

    (min_y..=max_y).rev()
                   .map(|y| {
                     (min_x..=max_x).map(|x| match self.colour_at((x, y)) {
                                      Colour::White => '█',
                                      Colour::Black => ' ',
                                    })
                                    .collect::<String>()
                   })
                   .collect::<Vec<String>>()
                   .join("\n")
  }
}

impl Display for Hull {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.render())
  }
}

fn bounds(positions: &[Position]) -> Option<(i64, i64, i64, i64)> {
  let min_x = positions.iter().map(|p| p.0).min()?;
  let max_x = positions.iter().map(|p| p.0).max()?;
  let min_y = positions.iter().map(|p| p.1).min()?;
  let max_y = positions.iter().map(|p| p.1).max()?;
  Some((min_x, max_x, min_y, max_y))
}

struct Robot {
  hull     : Hull,
  position : Position,
  heading  : Heading,
}

impl Robot {
  fn new(start: Colour) -> Robot {
    let mut hull = Hull::new();
    // The starting panel is given its colour, not painted.
    hull.panels.insert((0, 0), start);
    Robot {
      hull,
      position : (0, 0),
      heading  : Heading::Up,
    }
  }

  /// Exchanges sensor readings for actuator commands until the program stops producing them.
  fn drive(&mut self, sensor: &Channel, actuator: &Channel, timeout: Option<Duration>)
    -> Result<(), ApplicationError>
  {
    loop {
      let reading = self.hull.colour_at(self.position);
      sensor.put(reading.into())
            .map_err(|error| Fault::from_channel(error, false))?;

      let colour = match actuator.get_timeout(timeout) {
        Ok(value)                 => value,
        Err(ChannelError::Closed) => return Ok(()),
        Err(error)                => return Err(Fault::from_channel(error, true).into()),
      };
      let turn = actuator.get_timeout(timeout)
                         .map_err(|error| Fault::from_channel(error, true))?;

      let colour = Colour::try_from(colour)
        .map_err(|_| ApplicationError::InvalidRobotOutput { what: "colour", value: colour })?;
      let turn = Turn::try_from(turn)
        .map_err(|_| ApplicationError::InvalidRobotOutput { what: "turn", value: turn })?;

      self.hull.paint(self.position, colour);
      self.heading  = self.heading.turn(turn);
      self.position = self.heading.step(self.position);
      debug!(%colour, %turn, x = self.position.0, y = self.position.1, "robot moved");
    }
  }
}

/// Runs the robot program over a black hull whose starting panel has colour `start`.
pub fn run_painting_robot(program: &[Value], start: Colour) -> Result<Hull, ApplicationError> {
  let config = Config::default();
  let mut machine = Machine::with_config(program, None, None, config).labeled("painting-robot");
  let sensor   = machine.input().clone();
  let actuator = machine.output().clone();
  let label    = machine.label().clone();

  let handle =
    thread::Builder::new()
      .name(label.to_string())
      .spawn(move || machine.run())
      .map_err(|source| PipelineFailure::Spawn { label, source })?;

  let mut robot = Robot::new(start);
  let driven = robot.drive(&sensor, &actuator, config.io_timeout);

  // A program still waiting on its sensor must not outlive the environment.
  sensor.close();
  let ran = handle.join().map_err(|_| ApplicationError::RobotPanicked)?;

  driven?;
  ran?;
  info!(painted = robot.hull.painted(), "robot finished");
  Ok(robot.hull)
}
