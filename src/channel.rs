/*!
  A `Channel` is a blocking FIFO queue of values connecting a producer to a consumer. Machines
  read their input from one channel and write their output to another; wiring machines together
  is nothing more than handing the same channel to both ends.

  Channels are cheap to clone: clones are handles to the same queue. By construction each channel
  has a single producer and a single consumer, so the only synchronization required is the
  atomicity of the queue operations themselves.

  A channel can be closed by its producer to signal that no further values will arrive. Values
  already buffered can still be taken; once they run out, `get` fails with `ChannelError::Closed`
  instead of blocking forever. Machines close their output channel when they stop running.
*/

use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::address::Value;
use crate::fault::ChannelError;

#[derive(Default)]
struct Queue {
  values: VecDeque<Value>,
  closed: bool,
}

struct Shared {
  queue     : Mutex<Queue>,
  readable  : Condvar,        // Signalled on put and close
  writable  : Condvar,        // Signalled on get and close
  capacity  : Option<usize>,  // `None` is unbounded
}

#[derive(Clone)]
pub struct Channel {
  shared: Arc<Shared>
}

impl Channel {

  /// An empty, unbounded channel. `put` on an unbounded channel never blocks.
  pub fn new() -> Channel {
    Channel::with_capacity(None)
  }

  /**
    An empty channel holding at most `capacity` values; `put` blocks while it is full. There is no
    rendezvous mode, so a requested capacity of zero is raised to one.
  */
  pub fn bounded(capacity: usize) -> Channel {
    Channel::with_capacity(Some(capacity.max(1)))
  }

  /// An unbounded channel preloaded with `values`.
  pub fn from_values<I>(values: I) -> Channel
    where I: IntoIterator<Item = Value>
  {
    let channel = Channel::new();
    channel.shared.queue.lock().values.extend(values);
    channel
  }

  fn with_capacity(capacity: Option<usize>) -> Channel {
    Channel {
      shared: Arc::new(Shared {
        queue    : Mutex::new(Queue::default()),
        readable : Condvar::new(),
        writable : Condvar::new(),
        capacity,
      })
    }
  }

  pub fn capacity(&self) -> Option<usize> {
    self.shared.capacity
  }

  /// Enqueues `value`, blocking while a bounded channel is full.
  pub fn put(&self, value: Value) -> Result<(), ChannelError> {
    self.put_timeout(value, None)
  }

  /// As `put`, giving up after `timeout` if the channel stays full.
  pub fn put_timeout(&self, value: Value, timeout: Option<Duration>) -> Result<(), ChannelError> {
    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    let mut queue = self.shared.queue.lock();

    loop {
      if queue.closed {
        return Err(ChannelError::Closed);
      }
      if !self.is_full_locked(&queue) {
        break;
      }
      self.wait(&self.shared.writable, &mut queue, deadline, timeout)?;
    }

    queue.values.push_back(value);
    drop(queue);
    self.shared.readable.notify_one();
    Ok(())
  }

  /// Dequeues the oldest value, blocking until one is available or the channel is closed.
  pub fn get(&self) -> Result<Value, ChannelError> {
    self.get_timeout(None)
  }

  /// As `get`, giving up after `timeout` if no value arrives.
  pub fn get_timeout(&self, timeout: Option<Duration>) -> Result<Value, ChannelError> {
    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    let mut queue = self.shared.queue.lock();

    loop {
      if let Some(value) = queue.values.pop_front() {
        drop(queue);
        self.shared.writable.notify_one();
        return Ok(value);
      }
      if queue.closed {
        return Err(ChannelError::Closed);
      }
      self.wait(&self.shared.readable, &mut queue, deadline, timeout)?;
    }
  }

  /// Dequeues the oldest value if there is one, without blocking.
  pub fn try_get(&self) -> Option<Value> {
    let value = self.shared.queue.lock().values.pop_front();
    if value.is_some() {
      self.shared.writable.notify_one();
    }
    value
  }

  /// Takes every buffered value, oldest first, without blocking.
  pub fn drain(&self) -> Vec<Value> {
    let values: Vec<Value> = self.shared.queue.lock().values.drain(..).collect();
    self.shared.writable.notify_all();
    values
  }

  /**
    Marks the channel as finished. Buffered values remain readable. Blocked readers wake up and,
    once the buffer is empty, fail with `ChannelError::Closed`; writers fail immediately.
    Closing an already closed channel does nothing.
  */
  pub fn close(&self) {
    self.shared.queue.lock().closed = true;
    self.shared.readable.notify_all();
    self.shared.writable.notify_all();
  }

  pub fn is_closed(&self) -> bool {
    self.shared.queue.lock().closed
  }

  pub fn len(&self) -> usize {
    self.shared.queue.lock().values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Whether a `put` would block right now.
  pub fn is_full(&self) -> bool {
    self.is_full_locked(&self.shared.queue.lock())
  }

  /// Whether `self` and `other` are handles to the same queue.
  pub fn same_channel(&self, other: &Channel) -> bool {
    Arc::ptr_eq(&self.shared, &other.shared)
  }

  fn is_full_locked(&self, queue: &Queue) -> bool {
    match self.shared.capacity {
      Some(capacity) => queue.values.len() >= capacity,
      None           => false
    }
  }

  // Waits on `condvar` until notified, or until `deadline` if there is one.
  fn wait(
    &self,
    condvar  : &Condvar,
    queue    : &mut MutexGuard<'_, Queue>,
    deadline : Option<Instant>,
    timeout  : Option<Duration>
  ) -> Result<(), ChannelError> {
    match (deadline, timeout) {
      (Some(deadline), Some(timeout)) => {
        if condvar.wait_until(queue, deadline).timed_out() {
          // A final notification may have raced the deadline.
          let ready = !queue.values.is_empty() || queue.closed;
          if !ready && Instant::now() >= deadline {
            return Err(ChannelError::Timeout(timeout));
          }
        }
      }
      _ => condvar.wait(queue)
    }
    Ok(())
  }
}

impl Default for Channel {
  fn default() -> Channel {
    Channel::new()
  }
}

impl Debug for Channel {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let queue = self.shared.queue.lock();
    f.debug_struct("Channel")
     .field("values", &queue.values)
     .field("closed", &queue.closed)
     .field("capacity", &self.shared.capacity)
     .finish()
  }
}
