/*!
  Addressable integer storage for a single machine. Code and data share the same store; the
  distinction between them is purely conventional.

  Two operating modes are selected at construction:

   1. `Fixed`: the store is exactly the loaded program. Any access at or past its length is a
      fault.
   2. `Extended`: the store is conceptually infinite above address zero. Cells past the end of
      the program live in a sparse map and read as zero until first written.

  Negative addresses cannot be represented by `Address` and so are rejected before they ever
  reach this module.
*/

use std::collections::BTreeMap;

use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

use crate::address::{Address, AddressNumberType, Value};
use crate::fault::Fault;

/// The most cells `snapshot` will materialize once extended memory has grown past the program.
pub const MAX_SNAPSHOT_CELLS: usize = 1 << 22;

#[derive(StrumDisplay, EnumString, IntoStaticStr, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum MemoryMode {
  Fixed,
  Extended
}

impl Default for MemoryMode {
  fn default() -> MemoryMode {
    MemoryMode::Extended
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Memory {
  mode     : MemoryMode,
  cells    : Vec<Value>,                           // The loaded program, dense
  overflow : BTreeMap<AddressNumberType, Value>,  // Extended mode cells past `cells`
}

impl Memory {

  /// Loads a copy of `program` at addresses `0..program.len()`.
  pub fn new(program: &[Value], mode: MemoryMode) -> Memory {
    Memory {
      mode,
      cells    : program.to_vec(),
      overflow : BTreeMap::new(),
    }
  }

  pub fn mode(&self) -> MemoryMode {
    self.mode
  }

  /// The length of the loaded program. Under fixed memory this is also the memory size.
  pub fn program_len(&self) -> usize {
    self.cells.len()
  }

  /// One past the highest address that holds a value, written or loaded.
  pub fn extent(&self) -> usize {
    match self.overflow.keys().next_back() {
      Some(last) => last.saturating_add(1),
      None       => self.cells.len()
    }
  }

  pub fn read(&self, address: Address) -> Result<Value, Fault> {
    let idx = address.idx();
    if let Some(value) = self.cells.get(idx) {
      return Ok(*value);
    }

    match self.mode {
      MemoryMode::Fixed    => Err(self.out_of_bounds(idx)),
      MemoryMode::Extended => Ok(self.overflow.get(&idx).copied().unwrap_or(0))
    }
  }

  pub fn write(&mut self, address: Address, value: Value) -> Result<(), Fault> {
    let idx = address.idx();
    if let Some(cell) = self.cells.get_mut(idx) {
      *cell = value;
      return Ok(());
    }

    match self.mode {
      MemoryMode::Fixed => Err(self.out_of_bounds(idx)),
      MemoryMode::Extended => {
        self.overflow.insert(idx, value);
        Ok(())
      }
    }
  }

  /// Every loaded or written cell in address order, skipping untouched extended cells.
  pub fn iter(&self) -> impl Iterator<Item = (AddressNumberType, Value)> + '_ {
    self.cells
        .iter()
        .copied()
        .enumerate()
        .chain(self.overflow.iter().map(|(idx, value)| (*idx, *value)))
  }

  /**
    The dense contents of memory from address zero up to `extent()`. A program can write anywhere
    in extended memory, so an image larger than both the program and `MAX_SNAPSHOT_CELLS` is
    refused with `SnapshotTooLarge`; `iter` still reaches every cell.
  */
  pub fn snapshot(&self) -> Result<Vec<Value>, Fault> {
    let extent = self.extent();
    if extent > self.cells.len() && extent > MAX_SNAPSHOT_CELLS {
      return Err(Fault::SnapshotTooLarge { extent, limit: MAX_SNAPSHOT_CELLS });
    }

    let mut snapshot = self.cells.clone();
    snapshot.resize(extent, 0);
    for (idx, value) in &self.overflow {
      snapshot[*idx] = *value;
    }
    Ok(snapshot)
  }

  fn out_of_bounds(&self, idx: AddressNumberType) -> Fault {
    Fault::OutOfBoundsAccess {
      address: idx,
      len: self.cells.len()
    }
  }
}
