//! Memory cell values and the non-negative addresses that index them, with checked resolution
//! from raw (possibly negative, possibly offset) operand values.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::ops::Add;

use crate::fault::Fault;

/// The contents of a memory cell. Code and data share this type.
pub type Value = i64;

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

/// An index into a machine's memory. Construction through `resolve` guarantees it is not negative.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Address(AddressNumberType);

impl Address {
  pub fn new(idx: AddressNumberType) -> Address {
    Address(idx)
  }

  /// Converts the address to an index into the backing store.
  pub fn idx(&self) -> AddressNumberType {
    self.0
  }

  /**
    Resolves a raw value to an address. Negative values fault with `NegativeAddress`; values
    beyond the platform's `usize` (only possible on targets narrower than 64 bits) fault with
    `Unaddressable`.
  */
  pub fn resolve(raw: Value) -> Result<Address, Fault> {
    if raw < 0 {
      return Err(Fault::NegativeAddress(raw));
    }
    match AddressNumberType::try_from(raw) {
      Ok(idx) => Ok(Address(idx)),
      Err(_)  => Err(Fault::Unaddressable(raw))
    }
  }

  /**
    Resolves `base + offset` as used by relative addressing. A sum that does not fit in a `Value`
    is reported as an overflow at `at`, the address of the instruction being executed.
  */
  pub fn resolve_relative(base: Value, offset: Value, at: Address) -> Result<Address, Fault> {
    match base.checked_add(offset) {
      Some(raw) => Address::resolve(raw),
      None      => Err(Fault::Overflow{ address: at.idx() })
    }
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}]", self.0)
  }
}

// Increment an address
impl Add<AddressNumberType> for Address {
  type Output = Address;
  fn add(self, rhs: AddressNumberType) -> Address {
    Address(self.0 + rhs)
  }
}

impl From<Address> for Value {
  fn from(address: Address) -> Value {
    address.0 as Value
  }
}
