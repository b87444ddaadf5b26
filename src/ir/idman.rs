use std::cell::Cell;

/// Type of `Value` identifier.
///
/// The IDs of `Value`s are unique, both operation results and block
/// arguments are numbered from the same counter.
pub(crate) type ValueId = u32;

/// The value of `ValueId` should start from 1,
/// because we want to use `NonZeroU32` to enable some
/// memory layout optimization.
const VALUE_ID_STARTS_FROM: ValueId = 1;

/// Type of `Operation` identifier.
pub(crate) type OperationId = u32;

/// The value of `OperationId` should start from 1.
const OPERATION_ID_STARTS_FROM: OperationId = 1;

/// Type of `Block` identifier.
pub(crate) type BlockId = u32;

/// The value of `BlockId` should start from 1.
const BLOCK_ID_STARTS_FROM: BlockId = 1;

/// Type of `Region` identifier.
pub(crate) type RegionId = u32;

/// The value of `RegionId` should start from 1.
const REGION_ID_STARTS_FROM: RegionId = 1;

thread_local! {
  /// The next value ID.
  static NEXT_VALUE_ID: Cell<ValueId> = Cell::new(VALUE_ID_STARTS_FROM);
  /// The next operation ID.
  static NEXT_OPERATION_ID: Cell<OperationId> = Cell::new(OPERATION_ID_STARTS_FROM);
  /// The next block ID.
  static NEXT_BLOCK_ID: Cell<BlockId> = Cell::new(BLOCK_ID_STARTS_FROM);
  /// The next region ID.
  static NEXT_REGION_ID: Cell<RegionId> = Cell::new(REGION_ID_STARTS_FROM);
}

/// Gets the next value ID.
pub(crate) fn next_value_id() -> ValueId {
  NEXT_VALUE_ID.with(|id| id.replace(id.get() + 1))
}

/// Gets the next operation ID.
pub(crate) fn next_op_id() -> OperationId {
  NEXT_OPERATION_ID.with(|id| id.replace(id.get() + 1))
}

/// Gets the next block ID.
pub(crate) fn next_block_id() -> BlockId {
  NEXT_BLOCK_ID.with(|id| id.replace(id.get() + 1))
}

/// Gets the next region ID.
pub(crate) fn next_region_id() -> RegionId {
  NEXT_REGION_ID.with(|id| id.replace(id.get() + 1))
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn ids_are_unique_and_increasing() {
    let a = next_value_id();
    let b = next_value_id();
    assert!(a >= VALUE_ID_STARTS_FROM);
    assert!(b > a);
    assert_ne!(next_op_id(), next_op_id());
    assert_ne!(next_block_id(), next_block_id());
    assert_ne!(next_region_id(), next_region_id());
  }
}
