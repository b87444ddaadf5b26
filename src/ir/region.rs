//! Region related methods of [`DataFlowGraph`].

use crate::error::{EditError, IndexError, OwnershipError};
use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::{Block, Region, RegionData};
use crate::ir::idman::next_region_id;
use crate::ir::layout::Positional;

impl DataFlowGraph {
  /// Creates a new empty region. Returns the handle of the created region.
  pub fn new_region(&mut self) -> Region {
    let region = Region(next_region_id());
    self.regions.insert(region, RegionData::new());
    region
  }

  /// Creates a new region holding the given blocks, in order.
  ///
  /// Fails if any of the blocks is already owned by a region. The new
  /// region is removed again on failure.
  ///
  /// # Panics
  ///
  /// Panics if any of the given blocks does not exist.
  pub fn new_region_with_blocks<I: IntoIterator<Item = Block>>(
    &mut self,
    blocks: I,
  ) -> Result<Region, EditError> {
    let region = self.new_region();
    for block in blocks {
      if let Err(e) = self.push_block_back(region, block) {
        self.clear_region(region);
        self.regions.remove(&region);
        return Err(e);
      }
    }
    Ok(region)
  }

  /// Inserts the given block at position `index` of the region.
  ///
  /// Fails if the block is already owned by a region (including this
  /// one), if `index` is out of range, or if the region is nested inside
  /// the operations of the block.
  ///
  /// # Panics
  ///
  /// Panics if the given region or block does not exist.
  pub fn insert_block(
    &mut self,
    region: Region,
    index: usize,
    block: Block,
  ) -> Result<(), EditError> {
    if let Some(owner) = self.block(block).owner {
      return Err(EditError::Ownership(OwnershipError::BlockAlreadyOwned {
        block,
        owner,
      }));
    }
    let len = self.region(region).size();
    if index > len {
      return Err(
        IndexError {
          what: "region blocks",
          index,
          len,
        }
        .into(),
      );
    }
    if self.is_region_inside(region, block) {
      return Err(EditError::Ownership(OwnershipError::BlockCycle {
        block,
        region,
      }));
    }
    self.region_mut(region).blocks.insert_at(index, block);
    self.block_mut(block).owner = Some(region);
    Ok(())
  }

  /// Inserts the given block at the front of the region.
  ///
  /// # Panics
  ///
  /// Panics if the given region or block does not exist.
  pub fn push_block_front(&mut self, region: Region, block: Block) -> Result<(), EditError> {
    self.insert_block(region, 0, block)
  }

  /// Appends the given block to the end of the region.
  ///
  /// # Panics
  ///
  /// Panics if the given region or block does not exist.
  pub fn push_block_back(&mut self, region: Region, block: Block) -> Result<(), EditError> {
    let len = self.region(region).size();
    self.insert_block(region, len, block)
  }

  /// Removes the given block from the region. The block stays in the
  /// graph with no owner.
  ///
  /// # Panics
  ///
  /// Panics if the given region or block does not exist.
  pub fn remove_block(&mut self, region: Region, block: Block) -> Result<(), OwnershipError> {
    if self.block(block).owner != Some(region) {
      return Err(OwnershipError::BlockNotOwned { block, region });
    }
    self.region_mut(region).blocks.remove(&block);
    self.block_mut(block).owner = None;
    Ok(())
  }

  /// Removes all blocks from the region.
  ///
  /// # Panics
  ///
  /// Panics if the given region does not exist.
  pub fn clear_region(&mut self, region: Region) {
    let blocks: Vec<_> = self.region(region).blocks().keys().copied().collect();
    for block in blocks {
      self.region_mut(region).blocks.remove(&block);
      self.block_mut(block).owner = None;
    }
  }

  /// Returns `true` if the region is nested, at any depth, inside an
  /// operation of the given block.
  fn is_region_inside(&self, region: Region, block: Block) -> bool {
    let mut cur = region;
    loop {
      let parent = match self.region(cur).parent.and_then(|op| self.op(op).parent) {
        Some(parent) => parent,
        None => return false,
      };
      if parent == block {
        return true;
      }
      match self.block(parent).owner {
        Some(region) => cur = region,
        None => return false,
      }
    }
  }
}
