// SPDX-License-Identifier: MIT

/// Trait implemented by each FS-specific Meta structure.
/// Provides access to static metadata needed during formatting, allocation, injection, or checking.
pub trait FsMeta<Unit: Ord + Copy> {
    /// Size of one allocation unit in bytes.
    fn unit_size(&self) -> usize;

    /// Compute the offset (in bytes) in the image corresponding to a given unit.
    fn unit_offset(&self, unit: Unit) -> u64;

    /// First unit of the data region.
    fn first_data_unit(&self) -> Unit;

    /// Last unit of the data region.
    fn last_data_unit(&self) -> Unit;

    /// Check if a given unit lies in the data region.
    fn is_valid_unit(&self, unit: Unit) -> bool {
        unit >= self.first_data_unit() && unit <= self.last_data_unit()
    }
}
