//! Position assignment
//!
//! Positions depend only on the index in the new ordering, never on the
//! previous values, so assigning twice yields the same result.

use crate::error::{ReorderError, ReorderResult};
use serde::{Deserialize, Serialize};
use shared::models::FieldId;
use shared::request::PositionUpdate;

/// Smallest stride accepted by [`PositionPolicy::Sparse`]
pub const MIN_SPARSE_STRIDE: u32 = 100;

/// Stride used when sparse positions are requested without one
pub const DEFAULT_SPARSE_STRIDE: u32 = 1000;

/// Gap between neighbouring sparse positions, never below [`MIN_SPARSE_STRIDE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Stride(u32);

impl Stride {
    pub fn new(stride: u32) -> ReorderResult<Self> {
        if stride < MIN_SPARSE_STRIDE {
            return Err(ReorderError::InvalidStride(stride));
        }
        Ok(Self(stride))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self(DEFAULT_SPARSE_STRIDE)
    }
}

impl TryFrom<u32> for Stride {
    type Error = ReorderError;

    fn try_from(stride: u32) -> Result<Self, Self::Error> {
        Self::new(stride)
    }
}

impl From<Stride> for u32 {
    fn from(stride: Stride) -> Self {
        stride.0
    }
}

/// How positions are derived from indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionPolicy {
    /// `position = index`
    #[default]
    Dense,
    /// `position = index * stride`, leaves room between neighbours
    Sparse { stride: Stride },
}

impl PositionPolicy {
    /// Sparse policy with a validated stride
    pub fn sparse(stride: u32) -> ReorderResult<Self> {
        Ok(Self::Sparse {
            stride: Stride::new(stride)?,
        })
    }

    /// Position for the element at `index`
    pub fn position_at(&self, index: usize) -> ReorderResult<i32> {
        let overflow = || ReorderError::PositionOverflow { index };
        let index = i32::try_from(index).map_err(|_| overflow())?;
        match *self {
            Self::Dense => Ok(index),
            Self::Sparse { stride } => {
                let stride = i32::try_from(stride.get()).map_err(|_| overflow())?;
                index.checked_mul(stride).ok_or_else(overflow)
            }
        }
    }
}

/// Assign a position to every id in `order`, strictly ascending.
pub fn assign_positions(order: &[FieldId], policy: PositionPolicy) -> ReorderResult<Vec<PositionUpdate>> {
    order
        .iter()
        .enumerate()
        .map(|(index, id)| Ok(PositionUpdate::new(id.clone(), policy.position_at(index)?)))
        .collect()
}
