use crate::error::DecodeError;
use quartz_nbt::NbtTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// An integer lattice position or offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub const ZERO: BlockPosition = BlockPosition { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPosition { x, y, z }
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        BlockPosition::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Component-wise minimum.
    pub fn min(self, other: BlockPosition) -> Self {
        BlockPosition::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    pub fn max(self, other: BlockPosition) -> Self {
        BlockPosition::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Integer half of each component, rounding toward zero.
    pub fn half(self) -> Self {
        BlockPosition::new(self.x / 2, self.y / 2, self.z / 2)
    }

    /// `"x, y, z"`, the form used when deriving marker identifiers.
    pub fn to_short_string(&self) -> String {
        format!("{}, {}, {}", self.x, self.y, self.z)
    }

    pub fn to_nbt(&self) -> NbtTag {
        NbtTag::IntArray(vec![self.x, self.y, self.z])
    }

    pub fn from_nbt(tag: &NbtTag) -> Result<Self, DecodeError> {
        match tag {
            NbtTag::IntArray(arr) if arr.len() == 3 => Ok(BlockPosition::new(arr[0], arr[1], arr[2])),
            NbtTag::List(list) => {
                let components: Vec<i32> = list
                    .iter()
                    .filter_map(|tag| match tag {
                        NbtTag::Int(v) => Some(*v),
                        _ => None,
                    })
                    .collect();
                match components.as_slice() {
                    [x, y, z] if list.len() == 3 => Ok(BlockPosition::new(*x, *y, *z)),
                    _ => Err(DecodeError::Malformed(format!(
                        "expected three integer components, found {:?}",
                        tag
                    ))),
                }
            }
            other => Err(DecodeError::Malformed(format!(
                "expected three integer components, found {:?}",
                other
            ))),
        }
    }
}

impl From<(i32, i32, i32)> for BlockPosition {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        BlockPosition::new(x, y, z)
    }
}

impl From<BlockPosition> for (i32, i32, i32) {
    fn from(pos: BlockPosition) -> Self {
        (pos.x, pos.y, pos.z)
    }
}

impl Add for BlockPosition {
    type Output = BlockPosition;

    fn add(self, rhs: BlockPosition) -> BlockPosition {
        BlockPosition::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for BlockPosition {
    type Output = BlockPosition;

    fn sub(self, rhs: BlockPosition) -> BlockPosition {
        BlockPosition::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for BlockPosition {
    type Output = BlockPosition;

    fn neg(self) -> BlockPosition {
        BlockPosition::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_nbt::NbtList;

    #[test]
    fn test_arithmetic() {
        let a = BlockPosition::new(1, 2, 3);
        let b = BlockPosition::new(-4, 5, 0);
        assert_eq!(a + b, BlockPosition::new(-3, 7, 3));
        assert_eq!(a - b, BlockPosition::new(5, -3, 3));
        assert_eq!(a.min(b), BlockPosition::new(-4, 2, 0));
        assert_eq!(a.max(b), BlockPosition::new(1, 5, 3));
        assert_eq!(BlockPosition::new(5, 3, -3).half(), BlockPosition::new(2, 1, -1));
    }

    #[test]
    fn test_nbt_accepts_int_list() {
        let list = NbtTag::List(NbtList::from(vec![
            NbtTag::Int(1),
            NbtTag::Int(-2),
            NbtTag::Int(3),
        ]));
        assert_eq!(
            BlockPosition::from_nbt(&list).unwrap(),
            BlockPosition::new(1, -2, 3)
        );
        assert!(BlockPosition::from_nbt(&NbtTag::IntArray(vec![1, 2])).is_err());
    }
}
