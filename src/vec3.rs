use crate::block_position::BlockPosition;
use crate::error::DecodeError;
use quartz_nbt::{NbtList, NbtTag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A continuous position or offset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    /// The lattice cell containing this point.
    pub fn floor(&self) -> BlockPosition {
        BlockPosition::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    pub fn min(self, other: Vec3) -> Self {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Vec3) -> Self {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn squared_distance(&self, other: Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn to_nbt(&self) -> NbtTag {
        NbtTag::List(NbtList::from(vec![
            NbtTag::Double(self.x),
            NbtTag::Double(self.y),
            NbtTag::Double(self.z),
        ]))
    }

    pub fn from_nbt(tag: &NbtTag) -> Result<Self, DecodeError> {
        let NbtTag::List(list) = tag else {
            return Err(DecodeError::Malformed(format!(
                "expected a list of three doubles, found {:?}",
                tag
            )));
        };
        let components = list
            .iter()
            .map(|tag| match tag {
                NbtTag::Double(d) => Ok(*d),
                NbtTag::Float(f) => Ok(*f as f64),
                NbtTag::Int(v) => Ok(*v as f64),
                other => Err(DecodeError::Malformed(format!(
                    "vector component is not numeric: {:?}",
                    other
                ))),
            })
            .collect::<Result<Vec<f64>, DecodeError>>()?;
        match components.as_slice() {
            [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
            _ => Err(DecodeError::Malformed(format!(
                "expected three vector components, found {}",
                components.len()
            ))),
        }
    }
}

impl From<BlockPosition> for Vec3 {
    fn from(pos: BlockPosition) -> Self {
        Vec3::new(pos.x as f64, pos.y as f64, pos.z as f64)
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Vec3::new(x, y, z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_negative() {
        assert_eq!(
            Vec3::new(-0.5, 1.999, -2.0).floor(),
            BlockPosition::new(-1, 1, -2)
        );
    }

    #[test]
    fn test_nbt_round_trip() {
        let v = Vec3::new(1.5, -2.25, 3.0);
        assert_eq!(Vec3::from_nbt(&v.to_nbt()).unwrap(), v);
        assert!(Vec3::from_nbt(&NbtTag::Int(3)).is_err());
    }
}
