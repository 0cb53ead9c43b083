//! Capture voxel volumes into palette-compressed blueprints, place them back with
//! progress reporting, and query the named regions they carry.

pub mod block_position;
pub mod block_state;
pub mod blueprint;
pub mod bounding_box;
pub mod capture;
pub mod editor;
pub mod error;
pub mod formats;
pub mod library;
pub mod markers;
pub mod nbt_value;
pub mod placed;
pub mod placement;
pub mod processor;
pub mod progress;
pub mod region;
pub mod vec3;
pub mod world;

pub use block_position::BlockPosition;
pub use block_state::BlockState;
pub use blueprint::{Blueprint, ExtraData, PalettedState};
pub use bounding_box::{BoundingBox, BoundsAccumulator};
pub use capture::capture;
pub use editor::{EditSession, EditorSessions, EDITOR_ROOT};
pub use error::{DecodeError, EncodeError, LibraryError, PlacementError};
pub use formats::FormatManager;
pub use library::{BlueprintLibrary, LibraryConfig};
pub use markers::{MarkerBlocks, RegionMarkers};
pub use nbt_value::{NbtMap, NbtValue};
pub use placed::PlacedBlueprint;
pub use placement::{flatten_futures, place, place_with_progress, PlacementHandle, ProgressiveFuture};
pub use processor::BlockStateProcessor;
pub use progress::{combine_progress, CombinedProgress, Complete, Progress, ProgressProvider};
pub use region::{CompoundRegion, CuboidRegion, PointRegion, Region, RegionShape, SphericalRegion};
pub use vec3::Vec3;
pub use world::{MemoryWorld, WorldReader, WorldWriter};
