use crate::block_position::BlockPosition;
use crate::blueprint::Blueprint;
use crate::error::PlacementError;
use crate::nbt_value::merge_into;
use crate::placed::PlacedBlueprint;
use crate::processor::BlockStateProcessor;
use crate::progress::{combine_progress, Progress, ProgressProvider};
use crate::world::WorldWriter;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::debug;

const WORKER_NAME: &str = "blueprint-placement";

/// Writes every cell of `blueprint` into `world` with its origin at `position`.
///
/// Placing the same blueprint at the same position again yields the same world state.
pub fn place<W>(
    blueprint: &Arc<Blueprint>,
    world: &mut W,
    position: BlockPosition,
    processor: Option<&dyn BlockStateProcessor>,
) -> PlacedBlueprint
where
    W: WorldWriter + ?Sized,
{
    let start = Instant::now();
    write_cells(blueprint, world, position, processor, |_| {});
    debug!(
        position = %position,
        cells = blueprint.total_blocks(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Placed blueprint"
    );
    PlacedBlueprint::new(Arc::clone(blueprint), position)
}

/// Core write loop. `on_cell` is told how many cells have been written so far.
fn write_cells<W, F>(
    blueprint: &Blueprint,
    world: &mut W,
    position: BlockPosition,
    processor: Option<&dyn BlockStateProcessor>,
    mut on_cell: F,
) where
    W: WorldWriter + ?Sized,
    F: FnMut(usize),
{
    for (written, cell) in blueprint.cells.iter().enumerate() {
        let Some(state) = blueprint.state_of(cell) else {
            continue;
        };
        let true_position = position + cell.offset;
        let true_state = match processor {
            Some(processor) => processor.process(state),
            None => state.clone(),
        };
        world.set_block(true_position, true_state);

        if let Some(extra) = blueprint.extra.get(&cell.offset) {
            if let Some(data) = world.block_data_mut(true_position) {
                merge_into(data, &extra.payload);
            }
        }

        on_cell(written + 1);
    }
}

/// Handle to a placement running on its own worker thread.
#[derive(Debug)]
pub struct PlacementHandle<T> {
    inner: JoinHandle<Result<T, PlacementError>>,
}

impl<T> PlacementHandle<T> {
    fn spawn<F>(work: F) -> Result<Self, PlacementError>
    where
        F: FnOnce() -> Result<T, PlacementError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(work)
            .map_err(PlacementError::Spawn)?;
        Ok(Self { inner })
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Blocks until the worker is done.
    pub fn wait(self) -> Result<T, PlacementError> {
        self.inner.join().map_err(|_| PlacementError::WorkerPanicked)?
    }
}

/// A running placement together with its live progress.
pub struct ProgressiveFuture<T> {
    pub handle: PlacementHandle<T>,
    pub progress: Arc<dyn ProgressProvider>,
}

impl<T> ProgressiveFuture<T> {
    pub fn progress(&self) -> f32 {
        self.progress.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn wait(self) -> Result<T, PlacementError> {
        self.handle.wait()
    }
}

impl<T> std::fmt::Debug for ProgressiveFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressiveFuture")
            .field("finished", &self.is_finished())
            .field("progress", &self.progress())
            .finish()
    }
}

/// Places `blueprint` on a worker thread, reporting `written / total` as it goes.
///
/// The target stays locked for the whole write loop, so two placements on one target
/// never interleave. A lock poisoned by an earlier panic is taken over as is; partial
/// writes are never rolled back. Progress reaches exactly `1.0` before the handle resolves.
pub fn place_with_progress<W>(
    blueprint: Arc<Blueprint>,
    target: Arc<Mutex<W>>,
    position: BlockPosition,
    processor: Option<Arc<dyn BlockStateProcessor>>,
) -> Result<ProgressiveFuture<PlacedBlueprint>, PlacementError>
where
    W: WorldWriter + Send + 'static,
{
    let progress = Arc::new(Progress::new());
    let worker_progress = Arc::clone(&progress);

    let handle = PlacementHandle::spawn(move || {
        let start = Instant::now();
        let total = blueprint.total_blocks();
        {
            let mut world = target.lock().unwrap_or_else(PoisonError::into_inner);
            write_cells(
                &blueprint,
                &mut *world,
                position,
                processor.as_deref(),
                |written| worker_progress.set_fraction(written, total),
            );
        }
        worker_progress.set(1.0);

        debug!(
            position = %position,
            cells = total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Placed blueprint in background"
        );
        Ok(PlacedBlueprint::new(blueprint, position))
    })?;

    Ok(ProgressiveFuture {
        handle,
        progress,
    })
}

/// One future over several placements; its progress is the average of theirs.
pub fn flatten_futures<T>(
    futures: Vec<ProgressiveFuture<T>>,
) -> Result<ProgressiveFuture<Vec<T>>, PlacementError>
where
    T: Send + 'static,
{
    let progress = Arc::new(combine_progress(
        futures.iter().map(|f| Arc::clone(&f.progress)).collect(),
    ));
    let handles: Vec<PlacementHandle<T>> = futures.into_iter().map(|f| f.handle).collect();

    let handle = PlacementHandle::spawn(move || {
        handles
            .into_iter()
            .map(PlacementHandle::wait)
            .collect::<Result<Vec<T>, PlacementError>>()
    })?;

    Ok(ProgressiveFuture { handle, progress })
}
