use ndarray::Array2;

use super::{tile::TileIndex, Generator};

/// Displayable-state change of a generation run, as consumed by a renderer.
///
/// This is the engine-side of a `draw_cell(row, col, tile | none)` interface:
/// a `CellChanged` update with `tile: None` means "not yet collapsed, render
/// as empty/uncertain".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationUpdate {
    /// The displayable state of a cell changed: it was collapsed to a tile,
    /// or its possibility set shrunk during propagation (`tile` is `None`).
    CellChanged {
        row: usize,
        col: usize,
        tile: Option<TileIndex>,
    },
    /// The generator was reset. Equivalent to one `CellChanged` with
    /// `tile: None` for every cell of the grid.
    Cleared,
    /// The generation failed due to a contradiction at `(row, col)`.
    Contradiction { row: usize, col: usize },
}

/// Observer of a [`Generator`] that simply queues all updates.
pub struct QueuedObserver {
    receiver: crossbeam_channel::Receiver<GenerationUpdate>,
}

impl QueuedObserver {
    pub fn new(generator: &mut Generator) -> Self {
        Self {
            receiver: generator.add_observer_queue(),
        }
    }

    /// Dequeues all queued updates.
    ///
    /// The returned `Vec` may be empty if no update was queued.
    pub fn dequeue_all(&mut self) -> Vec<GenerationUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.receiver.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// Dequeues 1 queued update.
    ///
    /// Returns `Some(GenerationUpdate)` if there was an update to process,
    /// else returns `None`.
    pub fn dequeue_one(&mut self) -> Option<GenerationUpdate> {
        self.receiver.try_recv().ok()
    }
}

/// Observer of a [`Generator`] that maintains a per-cell mirror of the
/// displayable state: the collapsed tile of each cell, or `None` while the
/// cell is uncertain.
///
/// Renderers poll it once per frame and redraw from `tiles()`.
pub struct StatefulObserver {
    tiles: Array2<Option<TileIndex>>,
    receiver: crossbeam_channel::Receiver<GenerationUpdate>,
}

impl StatefulObserver {
    pub fn new(generator: &mut Generator) -> Self {
        let receiver = generator.add_observer_queue();
        Self {
            tiles: Array2::from_elem((generator.grid().rows(), generator.grid().cols()), None),
            receiver,
        }
    }

    /// Returns the mirrored grid content.
    pub fn tiles(&self) -> &Array2<Option<TileIndex>> {
        &self.tiles
    }

    /// Returns the mirrored content of the cell at `(row, col)`.
    ///
    /// Panics if the position is outside the grid.
    pub fn tile_at(&self, row: usize, col: usize) -> Option<TileIndex> {
        self.tiles[(row, col)]
    }

    /// Updates the mirror by dequeuing all queued updates.
    pub fn dequeue_all(&mut self) {
        while let Ok(update) = self.receiver.try_recv() {
            self.apply(update);
        }
    }

    /// Updates the mirror by dequeuing 1 queued update.
    ///
    /// Returns `Some(GenerationUpdate)` if there was an update to process,
    /// else returns `None`.
    pub fn dequeue_one(&mut self) -> Option<GenerationUpdate> {
        match self.receiver.try_recv() {
            Ok(update) => {
                self.apply(update);
                Some(update)
            }
            Err(_) => None,
        }
    }

    fn apply(&mut self, update: GenerationUpdate) {
        match update {
            GenerationUpdate::CellChanged { row, col, tile } => self.tiles[(row, col)] = tile,
            GenerationUpdate::Cleared => self.tiles.fill(None),
            GenerationUpdate::Contradiction { .. } => self.tiles.fill(None),
        }
    }
}
