use std::{collections::VecDeque, sync::Arc};

use bitvec::{bitvec, vec::BitVec};
use rand::{
    distributions::Distribution, distributions::WeightedIndex, rngs::StdRng, Rng, SeedableRng,
};

#[cfg(feature = "debug-traces")]
use tracing::{debug, info, trace};

use crate::{grid::Grid, GenerationError};

use self::{
    builder::{GeneratorBuilder, Unset},
    config::GenerationConfig,
    observer::GenerationUpdate,
    tile::TileIndex,
};

/// Defines a [`GeneratorBuilder`] used to create a generator
pub mod builder;
/// Defines the [`GenerationConfig`] consumed by a [`Generator`]
pub mod config;
/// Defines observers used to view the execution of a [`Generator`]
pub mod observer;
/// Defines [`crate::generator::tile::Tile`] and its symmetry operations
pub mod tile;
/// Defines the [`crate::generator::tileset::TileSetBuilder`] used to expand
/// tile templates into a tile set
pub mod tileset;

/// Different ways to seed the RNG of the generator.
///
/// Note: no matter the selected mode, on each reset the generator derives a
/// new `u64` seed from the previous one. Requesting a generation with any
/// seed of that chain gives the same final result; an earlier seed just
/// redoes the failed attempts first.
pub enum RngMode {
    /// The generator will use the given seed for its random source.
    Seeded(u64),
    /// The generator will use a random seed for its random source.
    ///
    /// The generated seed can still be retrieved by calling `seed` on the
    /// generator once created.
    RandomSeed,
}

/// Result of a successful collapse step.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum GenerationStatus {
    /// The generation has not ended yet.
    Ongoing,
    /// The generation ended succesfully. The whole grid is collapsed.
    Done,
}

/// Observable state of a generation run.
///
/// `NotStarted → Generating → {Done | Failed}`; the terminal states are only
/// left through an explicit [`Generator::reset`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum GenerationState {
    /// State right after a reset, before the first collapse step.
    NotStarted,
    /// At least one collapse step was performed and some cells remain.
    Generating,
    /// Every cell is collapsed.
    Done,
    /// A cell with an empty possibility set was selected for collapse.
    Failed {
        row: usize,
        col: usize,
    },
}

/// Wave function collapse generator over a [`Grid`] of tile possibility sets.
///
/// Use a [`GeneratorBuilder`] to get an instance of a [`Generator`].
///
/// Single-threaded and synchronous: each collapse step (selection, collapse,
/// propagation to a fixed point) completes before returning, and the engine
/// never schedules its own steps. Drive it from an external loop, one step
/// per frame or [`Generator::generate`] in one go.
pub struct Generator {
    // === Read-only configuration ===
    config: Arc<GenerationConfig>,
    max_retry_count: u32,

    // === Generation state ===
    grid: Grid,
    seed: u64,
    rng: StdRng,
    state: GenerationState,
    /// Observers signaled with updates of the cells.
    observers: Vec<crossbeam_channel::Sender<GenerationUpdate>>,

    // === Constraint propagation data ===
    /// FIFO worklist of cells whose possibility sets must be recomputed
    propagation_queue: VecDeque<(usize, usize)>,
    /// Guard flags to avoid enqueuing a cell twice, indexed `row * cols + col`
    queued: Vec<bool>,
}

impl Generator {
    /// Returns a new [`GeneratorBuilder`]
    pub fn builder() -> GeneratorBuilder<Unset, Unset> {
        GeneratorBuilder::new()
    }

    pub(crate) fn new(
        config: Arc<GenerationConfig>,
        rows: usize,
        cols: usize,
        max_retry_count: u32,
        rng_mode: RngMode,
    ) -> Self {
        let seed = match rng_mode {
            RngMode::Seeded(seed) => seed,
            RngMode::RandomSeed => rand::thread_rng().gen::<u64>(),
        };
        let grid = Grid::full_entropy(config.topology(), rows, cols, config.tiles().len());
        Self {
            config,
            max_retry_count,
            grid,
            rng: StdRng::seed_from_u64(seed),
            seed,
            state: GenerationState::NotStarted,
            observers: Vec::new(),
            propagation_queue: VecDeque::new(),
            queued: vec![false; rows * cols],
        }
    }

    /// Returns the seed that was used to initialize the generator RNG for
    /// this run. See [`RngMode`] for more information.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the [`Grid`] of this run.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the [`GenerationConfig`] used by the generator.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Returns the current [`GenerationState`].
    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Abandons the current run: re-creates the grid at full entropy, derives
    /// the next seed of the seed chain and goes back to
    /// [`GenerationState::NotStarted`].
    ///
    /// Observers receive [`GenerationUpdate::Cleared`], which stands for a
    /// full redraw with every cell uncertain.
    pub fn reset(&mut self) {
        self.seed = self.rng.gen::<u64>();
        self.rng = StdRng::seed_from_u64(self.seed);

        #[cfg(feature = "debug-traces")]
        info!(
            "Resetting generator with seed {}, state was {:?}",
            self.seed, self.state
        );

        self.grid = Grid::full_entropy(
            self.config.topology(),
            self.grid.rows(),
            self.grid.cols(),
            self.config.tiles().len(),
        );
        self.state = GenerationState::NotStarted;
        self.propagation_queue.clear();
        self.queued.fill(false);

        for observer in &mut self.observers {
            let _ = observer.send(GenerationUpdate::Cleared);
        }
    }

    /// Advances the generation by one step: selects the most constrained
    /// uncollapsed cell (uniform random among ties), collapses it to one of
    /// its possible tiles and propagates the constraint to a fixed point.
    /// Observers are signaled with every cell whose displayable state
    /// changed.
    ///
    /// Returns the [`GenerationStatus`] if the step executed successfully and
    /// [`GenerationError`] if the generation failed due to a contradiction.
    /// [`GenerationStatus::Done`] is reported by the step that finds no
    /// uncollapsed cell left, one step after the final collapse.
    /// In a terminal state this is a no-op reporting the terminal outcome;
    /// call [`Generator::reset`] to start over.
    pub fn collapse_step(&mut self) -> Result<GenerationStatus, GenerationError> {
        self.checked_step(true)
    }

    /// Same as [`Generator::collapse_step`] but with drawing suppressed: the
    /// same state mutations happen, but no per-cell update is sent to
    /// observers. Used to fast-forward a generation cheaply.
    pub fn collapse_step_silent(&mut self) -> Result<GenerationStatus, GenerationError> {
        self.checked_step(false)
    }

    /// Runs the generation to completion with drawing suppressed. If a run
    /// fails due to a contradiction, resets and retries up to the configured
    /// retry count before returning the last [`GenerationError`].
    ///
    /// Each retry restarts from scratch with the next seed of the seed chain;
    /// there is no backtracking. A generation already started step by step is
    /// simply continued; a generation in a terminal state is reset first.
    pub fn generate(&mut self) -> Result<(), GenerationError> {
        for _i in 1..self.max_retry_count {
            #[cfg(feature = "debug-traces")]
            info!("Try n°{}", _i);

            match self.run_to_completion() {
                Ok(()) => return Ok(()),
                Err(_) => self.reset(),
            }
        }
        #[cfg(feature = "debug-traces")]
        info!("Try n°{}", self.max_retry_count);
        self.run_to_completion()
    }

    /// Collapses the cell at `(row, col)` to `tile` and propagates, exactly
    /// like a normal step except that the cell and tile are chosen by the
    /// caller. Used to seed a generation with fixed tiles.
    ///
    /// Reports completion like [`Generator::collapse_step`] does: even if
    /// this collapses the last cell, the call returns
    /// [`GenerationStatus::Ongoing`] and the next step reports
    /// [`GenerationStatus::Done`].
    ///
    /// Choosing a tile that is not possible on the cell (or a cell already
    /// collapsed to another tile) is a contradiction and fails the run.
    ///
    /// Panics if `(row, col)` is outside the grid.
    pub fn collapse_cell(
        &mut self,
        row: usize,
        col: usize,
        tile: TileIndex,
    ) -> Result<GenerationStatus, GenerationError> {
        match self.state {
            GenerationState::Done => return Ok(GenerationStatus::Done),
            GenerationState::Failed { row, col } => return Err(GenerationError { row, col }),
            _ => (),
        }
        self.state = GenerationState::Generating;

        if !self.grid.cell(row, col).is_possible(tile) {
            return Err(self.fail_at(row, col));
        }
        self.grid.cell_mut(row, col).collapse_to(tile);
        self.signal_cell(true, row, col, Some(tile));
        self.propagate_from(row, col, true);

        Ok(GenerationStatus::Ongoing)
    }

    fn run_to_completion(&mut self) -> Result<(), GenerationError> {
        match self.state {
            GenerationState::Done | GenerationState::Failed { .. } => self.reset(),
            _ => (),
        }
        // Each step collapses exactly one cell, so the grid size bounds the
        // number of iterations. We avoid an unnecessary while loop.
        for _ in 0..=self.grid.total_size() {
            match self.step(false)? {
                GenerationStatus::Done => return Ok(()),
                GenerationStatus::Ongoing => (),
            }
        }
        Ok(())
    }

    fn checked_step(&mut self, signal: bool) -> Result<GenerationStatus, GenerationError> {
        match self.state {
            GenerationState::Done => Ok(GenerationStatus::Done),
            GenerationState::Failed { row, col } => Err(GenerationError { row, col }),
            _ => self.step(signal),
        }
    }

    fn step(&mut self, signal: bool) -> Result<GenerationStatus, GenerationError> {
        self.state = GenerationState::Generating;

        let (row, col) = match self.select_cell() {
            Some(position) => position,
            None => {
                self.state = GenerationState::Done;
                return Ok(GenerationStatus::Done);
            }
        };
        if self.grid.cell(row, col).possibility_count() == 0 {
            return Err(self.fail_at(row, col));
        }

        let tile = self.select_tile(row, col);

        #[cfg(feature = "debug-traces")]
        debug!("Selected tile {} for cell ({}, {})", tile, row, col);

        self.grid.cell_mut(row, col).collapse_to(tile);
        self.signal_cell(signal, row, col, Some(tile));
        self.propagate_from(row, col, signal);

        Ok(GenerationStatus::Ongoing)
    }

    /// Picks the uncollapsed cell with the minimum possibility count
    /// ("entropy"), uniformly at random among ties. Returns `None` when every
    /// cell is collapsed.
    fn select_cell(&mut self) -> Option<(usize, usize)> {
        let mut min = usize::MAX;
        let mut candidates = Vec::new();
        for (row, col) in self.grid.positions() {
            let cell = self.grid.cell(row, col);
            if cell.is_collapsed() {
                continue;
            }
            let count = cell.possibility_count();
            if count < min {
                min = count;
                candidates.clear();
            }
            if count == min {
                candidates.push((row, col));
            }
        }
        match candidates.is_empty() {
            true => None,
            false => Some(candidates[self.rng.gen_range(0..candidates.len())]),
        }
    }

    /// There is at least one possible tile for this cell. May panic otherwise.
    fn select_tile(&mut self, row: usize, col: usize) -> TileIndex {
        let possible: Vec<TileIndex> = self.grid.cell(row, col).possible_tiles().collect();
        match self.config.weighted_selection() {
            true => {
                let tiles = self.config.tiles();
                // Weights are clamped strictly positive at template build
                // time, so the distribution is always constructible.
                let weighted_distribution = WeightedIndex::new(
                    possible.iter().map(|&tile| tiles.tile(tile).weight()),
                )
                .unwrap();
                possible[weighted_distribution.sample(&mut self.rng)]
            }
            false => possible[self.rng.gen_range(0..possible.len())],
        }
    }

    /// Worklist propagation to a fixed point, breadth-first from the direct
    /// neighbours of `(row, col)`. Terminates because possibility sets only
    /// ever shrink.
    fn propagate_from(&mut self, row: usize, col: usize, signal: bool) {
        self.enqueue_neighbors(row, col);

        while let Some((row, col)) = self.propagation_queue.pop_front() {
            self.queued[row * self.grid.cols() + col] = false;
            if self.grid.cell(row, col).is_collapsed() {
                continue;
            }
            let recomputed = self.recompute_possibilities(row, col);
            if recomputed != *self.grid.cell(row, col).possible() {
                #[cfg(feature = "debug-traces")]
                trace!(
                    "Cell ({}, {}) shrunk to {} possible tile(s)",
                    row,
                    col,
                    recomputed.count_ones()
                );

                self.grid.cell_mut(row, col).set_possible(recomputed);
                self.signal_cell(signal, row, col, None);
                self.enqueue_neighbors(row, col);
            }
        }
    }

    fn enqueue_neighbors(&mut self, row: usize, col: usize) {
        for direction in self.grid.topology().directions() {
            if let Some((row, col)) = self.grid.neighbor(row, col, direction) {
                let index = row * self.grid.cols() + col;
                if !self.queued[index] {
                    self.queued[index] = true;
                    self.propagation_queue.push_back((row, col));
                }
            }
        }
    }

    /// Recomputes the possibility set of `(row, col)` from its neighbours: a
    /// tile survives if, for every direction with an in-grid neighbour, at
    /// least one token exposed by that neighbour (on its side facing back) is
    /// compatible with the tile's own socket in that direction. Borders
    /// impose no constraint.
    fn recompute_possibilities(&self, row: usize, col: usize) -> BitVec {
        let topology = self.grid.topology();
        let tiles = self.config.tiles();
        let mut surviving = self.grid.cell(row, col).possible().clone();
        let mut exposed: Vec<&str> = Vec::new();

        for direction in topology.directions() {
            let (neighbor_row, neighbor_col) = match self.grid.neighbor(row, col, direction) {
                Some(position) => position,
                None => continue,
            };
            let facing = topology.opposite(direction);
            exposed.clear();
            for tile in self.grid.cell(neighbor_row, neighbor_col).possible_tiles() {
                let token = tiles.tile(tile).socket(facing);
                if !exposed.contains(&token) {
                    exposed.push(token);
                }
            }

            let mut allowed = bitvec![0; tiles.len()];
            for candidate in surviving.iter_ones() {
                let socket = tiles.tile(candidate).socket(direction);
                // Predicate argument order is part of the contract: the
                // candidate's own socket first, the neighbour's token second.
                if exposed
                    .iter()
                    .any(|token| self.config.compatible(socket, token))
                {
                    allowed.set(candidate, true);
                }
            }
            surviving = allowed;
        }
        surviving
    }

    fn fail_at(&mut self, row: usize, col: usize) -> GenerationError {
        #[cfg(feature = "debug-traces")]
        debug!("Generation failed due to a contradiction at ({}, {})", row, col);

        self.state = GenerationState::Failed { row, col };
        for observer in &mut self.observers {
            let _ = observer.send(GenerationUpdate::Contradiction { row, col });
        }
        GenerationError { row, col }
    }

    fn signal_cell(&mut self, signal: bool, row: usize, col: usize, tile: Option<TileIndex>) {
        if !signal || self.observers.is_empty() {
            return;
        }
        let update = GenerationUpdate::CellChanged { row, col, tile };
        for observer in &mut self.observers {
            let _ = observer.send(update);
        }
    }

    pub(crate) fn add_observer_queue(
        &mut self,
    ) -> crossbeam_channel::Receiver<GenerationUpdate> {
        // Not bounded by the grid size since a run may be reset and retried.
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.observers.push(sender);
        receiver
    }
}
