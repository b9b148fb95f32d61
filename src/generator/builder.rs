use std::{marker::PhantomData, sync::Arc};

use super::{config::GenerationConfig, Generator, RngMode};

/// Default retry count for the generator
pub const DEFAULT_RETRY_COUNT: u32 = 50;

/// Internal type used to provide a type-safe builder with a required
/// [`GenerationConfig`] and grid size
pub enum Set {}
/// Internal type used to provide a type-safe builder with a required
/// [`GenerationConfig`] and grid size
pub enum Unset {}

/// Used to instantiate a new [`Generator`].
///
/// A [`GenerationConfig`] and a grid size are the two non-optional values
/// that are needed before being able to call `build`.
///
/// ### Example
///
/// Create a `Generator` from a `GeneratorBuilder`.
/// ```
/// use tilewave::generator::{
///     config::{ExactMatch, GenerationConfig},
///     tileset::{TileSetBuilder, TileTemplate},
///     Generator,
/// };
/// use tilewave::grid::topology::Topology;
///
/// let mut tiles = TileSetBuilder::new(Topology::Square);
/// tiles.add(TileTemplate::new(["A", "A", "A", "A"])).unwrap();
/// let config = GenerationConfig::new(tiles.build().unwrap(), ExactMatch);
///
/// let mut generator = Generator::builder()
///     .with_config(config)
///     .with_grid_size(10, 10)
///     .build();
/// ```
pub struct GeneratorBuilder<G, C> {
    config: Option<Arc<GenerationConfig>>,
    rows: usize,
    cols: usize,
    max_retry_count: u32,
    rng_mode: RngMode,
    typestate: PhantomData<(G, C)>,
}

impl GeneratorBuilder<Unset, Unset> {
    /// Creates a [`GeneratorBuilder`] with its values set to their default.
    pub fn new() -> Self {
        Self {
            config: None,
            rows: 0,
            cols: 0,
            max_retry_count: DEFAULT_RETRY_COUNT,
            rng_mode: RngMode::RandomSeed,
            typestate: PhantomData,
        }
    }
}

impl Default for GeneratorBuilder<Unset, Unset> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> GeneratorBuilder<G, Unset> {
    /// Sets the [`GenerationConfig`] to be used by the [`Generator`].
    pub fn with_config(self, config: GenerationConfig) -> GeneratorBuilder<G, Set> {
        self.with_shared_config(Arc::new(config))
    }

    /// Sets the [`GenerationConfig`] to be used by the [`Generator`]. The
    /// `Generator` will hold a read-only `Arc` onto the configuration, which
    /// can be safely shared by multiple generators.
    pub fn with_shared_config(self, config: Arc<GenerationConfig>) -> GeneratorBuilder<G, Set> {
        GeneratorBuilder {
            config: Some(config),

            rows: self.rows,
            cols: self.cols,
            max_retry_count: self.max_retry_count,
            rng_mode: self.rng_mode,

            typestate: PhantomData,
        }
    }
}

impl<C> GeneratorBuilder<Unset, C> {
    /// Sets the grid size, in cells, to be used by the [`Generator`].
    pub fn with_grid_size(self, rows: usize, cols: usize) -> GeneratorBuilder<Set, C> {
        GeneratorBuilder {
            rows,
            cols,

            config: self.config,
            max_retry_count: self.max_retry_count,
            rng_mode: self.rng_mode,

            typestate: PhantomData,
        }
    }
}

impl<G, C> GeneratorBuilder<G, C> {
    /// Specifies how many times [`Generator::generate`] should restart from
    /// scratch when a contradiction is encountered. Set to
    /// [`DEFAULT_RETRY_COUNT`] by default.
    pub fn with_max_retry_count(mut self, max_retry_count: u32) -> Self {
        self.max_retry_count = max_retry_count;
        self
    }

    /// Specifies the [`RngMode`] to be used by the [`Generator`]. Defaults to
    /// [`RngMode::RandomSeed`].
    pub fn with_rng(mut self, rng_mode: RngMode) -> Self {
        self.rng_mode = rng_mode;
        self
    }
}

impl GeneratorBuilder<Set, Set> {
    /// Instantiates a [`Generator`] as specified by the various builder
    /// parameters.
    pub fn build(self) -> Generator {
        // We know that self.config is `Some` thanks to the typing.
        let config = self.config.unwrap();
        Generator::new(
            config,
            self.rows,
            self.cols,
            self.max_retry_count,
            self.rng_mode,
        )
    }
}
