use std::{thread, time};

use tilewave::{
    generator::{
        config::{ExactMatch, GenerationConfig},
        observer::StatefulObserver,
        tileset::{TileSet, TileSetBuilder, TileTemplate},
        GenerationStatus, Generator,
    },
    grid::topology::Topology,
};

pub enum GenerationViewMode {
    StepByStep(u64),
    Final,
}

const GENERATION_VIEW_MODE: GenerationViewMode = GenerationViewMode::StepByStep(20);

/// Drawable glyphs per asset, indexed by rotation step.
const ASSETS: &[&[&str]] = &[
    &[" "],
    &["╋"],
    &["┃", "━"],
    &["┣", "┳", "┫", "┻"],
];

const EMPTY: usize = 0;
const CROSS: usize = 1;
const LINE: usize = 2;
const TEE: usize = 3;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Socket "1" is an open pipe end, "0" a closed side.
    let mut tiles = TileSetBuilder::new(Topology::Square);
    tiles
        .add(
            TileTemplate::new(["0", "0", "0", "0"])
                .with_weight(2.0)
                .with_visual(EMPTY),
        )
        .unwrap()
        .add(TileTemplate::new(["1", "1", "1", "1"]).with_visual(CROSS))
        .unwrap()
        .add(
            TileTemplate::new(["1", "0", "1", "0"])
                .with_weight(1.5)
                .with_rotations(2)
                .with_visual(LINE),
        )
        .unwrap()
        .add(
            TileTemplate::new(["1", "1", "1", "0"])
                .with_rotations(4)
                .with_visual(TEE),
        )
        .unwrap();
    let config = GenerationConfig::new(tiles.build().unwrap(), ExactMatch)
        .with_weighted_selection();

    let mut generator = Generator::builder()
        .with_config(config)
        .with_grid_size(12, 40)
        .with_max_retry_count(10)
        .build();
    let mut observer = StatefulObserver::new(&mut generator);

    match GENERATION_VIEW_MODE {
        GenerationViewMode::StepByStep(interval_ms) => loop {
            match generator.collapse_step() {
                Ok(status) => {
                    observer.dequeue_all();
                    draw_observer(&observer, generator.config().tiles());
                    if status == GenerationStatus::Done {
                        break;
                    }
                }
                Err(_) => {
                    println!("Contradiction, restarting from scratch");
                    generator.reset();
                    observer.dequeue_all();
                }
            }
            thread::sleep(time::Duration::from_millis(interval_ms));
        },
        GenerationViewMode::Final => {
            // generate() suppresses draw callbacks, read the grid directly.
            generator.generate().unwrap();
            let grid = generator.grid();
            draw(grid.rows(), grid.cols(), generator.config().tiles(), |row, col| {
                grid.get(row, col).unwrap().collapsed_tile()
            });
        }
    }
}

fn draw_observer(observer: &StatefulObserver, tiles: &TileSet) {
    let mirror = observer.tiles();
    draw(mirror.nrows(), mirror.ncols(), tiles, |row, col| {
        mirror[(row, col)]
    });
}

fn draw(
    rows: usize,
    cols: usize,
    tiles: &TileSet,
    tile_at: impl Fn(usize, usize) -> Option<usize>,
) {
    for row in 0..rows {
        for col in 0..cols {
            match tile_at(row, col) {
                Some(tile) => {
                    // Every template in this demo declares a visual.
                    let visual = tiles.tile(tile).visual().unwrap();
                    let glyphs = ASSETS[visual.asset_index];
                    print!("{}", glyphs[visual.rotation_steps as usize % glyphs.len()]);
                }
                None => print!("·"),
            }
        }
        println!();
    }
    println!();
}
