use tilewave::{
    generator::{
        config::GenerationConfig,
        tileset::{TileSetBuilder, TileTemplate},
        Generator,
    },
    grid::topology::Topology,
};

const WHITE: usize = 0;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tiles = TileSetBuilder::new(Topology::Square);
    tiles
        .add(TileTemplate::new(["W", "W", "W", "W"]))
        .unwrap()
        .add(TileTemplate::new(["B", "B", "B", "B"]))
        .unwrap();
    // A cell may only touch cells of the other color.
    let config = GenerationConfig::new(
        tiles.build().unwrap(),
        |candidate: &str, exposed: &str| candidate != exposed,
    );

    let mut generator = Generator::builder()
        .with_config(config)
        .with_grid_size(8, 8)
        .build();
    generator.generate().unwrap();

    let grid = generator.grid();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let tile = grid.get(row, col).unwrap().collapsed_tile().unwrap();
            print!("{}", if tile == WHITE { "□ " } else { "■ " });
        }
        println!();
    }
}
