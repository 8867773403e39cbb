use std::{ops::ControlFlow, path::Path};

use anyhow::{anyhow, Context};
use log::info;
use pathgrid::{util::parse_img, Board, GridMap, Point, Scenario};

const USAGE: &str = "usage: pathgrid <scenario.json | grid.txt | image.png> [start row,col] [end row,col]";

fn load_board(path: &Path) -> Result<Board, anyhow::Error> {
    let board = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Scenario::load(path)?.into_board()?,
        Some("txt") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Board::from_grid(text.parse::<GridMap>()?)
        }
        _ => {
            let img = image::open(path)
                .with_context(|| format!("Failed to open image {}", path.display()))?;
            Board::from_grid(parse_img(&img)?)
        }
    };
    Ok(board)
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or_else(|| anyhow!(USAGE))?;
    let mut board = load_board(Path::new(&path))?;

    if let Some(start) = args.next() {
        let start: Point = start.parse()?;
        if !board.set_start(start) {
            return Err(anyhow!("Cannot place start on {}", start));
        }
    }
    if let Some(end) = args.next() {
        let end: Point = end.parse()?;
        if !board.set_end(end) {
            return Err(anyhow!("Cannot place end on {}", end));
        }
    }

    info!(
        "loaded {}x{} grid from {}",
        board.grid().rows,
        board.grid().columns,
        path
    );

    let mut steps = 0;
    let outcome = board.run(|_| {
        steps += 1;
        ControlFlow::Continue(())
    });

    println!("{}", board.grid());

    match outcome {
        Ok(result) => println!("FOUND GOAL!: cost={} steps={}", result.total_cost, steps),
        Err(failure) => println!("{} (steps={})", failure, steps),
    }

    Ok(())
}
