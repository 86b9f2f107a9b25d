use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use galena_shared::grid::VoxelGrid;

fn main() {
    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: chunk_inspector <path/to/chunk.bin>");
        std::process::exit(2);
    };

    if let Err(err) = run(Path::new(&path)) {
        eprintln!("chunk_inspector error: {err}");
        std::process::exit(1);
    }
}

fn run(path: &Path) -> Result<(), String> {
    let payload = fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let grid: VoxelGrid = bincode::deserialize(&payload)
        .map_err(|err| format!("failed to decode {}: {err}", path.display()))?;

    let mut census: BTreeMap<u16, usize> = BTreeMap::new();
    for cell in grid.cells() {
        *census.entry(cell.0).or_insert(0) += 1;
    }

    println!("Chunk snapshot: {}", path.display());
    println!("Cells: {}", grid.cells().len());
    println!("Distinct block types: {}", census.len());

    for (block, count) in census {
        println!("  block {block:>5}  x{count}");
    }

    Ok(())
}
