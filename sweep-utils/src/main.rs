use std::path::PathBuf;

use clap::Parser;
use itertools::{Itertools, MinMaxResult};

use sweep_utils::read_columns;

/// Print a summary of each column in the simulator's CSV output.
#[derive(Parser, Debug)]
#[command(author, version, about)] // get author/version information from Cargo.toml
struct Args {
    /// CSV files to inspect
    files: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args = Args::parse();

    for file in args.files {
        log::info!("Loading: {file:?}");
        let table = read_columns(&file)?;
        println!(
            "{} ({} columns, {} rows)",
            file.display(),
            table.num_columns(),
            table.num_rows()
        );
        for column in table.columns() {
            let (min, max) = match column.values.iter().minmax_by(|a, b| a.total_cmp(b)) {
                MinMaxResult::NoElements => {
                    println!("  {:>20}: -", column.name);
                    continue;
                }
                MinMaxResult::OneElement(x) => (*x, *x),
                MinMaxResult::MinMax(min, max) => (*min, *max),
            };
            let avg = column.values.iter().sum::<f64>() / column.values.len() as f64;
            println!(
                "  {:>20}: min {min:>12.6e}, avg {avg:>12.6e}, max {max:>12.6e}",
                column.name
            );
        }
    }

    Ok(())
}
