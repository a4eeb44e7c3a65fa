// ns-sweep: Parameter Sweeps and Throughput Plots for Network Simulator Experiments
// Copyright (C) 2024-2025 Roland Schmid <roschmi@ethz.ch> and Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
use std::{
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, ValueEnum};
use serde::Serialize;

use ns_sweep::{
    experiments::*,
    figure::Figure,
    throughput::{ideal_throughput, LinkParams},
    util::{self, PathBufExt},
};
use sweep_utils::read_columns;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Re-run the simulations before plotting (default).
    #[arg(long = "run", overrides_with = "no_run")]
    run: bool,
    /// Only plot the CSV files of a previous run.
    #[arg(long = "no-run", overrides_with = "run")]
    no_run: bool,
    /// Working directory of the simulator, where the CSV files are written.
    #[arg(long, default_value = "../ns/")]
    ns_dir: String,
    /// Simulator driver executable.
    #[arg(long, default_value = DEFAULT_DRIVER)]
    driver: String,
    /// Overwrite the output path for plots.
    #[arg(short, long, default_value = "./plots/")]
    output_path: String,
    /// Type of plot to generate.
    #[arg(short, long, value_enum, default_value_t = Plot::WindowSize)]
    plot_type: Plot,
    /// JSON file with the link parameters of the throughput model.
    #[arg(long)]
    link_params: Option<PathBuf>,
}

impl Args {
    fn run(&self) -> bool {
        self.run || !self.no_run
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Plot {
    /// Throughput over the window size for all combinations of wait and listen time.
    #[default]
    WindowSize,
    /// Measured, effective and ideal throughput over the distance for a few window sizes.
    Distance,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = util::init_logging();

    // parse plot parameters
    let args = Args::parse();
    let plot_dir = PathBuf::from(&args.output_path);

    // ensure that the simulator folder exists
    let ns_dir = PathBuf::from(&args.ns_dir);
    if !ns_dir.exists() {
        log::error!("Could not find the simulator directory {ns_dir:?}!");
        process::exit(1)
    }

    let link = match args.link_params.as_ref() {
        Some(path) => LinkParams::from_file(path)?,
        None => LinkParams::default(),
    };
    log::debug!("Link parameters: {link:?}");

    let experiment = match args.plot_type {
        Plot::WindowSize => window_size_experiment(),
        Plot::Distance => distance_experiment(&link),
    };

    if args.run() {
        let mut runner = Runner::new(&args.driver, &ns_dir).with_progress(multi);
        experiment.execute(&mut runner)?;
    }

    let output = match args.plot_type {
        Plot::WindowSize => plot_window_size(&ns_dir, &experiment, &plot_dir)?,
        Plot::Distance => plot_distance(&ns_dir, &experiment, &link, &plot_dir)?,
    };
    log::info!("Done: {output:?}");

    Ok(())
}

/// Plot the measured throughput over the window size, one line per run.
fn plot_window_size(
    ns_dir: &Path,
    experiment: &ExperimentDescription,
    plot_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut figure = Figure::new("Throughput vs. window size")
        .x_label("window size [packets]")
        .y_label("throughput [bit/s]");

    for run in experiment.runs.iter() {
        let path = ns_dir.then(&run.output);
        log::info!("Loading: {path:?}");
        let cols = read_columns(&path)?;
        figure.add_line(&run.label, cols.column("winsize")?, cols.column("throughput")?);
    }

    Ok(figure.save(plot_dir, "thr_win")?)
}

/// Plot the measured throughput over the distance next to the effective and ideal throughput of
/// the analytical model, as well as the delivery ratios of data packets and acknowledgments.
fn plot_distance(
    ns_dir: &Path,
    experiment: &ExperimentDescription,
    link: &LinkParams,
    plot_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut thr = Figure::new("Throughput vs. distance")
        .x_label("distance [m]")
        .y_label("throughput [bit/s]");
    let mut pdr = Figure::new("Packet delivery ratio vs. distance")
        .x_label("distance [m]")
        .y_label("PDR");

    for run in experiment.runs.iter() {
        let path = ns_dir.then(&run.output);
        log::info!("Loading: {path:?}");
        let cols = read_columns(&path)?;

        let distance = cols.column("distance")?;
        let winsize = cols.column("winsize")?;
        let data_pdr = cols.column("data_pdr")?;
        let ack_pdr = cols.column("ack_pdr")?;

        let effective = link.effective_throughput_series(distance, winsize);
        let ideal = ideal_throughput(&effective, data_pdr, ack_pdr);

        let label = &run.label;
        thr.add_markers(
            &format!("{label}: measured"),
            distance,
            cols.column("throughput")?,
        );
        thr.add_line(&format!("{label}: effective"), distance, &effective);
        thr.add_line(&format!("{label}: ideal"), distance, &ideal);

        pdr.add_line(&format!("{label}: data"), distance, data_pdr);
        pdr.add_line(&format!("{label}: ack"), distance, ack_pdr);
    }

    pdr.save(plot_dir, "pdr_dist")?;
    Ok(thr.save(plot_dir, "thr_dist")?)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn no_run_flag() {
        let args = Args::parse_from(["plot", "--no-run", "-p", "distance"]);
        assert!(!args.run());
        assert!(matches!(args.plot_type, Plot::Distance));

        let args = Args::parse_from(["plot"]);
        assert!(args.run());
        let args = Args::parse_from(["plot", "--no-run", "--run"]);
        assert!(args.run());
        assert_eq!(args.driver, "ns");
    }

    #[test]
    fn plot_existing_window_size_data() {
        let ns_dir = tempfile::tempdir().unwrap();
        let plot_dir = tempfile::tempdir().unwrap();
        let experiment = window_size_experiment();
        for run in experiment.runs.iter() {
            let mut data = String::from("winsize , throughput\n");
            for w in 1..=MAX_WINSIZE {
                data.push_str(&format!("{w},{}\n", 1000.0 * (w as f64).sqrt()));
            }
            fs::write(ns_dir.path().join(&run.output), data).unwrap();
        }

        let output = plot_window_size(ns_dir.path(), &experiment, plot_dir.path()).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn plot_existing_distance_data() {
        let ns_dir = tempfile::tempdir().unwrap();
        let plot_dir = tempfile::tempdir().unwrap();
        let link = LinkParams::default();
        let experiment = distance_experiment(&link);
        for (run, winsize) in experiment.runs.iter().zip(DISTANCE_WINSIZES) {
            let mut data = String::from("distance,winsize,throughput,data_pdr,ack_pdr\n");
            for d in DISTANCES {
                data.push_str(&format!("{d},{winsize},5e4,0.9,0.95\n"));
            }
            fs::write(ns_dir.path().join(&run.output), data).unwrap();
        }

        let output = plot_distance(ns_dir.path(), &experiment, &link, plot_dir.path()).unwrap();
        assert!(output.exists());
        assert!(plot_dir.path().join("pdr_dist.html").exists());
    }

    #[test]
    fn missing_csv_is_an_error() {
        let ns_dir = tempfile::tempdir().unwrap();
        let plot_dir = tempfile::tempdir().unwrap();
        assert!(plot_window_size(ns_dir.path(), &window_size_experiment(), plot_dir.path()).is_err());
    }
}
