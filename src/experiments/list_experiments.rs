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
//! The experiments whose results are plotted by the `plot` binary.

use itertools::{iproduct, Itertools};

use super::*;
use crate::throughput::LinkParams;

/// Values used for both the wait and the listen time in the window size experiment.
pub const WAIT_LISTEN_VALUES: [f64; 3] = [0.0, 1e-6, 1e-3];
/// Window sizes `1..=MAX_WINSIZE` are simulated in the window size experiment.
pub const MAX_WINSIZE: u32 = 50;
/// Window sizes compared in the distance experiment.
pub const DISTANCE_WINSIZES: [u32; 3] = [1, 4, 16];
/// Distances in meters simulated in the distance experiment.
pub const DISTANCES: [u32; 12] = [
    25, 50, 100, 250, 500, 750, 1_000, 1_500, 2_000, 3_000, 4_000, 5_000,
];

/// Describes a set of runs of the same simulator script that share a sweep.
#[derive(Debug, Clone)]
pub struct ExperimentDescription {
    pub name: &'static str,
    pub script: SimScript,
    pub runs: Vec<Run>,
    pub sweep: Sweep,
    /// Glob pattern matching every output file of the experiment.
    pub output_pattern: &'static str,
}

impl ExperimentDescription {
    /// Remove all previous outputs of this experiment and execute all runs.
    pub fn execute<L: Launcher>(&self, runner: &mut Runner<L>) -> Result<(), SweepError> {
        let removed = clean_outputs(runner.work_dir(), self.output_pattern)?;
        log::info!(
            "Running experiment {} ({} runs, removed {removed} old files)",
            self.name,
            self.runs.len()
        );
        runner.run_all(self.script, &self.runs, &self.sweep)
    }
}

/// Throughput over the window size, for every combination of wait and listen time.
pub fn window_size_experiment() -> ExperimentDescription {
    let runs = iproduct!(WAIT_LISTEN_VALUES, WAIT_LISTEN_VALUES)
        .enumerate()
        .map(|(run_num, (wait_time, listen_time))| {
            Run::new(
                format!("wait {wait_time:e}s, listen {listen_time:e}s"),
                format!("thr_win_{run_num}.csv"),
                ParameterSet::new()
                    .with(Param::WaitTime, wait_time)
                    .with(Param::ListenTime, listen_time),
            )
        })
        .collect_vec();

    ExperimentDescription {
        name: "window-size",
        script: SimScript::SingleHop,
        runs,
        sweep: Sweep::over(Param::Winsize, 1..=MAX_WINSIZE),
        output_pattern: "thr_win_*.csv",
    }
}

/// Throughput and delivery ratios over the distance, for a few window sizes. The simulated link
/// uses the same packet sizes and listen time as the analytical model in `link`.
pub fn distance_experiment(link: &LinkParams) -> ExperimentDescription {
    let runs = DISTANCE_WINSIZES
        .iter()
        .map(|winsize| {
            Run::new(
                format!("winsize {winsize}"),
                format!("thr_dist_w{winsize}.csv"),
                ParameterSet::new()
                    .with(Param::Winsize, *winsize)
                    .with(Param::ListenTime, link.listen_time)
                    .with(Param::PacketSize, link.packet_size.round() as i64)
                    .with(Param::AckSize, link.ack_size.round() as i64),
            )
        })
        .collect_vec();

    ExperimentDescription {
        name: "distance",
        script: SimScript::SingleHop,
        runs,
        sweep: Sweep::over(Param::Distance, DISTANCES),
        output_pattern: "thr_dist_w*.csv",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn window_size_runs() {
        let exp = window_size_experiment();
        assert_eq!(exp.runs.len(), 9);
        assert_eq!(exp.sweep.len(), 50);
        assert_eq!(exp.runs[0].output, "thr_win_0.csv");
        assert_eq!(exp.runs[8].output, "thr_win_8.csv");
        assert_eq!(
            exp.runs[5].params.get(Param::WaitTime),
            Some(ParamValue::Float(1e-6))
        );
        assert_eq!(
            exp.runs[5].params.get(Param::ListenTime),
            Some(ParamValue::Float(1e-3))
        );
    }

    #[test]
    fn distance_runs_are_valid_for_the_script() {
        let exp = distance_experiment(&LinkParams::default());
        for run in exp.runs.iter() {
            for params in exp.sweep.iter() {
                assert_eq!(exp.script.first_unrecognized(&run.params.merged(params)), None);
            }
        }
        assert_eq!(
            exp.runs[0].params.get(Param::PacketSize),
            Some(ParamValue::Int(1000))
        );
    }
}
