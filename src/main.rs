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
use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;

use ns_sweep::{experiments::*, util};
use sweep_utils::read_columns;

/// Run a single parameter sweep on the simulator.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Simulator script to execute.
    #[arg(short, long, value_enum, default_value_t = SimScript::SingleHop)]
    script: SimScript,
    /// Name of the CSV file written by the simulator, relative to its working directory.
    #[arg(short, long)]
    output: String,
    /// Working directory of the simulator.
    #[arg(long, default_value = "../ns/")]
    ns_dir: PathBuf,
    /// Simulator driver executable.
    #[arg(long, default_value = DEFAULT_DRIVER)]
    driver: String,
    /// Parameter applied to every invocation, e.g., `--fixed wait_time=1e-6`.
    #[arg(short, long = "fixed", value_parser = parse_assignment)]
    fixed: Vec<(Param, ParamValue)>,
    /// Parameter to sweep, e.g., `--sweep winsize=1,2,4,8`. Multiple sweeps are combined into
    /// their cartesian product.
    #[arg(short = 'w', long = "sweep", value_parser = parse_sweep)]
    sweep: Vec<(Param, Vec<ParamValue>)>,
    /// Only print the command lines without executing them.
    #[arg(long)]
    dry_run: bool,
}

fn parse_assignment(s: &str) -> Result<(Param, ParamValue), String> {
    let (param, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value`, got {s:?}"))?;
    let param = param
        .trim()
        .parse::<Param>()
        .map_err(|_| format!("unknown parameter {param:?}"))?;
    Ok((param, value.parse()?))
}

fn parse_sweep(s: &str) -> Result<(Param, Vec<ParamValue>), String> {
    let (param, values) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `name=v1,v2,...`, got {s:?}"))?;
    let param = param
        .trim()
        .parse::<Param>()
        .map_err(|_| format!("unknown parameter {param:?}"))?;
    let values = values
        .split(',')
        .map(str::parse::<ParamValue>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((param, values))
}

/// Combine all sweeps into one. Without any sweep, the simulator is executed exactly once.
fn build_sweep(sweeps: &[(Param, Vec<ParamValue>)]) -> Sweep {
    sweeps.iter().fold(
        Sweep::from(vec![ParameterSet::new()]),
        |acc, (param, values)| acc.product(&Sweep::over(*param, values.iter().copied())),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = util::init_logging();
    let args = Args::parse();

    let fixed: ParameterSet = args.fixed.iter().copied().collect();
    let sweep = build_sweep(&args.sweep);

    if args.dry_run {
        for params in sweep.iter() {
            println!(
                "{}",
                build_cmdline(&args.driver, args.script, &fixed.merged(params), &args.output)
            );
        }
        return Ok(());
    }

    let mut runner = Runner::new(&args.driver, &args.ns_dir).with_progress(multi);
    runner.run(args.script, &args.output, &fixed, &sweep)?;

    let table = read_columns(args.ns_dir.join(&args.output))?;
    log::info!(
        "{} rows with columns {}",
        table.num_rows(),
        table.names().join(", ")
    );

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_args() {
        let args = Args::parse_from([
            "main",
            "-o",
            "out.csv",
            "--fixed",
            "listen_time=1e-3",
            "--sweep",
            "winsize=1,2,3",
            "--sweep",
            "distance=25,50",
        ]);
        assert_eq!(args.fixed, vec![(Param::ListenTime, ParamValue::Float(1e-3))]);
        assert_eq!(args.sweep.len(), 2);

        let sweep = build_sweep(&args.sweep);
        assert_eq!(sweep.len(), 6);
        let last = sweep.iter().last().unwrap();
        assert_eq!(last.get(Param::Winsize), Some(ParamValue::Int(3)));
        assert_eq!(last.get(Param::Distance), Some(ParamValue::Int(50)));
    }

    #[test]
    fn no_sweep_runs_once() {
        assert_eq!(build_sweep(&[]).len(), 1);
    }

    #[test]
    fn invalid_assignments() {
        assert!(parse_assignment("winsize").is_err());
        assert!(parse_assignment("csv_output=1").is_err());
        assert!(parse_sweep("winsize=1,x").is_err());
    }
}
