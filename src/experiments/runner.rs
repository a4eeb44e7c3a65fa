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
//! Module that executes the simulator once for every element of a parameter sweep.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use itertools::Itertools;
use log::error;

use super::{Param, ParameterSet, Run, SimScript, Sweep};

/// Default name of the simulator driver.
pub const DEFAULT_DRIVER: &str = "ns";

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// The simulator exited with a non-zero status (or was killed by a signal).
    #[error("Simulation {index} exited with code {code:?}: {command}")]
    SimulationFailure {
        index: usize,
        command: String,
        code: Option<i32>,
    },
    #[error("Script {script} does not recognize the parameter {param}")]
    UnrecognizedParam { script: SimScript, param: Param },
    #[error("Cannot launch `{command}`: {source}")]
    Spawn { command: String, source: io::Error },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Program and arguments of a single simulator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args.iter() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Build the command line `<driver> <script> --key=value ... --csv_filename=<f> --csv_output=1`.
pub fn build_cmdline(
    driver: impl AsRef<str>,
    script: SimScript,
    params: &ParameterSet,
    output_filename: impl AsRef<str>,
) -> CommandLine {
    let args = std::iter::once(script.file_name().to_string())
        .chain(params.iter().map(|(param, value)| format!("--{param}={value}")))
        .chain([
            format!("--csv_filename={}", output_filename.as_ref()),
            "--csv_output=1".to_string(),
        ])
        .collect_vec();
    CommandLine {
        program: driver.as_ref().to_string(),
        args,
    }
}

/// Process boundary of the runner.
pub trait Launcher {
    /// Execute `cmd` inside `work_dir` and block until it exits. Returns the exit code, or `None`
    /// if the process was terminated by a signal.
    fn launch(&mut self, cmd: &CommandLine, work_dir: &Path) -> io::Result<Option<i32>>;
}

/// Launches the simulator as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, cmd: &CommandLine, work_dir: &Path) -> io::Result<Option<i32>> {
        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(work_dir)
            .output()?;

        if log::log_enabled!(log::Level::Debug) {
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                log::debug!("[{}] {line}", cmd.program);
            }
        }
        if !output.status.success() {
            for line in String::from_utf8_lossy(&output.stderr).lines() {
                error!("[{}] {line}", cmd.program);
            }
        }

        Ok(output.status.code())
    }
}

/// Executes parameter sweeps on the simulator, one invocation at a time.
pub struct Runner<L = ProcessLauncher> {
    driver: String,
    work_dir: PathBuf,
    launcher: L,
    progress: Option<MultiProgress>,
}

impl Runner<ProcessLauncher> {
    /// Create a runner that executes `driver` as a child process inside `work_dir`.
    pub fn new(driver: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self::with_launcher(driver, work_dir, ProcessLauncher)
    }
}

impl<L: Launcher> Runner<L> {
    pub fn with_launcher(
        driver: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        launcher: L,
    ) -> Self {
        Self {
            driver: driver.into(),
            work_dir: work_dir.into(),
            launcher,
            progress: None,
        }
    }

    /// Show a progress bar for each sweep on `multi`.
    pub fn with_progress(mut self, multi: MultiProgress) -> Self {
        self.progress = Some(multi);
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run the simulator `script` once for every element of `sweep`, each merged on top of
    /// `fixed`. The simulator writes its results to `output_filename` (relative to the working
    /// directory). An existing file at that path is removed before the first invocation.
    ///
    /// All parameters are validated against `script` before anything is deleted or launched. The
    /// sweep stops at the first failing invocation.
    pub fn run(
        &mut self,
        script: SimScript,
        output_filename: &str,
        fixed: &ParameterSet,
        sweep: &Sweep,
    ) -> Result<(), SweepError> {
        let invocations = sweep.iter().map(|params| fixed.merged(params)).collect_vec();
        for params in std::iter::once(fixed).chain(invocations.iter()) {
            if let Some(param) = script.first_unrecognized(params) {
                return Err(SweepError::UnrecognizedParam { script, param });
            }
        }

        let output_path = self.work_dir.join(output_filename);
        match fs::remove_file(&output_path) {
            Ok(()) => log::info!("Removed stale output {output_path:?}"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        log::info!(
            "Running {} simulations of {script} into {output_path:?}",
            invocations.len()
        );

        let bar = self.progress_bar(invocations.len(), output_filename);
        for (index, params) in invocations.iter().enumerate() {
            let cmd = build_cmdline(&self.driver, script, params, output_filename);
            log::debug!("{cmd}");
            let code = match self.launcher.launch(&cmd, &self.work_dir) {
                Ok(code) => code,
                Err(source) => {
                    bar.abandon();
                    return Err(SweepError::Spawn {
                        command: cmd.to_string(),
                        source,
                    });
                }
            };
            if code != Some(0) {
                bar.abandon();
                error!("Simulation {index} of {output_filename} failed: {cmd}");
                return Err(SweepError::SimulationFailure {
                    index,
                    command: cmd.to_string(),
                    code,
                });
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok(())
    }

    /// Execute `sweep` for each of the `runs`, every run writing to its own output file.
    pub fn run_all(
        &mut self,
        script: SimScript,
        runs: &[Run],
        sweep: &Sweep,
    ) -> Result<(), SweepError> {
        for run in runs {
            self.run(script, &run.output, &run.params, sweep)?;
        }
        Ok(())
    }

    fn progress_bar(&self, len: usize, name: &str) -> ProgressBar {
        let Some(multi) = self.progress.as_ref() else {
            return ProgressBar::hidden();
        };
        let style = ProgressStyle::with_template(
            "{msg:>16} [{bar:50}] {pos:>3}/{len:3}, elapsed: {elapsed}, eta: {eta}",
        )
        .map(|s| s.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = multi.add(ProgressBar::new(len as u64).with_style(style));
        bar.set_message(name.to_string());
        bar
    }
}

/// Remove all files in `work_dir` matching the glob `pattern`, e.g., `thr_win_*.csv`. Returns the
/// number of removed files.
pub fn clean_outputs(work_dir: impl AsRef<Path>, pattern: &str) -> Result<usize, SweepError> {
    let pattern = work_dir.as_ref().join(pattern);
    let mut removed = 0;
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry.map_err(io::Error::from)?;
        if path.is_file() {
            log::debug!("Removing {path:?}");
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::experiments::ParamValue;

    /// Records every invocation instead of launching a process.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<CommandLine>,
        fail_at: Option<usize>,
    }

    impl Launcher for Recorder {
        fn launch(&mut self, cmd: &CommandLine, _work_dir: &Path) -> io::Result<Option<i32>> {
            let index = self.calls.len();
            self.calls.push(cmd.clone());
            Ok(if self.fail_at == Some(index) {
                Some(1)
            } else {
                Some(0)
            })
        }
    }

    fn winsize_sweep(n: usize) -> Sweep {
        Sweep::over(Param::Winsize, 1..=n)
    }

    #[test]
    fn cmdline() {
        let params = ParameterSet::new()
            .with(Param::WaitTime, 0.0)
            .with(Param::ListenTime, 1e-6)
            .with(Param::Winsize, 3);
        let cmd = build_cmdline("ns", SimScript::SingleHop, &params, "thr_win_1.csv");
        assert_eq!(
            cmd.to_string(),
            "ns single_hop.tcl --winsize=3 --wait_time=0e0 --listen_time=1e-6 \
             --csv_filename=thr_win_1.csv --csv_output=1"
        );
    }

    #[test]
    fn one_invocation_per_element() {
        let dir = tempfile::tempdir().unwrap();
        let fixed = ParameterSet::new()
            .with(Param::Distance, 25)
            .with(Param::Winsize, 99);
        let mut runner = Runner::with_launcher("ns", dir.path(), Recorder::default());
        runner
            .run(SimScript::SingleHop, "out.csv", &fixed, &winsize_sweep(5))
            .unwrap();

        let calls = &runner.launcher().calls;
        assert_eq!(calls.len(), 5);
        for (i, call) in calls.iter().enumerate() {
            assert_eq!(call.program, "ns");
            assert_eq!(call.args[0], "single_hop.tcl");
            // the sweep overrides the fixed winsize
            assert!(call.args.contains(&format!("--winsize={}", i + 1)));
            assert!(!call.args.contains(&"--winsize=99".to_string()));
            assert!(call.args.contains(&"--distance=25".to_string()));
            assert!(call.args.contains(&"--csv_filename=out.csv".to_string()));
            assert!(call.args.contains(&"--csv_output=1".to_string()));
        }
    }

    #[test]
    fn failure_stops_the_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder {
            fail_at: Some(2),
            ..Default::default()
        };
        let mut runner = Runner::with_launcher("ns", dir.path(), recorder);
        let err = runner
            .run(
                SimScript::SingleHop,
                "out.csv",
                &ParameterSet::new(),
                &winsize_sweep(10),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            SweepError::SimulationFailure {
                index: 2,
                code: Some(1),
                ..
            }
        ));
        assert_eq!(runner.launcher().calls.len(), 3);
    }

    #[test]
    fn stale_output_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("out.csv");
        fs::write(&stale, "winsize,throughput\n1,1\n").unwrap();

        let mut runner = Runner::with_launcher("ns", dir.path(), Recorder::default());
        runner
            .run(
                SimScript::SingleHop,
                "out.csv",
                &ParameterSet::new(),
                &winsize_sweep(1),
            )
            .unwrap();

        assert_eq!(runner.launcher().calls.len(), 1);
        assert!(!stale.exists());
    }

    #[test]
    fn unrecognized_param_fails_before_any_side_effect() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("out.csv");
        fs::write(&stale, "a\n1\n").unwrap();

        let fixed = ParameterSet::new().with(Param::NumHops, 4);
        let mut runner = Runner::with_launcher("ns", dir.path(), Recorder::default());
        let err = runner
            .run(SimScript::SingleHop, "out.csv", &fixed, &winsize_sweep(3))
            .unwrap_err();

        assert!(matches!(
            err,
            SweepError::UnrecognizedParam {
                script: SimScript::SingleHop,
                param: Param::NumHops
            }
        ));
        assert!(runner.launcher().calls.is_empty());
        assert!(stale.exists());
    }

    #[test]
    fn run_all_writes_one_file_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let runs = (0..3)
            .map(|i| {
                Run::new(
                    format!("run {i}"),
                    format!("thr_win_{i}.csv"),
                    ParameterSet::new().with(Param::WaitTime, i as f64 * 1e-3),
                )
            })
            .collect_vec();
        let mut runner = Runner::with_launcher("ns", dir.path(), Recorder::default());
        runner
            .run_all(SimScript::SingleHop, &runs, &winsize_sweep(4))
            .unwrap();

        let calls = &runner.launcher().calls;
        assert_eq!(calls.len(), 12);
        assert!(calls[4].args.contains(&"--csv_filename=thr_win_1.csv".to_string()));
        assert!(calls[4].args.contains(&format!(
            "--wait_time={}",
            ParamValue::from(1e-3)
        )));
    }

    #[test]
    fn clean_outputs_matches_pattern() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["thr_win_0.csv", "thr_win_12.csv", "thr_dist_w1.csv"] {
            fs::write(dir.path().join(name), "a\n1\n").unwrap();
        }
        assert_eq!(clean_outputs(dir.path(), "thr_win_*.csv").unwrap(), 2);
        assert!(!dir.path().join("thr_win_0.csv").exists());
        assert!(dir.path().join("thr_dist_w1.csv").exists());
    }

    /// Shell script standing in for the simulator: appends `winsize,throughput` to the requested
    /// CSV file and fails for `winsize=3`.
    const STUB_SIMULATOR: &str = r#"
for arg in "$@"; do
    case "$arg" in
        --csv_filename=*) file="${arg#--csv_filename=}" ;;
        --winsize=*) w="${arg#--winsize=}" ;;
    esac
done
echo "simulating winsize $w"
if [ "$w" = "3" ]; then
    echo "winsize 3 is not supported" >&2
    exit 3
fi
if [ ! -f "$file" ]; then
    echo "winsize, throughput" > "$file"
fi
echo "$w,$((w * 100))" >> "$file"
"#;

    #[cfg(unix)]
    #[test]
    fn process_launcher_with_stub_simulator() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("single_hop.tcl"), STUB_SIMULATOR).unwrap();
        fs::write(dir.path().join("out.csv"), "stale,rows\n7,7\n7,7\n").unwrap();

        let mut runner = Runner::new("sh", dir.path());
        runner
            .run(
                SimScript::SingleHop,
                "out.csv",
                &ParameterSet::new(),
                &winsize_sweep(2),
            )
            .unwrap();

        let table = sweep_utils::read_columns(dir.path().join("out.csv")).unwrap();
        assert_eq!(table.column("winsize").unwrap(), &[1.0, 2.0]);
        assert_eq!(table.column("throughput").unwrap(), &[100.0, 200.0]);

        let err = runner
            .run(
                SimScript::SingleHop,
                "out.csv",
                &ParameterSet::new(),
                &winsize_sweep(5),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SweepError::SimulationFailure {
                index: 2,
                code: Some(3),
                ..
            }
        ));
        let table = sweep_utils::read_columns(dir.path().join("out.csv")).unwrap();
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn missing_driver() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = Runner::new("this-simulator-does-not-exist", dir.path());
        let err = runner
            .run(
                SimScript::SingleHop,
                "out.csv",
                &ParameterSet::new(),
                &winsize_sweep(2),
            )
            .unwrap_err();
        assert!(matches!(err, SweepError::Spawn { .. }));
    }
}
