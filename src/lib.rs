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
//! Library for running parameter sweeps on a network simulator and plotting the resulting
//! throughput and packet delivery ratios.

pub mod experiments;
pub mod figure;
pub mod throughput;
pub mod util;

pub use sweep_utils::columns;

pub mod prelude {
    pub use super::{
        columns::{read_columns, ColumnError, ColumnTable},
        experiments::{
            build_cmdline, Param, ParamValue, ParameterSet, Run, Runner, SimScript, Sweep,
            SweepError,
        },
        figure::Figure,
        throughput::LinkParams,
    };
}
