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
//! Simulator scripts and the parameters each of them recognizes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{Param, ParameterSet};

/// Tcl script executed by the simulator driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimScript {
    /// Sender and receiver at a configurable distance, connected by a single link.
    SingleHop,
    /// Chain of equally spaced relays between the sender and the receiver.
    MultiHop,
}

impl SimScript {
    /// File name of the script, relative to the simulator's working directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SimScript::SingleHop => "single_hop.tcl",
            SimScript::MultiHop => "multi_hop.tcl",
        }
    }

    /// Parameters that the script accepts on its command line.
    pub fn recognized_params(&self) -> &'static [Param] {
        match self {
            SimScript::SingleHop => &[
                Param::Winsize,
                Param::Distance,
                Param::WaitTime,
                Param::ListenTime,
                Param::PacketSize,
                Param::AckSize,
                Param::Seed,
            ],
            SimScript::MultiHop => &[
                Param::Winsize,
                Param::Distance,
                Param::WaitTime,
                Param::ListenTime,
                Param::NumHops,
                Param::Seed,
            ],
        }
    }

    pub fn recognizes(&self, param: Param) -> bool {
        self.recognized_params().contains(&param)
    }

    /// Return the first parameter of `params` that the script does not recognize.
    pub fn first_unrecognized(&self, params: &ParameterSet) -> Option<Param> {
        params.params().find(|p| !self.recognizes(*p))
    }
}

impl std::fmt::Display for SimScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}
