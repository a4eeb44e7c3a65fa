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
//! Parameters that are passed to the simulator as `--key=value` flags.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Parameter understood by (at least one of) the simulator scripts. The `Display` implementation
/// yields the flag name, i.e., `Param::WaitTime` is passed as `--wait_time=...`.
///
/// The flags `csv_output` and `csv_filename` are reserved for the runner and thus not part of this
/// enum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Param {
    /// Number of packets in flight before an acknowledgment is required.
    Winsize,
    /// Distance between sender and receiver, in meters.
    Distance,
    /// Time a node waits before transmitting, in seconds.
    WaitTime,
    /// Time a node listens for the channel (turnaround), in seconds.
    ListenTime,
    /// Payload size of a data packet, in bytes.
    PacketSize,
    /// Payload size of an acknowledgment, in bytes.
    AckSize,
    /// Number of hops between the source and the sink.
    NumHops,
    /// Seed of the simulator's random number generator.
    Seed,
}

/// Scalar value of a [`Param`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
}

impl ParamValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            ParamValue::Int(x) => *x as f64,
            ParamValue::Float(x) => *x,
        }
    }
}

impl fmt::Display for ParamValue {
    /// Floats are written in scientific notation (e.g., `1e-6`), which the simulator parses
    /// without loss of precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(x) => write!(f, "{x}"),
            ParamValue::Float(x) => write!(f, "{x:e}"),
        }
    }
}

impl FromStr for ParamValue {
    type Err = String;

    /// Values without a decimal point or exponent are parsed as integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(['.', 'e', 'E']) || s.starts_with(['i', 'I', 'n', 'N']) {
            s.parse::<f64>()
                .map(ParamValue::Float)
                .map_err(|e| format!("invalid number {s:?}: {e}"))
        } else {
            s.parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|e| format!("invalid integer {s:?}: {e}"))
        }
    }
}

impl From<i64> for ParamValue {
    fn from(x: i64) -> Self {
        ParamValue::Int(x)
    }
}

impl From<i32> for ParamValue {
    fn from(x: i32) -> Self {
        ParamValue::Int(x as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(x: u32) -> Self {
        ParamValue::Int(x as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(x: usize) -> Self {
        ParamValue::Int(x as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

/// One configuration of the simulator. Iteration order follows the declaration order of [`Param`],
/// such that generated command lines are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<Param, ParamValue>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`ParameterSet::set`].
    pub fn with(mut self, param: Param, value: impl Into<ParamValue>) -> Self {
        self.set(param, value);
        self
    }

    /// Set `param` to `value`, returning the old value if there was one.
    pub fn set(&mut self, param: Param, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(param, value.into())
    }

    pub fn get(&self, param: Param) -> Option<ParamValue> {
        self.0.get(&param).copied()
    }

    /// Return a copy of `self` with all values of `other` applied on top. Values of `other`
    /// override those of `self`.
    pub fn merged(&self, other: &ParameterSet) -> ParameterSet {
        let mut merged = self.clone();
        merged
            .0
            .extend(other.0.iter().map(|(param, value)| (*param, *value)));
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (Param, ParamValue)> + '_ {
        self.0.iter().map(|(param, value)| (*param, *value))
    }

    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Into<ParamValue>> FromIterator<(Param, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (Param, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(p, v)| (p, v.into())).collect())
    }
}

impl<V: Into<ParamValue>, const N: usize> From<[(Param, V); N]> for ParameterSet {
    fn from(params: [(Param, V); N]) -> Self {
        params.into_iter().collect()
    }
}
