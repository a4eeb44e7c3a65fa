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
//! Sweeps over simulator parameters.

use itertools::iproduct;

use super::{Param, ParamValue, ParameterSet};

/// Ordered sequence of parameter sets. Each element is applied on top of the fixed parameters of
/// a run. The order only matters for labeling the resulting plots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep(Vec<ParameterSet>);

impl Sweep {
    /// Sweep a single parameter over `values`.
    pub fn over<V: Into<ParamValue>>(param: Param, values: impl IntoIterator<Item = V>) -> Self {
        values
            .into_iter()
            .map(|v| ParameterSet::new().with(param, v))
            .collect()
    }

    /// Cartesian product of two sweeps, where `other` varies fastest. On conflicting keys, the
    /// values of `other` win.
    pub fn product(&self, other: &Sweep) -> Self {
        iproduct!(self.0.iter(), other.0.iter())
            .map(|(a, b)| a.merged(b))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterSet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ParameterSet> for Sweep {
    fn from_iter<I: IntoIterator<Item = ParameterSet>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<ParameterSet>> for Sweep {
    fn from(sets: Vec<ParameterSet>) -> Self {
        Self(sets)
    }
}

impl<'a> IntoIterator for &'a Sweep {
    type Item = &'a ParameterSet;
    type IntoIter = std::slice::Iter<'a, ParameterSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A single series of an experiment: its fixed parameters, the file the simulator writes the
/// series to, and the label used in plot legends.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub label: String,
    pub output: String,
    pub params: ParameterSet,
}

impl Run {
    pub fn new(label: impl Into<String>, output: impl Into<String>, params: ParameterSet) -> Self {
        Self {
            label: label.into(),
            output: output.into(),
            params,
        }
    }
}
