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
//! Explicit plot handle, such that every chart is built from its own state.

use std::{
    fs,
    path::{Path, PathBuf},
};

use plotly::{
    common::{Mode, Title},
    layout::{Axis, Layout},
    Plot, Scatter,
};

/// A single chart, written to an HTML file with [`Figure::save`].
pub struct Figure {
    title: String,
    x_label: Option<String>,
    y_label: Option<String>,
    plot: Plot,
    num_traces: usize,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: None,
            y_label: None,
            plot: Plot::new(),
            num_traces: 0,
        }
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn num_traces(&self) -> usize {
        self.num_traces
    }

    /// Add a line connecting the points `(xs[i], ys[i])`.
    pub fn add_line(&mut self, name: &str, xs: &[f64], ys: &[f64]) {
        self.add_scatter(name, xs, ys, Mode::LinesMarkers);
    }

    /// Add the points `(xs[i], ys[i])` without connecting them.
    pub fn add_markers(&mut self, name: &str, xs: &[f64], ys: &[f64]) {
        self.add_scatter(name, xs, ys, Mode::Markers);
    }

    fn add_scatter(&mut self, name: &str, xs: &[f64], ys: &[f64], mode: Mode) {
        if xs.len() != ys.len() {
            log::warn!(
                "Trace {name:?} of {:?} has {} x and {} y values",
                self.title,
                xs.len(),
                ys.len()
            );
        }
        let trace = Scatter::new(xs.to_vec(), ys.to_vec()).name(name).mode(mode);
        self.plot.add_trace(trace);
        self.num_traces += 1;
    }

    /// Write the figure to `<dir>/<file_stem>.html`, creating `dir` if needed.
    pub fn save(mut self, dir: impl AsRef<Path>, file_stem: &str) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut layout = Layout::new().title(Title::from(self.title.as_str()));
        if let Some(label) = self.x_label.as_deref() {
            layout = layout.x_axis(Axis::new().title(Title::from(label)));
        }
        if let Some(label) = self.y_label.as_deref() {
            layout = layout.y_axis(Axis::new().title(Title::from(label)));
        }
        self.plot.set_layout(layout);

        let output = dir.join(format!("{file_stem}.html"));
        log::info!("Plotting {output:?} ({} traces)", self.num_traces);
        self.plot.write_html(&output);
        Ok(output)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn figures_are_independent() {
        let mut a = Figure::new("a");
        let mut b = Figure::new("b").x_label("winsize");
        a.add_line("run 0", &[1.0, 2.0], &[10.0, 20.0]);
        a.add_line("run 1", &[1.0, 2.0], &[11.0, 21.0]);
        b.add_markers("measured", &[1.0], &[5.0]);

        assert_eq!(a.num_traces(), 2);
        assert_eq!(b.num_traces(), 1);
    }

    #[test]
    fn save_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut figure = Figure::new("Throughput")
            .x_label("winsize")
            .y_label("throughput [bit/s]");
        figure.add_line("run 0", &[1.0, 2.0, 3.0], &[100.0, 180.0, 240.0]);

        let path = figure.save(dir.path().join("plots"), "thr_win").unwrap();
        assert_eq!(path, dir.path().join("plots").join("thr_win.html"));
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("Throughput"));
    }
}
