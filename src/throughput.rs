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
//! Analytical throughput model of a sliding-window link.
//!
//! The sender transmits a window of `w` packets back to back, each followed by an acknowledgment
//! and two listen (turnaround) periods, and then has to wait for one round trip before the next
//! window may start. All times are in seconds, sizes in bytes, and rates in bits per second.

use std::{fs, path::Path};

use itertools::izip;
use serde::{Deserialize, Serialize};

/// Speed of sound in water, in meters per second.
pub const SPEED_OF_SOUND: f64 = 1500.0;

/// Parameters of the physical link used by the throughput model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkParams {
    /// Bit rate after channel coding, in bit/s.
    pub coded_rate: f64,
    /// Payload of a data packet, in bytes.
    pub packet_size: f64,
    /// Payload of an acknowledgment, in bytes.
    pub ack_size: f64,
    /// Per-hop header overhead added to every packet and acknowledgment, in bytes.
    pub overhead: f64,
    /// Listen (turnaround) time, in seconds.
    pub listen_time: f64,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            coded_rate: 87_768.0,
            packet_size: 1000.0,
            ack_size: 16.0,
            overhead: 8.0,
            listen_time: 1e-6,
        }
    }
}

impl LinkParams {
    /// Read the parameters from a JSON file. Missing fields take their default value.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let serialized = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&serialized)?)
    }

    /// Time to transmit one data packet.
    pub fn packet_tx_time(&self) -> f64 {
        tx_time(self.packet_size, self.overhead, self.coded_rate)
    }

    /// Time to transmit one acknowledgment.
    pub fn ack_tx_time(&self) -> f64 {
        tx_time(self.ack_size, self.overhead, self.coded_rate)
    }

    /// Effective throughput in bit/s at the given distance (in meters) and window size.
    pub fn effective_throughput(&self, distance: f64, winsize: f64) -> f64 {
        let t_pkt = self.packet_tx_time();
        let t_ack = self.ack_tx_time();
        let t_prop = propagation_delay(distance);
        self.coded_rate * winsize * t_pkt
            / (2.0 * t_prop + winsize * (t_pkt + t_ack + 2.0 * self.listen_time))
    }

    /// Row-wise [`LinkParams::effective_throughput`]. The result is as long as the shorter input.
    pub fn effective_throughput_series(&self, distances: &[f64], winsizes: &[f64]) -> Vec<f64> {
        distances
            .iter()
            .zip(winsizes)
            .map(|(d, w)| self.effective_throughput(*d, *w))
            .collect()
    }
}

/// Time to transmit `payload + overhead` bytes at `coded_rate` bit/s.
pub fn tx_time(payload: f64, overhead: f64, coded_rate: f64) -> f64 {
    (payload + overhead) * 8.0 / coded_rate
}

/// One-way propagation delay over `distance` meters.
pub fn propagation_delay(distance: f64) -> f64 {
    distance / SPEED_OF_SOUND
}

/// Throughput that remains after packet and acknowledgment losses: the element-wise product of the
/// effective throughput with the measured data and ack delivery ratios. The result is as long as
/// the shortest input.
pub fn ideal_throughput(effective: &[f64], data_pdr: &[f64], ack_pdr: &[f64]) -> Vec<f64> {
    if effective.len() != data_pdr.len() || data_pdr.len() != ack_pdr.len() {
        log::warn!(
            "Ideal throughput from {} throughput, {} data PDR and {} ack PDR values",
            effective.len(),
            data_pdr.len(),
            ack_pdr.len()
        );
    }
    izip!(effective, data_pdr, ack_pdr)
        .map(|(thr, data, ack)| thr * data * ack)
        .collect()
}
