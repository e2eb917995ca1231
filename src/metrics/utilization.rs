//! Per time step cluster utilization samples and sinks they are written to.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Mean utilization across all servers after a completed time step, in percents.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct UtilizationSample {
    #[serde(rename = "Time")]
    pub time_step: u64,
    #[serde(rename = "CPU Utilization")]
    pub cpu_utilization: f64,
    #[serde(rename = "Memory Utilization")]
    pub ram_utilization: f64,
}

/// Receives the ordered stream of utilization samples, one per time step.
pub trait UtilizationSink {
    fn record(&mut self, sample: &UtilizationSample) -> Result<(), SimulationError>;
}

impl UtilizationSink for Vec<UtilizationSample> {
    fn record(&mut self, sample: &UtilizationSample) -> Result<(), SimulationError> {
        self.push(*sample);
        Ok(())
    }
}

/// Writes samples as comma separated rows preceded by a header row.
pub struct CsvUtilizationSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvUtilizationSink<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvUtilizationSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn finish(&mut self) -> Result<(), SimulationError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, SimulationError> {
        self.writer
            .into_inner()
            .map_err(|err| SimulationError::Io(err.into_error()))
    }
}

impl<W: Write> UtilizationSink for CsvUtilizationSink<W> {
    fn record(&mut self, sample: &UtilizationSample) -> Result<(), SimulationError> {
        self.writer.serialize(sample)?;
        Ok(())
    }
}
