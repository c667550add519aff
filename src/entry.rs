//! Reference vector entries
use std::io::Write;

use hifitime::Epoch;
use itertools::Itertools;
use serde::{Serialize, Serializer};

use crate::{apriori::ReferencePosition, cfg::OutputFormat, record::ReadyRecord};

fn ordered_fields<S: Serializer>(
    fields: &[(&'static str, f64)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(fields.iter().map(|(name, value)| (name, value)))
}

/// One reference vector: a satellite position at one epoch,
/// with everything it was determined from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputEntry {
    /// Epoch, as reported by the navigation data
    pub epoch: Epoch,
    /// Propagation epoch, in the constellation time scale
    pub resolved: Epoch,
    /// Satellite, as reported by the navigation data
    pub sv: String,
    /// Week counter
    pub week: u32,
    /// Reference position, ECEF [m]
    pub ref_pos: (f64, f64, f64),
    /// Satellite position, ECEF [m]
    pub ecef: (f64, f64, f64),
    /// Elevation [°], not evaluated (always 0)
    pub elevation: f64,
    /// Azimuth [°], not evaluated (always 0)
    pub azimuth: f64,
    /// Broadcast orbit fields, in canonical order
    #[serde(serialize_with = "ordered_fields")]
    pub fields: Vec<(&'static str, f64)>,
}

impl OutputEntry {
    pub fn new(
        epoch: Epoch,
        resolved: Epoch,
        sv: &str,
        ready: &ReadyRecord,
        ref_pos: &ReferencePosition,
        ecef: (f64, f64, f64),
    ) -> Self {
        Self {
            epoch,
            resolved,
            sv: sv.to_string(),
            week: ready.week,
            ref_pos: ref_pos.ecef_tuple(),
            ecef,
            elevation: 0.0,
            azimuth: 0.0,
            fields: ready.record.ordered_fields(ready.constellation),
        }
    }
    /// Writes Self as a single line
    pub fn write<W: Write>(&self, writer: &mut W, format: OutputFormat) -> std::io::Result<()> {
        match format {
            OutputFormat::Text => writeln!(writer, "{}", self),
            OutputFormat::Json => {
                serde_json::to_writer(&mut *writer, self)?;
                writeln!(writer)
            },
        }
    }
}

impl std::fmt::Display for OutputEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (ref_x, ref_y, ref_z) = self.ref_pos;
        let (x, y, z) = self.ecef;
        write!(
            f,
            "epoch, {}, t_gnss, {}, ref_pos, ({}, {}, {}), sv, {}, week, {}, ecef, ({}, {}, {}), elev, {}, azim, {}",
            self.epoch, self.resolved, ref_x, ref_y, ref_z, self.sv, self.week, x, y, z,
            self.elevation, self.azimuth,
        )?;
        if !self.fields.is_empty() {
            write!(
                f,
                ", {}",
                self.fields
                    .iter()
                    .map(|(name, value)| format!("{}, {}", name, value))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}
