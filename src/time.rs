//! GNSS week resolution
use gnss::prelude::Constellation;
use hifitime::{Duration, Epoch, Unit, BDT_REF_EPOCH, GPST_REF_EPOCH, GST_REF_EPOCH};
use serde::{Deserialize, Serialize};

/// Origin of the week counter, per constellation.
/// Defaults to the GPS origin (1980-01-06) for every constellation,
/// which is how reference vectors have been produced so far.
/// QZSS always follows GPS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOrigins {
    /// GPS (and QZSS) week origin
    pub gps: Epoch,
    /// Galileo week origin
    pub galileo: Epoch,
    /// BeiDou week origin
    pub beidou: Epoch,
}

impl Default for TimeOrigins {
    fn default() -> Self {
        Self {
            gps: GPST_REF_EPOCH,
            galileo: GPST_REF_EPOCH,
            beidou: GPST_REF_EPOCH,
        }
    }
}

impl TimeOrigins {
    /// Origins as defined by each constellation's own time scale
    /// (GST 1999-08-22, BDT 2006-01-01).
    pub fn official() -> Self {
        Self {
            gps: GPST_REF_EPOCH,
            galileo: GST_REF_EPOCH,
            beidou: BDT_REF_EPOCH,
        }
    }
    /// Week origin for this [Constellation]
    pub fn origin(&self, constellation: Constellation) -> Epoch {
        match constellation {
            Constellation::Galileo => self.galileo,
            Constellation::BeiDou => self.beidou,
            _ => self.gps,
        }
    }
}

/// Resolves (week counter, offset within week) to absolute [Epoch]s
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeResolver {
    origins: TimeOrigins,
}

impl TimeResolver {
    pub fn new(origins: TimeOrigins) -> Self {
        Self { origins }
    }
    pub fn origins(&self) -> &TimeOrigins {
        &self.origins
    }
    fn weeks(week: u32) -> Duration {
        (week as f64) * 7.0 * Unit::Day
    }
    /// Start of this week + `offset`, in that constellation's numbering.
    pub fn resolve_epoch(&self, constellation: Constellation, week: u32, offset: Duration) -> Epoch {
        self.origins.origin(constellation) + Self::weeks(week) + offset
    }
    /// Time elapsed between the start of `week` and `t`.
    pub fn within_week_offset(&self, constellation: Constellation, week: u32, t: Epoch) -> Duration {
        t - self.origins.origin(constellation) - Self::weeks(week)
    }
    /// Generates Epoch of TOE, expressed as seconds within `week`
    pub fn toe(&self, constellation: Constellation, week: u32, toe_secs: f64) -> Epoch {
        self.resolve_epoch(constellation, week, toe_secs * Unit::Second)
    }
}
