use std::path::Path;

use hifitime::Epoch;
use thiserror::Error;

mod table;
pub use table::{TabularEphemerides, TabularLoader};

#[derive(Debug, Error)]
pub enum Error {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing \"{0}\" column")]
    MissingColumn(&'static str),
    #[error("invalid epoch \"{0}\"")]
    InvalidEpoch(String),
}

/// Read only access to decoded broadcast ephemerides, for one file.
pub trait EphemerisSource {
    /// All epochs, in chronological order
    fn epochs(&self) -> Vec<Epoch>;
    /// All satellites, in the order the source reports them
    fn satellites(&self) -> Vec<String>;
    /// Value of one named field, for this satellite at this epoch.
    /// None when not broadcast.
    fn field(&self, epoch: Epoch, sv: &str, name: &str) -> Option<f64>;
}

/// Opens files as [EphemerisSource]
pub trait EphemerisLoader {
    type Source: EphemerisSource;
    fn load(&self, path: &Path) -> Result<Self::Source, Error>;
}
