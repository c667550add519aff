#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod apriori;
mod cfg;
mod driver;
mod entry;
mod kepler;
mod orbit;
mod record;
mod time;

pub mod constellation;
pub mod ephemerides;

// pub export
pub use driver::Error;


// prelude
pub mod prelude {
    pub use crate::apriori::{KnownPosition, ReferencePosition, ReferencePositions};
    pub use crate::cfg::{Config, Error as ConfigError, OutputFormat};
    pub use crate::constellation::{classify, week_field_name};
    pub use crate::driver::{Driver, Report};
    pub use crate::entry::OutputEntry;
    pub use crate::ephemerides::{
        EphemerisLoader, EphemerisSource, Error as SourceError, TabularEphemerides,
        TabularLoader,
    };
    pub use crate::kepler::{Field, Keplerian, Perturbations};
    pub use crate::orbit::{
        Converter, Error as PropagationError, KeplerSolver, PropagationInput, Propagator,
    };
    pub use crate::record::{
        qualify, qualify_record, Incompleteness, KeplerRecord, Qualification, ReadyRecord,
    };
    pub use crate::time::{TimeOrigins, TimeResolver};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}
