//! Per (epoch, satellite) broadcast records and their readiness
use std::collections::HashMap;

use gnss::prelude::{Constellation, SV};
use hifitime::Epoch;
use thiserror::Error;

use crate::{
    constellation::{classify, satellite, week_field_name},
    ephemerides::EphemerisSource,
    kepler::{Field, Keplerian, Perturbations},
};

/// Reason a [KeplerRecord] is not usable.
/// Partial broadcast messages are common: this is not an error condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Incompleteness {
    #[error("{0} is NaN")]
    NotANumber(String),
    #[error("missing week counter ({0})")]
    MissingWeek(&'static str),
    #[error("invalid week counter {1} ({0})")]
    InvalidWeek(&'static str, f64),
    #[error("missing {0}")]
    MissingField(Field),
}

/// Week counters are whole, positive and 16 bit wide at most
fn valid_week(week: f64) -> bool {
    week.is_finite() && week >= 0.0 && week.fract() == 0.0 && week <= u16::MAX as f64
}

/// Named broadcast orbit values for one satellite at one epoch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeplerRecord {
    values: HashMap<String, f64>,
}

impl KeplerRecord {
    /// Builds an empty record
    pub fn new() -> Self {
        Self::default()
    }
    /// Copies and returns [KeplerRecord] with one more field
    pub fn with_field(&self, name: &str, value: f64) -> Self {
        let mut s = self.clone();
        s.values.insert(name.to_string(), value);
        s
    }
    /// Gathers the fields this [Constellation] requires from the
    /// [EphemerisSource]. Fields the source does not provide are left out.
    pub fn from_source<S: EphemerisSource + ?Sized>(
        source: &S,
        epoch: Epoch,
        sv: &str,
        constellation: Constellation,
    ) -> Self {
        let names = std::iter::once(week_field_name(constellation))
            .chain(Field::REQUIRED.iter().map(|field| field.name()));
        let values = names
            .filter_map(|name| {
                source
                    .field(epoch, sv, name)
                    .map(|value| (name.to_string(), value))
            })
            .collect();
        Self { values }
    }
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
    fn value(&self, field: Field) -> Option<f64> {
        self.get(field.name())
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Determines whether this record is complete for given [Constellation].
    /// Checks are run in this order: NaN values, week counter, other fields.
    pub fn readiness(&self, constellation: Constellation) -> Result<(), Incompleteness> {
        if let Some((name, _)) = self.values.iter().find(|(_, value)| value.is_nan()) {
            return Err(Incompleteness::NotANumber(name.clone()));
        }
        let week = week_field_name(constellation);
        match self.get(week) {
            None => return Err(Incompleteness::MissingWeek(week)),
            Some(value) if !valid_week(value) => {
                return Err(Incompleteness::InvalidWeek(week, value));
            },
            _ => {},
        }
        match Field::REQUIRED
            .iter()
            .find(|field| !self.values.contains_key(field.name()))
        {
            Some(field) => Err(Incompleteness::MissingField(*field)),
            None => Ok(()),
        }
    }
    /// True if record is numerically complete for this [Constellation]
    pub fn is_ready(&self, constellation: Constellation) -> bool {
        self.readiness(constellation).is_ok()
    }
    /// All fields in canonical order: week counter first.
    /// Only meaningful on ready records.
    pub(crate) fn ordered_fields(&self, constellation: Constellation) -> Vec<(&'static str, f64)> {
        std::iter::once(week_field_name(constellation))
            .chain(Field::REQUIRED.iter().map(|field| field.name()))
            .filter_map(|name| Some((name, self.get(name)?)))
            .collect()
    }
}

/// A complete record, ready to be propagated.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyRecord {
    pub sv: SV,
    pub constellation: Constellation,
    /// Week counter, in the constellation's own numbering
    pub week: u32,
    /// Time of ephemeris, as seconds within `week`
    pub toe: f64,
    /// Square root of the semi major axis, as broadcast
    pub sqrt_a: f64,
    pub keplerian: Keplerian,
    pub perturbations: Perturbations,
    pub record: KeplerRecord,
}

impl ReadyRecord {
    fn new(sv: SV, constellation: Constellation, record: KeplerRecord) -> Option<Self> {
        let week = record
            .get(week_field_name(constellation))
            .filter(|week| valid_week(*week))?;
        let sqrt_a = record.value(Field::SqrtA)?;
        Some(Self {
            sv,
            constellation,
            week: week as u32,
            toe: record.value(Field::Toe)?,
            sqrt_a,
            keplerian: Keplerian {
                a: sqrt_a.powi(2),
                e: record.value(Field::Eccentricity)?,
                i_0: record.value(Field::Io)?,
                omega_0: record.value(Field::Omega0)?,
                m_0: record.value(Field::M0)?,
                omega: record.value(Field::Omega)?,
            },
            perturbations: Perturbations {
                dn: record.value(Field::DeltaN)?,
                i_dot: record.value(Field::Idot)?,
                omega_dot: record.value(Field::OmegaDot)?,
                cus: record.value(Field::Cus)?,
                cuc: record.value(Field::Cuc)?,
                cis: record.value(Field::Cis)?,
                cic: record.value(Field::Cic)?,
                crs: record.value(Field::Crs)?,
                crc: record.value(Field::Crc)?,
            },
            record,
        })
    }
}

/// Outcome of classifying and validating one (epoch, satellite) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Qualification {
    /// Complete record of a supported constellation
    Ready(Box<ReadyRecord>),
    /// Supported constellation, but the record is partial
    Incomplete(Incompleteness),
    /// Constellation we do not process (or unreadable identifier)
    Unsupported,
}

/// Classifies `sv` then validates its record at `epoch`.
/// Unsupported satellites never reach validation.
pub fn qualify<S: EphemerisSource + ?Sized>(source: &S, epoch: Epoch, sv: &str) -> Qualification {
    let constellation = match classify(sv) {
        Some(constellation) => constellation,
        None => return Qualification::Unsupported,
    };
    let identity = match satellite(sv, constellation) {
        Some(identity) => identity,
        None => return Qualification::Unsupported,
    };
    let record = KeplerRecord::from_source(source, epoch, sv, constellation);
    qualify_record(identity, constellation, record)
}

/// Validates an already gathered record.
pub fn qualify_record(sv: SV, constellation: Constellation, record: KeplerRecord) -> Qualification {
    if let Err(reason) = record.readiness(constellation) {
        return Qualification::Incomplete(reason);
    }
    match ReadyRecord::new(sv, constellation, record) {
        Some(ready) => Qualification::Ready(Box::new(ready)),
        None => Qualification::Incomplete(Incompleteness::MissingWeek(week_field_name(
            constellation,
        ))),
    }
}
