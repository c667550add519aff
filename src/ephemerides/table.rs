//! Decoded navigation data, as a (time, sv, fields...) CSV table
use std::{
    collections::{BTreeMap, HashMap},
    io::Read,
    path::Path,
    str::FromStr,
};

use hifitime::{Epoch, TimeScale};
use log::warn;

use super::{EphemerisLoader, EphemerisSource, Error};

const TIME_COLUMN: &str = "time";
const SV_COLUMN: &str = "sv";

/// Navigation data exported as one row per (time, sv) and one column per
/// broadcast field. Empty cells are fields that were not broadcast.
#[derive(Debug, Default, Clone)]
pub struct TabularEphemerides {
    fields: HashMap<String, usize>,
    satellites: Vec<String>,
    rows: BTreeMap<Epoch, HashMap<String, Vec<Option<f64>>>>,
}

/// Parses epochs, with GPST as default timescale
fn parse_epoch(content: &str) -> Result<Epoch, Error> {
    let content = content.trim();
    let normalized = match content.rsplit_once(' ') {
        Some((datetime, ts)) if TimeScale::from_str(ts).is_ok() => {
            format!("{} {}", datetime.trim().replace(' ', "T"), ts)
        },
        _ => format!("{} GPST", content.replace(' ', "T")),
    };
    Epoch::from_str(&normalized).map_err(|_| Error::InvalidEpoch(content.to_string()))
}

impl TabularEphemerides {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader)
    }
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }
    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, Error> {
        let headers = reader.headers()?.clone();
        let time_idx = headers
            .iter()
            .position(|h| h == TIME_COLUMN)
            .ok_or(Error::MissingColumn(TIME_COLUMN))?;
        let sv_idx = headers
            .iter()
            .position(|h| h == SV_COLUMN)
            .ok_or(Error::MissingColumn(SV_COLUMN))?;

        let columns = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != time_idx && *idx != sv_idx)
            .map(|(idx, name)| (idx, name.to_string()))
            .collect::<Vec<_>>();

        let mut s = Self {
            fields: columns
                .iter()
                .enumerate()
                .map(|(pos, (_, name))| (name.clone(), pos))
                .collect(),
            ..Default::default()
        };

        for record in reader.records() {
            let record = record?;
            let epoch = parse_epoch(record.get(time_idx).unwrap_or_default())?;
            let sv = record.get(sv_idx).unwrap_or_default().to_string();

            let values = columns
                .iter()
                .map(|(idx, name)| match record.get(*idx) {
                    None | Some("") => None,
                    Some(cell) => Some(f64::from_str(cell).unwrap_or_else(|_| {
                        warn!("{:?} ({}) - unreadable {} \"{}\"", epoch, sv, name, cell);
                        f64::NAN
                    })),
                })
                .collect::<Vec<_>>();

            if !s.satellites.contains(&sv) {
                s.satellites.push(sv.clone());
            }
            if s.rows.entry(epoch).or_default().insert(sv.clone(), values).is_some() {
                warn!("{:?} ({}) - duplicated entry", epoch, sv);
            }
        }
        Ok(s)
    }
}

impl EphemerisSource for TabularEphemerides {
    fn epochs(&self) -> Vec<Epoch> {
        self.rows.keys().copied().collect()
    }
    fn satellites(&self) -> Vec<String> {
        self.satellites.clone()
    }
    fn field(&self, epoch: Epoch, sv: &str, name: &str) -> Option<f64> {
        let pos = *self.fields.get(name)?;
        let values = self.rows.get(&epoch)?.get(sv)?;
        values.get(pos).copied().flatten()
    }
}

/// Loads [TabularEphemerides] from CSV files
#[derive(Debug, Default, Clone, Copy)]
pub struct TabularLoader {}

impl EphemerisLoader for TabularLoader {
    type Source = TabularEphemerides;
    fn load(&self, path: &Path) -> Result<TabularEphemerides, Error> {
        TabularEphemerides::from_path(path)
    }
}
