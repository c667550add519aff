//! Reference vectors generation
use std::{
    fs::File,
    io::{BufWriter, Write},
    ops::AddAssign,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::{
    apriori::ReferencePosition,
    cfg::{Config, OutputFormat},
    constellation::timescale,
    entry::OutputEntry,
    ephemerides::{self, EphemerisLoader, EphemerisSource, TabularLoader},
    orbit::{Converter, KeplerSolver, Propagator},
    record::{qualify, Qualification},
    time::TimeResolver,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o failure: {0}")]
    IOFailure(#[from] std::io::Error),
    #[error("ephemeris source: {0}")]
    Source(#[from] ephemerides::Error),
    #[error("navigation directory \"{0}\" does not exist")]
    MissingNavDirectory(PathBuf),
}

/// Generation statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Navigation files fully processed
    pub files: usize,
    /// Navigation files we had to abort
    pub failed_files: usize,
    /// Reference vectors written
    pub entries: usize,
    /// (epoch, sv) pairs of unsupported constellations
    pub unsupported: usize,
    /// (epoch, sv) pairs with partial records
    pub incomplete: usize,
    /// (epoch, sv) pairs we failed to propagate
    pub computation_failures: usize,
}

impl AddAssign for Report {
    fn add_assign(&mut self, rhs: Self) {
        self.files += rhs.files;
        self.failed_files += rhs.failed_files;
        self.entries += rhs.entries;
        self.unsupported += rhs.unsupported;
        self.incomplete += rhs.incomplete;
        self.computation_failures += rhs.computation_failures;
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} file(s) ({} aborted), {} entries, skipped: {} unsupported, {} incomplete, {} failures",
            self.files,
            self.failed_files,
            self.entries,
            self.unsupported,
            self.incomplete,
            self.computation_failures
        )
    }
}

/// Walks a test data folder and generates one reference vectors file
/// per navigation file.
pub struct Driver<L: EphemerisLoader, P: Propagator> {
    cfg: Config,
    loader: L,
    converter: Converter<P>,
}

impl Driver<TabularLoader, KeplerSolver> {
    /// Builds a [Driver] that reads CSV navigation tables and
    /// uses the [KeplerSolver] set up in [Config].
    pub fn new(cfg: Config) -> Self {
        let solver = cfg.kepler;
        Self::with_parts(cfg, TabularLoader::default(), solver)
    }
}

impl<L: EphemerisLoader, P: Propagator> Driver<L, P> {
    /// Builds a [Driver] from custom [EphemerisLoader] and [Propagator]
    pub fn with_parts(cfg: Config, loader: L, propagator: P) -> Self {
        let resolver = TimeResolver::new(cfg.time_origins);
        Self {
            loader,
            converter: Converter::new(resolver, propagator),
            cfg,
        }
    }
    pub fn config(&self) -> &Config {
        &self.cfg
    }
    /// Processes all supported revisions of `base`.
    /// Only a missing (or unreadable) navigation folder is fatal:
    /// files we fail to process are reported and skipped.
    pub fn run(&self, base: &Path) -> Result<Report, Error> {
        let nav = base.join(&self.cfg.nav_directory);
        if !nav.is_dir() {
            return Err(Error::MissingNavDirectory(nav));
        }

        let mut report = Report::default();

        for revision in WalkDir::new(&nav)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let revision = revision.map_err(std::io::Error::from)?;
            if !revision.file_type().is_dir() {
                continue;
            }
            let name = revision.file_name().to_string_lossy().to_string();
            if !self.cfg.supported_revision(&name) {
                debug!("{} - unsupported revision", name);
                continue;
            }

            for file in WalkDir::new(revision.path())
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
            {
                let file = match file {
                    Ok(file) => file,
                    Err(e) => {
                        error!("{} - {}", name, e);
                        continue;
                    },
                };
                if !file.file_type().is_file() {
                    continue;
                }
                match self.process_file(base, &name, file.path()) {
                    Ok(file_report) => {
                        report += file_report;
                        report.files += 1;
                    },
                    Err(e) => {
                        error!("{} - aborted: {}", file.path().display(), e);
                        report.failed_files += 1;
                    },
                }
            }
        }

        info!("{}", report);
        Ok(report)
    }
    /// Location of the reference vectors generated for this file
    pub fn output_path(&self, base: &Path, revision: &str, filename: &str) -> PathBuf {
        let extension = match self.cfg.output_format {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        };
        base.join(&self.cfg.output_directory)
            .join(revision)
            .join(format!("{}.{}", filename, extension))
    }
    /// Generates reference vectors for one navigation file.
    /// The output stream only lives for the duration of this call.
    pub fn process_file(&self, base: &Path, revision: &str, path: &Path) -> Result<Report, Error> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let source = self.loader.load(path)?;
        let ref_pos = self.cfg.reference_positions.lookup(&filename);

        let output = self.output_path(base, revision, &filename);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&output)?);
        let report = self.process_source(&source, &ref_pos, &mut writer)?;
        writer.flush()?;

        info!("{} - {} entries ({})", filename, report.entries, output.display());
        Ok(report)
    }
    /// Generates reference vectors for all (epoch, sv) pairs of this
    /// [EphemerisSource], in (epoch, sv) enumeration order.
    pub fn process_source<S: EphemerisSource + ?Sized, W: Write>(
        &self,
        source: &S,
        ref_pos: &ReferencePosition,
        writer: &mut W,
    ) -> Result<Report, Error> {
        let mut report = Report::default();
        let resolver = self.converter.resolver();
        let satellites = source.satellites();

        for epoch in source.epochs() {
            for sv in satellites.iter() {
                let ready = match qualify(source, epoch, sv) {
                    Qualification::Ready(ready) => ready,
                    Qualification::Incomplete(reason) => {
                        debug!("{:?} ({}) - {}", epoch, sv, reason);
                        report.incomplete += 1;
                        continue;
                    },
                    Qualification::Unsupported => {
                        report.unsupported += 1;
                        continue;
                    },
                };

                let offset = resolver.within_week_offset(ready.constellation, ready.week, epoch);
                let resolved = resolver.resolve_epoch(ready.constellation, ready.week, offset);

                let ecef = match self.converter.to_ecef(&ready, resolved) {
                    Ok(ecef) => ecef,
                    Err(e) => {
                        error!("{:?} ({}) - {}", epoch, sv, e);
                        report.computation_failures += 1;
                        continue;
                    },
                };

                let resolved = match timescale(ready.constellation) {
                    Some(ts) => resolved.to_time_scale(ts),
                    None => {
                        warn!("{:?} ({}) - undefined timescale", epoch, sv);
                        resolved
                    },
                };

                OutputEntry::new(epoch, resolved, sv, &ready, ref_pos, ecef)
                    .write(writer, self.cfg.output_format)?;
                report.entries += 1;
            }
        }
        Ok(report)
    }
}
