use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use nav_vectors::prelude::{Config, ConfigError, OutputFormat, TimeOrigins};

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

fn command() -> Command {
    Command::new("nav-vectors")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Satellite position reference vectors, from broadcast navigation data")
        .color(ColorChoice::Always)
        .arg(
            Arg::new("directory")
                .value_name("DIRECTORY")
                .help(
                    "Test data base directory. Navigation files are read from
the NAV/<revision> subfolders and reference vectors are generated in gr/<revision>.",
                ),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Generator configuration (JSON). Omitted fields take default values."),
        )
        .arg(
            Arg::new("official-origins")
                .long("official-origins")
                .action(ArgAction::SetTrue)
                .help(
                    "Count Galileo and BeiDou weeks from their own timescale origin,
instead of the GPS origin every constellation shares by default.",
                ),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Generate JSON lines rather than text lines."),
        )
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: command().get_matches(),
        }
    }
    /// Prints usage
    pub fn print_help() {
        let _ = command().print_help();
    }
    /// Base directory, if any
    pub fn directory(&self) -> Option<PathBuf> {
        self.matches
            .get_one::<String>("directory")
            .map(PathBuf::from)
    }
    fn config_path(&self) -> Option<&Path> {
        self.matches
            .get_one::<String>("config")
            .map(|path| Path::new(path.as_str()))
    }
    /// Returns [Config] with command line options applied
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut cfg = match self.config_path() {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if self.matches.get_flag("official-origins") {
            cfg.time_origins = TimeOrigins::official();
        }
        if self.matches.get_flag("json") {
            cfg.output_format = OutputFormat::Json;
        }
        Ok(cfg)
    }
}
