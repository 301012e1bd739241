//! Mechanism for loading and sharing the run configuration

use crate::{analysis::AnalysisKind, numeric::Float, Result};

use eyre::{ensure, eyre, WrapErr};

use std::{fs, str::FromStr};

/// Run configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Number of events to be processed
    pub num_events: usize,

    /// Seed of the random number generator
    pub seed: u64,

    /// Analysis to be run
    pub analysis: AnalysisKind,

    /// Whether trigger decisions should be emulated
    pub trigger_emulation: bool,

    /// Mean number of jets per generated event
    pub mean_jets: Float,

    /// Scale of the invisible momentum in generated events (GeV)
    pub met_scale: Float,
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(file_name: &str) -> Result<Self> {
        let config_str = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Could not read configuration file {file_name:?}"))?;
        let config = Self::parse(&config_str)?;
        config.print();
        Ok(config)
    }

    /// Decode and check the contents of a configuration file
    pub fn parse(config_str: &str) -> Result<Self> {
        // Configuration items are the first non-whitespace chunk of text on
        // each line. Blank lines are ignored, and the rest of a line can be
        // used for comments.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // Fetch the next configuration item, tagged with the name of the
        // field which it is supposed to fill for error reporting
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| eyre!("Missing configuration of {}", name))
        };

        let config = Configuration {
            num_events: next_item("num_events")?.parse::<usize>()?,
            seed: next_item("seed")?.parse::<u64>()?,
            analysis: next_item("analysis")?.parse::<AnalysisKind>()?,
            trigger_emulation: next_item("trigger_emulation")?.parse_bool()?,
            mean_jets: next_item("mean_jets")?.parse::<Float>()?,
            met_scale: next_item("met_scale")?.parse::<Float>()?,
        };

        ensure!(config.num_events > 0, "Please process at least one event");
        ensure!(
            config.mean_jets >= 0. && config.mean_jets.is_finite(),
            "The mean number of jets must be a non-negative number"
        );
        ensure!(
            config.met_scale >= 0. && config.met_scale.is_finite(),
            "The missing momentum scale must be a non-negative number"
        );
        Ok(config)
    }

    /// Display the configuration
    pub fn print(&self) {
        println!("NUM_EVENTS        : {}", self.num_events);
        println!("SEED              : {}", self.seed);
        println!("ANALYSIS          : {}", self.analysis);
        println!("TRIGGER_EMULATION : {}", self.trigger_emulation);
        println!("MEAN_JETS         : {}", self.mean_jets);
        println!("MET_SCALE         : {}", self.met_scale);
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a struct field tag and raw iterator data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: Into<eyre::Report>,
    {
        self.data
            .parse::<T>()
            .map_err(|e| -> eyre::Report { e.into() })
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse this data using special logic which handles Fortran's bool syntax
    fn parse_bool(self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            ".true." => Ok(true),
            ".false." => Ok(false),
            _ => self.parse::<bool>(),
        }
    }
}
