use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "chromofold - infer 3D genome structures from contact-derived distance restraints by restrained simulated annealing.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel model generation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate structure models from restraint tables.
    Fold(FoldArgs),
    /// Print the temperature/repulsion schedule for a given configuration.
    Schedule(ScheduleArgs),
}

/// Arguments for the `fold` subcommand.
#[derive(Args, Debug)]
pub struct FoldArgs {
    /// Restraint table files (CSV: i,j,lower,upper[,group]), ordered coarse
    /// to fine, one per resolution level.
    #[arg(short, long, required = true, value_name = "PATH", num_args = 1..)]
    pub restraints: Vec<PathBuf>,

    /// Particle sizes in bases per particle, ordered coarse to fine,
    /// matching --restraints.
    #[arg(short = 'p', long, required = true, value_name = "BASES", value_delimiter = ',', num_args = 1..)]
    pub particle_sizes: Vec<u64>,

    /// Particle counts per level; inferred from the largest restrained index
    /// in each table when omitted.
    #[arg(long, value_name = "N", value_delimiter = ',', num_args = 1..)]
    pub particle_counts: Option<Vec<usize>>,

    /// Output directory for model coordinate files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the number of independent models to generate.
    #[arg(short = 'm', long, value_name = "NUM")]
    pub models: Option<usize>,

    /// Override the base random seed (model k runs with seed + k).
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,
}

/// Arguments for the `schedule` subcommand.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Starting temperature of the annealing run.
    #[arg(long, value_name = "TEMP")]
    pub temp_start: Option<f64>,

    /// Final temperature the run decays toward.
    #[arg(long, value_name = "TEMP")]
    pub temp_end: Option<f64>,

    /// Number of temperature steps.
    #[arg(long, value_name = "NUM")]
    pub num_temp_steps: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fold_parses_multiple_levels() {
        let cli = Cli::try_parse_from([
            "chromofold",
            "fold",
            "--restraints",
            "coarse.csv",
            "fine.csv",
            "--particle-sizes",
            "10000,1000",
            "--output",
            "out",
            "--models",
            "4",
            "--seed",
            "7",
        ])
        .unwrap();
        let Commands::Fold(args) = cli.command else {
            panic!("expected the fold subcommand");
        };
        assert_eq!(args.restraints.len(), 2);
        assert_eq!(args.particle_sizes, vec![10000, 1000]);
        assert_eq!(args.models, Some(4));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.particle_counts, None);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "chromofold",
            "-q",
            "-v",
            "schedule",
        ]);
        assert!(result.is_err());
    }
}
