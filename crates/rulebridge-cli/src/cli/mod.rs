//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in error messages: the path, or `-` for stdin.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for diagnostics written to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// NDJSON output.
    Json,
}

/// The quiet/verbose preference.
///
/// `Default` means neither flag was given; the analysis tool then receives
/// neither `--quiet` nor `--verbose`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No preference.
    #[default]
    Default,
    /// Errors only.
    Quiet,
    /// Extra detail.
    Verbose,
}

/// Report post-processing flags shared by `run` and `process`.
#[derive(Args, Clone, Debug)]
pub struct PostProcessArgs {
    /// Collapse defects that differ only in description (default: on).
    #[arg(
        long,
        env = "RULEBRIDGE_CONDENSE",
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub condense: bool,

    /// Disable condensation; takes precedence over `--condense`.
    #[arg(long)]
    pub no_condense: bool,

    /// Merge into the existing output report instead of replacing it.
    #[arg(long, env = "RULEBRIDGE_ACCUMULATE")]
    pub accumulate: bool,

    /// Report defects as errors and fail the run when any are found.
    #[arg(long, env = "RULEBRIDGE_DEFECTS_AS_ERRORS")]
    pub treat_defects_as_errors: bool,

    /// Print diagnostics in the build-system canonical format
    /// `file(line,col): warning [analysis] CODE: message`.
    #[arg(long, env = "RULEBRIDGE_HOST_DIAGNOSTICS")]
    pub host_diagnostics: bool,
}

impl PostProcessArgs {
    /// Effective condensation setting.
    pub fn condense_enabled(&self) -> bool {
        self.condense && !self.no_condense
    }
}

/// Options forwarded to the analysis tool by `run`.
#[derive(Args, Clone, Debug)]
pub struct ToolArgs {
    /// Path to the analysis tool executable.
    #[arg(long, env = "RULEBRIDGE_TOOL", value_name = "EXE")]
    pub tool: PathBuf,

    /// Rules configuration file passed as `--config`.
    #[arg(long, value_name = "FILE")]
    pub rules_config: Option<PathBuf>,

    /// Rule set name passed as `--set`.
    #[arg(long, value_name = "NAME")]
    pub rule_set: Option<String>,

    /// Ignore list file passed as `--ignore`.
    #[arg(long, value_name = "FILE")]
    pub ignore: Option<PathBuf>,

    /// Severity filter passed as `--severity`.
    #[arg(long, value_name = "SPEC")]
    pub severity: Option<String>,

    /// Confidence filter passed as `--confidence`.
    #[arg(long, value_name = "SPEC")]
    pub confidence: Option<String>,

    /// Maximum number of defects the tool reports, passed as `--limit`.
    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,
}

/// All top-level subcommands exposed by the `rulebridge` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Run the analysis tool on assemblies and surface its findings.
    Run {
        /// Assemblies to analyze.
        #[arg(value_name = "ASSEMBLY")]
        assemblies: Vec<PathBuf>,
        /// Where the processed report is written.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,
        /// Tool invocation options.
        #[command(flatten)]
        tool: ToolArgs,
        /// Post-processing options.
        #[command(flatten)]
        post: PostProcessArgs,
    },

    /// Post-process existing reports and surface their findings.
    Process {
        /// Report files, merged in order.
        #[arg(value_name = "REPORT", num_args = 1.., required = true)]
        reports: Vec<PathBuf>,
        /// Where the processed report is written.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,
        /// Post-processing options.
        #[command(flatten)]
        post: PostProcessArgs,
    },

    /// Merge reports into one (the first is the base).
    Merge {
        /// Report files, or `-` for stdin (at most one may be `-`).
        #[arg(value_name = "FILE", num_args = 2..)]
        files: Vec<PathOrStdin>,
        /// Write the result here instead of stdout.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
        /// Skip condensing the merged report.
        #[arg(long)]
        no_condense: bool,
    },

    /// Condense one report.
    Condense {
        /// Report file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Write the result here instead of stdout.
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Root CLI struct for the `rulebridge` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "rulebridge",
    version,
    about = "Static-analysis report bridge for build systems",
    long_about = "Runs an external static-analysis tool, condenses and accumulates its\n\
                  XML reports, and re-surfaces the findings as build diagnostics."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Diagnostic format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input report size in bytes.
    ///
    /// Can also be set via the `RULEBRIDGE_MAX_FILE_SIZE` environment
    /// variable. Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "RULEBRIDGE_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

impl Cli {
    /// Collapses the `--quiet`/`--verbose` pair into a [`Verbosity`].
    pub fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Default,
        }
    }
}
