use std::{
    fs::File,
    path::{Path, PathBuf},
    str::FromStr,
    ops::{Add, Range},
    fmt::{self, Display, Formatter}, ffi::OsStr
};

use located_error::*;

use clap::{Parser, Subcommand, Args};
use serde::{Serialize, Deserialize};
use log::debug;
use num::One;
use anyhow::Result;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="gendist-roc", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// gendist-roc: evaluate genetic distance cutoffs as classifiers of epidemiological linkage.
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emmited and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli{
    /// Serialize command line arguments within a `.yaml` file.
    ///
    /// # Behavior
    /// - File naming follows the convention '{current time}-{module name}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--output-dir` folder.
    /// - `from-yaml` invocations are not serialized.
    ///
    /// # Errors
    /// - if `serde_yaml` fails to parse `Self` to a string.
    /// - if the yaml file cannot be written within `--output-dir`
    pub fn serialize(&self) -> Result<()> {
        let Some(common) = self.commands.common() else {
            return Ok(())
        };

        let serialized = serde_yaml::to_string(&self)
            .map_err(ParserError::Serialize)
            .loc("While serializing command line arguments")?;

        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let output_file = common.output_dir.join(format!("{current_time}-{}.yaml", self.commands.name()));

        std::fs::write(&output_file, serialized)
            .map_err(|e| ParserError::WriteYaml(output_file.display().to_string(), e))
            .loc("While serializing command line arguments")
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    ///
    /// # Errors
    ///
    /// - Returns `FileNotFound` or `PermissionDenied` if the provided `.yaml` is invalid,
    ///   or does not carry read permissions
    /// - if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let display = || yaml.display().to_string();
        let file = File::open(yaml)
            .map_err(|e| ParserError::OpenYaml(display(), e))
            .loc("While deserializing command line arguments")?;
        serde_yaml::from_reader(file)
            .map_err(|e| ParserError::Deserialize(display(), e))
            .loc("While deserializing command line arguments")
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Compute the ROC curve of a range of distance cutoffs.
    ///
    /// Writes '<output-dir>/<prefix>.roc', and prints the curve, its AUC and the cutoff
    /// maximizing Youden's J statistic.
    Roc {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        model: Model,
        #[clap(flatten)]
        sweep: Sweep,
    },

    /// Compute the sensitivity and specificity of a range of distance cutoffs.
    ///
    /// Writes '<output-dir>/<prefix>.sensspec'
    Sensspec {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        model: Model,
        #[clap(flatten)]
        sweep: Sweep,
    },

    /// Compute the joint probability of every (distance, generations) pair of the model.
    ///
    /// Writes '<output-dir>/<prefix>.gendist'
    Distribution {
        #[clap(flatten)]
        common: Common,
        #[clap(flatten)]
        model: Model,
    },

    /// Run gendist-roc using a previously generated .yaml configuration file.
    ///
    /// This allows users to easily re-apply a gendist-roc command using the exact same parameters
    /// and arguments.
    FromYaml {
        yaml: PathBuf,
    },
}

impl Commands {
    /// Output arguments of this subcommand. `None` for `from-yaml`
    #[must_use]
    pub fn common(&self) -> Option<&Common> {
        match self {
            Self::Roc{common, ..} | Self::Sensspec{common, ..} | Self::Distribution{common, ..} => Some(common),
            Self::FromYaml{..} => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Roc{..}          => "roc",
            Self::Sensspec{..}     => "sensspec",
            Self::Distribution{..} => "distribution",
            Self::FromYaml{..}     => "from-yaml",
        }
    }
}

#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Common {
    /// Output directory where results will be written.
    ///
    /// Note that gendist-roc will create the specified leaf directory if it is not present, but does not
    /// allow itself from creating parent directories.
    #[clap(short, long, default_value("gendist-output"), parse(try_from_os_str=valid_output_dir))]
    pub output_dir: PathBuf,

    /// Filename prefix of every output file.
    #[clap(short, long, default_value("gendist"))]
    pub prefix: String,

    /// Overwrite existing output files.
    ///
    /// By default, gendist-roc does not allow itself from overwriting existing results files. Use this flag
    /// to force this behaviour.
    #[clap(short='w', long)]
    pub overwrite: bool,
}

impl Common {
    /// Path of an output file: '<output-dir>/<prefix>.<ext>'
    #[must_use]
    pub fn output_file(&self, ext: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{ext}", self.prefix))
    }

    /// Check if a given file already exists ; raise an error if such is the case, and the user did not explicitly
    /// allow file overwriting.
    ///
    /// # Errors
    /// - If the provided `pathbuf` already exists and the user did not specifically allow for file
    ///   overwrite using the `--overwrite` argument
    pub fn can_write_file(&self, pathbuf: &Path) -> Result<bool> {
        if ! self.overwrite && pathbuf.exists() {
            return Err(ParserError::CannotOverwrite(pathbuf.display().to_string()))
                .loc( "While parsing command line arguments" )
        }
        Ok(true)
    }
}

/// Where the generation distribution of a run comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GensPdfSource<'a> {
    Values(&'a [f64]),
    File(&'a Path),
}

#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Model {
    /// Expected number of mutations per transmission generation.
    ///
    /// Distances between two cases separated by g generations are Poisson distributed,
    /// with mean g * mutation-rate.
    #[clap(short='m', long)]
    pub mutation_rate: f64,

    /// Probability that two cases are separated by 0, 1, 2, ... transmission generations.
    ///
    /// Example: '--gens-pdf 0 0.6 0.4'{n}
    /// Mutually exclusive with --gens-pdf-file.
    #[clap(short='g', long, multiple_values(true))]
    pub gens_pdf: Option<Vec<f64>>,

    /// Read the generation distribution from a file.
    ///
    /// Either a single column of probabilities (line order = generations), or two columns
    /// '<generations> <probability>' (space, tab or comma separated). Lines starting with '#' are ignored.
    #[clap(short='G', long, parse(try_from_os_str=valid_input_file))]
    pub gens_pdf_file: Option<PathBuf>,

    /// Maximum number of generations at which two cases are still considered linked.
    #[clap(short='l', long, default_value("1"))]
    pub max_link_gens: usize,

    /// Maximum number of generations modelled.
    ///
    /// Defaults to the last generation carrying a non-zero probability.
    #[clap(long)]
    pub max_gens: Option<usize>,

    /// Maximum genetic distance modelled.
    ///
    /// Defaults to the 99.9% quantile of the distance distribution at --max-gens.
    #[clap(long)]
    pub max_dist: Option<u64>,
}

impl Model {
    /// Sanity check: exactly one of `--gens-pdf` or `--gens-pdf-file` must be provided.
    ///
    /// # Errors
    /// - `MissingGensPdf` if neither was provided.
    /// - `ConflictingGensPdf` if both were.
    pub fn gens_pdf_source(&self) -> Result<GensPdfSource<'_>, ParserError> {
        match (&self.gens_pdf, &self.gens_pdf_file) {
            (Some(values), None) => Ok(GensPdfSource::Values(values)),
            (None, Some(path))   => Ok(GensPdfSource::File(path)),
            (None, None)         => Err(ParserError::MissingGensPdf),
            (Some(_), Some(_))   => Err(ParserError::ConflictingGensPdf),
        }
    }
}

#[derive(Args, Debug, Serialize, Deserialize)]
pub struct Sweep {
    /// Genetic distance cutoffs to evaluate.
    ///
    /// Argument may accept slices (inclusive) such as '--cutoffs 1-5' and/or discrete integers such as '--cutoffs 8 10'.{n}
    /// Cutoffs are evaluated in the provided order, which must be strictly increasing.{n}
    /// Example:{n}
    ///   specifying          : '--cutoffs 1-4 6 8-9'{n}
    ///   ...will be parsed as: [1, 2, 3, 4, 6, 8, 9]{n}
    /// Defaults to every distance between 1 and --max-dist.
    #[clap(short='c', long, multiple_values(true))]
    pub cutoffs: Option<Vec<String>>,

    /// Number of parallel CPU threads.
    ///
    /// Use 0 to let the thread pool pick the number of available cores.
    #[clap(short='@', long, default_value("1"))]
    pub threads: usize,
}

impl Sweep {
    /// User-provided cutoffs, in their original order. `None` if `--cutoffs` was not provided.
    ///
    /// # Errors
    /// - if any of the provided values is not a valid integer or range.
    pub fn parse_cutoffs(&self) -> Result<Option<Vec<u64>>, ParserError> {
        self.cutoffs.as_ref()
            .map(|ranges| parse_user_ranges(ranges, "cutoffs"))
            .transpose()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir(s).with_loc(|| format!("While creating output directory {}", Path::new(s).display()))?;
    }
    assert_filesystem_entity_is_valid(s, FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}

/// Convert a user-defined string "range" into a vector of integers.
/// "9-14" thus becomes [9, 10, 11, 12, 13, 14]
/// Note that the range is fully inclusive.
fn parse_user_range<T>(s: &str, arg: &'static str) -> Result<Vec<T>, ParserError>
where   T                   : FromStr + Add<Output = T> + Ord + One,
        Range<T>            : Iterator<Item = T>,
        <T as FromStr>::Err : ToString,
{
    let parse = |value: &str| value.parse::<T>()
        .map_err(|err| ParserError::ParseArg{arg: arg.to_string(), err: err.to_string()});

    match s.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (parse(start)?, parse(end)?);
            if start > end {
                return Err(ParserError::ParseRange(s.to_string(), arg))
            }
            Ok((start..end + One::one()).collect())
        },
        None => Ok(vec![parse(s)?])
    }
}

/// Convert a vector of Strings with user-input ranges to a single vector of integers.
///  - Input will most likely stem from the command line parser, where users are not expected
///    to write every single value they would like to input.
///
///     --> ["1-6", "8"] for the user, becomes [1, 2, 3, 4, 5, 6, 8] for our program.
///
///  - Values are returned in the order the user provided them: no sorting, nor deduplication.
///
/// # Example
///```
///use parser::parse_user_ranges;
///let user_input: Vec<String> = vec!["5".into(), "1-3".into(), "7".into()];
///let parsed_input: Vec<u64>  = parse_user_ranges(&user_input, "cutoffs").expect("error");
///assert_eq!(parsed_input, vec![5, 1, 2, 3, 7])
///```
///
/// # Errors
///  returns a `ParseArg` error if the provided ranges cannot be parsed into integers, or
///  a `ParseRange` error if a range is reversed.
pub fn parse_user_ranges<T>(ranges: &[String], arg: &'static str) -> Result<Vec<T>, ParserError>
where   T                   : FromStr + Add<Output = T> + Ord + One,
        Range<T>            : Iterator<Item = T>,
        <T as FromStr>::Err : ToString,
{
    ranges.iter()
        .map(|s| parse_user_range(s, arg))
        .collect::<Result<Vec<Vec<T>>, _>>()
        .map(|ranges| ranges.into_iter().flatten().collect())
}
