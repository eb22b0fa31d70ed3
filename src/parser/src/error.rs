use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("Invalid slice or value format for --{arg}. [{err}]")]
    ParseArg{arg: String, err: String},

    #[error("Invalid range '{0}' for --{1}: the start of a range cannot exceed its end")]
    ParseRange(String, &'static str),

    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("Please provide a generation distribution, using either --gens-pdf or --gens-pdf-file")]
    MissingGensPdf,

    #[error("--gens-pdf and --gens-pdf-file are mutually exclusive")]
    ConflictingGensPdf,

    #[error("Failed to serialize command line arguments")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Unable to serialize arguments into {0}")]
    WriteYaml(String, #[source] std::io::Error),

    #[error("Failed to open yaml configuration file {0}")]
    OpenYaml(String, #[source] std::io::Error),

    #[error("Failed to deserialize command line arguments from {0}")]
    Deserialize(String, #[source] serde_yaml::Error),

    #[error("{0} already exists. Use --overwrite to force.")]
    CannotOverwrite(String)
}
