use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Failed to open file {0}")]
    OpenFile(String, #[source] std::io::Error),

    #[error("Failed to read line {0}")]
    ReadLine(usize, #[source] std::io::Error),

    #[error("Line {line}: expected either one column <probability> or two columns <generations> <probability>. Found {found}")]
    InvalidColumnCount{line: usize, found: usize},

    #[error("Line {line}: found {found} column(s), while previous records contained {expected}. Mixing layouts is not allowed")]
    MixedLayout{line: usize, expected: usize, found: usize},

    #[error("Line {line}: failed to parse generations '{value}'")]
    ParseGenerations{line: usize, value: String, #[source] source: std::num::ParseIntError},

    #[error("Line {line}: failed to parse probability '{value}'")]
    ParseProbability{line: usize, value: String, #[source] source: std::num::ParseFloatError},

    #[error("Line {line}: generation {generations} was already assigned a probability")]
    DuplicateGenerations{line: usize, generations: usize},

    #[error("No probability record was found within the generation distribution file")]
    Empty,
}
