use std::{fs::File, io::{BufRead, BufReader}, path::Path};

use anyhow::Result;
use located_error::LocatedError;
use log::{debug, trace};

mod error;
pub use error::ReaderError;

/// Accepted field separators of a generation distribution file.
pub const GENS_PDF_SEPARATORS: [char; 3] = [' ', '\t', ','];

/// Reader for generation distribution files, i.e. the probability that two linked cases are
/// separated by `g` transmission generations.
///
/// One record per line; blank lines and `#` comments are skipped. Two layouts are accepted:
/// ```text
/// # single column: line order = generation index
/// 0.0
/// 0.6
/// 0.4
/// ```
/// ```text
/// # two columns: <generations> <probability>. Missing generations are set to 0.
/// 1,0.6
/// 2,0.4
/// ```
pub struct GensPdfReader<'a> {
    source: Box<dyn BufRead + 'a>,
}

impl<'a> GensPdfReader<'a> {
    /// Open `path` for reading.
    ///
    /// # Errors
    /// - if `path` targets an invalid location (`FileNotFound` or `PermissionDenied`)
    pub fn new(path: impl AsRef<Path>) -> Result<GensPdfReader<'a>> {
        let path = path.as_ref();
        File::open(path)
            .map(|file| Self::from_reader(BufReader::new(file)))
            .map_err(|e| ReaderError::OpenFile(path.display().to_string(), e))
            .loc("While attempting to create a new GensPdfReader")
    }

    pub fn from_reader(source: impl BufRead + 'a) -> Self {
        Self{source: Box::new(source)}
    }

    /// Consume the reader and return the probability of every generation, indexed by generation.
    ///
    /// # Errors
    /// - `InvalidColumnCount` or `MixedLayout` if a line does not match the file's layout.
    /// - `ParseGenerations` or `ParseProbability` if a field contains invalid data.
    /// - `DuplicateGenerations` if a generation is assigned twice.
    /// - `Empty` if the file does not contain a single record.
    pub fn read_pdf(self) -> Result<Vec<f64>> {
        use ReaderError::{InvalidColumnCount, MixedLayout, DuplicateGenerations, Empty};
        let mut records: Vec<Option<f64>> = Vec::new();
        let mut layout: Option<usize> = None;

        for (i, line) in self.source.lines().enumerate() {
            let lineno = i + 1;
            let line = line.map_err(|e| ReaderError::ReadLine(lineno, e)).loc("While reading generation distribution")?;
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue
            }

            let fields = line.split(&GENS_PDF_SEPARATORS[..]).filter(|f| !f.is_empty()).collect::<Vec<&str>>();
            let ncols = *layout.get_or_insert(fields.len());
            if fields.len() != ncols {
                return Err(MixedLayout{line: lineno, expected: ncols, found: fields.len()}).loc("While parsing generation distribution")
            }

            let (generations, probability) = match fields[..] {
                [probability]              => (records.len(), Self::parse_probability(lineno, probability)?),
                [generations, probability] => (Self::parse_generations(lineno, generations)?, Self::parse_probability(lineno, probability)?),
                _ => return Err(InvalidColumnCount{line: lineno, found: fields.len()}).loc("While parsing generation distribution"),
            };
            trace!("generations: {generations: <4} probability: {probability}");

            if generations >= records.len() {
                records.resize(generations + 1, None);
            }
            if records[generations].replace(probability).is_some() {
                return Err(DuplicateGenerations{line: lineno, generations}).loc("While parsing generation distribution")
            }
        }

        if records.is_empty() {
            return Err(Empty).loc("While parsing generation distribution")
        }
        debug!("Read {} generation probabilities", records.len());
        Ok(records.into_iter().map(|p| p.unwrap_or(0.0)).collect())
    }

    fn parse_generations(line: usize, value: &str) -> Result<usize> {
        value.parse::<usize>()
            .map_err(|source| ReaderError::ParseGenerations{line, value: value.to_string(), source})
            .loc("While parsing generation distribution")
    }

    fn parse_probability(line: usize, value: &str) -> Result<f64> {
        value.parse::<f64>()
            .map_err(|source| ReaderError::ParseProbability{line, value: value.to_string(), source})
            .loc("While parsing generation distribution")
    }
}
