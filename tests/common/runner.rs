use std::path::PathBuf;
use clap::Parser;

use super::Fixture;

/// Build the command line of a single `gendist-roc` invocation, writing into a temporary output directory.
pub struct GendistRunnerBuilder {
    module       : &'static str,
    mutation_rate: f64,
    gens_pdf     : Option<Vec<f64>>,
    gens_pdf_file: Option<Fixture>,
    cutoffs      : Option<String>,
    max_link_gens: Option<usize>,
    max_dist     : Option<u64>,
    threads      : usize,
    prefix       : &'static str,
    overwrite    : bool,
}

impl GendistRunnerBuilder {
    pub fn new(module: &'static str) -> Self {
        Self {
            module,
            mutation_rate: 1.0,
            gens_pdf     : None,
            gens_pdf_file: None,
            cutoffs      : None,
            max_link_gens: None,
            max_dist     : None,
            threads      : 1,
            prefix       : "gendist-test",
            overwrite    : false,
        }
    }

    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn gens_pdf(mut self, pdf: &[f64]) -> Self {
        self.gens_pdf = Some(pdf.to_vec());
        self
    }

    pub fn gens_pdf_file(mut self, fixture: &str) -> Self {
        self.gens_pdf_file = Some(Fixture::copy(fixture));
        self
    }

    pub fn cutoffs(mut self, cutoffs: &str) -> Self {
        self.cutoffs = Some(cutoffs.to_string());
        self
    }

    pub fn max_link_gens(mut self, max_link_gens: usize) -> Self {
        self.max_link_gens = Some(max_link_gens);
        self
    }

    pub fn max_dist(mut self, max_dist: u64) -> Self {
        self.max_dist = Some(max_dist);
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn build(self) -> GendistRunner {
        let output_dir = Fixture::blank("gendist-test-output");
        let mut args = vec![
            "gendist-roc".to_string(),
            self.module.to_string(),
            "--mutation-rate".to_string(), self.mutation_rate.to_string(),
            "--output-dir".to_string(), output_dir.to_string(),
            "--prefix".to_string(), self.prefix.to_string(),
        ];

        if let Some(pdf) = &self.gens_pdf {
            args.push("--gens-pdf".to_string());
            args.extend(pdf.iter().map(f64::to_string));
        }
        if let Some(file) = &self.gens_pdf_file {
            args.extend(["--gens-pdf-file".to_string(), file.to_string()]);
        }
        if let Some(cutoffs) = &self.cutoffs {
            args.push("--cutoffs".to_string());
            args.extend(cutoffs.split_whitespace().map(str::to_string));
        }
        if let Some(max_link_gens) = self.max_link_gens {
            args.extend(["--max-link-gens".to_string(), max_link_gens.to_string()]);
        }
        if let Some(max_dist) = self.max_dist {
            args.extend(["--max-dist".to_string(), max_dist.to_string()]);
        }
        if self.module != "distribution" {
            args.extend(["--threads".to_string(), self.threads.to_string()]);
        }
        if self.overwrite {
            args.push("--overwrite".to_string());
        }

        GendistRunner{args, output_dir, prefix: self.prefix, _gens_pdf_file: self.gens_pdf_file}
    }
}

pub struct GendistRunner {
    args          : Vec<String>,
    output_dir    : Fixture,
    prefix        : &'static str,
    _gens_pdf_file: Option<Fixture>,
}

impl GendistRunner {
    /// Parse the command line, serialize it, and run it.
    pub fn run(&self) -> anyhow::Result<()> {
        let cli = parser::Cli::try_parse_from(&self.args)?;
        cli.serialize()?;
        gendist_roc::run(cli)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.to_path_buf()
    }

    pub fn output_file(&self, ext: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{ext}", self.prefix))
    }

    /// Every line of an output table, split on tabs. The header line is included.
    pub fn read_table(&self, ext: &str) -> Vec<Vec<String>> {
        let path = self.output_file(ext);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Failed to open test output file: {}", path.display()))
            .lines()
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect()
    }

    /// Serialized `.yaml` configuration files found within the output directory.
    pub fn yaml_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.output_dir()).expect("Failed to read output directory")
            .map(|entry| entry.expect("Invalid directory entry").path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "yaml"))
            .collect()
    }
}
