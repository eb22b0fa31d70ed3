extern crate parser;
extern crate logger;

use parser::{Cli, Commands, Common, GensPdfSource, Model, Sweep};
use gendist::{
    sensspec, Cutoffs, DistanceDistribution, DistanceRecord, GenerationDistribution, MutationRate,
    PoissonSensSpec, ResolvedModel, RocCurve, RocParams, RocPoint, SensSpecRow,
};
use gendist_io::{read::GensPdfReader, write::GenericWriter};

use anyhow::Result;
use located_error::*;

#[macro_use]
extern crate log;

mod error;
pub use error::RunError;

/// Unpack the command line arguments, and run the requested subcommand.
///
/// # Errors
/// - if the arguments describe an invalid model, or an invalid set of cutoffs.
/// - if any output file already exists, and `--overwrite` was not requested.
/// - if any output file cannot be written.
pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Commands::Roc{common, model, sweep} => {
            roc(&common, &model, &sweep).loc("While running roc")
        },

        Commands::Sensspec{common, model, sweep} => {
            sweep_sensspec(&common, &model, &sweep).loc("While running sensspec")
        },

        Commands::Distribution{common, model} => {
            distribution(&common, &model).loc("While running distribution")
        },

        Commands::FromYaml{yaml} => {
            info!("Loading arguments from {}", yaml.display());
            let cli = Cli::deserialize(&yaml)?;
            self::run(cli)
        },
    }
}

/// Convert the user's model arguments into `RocParams`, reading `--gens-pdf-file` if needed.
///
/// # Errors
/// - if neither or both of `--gens-pdf` and `--gens-pdf-file` were provided.
/// - if the generation distribution file cannot be parsed.
/// - if the mutation rate or generation distribution are invalid.
pub fn roc_params(model: &Model) -> Result<RocParams> {
    let pdf = match model.gens_pdf_source().loc("While parsing the generation distribution")? {
        GensPdfSource::Values(values) => values.to_vec(),
        GensPdfSource::File(path)     => GensPdfReader::new(path)?.read_pdf()
            .with_loc(|| format!("While reading {}", path.display()))?,
    };

    let mutation_rate = MutationRate::new(model.mutation_rate).loc("While parsing --mutation-rate")?;
    let generation_distribution = GenerationDistribution::new(pdf).loc("While parsing the generation distribution")?;
    debug!("Mutation rate: {mutation_rate} | Generation distribution: {generation_distribution}");

    Ok(RocParams::new(mutation_rate, generation_distribution)
        .with_max_link_gens(model.max_link_gens)
        .with_max_gens(model.max_gens)
        .with_max_dist(model.max_dist)
    )
}

/// Requested cutoffs, in the user's order. Defaults to every distance within `[1, max_dist]`
fn requested_cutoffs(sweep: &Sweep, model: &ResolvedModel) -> Result<Cutoffs> {
    let cutoffs = match sweep.parse_cutoffs().loc("While parsing --cutoffs")? {
        Some(cutoffs) => Cutoffs::new(cutoffs),
        None          => Cutoffs::up_to(model.max_dist()),
    };
    cutoffs.loc("While validating --cutoffs")
}

fn thread_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(RunError::BuildThreadPool)
        .loc("While setting up the thread pool")
}

fn sensspec_engine(ncutoffs: usize) -> PoissonSensSpec {
    PoissonSensSpec::new().with_progress(logger::Logger::progress_bar(ncutoffs as u64, "Sweeping cutoffs"))
}

/// Open `<output-dir>/<prefix>.<ext>` for writing, and write its header line.
/// Only called once results are available: a failed run leaves no file behind.
fn output_writer<'a>(common: &Common, ext: &str, header: &str) -> Result<GenericWriter<'a>> {
    std::fs::create_dir_all(&common.output_dir)
        .map_err(|e| RunError::CreateOutputDir(common.output_dir.display().to_string(), e))
        .loc("While preparing output files")?;

    let path = common.output_file(ext);
    common.can_write_file(&path)?;
    info!("Writing results into {}", path.display());

    let mut writer = GenericWriter::new(Some(&path))?;
    writer.write_header(header)?;
    Ok(writer)
}

fn roc(common: &Common, model: &Model, sweep: &Sweep) -> Result<()> {
    let resolved = roc_params(model)?.resolve()?;
    let cutoffs  = requested_cutoffs(sweep, &resolved)?;

    let curve: RocCurve = thread_pool(sweep.threads)?.install(|| {
        gendist::roc_curve(&cutoffs, &resolved, &sensspec_engine(cutoffs.len()))
    })?;

    let mut writer = output_writer(common, "roc", &RocPoint::header())?;
    writer.write_iter(&curve)?;

    println!("{curve}");
    println!("AUC: {:.6}", curve.auc());
    if let Some(optimal) = curve.optimal_cutoff() {
        println!("Optimal cutoff: {} (sensitivity: {:.6}, specificity: {:.6}, Youden's J: {:.6})",
            optimal.threshold, optimal.sensitivity, optimal.specificity(), optimal.youden_index()
        );
    }
    Ok(())
}

fn sweep_sensspec(common: &Common, model: &Model, sweep: &Sweep) -> Result<()> {
    let resolved = roc_params(model)?.resolve()?;
    let cutoffs  = requested_cutoffs(sweep, &resolved)?;

    let rows = thread_pool(sweep.threads)?.install(|| {
        sensspec::sweep(&sensspec_engine(cutoffs.len()), &cutoffs, &resolved)
    })?;

    let mut writer = output_writer(common, "sensspec", &SensSpecRow::header())?;
    writer.write_iter(&rows)
}

fn distribution(common: &Common, model: &Model) -> Result<()> {
    let resolved = roc_params(model)?.resolve()?;
    let distribution = DistanceDistribution::new(&resolved).loc("While computing the distance distribution")?;
    info!("Linked mass: {:.6} | Unlinked mass: {:.6}", distribution.linked_mass(), distribution.unlinked_mass());

    let mut writer = output_writer(common, "gendist", &DistanceRecord::header())?;
    writer.write_iter(distribution.records())
}
