mod common;
use common::GendistRunnerBuilder;
#[cfg(test)] use pretty_assertions::assert_eq;

use gendist::RocError;
use parser::ParserError;

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| field.to_string()).collect()
}

#[test]
fn roc_from_values() {
    let runner = GendistRunnerBuilder::new("roc")
        .mutation_rate(1.0)
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("1-3")
        .build();
    runner.run().unwrap();

    let want = vec![
        row(&["Cutoff", "Sensitivity", "1-Specificity"]),
        row(&["-Inf", "0.000000", "0.000000"]),
        row(&["1",    "0.735759", "0.406009"]),
        row(&["2",    "0.919699", "0.676682"]),
        row(&["3",    "0.981012", "0.857131"]),
        row(&["Inf",  "1.000000", "1.000000"]),
    ];
    assert_eq!(runner.read_table("roc"), want);
}

#[test]
fn roc_default_cutoffs_span_max_dist() {
    let runner = GendistRunnerBuilder::new("roc")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .threads(2)
        .build();
    runner.run().unwrap();

    // header + lower anchor + cutoffs 1..=10 + upper anchor
    let table = runner.read_table("roc");
    assert_eq!(table.len(), 13);
    assert_eq!(table[2][0], "1");
    assert_eq!(table[11][0], "10");
    assert_eq!(table[11][1..], ["1.000000", "1.000000"]);
}

#[test]
fn roc_explicit_max_dist() {
    let runner = GendistRunnerBuilder::new("roc")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .max_dist(4)
        .build();
    runner.run().unwrap();
    assert_eq!(runner.read_table("roc").len(), 1 + 2 + 4);
}

#[test]
fn gens_pdf_file_layouts_match_values() {
    let from_values = GendistRunnerBuilder::new("roc").gens_pdf(&[0.0, 0.6, 0.4]).cutoffs("1-5").build();
    let two_columns = GendistRunnerBuilder::new("roc").gens_pdf_file("gens-pdf/two-columns.tsv").cutoffs("1-5").build();
    let one_column  = GendistRunnerBuilder::new("roc").gens_pdf_file("gens-pdf/single-column.txt").cutoffs("1-5").build();

    for runner in [&from_values, &two_columns, &one_column] {
        runner.run().unwrap();
    }
    assert_eq!(two_columns.read_table("roc"), from_values.read_table("roc"));
    assert_eq!(one_column.read_table("roc"), from_values.read_table("roc"));
}

#[test]
fn sensspec_table() {
    let runner = GendistRunnerBuilder::new("sensspec")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("1 2")
        .build();
    runner.run().unwrap();

    let want = vec![
        row(&["Cutoff", "Sensitivity", "Specificity"]),
        row(&["1", "0.735759", "0.593991"]),
        row(&["2", "0.919699", "0.323318"]),
    ];
    assert_eq!(runner.read_table("sensspec"), want);
}

#[test]
fn distribution_table() {
    let runner = GendistRunnerBuilder::new("distribution")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .build();
    runner.run().unwrap();

    let table = runner.read_table("gendist");
    assert_eq!(table[0], row(&["Distance", "Generations", "Linked", "Probability"]));

    // (max_gens + 1) * (max_dist + 1) cells
    assert_eq!(table.len(), 1 + 3 * 11);
    assert_eq!(table[1], row(&["0", "0", "true", "0.00000000e0"]));
    assert_eq!(table[12][..3], ["0", "1", "true"]);
    assert_eq!(table[23][..3], ["0", "2", "false"]);
}

#[test]
fn unsorted_cutoffs_are_rejected() {
    let runner = GendistRunnerBuilder::new("roc")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("3 1")
        .build();
    let err = runner.run().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RocError>(),
        Some(RocError::UnsortedCutoffs{index: 1, previous: 3, current: 1})
    ));
}

#[test]
fn every_pair_linked_fails() {
    let runner = GendistRunnerBuilder::new("roc")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .max_link_gens(2)
        .cutoffs("1-3")
        .build();
    let err = runner.run().unwrap_err();
    assert!(matches!(err.downcast_ref::<RocError>(), Some(RocError::CollaboratorFailure(_))));
}

#[test]
fn failed_roc_leaves_no_output() {
    let runner = GendistRunnerBuilder::new("roc")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("1 50")
        .build();

    // max-dist is inferred to 10: cutoff 50 is out of range. Rerunning must report the same error.
    for _ in 0..2 {
        let err = runner.run().unwrap_err();
        assert!(matches!(err.downcast_ref::<RocError>(), Some(RocError::CollaboratorFailure(_))));
        assert!(!runner.output_file("roc").exists());
    }
}

#[test]
fn failed_sensspec_leaves_no_output() {
    let runner = GendistRunnerBuilder::new("sensspec")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("1 50")
        .build();

    for _ in 0..2 {
        let err = runner.run().unwrap_err();
        assert!(matches!(err.downcast_ref::<RocError>(), Some(RocError::CollaboratorFailure(_))));
        assert!(!runner.output_file("sensspec").exists());
    }
}

#[test]
fn invalid_mutation_rate() {
    let runner = GendistRunnerBuilder::new("roc")
        .mutation_rate(0.0)
        .gens_pdf(&[0.0, 1.0])
        .build();
    let err = runner.run().unwrap_err();
    assert!(matches!(err.downcast_ref::<RocError>(), Some(RocError::InvalidParameter{..})));
}

#[test]
fn missing_gens_pdf() {
    let runner = GendistRunnerBuilder::new("roc").build();
    let err = runner.run().unwrap_err();
    assert!(matches!(err.downcast_ref::<ParserError>(), Some(ParserError::MissingGensPdf)));
}

#[test]
fn existing_results_are_not_overwritten() {
    let runner = GendistRunnerBuilder::new("sensspec")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("1-2")
        .build();
    runner.run().unwrap();

    let err = runner.run().unwrap_err();
    assert!(matches!(err.downcast_ref::<ParserError>(), Some(ParserError::CannotOverwrite(_))));

    let runner = GendistRunnerBuilder::new("sensspec")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("1-2")
        .overwrite()
        .build();
    runner.run().unwrap();
    runner.run().unwrap();
}

#[test]
fn from_yaml_reproduces_results() {
    let runner = GendistRunnerBuilder::new("roc")
        .gens_pdf(&[0.0, 0.6, 0.4])
        .cutoffs("1-4")
        .overwrite()
        .build();
    runner.run().unwrap();
    let want = runner.read_table("roc");

    let yaml = runner.yaml_files();
    assert_eq!(yaml.len(), 1);
    std::fs::remove_file(runner.output_file("roc")).unwrap();

    let cli = parser::Cli {
        verbose : 0,
        quiet   : false,
        commands: parser::Commands::FromYaml{yaml: yaml[0].clone()},
    };
    gendist_roc::run(cli).unwrap();
    assert_eq!(runner.read_table("roc"), want);
}
