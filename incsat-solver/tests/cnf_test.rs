#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::ffi::OsStr;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use regex::Regex;

mod helpers;

use helpers::instance_path;
use helpers::pigeon_hole;
use helpers::run_solver;
use helpers::satisfies;
use helpers::scratch_directory;
use helpers::write_cnf;

#[test]
fn satisfiable_instance_prints_a_model() {
    let scratch = scratch_directory("satisfiable");
    let instance = instance_path("simple_sat");

    let run = run_solver(
        [
            OsStr::new("--model"),
            OsStr::new("--ordering"),
            OsStr::new("occurrence"),
            instance.as_os_str(),
        ],
        &scratch,
    );

    assert!(run.status.success(), "{}", run.stderr);
    assert_eq!(run.verdict().as_deref(), Some("SATISFIABLE"));

    let model = run.model().expect("a model is printed");
    assert_eq!(model.len(), 3);
    assert!(satisfies(&instance, &model));
}

#[test]
fn unsatisfiable_instance_exits_with_20() {
    let scratch = scratch_directory("unsatisfiable");

    let run = run_solver([instance_path("php_3_2")], &scratch);

    assert_eq!(run.status.code(), Some(20));
    assert_eq!(run.verdict().as_deref(), Some("UNSATISFIABLE"));
    assert!(run.model().is_none());
}

#[test]
fn gzipped_instance_is_read() {
    let scratch = scratch_directory("gzipped");
    let (num_variables, clauses) = pigeon_hole(4, 4);
    let plain = scratch.join("php_4_4.cnf");
    write_cnf(&plain, num_variables, &clauses);

    let compressed = scratch.join("php_4_4.cnf.gz");
    let mut encoder = GzEncoder::new(
        std::fs::File::create(&compressed).expect("Failed to create the instance."),
        Compression::default(),
    );
    encoder
        .write_all(&std::fs::read(&plain).expect("Failed to read the instance."))
        .expect("Failed to compress the instance.");
    let _ = encoder.finish().expect("Failed to compress the instance.");

    let run = run_solver([OsStr::new("--model"), compressed.as_os_str()], &scratch);

    assert!(run.status.success(), "{}", run.stderr);
    assert_eq!(run.verdict().as_deref(), Some("SATISFIABLE"));
    assert!(satisfies(&plain, &run.model().expect("a model is printed")));
}

#[test]
fn batch_exits_with_the_code_of_the_last_instance() {
    let scratch = scratch_directory("batch");

    let run = run_solver(
        [instance_path("php_3_2"), instance_path("simple_sat")],
        &scratch,
    );

    assert!(run.status.success(), "{}", run.stderr);
    let verdicts = Regex::new(r"(?m)^s (\w+)\s*$")
        .expect("valid regex")
        .captures_iter(&run.stdout)
        .map(|captures| captures[1].to_owned())
        .collect::<Vec<_>>();
    assert_eq!(verdicts, vec!["UNSATISFIABLE", "SATISFIABLE"]);
}

#[test]
fn contradiction_found_by_simplification_is_certified() {
    let scratch = scratch_directory("simplification-certificate");
    let certificate = scratch.join("proof.drup");

    let run = run_solver(
        [
            OsStr::new("--certified"),
            OsStr::new("--certified-output"),
            certificate.as_os_str(),
            instance_path("contradicting_units").as_os_str(),
        ],
        &scratch,
    );

    assert_eq!(run.status.code(), Some(20));
    let contents = std::fs::read_to_string(&certificate).expect("a certificate is written");
    assert_eq!(contents, "o proof DRUP\n0\n");
}

#[test]
fn certificate_of_a_search_ends_with_the_contradiction() {
    let scratch = scratch_directory("search-certificate");
    let certificate = scratch.join("proof.drup");

    let run = run_solver(
        [
            OsStr::new("--certified"),
            OsStr::new("--certified-output"),
            certificate.as_os_str(),
            instance_path("php_3_2").as_os_str(),
        ],
        &scratch,
    );

    assert_eq!(run.status.code(), Some(20));
    let contents = std::fs::read_to_string(&certificate).expect("a certificate is written");
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.first(), Some(&"o proof DRUP"));
    assert_eq!(lines.last(), Some(&"0"));
    assert!(lines[1..lines.len() - 1]
        .iter()
        .all(|line| line.ends_with(" 0")));
}

#[test]
fn certificate_is_refused_for_a_batch() {
    let scratch = scratch_directory("batch-certificate");

    let run = run_solver(
        [
            OsStr::new("--certified"),
            instance_path("php_3_2").as_os_str(),
            instance_path("simple_sat").as_os_str(),
        ],
        &scratch,
    );

    assert_eq!(run.status.code(), Some(1));
    assert!(run.verdict().is_none());
}

#[test]
fn simplified_problem_is_written_as_dimacs() {
    let scratch = scratch_directory("dimacs");
    let output = scratch.join("simplified.cnf");
    let instance = scratch.join("units.cnf");
    write_cnf(&instance, 3, &[vec![1], vec![1, 2], vec![-1, 2, 3]]);

    let run = run_solver(
        [OsStr::new("--dimacs"), output.as_os_str(), instance.as_os_str()],
        &scratch,
    );

    assert!(run.status.success(), "{}", run.stderr);
    assert!(run.verdict().is_none());
    let contents = std::fs::read_to_string(&output).expect("the problem is written");
    assert_eq!(contents, "p cnf 3 2\n1 0\n2 3 0\n");
}

#[test]
fn analysis_output_holds_one_run_per_instance() {
    let scratch = scratch_directory("analysis");
    let directory = scratch.join("analysis");

    let run = run_solver(
        [
            OsStr::new("--analysis-output"),
            directory.as_os_str(),
            instance_path("simple_sat").as_os_str(),
            instance_path("php_3_2").as_os_str(),
        ],
        &scratch,
    );

    assert_eq!(run.status.code(), Some(20));
    let contents = std::fs::read_to_string(directory.join("run-log.jsonl"))
        .expect("the run log is exported");
    let kinds = Regex::new(r#"^\{"schema_version":1,"kind":"(\w+)""#).expect("valid regex");
    let kinds = contents
        .lines()
        .map(|line| kinds.captures(line).expect("a versioned envelope")[1].to_owned())
        .collect::<Vec<_>>();

    assert_eq!(kinds, vec!["run", "raw", "run", "raw", "summary"]);
    assert!(contents.contains(r#""result":"SATISFIABLE""#));
    assert!(contents.contains(r#""result":"UNSATISFIABLE""#));
}

#[test]
fn result_file_holds_the_verdict() {
    let scratch = scratch_directory("result-file");
    let output = scratch.join("result.txt");

    let run = run_solver(
        [
            OsStr::new("--result-output"),
            output.as_os_str(),
            instance_path("php_3_2").as_os_str(),
        ],
        &scratch,
    );

    assert_eq!(run.status.code(), Some(20));
    assert_eq!(
        std::fs::read_to_string(&output).expect("the result is written"),
        "UNSAT\n"
    );
}

#[test]
fn invalid_instance_fails() {
    let scratch = scratch_directory("invalid");

    let run = run_solver([instance_path("invalid_header")], &scratch);

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("Execution failed"));
}

#[test]
fn unsupported_extension_fails() {
    let scratch = scratch_directory("extension");
    let instance = scratch.join("instance.txt");
    write_cnf(&instance, 1, &[vec![1]]);

    let run = run_solver([instance], &scratch);

    assert_eq!(run.status.code(), Some(1));
    assert!(run.stdout.contains("is not supported"));
}
