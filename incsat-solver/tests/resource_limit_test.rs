#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024
#![cfg(unix)]

use std::ffi::OsStr;

mod helpers;

use helpers::instance_path;
use helpers::pigeon_hole;
use helpers::run_solver;
use helpers::scratch_directory;
use helpers::write_cnf;

#[test]
fn cpu_limit_interrupts_the_search() {
    let scratch = scratch_directory("cpu-limit");
    let instance = scratch.join("php_12_11.cnf");
    let (num_variables, clauses) = pigeon_hole(12, 11);
    write_cnf(&instance, num_variables, &clauses);

    let run = run_solver(
        [OsStr::new("--cpu-lim"), OsStr::new("1"), instance.as_os_str()],
        &scratch,
    );

    assert_eq!(run.status.code(), Some(1), "{}", run.stderr);
    assert_eq!(run.verdict().as_deref(), Some("INDETERMINATE"));
    assert!(run.stdout.contains("*** INTERRUPTED ***"));
}

#[test]
fn generous_memory_limit_leaves_the_verdict_alone() {
    let scratch = scratch_directory("memory-limit");
    let instance = instance_path("simple_sat");

    let run = run_solver(
        [
            OsStr::new("--mem-lim"),
            OsStr::new("4096"),
            instance.as_os_str(),
        ],
        &scratch,
    );

    assert!(run.status.success(), "{}", run.stderr);
    assert_eq!(run.verdict().as_deref(), Some("SATISFIABLE"));
    assert!(!run.stdout.contains("Could not set resource limit"));
}
