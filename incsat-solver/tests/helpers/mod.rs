//! Helpers to run the solver binary in integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Child;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use regex::Regex;
use wait_timeout::ChildExt;

pub(crate) const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The outcome of one run of the solver binary.
#[derive(Debug)]
pub(crate) struct SolverRun {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl SolverRun {
    /// The verdict printed on the `s` line of the last instance.
    pub(crate) fn verdict(&self) -> Option<String> {
        let pattern = Regex::new(r"(?m)^s (\w+)\s*$").expect("valid regex");
        pattern
            .captures_iter(&self.stdout)
            .last()
            .map(|captures| captures[1].to_owned())
    }

    /// The literals of the `v` line, without the terminating `0`.
    pub(crate) fn model(&self) -> Option<Vec<i32>> {
        let pattern = Regex::new(r"(?m)^v ([-\d ]*)$").expect("valid regex");
        let captures = pattern.captures(&self.stdout)?;

        let mut literals = captures[1]
            .split_whitespace()
            .map(|code| code.parse::<i32>().expect("the model holds integers"))
            .collect::<Vec<_>>();
        assert_eq!(literals.pop(), Some(0), "the model is terminated by 0");
        Some(literals)
    }
}

/// The path of a CNF instance in `tests/cnf`.
pub(crate) fn instance_path(instance_name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/cnf/{instance_name}.cnf",
        env!("CARGO_MANIFEST_DIR")
    ))
}

/// A fresh directory for the files of one test.
pub(crate) fn scratch_directory(test_name: &str) -> PathBuf {
    let directory = std::env::temp_dir().join(format!(
        "incsat-solver-{test_name}-{}",
        std::process::id()
    ));
    if directory.exists() {
        std::fs::remove_dir_all(&directory).expect("Failed to clear the scratch directory.");
    }
    std::fs::create_dir_all(&directory).expect("Failed to create the scratch directory.");
    directory
}

/// Writes the clauses in DIMACS CNF to `path`.
pub(crate) fn write_cnf(path: &Path, num_variables: usize, clauses: &[Vec<i32>]) {
    let mut contents = format!("p cnf {num_variables} {}\n", clauses.len());
    for clause in clauses {
        for literal in clause {
            contents.push_str(&format!("{literal} "));
        }
        contents.push_str("0\n");
    }

    std::fs::write(path, contents).expect("Failed to write the instance.");
}

/// Every pigeon sits in a hole, and no two pigeons share one. Unsatisfiable if there are more
/// pigeons than holes.
pub(crate) fn pigeon_hole(pigeons: usize, holes: usize) -> (usize, Vec<Vec<i32>>) {
    let variable = |pigeon: usize, hole: usize| (pigeon * holes + hole + 1) as i32;
    let mut clauses = vec![];

    for pigeon in 0..pigeons {
        clauses.push((0..holes).map(|hole| variable(pigeon, hole)).collect());
    }
    for hole in 0..holes {
        for first in 0..pigeons {
            for second in first + 1..pigeons {
                clauses.push(vec![-variable(first, hole), -variable(second, hole)]);
            }
        }
    }

    (pigeons * holes, clauses)
}

/// Whether every clause of the instance at `path` is satisfied by `model`.
pub(crate) fn satisfies(path: &Path, model: &[i32]) -> bool {
    let contents = std::fs::read_to_string(path).expect("Failed to read the instance.");

    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('c') && !line.starts_with('p'))
        .all(|line| {
            line.split_whitespace()
                .map(|code| code.parse::<i32>().expect("clauses hold integers"))
                .take_while(|&code| code != 0)
                .any(|code| model.contains(&code))
        })
}

/// Starts the solver with its output redirected to files in `scratch`.
pub(crate) fn spawn_solver<Arg: AsRef<OsStr>>(
    args: impl IntoIterator<Item = Arg>,
    scratch: &Path,
) -> Child {
    let solver = PathBuf::from(env!("CARGO_BIN_EXE_incsat-solver"));

    Command::new(solver)
        .args(args)
        .stdout(
            File::create(scratch.join("solver.log")).expect("Failed to create the log file."),
        )
        .stderr(
            File::create(scratch.join("solver.err")).expect("Failed to create the error file."),
        )
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.")
}

/// Waits for a solver started by [`spawn_solver`] and collects its output.
pub(crate) fn wait_for_solver(mut child: Child, scratch: &Path) -> SolverRun {
    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs())
        }
        Err(e) => panic!("error waiting for solver: {e}"),
    };

    SolverRun {
        status,
        stdout: std::fs::read_to_string(scratch.join("solver.log"))
            .expect("Failed to read the log file."),
        stderr: std::fs::read_to_string(scratch.join("solver.err"))
            .expect("Failed to read the error file."),
    }
}

pub(crate) fn run_solver<Arg: AsRef<OsStr>>(
    args: impl IntoIterator<Item = Arg>,
    scratch: &Path,
) -> SolverRun {
    let child = spawn_solver(args, scratch);
    wait_for_solver(child, scratch)
}
