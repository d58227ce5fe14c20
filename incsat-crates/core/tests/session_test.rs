#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use incsat_core::instrumentation::InstrumentationRecorder;
use incsat_core::session::SessionError;
use incsat_core::EmptyClausePolicy;
use incsat_core::Session;
use incsat_core::SessionOptions;
use incsat_core::SolveResult;

fn commit(session: &mut Session, clause: &[i32]) -> bool {
    for &literal in clause {
        session.stage_literal(literal).expect("non-zero literal");
    }
    session.commit_clause().expect("accepted clause")
}

#[test]
fn exactly_one_of_two() {
    let mut session = Session::default();
    assert!(commit(&mut session, &[1, 2]));
    assert!(commit(&mut session, &[-1, -2]));

    assert_eq!(session.solve(), SolveResult::Satisfiable);

    let first = session.value_of(1).expect("fresh model");
    let second = session.value_of(2).expect("fresh model");
    assert_ne!(first, second);
}

#[test]
fn contradicting_units() {
    let mut session = Session::default();
    assert!(commit(&mut session, &[1]));
    assert!(!commit(&mut session, &[-1]));

    assert_eq!(session.solve(), SolveResult::Unsatisfiable);
    assert_eq!(session.solve(), SolveResult::Unsatisfiable);
}

#[test]
fn two_named_instances_are_recorded_in_completion_order() {
    let mut recorder = InstrumentationRecorder::default();

    for (name, clauses) in [
        ("first", vec![vec![1, 2], vec![-1, -2]]),
        ("second", vec![vec![1], vec![-1]]),
    ] {
        let mut session = Session::default();
        for clause in &clauses {
            let _ = commit(&mut session, clause);
        }

        let run = recorder.begin(&session, name);
        let result = session.solve();
        let _ = recorder.finish(run, &session, result);
    }

    let records = recorder.run_log().records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].instance_name, "first");
    assert_eq!(records[0].result, SolveResult::Satisfiable);
    assert_eq!(records[1].instance_name, "second");
    assert_eq!(records[1].result, SolveResult::Unsatisfiable);
    assert!(records.iter().all(|record| record.cpu_time_seconds >= 0.0));
}

#[test]
fn never_satisfied_session_has_no_values() {
    let mut session = Session::default();
    assert!(matches!(session.value_of(1), Err(SessionError::StaleQuery)));

    let _ = commit(&mut session, &[1]);
    let _ = commit(&mut session, &[-1]);
    let _ = session.solve();

    assert!(matches!(session.value_of(1), Err(SessionError::StaleQuery)));
}

#[test]
fn staged_variables_exist_after_commit() {
    let mut session = Session::default();
    for literal in [4, -9, 2] {
        session.stage_literal(literal).expect("non-zero literal");
    }
    let _ = session.commit_clause().expect("accepted clause");

    assert!(session.num_variables() >= 9);
}

#[test]
fn repeated_commit_is_counted_twice() {
    let mut session = Session::default();
    session.stage_literal(1).expect("non-zero literal");
    session.stage_literal(2).expect("non-zero literal");

    assert!(session.commit_clause().expect("accepted clause"));
    assert!(matches!(
        session.commit_clause(),
        Err(SessionError::EmptyClause)
    ));

    assert_eq!(session.commit_count(), 2);
    assert_eq!(session.empty_commit_count(), 1);
    assert!(session.is_consistent());
    assert_eq!(session.solve(), SolveResult::Satisfiable);
}

#[test]
fn discard_then_commit_asserts_false_when_allowed() {
    let mut session = Session::new(SessionOptions {
        empty_clause_policy: EmptyClausePolicy::AssertFalse,
        ..SessionOptions::default()
    });
    session.stage_literal(3).expect("non-zero literal");
    session.discard_clause();

    assert!(!session.commit_clause().expect("empty clauses are asserted"));
    assert_eq!(session.commit_count(), 1);
    assert_eq!(session.empty_commit_count(), 1);
    assert_eq!(session.solve(), SolveResult::Unsatisfiable);
}

#[test]
fn assumptions_never_leak_into_the_next_solve() {
    let mut session = Session::default();
    let _ = commit(&mut session, &[1, 2]);

    for result in [SolveResult::Unsatisfiable, SolveResult::Satisfiable] {
        if result == SolveResult::Unsatisfiable {
            session.stage_assumption(-1).expect("non-zero literal");
            session.stage_assumption(-2).expect("non-zero literal");
        }

        assert_eq!(session.solve(), result);
        assert!(session.staged_assumptions().is_empty());
    }
}

#[test]
fn incremental_solving_with_growing_clauses() {
    let mut session = Session::default();
    let _ = commit(&mut session, &[1, 2, 3]);

    let mut blocked = 0;
    while session.solve() == SolveResult::Satisfiable {
        let blocking_clause = (1..=3)
            .map(|variable| {
                if session.value_of(variable).expect("fresh model") {
                    -variable
                } else {
                    variable
                }
            })
            .collect::<Vec<_>>();
        let _ = commit(&mut session, &blocking_clause);
        blocked += 1;
    }

    // Every assignment except all-false satisfies the clause.
    assert_eq!(blocked, 7);
}
