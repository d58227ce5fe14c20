//! Reading DIMACS CNF instances.
//!
//! The source is read line by line and every literal is handed to a [`CnfTarget`] as soon as it is
//! read. For a [`Session`] this means literals go straight into its clause buffer, and the `0`
//! which ends a clause commits it; an empty clause is therefore treated according to the
//! [`EmptyClausePolicy`](incsat_core::EmptyClausePolicy) of the session. Clauses may span several
//! lines, and several clauses may share one.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::str::FromStr;

use incsat_core::session::SessionError;
use incsat_core::Session;
use incsat_core::SessionOptions;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DimacsParseError {
    #[error("failed to read the instance")]
    Io(#[from] std::io::Error),

    #[error("the instance has no 'p cnf' header")]
    MissingHeader,

    #[error("line {line}: '{header}' is not a 'p cnf <variables> <clauses>' header")]
    InvalidHeader { line: usize, header: String },

    #[error("line {line}: the instance has a second header")]
    DuplicateHeader { line: usize },

    #[error("line {line}: '{token}' is not a DIMACS literal")]
    InvalidLiteral { line: usize, token: String },

    #[error("the last clause is not terminated with a '0'")]
    UnterminatedClause,

    #[error("the header announces {expected} clauses, but {parsed} were read")]
    IncorrectClauseCount { expected: usize, parsed: usize },

    #[error("line {line}: {source}")]
    RejectedClause {
        line: usize,
        #[source]
        source: SessionError,
    },
}

/// The `p cnf <variables> <clauses>` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CnfHeader {
    pub(crate) num_variables: usize,
    pub(crate) num_clauses: usize,
}

impl FromStr for CnfHeader {
    type Err = ();

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_ascii_whitespace();
        if fields.next() != Some("p") || fields.next() != Some("cnf") {
            return Err(());
        }

        let mut count = || fields.next().and_then(|field| field.parse::<usize>().ok());
        let header = CnfHeader {
            num_variables: count().ok_or(())?,
            num_clauses: count().ok_or(())?,
        };

        match fields.next() {
            None => Ok(header),
            Some(_) => Err(()),
        }
    }
}

/// Receives the contents of an instance from [`read_cnf`].
pub(crate) trait CnfTarget {
    /// Called once, before any literal.
    fn begin(&mut self, header: CnfHeader);

    fn add_literal(&mut self, code: i32) -> Result<(), SessionError>;

    /// Ends the clause made of the literals added since the previous call.
    fn end_clause(&mut self) -> Result<(), SessionError>;
}

impl CnfTarget for Session {
    fn begin(&mut self, header: CnfHeader) {
        while self.num_variables() < header.num_variables {
            let _ = self.create_variable();
        }
    }

    fn add_literal(&mut self, code: i32) -> Result<(), SessionError> {
        self.stage_literal(code)
    }

    fn end_clause(&mut self) -> Result<(), SessionError> {
        // A contradiction is latched by the session and reported when solving.
        let _ = self.commit_clause()?;
        Ok(())
    }
}

/// Reads an instance into a new session.
pub(crate) fn read_session(
    source: impl Read,
    options: SessionOptions,
) -> Result<Session, DimacsParseError> {
    let mut session = Session::new(options);
    let _ = read_cnf(source, &mut session)?;
    Ok(session)
}

/// Reads an instance into `target` and returns its header.
pub(crate) fn read_cnf(
    source: impl Read,
    target: &mut impl CnfTarget,
) -> Result<CnfHeader, DimacsParseError> {
    let mut reader = BufReader::new(source);
    let mut line = String::new();
    let mut line_number = 0;

    let mut header = None;
    let mut num_clauses = 0;
    let mut clause_is_open = false;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_number += 1;

        let content = line.trim();
        if content.is_empty() || content.starts_with('c') {
            continue;
        }

        if content.starts_with('p') {
            if header.is_some() {
                return Err(DimacsParseError::DuplicateHeader { line: line_number });
            }
            let parsed = content
                .parse::<CnfHeader>()
                .map_err(|_| DimacsParseError::InvalidHeader {
                    line: line_number,
                    header: content.to_owned(),
                })?;
            target.begin(parsed);
            header = Some(parsed);
            continue;
        }

        if header.is_none() {
            return Err(DimacsParseError::MissingHeader);
        }

        for token in content.split_ascii_whitespace() {
            let code = parse_literal(token).ok_or_else(|| DimacsParseError::InvalidLiteral {
                line: line_number,
                token: token.to_owned(),
            })?;
            let rejected = |source| DimacsParseError::RejectedClause {
                line: line_number,
                source,
            };

            if code == 0 {
                target.end_clause().map_err(rejected)?;
                num_clauses += 1;
                clause_is_open = false;
            } else {
                target.add_literal(code).map_err(rejected)?;
                clause_is_open = true;
            }
        }
    }

    let header = header.ok_or(DimacsParseError::MissingHeader)?;
    if clause_is_open {
        return Err(DimacsParseError::UnterminatedClause);
    }
    if num_clauses != header.num_clauses {
        return Err(DimacsParseError::IncorrectClauseCount {
            expected: header.num_clauses,
            parsed: num_clauses,
        });
    }

    Ok(header)
}

/// An optionally negated decimal number; `-0` is not a literal.
fn parse_literal(token: &str) -> Option<i32> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    let is_number = !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit());
    if !is_number || token == "-0" {
        return None;
    }

    token.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use incsat_core::EmptyClausePolicy;
    use incsat_core::SolveResult;

    use super::*;

    /// Collects the clauses as they are read.
    #[derive(Debug, Default)]
    struct Clauses {
        header: Option<CnfHeader>,
        clauses: Vec<Vec<i32>>,
        current: Vec<i32>,
    }

    impl CnfTarget for Clauses {
        fn begin(&mut self, header: CnfHeader) {
            self.header = Some(header);
        }

        fn add_literal(&mut self, code: i32) -> Result<(), SessionError> {
            self.current.push(code);
            Ok(())
        }

        fn end_clause(&mut self) -> Result<(), SessionError> {
            self.clauses.push(std::mem::take(&mut self.current));
            Ok(())
        }
    }

    fn read_clauses(source: &str) -> Vec<Vec<i32>> {
        let mut clauses = Clauses::default();
        let _ = read_cnf(source.as_bytes(), &mut clauses).expect("valid dimacs");
        clauses.clauses
    }

    fn read_error(source: &str) -> DimacsParseError {
        read_cnf(source.as_bytes(), &mut Clauses::default()).expect_err("invalid dimacs")
    }

    #[test]
    fn clauses_are_read_in_order() {
        let source = "c a comment\np cnf 11 2\n1 -2 10 0\nc another one\n-1 2 -11 0";

        assert_eq!(read_clauses(source), vec![vec![1, -2, 10], vec![-1, 2, -11]]);
    }

    #[test]
    fn header_is_announced_and_returned() {
        let mut clauses = Clauses::default();
        let header = read_cnf("p  cnf 4 0\n".as_bytes(), &mut clauses).expect("valid dimacs");

        let expected = CnfHeader {
            num_variables: 4,
            num_clauses: 0,
        };
        assert_eq!(header, expected);
        assert_eq!(clauses.header, Some(expected));
    }

    #[test]
    fn clauses_may_span_and_share_lines() {
        let source = "\n  p cnf 2 3\n 1\n-2 0 -1 2\n 0 0\n\n";

        assert_eq!(read_clauses(source), vec![vec![1, -2], vec![-1, 2], vec![]]);
    }

    #[test]
    fn malformed_literals_are_reported_with_their_line() {
        for token in ["-0", "+1", "1a", "--2", "-"] {
            let source = format!("p cnf 2 1\n1 {token} 0\n");

            assert!(matches!(
                read_error(&source),
                DimacsParseError::InvalidLiteral { line: 2, token: found } if found == token
            ));
        }
    }

    #[test]
    fn incomplete_clause_causes_error() {
        assert!(matches!(
            read_error("p cnf 2 1\n1 -2"),
            DimacsParseError::UnterminatedClause
        ));
    }

    #[test]
    fn incorrect_reported_clause_count() {
        assert!(matches!(
            read_error("p cnf 2 2\n1 -2 0"),
            DimacsParseError::IncorrectClauseCount {
                expected: 2,
                parsed: 1
            }
        ));
    }

    #[test]
    fn clauses_before_the_header_are_rejected() {
        assert!(matches!(
            read_error("1 2 0\np cnf 2 1\n"),
            DimacsParseError::MissingHeader
        ));
        assert!(matches!(read_error("c nothing\n"), DimacsParseError::MissingHeader));
    }

    #[test]
    fn headers_other_than_cnf_are_rejected() {
        assert!(matches!(
            read_error("p wcnf 2 1 3\n3 1 0\n"),
            DimacsParseError::InvalidHeader { line: 1, .. }
        ));
        assert!(matches!(
            read_error("p cnf 2 1\np cnf 2 1\n"),
            DimacsParseError::DuplicateHeader { line: 2 }
        ));
    }

    #[test]
    fn session_receives_the_clauses() {
        let mut session = read_session(
            "p cnf 3 2\n1 2 0\n-1 0\n".as_bytes(),
            SessionOptions::default(),
        )
        .expect("valid dimacs");

        assert_eq!(session.num_variables(), 3);
        assert_eq!(session.commit_count(), 2);
        assert_eq!(session.solve(), SolveResult::Satisfiable);
        assert!(session.value_of(2).expect("fresh model"));
    }

    #[test]
    fn session_rejects_literals_it_cannot_represent() {
        let error = read_session(
            "p cnf 1 1\n1 -2147483648 0\n".as_bytes(),
            SessionOptions::default(),
        )
        .expect_err("the literal has no variable");

        assert!(matches!(
            error,
            DimacsParseError::RejectedClause {
                line: 2,
                source: SessionError::Literal(_)
            }
        ));
    }

    #[test]
    fn empty_clause_follows_the_session_policy() {
        let source = "p cnf 1 1\n0\n";

        let rejected = read_session(source.as_bytes(), SessionOptions::default())
            .expect_err("the empty clause is rejected by default");
        assert!(matches!(
            rejected,
            DimacsParseError::RejectedClause {
                line: 2,
                source: SessionError::EmptyClause
            }
        ));

        let session = read_session(
            source.as_bytes(),
            SessionOptions {
                empty_clause_policy: EmptyClausePolicy::AssertFalse,
                ..Default::default()
            },
        )
        .expect("valid dimacs");
        assert!(!session.is_consistent());
    }
}
