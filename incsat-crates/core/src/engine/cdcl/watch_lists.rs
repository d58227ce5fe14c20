use super::clause_database::ClauseDatabase;
use super::clause_database::ClauseReference;
use crate::basic_types::Literal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Watcher {
    pub(crate) clause: ClauseReference,
    /// Some other literal of the clause; if it is true the clause does not need to be visited.
    pub(crate) blocker: Literal,
}

/// For every literal, the clauses which need to be visited when that literal becomes true, i.e.
/// the clauses watching its negation.
#[derive(Debug, Default)]
pub(crate) struct WatchLists {
    watchers: Vec<Vec<Watcher>>,
}

impl WatchLists {
    pub(crate) fn grow(&mut self) {
        self.watchers.push(vec![]);
        self.watchers.push(vec![]);
    }

    /// Watch the first two literals of `literals`, which is stored under `clause`.
    pub(crate) fn watch_clause(&mut self, clause: ClauseReference, literals: &[Literal]) {
        self.watchers[(!literals[0]).to_index()].push(Watcher {
            clause,
            blocker: literals[1],
        });
        self.watchers[(!literals[1]).to_index()].push(Watcher {
            clause,
            blocker: literals[0],
        });
    }

    pub(crate) fn push(&mut self, triggered_by: Literal, watcher: Watcher) {
        self.watchers[triggered_by.to_index()].push(watcher);
    }

    /// Take the watchers triggered by `literal` out, so they can be processed while other lists
    /// are modified. They have to be handed back with [`WatchLists::restore`].
    pub(crate) fn take(&mut self, literal: Literal) -> Vec<Watcher> {
        std::mem::take(&mut self.watchers[literal.to_index()])
    }

    pub(crate) fn restore(&mut self, literal: Literal, watchers: Vec<Watcher>) {
        debug_assert!(self.watchers[literal.to_index()].is_empty());
        self.watchers[literal.to_index()] = watchers;
    }

    pub(crate) fn remove_deleted(&mut self, clause_database: &ClauseDatabase) {
        for list in &mut self.watchers {
            list.retain(|watcher| !clause_database.is_deleted(watcher.clause));
        }
    }
}
