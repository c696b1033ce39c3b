//! Cursor state of a record store.
//!
//! Up to two records can be pending ahead of the stream: a lookahead pulled
//! by `peek` and a record handed back by `stash`. The lookahead is always
//! delivered first. Transitions consume the old state and return the new one.

use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CursorState {
    /// Nothing pending; reads go to the stream
    #[default]
    Idle,
    Lookahead(Record),
    Stashed(Record),
    LookaheadThenStashed(Record, Record),
}

impl CursorState {
    /// Stashes `rec`, replacing any stash already pending.
    pub fn stash(self, rec: Record) -> Self {
        match self {
            CursorState::Idle | CursorState::Stashed(_) => CursorState::Stashed(rec),
            CursorState::Lookahead(ahead) | CursorState::LookaheadThenStashed(ahead, _) => {
                CursorState::LookaheadThenStashed(ahead, rec)
            }
        }
    }

    /// Removes the next pending record.
    pub fn take(self) -> (Option<Record>, Self) {
        match self {
            CursorState::Idle => (None, CursorState::Idle),
            CursorState::Lookahead(rec) | CursorState::Stashed(rec) => (Some(rec), CursorState::Idle),
            CursorState::LookaheadThenStashed(ahead, stashed) => {
                (Some(ahead), CursorState::Stashed(stashed))
            }
        }
    }

    /// The record `take` would return.
    pub fn front(&self) -> Option<&Record> {
        match self {
            CursorState::Idle => None,
            CursorState::Lookahead(rec)
            | CursorState::Stashed(rec)
            | CursorState::LookaheadThenStashed(rec, _) => Some(rec),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CursorState::Idle)
    }
}
