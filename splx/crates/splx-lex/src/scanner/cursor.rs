//! Per-document scan state.

use crate::rule_table::StateId;

/// Position and state stack of one scan.
///
/// The stack is never empty: its bottom element is the entry state and pops
/// stop there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanCursor<'s> {
    source: &'s str,
    offset: usize,
    stack: Vec<StateId>,
}

impl<'s> ScanCursor<'s> {
    /// A cursor at the start of `source` in state `entry`.
    pub fn new(source: &'s str, entry: StateId) -> Self {
        Self {
            source,
            offset: 0,
            stack: vec![entry],
        }
    }

    /// The text being scanned.
    #[inline]
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Current byte offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Active state (top of the stack).
    #[inline]
    pub fn state(&self) -> StateId {
        self.stack[self.stack.len() - 1]
    }

    /// Number of states on the stack, entry state included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True once the whole input has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// The unscanned rest of the input.
    pub fn remaining(&self) -> &'s str {
        &self.source[self.offset..]
    }

    pub(crate) fn advance_to(&mut self, offset: usize) {
        debug_assert!(offset > self.offset && offset <= self.source.len());
        self.offset = offset;
    }

    pub(crate) fn push_state(&mut self, state: StateId) {
        self.stack.push(state);
    }

    pub(crate) fn pop_state(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub(crate) fn reset_state(&mut self, entry: StateId) {
        self.stack.clear();
        self.stack.push(entry);
    }
}
