//! State stack of one run.

use crate::definition::rule::{StateId, Transition};

/// Active states, bottom first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateStack {
    entries: Vec<StateId>,
    initial: Vec<StateId>,
}

/// A pop that would have removed the bottom entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Underflow {
    pub count: usize,
    pub depth: usize,
}

impl StateStack {
    pub fn new(initial: Vec<StateId>) -> Self {
        debug_assert!(!initial.is_empty());
        StateStack {
            entries: initial.clone(),
            initial,
        }
    }

    pub fn top(&self) -> StateId {
        self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn initial_len(&self) -> usize {
        self.initial.len()
    }

    pub fn entries(&self) -> &[StateId] {
        &self.entries
    }

    pub fn push(&mut self, state: StateId) {
        self.entries.push(state);
    }

    /// Removes `count` entries. Leaves the stack untouched on underflow.
    pub fn pop(&mut self, count: usize) -> Result<(), Underflow> {
        if count >= self.entries.len() {
            return Err(Underflow {
                count,
                depth: self.entries.len(),
            });
        }
        let keep = self.entries.len() - count;
        self.entries.truncate(keep);
        Ok(())
    }

    pub fn goto(&mut self, state: StateId) {
        let top = self.entries.len() - 1;
        self.entries[top] = state;
    }

    pub fn push_self(&mut self) {
        self.entries.push(self.top());
    }

    pub fn reset(&mut self) {
        self.entries.clone_from(&self.initial);
    }

    pub fn apply(&mut self, transition: Transition) -> Result<(), Underflow> {
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.push(state),
            Transition::Pop(count) => self.pop(count)?,
            Transition::Goto(state) => self.goto(state),
            Transition::PushSelf => self.push_self(),
            Transition::Reset => self.reset(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = StateStack::new(vec![0]);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.top(), 2);
        stack.pop(2).unwrap();
        assert_eq!(stack.entries(), &[0]);
    }

    #[test]
    fn test_pop_never_removes_bottom() {
        let mut stack = StateStack::new(vec![0]);
        stack.push(1);
        assert_eq!(stack.pop(2), Err(Underflow { count: 2, depth: 2 }));
        assert_eq!(stack.entries(), &[0, 1]);
        assert_eq!(stack.pop(1), Ok(()));
        assert_eq!(stack.pop(1), Err(Underflow { count: 1, depth: 1 }));
    }

    #[test]
    fn test_goto_replaces_top() {
        let mut stack = StateStack::new(vec![0, 1]);
        stack.goto(3);
        assert_eq!(stack.entries(), &[0, 3]);
    }

    #[test]
    fn test_push_self_and_reset() {
        let mut stack = StateStack::new(vec![0, 4]);
        stack.apply(Transition::PushSelf).unwrap();
        stack.apply(Transition::Push(2)).unwrap();
        assert_eq!(stack.entries(), &[0, 4, 4, 2]);
        stack.apply(Transition::Reset).unwrap();
        assert_eq!(stack.entries(), &[0, 4]);
        assert_eq!(stack.initial_len(), 2);
    }
}
