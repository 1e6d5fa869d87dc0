//! Navigation history with back/forward support.

use crate::error::{CoreError, CoreResult, HistoryDirection};
use crate::nav::path::PathValue;

/// Browser-style history: a back stack, the current location, and a forward
/// stack.
///
/// The current path is never stored in either stack. Every move pushes the
/// location being left onto the opposite stack before the pointer changes, so
/// back/forward never lose a location. Reaching a new path by explicit
/// navigation clears the forward stack. Depth is unbounded; the history lives
/// as long as its pane.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    back_stack: Vec<PathValue>,
    current: PathValue,
    forward_stack: Vec<PathValue>,
}

impl NavigationHistory {
    /// Creates a history positioned at `start` with both stacks empty.
    pub fn new(start: PathValue) -> Self {
        Self {
            back_stack: Vec::new(),
            current: start,
            forward_stack: Vec::new(),
        }
    }

    /// Records an explicit navigation to `to`.
    ///
    /// Pushes the current path onto the back stack, clears the forward stack
    /// and makes `to` current. An earlier visit of `to` is dropped from the
    /// back stack so it only lives in `current`. Returns `false` (and changes
    /// nothing) when `to` already is the current path.
    pub fn record_navigation(&mut self, to: PathValue) -> bool {
        if to == self.current {
            return false;
        }
        self.back_stack.retain(|p| p != &to);
        let previous = std::mem::replace(&mut self.current, to);
        self.back_stack.push(previous);
        self.forward_stack.clear();
        true
    }

    /// Steps back one location and returns the new current path.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoHistory`] if the back stack is empty; nothing changes.
    pub fn go_back(&mut self) -> CoreResult<PathValue> {
        let target = self
            .back_stack
            .pop()
            .ok_or(CoreError::NoHistory(HistoryDirection::Back))?;
        let previous = std::mem::replace(&mut self.current, target);
        self.forward_stack.push(previous);
        Ok(self.current.clone())
    }

    /// Steps forward one location and returns the new current path.
    ///
    /// # Errors
    ///
    /// [`CoreError::NoHistory`] if the forward stack is empty; nothing changes.
    pub fn go_forward(&mut self) -> CoreResult<PathValue> {
        let target = self
            .forward_stack
            .pop()
            .ok_or(CoreError::NoHistory(HistoryDirection::Forward))?;
        let previous = std::mem::replace(&mut self.current, target);
        self.back_stack.push(previous);
        Ok(self.current.clone())
    }

    pub fn current(&self) -> &PathValue {
        &self.current
    }

    /// Back stack, oldest first.
    pub fn back_stack(&self) -> &[PathValue] {
        &self.back_stack
    }

    /// Forward stack, farthest first (the next `go_forward` target is last).
    pub fn forward_stack(&self) -> &[PathValue] {
        &self.forward_stack
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: &str) -> PathValue {
        PathValue::normalize(raw).unwrap()
    }

    fn paths(raws: &[&str]) -> Vec<PathValue> {
        raws.iter().map(|r| p(r)).collect()
    }

    #[test]
    fn new_history_is_empty() {
        let history = NavigationHistory::new(p("/home"));
        assert_eq!(history.current(), &p("/home"));
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn record_enables_go_back() {
        let mut history = NavigationHistory::new(p("/home"));
        assert!(history.record_navigation(p("/home/docs")));

        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
        assert_eq!(history.back_stack(), paths(&["/home"]).as_slice());
    }

    #[test]
    fn self_navigation_is_a_no_op() {
        let mut history = NavigationHistory::new(p("/home"));
        history.record_navigation(p("/home/docs"));

        assert!(!history.record_navigation(p("/home/docs/")));
        assert_eq!(history.back_stack(), paths(&["/home"]).as_slice());
        assert!(history.forward_stack().is_empty());
    }

    #[test]
    fn go_back_on_empty_fails_without_change() {
        let mut history = NavigationHistory::new(p("/home"));
        let err = history.go_back().unwrap_err();
        assert!(matches!(err, CoreError::NoHistory(HistoryDirection::Back)));
        assert_eq!(history.current(), &p("/home"));
    }

    #[test]
    fn go_forward_on_empty_fails_without_change() {
        let mut history = NavigationHistory::new(p("/home"));
        let err = history.go_forward().unwrap_err();
        assert!(matches!(err, CoreError::NoHistory(HistoryDirection::Forward)));
    }

    #[test]
    fn current_never_appears_in_stacks() {
        let mut history = NavigationHistory::new(p("/a"));
        history.record_navigation(p("/b"));
        history.record_navigation(p("/c"));
        history.go_back().unwrap();
        history.go_back().unwrap();
        history.go_forward().unwrap();

        let current = history.current().clone();
        assert!(!history.back_stack().contains(&current));
        assert!(!history.forward_stack().contains(&current));
    }

    #[test]
    fn revisiting_a_path_keeps_it_out_of_the_stacks() {
        let mut history = NavigationHistory::new(p("/a"));
        history.record_navigation(p("/b"));
        history.record_navigation(p("/a"));

        assert_eq!(history.current(), &p("/a"));
        assert_eq!(history.back_stack(), paths(&["/b"]).as_slice());

        history.record_navigation(p("/c"));
        history.record_navigation(p("/b"));
        assert_eq!(history.back_stack(), paths(&["/a", "/c"]).as_slice());

        assert_eq!(history.go_back().unwrap(), p("/c"));
        assert_eq!(history.go_back().unwrap(), p("/a"));
        assert!(!history.can_go_back());
        assert_eq!(history.forward_stack(), paths(&["/b", "/c"]).as_slice());
        let current = history.current().clone();
        assert!(!history.forward_stack().contains(&current));
    }

    #[test]
    fn browsing_scenario() {
        let mut history = NavigationHistory::new(p("/home"));

        history.record_navigation(p("/home/docs"));
        assert_eq!(history.current(), &p("/home/docs"));
        assert_eq!(history.back_stack(), paths(&["/home"]).as_slice());

        history.record_navigation(p("/home/docs/reports"));
        assert_eq!(
            history.back_stack(),
            paths(&["/home", "/home/docs"]).as_slice()
        );

        assert_eq!(history.go_back().unwrap(), p("/home/docs"));
        assert_eq!(
            history.forward_stack(),
            paths(&["/home/docs/reports"]).as_slice()
        );

        history.record_navigation(p("/home/pics"));
        assert_eq!(history.current(), &p("/home/pics"));
        assert!(history.forward_stack().is_empty());
        assert_eq!(
            history.back_stack(),
            paths(&["/home", "/home/docs"]).as_slice()
        );
    }

    #[test]
    fn back_k_then_forward_k_restores_current() {
        let mut history = NavigationHistory::new(p("/0"));
        for i in 1..=5 {
            history.record_navigation(p(&format!("/{i}")));
        }
        history.go_back().unwrap();
        let origin = history.current().clone();
        let depth = history.back_stack().len();

        for k in 0..=depth {
            for _ in 0..k {
                history.go_back().unwrap();
            }
            for _ in 0..k {
                history.go_forward().unwrap();
            }
            assert_eq!(history.current(), &origin, "k = {k}");
        }
    }

    #[test]
    fn divergent_navigation_invalidates_forward() {
        let mut history = NavigationHistory::new(p("/start"));
        history.record_navigation(p("/a"));
        history.go_back().unwrap();
        history.record_navigation(p("/c"));

        assert!(matches!(
            history.go_forward(),
            Err(CoreError::NoHistory(HistoryDirection::Forward))
        ));
    }

    #[test]
    fn clone_produces_independent_copy() {
        let mut history = NavigationHistory::new(p("/home"));
        history.record_navigation(p("/tmp"));

        let mut cloned = history.clone();
        cloned.go_back().unwrap();

        assert_eq!(history.current(), &p("/tmp"));
        assert_eq!(cloned.current(), &p("/home"));
    }
}
