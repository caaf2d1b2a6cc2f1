//! Attribute mutation events
//!
//! The attribute store reports every change of a raw attribute string to
//! the live value registered for that name.

/// Receiver of attribute mutations for one attribute
pub trait AttrObserver {
    /// The attribute was set while absent
    fn attr_added(&self, value: &str);

    /// The attribute changed from `old` to `new`
    fn attr_modified(&self, old: &str, new: &str);

    /// The attribute was removed
    fn attr_removed(&self, old: &str);
}

/// Kind of attribute mutation, for logging and dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttrChange {
    Added,
    Modified,
    Removed,
}

impl AttrChange {
    /// Classify a write from the previous and next values
    pub fn classify(old: Option<&str>, new: Option<&str>) -> Option<Self> {
        match (old, new) {
            (None, Some(_)) => Some(Self::Added),
            (Some(_), Some(_)) => Some(Self::Modified),
            (Some(_), None) => Some(Self::Removed),
            (None, None) => None,
        }
    }

    /// Deliver this change to an observer
    pub fn dispatch(self, observer: &dyn AttrObserver, old: Option<&str>, new: Option<&str>) {
        match self {
            Self::Added => observer.attr_added(new.unwrap_or_default()),
            Self::Modified => observer.attr_modified(old.unwrap_or_default(), new.unwrap_or_default()),
            Self::Removed => observer.attr_removed(old.unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl AttrObserver for Recorder {
        fn attr_added(&self, value: &str) {
            self.0.borrow_mut().push(format!("added {}", value));
        }
        fn attr_modified(&self, old: &str, new: &str) {
            self.0.borrow_mut().push(format!("modified {} -> {}", old, new));
        }
        fn attr_removed(&self, old: &str) {
            self.0.borrow_mut().push(format!("removed {}", old));
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(AttrChange::classify(None, Some("1")), Some(AttrChange::Added));
        assert_eq!(AttrChange::classify(Some("1"), Some("2")), Some(AttrChange::Modified));
        assert_eq!(AttrChange::classify(Some("1"), None), Some(AttrChange::Removed));
        assert_eq!(AttrChange::classify(None, None), None);
    }

    #[test]
    fn test_dispatch() {
        let recorder = Recorder::default();
        AttrChange::Added.dispatch(&recorder, None, Some("a"));
        AttrChange::Modified.dispatch(&recorder, Some("a"), Some("b"));
        AttrChange::Removed.dispatch(&recorder, Some("b"), None);
        assert_eq!(
            *recorder.0.borrow(),
            vec!["added a", "modified a -> b", "removed b"]
        );
    }
}
