//! Delete confirmation
//!
//! Each section has a single pending-delete slot. Requesting a second
//! delete before the first is confirmed replaces the target, and the
//! confirmation dialog always names the record that will actually go.

use crate::domain::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub kind: EntityKind,
    pub id: u64,
    pub label: String,
}

impl DeleteTarget {
    /// Prompt shown in the confirmation dialog
    pub fn prompt(&self) -> String {
        if self.label.trim().is_empty() {
            format!(
                "Delete {} #{}? This cannot be undone.",
                self.kind.label().to_lowercase(),
                self.id
            )
        } else {
            format!(
                "Delete {} \"{}\"? This cannot be undone.",
                self.kind.label().to_lowercase(),
                self.label.trim()
            )
        }
    }
}

#[derive(Debug, Default)]
pub struct DeleteConfirmation {
    pending: Option<DeleteTarget>,
}

impl DeleteConfirmation {
    /// Arm the slot. Returns the target that was replaced, if any.
    pub fn request(&mut self, target: DeleteTarget) -> Option<DeleteTarget> {
        let replaced = self.pending.replace(target);
        if let (Some(old), Some(new)) = (&replaced, &self.pending) {
            if old != new {
                tracing::warn!(
                    replaced = old.id,
                    pending = new.id,
                    "delete target replaced before confirmation"
                );
            }
        }
        replaced
    }

    pub fn pending(&self) -> Option<&DeleteTarget> {
        self.pending.as_ref()
    }

    /// Take the target to delete, leaving the slot empty
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn target(id: u64, label: &str) -> DeleteTarget {
        DeleteTarget {
            kind: EntityKind::Author,
            id,
            label: label.into(),
        }
    }

    #[test]
    fn test_second_request_replaces_first() {
        let mut confirm = DeleteConfirmation::default();
        assert_eq!(confirm.request(target(1, "A")), None);
        assert_eq!(confirm.request(target(2, "B")), Some(target(1, "A")));

        assert_eq!(confirm.pending().map(|t| t.id), Some(2));
        assert_eq!(confirm.confirm(), Some(target(2, "B")));
        assert_eq!(confirm.confirm(), None);
    }

    #[test]
    fn test_cancel_clears_slot() {
        let mut confirm = DeleteConfirmation::default();
        confirm.request(target(1, "A"));
        confirm.cancel();
        assert!(confirm.pending().is_none());
    }

    #[test]
    fn test_prompt_names_target() {
        assert_eq!(
            target(7, "Ali Valiyev").prompt(),
            "Delete author \"Ali Valiyev\"? This cannot be undone."
        );
        assert_eq!(
            target(7, " ").prompt(),
            "Delete author #7? This cannot be undone."
        );
    }
}
