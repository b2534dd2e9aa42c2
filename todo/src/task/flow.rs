//! Named status predicates used by task command handlers.
//!
//! The `is_valid_*` checks currently share one rule but stay separate so each
//! command can evolve its own guard.

use crate::types::TaskStatus;

/// The task is completed
#[must_use]
pub fn ensure_completed(status: TaskStatus) -> bool {
    status == TaskStatus::Completed
}

/// The task is deleted
#[must_use]
pub fn ensure_deleted(status: TaskStatus) -> bool {
    status == TaskStatus::Deleted
}

/// The task is neither completed nor deleted
#[must_use]
pub fn ensure_neither_completed_nor_deleted(status: TaskStatus) -> bool {
    !ensure_completed(status) && !ensure_deleted(status)
}

/// `UpdateTaskPriority` may run in `status`
#[must_use]
pub fn is_valid_update_task_priority_command(status: TaskStatus) -> bool {
    ensure_neither_completed_nor_deleted(status)
}

/// `UpdateTaskDueDate` may run in `status`
#[must_use]
pub fn is_valid_update_task_due_date_command(status: TaskStatus) -> bool {
    ensure_neither_completed_nor_deleted(status)
}

/// `RemoveLabelFromTask` may run in `status`
#[must_use]
pub fn is_valid_task_status_to_remove_label(status: TaskStatus) -> bool {
    ensure_neither_completed_nor_deleted(status)
}

/// `AssignLabelToTask` may run in `status`
#[must_use]
pub fn is_valid_assign_label_to_task_command(status: TaskStatus) -> bool {
    ensure_neither_completed_nor_deleted(status)
}

/// `CreateDraft` may run in `status`
#[must_use]
pub fn is_valid_create_draft_command(status: TaskStatus) -> bool {
    ensure_neither_completed_nor_deleted(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neither_completed_nor_deleted_for_every_status() {
        for status in TaskStatus::ALL {
            let expected = !(status == TaskStatus::Completed || status == TaskStatus::Deleted);
            assert_eq!(ensure_neither_completed_nor_deleted(status), expected, "{status:?}");
        }
    }

    #[test]
    fn command_predicates_follow_shared_rule() {
        let predicates: [fn(TaskStatus) -> bool; 5] = [
            is_valid_update_task_priority_command,
            is_valid_update_task_due_date_command,
            is_valid_task_status_to_remove_label,
            is_valid_assign_label_to_task_command,
            is_valid_create_draft_command,
        ];

        for predicate in predicates {
            for status in TaskStatus::ALL {
                assert_eq!(predicate(status), ensure_neither_completed_nor_deleted(status));
            }
        }
    }

    #[test]
    fn direct_status_checks() {
        assert!(ensure_completed(TaskStatus::Completed));
        assert!(!ensure_completed(TaskStatus::Open));
        assert!(ensure_deleted(TaskStatus::Deleted));
        assert!(!ensure_deleted(TaskStatus::Draft));
    }
}
