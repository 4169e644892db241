//! Machine-checkable invariant catalog and proof entrypoints for the reconciler.
#![allow(dead_code)]

pub(crate) mod catalog;

#[allow(unused_imports)]
pub(crate) use catalog::{
	CANCELLED_ENTRIES_ARE_NEVER_PROMOTED, CONFLICTING_SCHEDULE_SUPERSEDES_QUEUED_WORK,
	DISPOSAL_SETTLES_QUEUED_WORK_SYNCHRONOUSLY, EVERY_SCHEDULED_FUTURE_SETTLES, IDLE_WAITERS_WAKE_WHEN_STREAM_DRAINS,
	SINGLE_DEBOUNCE_SLOT,
	SINGLE_RUNNING_TASK_PER_STREAM, STATE_LOCK_NEVER_HELD_ACROSS_AWAIT, SURVIVORS_RUN_IN_SUBMISSION_ORDER,
};

#[cfg(doc)]
pub(crate) async fn test_single_running_task_per_stream() {}

#[cfg(doc)]
pub(crate) async fn test_burst_of_conflicting_schedules_runs_only_the_last() {}

#[cfg(doc)]
pub(crate) async fn test_last_task_waits_full_quiet_period_after_burst() {}

#[cfg(doc)]
pub(crate) async fn test_every_scheduled_future_settles() {}

#[cfg(doc)]
pub(crate) async fn test_non_conflicting_tasks_all_run_in_submission_order() {}

#[cfg(doc)]
pub(crate) async fn test_idle_waiters_wake_when_stream_drains() {}

#[cfg(doc)]
pub(crate) async fn test_cancelled_entries_are_never_promoted() {}

#[cfg(doc)]
pub(crate) async fn test_dispose_settles_queued_work_synchronously() {}

#[cfg(doc)]
pub(crate) async fn test_task_may_schedule_from_inside_run() {}

#[cfg(test)]
mod proofs;

#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use proofs::{
	test_burst_of_conflicting_schedules_runs_only_the_last, test_cancelled_entries_are_never_promoted,
	test_dispose_settles_queued_work_synchronously, test_every_scheduled_future_settles,
	test_idle_waiters_wake_when_stream_drains,
	test_last_task_waits_full_quiet_period_after_burst, test_non_conflicting_tasks_all_run_in_submission_order,
	test_single_running_task_per_stream, test_task_may_schedule_from_inside_run,
};
