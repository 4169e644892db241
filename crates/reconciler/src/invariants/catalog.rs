//! Invariant catalog for [`crate::Reconciler`].
#![allow(dead_code)]

/// At most one task per stream may be inside `run` at any time.
///
/// - Enforced in: `Inner::promote`, `Inner::finish`
/// - Tested by: [`crate::invariants::test_single_running_task_per_stream`]
/// - Failure symptom: Overlapping requests to the same service race and apply results out of order.
pub(crate) const SINGLE_RUNNING_TASK_PER_STREAM: () = ();

/// A stream holds at most one entry in its debounce window, and every `schedule` restarts it.
///
/// - Enforced in: [`crate::Reconciler::schedule`], `Inner::arm_timer`, `Inner::on_timer`
/// - Tested by: [`crate::invariants::test_burst_of_conflicting_schedules_runs_only_the_last`], [`crate::invariants::test_last_task_waits_full_quiet_period_after_burst`]
/// - Failure symptom: Typing bursts start one request per keystroke instead of one after the user pauses.
pub(crate) const SINGLE_DEBOUNCE_SLOT: () = ();

/// Every future returned by `schedule` must resolve exactly once.
///
/// - Enforced in: `Entry::supersede`, `Inner::finish`, `Inner::dispose`, [`crate::Scheduled`]
/// - Tested by: [`crate::invariants::test_every_scheduled_future_settles`]
/// - Failure symptom: Call sites awaiting a superseded or disposed task hang forever.
pub(crate) const EVERY_SCHEDULED_FUTURE_SETTLES: () = ();

/// Scheduling a task cancels every queued task it conflicts with before `schedule` returns.
///
/// - Enforced in: [`crate::Reconciler::schedule`]
/// - Tested by: [`crate::invariants::test_burst_of_conflicting_schedules_runs_only_the_last`]
/// - Failure symptom: Stale values are pushed to the service after a newer edit replaced them.
pub(crate) const CONFLICTING_SCHEDULE_SUPERSEDES_QUEUED_WORK: () = ();

/// Non-conflicting tasks run in the order they were scheduled, and none is dropped.
///
/// Each task's future settles before the next task's `run` begins.
///
/// - Enforced in: [`crate::Reconciler::schedule`] (flush to the back of the ready queue), `Inner::promote`, `Inner::finish`
/// - Tested by: [`crate::invariants::test_non_conflicting_tasks_all_run_in_submission_order`]
/// - Failure symptom: An edit to one field is lost when another field is edited within the debounce window.
pub(crate) const SURVIVORS_RUN_IN_SUBMISSION_ORDER: () = ();

/// Every transition to idle wakes the callers blocked in `idle`.
///
/// - Enforced in: `Inner::on_timer`, `Inner::finish`, `Inner::dispose`
/// - Tested by: [`crate::invariants::test_idle_waiters_wake_when_stream_drains`]
/// - Failure symptom: Shutdown hangs after the last queued task was cancelled from outside.
pub(crate) const IDLE_WAITERS_WAKE_WHEN_STREAM_DRAINS: () = ();

/// A task cancelled while queued is never started.
///
/// - Enforced in: [`crate::Reconciler::schedule`], `Inner::promote`
/// - Tested by: [`crate::invariants::test_cancelled_entries_are_never_promoted`]
/// - Failure symptom: Work the caller abandoned still reaches the service.
pub(crate) const CANCELLED_ENTRIES_ARE_NEVER_PROMOTED: () = ();

/// Disposal resolves every not-yet-started task before `dispose` returns and starts nothing afterwards.
///
/// - Enforced in: `Inner::dispose`, `Inner::promote`, `Inner::on_timer`
/// - Tested by: [`crate::invariants::test_dispose_settles_queued_work_synchronously`]
/// - Failure symptom: Closing an editor leaves timers that later call into a dead service.
pub(crate) const DISPOSAL_SETTLES_QUEUED_WORK_SYNCHRONOUSLY: () = ();

/// The state lock must never be held across an await or while calling `run`, `cancel`, or delivering an outcome.
///
/// - Enforced in: every `Inner` method; `await_holding_lock` lint
/// - Tested by: [`crate::invariants::test_task_may_schedule_from_inside_run`]
/// - Failure symptom: A task that schedules follow-up work from `run` deadlocks its stream.
pub(crate) const STATE_LOCK_NEVER_HELD_ACROSS_AWAIT: () = ();
