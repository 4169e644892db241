//! Machine-checkable invariant proofs for the reconciler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{Instant, sleep, timeout};

use crate::test_support::{Journal, ScriptedTask};
use crate::{CancelFlag, Reconciler, Task};

fn reconciler(debounce_ms: u64) -> Reconciler<ScriptedTask> {
	let _ = tracing_subscriber::fmt::try_init();
	Reconciler::new("proof", Duration::from_millis(debounce_ms))
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_single_running_task_per_stream() {
	let journal = Journal::new();
	let rec = reconciler(10);

	let scheduled: Vec<_> = ["a", "b", "c", "d", "e"]
		.into_iter()
		.map(|name| rec.schedule(ScriptedTask::new(&journal, name, name).hold(50)).unwrap())
		.collect();
	for outcome in join_all(scheduled).await {
		outcome.unwrap();
	}

	assert_eq!(journal.max_active(), 1);
	assert_eq!(journal.finished(), vec!["a", "b", "c", "d", "e"]);
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_burst_of_conflicting_schedules_runs_only_the_last() {
	let journal = Journal::new();
	let rec = reconciler(800);

	let mut scheduled = Vec::new();
	for name in ["a", "b", "c", "d"] {
		scheduled.push(rec.schedule(ScriptedTask::new(&journal, name, "value")).unwrap());
		sleep(Duration::from_millis(50)).await;
	}
	let last = scheduled.pop().unwrap();
	for earlier in scheduled {
		assert!(earlier.now_or_never().unwrap().unwrap_err().is_superseded());
	}

	assert_eq!(last.await.unwrap(), "d");
	assert_eq!(journal.started(), vec!["d"]);
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_last_task_waits_full_quiet_period_after_burst() {
	let journal = Journal::new();
	let rec = reconciler(800);

	let mut last_at = Instant::now();
	let mut last = None;
	for name in ["a", "b", "c", "d"] {
		last_at = Instant::now();
		last = Some(rec.schedule(ScriptedTask::new(&journal, name, "value")).unwrap());
		sleep(Duration::from_millis(50)).await;
	}
	last.unwrap().await.unwrap();

	let started = journal.started_at("d").unwrap();
	assert!(started - last_at >= Duration::from_millis(800));
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_every_scheduled_future_settles() {
	let journal = Journal::new();
	let rec = reconciler(50);

	let failed = rec.schedule(ScriptedTask::new(&journal, "f", "w").failing()).unwrap();
	assert!(failed.await.unwrap_err().failure().is_some());

	let scheduled = vec![
		rec.schedule(ScriptedTask::new(&journal, "a", "x").hold(100)).unwrap(),
		rec.schedule(ScriptedTask::new(&journal, "b", "y")).unwrap(),
		rec.schedule(ScriptedTask::new(&journal, "c", "y")).unwrap(),
		rec.schedule(ScriptedTask::new(&journal, "d", "z")).unwrap(),
	];
	sleep(Duration::from_millis(10)).await;
	rec.dispose();

	let outcomes = timeout(Duration::from_secs(60), join_all(scheduled)).await.unwrap();
	let disposed = outcomes.iter().filter(|o| matches!(o, Err(e) if e.is_disposed())).count();
	let superseded = outcomes.iter().filter(|o| matches!(o, Err(e) if e.is_superseded())).count();
	assert_eq!((disposed, superseded), (1, 3));

	rec.idle().await;
	let totals = rec.snapshot().totals;
	assert_eq!(totals.scheduled, 5);
	assert_eq!(totals.settled(), totals.scheduled);
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_non_conflicting_tasks_all_run_in_submission_order() {
	let journal = Journal::new();
	let rec = reconciler(100);

	let mut awaiters = Vec::new();
	for name in ["a", "b", "c"] {
		let scheduled = rec.schedule(ScriptedTask::new(&journal, name, name).hold(30)).unwrap();
		let journal = Arc::clone(&journal);
		awaiters.push(tokio::spawn(async move {
			let output = scheduled.await;
			journal.settled(name);
			output
		}));
		sleep(Duration::from_millis(20)).await;
	}
	let outputs: Vec<_> = join_all(awaiters).await.into_iter().map(|joined| joined.unwrap().unwrap()).collect();

	assert_eq!(outputs, vec!["a", "b", "c"]);
	assert_eq!(journal.started(), vec!["a", "b", "c"]);
	assert_eq!(
		journal.events(),
		vec!["start a", "settled a", "start b", "settled b", "start c", "settled c"]
	);
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_idle_waiters_wake_when_stream_drains() {
	let journal = Journal::new();
	let rec = reconciler(50);

	let task = ScriptedTask::new(&journal, "a", "a");
	let flag = task.flag();
	let cancelled = rec.schedule(task).unwrap();
	let waiter = tokio::spawn({
		let rec = rec.clone();
		async move { rec.idle().await }
	});
	tokio::task::yield_now().await;
	flag.cancel();
	timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
	assert!(cancelled.await.unwrap_err().is_superseded());

	let _done = rec.schedule(ScriptedTask::new(&journal, "b", "b").hold(20)).unwrap();
	let waiter = tokio::spawn({
		let rec = rec.clone();
		async move { rec.idle().await }
	});
	timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
	assert_eq!(journal.finished(), vec!["b"]);

	let _dropped = rec.schedule(ScriptedTask::new(&journal, "c", "c")).unwrap();
	let waiter = tokio::spawn({
		let rec = rec.clone();
		async move { rec.idle().await }
	});
	tokio::task::yield_now().await;
	rec.dispose();
	timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
	assert!(rec.is_idle());
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_cancelled_entries_are_never_promoted() {
	let journal = Journal::new();
	let gate = Arc::new(Notify::new());
	let rec = reconciler(20);

	let blocker = rec.schedule(ScriptedTask::new(&journal, "g", "g").gated(&gate)).unwrap();
	sleep(Duration::from_millis(30)).await;

	let queued = ScriptedTask::new(&journal, "a", "a");
	let queued_flag = queued.flag();
	let queued = rec.schedule(queued).unwrap();
	let pending = ScriptedTask::new(&journal, "b", "b");
	let pending_flag = pending.flag();
	let pending = rec.schedule(pending).unwrap();

	queued_flag.cancel();
	pending_flag.cancel();
	sleep(Duration::from_millis(30)).await;
	gate.notify_one();

	assert_eq!(blocker.await.unwrap(), "g");
	assert!(queued.await.unwrap_err().is_superseded());
	assert!(pending.await.unwrap_err().is_superseded());
	rec.idle().await;
	assert_eq!(journal.started(), vec!["g"]);
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_dispose_settles_queued_work_synchronously() {
	let journal = Journal::new();
	let gate = Arc::new(Notify::new());
	let rec = reconciler(20);

	let running = rec.schedule(ScriptedTask::new(&journal, "g", "g").gated(&gate)).unwrap();
	sleep(Duration::from_millis(30)).await;
	let queued = rec.schedule(ScriptedTask::new(&journal, "a", "a")).unwrap();
	let pending = rec.schedule(ScriptedTask::new(&journal, "b", "b")).unwrap();

	rec.dispose();
	assert!(queued.now_or_never().unwrap().unwrap_err().is_superseded());
	assert!(pending.now_or_never().unwrap().unwrap_err().is_superseded());

	gate.notify_one();
	assert!(running.await.unwrap_err().is_disposed());
	sleep(Duration::from_secs(1)).await;
	assert_eq!(journal.started(), vec!["g"]);
}

/// Schedules a follow-up on its own stream from inside `run`.
struct ChainTask {
	stage: u8,
	stream: Arc<Mutex<Option<Reconciler<ChainTask>>>>,
	ran: Arc<Mutex<Vec<u8>>>,
	cancel: CancelFlag,
}

#[async_trait]
impl Task for ChainTask {
	type Output = u8;

	async fn run(&self) -> anyhow::Result<u8> {
		self.ran.lock().push(self.stage);
		if self.stage == 0 {
			let stream = self.stream.lock().clone();
			if let Some(stream) = stream {
				drop(stream.schedule(ChainTask {
					stage: 1,
					stream: Arc::clone(&self.stream),
					ran: Arc::clone(&self.ran),
					cancel: CancelFlag::new(),
				})?);
			}
		}
		Ok(self.stage)
	}

	fn conflicts(&self, _other: &Self) -> bool {
		false
	}

	fn cancel(&self) {
		self.cancel.cancel();
	}

	fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}
}

#[cfg_attr(test, tokio::test(start_paused = true))]
pub(crate) async fn test_task_may_schedule_from_inside_run() {
	let rec = Reconciler::new("chain", Duration::from_millis(10));
	let stream = Arc::new(Mutex::new(Some(rec.clone())));
	let ran = Arc::new(Mutex::new(Vec::new()));

	let first = rec
		.schedule(ChainTask {
			stage: 0,
			stream: Arc::clone(&stream),
			ran: Arc::clone(&ran),
			cancel: CancelFlag::new(),
		})
		.unwrap();
	assert_eq!(first.await.unwrap(), 0);
	rec.idle().await;

	assert_eq!(*ran.lock(), vec![0, 1]);
	stream.lock().take();
}
