use std::any::Any;
use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("weft-reconciler-global")
			.build()
			.expect("failed to build weft-reconciler global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns stream-owned work (debounce timers and task runs).
///
/// Uses the ambient runtime when called from one, so host callbacks on plain
/// threads can still schedule work.
pub(crate) fn spawn<F>(stream: &str, fut: F) -> JoinHandle<()>
where
	F: Future<Output = ()> + Send + 'static,
{
	tracing::trace!(reconciler = stream, "reconciler.spawn");
	runtime_handle().spawn(fut)
}

/// Extracts the message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		(*msg).to_string()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"non-string panic payload".to_string()
	}
}
