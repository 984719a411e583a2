use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

/// Runtime for callers outside tokio, such as a synchronous host driving the picker.
static FALLBACK: OnceLock<Runtime> = OnceLock::new();

fn runtime_handle() -> Handle {
	Handle::try_current().unwrap_or_else(|_| {
		FALLBACK
			.get_or_init(|| {
				Builder::new_multi_thread()
					.enable_all()
					.worker_threads(2)
					.thread_name("sieve-fallback")
					.build()
					.expect("failed to build sieve fallback runtime")
			})
			.handle()
			.clone()
	})
}

/// Spawns an async task tagged with `class`.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

/// Spawns blocking work tagged with `class`.
pub fn spawn_blocking<F, R>(class: TaskClass, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn_blocking");
	runtime_handle().spawn_blocking(f)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spawn_outside_runtime_uses_fallback() {
		let handle = spawn_blocking(TaskClass::CpuBlocking, || 21 * 2);
		let value = runtime_handle().block_on(handle).expect("blocking task joins");
		assert_eq!(value, 42);
	}

	#[tokio::test]
	async fn spawn_inside_runtime_uses_current_handle() {
		let value = spawn(TaskClass::Interactive, async { "ready" }).await.expect("task joins");
		assert_eq!(value, "ready");
	}
}
