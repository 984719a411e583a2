/// Execution classes used for task placement and trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Latency-sensitive work that feeds the interactive owner, such as debounce timers.
	Interactive,
	/// Async supervision work that can lag behind without user-visible effect.
	Background,
	/// CPU-bound traversal executed on the blocking pool.
	CpuBlocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
			Self::CpuBlocking => "cpu_blocking",
		}
	}
}
