//! Wall-clock abstraction shared by the auth client and token stores.
//!
//! Expiry arithmetic and request timestamps read "now" through [`Clock`], so a
//! [`ManualClock`] can drive the whole client through token lifetimes without waiting.

// self
use crate::_prelude::*;

/// Source of the current UTC instant.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current instant.
	fn now(&self) -> OffsetDateTime;

	/// Returns the current instant as whole seconds since the Unix epoch.
	fn unix_timestamp(&self) -> i64 {
		self.now().unix_timestamp()
	}
}

/// Real system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Clock that only moves when told to; clones share the same instant.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock frozen at `instant`.
	pub fn at(instant: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(instant)))
	}

	/// Moves the clock forward (or backward, for negative values) by `delta`.
	pub fn advance(&self, delta: Duration) {
		*self.0.lock() += delta;
	}

	/// Pins the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}
}
impl Default for ManualClock {
	/// Starts at the current system time, truncated to whole seconds.
	fn default() -> Self {
		let now = OffsetDateTime::now_utc();

		Self::at(now.replace_nanosecond(0).unwrap_or(now))
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}

/// Default clock handle used when callers do not inject one.
pub(crate) fn system() -> Arc<dyn Clock> {
	Arc::new(SystemClock)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn manual_clock_advances_across_clones() {
		let clock = ManualClock::at(macros::datetime!(2025-03-01 08:00 UTC));
		let shared = clock.clone();

		clock.advance(Duration::minutes(6));

		assert_eq!(shared.now(), macros::datetime!(2025-03-01 08:06 UTC));
		assert_eq!(
			shared.unix_timestamp(),
			macros::datetime!(2025-03-01 08:06 UTC).unix_timestamp()
		);

		shared.set(macros::datetime!(2025-03-02 00:00 UTC));

		assert_eq!(clock.now(), macros::datetime!(2025-03-02 00:00 UTC));
	}

	#[test]
	fn system_clock_tracks_wall_time() {
		let before = OffsetDateTime::now_utc();
		let observed = SystemClock.now();

		assert!(observed >= before);
		assert!(observed - before < Duration::seconds(5));
	}
}
