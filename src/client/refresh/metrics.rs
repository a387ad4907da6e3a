// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Thread-safe counters describing how valid tokens were produced.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	reused: AtomicU64,
	exchanges: AtomicU64,
	rotated: AtomicU64,
	rejected: AtomicU64,
	errored: AtomicU64,
}
impl RefreshMetrics {
	/// Returns how often a stored token was handed out without a refresh.
	pub fn reused(&self) -> u64 {
		self.reused.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh exchanges sent to Shopee.
	pub fn exchanges(&self) -> u64 {
		self.exchanges.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes whose new tokens were stored.
	pub fn rotated(&self) -> u64 {
		self.rotated.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh tokens Shopee rejected.
	pub fn rejected(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that failed for any other reason.
	pub fn errored(&self) -> u64 {
		self.errored.load(Ordering::Relaxed)
	}

	/// Copies every counter at once.
	pub fn snapshot(&self) -> RefreshSnapshot {
		RefreshSnapshot {
			reused: self.reused(),
			exchanges: self.exchanges(),
			rotated: self.rotated(),
			rejected: self.rejected(),
			errored: self.errored(),
		}
	}

	pub(crate) fn record_reuse(&self) {
		self.reused.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_exchange(&self) {
		self.exchanges.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_result<T>(&self, result: &Result<T>) {
		let counter = match result {
			Ok(_) => &self.rotated,
			Err(Error::RefreshFailed { .. }) => &self.rejected,
			Err(_) => &self.errored,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}

/// Point-in-time copy of [`RefreshMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSnapshot {
	/// Stored tokens handed out without a refresh.
	pub reused: u64,
	/// Refresh exchanges sent to Shopee.
	pub exchanges: u64,
	/// Refreshes whose new tokens were stored.
	pub rotated: u64,
	/// Refresh tokens rejected by Shopee.
	pub rejected: u64,
	/// Refreshes that failed for any other reason.
	pub errored: u64,
}
