//! Optional observability helpers for auth client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each operation inside a `shopee_auth.op` span with the `op`
//!   (operation) and `stage` (call site) fields, and to log failures at `warn`.
//! - Enable `metrics` to increment the `shopee_auth_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

// self
use crate::_prelude::*;

/// Auth client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Authorization code exchange.
	CodeExchange,
	/// Refresh token exchange.
	Refresh,
	/// Valid-token lookup that may refresh under the hood.
	ValidToken,
	/// Token removal for logout or revocation.
	Clear,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::CodeExchange => "code_exchange",
			OpKind::Refresh => "refresh",
			OpKind::ValidToken => "valid_token",
			OpKind::Clear => "clear",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` as one observed Shopee auth operation, recording the attempt and final outcome.
pub(crate) async fn observe<T, Fut>(kind: OpKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	record(kind, OpOutcome::Attempt);

	#[cfg(feature = "tracing")]
	let result = {
		use tracing::Instrument;

		fut.instrument(tracing::info_span!("shopee_auth.op", op = kind.as_str(), stage)).await
	};
	#[cfg(not(feature = "tracing"))]
	let result = {
		let _ = stage;

		fut.await
	};

	match &result {
		Ok(_) => record(kind, OpOutcome::Success),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(op = kind.as_str(), stage, error = %_e, "Shopee auth operation failed.");

			record(kind, OpOutcome::Failure);
		},
	}

	result
}

fn record(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!("shopee_auth_op_total", "op" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}
