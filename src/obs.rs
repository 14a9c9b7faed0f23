//! Optional observability helpers for the three credential legs.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_flow.leg` with the `leg` and
//!   `stage` (flow stage at entry) fields, plus `http.status` once a credential endpoint
//!   answers and `failure` when the leg fails.
//! - Enable `metrics` to increment the `oauth1_flow_leg_total` counter for every
//!   attempt/success/failure, labeled by `leg` + `outcome`; failures also carry `reason`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Legs of the three-legged exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Leg {
	/// `POST {base}/oauth/initiate`.
	TemporaryCredentials,
	/// Resource owner approval in the browser.
	Authorization,
	/// `POST {base}/oauth/token`.
	TokenCredentials,
}
impl Leg {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Leg::TemporaryCredentials => "temporary_credentials",
			Leg::Authorization => "authorization",
			Leg::TokenCredentials => "token_credentials",
		}
	}
}
impl Display for Leg {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a leg.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
