// self
use crate::{
	_prelude::*,
	obs::{FlowOutcome, Leg},
};

/// Records a leg outcome via the global metrics recorder (when enabled).
pub fn record_leg_outcome(leg: Leg, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_flow_leg_total",
			"leg" => leg.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (leg, outcome);
	}
}

/// Records a failed leg, labeled with [`Error::reason`].
pub fn record_leg_failure(leg: Leg, error: &Error) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_flow_leg_total",
			"leg" => leg.as_str(),
			"outcome" => FlowOutcome::Failure.as_str(),
			"reason" => error.reason()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (leg, error);
	}
}
