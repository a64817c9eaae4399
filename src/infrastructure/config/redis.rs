use crate::domain::processor::ProcessorKind;

pub const PAYMENTS_SERIES_KEY_PREFIX: &str = "payments:series";

pub fn series_key(kind: ProcessorKind) -> String {
	format!("{PAYMENTS_SERIES_KEY_PREFIX}:{kind}")
}
