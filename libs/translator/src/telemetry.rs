use sprout_relay_core::PostRecord;
use sprout_relay_telemetry::telemetry_enabled;

const TRANSLATE_SPAN_NAME: &str = "translate.run";
const TRANSLATE_COUNTER: &str = "messages_translated";

pub fn translate_with_span<T, F>(record: &PostRecord, to_platform: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let network = record.network.to_lowercase();
    let span = tracing::info_span!(
        TRANSLATE_SPAN_NAME,
        network = %network,
        profile = %record.profile_name,
        to_platform = %to_platform
    );
    let _guard = span.enter();
    let result = f();
    record_translation(network, to_platform, telemetry_enabled());
    result
}

/// Bumps the translation counter when exporters are on. Returns whether it did.
fn record_translation(network: String, to_platform: &'static str, enabled: bool) -> bool {
    if !enabled {
        return false;
    }
    metrics::counter!(
        TRANSLATE_COUNTER,
        "network" => network,
        "to_platform" => to_platform
    )
    .increment(1);
    true
}
