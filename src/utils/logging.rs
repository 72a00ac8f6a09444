use serde::Serialize;
use tracing::debug;

/// Dumps a freshly written record as pretty JSON under `[<tag>]`.
///
/// Serialization only happens when DEBUG is enabled.
pub(crate) fn debug_record<T: Serialize>(tag: &str, action: &str, record: &T) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    match serde_json::to_string_pretty(record) {
        Ok(body) => debug!(body = %body, "[{tag}] {action}"),
        Err(e) => debug!(error = %e, "[{tag}] {action} (record not serializable)"),
    }
}
