/// Liveness probe.
pub async fn health() -> &'static str {
    "API running"
}
