// Preview sessions: one FitMonitor per open editor preview.
// The browser measures the rendered DOM; the service decides fit and drops stale results.

pub mod handlers;
pub mod sessions;
