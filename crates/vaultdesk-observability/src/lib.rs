//! # Vaultdesk Observability
//!
//! - [`logging`]: tracing subscriber setup and request logging middleware
//! - [`metrics`]: Prometheus recorder, `/metrics` rendering and HTTP metrics middleware
//!
//! ```no_run
//! use vaultdesk_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     let _guard = init_tracing();
//!     let _metrics = init_metrics();
//!     // ... application code ...
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{REQUEST_ID_HEADER, init_tracing, logging_middleware};
pub use metrics::{init_metrics, metrics_middleware, render_metrics, track_admin_login};
pub use metrics_exporter_prometheus::PrometheusHandle;
