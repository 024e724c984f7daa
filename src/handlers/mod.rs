pub mod attendance_handler;
pub mod debug;
pub mod health;
pub mod leave_handler;
pub mod metrics;
pub mod policy_handler;
pub mod salary_reports_handler;

pub use debug::debug_handler;
pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
