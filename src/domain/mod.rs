pub(crate) mod measurement;
mod history;
mod timing;
mod http;
mod tls;
mod target;
mod error;

pub use measurement::Measurement;
pub use history::HistoryStore;
pub use timing::{Boundary, PhaseTimer, PhaseDurations, format_duration};
pub use http::{HttpSummary, StatusClass};
pub use tls::TlsSummary;
pub use target::{ResolvedTarget, IpFamily};
pub use error::{ErrorClass, ResptimeError};
