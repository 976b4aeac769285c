//! Declaration periods and the injected clock.

pub mod clock;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use types::{PeriodError, PeriodKey, YearMonth};
