pub mod builders;

use std::sync::Once;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use plandag::logging::LOG_ENV;
use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness's captured writer.
///
/// Filtering uses the same `PLANDAG_LOG` directives as the binary and
/// defaults to `warn`, so only rejected updates and exhausted propagation
/// show up next to a failing test. Run with `-- --nocapture` to see output
/// from passing tests too.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}

/// Midnight UTC of day `n`, counted from 2015-03-01 (day 0).
pub fn day(n: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2015, 3, 1, 0, 0, 0)
        .single()
        .expect("fixed base date is valid");
    base + TimeDelta::days(n)
}

pub fn days(n: i64) -> TimeDelta {
    TimeDelta::days(n)
}
