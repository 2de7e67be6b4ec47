mod app;
mod dashboard_page;
mod icons;
mod login_page;

use std::time::Duration;

pub use app::{App, AppProps, Services};
pub use dashboard_page::DashboardPage;
pub use login_page::LoginPage;

/// Browser timers take milliseconds as `u32`.
fn timer_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}
