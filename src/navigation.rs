use log::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
}

impl View {
    pub fn href(self) -> &'static str {
        match self {
            View::Login => "./",
            View::Dashboard => "./?view=dashboard",
        }
    }

    /// Picks the view from `location.search`. Anything unrecognised is the
    /// login view.
    pub fn from_search(search: &str) -> Self {
        let query = search.trim_start_matches('?');
        let is_dashboard = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "view" && value == "dashboard");
        if is_dashboard {
            View::Dashboard
        } else {
            View::Login
        }
    }

    pub fn current() -> Self {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .map(|search| View::from_search(&search))
            .unwrap_or(View::Login)
    }
}

pub fn navigate(view: View) {
    debug!("navigating to {:?}", view);
    if let Some(window) = web_sys::window() {
        if window.location().set_href(view.href()).is_err() {
            error!("could not navigate to {}", view.href());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_marker_selects_dashboard() {
        assert_eq!(View::from_search("?view=dashboard"), View::Dashboard);
        assert_eq!(View::from_search("?lang=en&view=dashboard"), View::Dashboard);
    }

    #[test]
    fn everything_else_is_login() {
        assert_eq!(View::from_search(""), View::Login);
        assert_eq!(View::from_search("?view=admin"), View::Login);
        assert_eq!(View::from_search("?dashboard"), View::Login);
    }
}
