use std::rc::Rc;

use yew::prelude::*;

use super::{DashboardPage, LoginPage};
use crate::bank::{build_bank, BankService};
use crate::config::AppConfig;
use crate::navigation::View;

#[derive(Clone)]
pub struct Services {
    pub bank: Rc<dyn BankService>,
    pub config: Rc<AppConfig>,
}

impl Services {
    pub fn new(config: Rc<AppConfig>) -> Self {
        Self {
            bank: build_bank(&config),
            config,
        }
    }
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bank, &other.bank) && Rc::ptr_eq(&self.config, &other.config)
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let services = {
        let config = props.config.clone();
        use_memo(move |_| Services::new(config), ())
    };

    // every navigation is a full page load, so the view is fixed per mount
    let content = match View::current() {
        View::Login => html! { <LoginPage /> },
        View::Dashboard => html! { <DashboardPage /> },
    };

    html! {
        <ContextProvider<Services> context={(*services).clone()}>
            { content }
        </ContextProvider<Services>>
    }
}

#[hook]
pub(super) fn use_services() -> Services {
    use_context::<Services>().unwrap_or_else(|| Services::new(Rc::new(AppConfig::default())))
}
