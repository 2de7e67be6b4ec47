use std::rc::Rc;

use minibank_frontend::components::{App, AppProps};
use minibank_frontend::config::AppConfig;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));

    let config = AppConfig::from_env().unwrap_or_else(|err| {
        log::error!("invalid configuration, falling back to the demo bank: {}", err);
        AppConfig::default()
    });

    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
