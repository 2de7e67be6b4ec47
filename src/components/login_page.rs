use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::app::use_services;
use super::icons::{icon_alert, icon_arrow_right, icon_eye, icon_eye_off, icon_spinner};
use super::timer_millis;
use crate::login::{authenticate, ErrorBanner, LoginFlow, LoginForm, LoginPhase};
use crate::navigation::navigate;
use crate::session::SessionStore;

/// Shows `message` and schedules its expiry. A newer message keeps its own
/// full timeout.
fn show_error(
    banner: &Rc<RefCell<ErrorBanner>>,
    rerender: &UseForceUpdateHandle,
    message: &str,
    timeout: Duration,
) {
    let token = banner.borrow_mut().show(message);
    rerender.force_update();

    let banner = banner.clone();
    let rerender = rerender.clone();
    Timeout::new(timer_millis(timeout), move || {
        banner.borrow_mut().expire(token);
        rerender.force_update();
    })
    .forget();
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let services = use_services();
    let form = use_state(|| LoginForm::prefilled(&SessionStore::browser()));
    let flow = use_mut_ref(LoginFlow::new);
    let banner = use_mut_ref(ErrorBanner::default);
    let show_password = use_state(|| false);
    let rerender = use_force_update();

    let on_submit = {
        let form = form.clone();
        let flow = flow.clone();
        let banner = banner.clone();
        let rerender = rerender.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let submitted = (*form).clone();
            let error_timeout = services.config.timings.error_banner;

            let credentials = flow.borrow_mut().begin(&submitted);
            let Some(credentials) = credentials else {
                if let Some(msg) = flow.borrow().phase().error() {
                    show_error(&banner, &rerender, msg, error_timeout);
                }
                return;
            };
            rerender.force_update();

            let bank = services.bank.clone();
            let flow = flow.clone();
            let banner = banner.clone();
            let rerender = rerender.clone();
            spawn_local(async move {
                let result = authenticate(&*bank, &credentials).await;
                let phase = flow
                    .borrow_mut()
                    .finish(result, submitted.remember_me, &SessionStore::browser())
                    .clone();

                match phase {
                    LoginPhase::Redirecting(view) => navigate(view),
                    LoginPhase::ShowingError(msg) => {
                        show_error(&banner, &rerender, &msg, error_timeout)
                    }
                    LoginPhase::Idle | LoginPhase::Submitting => {}
                }
                rerender.force_update();
            });
        })
    };

    let on_account_input = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.account_number = input.value();
            form.set(next);
        })
    };

    let on_password_input = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.password = input.value();
            form.set(next);
        })
    };

    let on_remember_change = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.remember_me = input.checked();
            form.set(next);
        })
    };

    let toggle_password = {
        let show_password = show_password.clone();
        Callback::from(move |_: MouseEvent| show_password.set(!*show_password))
    };

    let phase = flow.borrow().phase().clone();
    let submitting = phase.is_submitting() || matches!(phase, LoginPhase::Redirecting(_));
    let error_message = banner.borrow().message().map(str::to_string);

    html! {
        <div class="login-container">
            <div class="login-card">
                <div class="login-header">
                    <h1>{"MiniBank"}</h1>
                    <p>{"Sign in to your account"}</p>
                </div>

                <form id="loginForm" class="login-form" onsubmit={on_submit}>
                    <div class="form-group">
                        <label>{"Account Number"}</label>
                        <input
                            id="accountNumber"
                            type="text"
                            inputmode="numeric"
                            maxlength="10"
                            placeholder="Enter 10-digit account number"
                            value={form.account_number.clone()}
                            oninput={on_account_input}
                        />
                    </div>

                    <div class="form-group">
                        <label>{"Password"}</label>
                        <div class="password-wrapper">
                            <input
                                id="password"
                                type={if *show_password { "text" } else { "password" }}
                                placeholder="Enter your password"
                                value={form.password.clone()}
                                oninput={on_password_input}
                            />
                            <button type="button" id="togglePassword" class="toggle-password" onclick={toggle_password}>
                                { if *show_password { icon_eye_off() } else { icon_eye() } }
                            </button>
                        </div>
                    </div>

                    <div class="form-options">
                        <label class="remember-me">
                            <input
                                id="rememberMe"
                                type="checkbox"
                                checked={form.remember_me}
                                onchange={on_remember_change}
                            />
                            <span>{"Remember me"}</span>
                        </label>
                    </div>

                    if let Some(msg) = error_message {
                        <div id="errorMessage" class="error-message">
                            { icon_alert() }
                            <span id="errorText">{ msg }</span>
                        </div>
                    }

                    <button type="submit" id="loginBtn" class="login-btn" disabled={submitting}>
                        if submitting {
                            <>
                                { icon_spinner() }
                                <span>{ phase.submit_label() }</span>
                            </>
                        } else {
                            <>
                                <span>{ phase.submit_label() }</span>
                                { icon_arrow_right() }
                            </>
                        }
                    </button>
                </form>

                <div class="demo-credentials">
                    <p>{"Demo: 1234567890 / demo123 or 9876543210 / test456"}</p>
                </div>
            </div>
        </div>
    }
}
