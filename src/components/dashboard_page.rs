use std::rc::Rc;

use chrono::Local;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::app::use_services;
use super::icons::{icon_log_out, icon_spinner, icon_wallet};
use crate::bank::simulate_latency;
use crate::dashboard::{
    logout, quick_action_ack, Activation, DashboardState, DashboardView, TransactionFilter,
    TransactionsPanel, QUICK_ACTIONS,
};
use crate::error::FetchError;
use crate::model::Transaction;
use crate::navigation::navigate;
use crate::session::SessionStore;

/// `dashboard` stays `None` until the session check has passed.
#[derive(Default, PartialEq)]
struct PageState {
    dashboard: Option<DashboardState>,
}

enum PageAction {
    Activated(DashboardState),
    Loaded(Result<Vec<Transaction>, FetchError>),
    Filter(TransactionFilter),
    ShowAll,
}

impl Reducible for PageState {
    type Action = PageAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match (action, &self.dashboard) {
            (PageAction::Activated(state), _) => state,
            (PageAction::Loaded(result), Some(current)) => {
                let mut next = current.clone();
                next.apply_fetch(result);
                next
            }
            (PageAction::Filter(filter), Some(current)) => {
                let mut next = current.clone();
                next.set_filter(filter);
                next
            }
            (PageAction::ShowAll, Some(current)) => {
                let mut next = current.clone();
                next.show_all();
                next
            }
            (_, None) => return self,
        };
        Rc::new(PageState {
            dashboard: Some(next),
        })
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let services = use_services();
    let page = use_reducer(PageState::default);
    let warming_up = use_state(|| true);

    {
        let page = page.clone();
        let warming_up = warming_up.clone();
        let services = services.clone();

        use_effect_with_deps(
            move |_| {
                match DashboardState::activate(&SessionStore::browser()) {
                    Activation::Redirect(view) => navigate(view),
                    Activation::Ready(mut state) => {
                        spawn_local(async move {
                            simulate_latency(services.config.timings.dashboard_warmup).await;

                            let account_number = state.profile().account_number.clone();
                            state.begin_loading();
                            page.dispatch(PageAction::Activated(state));
                            warming_up.set(false);

                            let result = services.bank.fetch_transactions(&account_number).await;
                            page.dispatch(PageAction::Loaded(result));
                        });
                    }
                }
                || ()
            },
            (),
        );
    }

    let Some(state) = page.dashboard.as_ref().filter(|_| !*warming_up) else {
        return html! {
            <div id="loadingOverlay" class="loading-overlay">
                { icon_spinner() }
                <p>{"Loading your dashboard..."}</p>
            </div>
        };
    };
    let view = state.view(Local::now().date_naive());

    let on_filter_change = {
        let page = page.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            page.dispatch(PageAction::Filter(TransactionFilter::from_value(&select.value())));
        })
    };

    let on_view_all = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| {
            page.dispatch(PageAction::ShowAll);
            if let Some(card) = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("transactionsCard"))
            {
                card.scroll_into_view();
            }
        })
    };

    let on_logout = Callback::from(|_: MouseEvent| navigate(logout(&SessionStore::browser())));

    html! {
        <div class="dashboard">
            <nav class="navbar">
                <div class="brand">
                    { icon_wallet() }
                    <span>{"MiniBank"}</span>
                </div>
                <div class="user-info">
                    <span id="userName">{ view.profile.user_name.clone() }</span>
                    <span id="userAccount">{ view.profile.user_account.clone() }</span>
                    <button id="logoutBtn" class="logout-btn" onclick={on_logout}>
                        { icon_log_out() }
                        <span>{"Logout"}</span>
                    </button>
                </div>
            </nav>

            <main class="dashboard-content">
                { profile_cards(&view) }
                { quick_actions() }
                { transactions_card(&view, on_filter_change, on_view_all) }
            </main>
        </div>
    }
}

fn profile_cards(view: &DashboardView) -> Html {
    let profile = &view.profile;
    html! {
        <div class="cards-row">
            <div class="card balance-card">
                <p class="card-label">{"Available Balance"}</p>
                <h2 id="balanceAmount">{ profile.balance.clone() }</h2>
                <p id="accountType" class="card-sub">{ profile.account_type.clone() }</p>
            </div>

            <div class="card customer-card">
                <p class="card-label">{"Customer Details"}</p>
                <dl>
                    <dt>{"Name"}</dt>
                    <dd id="customerName">{ profile.customer_name.clone() }</dd>
                    <dt>{"Account"}</dt>
                    <dd id="customerAccount">{ profile.customer_account.clone() }</dd>
                    <dt>{"Mobile"}</dt>
                    <dd id="customerMobile">{ profile.customer_mobile.clone() }</dd>
                    <dt>{"Email"}</dt>
                    <dd id="customerEmail">{ profile.customer_email.clone() }</dd>
                </dl>
            </div>
        </div>
    }
}

fn quick_actions() -> Html {
    html! {
        <div class="card quick-actions">
            <p class="card-label">{"Quick Actions"}</p>
            <div class="actions-grid">
                { for QUICK_ACTIONS.into_iter().map(|action| {
                    let onclick = Callback::from(move |_: MouseEvent| {
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&quick_action_ack(action));
                        }
                    });
                    html! {
                        <button class="action-btn" {onclick}>
                            <span>{ action }</span>
                        </button>
                    }
                }) }
            </div>
        </div>
    }
}

fn transactions_card(
    view: &DashboardView,
    on_filter_change: Callback<Event>,
    on_view_all: Callback<MouseEvent>,
) -> Html {
    let body = match &view.panel {
        TransactionsPanel::Loading => html! {
            <div id="transactionsLoading" class="transactions-loading">
                { icon_spinner() }
                <span>{"Loading transactions..."}</span>
            </div>
        },
        TransactionsPanel::Empty => html! {
            <div id="emptyState" class="empty-state">
                <p>{"No transactions found"}</p>
            </div>
        },
        TransactionsPanel::Rows(rows) => html! {
            <table class="transactions-table">
                <thead>
                    <tr>
                        <th>{"Date"}</th>
                        <th>{"Description"}</th>
                        <th>{"Reference"}</th>
                        <th class="amount-col">{"Amount"}</th>
                        <th>{"Status"}</th>
                    </tr>
                </thead>
                <tbody id="transactionsBody">
                    { for rows.iter().enumerate().map(|(idx, row)| html! {
                        <tr key={idx} data-id={row.id.clone()}>
                            <td>{ row.date.clone() }</td>
                            <td>{ row.description.clone() }</td>
                            <td>{ row.reference.clone() }</td>
                            <td class={classes!("amount-col", row.amount_class)}>{ row.amount.clone() }</td>
                            <td>
                                <span class={classes!("transaction-status", row.status_class.clone())}>
                                    { row.status_label.clone() }
                                </span>
                            </td>
                        </tr>
                    }) }
                </tbody>
            </table>
        },
    };

    html! {
        <div id="transactionsCard" class="card transactions-card">
            <div class="card-header">
                <h3>
                    {"Recent Transactions "}
                    <span id="transactionCount" class="count-badge">{ view.transaction_count.to_string() }</span>
                </h3>
                <div class="card-controls">
                    <select id="transactionFilter" onchange={on_filter_change}>
                        { for TransactionFilter::OPTIONS.into_iter().map(|filter| html! {
                            <option value={filter.value()} selected={filter == view.filter}>
                                { filter.label() }
                            </option>
                        }) }
                    </select>
                    <button id="viewAllBtn" class="view-all-btn" onclick={on_view_all}>{"View All"}</button>
                </div>
            </div>
            { body }
        </div>
    }
}
