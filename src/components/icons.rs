use yew::prelude::*;

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_eye() -> Html {
    icon_base("M1 12s4-8 11-8 11 8 11 8-4 8-11 8-11-8-11-8zM12 9a3 3 0 100 6 3 3 0 000-6z")
}
pub fn icon_eye_off() -> Html {
    icon_base("M17.94 17.94A10.07 10.07 0 0112 20c-7 0-11-8-11-8a18.45 18.45 0 015.06-5.94M9.9 4.24A9.12 9.12 0 0112 4c7 0 11 8 11 8a18.5 18.5 0 01-2.16 3.19M1 1l22 22")
}
pub fn icon_arrow_right() -> Html {
    icon_base("M5 12h14M12 5l7 7-7 7")
}
pub fn icon_spinner() -> Html {
    icon_base("M12 2a10 10 0 1010 10")
}
pub fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_alert() -> Html {
    icon_base("M12 8v4M12 16h.01M12 2a10 10 0 100 20 10 10 0 000-20z")
}
