//! MiniBank web client: a login view and an account dashboard, compiled to
//! WebAssembly with Yew.
//!
//! Browser-independent logic (validation, session rules, filtering, display
//! models) lives in plain modules and is tested on the host. `components`
//! is the only layer that touches the DOM.

pub mod bank;
pub mod components;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod login;
pub mod model;
pub mod navigation;
pub mod session;
pub mod storage;
