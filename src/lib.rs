//! Per-phase timing of single HTTP(S) requests with an interactive terminal
//! front end.
//!
//! `domain` holds plain data, `ports` the I/O seams, `infrastructure` the
//! tokio/hickory/rustls/hyper implementations of those seams and
//! `application` the measurement pipeline and the session controller.

pub mod domain;
pub mod ports;
pub mod infrastructure;
pub mod application;
pub mod logging;
pub mod tui;
