//! Integration test suite modules

mod composer;
mod dispatch;
mod session;
mod settings;
