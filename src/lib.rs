// Library for tests to access modules

pub mod config;
pub mod docker_repo;
pub mod format;
pub mod models;
pub mod tui;
pub mod version;
pub mod view;
pub mod worker;
