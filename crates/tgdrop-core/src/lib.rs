pub mod config;
pub mod logging;

pub mod fetch;
pub mod intake;
pub mod name_model;
pub mod queue;
pub mod reply;
pub mod request;
pub mod transport;
pub mod validate;
