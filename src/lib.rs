pub mod aggregator;
pub mod config;
pub mod error;
pub mod io_struct;
pub mod logging;
pub mod relay_state;
pub mod server;
pub mod upstream;
