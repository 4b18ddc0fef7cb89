#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod fixture;

mod schedule;
pub use schedule::{Scheduler, latest_complete, run_networks};

mod cli;
pub use cli::{Cli, Commands, SolverArg};

mod config;
pub use config::AppConfig;

mod io;
pub use io::IOArgs;
