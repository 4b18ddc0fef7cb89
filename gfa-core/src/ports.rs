mod reader;
mod sink;
mod solver;

pub use reader::TimeSeriesReader;
pub use sink::AggregateSink;
pub use solver::{FlowSolver, SolverInput};
