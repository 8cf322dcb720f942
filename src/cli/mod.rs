pub(crate) mod args;
pub(crate) mod mode;

pub(crate) use args::Cli;
pub(crate) use mode::Mode;
