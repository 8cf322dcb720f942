//! Configuration: env files, the optional JSON config file, and the
//! precedence chain that turns them into a `ResolvedConfig`.

pub(crate) mod env;
pub(crate) mod file;
pub(crate) mod resolve;

pub(crate) use env::{Environment, env_file_candidates};
pub(crate) use file::FileConfig;
pub(crate) use resolve::{FlagValues, ResolvedConfig, Resolver};
