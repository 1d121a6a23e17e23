mod args;
mod command;

pub use args::Cli;
pub use command::{CollectionArg, Command};

pub use args::parse;
