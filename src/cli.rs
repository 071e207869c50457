//! Command-line surface

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::constants::{
    DEFAULT_DIRECTORY, DEFAULT_PORT, ENV_DIRECTORY, ENV_FALLBACK_PORT, ENV_NON_RECURSIVE,
    ENV_PORT, ENV_VERBOSE,
};
use crate::core::server::StartupOptions;

const NON_RECURSIVE_SHORT: &str = "-nr";
const NON_RECURSIVE_LONG: &str = "--non-recursive";

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(
    about = "Turn any local directory into a static file server that can be accessed from anywhere on your local network"
)]
#[command(version)]
pub struct Args {
    /// The local port that the server is to listen on
    #[arg(
        short,
        long,
        env = ENV_PORT,
        default_value_t = DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// The directory to be served
    #[arg(short, long, env = ENV_DIRECTORY, default_value = DEFAULT_DIRECTORY)]
    pub directory: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, env = ENV_VERBOSE)]
    pub verbose: bool,

    /// Disable recursive sharing (disallows directory access below the shared root)
    #[arg(long = "non-recursive", visible_alias = "nr", env = ENV_NON_RECURSIVE)]
    pub non_recursive: bool,

    /// Port tried when the requested one is busy
    #[arg(
        long,
        env = ENV_FALLBACK_PORT,
        default_value_t = DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub fallback_port: u16,

    /// Fail immediately if the requested port is busy
    #[arg(long)]
    pub no_fallback: bool,
}

impl Args {
    /// Parse arguments, accepting `-nr` as a short form of `--non-recursive`
    pub fn parse_normalized<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    pub fn into_options(self) -> StartupOptions {
        StartupOptions {
            port: self.port,
            directory: self.directory,
            verbose: self.verbose,
            non_recursive: self.non_recursive,
            fallback_port: (!self.no_fallback).then_some(self.fallback_port),
        }
    }
}

/// Rewrite `-nr`, which clap cannot express as a short flag
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg == NON_RECURSIVE_SHORT {
                OsString::from(NON_RECURSIVE_LONG)
            } else {
                arg
            }
        })
        .collect()
}
