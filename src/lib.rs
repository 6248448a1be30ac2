//! Summarizes commit activity of local git repositories by running the `git` executable and
//! aggregating its log output per author and per file.

pub mod args;
pub mod commands;
pub mod config;
pub mod date;
pub mod error;
pub mod file;
pub mod log;
pub mod parser;
pub mod process;
pub mod query;
pub mod render;
pub mod repository;
pub mod scanner;
pub mod stats;

pub use crate::{
    config::{Config, Project},
    error::{Error, Result},
    log::{BranchInfo, CommitRecord},
    process::GitRunner,
    query::{LogFormat, LogQuery},
    repository::{GitRepository, Opened, Uninitialized},
    stats::{generate_stats, StatsResult},
};
