//! # CLI Module
//!
//! Command-line interface for stratagen.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Run the generation pipeline for one or more configured domains:
//!
//! ```bash
//! stratagen generate --domain exchange --layer core --layer services --clean
//! stratagen generate --all
//! ```
//!
//! ### `inspect`
//!
//! Print the classified operations and resolved entities for a single
//! OpenAPI document, without writing anything:
//!
//! ```bash
//! stratagen inspect --spec specs/exchange.yaml
//! ```
//!
//! Exit code is `0` on success and non-zero with the fatal error (domain,
//! generator, message) on stderr otherwise.

mod commands;
mod logging;


pub use commands::{run, run_cli, Cli, Commands};
pub use logging::init_logging;
