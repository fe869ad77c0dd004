//! This library implements parsing for a small single-line command grammar.
//!
//! Programming interface is centered around the [`CommandRecord`] structure,
//! which holds the fully parsed form of one command line. A record can be
//! created from a raw character sequence or from pre-tokenized fragments.
//! Once constructed it is immutable and can be queried for the command name,
//! direct parameters and named parameters, or serialized back into canonical
//! grammar text.
//!
//! # Grammar
//!
//! ```text
//! command [dirParams ...] [[#paramName values ...] ...]
//! ```
//!
//! The command name is the first bare token on the line. Tokens following it
//! are direct parameters, until the first parameter-name marker (`#`) opens
//! a named parameter owning all subsequent value tokens. Tokens containing
//! whitespace can be quoted with `"`, and quoted content supports backslash
//! escapes (`\n`, `\t` and friends). A repeated parameter name replaces the
//! earlier occurrence. An empty parameter name swallows and discards its
//! values.
//!
//! ```text
//! spawn "guard captain" 3 #pos 10 20 #name "Rex\nJr"
//! ```
//!
//! # Multi-line sources
//!
//! The [`stream`] module joins physical lines into logical command lines:
//! `//` starts a line-trailing comment and a line ending in an odd number of
//! backslashes continues onto the next physical line. See [`read_records`].
//!
//! # Highlighting
//!
//! The [`highlight`] module re-lexes the same grammar without collecting
//! values, decorating the input for interactive display through a
//! caller-supplied [`ColorFormatter`]. The input may be incomplete, which
//! makes it suitable for live-typing feedback. See [`analyze`].
//!
//! # Using the library
//!
//! To use `quip-core` in your Rust project add the following to your
//! `Cargo.toml`:
//!
//! ```toml
//! quip-core = "0.1.0"
//! ```
//!
//! The asynchronous stream joiner is gated behind the `async` feature:
//!
//! ```toml
//! quip-core = { version = "0.1.0", features = ["async"] }
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use quip_core::CommandRecord;
//!
//! let record = CommandRecord::parse("spawn \"guard\" #pos 10 20")?;
//! assert_eq!(record.command(), "spawn");
//! assert_eq!(record.values("pos"), ["10", "20"]);
//! ```

#[macro_use]
extern crate serde;
#[macro_use]
extern crate log;

// reexports
pub use error::{Error, Result};
pub use highlight::{analyze, Analysis, BbcodeFormatter, ColorFormatter, ColorKind, MatchKind};
pub use parser::Scratch;
pub use record::CommandRecord;
#[cfg(feature = "async")]
pub use stream::read_records_async;
pub use stream::{parse_str, read_records};

pub mod error;
pub mod escape;
pub mod format;
pub mod highlight;
pub mod parser;
pub mod record;
pub mod stream;

// features
pub const FEATURE_NAME_ASYNC: &str = "async";
#[cfg(not(feature = "async"))]
pub const FEATURE_ASYNC: bool = false;
#[cfg(feature = "async")]
pub const FEATURE_ASYNC: bool = true;

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// Marker character introducing a parameter name token.
pub const PARAM_SYMBOL: char = '#';
/// Character delimiting quoted string tokens.
pub const QUOTE_SYMBOL: char = '"';
/// Escape character, effective inside quoted string tokens.
pub const ESCAPE_SYMBOL: char = '\\';
/// Two-character sequence starting a line-trailing comment.
pub const COMMENT_SYMBOL: &str = "//";
