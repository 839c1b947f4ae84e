//! This crate binds command line arguments to the fields of a plain struct.
//! You describe each option once (its names, how it binds and what it means)
//! and the crate scans a command line and writes the values into your struct
//! in place.
//!
//! # Example
//!
//! Options are declared on a [`Registry`] through [`Arg`] and [`Params`]:
//!
//! ```
//! use argument_binder::{Arg, Error, Params, Registry};
//!
//! struct Opts {
//!     name: String,
//!     verbose: bool,
//!     level: u32,
//!     files: Vec<String>,
//! }
//!
//! fn main() -> Result<(), Error> {
//!     let mut registry = Registry::builder()
//!         .option(Arg::plain("name", |o: &mut Opts| &mut o.name).short('n'))
//!         .option(Arg::flag("verbose", |o: &mut Opts| &mut o.verbose).short('v'))
//!         .option(Arg::counter("level", |o: &mut Opts| &mut o.level).short('l'))
//!         .parameters(Params::array(|o: &mut Opts| &mut o.files))
//!         .build()?;
//!
//!     let mut opts = Opts {
//!         name: "unset".into(),
//!         verbose: false,
//!         level: 0,
//!         files: vec![],
//!     };
//!     registry.parse(&mut opts, ["-vlln", "Ada", "a.txt", "--", "-b.txt"])?;
//!
//!     assert_eq!(opts.name, "Ada");
//!     assert!(opts.verbose);
//!     assert_eq!(opts.level, 2);
//!     assert_eq!(opts.files, ["a.txt", "-b.txt"]);
//!     Ok(())
//! }
//! ```
//!
//! Here is what's happening:
//!
//! * [`Registry::builder`] starts a declaration.  Every [`Arg`] names the
//!   option and the field it binds to.  The constructor picks the binding:
//!   [`Arg::plain`] for single values, [`Arg::flag`] for switches,
//!   [`Arg::counter`] to count occurrences, [`Arg::choice`] for
//!   [`Enumerated`] values and [`Arg::array`] / [`Arg::list`] to collect.
//! * [`Params`] receives the positional arguments.
//! * [`Builder::build`] validates the declarations.  Broken declarations
//!   (duplicate names, bad bounds and similar) fail with
//!   [`ErrorKind::Config`].
//! * [`Registry::parse`] scans the arguments and finalizes: collected
//!   values are committed, flags that were not given are cleared and
//!   required options are checked.
//!
//! Types can also declare their own options through [`OptionBag`].
//!
//! # Behavior
//!
//! With [`Syntax::DASHES`] long options are given as `--name=value`.  A long
//! option never takes its value from the next argument.  Short options can
//! be clustered: `-abc value`, `-abcvalue` and `-ab -c value` are all the
//! same if `a` and `b` are flags.  As with getopt, short options do not take
//! `=` to separate the value (`-x=42` has a value of `=42`).  The special
//! `--` argument ends option parsing, everything after it is positional.
//! An empty value (`--name=`, `-n ""`) counts as no value at all.
//!
//! With [`Syntax::SLASHES`] options are given as `/name=value`, single
//! character options also as `/x value`.  Both syntaxes are enabled by
//! default.
//!
//! Long names are matched case-insensitively unless configured otherwise
//! (see [`Case`]).  What happens to undeclared options is controlled by
//! [`Unknown`].
//!
//! Multiple values are collected into ordered sequences (see
//! [`Collection`]) in the order they were given.
//!
//! Values are converted through [`FromArg`], which is implemented for the
//! standard library's scalar, string, path and address types.  See
//! [`convert`] for ways to hook up other types.
//!
//! # Usage
//!
//! [`Registry::usage`] renders a usage text from the declarations.  Options
//! can be grouped with [`HelpCategory`] to keep rarely used ones out of the
//! default help.
mod declare;
mod error;
mod handler;
mod lexer;
mod registry;
mod scanner;
mod usage;

pub mod convert;

pub use self::convert::{Enumerated, FromArg};
pub use self::declare::{Arg, HelpCategory, Params};
pub use self::error::{
    BoxError, Error, ErrorKind, NotEnoughValues, Param, TooManyValues, UnexpectedValue,
};
pub use self::handler::{Choice, Collection, Collision, Counter, Flag, Handler, Multi, Plain};
pub use self::registry::{Builder, Case, OptionBag, Registry, Settings, Syntax, Unknown};
pub use self::usage::Usage;
