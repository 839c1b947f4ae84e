//! This example shows how to accept multiple values, count occurrences and
//! handle unknown options.
use std::path::PathBuf;

use argument_binder::{Arg, Enumerated, Error, Params, Registry, Unknown};

#[derive(Debug, Clone, Copy)]
enum Color {
    Auto,
    Always,
    Never,
}

impl Enumerated for Color {
    const SYMBOLS: &'static [(&'static str, Self)] = &[
        ("auto", Color::Auto),
        ("always", Color::Always),
        ("never", Color::Never),
    ];
}

struct Opts {
    messages: Vec<String>,
    verbosity: u8,
    color: Color,
    files: Vec<PathBuf>,
}

fn main() -> Result<(), Error> {
    let mut registry = Registry::builder()
        .on_unknown(Unknown::PlaceInParameters)
        .option(
            Arg::array("message", |o: &mut Opts| &mut o.messages)
                .short('m')
                .min(1)
                .help("a message to print, at least one is required"),
        )
        .option(
            Arg::counter("verbose", |o: &mut Opts| &mut o.verbosity)
                .short('v')
                .max(3)
                .help("increases the verbosity"),
        )
        .option(Arg::choice("color", |o: &mut Opts| &mut o.color).help("when to color the output"))
        .parameters(Params::list(|o: &mut Opts| &mut o.files).help_var("FILE"))
        .build()?;

    let mut opts = Opts {
        messages: vec![],
        verbosity: 0,
        color: Color::Auto,
        files: vec![],
    };
    if let Err(err) = registry.parse_env(&mut opts) {
        eprint!("{}", registry.usage());
        return Err(err);
    }

    println!("messages: {:?}", opts.messages);
    println!("verbosity: {}", opts.verbosity);
    println!("color: {:?}", opts.color);
    println!("files: {:?}", opts.files);

    Ok(())
}
