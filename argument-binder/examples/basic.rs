//! This is a basic example with help page, usage and error printing.
use argument_binder::{Arg, Builder, Error, OptionBag, Params};

#[derive(Default)]
struct Opts {
    numbers: Vec<i64>,
    shout: bool,
    help: bool,
    rest: Vec<String>,
}

impl OptionBag for Opts {
    fn declare(builder: Builder<Self>) -> Builder<Self> {
        builder
            .usage_intro("basic [-n NUMBER]... [--shout] [--help] [ARGS]...")
            .usage_epilog("A small example of argument-binder")
            .option(
                Arg::list("number", |o: &mut Opts| &mut o.numbers)
                    .short('n')
                    .help("adds a number to sum"),
            )
            .option(Arg::flag("shout", |o: &mut Opts| &mut o.shout).help("shouts!"))
            .option(
                Arg::flag("help", |o: &mut Opts| &mut o.help)
                    .short('h')
                    .help("prints the help"),
            )
            .parameters(Params::array(|o: &mut Opts| &mut o.rest))
    }
}

fn execute() -> Result<(), Error> {
    let mut registry = Opts::registry()?;
    let mut opts = Opts::default();
    registry.parse_env(&mut opts)?;

    if opts.help {
        print!("{}", registry.usage());
        return Ok(());
    }

    if opts.numbers.is_empty() && !opts.shout {
        print!("{}", registry.usage());
    } else {
        println!("Numbers: {:?}", &opts.numbers);
        println!("Sum: {}", opts.numbers.iter().sum::<i64>());
        if opts.shout {
            println!("I AM SHOUTING!");
        }
    }
    if !opts.rest.is_empty() {
        println!("Rest: {:?}", opts.rest);
    }

    Ok(())
}

fn main() {
    use std::error::Error;
    if let Err(err) = execute() {
        eprintln!("error: {}", err);
        if let Some(source) = err.source() {
            eprintln!("  cause: {}", source);
        }
        if let Some(value) = err.raw_value() {
            eprintln!("  value: {:?}", value.to_string_lossy());
        }
        std::process::exit(1);
    }
}
