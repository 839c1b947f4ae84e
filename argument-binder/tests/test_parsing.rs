use std::collections::VecDeque;
use std::path::PathBuf;

use argument_binder::{
    Arg, Builder, Case, Collision, Enumerated, Error, ErrorKind, OptionBag, Params, Registry,
    Syntax, Unknown,
};

#[derive(Debug)]
struct Opts {
    name: String,
    verbose: bool,
    count: i32,
    level: u8,
    items: Vec<i32>,
    params: Vec<String>,
}

impl Default for Opts {
    fn default() -> Opts {
        Opts {
            name: "unset".into(),
            verbose: false,
            count: 0,
            level: 0,
            items: vec![],
            params: vec![],
        }
    }
}

fn builder() -> Builder<Opts> {
    Registry::builder()
        .option(Arg::plain("name", |o: &mut Opts| &mut o.name).short('n'))
        .option(Arg::flag("verbose", |o: &mut Opts| &mut o.verbose).short('v'))
}

#[test]
fn test_basic() -> Result<(), Error> {
    let mut registry = builder().build()?;

    let mut opts = Opts::default();
    registry.parse(&mut opts, ["-v", "--name=Ada"])?;
    assert!(opts.verbose);
    assert_eq!(opts.name, "Ada");

    let mut opts = Opts::default();
    registry.parse(&mut opts, Vec::<String>::new())?;
    assert!(!opts.verbose);
    assert_eq!(opts.name, "unset");

    Ok(())
}

#[test]
fn test_long_collisions() -> Result<(), Error> {
    let args = ["--count=1", "--count=2"];

    let mut registry = Registry::builder()
        .option(Arg::plain("count", |o: &mut Opts| &mut o.count))
        .build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, args)?;
    assert_eq!(opts.count, 1);

    let mut registry = Registry::builder()
        .option(Arg::plain("count", |o: &mut Opts| &mut o.count).collision(Collision::Overwrite))
        .build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, args)?;
    assert_eq!(opts.count, 2);

    let mut registry = Registry::builder()
        .option(Arg::plain("count", |o: &mut Opts| &mut o.count).collision(Collision::Throw))
        .build()?;
    let mut opts = Opts::default();
    let err = registry.parse(&mut opts, args).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateArgument);
    assert_eq!(opts.count, 1);

    Ok(())
}

#[test]
fn test_short_clusters() -> Result<(), Error> {
    #[derive(Default)]
    struct Bag {
        a: bool,
        b: bool,
        c: String,
    }

    let mut registry = Registry::builder()
        .option(Arg::flag("alpha", |o: &mut Bag| &mut o.a).short('a'))
        .option(Arg::flag("beta", |o: &mut Bag| &mut o.b).short('b'))
        .option(Arg::plain("gamma", |o: &mut Bag| &mut o.c).short('c'))
        .build()?;

    for args in [
        &["-abc", "value"][..],
        &["-abcvalue"][..],
        &["-ab", "-c", "value"][..],
    ] {
        let mut bag = Bag::default();
        registry.parse(&mut bag, args.iter().copied())?;
        assert!(bag.a, "{:?}", args);
        assert!(bag.b, "{:?}", args);
        assert_eq!(bag.c, "value", "{:?}", args);
    }

    let mut bag = Bag::default();
    registry.parse(&mut bag, ["-c=42"])?;
    assert_eq!(bag.c, "=42");

    let mut bag = Bag::default();
    registry.parse(&mut bag, ["-c", "-a"])?;
    assert_eq!(bag.c, "-a");
    assert!(!bag.a);

    Ok(())
}

#[test]
fn test_terminator() -> Result<(), Error> {
    let mut registry = builder()
        .parameters(Params::array(|o: &mut Opts| &mut o.params))
        .build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["first", "--", "-v", "--name=x", "--"])?;
    assert!(!opts.verbose);
    assert_eq!(opts.name, "unset");
    assert_eq!(opts.params, ["first", "-v", "--name=x", "--"]);
    Ok(())
}

#[test]
fn test_exact_count() -> Result<(), Error> {
    let mut registry = Registry::builder()
        .option(Arg::array("item", |o: &mut Opts| &mut o.items).short('i').exact(2))
        .build()?;

    let mut opts = Opts::default();
    let err = registry.parse(&mut opts, Vec::<&str>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequired);

    let err = registry.parse(&mut opts, ["-i1"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequired);

    let err = registry.parse(&mut opts, ["-i1", "-i2", "-i3"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.value(), Some("3"));
    assert!(opts.items.is_empty());

    registry.parse(&mut opts, ["-i", "1", "--item=2"])?;
    assert_eq!(opts.items, [1, 2]);

    Ok(())
}

#[test]
fn test_place_in_parameters() -> Result<(), Error> {
    let mut registry = builder()
        .parameters(Params::list(|o: &mut Opts| &mut o.params))
        .on_unknown(Unknown::PlaceInParameters)
        .build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--bogus", "x"])?;
    assert_eq!(opts.params, ["--bogus", "x"]);

    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--bogus=1", "-vzq", "/what"])?;
    assert!(opts.verbose);
    assert_eq!(opts.params, ["--bogus=1", "-zq", "/what"]);

    Ok(())
}

#[test]
fn test_ignore_unknown() -> Result<(), Error> {
    let mut registry = builder().on_unknown(Unknown::Ignore).build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--bogus=1", "-zvn", "stray", "--name=Ada", "-v"])?;
    assert!(opts.verbose);
    assert_eq!(opts.name, "Ada");
    Ok(())
}

#[test]
fn test_ignore_keeps_first() -> Result<(), Error> {
    let mut registry = builder().build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--name=first", "-n", "second", "-vv"])?;
    assert_eq!(opts.name, "first");
    assert!(opts.verbose);
    Ok(())
}

#[test]
fn test_list_and_array() -> Result<(), Error> {
    let mut registry = Registry::builder()
        .option(Arg::list("item", |o: &mut Opts| &mut o.items))
        .build()?;
    let mut opts = Opts {
        items: vec![1],
        ..Opts::default()
    };
    registry.parse(&mut opts, ["--item=2", "--item=3"])?;
    assert_eq!(opts.items, [1, 2, 3]);

    let mut registry = Registry::builder()
        .option(Arg::array("item", |o: &mut Opts| &mut o.items))
        .build()?;
    let mut opts = Opts {
        items: vec![1],
        ..Opts::default()
    };
    registry.parse(&mut opts, Vec::<&str>::new())?;
    assert_eq!(opts.items, [1]);
    registry.parse(&mut opts, ["--item=2", "--item=3"])?;
    assert_eq!(opts.items, [2, 3]);

    Ok(())
}

#[test]
fn test_other_collections() -> Result<(), Error> {
    #[derive(Default)]
    struct Bag {
        tags: VecDeque<String>,
        files: Vec<PathBuf>,
    }

    let mut registry = Registry::builder()
        .option(Arg::list("tag", |o: &mut Bag| &mut o.tags).short('t'))
        .parameters(Params::array(|o: &mut Bag| &mut o.files))
        .build()?;
    let mut bag = Bag::default();
    registry.parse(&mut bag, ["-tb", "a.txt", "-ta", "-tb", "b.txt"])?;
    assert_eq!(bag.tags, ["b", "a", "b"]);
    assert_eq!(
        bag.files,
        [PathBuf::from("a.txt"), PathBuf::from("b.txt")]
    );
    Ok(())
}

#[test]
fn test_values_keep_order_and_duplicates() -> Result<(), Error> {
    #[derive(Default)]
    struct Bag {
        tags: Vec<String>,
        files: Vec<String>,
    }

    let mut registry = Registry::builder()
        .option(Arg::array("tag", |o: &mut Bag| &mut o.tags).short('t').exact(2))
        .parameters(Params::array(|o: &mut Bag| &mut o.files).exact(3))
        .build()?;
    let mut bag = Bag::default();
    registry.parse(&mut bag, ["b", "-tx", "a", "-tx", "b"])?;
    assert_eq!(bag.tags, ["x", "x"]);
    assert_eq!(bag.files, ["b", "a", "b"]);
    Ok(())
}

#[test]
fn test_counter() -> Result<(), Error> {
    let mut registry = Registry::builder()
        .option(Arg::counter("level", |o: &mut Opts| &mut o.level).short('l'))
        .build()?;

    let mut opts = Opts::default();
    registry.parse(&mut opts, ["-lll", "--level"])?;
    assert_eq!(opts.level, 4);

    let mut opts = Opts {
        level: 7,
        ..Opts::default()
    };
    registry.parse(&mut opts, Vec::<&str>::new())?;
    assert_eq!(opts.level, 7);

    Ok(())
}

#[test]
fn test_choice() -> Result<(), Error> {
    #[derive(Debug, Clone, Copy, PartialEq)]
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

    struct Bag {
        color: Color,
    }

    let mut registry = Registry::builder()
        .option(Arg::choice("color", |o: &mut Bag| &mut o.color))
        .build()?;
    let mut bag = Bag { color: Color::Auto };
    registry.parse(&mut bag, ["--color=ALWAYS"])?;
    assert_eq!(bag.color, Color::Always);

    let err = registry.parse(&mut bag, ["--color=sometimes"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(
        format!("{:#}", err),
        "invalid value for '--color': \"sometimes\" (must be one of auto, always, never)"
    );
    assert_eq!(bag.color, Color::Always);

    Ok(())
}

#[test]
fn test_flag_when_set() -> Result<(), Error> {
    struct Bag {
        color: bool,
    }

    let mut registry = Registry::builder()
        .option(Arg::flag("no-color", |o: &mut Bag| &mut o.color).when_set(false))
        .build()?;
    let mut bag = Bag { color: false };
    registry.parse(&mut bag, Vec::<&str>::new())?;
    assert!(bag.color);
    registry.parse(&mut bag, ["--no-color"])?;
    assert!(!bag.color);
    Ok(())
}

#[test]
fn test_slashes() -> Result<(), Error> {
    let mut registry = builder().build()?;

    let mut opts = Opts::default();
    registry.parse(&mut opts, ["/v", "/n", "Bob"])?;
    assert!(opts.verbose);
    assert_eq!(opts.name, "Bob");

    let mut opts = Opts::default();
    registry.parse(&mut opts, ["/verbose", "/name=Ada"])?;
    assert!(opts.verbose);
    assert_eq!(opts.name, "Ada");

    let mut registry = builder()
        .syntax(Syntax::DASHES)
        .parameters(Params::array(|o: &mut Opts| &mut o.params))
        .build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["/v", "-v"])?;
    assert!(opts.verbose);
    assert_eq!(opts.params, ["/v"]);

    let mut registry = builder()
        .syntax(Syntax::SLASHES)
        .parameters(Params::array(|o: &mut Opts| &mut o.params))
        .build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["-v", "--", "/v"])?;
    assert!(opts.verbose);
    assert_eq!(opts.params, ["-v", "--"]);

    Ok(())
}

#[test]
fn test_case_folding() -> Result<(), Error> {
    let declare = || {
        Registry::builder()
            .option(Arg::plain("Name", |o: &mut Opts| &mut o.name).alias("Who"))
            .option(Arg::flag("verbose", |o: &mut Opts| &mut o.verbose).short('V'))
    };

    let mut registry = declare().build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--NAME=Ada"])?;
    assert_eq!(opts.name, "Ada");
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["/who=Bob"])?;
    assert_eq!(opts.name, "Bob");
    let err = registry.parse(&mut opts, ["-v"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);

    let mut registry = declare().case(Case::LowercaseOnly).build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--name=Ada"])?;
    assert_eq!(opts.name, "Ada");

    let mut registry = declare().case(Case::AsDeclared).build()?;
    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--Name=Ada"])?;
    assert_eq!(opts.name, "Ada");
    let err = registry.parse(&mut opts, ["--name=Ada"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);

    Ok(())
}

#[test]
fn test_registry_reuse() -> Result<(), Error> {
    let mut registry = builder()
        .option(Arg::counter("level", |o: &mut Opts| &mut o.level).short('l'))
        .build()?;

    let mut opts = Opts::default();
    registry.parse(&mut opts, ["-vll"])?;
    assert!(opts.verbose);
    assert_eq!(opts.level, 2);

    registry.parse(&mut opts, ["-l"])?;
    assert!(!opts.verbose);
    assert_eq!(opts.level, 1);

    assert!(registry.parse(&mut opts, ["--bogus"]).is_err());
    registry.parse(&mut opts, ["-lv", "-n", "x"])?;
    assert_eq!(opts.level, 1);
    assert_eq!(opts.name, "x");

    Ok(())
}

#[test]
fn test_update_accumulates() -> Result<(), Error> {
    let mut registry = builder()
        .option(Arg::array("item", |o: &mut Opts| &mut o.items).short('i'))
        .build()?;
    let mut opts = Opts::default();
    registry.update(&mut opts, ["-i1", "--name=Ada"])?;
    assert_eq!(opts.name, "Ada");
    assert!(opts.items.is_empty());
    registry.update(&mut opts, ["-i2", "--name=Bob"])?;
    registry.finish(&mut opts)?;
    assert_eq!(opts.items, [1, 2]);
    assert_eq!(opts.name, "Ada");
    Ok(())
}

#[test]
fn test_setter() -> Result<(), Error> {
    let mut registry = Registry::builder()
        .option(Arg::setter("port", |o: &mut Opts, port: u16| {
            if port == 0 {
                return Err("port must not be zero".into());
            }
            o.count = i32::from(port);
            Ok(())
        }))
        .build()?;

    let mut opts = Opts::default();
    registry.parse(&mut opts, ["--port=8080"])?;
    assert_eq!(opts.count, 8080);

    let err = registry.parse(&mut opts, ["--port=0"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.value(), Some("0"));
    assert_eq!(
        std::error::Error::source(&err).map(|x| x.to_string()),
        Some("port must not be zero".into())
    );

    Ok(())
}

impl OptionBag for Opts {
    fn declare(builder: Builder<Self>) -> Builder<Self> {
        builder
            .option(Arg::plain("name", |o: &mut Opts| &mut o.name).short('n'))
            .option(Arg::flag("verbose", |o: &mut Opts| &mut o.verbose).short('v'))
            .parameters(Params::array(|o: &mut Opts| &mut o.params))
    }
}

#[test]
fn test_option_bag() -> Result<(), Error> {
    let mut opts = Opts::default();
    opts.parse_args(["-vn", "Ada", "rest"])?;
    assert!(opts.verbose);
    assert_eq!(opts.name, "Ada");
    assert_eq!(opts.params, ["rest"]);
    Ok(())
}
