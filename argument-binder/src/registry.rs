use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::ops::BitOr;

use crate::declare::{Arg, Meta, Params};
use crate::error::{Error, ErrorKind, Param};
use crate::handler::{Collection, Handler};
use crate::lexer::is_valid_name;
use crate::scanner::Scanner;
use crate::usage::Usage;

/// The option syntaxes accepted on the command line.
///
/// This is a small bit set: `Syntax::DASHES | Syntax::SLASHES` is the same
/// as [`Syntax::BOTH`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Syntax(u8);

impl Syntax {
    /// No options at all, only positional parameters.
    pub const NONE: Syntax = Syntax(0);
    /// Unix style `--long`, `--long=value`, `-s`, `-svalue` and `-s value`.
    pub const DASHES: Syntax = Syntax(1);
    /// Windows style `/long`, `/long=value`, `/s` and `/s value`.
    pub const SLASHES: Syntax = Syntax(2);
    /// Both dashes and slashes.
    pub const BOTH: Syntax = Syntax(3);

    /// Checks if all syntaxes of `other` are accepted.
    #[inline]
    pub fn contains(self, other: Syntax) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no syntax is accepted.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Syntax {
    type Output = Syntax;

    fn bitor(self, rhs: Syntax) -> Syntax {
        Syntax(self.0 | rhs.0)
    }
}

impl fmt::Debug for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Syntax::NONE => write!(f, "Syntax::NONE"),
            Syntax::DASHES => write!(f, "Syntax::DASHES"),
            Syntax::SLASHES => write!(f, "Syntax::SLASHES"),
            _ => write!(f, "Syntax::BOTH"),
        }
    }
}

/// How the case of long option names is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Case {
    /// Long names match exactly as declared.
    AsDeclared,
    /// Long names and aliases are folded to lowercase when declared and
    /// when looked up.
    #[default]
    Insensitive,
    /// Long names and aliases are registered and looked up lowercased.
    ///
    /// This currently behaves like [`Case::Insensitive`] when parsing.
    LowercaseOnly,
}

/// What to do with options that are not declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unknown {
    /// Fail with [`ErrorKind::UnknownArgument`].
    #[default]
    Throw,
    /// Silently drop the option and its attached value.
    Ignore,
    /// Hand the raw argument to the positional parameters.
    PlaceInParameters,
}

/// Settings that apply to the registry as a whole.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The accepted option syntaxes.
    ///
    /// **Default:** [`Syntax::BOTH`]
    pub syntax: Syntax,
    /// The treatment of upper and lower case in long names.
    ///
    /// **Default:** [`Case::Insensitive`]
    pub case: Case,
    /// The treatment of undeclared options.
    ///
    /// **Default:** [`Unknown::Throw`]
    pub on_unknown: Unknown,
    /// Replaces the first line of the usage.
    pub usage_intro: Option<String>,
    /// Shown at the end of the usage.
    pub usage_epilog: Option<String>,
    /// The syntax options are shown with in the usage.  Must be either
    /// [`Syntax::DASHES`] or [`Syntax::SLASHES`].
    ///
    /// **Default:** [`Syntax::DASHES`]
    pub usage_syntax: Syntax,
    /// Whether the usage lists short and long aliases.
    pub usage_show_aliases: bool,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            syntax: Syntax::BOTH,
            case: Case::default(),
            on_unknown: Unknown::default(),
            usage_intro: None,
            usage_epilog: None,
            usage_syntax: Syntax::DASHES,
            usage_show_aliases: false,
        }
    }
}

impl Settings {
    fn folds_case(&self) -> bool {
        matches!(self.case, Case::Insensitive | Case::LowercaseOnly)
    }

    fn fold<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.folds_case() {
            Cow::Owned(name.to_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }
}

/// A declaration with its handler.
pub(crate) struct Entry<T> {
    pub meta: Meta,
    pub handler: Box<dyn Handler<T>>,
    pub positional: bool,
}

impl<T> Entry<T> {
    /// The param errors about this entry as a whole refer to.
    pub fn param(&self) -> Param {
        if self.positional {
            Param::Positional
        } else if let Some(&c) = self.meta.shorts.first() {
            Param::Short(c)
        } else {
            Param::Long(self.meta.name.clone())
        }
    }
}

/// Collects the declarations for a [`Registry`].
///
/// Nothing is validated until [`build`](Self::build) is called.
pub struct Builder<T> {
    settings: Settings,
    entries: Vec<Entry<T>>,
}

impl<T: 'static> Builder<T> {
    /// Replaces all settings.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the accepted option syntaxes.
    pub fn syntax(mut self, syntax: Syntax) -> Self {
        self.settings.syntax = syntax;
        self
    }

    /// Sets the case treatment of long names.
    pub fn case(mut self, case: Case) -> Self {
        self.settings.case = case;
        self
    }

    /// Sets the treatment of undeclared options.
    pub fn on_unknown(mut self, on_unknown: Unknown) -> Self {
        self.settings.on_unknown = on_unknown;
        self
    }

    /// Sets the first line of the usage.
    pub fn usage_intro(mut self, intro: impl Into<String>) -> Self {
        self.settings.usage_intro = Some(intro.into());
        self
    }

    /// Sets the end of the usage.
    pub fn usage_epilog(mut self, epilog: impl Into<String>) -> Self {
        self.settings.usage_epilog = Some(epilog.into());
        self
    }

    /// Sets the syntax options are shown with in the usage.
    pub fn usage_syntax(mut self, syntax: Syntax) -> Self {
        self.settings.usage_syntax = syntax;
        self
    }

    /// Lists aliases in the usage.
    pub fn usage_show_aliases(mut self, yes: bool) -> Self {
        self.settings.usage_show_aliases = yes;
        self
    }

    /// Declares an option.
    pub fn option<H: Handler<T> + 'static>(mut self, arg: Arg<H>) -> Self {
        self.entries.push(Entry {
            meta: arg.meta,
            handler: Box::new(arg.handler),
            positional: false,
        });
        self
    }

    /// Declares the positional parameters.
    pub fn parameters<C: Collection + 'static>(mut self, params: Params<T, C>) -> Self {
        self.entries.push(Entry {
            meta: Meta {
                name: "parameters".into(),
                help_var: params.help_var,
                ..Meta::default()
            },
            handler: Box::new(params.handler),
            positional: true,
        });
        self
    }

    /// Validates the declarations and builds the registry.
    pub fn build(self) -> Result<Registry<T>, Error> {
        let settings = self.settings;
        if settings.usage_syntax != Syntax::DASHES && settings.usage_syntax != Syntax::SLASHES {
            return Err(Error::config("usage syntax must be dashes or slashes"));
        }

        let mut registry = Registry {
            settings,
            entries: Vec::with_capacity(self.entries.len()),
            longs: HashMap::new(),
            shorts: HashMap::new(),
            parameters: None,
        };
        for mut entry in self.entries {
            let index = registry.entries.len();
            if entry.positional {
                if registry.parameters.is_some() {
                    return Err(Error::config("duplicate declaration for parameters"));
                }
                entry
                    .handler
                    .validate()
                    .map_err(|msg| Error::config(format!("parameters: {}", msg)))?;
                registry.parameters = Some(index);
                registry.entries.push(entry);
                continue;
            }

            if registry.settings.syntax.is_none() {
                return Err(Error::config(format!(
                    "option '{}' declared but no option syntax is accepted",
                    entry.meta.name
                )));
            }
            entry
                .handler
                .validate()
                .map_err(|msg| Error::config(format!("option '{}': {}", entry.meta.name, msg)))?;

            entry.meta.name = registry.register_long(&entry.meta.name, index)?;
            entry.meta.aliases = entry
                .meta
                .aliases
                .iter()
                .map(|alias| registry.register_long(alias, index))
                .collect::<Result<_, _>>()?;
            for &short in &entry.meta.shorts {
                registry.register_short(short, index)?;
            }
            registry.entries.push(entry);
        }

        tracing::debug!(
            entries = registry.entries.len(),
            syntax = ?registry.settings.syntax,
            "built option registry"
        );
        Ok(registry)
    }
}

/// The option registry of an option bag type.
///
/// A registry maps the names of all declared options to their handlers
/// and drives the scan of a command line into an option bag of type `T`.
/// It's built once through a [`Builder`] (or [`OptionBag::registry`]) and
/// can be reused for any number of scans.
///
/// ```
/// use argument_binder::{Arg, Error, Registry};
///
/// #[derive(Default)]
/// struct Opts {
///     name: String,
///     verbose: bool,
/// }
///
/// fn main() -> Result<(), Error> {
///     let mut registry = Registry::builder()
///         .option(Arg::plain("name", |o: &mut Opts| &mut o.name))
///         .option(Arg::flag("verbose", |o: &mut Opts| &mut o.verbose).short('v'))
///         .build()?;
///
///     let mut opts = Opts::default();
///     registry.parse(&mut opts, ["-v", "--name=Ada"])?;
///     assert!(opts.verbose);
///     assert_eq!(opts.name, "Ada");
///     Ok(())
/// }
/// ```
pub struct Registry<T> {
    pub(crate) settings: Settings,
    pub(crate) entries: Vec<Entry<T>>,
    longs: HashMap<String, usize>,
    shorts: HashMap<char, usize>,
    pub(crate) parameters: Option<usize>,
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("settings", &self.settings)
            .field("options", &self.entries.len())
            .field("parameters", &self.parameters.is_some())
            .finish()
    }
}

impl<T: 'static> Registry<T> {
    /// Starts declaring a registry with default settings.
    pub fn builder() -> Builder<T> {
        Builder {
            settings: Settings::default(),
            entries: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scans the given arguments into the bag without finalizing.
    ///
    /// Single values are written as they are encountered, collected values
    /// and counts are held back until [`finish`](Self::finish).  Multiple
    /// calls accumulate.  On error all pending state is discarded.
    pub fn update<I, S>(&mut self, bag: &mut T, args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let rv = Scanner::new(self, bag, args).run();
        if rv.is_err() {
            self.reset();
        }
        rv
    }

    /// Finalizes a scan.
    ///
    /// Visits every declaration in declaration order: collected values and
    /// counts are committed, flags that were not given get their unset
    /// value, and required options and minimums are enforced.  The registry
    /// is reset afterwards, no matter if finalizing succeeded.
    pub fn finish(&mut self, bag: &mut T) -> Result<(), Error> {
        let rv = self.finish_entries(bag);
        self.reset();
        rv
    }

    /// Scans the given arguments into the bag and finalizes.
    ///
    /// On error the bag might have been partially updated.
    pub fn parse<I, S>(&mut self, bag: &mut T, args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.update(bag, args)?;
        self.finish(bag)
    }

    /// Parses the command line of the current process.
    ///
    /// The first argument (the program name) is skipped.
    pub fn parse_env(&mut self, bag: &mut T) -> Result<(), Error> {
        self.parse(bag, std::env::args_os().skip(1))
    }

    /// Returns a formatter for the usage.
    pub fn usage(&self) -> Usage<'_, T> {
        Usage::new(self)
    }

    /// Looks up the handler index of a long name or alias.
    pub(crate) fn lookup_long(&self, name: &str) -> Option<usize> {
        self.longs.get(&*self.settings.fold(name)).copied()
    }

    /// Looks up the handler index of a short name.
    pub(crate) fn lookup_short(&self, name: char) -> Option<usize> {
        self.shorts.get(&name).copied()
    }

    fn finish_entries(&mut self, bag: &mut T) -> Result<(), Error> {
        for entry in &mut self.entries {
            let was_set = entry.handler.was_set();
            entry
                .handler
                .finish(bag)
                .map_err(|err| err.or_param(entry.param()))?;
            if entry.meta.required && !was_set {
                return Err(Error::new(ErrorKind::MissingRequired).with_param(entry.param()));
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.handler.reset();
        }
    }

    fn register_long(&mut self, name: &str, index: usize) -> Result<String, Error> {
        if !is_valid_name(name) {
            return Err(Error::config(format!("invalid option name '{}'", name)));
        }
        let name = self.settings.fold(name).into_owned();
        if self.longs.contains_key(&name) {
            return Err(Error::config(format!("duplicate option name '{}'", name)));
        }
        self.longs.insert(name.clone(), index);
        Ok(name)
    }

    fn register_short(&mut self, name: char, index: usize) -> Result<(), Error> {
        if name == '-' || name == '=' || name.is_whitespace() || name.is_control() {
            return Err(Error::config(format!("invalid short option name '{}'", name)));
        }
        if self.shorts.contains_key(&name) {
            return Err(Error::config(format!(
                "duplicate short option name '{}'",
                name
            )));
        }
        self.shorts.insert(name, index);
        Ok(())
    }
}

/// A type that declares its own options.
///
/// ```
/// use argument_binder::{Arg, Builder, Error, OptionBag};
///
/// #[derive(Default)]
/// struct Opts {
///     name: String,
///     verbose: bool,
/// }
///
/// impl OptionBag for Opts {
///     fn declare(builder: Builder<Self>) -> Builder<Self> {
///         builder
///             .option(Arg::plain("name", |o: &mut Opts| &mut o.name).short('n'))
///             .option(Arg::flag("verbose", |o: &mut Opts| &mut o.verbose).short('v'))
///     }
/// }
///
/// fn main() -> Result<(), Error> {
///     let mut opts = Opts::default();
///     opts.parse_args(["-vn", "Ada"])?;
///     assert!(opts.verbose);
///     assert_eq!(opts.name, "Ada");
///     Ok(())
/// }
/// ```
pub trait OptionBag: Sized + 'static {
    /// Adds the declarations of this type to the builder.
    fn declare(builder: Builder<Self>) -> Builder<Self>;

    /// Builds the registry for this type.
    fn registry() -> Result<Registry<Self>, Error> {
        Self::declare(Registry::builder()).build()
    }

    /// Parses the given arguments into this bag.
    fn parse_args<I, S>(&mut self, args: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self::registry()?.parse(self, args)
    }
}
