//! Option and parameter declarations.
use crate::convert::{Converter, Enumerated, FromArg};
use crate::error::BoxError;
use crate::handler::{Choice, Collection, Collision, Counter, Flag, Multi, Plain, Shape, Target};

/// Groups options in the usage.
///
/// The usage shows all options up to a requested category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HelpCategory {
    /// Always shown.
    #[default]
    Basic,
    /// Shown when advanced help is requested.
    Advanced,
    /// Never shown unless explicitly requested.
    Internal,
}

/// The metadata of a declaration that is independent of the handler.
#[derive(Debug, Clone, Default)]
pub(crate) struct Meta {
    pub name: String,
    pub shorts: Vec<char>,
    pub aliases: Vec<String>,
    pub required: bool,
    pub help: String,
    pub help_var: Option<String>,
    pub category: HelpCategory,
}

impl Meta {
    fn named(name: impl Into<String>) -> Meta {
        Meta {
            name: name.into(),
            ..Meta::default()
        }
    }
}

/// Declares an option.
///
/// The constructor picks the binding behavior: [`plain`](Self::plain)
/// and [`setter`](Self::setter) bind a single value,
/// [`flag`](Self::flag) a boolean switch, [`counter`](Self::counter)
/// counts occurrences, [`choice`](Self::choice) selects one of an
/// [`Enumerated`] type's symbols, and [`array`](Self::array) and
/// [`list`](Self::list) collect multiple values.
///
/// The field is given as accessor function:
///
/// ```
/// # use argument_binder::Arg;
/// struct Opts {
///     name: String,
///     verbose: bool,
/// }
///
/// let name = Arg::plain("name", |o: &mut Opts| &mut o.name).short('n');
/// let verbose = Arg::flag("verbose", |o: &mut Opts| &mut o.verbose).short('v');
/// ```
pub struct Arg<H> {
    pub(crate) meta: Meta,
    pub(crate) handler: H,
}

impl<H> Arg<H> {
    fn new(name: impl Into<String>, handler: H) -> Arg<H> {
        Arg {
            meta: Meta::named(name),
            handler,
        }
    }

    /// Adds a short name.
    ///
    /// The first short name is the canonical one, further short names are
    /// aliases.
    pub fn short(mut self, name: char) -> Self {
        self.meta.shorts.push(name);
        self
    }

    /// Adds an alias for the long name.
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.meta.aliases.push(name.into());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.meta.required = true;
        self
    }

    /// Sets the help text.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.meta.help = text.into();
        self
    }

    /// Sets the name of the value shown in the usage.
    pub fn help_var(mut self, name: impl Into<String>) -> Self {
        self.meta.help_var = Some(name.into());
        self
    }

    /// Sets the help category.
    pub fn category(mut self, category: HelpCategory) -> Self {
        self.meta.category = category;
        self
    }
}

impl<T, V: FromArg> Arg<Plain<T, V>> {
    /// Declares a single value option.
    pub fn plain(name: impl Into<String>, field: fn(&mut T) -> &mut V) -> Self {
        Arg::new(name, Plain::new(Target::Field(field), V::from_arg))
    }

    /// Declares a single value option that is assigned through a setter.
    ///
    /// Errors returned from the setter are reported as invalid values.
    pub fn setter<F>(name: impl Into<String>, setter: F) -> Self
    where
        F: Fn(&mut T, V) -> Result<(), BoxError> + 'static,
    {
        Arg::new(name, Plain::new(Target::Setter(Box::new(setter)), V::from_arg))
    }
}

impl<T, V> Arg<Plain<T, V>> {
    /// Declares a single value option with an explicit converter.
    ///
    /// This is the way to bind types that do not implement [`FromArg`],
    /// for instance with [`convert::parse`](crate::convert::parse).
    pub fn plain_with(
        name: impl Into<String>,
        field: fn(&mut T) -> &mut V,
        convert: Converter<V>,
    ) -> Self {
        Arg::new(name, Plain::new(Target::Field(field), convert))
    }

    /// Sets what happens if the option is given more than once.
    pub fn collision(mut self, collision: Collision) -> Self {
        self.handler.collision = collision;
        self
    }
}

impl<T> Arg<Flag<T>> {
    /// Declares a boolean flag.
    ///
    /// A flag takes no value.  The field is set to `true` if the flag
    /// was given and to `false` if it was not.
    pub fn flag(name: impl Into<String>, field: fn(&mut T) -> &mut bool) -> Self {
        Arg::new(name, Flag::new(field))
    }

    /// Sets the value written when the flag is given.
    ///
    /// The negation is written when it is not given.  Setting this to
    /// `false` makes for flags that turn something off.
    pub fn when_set(mut self, value: bool) -> Self {
        self.handler.when_set = value;
        self
    }

    /// Sets what happens if the flag is given more than once.
    pub fn collision(mut self, collision: Collision) -> Self {
        self.handler.collision = collision;
        self
    }
}

impl<T, V> Arg<Counter<T, V>>
where
    V: TryFrom<u64>,
    V::Error: Into<BoxError>,
{
    /// Declares an option counting its occurrences.
    ///
    /// The count is only written if the option was given at least once.
    pub fn counter(name: impl Into<String>, field: fn(&mut T) -> &mut V) -> Self {
        Arg::new(name, Counter::new(field))
    }

    /// Sets the minimum number of occurrences.
    pub fn min(mut self, min: usize) -> Self {
        self.handler.min = min;
        self
    }

    /// Sets the maximum number of occurrences.
    pub fn max(mut self, max: usize) -> Self {
        self.handler.max = Some(max);
        self
    }

    /// Sets the exact number of occurrences.
    pub fn exact(self, count: usize) -> Self {
        self.min(count).max(count)
    }
}

impl<T, V: Enumerated> Arg<Choice<T, V>> {
    /// Declares an option selecting one of a closed set of symbols.
    pub fn choice(name: impl Into<String>, field: fn(&mut T) -> &mut V) -> Self {
        Arg::new(name, Choice::new(field))
    }

    /// Sets what happens if the option is given more than once.
    pub fn collision(mut self, collision: Collision) -> Self {
        self.handler.collision = collision;
        self
    }
}

impl<T, C> Arg<Multi<T, C>>
where
    C: Collection,
    C::Item: FromArg,
{
    /// Declares an option collecting multiple values.
    ///
    /// If at least one value was given, the collection's contents are
    /// replaced by the given values.
    pub fn array(name: impl Into<String>, field: fn(&mut T) -> &mut C) -> Self {
        Arg::new(name, Multi::new(field, Shape::Array, <C::Item as FromArg>::from_arg))
    }

    /// Declares an option collecting multiple values.
    ///
    /// Unlike [`array`](Self::array) the given values are appended to
    /// what the collection already holds.
    pub fn list(name: impl Into<String>, field: fn(&mut T) -> &mut C) -> Self {
        Arg::new(name, Multi::new(field, Shape::List, <C::Item as FromArg>::from_arg))
    }
}

impl<T, C: Collection> Arg<Multi<T, C>> {
    /// Sets the converter for the individual values.
    pub fn converter(mut self, convert: Converter<C::Item>) -> Self {
        self.handler.convert = convert;
        self
    }

    /// Sets the minimum number of values.
    ///
    /// A minimum above zero makes the option required.
    pub fn min(mut self, min: usize) -> Self {
        self.handler.min = min;
        self
    }

    /// Sets the maximum number of values.
    pub fn max(mut self, max: usize) -> Self {
        self.handler.max = Some(max);
        self
    }

    /// Sets the exact number of values.
    pub fn exact(self, count: usize) -> Self {
        self.min(count).max(count)
    }
}

/// Declares the field receiving the positional parameters.
///
/// There can be at most one per registry.  Positional parameters are all
/// arguments that are not options, everything after `--`, and unknown
/// options if the registry places them in the parameters.
pub struct Params<T, C: Collection> {
    pub(crate) help_var: Option<String>,
    pub(crate) handler: Multi<T, C>,
}

impl<T, C> Params<T, C>
where
    C: Collection,
    C::Item: FromArg,
{
    /// Collects the parameters, replacing the collection's contents.
    pub fn array(field: fn(&mut T) -> &mut C) -> Self {
        Params {
            help_var: None,
            handler: Multi::new(field, Shape::Array, <C::Item as FromArg>::from_arg),
        }
    }

    /// Collects the parameters, appending to the collection.
    pub fn list(field: fn(&mut T) -> &mut C) -> Self {
        Params {
            help_var: None,
            handler: Multi::new(field, Shape::List, <C::Item as FromArg>::from_arg),
        }
    }
}

impl<T, C: Collection> Params<T, C> {
    /// Sets the converter for the individual values.
    pub fn converter(mut self, convert: Converter<C::Item>) -> Self {
        self.handler.convert = convert;
        self
    }

    /// Sets the minimum number of parameters.
    pub fn min(mut self, min: usize) -> Self {
        self.handler.min = min;
        self
    }

    /// Sets the maximum number of parameters.
    pub fn max(mut self, max: usize) -> Self {
        self.handler.max = Some(max);
        self
    }

    /// Sets the exact number of parameters.
    pub fn exact(self, count: usize) -> Self {
        self.min(count).max(count)
    }

    /// Sets the name of the parameters shown in the usage.
    pub fn help_var(mut self, name: impl Into<String>) -> Self {
        self.help_var = Some(name.into());
        self
    }
}
