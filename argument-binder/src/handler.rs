//! The binding strategies behind declared options.
//!
//! Each declared option owns exactly one handler.  The handler receives the
//! raw values the scanner hands it, keeps track of whether (and how often)
//! it was set during the current scan and writes the final value into the
//! option bag.  The set of handlers is closed: [`Plain`], [`Flag`],
//! [`Counter`], [`Choice`] and [`Multi`].
use std::any::type_name;
use std::collections::{LinkedList, VecDeque};

use crate::convert::{Converter, Enumerated};
use crate::error::{
    BoxError, Error, ErrorKind, NotEnoughValues, TooManyValues, UnexpectedValue,
};

mod private {
    pub trait Sealed {}
}

/// What to do when an option is given more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collision {
    /// Keep the first value.
    #[default]
    Ignore,
    /// Every occurrence replaces the previous value.
    Overwrite,
    /// Fail with [`ErrorKind::DuplicateArgument`].
    Throw,
}

/// The capability shared by all option handlers.
///
/// This trait is sealed, the handlers are created through the
/// [`Arg`](crate::Arg) and [`Params`](crate::Params) constructors.
pub trait Handler<T>: private::Sealed {
    /// Does this handler consume a value?
    fn takes_value(&self) -> bool;

    /// Can this handler be meaningfully given more than once?
    fn accepts_multiple(&self) -> bool;

    /// Was the handler set during the current scan?
    fn was_set(&self) -> bool;

    /// Accepts a single occurrence, with its value if it takes one.
    fn accept(&mut self, bag: &mut T, value: Option<&str>) -> Result<(), Error>;

    /// Commits accumulated state into the bag and checks lower bounds.
    fn finish(&mut self, bag: &mut T) -> Result<(), Error>;

    /// Clears all per-scan state.
    fn reset(&mut self);

    /// The default name of the value in the usage.
    fn help_var(&self) -> String;

    /// Checks the declaration for consistency.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Where a converted value is written to.
pub(crate) enum Target<T, V> {
    Field(fn(&mut T) -> &mut V),
    Setter(Box<dyn Fn(&mut T, V) -> Result<(), BoxError>>),
}

impl<T, V> Target<T, V> {
    fn write(&self, bag: &mut T, value: V) -> Result<(), BoxError> {
        match self {
            Target::Field(field) => {
                *field(bag) = value;
                Ok(())
            }
            Target::Setter(setter) => setter(bag, value),
        }
    }
}

/// Applies a collision policy.  Returns `true` if the value should be
/// assigned.
fn should_assign(was_set: bool, collision: Collision) -> Result<bool, Error> {
    if !was_set {
        return Ok(true);
    }
    match collision {
        Collision::Throw => Err(Error::new(ErrorKind::DuplicateArgument)),
        Collision::Ignore => Ok(false),
        Collision::Overwrite => Ok(true),
    }
}

fn missing_value() -> Error {
    Error::new(ErrorKind::InvalidValue)
}

fn invalid_value(value: &str, source: BoxError) -> Error {
    Error::new(ErrorKind::InvalidValue)
        .with_string_value(value)
        .with_source(source)
}

fn check_bounds(min: usize, max: Option<usize>) -> Result<(), String> {
    match max {
        Some(0) => Err("maximum number of values must be at least 1".into()),
        Some(max) if min > max => Err(format!(
            "minimum number of values ({}) exceeds the maximum ({})",
            min, max
        )),
        _ => Ok(()),
    }
}

/// Returns the unqualified name of a type, upper-cased.
fn type_help_var<V>() -> String {
    let name = type_name::<V>();
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name).to_uppercase()
}

/// A single value of any convertible type.
pub struct Plain<T, V> {
    pub(crate) target: Target<T, V>,
    pub(crate) convert: Converter<V>,
    pub(crate) collision: Collision,
    was_set: bool,
}

impl<T, V> Plain<T, V> {
    pub(crate) fn new(target: Target<T, V>, convert: Converter<V>) -> Plain<T, V> {
        Plain {
            target,
            convert,
            collision: Collision::default(),
            was_set: false,
        }
    }
}

impl<T, V> private::Sealed for Plain<T, V> {}

impl<T, V> Handler<T> for Plain<T, V> {
    fn takes_value(&self) -> bool {
        true
    }

    fn accepts_multiple(&self) -> bool {
        false
    }

    fn was_set(&self) -> bool {
        self.was_set
    }

    fn accept(&mut self, bag: &mut T, value: Option<&str>) -> Result<(), Error> {
        let value = value.ok_or_else(missing_value)?;
        if !should_assign(self.was_set, self.collision)? {
            return Ok(());
        }
        let converted = (self.convert)(value).map_err(|err| invalid_value(value, err))?;
        self.target
            .write(bag, converted)
            .map_err(|err| invalid_value(value, err))?;
        self.was_set = true;
        Ok(())
    }

    fn finish(&mut self, _bag: &mut T) -> Result<(), Error> {
        Ok(())
    }

    fn reset(&mut self) {
        self.was_set = false;
    }

    fn help_var(&self) -> String {
        type_help_var::<V>()
    }
}

/// A boolean switch that does not take a value.
pub struct Flag<T> {
    pub(crate) field: fn(&mut T) -> &mut bool,
    pub(crate) when_set: bool,
    pub(crate) collision: Collision,
    was_set: bool,
}

impl<T> Flag<T> {
    pub(crate) fn new(field: fn(&mut T) -> &mut bool) -> Flag<T> {
        Flag {
            field,
            when_set: true,
            collision: Collision::default(),
            was_set: false,
        }
    }
}

impl<T> private::Sealed for Flag<T> {}

impl<T> Handler<T> for Flag<T> {
    fn takes_value(&self) -> bool {
        false
    }

    fn accepts_multiple(&self) -> bool {
        false
    }

    fn was_set(&self) -> bool {
        self.was_set
    }

    fn accept(&mut self, bag: &mut T, value: Option<&str>) -> Result<(), Error> {
        if let Some(value) = value {
            return Err(invalid_value(value, Box::new(UnexpectedValue)));
        }
        if should_assign(self.was_set, self.collision)? {
            *(self.field)(bag) = self.when_set;
            self.was_set = true;
        }
        Ok(())
    }

    fn finish(&mut self, bag: &mut T) -> Result<(), Error> {
        if !self.was_set {
            *(self.field)(bag) = !self.when_set;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.was_set = false;
    }

    fn help_var(&self) -> String {
        String::new()
    }
}

/// Counts how often an option was given.
pub struct Counter<T, V> {
    pub(crate) field: fn(&mut T) -> &mut V,
    pub(crate) min: usize,
    pub(crate) max: Option<usize>,
    count: u64,
}

impl<T, V> Counter<T, V> {
    pub(crate) fn new(field: fn(&mut T) -> &mut V) -> Counter<T, V> {
        Counter {
            field,
            min: 0,
            max: None,
            count: 0,
        }
    }
}

impl<T, V> private::Sealed for Counter<T, V> {}

impl<T, V> Handler<T> for Counter<T, V>
where
    V: TryFrom<u64>,
    V::Error: Into<BoxError>,
{
    fn takes_value(&self) -> bool {
        false
    }

    fn accepts_multiple(&self) -> bool {
        true
    }

    fn was_set(&self) -> bool {
        self.count > 0
    }

    fn accept(&mut self, _bag: &mut T, value: Option<&str>) -> Result<(), Error> {
        if let Some(value) = value {
            return Err(invalid_value(value, Box::new(UnexpectedValue)));
        }
        if let Some(max) = self.max {
            if self.count >= max as u64 {
                return Err(Error::new(ErrorKind::InvalidValue)
                    .with_source(Box::new(TooManyValues { max })));
            }
        }
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self, bag: &mut T) -> Result<(), Error> {
        if self.count < self.min as u64 {
            return Err(
                Error::new(ErrorKind::MissingRequired).with_source(Box::new(NotEnoughValues {
                    min: self.min,
                    got: self.count as usize,
                })),
            );
        }
        if self.count == 0 {
            return Ok(());
        }
        let count = V::try_from(self.count)
            .map_err(|err| invalid_value(&self.count.to_string(), err.into()))?;
        *(self.field)(bag) = count;
        tracing::trace!(count = self.count, "committed counter");
        Ok(())
    }

    fn reset(&mut self) {
        self.count = 0;
    }

    fn help_var(&self) -> String {
        String::new()
    }

    fn validate(&self) -> Result<(), String> {
        check_bounds(self.min, self.max)
    }
}

/// A value selected by name from a closed set of symbols.
pub struct Choice<T, V> {
    pub(crate) field: fn(&mut T) -> &mut V,
    pub(crate) collision: Collision,
    was_set: bool,
}

impl<T, V> Choice<T, V> {
    pub(crate) fn new(field: fn(&mut T) -> &mut V) -> Choice<T, V> {
        Choice {
            field,
            collision: Collision::default(),
            was_set: false,
        }
    }
}

impl<T, V> private::Sealed for Choice<T, V> {}

impl<T, V: Enumerated> Handler<T> for Choice<T, V> {
    fn takes_value(&self) -> bool {
        true
    }

    fn accepts_multiple(&self) -> bool {
        false
    }

    fn was_set(&self) -> bool {
        self.was_set
    }

    fn accept(&mut self, bag: &mut T, value: Option<&str>) -> Result<(), Error> {
        let value = value.ok_or_else(missing_value)?;
        if !should_assign(self.was_set, self.collision)? {
            return Ok(());
        }
        let selected = V::from_symbol(value).map_err(|err| invalid_value(value, Box::new(err)))?;
        *(self.field)(bag) = selected;
        self.was_set = true;
        Ok(())
    }

    fn finish(&mut self, _bag: &mut T) -> Result<(), Error> {
        Ok(())
    }

    fn reset(&mut self) {
        self.was_set = false;
    }

    fn help_var(&self) -> String {
        V::SYMBOLS
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// An ordered collection that can receive multiple values.
///
/// Values are kept in the order they were given, duplicates included.
/// This is implemented for `Vec`, `Box<[T]>`, `VecDeque` and `LinkedList`.
pub trait Collection {
    /// The type of the collected values.
    type Item;

    /// Removes all values.
    fn clear_items(&mut self);

    /// Appends the given values.
    fn extend_items(&mut self, items: Vec<Self::Item>);
}

impl<V> Collection for Vec<V> {
    type Item = V;

    fn clear_items(&mut self) {
        self.clear();
    }

    fn extend_items(&mut self, items: Vec<V>) {
        self.extend(items);
    }
}

impl<V> Collection for Box<[V]> {
    type Item = V;

    fn clear_items(&mut self) {
        *self = Vec::new().into_boxed_slice();
    }

    fn extend_items(&mut self, items: Vec<V>) {
        let mut values = std::mem::take(self).into_vec();
        values.extend(items);
        *self = values.into_boxed_slice();
    }
}

impl<V> Collection for VecDeque<V> {
    type Item = V;

    fn clear_items(&mut self) {
        self.clear();
    }

    fn extend_items(&mut self, items: Vec<V>) {
        self.extend(items);
    }
}

impl<V> Collection for LinkedList<V> {
    type Item = V;

    fn clear_items(&mut self) {
        self.clear();
    }

    fn extend_items(&mut self, items: Vec<V>) {
        self.extend(items);
    }
}

/// How collected values end up in the target collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// The collection's contents are replaced.
    Array,
    /// The values are appended to what the collection already holds.
    List,
}

/// A bounded sequence of values.
pub struct Multi<T, C: Collection> {
    pub(crate) field: fn(&mut T) -> &mut C,
    pub(crate) shape: Shape,
    pub(crate) convert: Converter<C::Item>,
    pub(crate) min: usize,
    pub(crate) max: Option<usize>,
    values: Vec<C::Item>,
}

impl<T, C: Collection> Multi<T, C> {
    pub(crate) fn new(
        field: fn(&mut T) -> &mut C,
        shape: Shape,
        convert: Converter<C::Item>,
    ) -> Multi<T, C> {
        Multi {
            field,
            shape,
            convert,
            min: 0,
            max: None,
            values: Vec::new(),
        }
    }
}

impl<T, C: Collection> private::Sealed for Multi<T, C> {}

impl<T, C: Collection> Handler<T> for Multi<T, C> {
    fn takes_value(&self) -> bool {
        true
    }

    fn accepts_multiple(&self) -> bool {
        true
    }

    fn was_set(&self) -> bool {
        !self.values.is_empty()
    }

    fn accept(&mut self, _bag: &mut T, value: Option<&str>) -> Result<(), Error> {
        let value = value.ok_or_else(missing_value)?;
        if let Some(max) = self.max {
            if self.values.len() >= max {
                return Err(invalid_value(value, Box::new(TooManyValues { max })));
            }
        }
        let converted = (self.convert)(value).map_err(|err| invalid_value(value, err))?;
        self.values.push(converted);
        Ok(())
    }

    fn finish(&mut self, bag: &mut T) -> Result<(), Error> {
        if self.values.len() < self.min {
            return Err(
                Error::new(ErrorKind::MissingRequired).with_source(Box::new(NotEnoughValues {
                    min: self.min,
                    got: self.values.len(),
                })),
            );
        }
        if self.values.is_empty() {
            return Ok(());
        }
        let target = (self.field)(bag);
        if self.shape == Shape::Array {
            target.clear_items();
        }
        tracing::trace!(count = self.values.len(), shape = ?self.shape, "committed values");
        target.extend_items(std::mem::take(&mut self.values));
        Ok(())
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn help_var(&self) -> String {
        type_help_var::<C::Item>()
    }

    fn validate(&self) -> Result<(), String> {
        check_bounds(self.min, self.max)
    }
}
