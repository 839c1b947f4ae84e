//! Conversion of raw argument strings into typed values.
//!
//! Every value that ends up in an option bag goes through [`FromArg`].  The
//! crate implements it for the common standard library types.  For other
//! types there are two fallbacks: anything implementing [`FromStr`] can be
//! hooked up with [`from_arg_via_from_str!`](crate::from_arg_via_from_str) or
//! with [`parse`] as explicit converter, and types that are constructed from
//! a single [`String`] can use [`construct`].
use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::num::{
    NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8, NonZeroIsize, NonZeroU16, NonZeroU32,
    NonZeroU64, NonZeroU8, NonZeroUsize,
};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::BoxError;

/// Converts a raw argument string into a value.
pub trait FromArg: Sized {
    /// Converts the given value.
    fn from_arg(value: &str) -> Result<Self, BoxError>;
}

/// A converter function as accepted by the option declarations.
pub type Converter<V> = fn(&str) -> Result<V, BoxError>;

/// Converts a value through [`FromStr`].
pub fn parse<V>(value: &str) -> Result<V, BoxError>
where
    V: FromStr,
    V::Err: Into<BoxError>,
{
    V::from_str(value).map_err(Into::into)
}

/// Converts a value through a `From<String>` constructor.
pub fn construct<V: From<String>>(value: &str) -> Result<V, BoxError> {
    Ok(V::from(value.to_string()))
}

/// Implements [`FromArg`] for types via their [`FromStr`] implementation.
///
/// ```
/// # use argument_binder::from_arg_via_from_str;
/// #[derive(Debug)]
/// struct Port(u16);
///
/// impl std::str::FromStr for Port {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Port, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// from_arg_via_from_str!(Port);
/// ```
#[macro_export]
macro_rules! from_arg_via_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::FromArg for $ty {
                fn from_arg(value: &str) -> ::std::result::Result<Self, $crate::BoxError> {
                    $crate::convert::parse(value)
                }
            }
        )*
    };
}

from_arg_via_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
    NonZeroI8, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroIsize, NonZeroU8, NonZeroU16,
    NonZeroU32, NonZeroU64, NonZeroUsize, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4,
    SocketAddrV6,
);

impl FromArg for String {
    fn from_arg(value: &str) -> Result<Self, BoxError> {
        Ok(value.to_string())
    }
}

impl FromArg for OsString {
    fn from_arg(value: &str) -> Result<Self, BoxError> {
        Ok(value.into())
    }
}

impl FromArg for PathBuf {
    fn from_arg(value: &str) -> Result<Self, BoxError> {
        Ok(value.into())
    }
}

/// The recognized spellings of booleans.
const BOOLEANS: &[(&str, bool)] = &[
    ("yes", true),
    ("on", true),
    ("true", true),
    ("1", true),
    ("no", false),
    ("off", false),
    ("false", false),
    ("0", false),
];

/// Returned for strings that are not one of the boolean spellings.
#[derive(Debug, thiserror::Error)]
#[error("expected one of yes/no, true/false, on/off, 1/0")]
pub struct InvalidBool;

impl FromArg for bool {
    fn from_arg(value: &str) -> Result<Self, BoxError> {
        let value = value.trim();
        BOOLEANS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|&(_, rv)| rv)
            .ok_or_else(|| InvalidBool.into())
    }
}

/// A closed set of symbols a value can be selected from.
///
/// Values are looked up case-insensitively by symbol name.  This is
/// typically implemented for plain enums:
///
/// ```
/// use argument_binder::Enumerated;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color {
///     Auto,
///     Always,
///     Never,
/// }
///
/// impl Enumerated for Color {
///     const SYMBOLS: &'static [(&'static str, Self)] = &[
///         ("auto", Color::Auto),
///         ("always", Color::Always),
///         ("never", Color::Never),
///     ];
/// }
/// ```
pub trait Enumerated: Clone + 'static {
    /// All symbols with their values.
    const SYMBOLS: &'static [(&'static str, Self)];

    /// Looks up a value by symbol name, ignoring case.
    fn from_symbol(symbol: &str) -> Result<Self, UnknownSymbol> {
        Self::SYMBOLS
            .iter()
            .find(|(name, _)| name.to_lowercase() == symbol.to_lowercase())
            .map(|(_, value)| value.clone())
            .ok_or_else(|| UnknownSymbol {
                allowed: Self::SYMBOLS.iter().map(|(name, _)| *name).collect(),
            })
    }
}

/// Returned when a value is none of an [`Enumerated`] type's symbols.
#[derive(Debug, thiserror::Error)]
#[error("must be one of {}", .allowed.join(", "))]
pub struct UnknownSymbol {
    pub allowed: Vec<&'static str>,
}
