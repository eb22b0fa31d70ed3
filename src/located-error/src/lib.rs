use std::{fmt::Display, panic::Location};

use anyhow::Context;

pub mod prelude {
    extern crate anyhow;
    pub use anyhow::{anyhow, bail, Context, Result};

    extern crate thiserror;
    pub use thiserror::Error;

    pub use super::{LocatedError, LocatedOption};
}

/// Format the location of a `#[track_caller]` call site as `[file:line:col]`
fn stamp(caller: &Location<'_>) -> String {
    format!("[{}:{}:{}]", caller.file(), caller.line(), caller.column())
}

/// Attach context to a fallible value, prefixed with the location of the caller.
pub trait LocatedError<T, E> {
    /// Wrap the error value with additional context + the location at which it was called.
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Same as `loc()`, but `context` is only evaluated once an error does occur.
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

/// `Option` counterpart of [`LocatedError`]: `None` becomes an error carrying the caller's location.
pub trait LocatedOption<T> {
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static;

    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> LocatedError<T, E> for Result<T, E>
where
    E: Display + Send + Sync + 'static,
    Result<T, E>: Context<T, E>,
{
    #[track_caller]
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {context}", stamp(caller)))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {}", stamp(caller), f()))
    }
}

impl<T> LocatedOption<T> for Option<T> {
    #[track_caller]
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {context}", stamp(caller)))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {}", stamp(caller), f()))
    }
}
