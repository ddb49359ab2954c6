//! Handler tables and the dispatch over them.
//!
//! A table maps tags to handlers and may carry one `ELSE` handler taking no
//! arguments. Dispatch looks up the tag of the value, runs the handler found
//! there (a plain handler or a [guard chain](crate::guard)), and falls back
//! to `ELSE` when the tag has no entry.
//!
//! [`Table`] is the exhaustive form: a tag with neither a handler nor `ELSE`
//! means the table was built wrong, and dispatch panics. [`PartialTable`]
//! answers `None` in that case instead.
//!
//! Tables are built fresh for each match and consumed by it, so handlers may
//! be `FnOnce` and may borrow from the surrounding scope.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::{
    error::{defect, Error},
    guard::{GuardChain, PartialChain},
    registry::{expect_payload, Matchable, Pattern},
    tag::{self, Tag},
};

type Handler<'a, S, O> = Box<dyn FnOnce(S) -> O + 'a>;
type Fallback<'a, R> = Box<dyn FnOnce() -> R + 'a>;

/// Tag-keyed handlers shared by both table forms.
struct Arms<'a, S: Matchable, O> {
    entries: Vec<(S::Tag, Handler<'a, S, O>)>,
}

impl<'a, S: Matchable, O> Arms<'a, S, O> {
    fn new() -> Self {
        Arms {
            entries: Vec::new(),
        }
    }

    /// Registers `handler` for `tag`, replacing any earlier entry.
    fn insert(&mut self, tag: S::Tag, handler: Handler<'a, S, O>) {
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((tag, handler)),
        }
    }

    fn contains(&self, tag: S::Tag) -> bool {
        self.entries.iter().any(|(t, _)| *t == tag)
    }

    fn remove(self, tag: S::Tag) -> Option<Handler<'a, S, O>> {
        self.entries
            .into_iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, handler)| handler)
    }

    fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(t, _)| t.name()).collect()
    }
}

/// An exhaustive handler table.
///
/// # Examples
///
/// ```rust
/// use tagmatch::{exhaustive_match, Registry, Table};
///
/// #[derive(Registry)]
/// enum Reply {
///     Some((i32, String)),
///     None,
/// }
///
/// let table = || {
///     Table::new()
///         .on(reply::Some, |(n, _s)| n)
///         .on(reply::None, |()| -1)
/// };
///
/// let value = Reply::of(reply::Some, (12, "x".to_string()));
/// assert_eq!(exhaustive_match(value, table()), 12);
/// assert_eq!(exhaustive_match(Reply::of(reply::None, ()), table()), -1);
/// ```
pub struct Table<'a, S: Matchable, R> {
    arms: Arms<'a, S, R>,
    fallback: Option<Fallback<'a, R>>,
}

impl<'a, S: Matchable + 'a, R: 'a> Table<'a, S, R> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Table {
            arms: Arms::new(),
            fallback: None,
        }
    }

    /// Handles the tag of `pattern` with `handler`, which receives the payload.
    pub fn on<P, F>(mut self, pattern: P, handler: F) -> Self
    where
        P: Pattern<S> + 'a,
        F: FnOnce(P::Payload) -> R + 'a,
    {
        let tag = pattern.tag();
        let handler = move |value: S| handler(expect_payload(&pattern, value));
        self.arms.insert(tag, Box::new(handler));
        self
    }

    /// Handles the tag of `chain` with a guard chain.
    pub fn chain(mut self, chain: GuardChain<'a, S, R>) -> Self {
        self.arms.insert(chain.tag, chain.run);
        self
    }

    /// Sets the `ELSE` handler, run for every tag without an entry.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: FnOnce() -> R + 'a,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Returns the tags among `tags` this table would not handle.
    ///
    /// Always empty once an `ELSE` handler is set.
    pub fn uncovered(&self, tags: &[S::Tag]) -> Vec<S::Tag> {
        if self.fallback.is_some() {
            return Vec::new();
        }
        tag::missing(tags, |t| self.arms.contains(t))
    }

    /// Dispatches `value` to exactly one handler and returns its result.
    ///
    /// # Panics
    ///
    /// Panics if the tag of `value` has no entry and there is no `ELSE`
    /// handler.
    #[track_caller]
    pub fn run(self, value: S) -> R {
        let tag = value.tag();
        let Table { arms, fallback } = self;

        if let Some(handler) = arms.remove(tag) {
            #[cfg(feature = "tracing")]
            tracing::trace!(tag = tag.name(), "match.dispatch");

            return handler(value);
        }

        match fallback {
            Some(fallback) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(tag = tag.name(), "match.fallback");

                fallback()
            }
            None => defect(Error::HandlerKey { tag: tag.name() }),
        }
    }
}

impl<'a, S: Matchable + 'a, R: 'a> Default for Table<'a, S, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Matchable, R> fmt::Debug for Table<'_, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = self.arms.names();
        f.debug_struct("Table")
            .field("tags", &tags)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// A handler table that may leave tags unhandled.
pub struct PartialTable<'a, S: Matchable, R> {
    arms: Arms<'a, S, Option<R>>,
    fallback: Option<Fallback<'a, R>>,
}

impl<'a, S: Matchable + 'a, R: 'a> PartialTable<'a, S, R> {
    /// Creates an empty table.
    pub fn new() -> Self {
        PartialTable {
            arms: Arms::new(),
            fallback: None,
        }
    }

    /// Handles the tag of `pattern` with `handler`, which receives the payload.
    pub fn on<P, F>(mut self, pattern: P, handler: F) -> Self
    where
        P: Pattern<S> + 'a,
        F: FnOnce(P::Payload) -> R + 'a,
    {
        let tag = pattern.tag();
        let handler = move |value: S| Some(handler(expect_payload(&pattern, value)));
        self.arms.insert(tag, Box::new(handler));
        self
    }

    /// Handles the tag of `chain` with a guard chain, with or without a
    /// default.
    pub fn chain(mut self, chain: impl Into<PartialChain<'a, S, R>>) -> Self {
        let PartialChain { tag, run } = chain.into();
        self.arms.insert(tag, run);
        self
    }

    /// Sets the `ELSE` handler, run for every tag without an entry.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: FnOnce() -> R + 'a,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Returns the tags among `tags` this table would answer `None` for
    /// without running anything.
    pub fn uncovered(&self, tags: &[S::Tag]) -> Vec<S::Tag> {
        if self.fallback.is_some() {
            return Vec::new();
        }
        tag::missing(tags, |t| self.arms.contains(t))
    }

    /// Dispatches `value` to at most one handler.
    ///
    /// Returns `None` when the tag has no entry and there is no `ELSE`
    /// handler, or when an open guard chain let the payload through.
    pub fn run(self, value: S) -> Option<R> {
        let tag = value.tag();
        let PartialTable { arms, fallback } = self;

        if let Some(handler) = arms.remove(tag) {
            #[cfg(feature = "tracing")]
            tracing::trace!(tag = tag.name(), "match.dispatch");

            return handler(value);
        }

        match fallback {
            Some(fallback) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(tag = tag.name(), "match.fallback");

                Some(fallback())
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(tag = tag.name(), "match.absent");

                None
            }
        }
    }
}

impl<'a, S: Matchable + 'a, R: 'a> Default for PartialTable<'a, S, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Matchable, R> fmt::Debug for PartialTable<'_, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = self.arms.names();
        f.debug_struct("PartialTable")
            .field("tags", &tags)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Matches `value` against an exhaustive table. See [`Table::run`].
#[track_caller]
pub fn exhaustive_match<'a, S: Matchable + 'a, R: 'a>(value: S, table: Table<'a, S, R>) -> R {
    table.run(value)
}

/// Matches `value` against a partial table. See [`PartialTable::run`].
pub fn partial_match<'a, S: Matchable + 'a, R: 'a>(
    value: S,
    table: PartialTable<'a, S, R>,
) -> Option<R> {
    table.run(value)
}
