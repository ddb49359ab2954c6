//! Guard chains: several conditional handlers for one tag.
//!
//! A chain is tried in the order its guards were added. The first guard that
//! accepts the payload has its handler run and nothing after it is evaluated.
//! [`Guards::otherwise`] closes the chain with a default that receives the
//! payload when no guard fired, producing a [`GuardChain`] that any table
//! accepts. [`Guards::end`] leaves the default out and gives a
//! [`PartialChain`] that only a [`PartialTable`] accepts.
//!
//! [`PartialTable`]: crate::PartialTable

use alloc::{boxed::Box, vec::Vec};
use core::{fmt, marker::PhantomData};

use crate::{
    registry::{expect_payload, Matchable, Pattern},
    tag::Tag,
};

type Guard<'a, T> = Box<dyn FnOnce(&T) -> bool + 'a>;
type Handler<'a, T, R> = Box<dyn FnOnce(T) -> R + 'a>;

/// Starts a guard chain for the tag of `pattern`.
pub fn guards<'a, S, P, R>(pattern: P) -> Guards<'a, S, P, R>
where
    S: Matchable,
    P: Pattern<S>,
{
    Guards {
        pattern,
        arms: Vec::new(),
        _marker: PhantomData,
    }
}

/// An unfinished guard chain.
pub struct Guards<'a, S, P, R>
where
    S: Matchable,
    P: Pattern<S>,
{
    pattern: P,
    arms: Vec<(Guard<'a, P::Payload>, Handler<'a, P::Payload, R>)>,
    _marker: PhantomData<fn(S)>,
}

impl<'a, S, P, R> Guards<'a, S, P, R>
where
    S: Matchable + 'a,
    P: Pattern<S> + 'a,
    P::Payload: 'a,
    R: 'a,
{
    /// Appends a guarded handler.
    pub fn when<G, F>(mut self, guard: G, handler: F) -> Self
    where
        G: FnOnce(&P::Payload) -> bool + 'a,
        F: FnOnce(P::Payload) -> R + 'a,
    {
        self.arms.push((Box::new(guard), Box::new(handler)));
        self
    }

    /// Closes the chain with a handler that runs when no guard fired.
    pub fn otherwise<F>(self, default: F) -> GuardChain<'a, S, R>
    where
        F: FnOnce(P::Payload) -> R + 'a,
    {
        let Guards { pattern, arms, .. } = self;
        GuardChain {
            tag: pattern.tag(),
            run: Box::new(move |value: S| {
                let payload = expect_payload(&pattern, value);
                for (guard, handler) in arms {
                    if guard(&payload) {
                        return handler(payload);
                    }
                }
                default(payload)
            }),
        }
    }

    /// Closes the chain without a default.
    pub fn end(self) -> PartialChain<'a, S, R> {
        let Guards { pattern, arms, .. } = self;
        PartialChain {
            tag: pattern.tag(),
            run: Box::new(move |value: S| {
                let payload = expect_payload(&pattern, value);
                for (guard, handler) in arms {
                    if guard(&payload) {
                        return Some(handler(payload));
                    }
                }
                None
            }),
        }
    }
}

/// A guard chain ending in an unconditional default.
pub struct GuardChain<'a, S: Matchable, R> {
    pub(crate) tag: S::Tag,
    pub(crate) run: Box<dyn FnOnce(S) -> R + 'a>,
}

impl<S: Matchable, R> GuardChain<'_, S, R> {
    /// The tag this chain handles.
    pub fn tag(&self) -> S::Tag {
        self.tag
    }
}

/// A guard chain that may let a payload through without producing a result.
pub struct PartialChain<'a, S: Matchable, R> {
    pub(crate) tag: S::Tag,
    pub(crate) run: Box<dyn FnOnce(S) -> Option<R> + 'a>,
}

impl<S: Matchable, R> PartialChain<'_, S, R> {
    /// The tag this chain handles.
    pub fn tag(&self) -> S::Tag {
        self.tag
    }
}

impl<'a, S: Matchable + 'a, R: 'a> From<GuardChain<'a, S, R>> for PartialChain<'a, S, R> {
    fn from(chain: GuardChain<'a, S, R>) -> Self {
        let GuardChain { tag, run } = chain;
        PartialChain {
            tag,
            run: Box::new(move |value: S| Some(run(value))),
        }
    }
}

impl<S: Matchable, R> fmt::Debug for GuardChain<'_, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GuardChain").field(&self.tag.name()).finish()
    }
}

impl<S: Matchable, R> fmt::Debug for PartialChain<'_, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PartialChain").field(&self.tag.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, vec, vec::Vec};

    use super::*;

    #[derive(Debug, crate::Registry)]
    enum Temp {
        Celsius(i32),
        Unknown,
    }

    #[test]
    fn first_accepting_guard_wins() {
        let log = RefCell::new(Vec::new());
        let chain = guards(temp::Celsius)
            .when(
                |t| {
                    log.borrow_mut().push("g1");
                    *t < 0
                },
                |_| "freezing",
            )
            .when(
                |t| {
                    log.borrow_mut().push("g2");
                    *t < 30
                },
                |_| "mild",
            )
            .when(
                |_| {
                    log.borrow_mut().push("g3");
                    true
                },
                |_| "warm",
            )
            .otherwise(|_| "unreachable");

        assert_eq!(chain.tag(), temp::Tag::Celsius);
        assert_eq!((chain.run)(Temp::Celsius(12)), "mild");
        assert_eq!(*log.borrow(), vec!["g1", "g2"]);
    }

    #[test]
    fn default_receives_the_payload() {
        let chain = guards(temp::Celsius)
            .when(|t| *t > 100, |_| -1)
            .otherwise(|t| t * 2);
        assert_eq!((chain.run)(Temp::Celsius(21)), 42);
    }

    #[test]
    fn open_chain_yields_nothing_when_no_guard_fires() {
        let chain = guards(temp::Celsius).when(|t| *t > 100, |t| t).end();
        assert_eq!((chain.run)(Temp::Celsius(7)), None);

        let chain: PartialChain<'_, Temp, i32> =
            guards(temp::Celsius).otherwise(|t| t).into();
        assert_eq!((chain.run)(Temp::Celsius(7)), Some(7));
    }

    #[test]
    #[should_panic(expected = "branch for tag `Celsius` invoked on a value tagged `Unknown`")]
    fn running_on_another_tag_is_a_defect() {
        let chain = guards(temp::Celsius).otherwise(|t| t);
        (chain.run)(Temp::Unknown);
    }
}
