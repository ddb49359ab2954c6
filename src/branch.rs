//! Expression-style conditionals over tagged values.
//!
//! Each form starts with a primary condition, then walks an ordered list of
//! [`ElseIf`] alternatives, then an optional terminal else. The first branch
//! whose condition holds runs and nothing after it is evaluated.
//!
//! The tail decides the result type: passing `()` yields `Option<R>`, `None`
//! meaning no branch fired, while passing [`else_branch`] yields `R`.
//!
//! ```rust
//! use tagmatch::{else_branch, else_if, else_if_let, if_let, Registry};
//!
//! #[derive(Registry)]
//! enum Reply {
//!     Some((i32, String)),
//!     None,
//! }
//!
//! let value = Reply::of(reply::None, ());
//! let n: i32 = if_let(
//!     &value,
//!     reply::Some,
//!     |(n, _)| *n,
//!     [else_if_let(&value, reply::None, |()| -1), else_if(true, || 0)],
//!     else_branch(|| 1),
//! );
//! assert_eq!(n, -1);
//!
//! let n: Option<i32> = if_let(&value, reply::Some, |(n, _)| *n, [], ());
//! assert_eq!(n, None);
//! ```

use alloc::boxed::Box;
use core::fmt;

use crate::{
    registry::{branch_mismatch, Matchable, Pattern},
    tag::Tag,
};

type Thunk<'a, T> = Box<dyn FnOnce() -> T + 'a>;

/// One alternative of an else-if list.
pub enum ElseIf<'a, R> {
    /// Fires when `condition` is true.
    When {
        condition: bool,
        then: Thunk<'a, R>,
    },
    /// Fires when a value carried the expected tag.
    Let {
        matched: bool,
        then: Thunk<'a, R>,
    },
    /// Fires when a value carried the expected tag and its payload passed a
    /// guard. The guard only runs once the tag has matched.
    GuardedLet {
        matched: bool,
        guard: Thunk<'a, bool>,
        then: Thunk<'a, R>,
    },
}

impl<'a, R> ElseIf<'a, R> {
    /// Runs the branch if it fires.
    fn fire(self) -> Option<R> {
        match self {
            ElseIf::When { condition, then } => condition.then(then),
            ElseIf::Let { matched, then } => matched.then(then),
            ElseIf::GuardedLet {
                matched,
                guard,
                then,
            } => (matched && guard()).then(then),
        }
    }
}

impl<R> fmt::Debug for ElseIf<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElseIf::When { condition, .. } => {
                f.debug_struct("When").field("condition", condition).finish()
            }
            ElseIf::Let { matched, .. } => f.debug_struct("Let").field("matched", matched).finish(),
            ElseIf::GuardedLet { matched, .. } => {
                f.debug_struct("GuardedLet").field("matched", matched).finish()
            }
        }
    }
}

/// A plain else-if alternative.
pub fn else_if<'a, R, F>(condition: bool, then: F) -> ElseIf<'a, R>
where
    F: FnOnce() -> R + 'a,
{
    ElseIf::When {
        condition,
        then: Box::new(then),
    }
}

/// The payload of a value, if it carried the tag a branch was built for.
struct Binding<'a, T, G> {
    payload: Option<&'a T>,
    expected: G,
    found: G,
}

impl<T, G: Copy> Clone for Binding<'_, T, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, G: Copy> Copy for Binding<'_, T, G> {}

impl<'a, T, G: Tag> Binding<'a, T, G> {
    fn new<S, P>(value: &'a S, pattern: &P) -> Self
    where
        S: Matchable<Tag = G>,
        P: Pattern<S, Payload = T>,
    {
        Binding {
            payload: pattern.peek(value),
            expected: pattern.tag(),
            found: value.tag(),
        }
    }

    fn matched(self) -> bool {
        self.payload.is_some()
    }

    #[track_caller]
    fn get(self) -> &'a T {
        match self.payload {
            Some(payload) => payload,
            None => branch_mismatch(self.expected, self.found),
        }
    }
}

/// An else-if-let alternative, firing when `value` carries the tag of
/// `pattern`.
pub fn else_if_let<'a, S, P, R, F>(value: &'a S, pattern: P, then: F) -> ElseIf<'a, R>
where
    S: Matchable,
    P: Pattern<S>,
    P::Payload: 'a,
    F: FnOnce(&'a P::Payload) -> R + 'a,
{
    let binding = Binding::new(value, &pattern);
    ElseIf::Let {
        matched: binding.matched(),
        then: Box::new(move || then(binding.get())),
    }
}

/// A guarded else-if-let alternative, firing when `value` carries the tag of
/// `pattern` and `guard` accepts its payload.
pub fn guarded_else_if_let<'a, S, P, R, G, F>(
    value: &'a S,
    pattern: P,
    guard: G,
    then: F,
) -> ElseIf<'a, R>
where
    S: Matchable,
    P: Pattern<S>,
    P::Payload: 'a,
    G: FnOnce(&'a P::Payload) -> bool + 'a,
    F: FnOnce(&'a P::Payload) -> R + 'a,
{
    let binding = Binding::new(value, &pattern);
    ElseIf::GuardedLet {
        matched: binding.matched(),
        guard: Box::new(move || guard(binding.get())),
        then: Box::new(move || then(binding.get())),
    }
}

/// The terminal else of a conditional.
#[derive(Debug, Clone, Copy)]
pub struct Else<F>(F);

/// Builds a terminal else.
pub fn else_branch<R, F: FnOnce() -> R>(then: F) -> Else<F> {
    Else(then)
}

/// The end of a conditional: either nothing or a terminal [`Else`].
pub trait Tail<R> {
    /// The result type of the whole conditional.
    type Output;

    /// Produces the result, running the terminal else if nothing fired.
    fn finish(self, fired: Option<R>) -> Self::Output;
}

impl<R> Tail<R> for () {
    type Output = Option<R>;

    fn finish(self, fired: Option<R>) -> Option<R> {
        fired
    }
}

impl<R, F: FnOnce() -> R> Tail<R> for Else<F> {
    type Output = R;

    fn finish(self, fired: Option<R>) -> R {
        fired.unwrap_or_else(self.0)
    }
}

fn rest<'a, R, T>(else_ifs: impl IntoIterator<Item = ElseIf<'a, R>>, tail: T) -> T::Output
where
    T: Tail<R>,
{
    let fired = else_ifs.into_iter().find_map(ElseIf::fire);
    tail.finish(fired)
}

/// `if condition { then() } else if ... else ...` as an expression.
pub fn if_branch<'a, R, F, T>(
    condition: bool,
    then: F,
    else_ifs: impl IntoIterator<Item = ElseIf<'a, R>>,
    tail: T,
) -> T::Output
where
    F: FnOnce() -> R,
    T: Tail<R>,
{
    if condition {
        return tail.finish(Some(then()));
    }
    rest(else_ifs, tail)
}

/// `if let pattern = value { then(payload) } else if ... else ...` as an
/// expression.
pub fn if_let<'a, 'v, S, P, R, F, T>(
    value: &'v S,
    pattern: P,
    then: F,
    else_ifs: impl IntoIterator<Item = ElseIf<'a, R>>,
    tail: T,
) -> T::Output
where
    S: Matchable,
    P: Pattern<S>,
    P::Payload: 'v,
    F: FnOnce(&'v P::Payload) -> R,
    T: Tail<R>,
{
    match pattern.peek(value) {
        Some(payload) => tail.finish(Some(then(payload))),
        None => rest(else_ifs, tail),
    }
}

/// Like [`if_let`], but the primary branch also needs `guard` to accept the
/// payload.
pub fn guarded_if_let<'a, 'v, S, P, R, G, F, T>(
    value: &'v S,
    pattern: P,
    guard: G,
    then: F,
    else_ifs: impl IntoIterator<Item = ElseIf<'a, R>>,
    tail: T,
) -> T::Output
where
    S: Matchable,
    P: Pattern<S>,
    P::Payload: 'v,
    G: FnOnce(&'v P::Payload) -> bool,
    F: FnOnce(&'v P::Payload) -> R,
    T: Tail<R>,
{
    if let Some(payload) = pattern.peek(value) {
        if guard(payload) {
            return tail.finish(Some(then(payload)));
        }
    }
    rest(else_ifs, tail)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, format, string::String, vec, vec::Vec};

    use super::*;
    use crate::Registry;

    #[derive(Debug, crate::Registry)]
    enum Job {
        Queued(u32),
        Running((u32, f32)),
        Done(String),
    }

    #[test]
    fn primary_branch_short_circuits_the_rest() {
        let log = RefCell::new(Vec::new());
        let job = Job::of(job::Queued, 3);

        let got = if_let(
            &job,
            job::Queued,
            |n| {
                log.borrow_mut().push("then");
                *n
            },
            [
                else_if_let(&job, job::Running, |_| {
                    log.borrow_mut().push("running");
                    0
                }),
                guarded_else_if_let(
                    &job,
                    job::Queued,
                    |_| {
                        log.borrow_mut().push("guard");
                        true
                    },
                    |_| 0,
                ),
                else_if(true, || {
                    log.borrow_mut().push("else if");
                    0
                }),
            ],
            else_branch(|| {
                log.borrow_mut().push("else");
                0
            }),
        );

        assert_eq!(got, 3);
        assert_eq!(*log.borrow(), vec!["then"]);
    }

    #[test]
    fn else_ifs_run_in_order_and_first_wins() {
        let log = RefCell::new(Vec::new());
        let job = Job::of(job::Running, (7, 0.5));

        let got = if_let(
            &job,
            job::Done,
            |s| s.clone(),
            [
                guarded_else_if_let(
                    &job,
                    job::Queued,
                    |_| {
                        log.borrow_mut().push("queued guard");
                        true
                    },
                    |n| format!("queued {n}"),
                ),
                guarded_else_if_let(
                    &job,
                    job::Running,
                    |(_, progress)| {
                        log.borrow_mut().push("running guard");
                        *progress > 0.9
                    },
                    |(id, _)| format!("finishing {id}"),
                ),
                else_if_let(&job, job::Running, |(id, _)| format!("running {id}")),
                else_if(true, || {
                    log.borrow_mut().push("else if");
                    String::new()
                }),
            ],
            (),
        );

        assert_eq!(got.as_deref(), Some("running 7"));
        assert_eq!(*log.borrow(), vec!["running guard"]);
    }

    #[test]
    fn missing_else_means_possibly_nothing() {
        let job = Job::of(job::Done, String::from("ok"));
        let got: Option<u32> = if_let(&job, job::Queued, |n| *n, [else_if(false, || 1)], ());
        assert_eq!(got, None);

        let got: u32 = if_let(&job, job::Queued, |n| *n, [], else_branch(|| 9));
        assert_eq!(got, 9);
    }

    #[test]
    fn plain_if_branches() {
        let got = if_branch(false, || "a", [else_if(false, || "b"), else_if(true, || "c")], ());
        assert_eq!(got, Some("c"));

        let got = if_branch(true, || "a", [], else_branch(|| "z"));
        assert_eq!(got, "a");

        let got = if_branch(false, || "a", Vec::new(), else_branch(|| "z"));
        assert_eq!(got, "z");
    }

    #[test]
    fn guarded_if_let_needs_tag_and_guard() {
        let job = Job::of(job::Queued, 40);
        let big = |n: &u32| *n > 10;

        assert_eq!(guarded_if_let(&job, job::Queued, big, |n| *n, [], ()), Some(40));
        assert_eq!(
            guarded_if_let(&job, job::Queued, |n| *n > 100, |n| *n, [], else_branch(|| 0)),
            0
        );

        let calls = RefCell::new(0);
        let got = guarded_if_let(
            &job,
            job::Running,
            |_| {
                *calls.borrow_mut() += 1;
                true
            },
            |_| 1,
            [],
            (),
        );
        assert_eq!(got, None);
        assert_eq!(*calls.borrow(), 0);
    }

    fn summary(job: &Job) -> &str {
        guarded_if_let(
            job,
            job::Done,
            |s| !s.is_empty(),
            |s| s.as_str(),
            [else_if_let(job, job::Done, |_| "done")],
            else_branch(|| "pending"),
        )
    }

    #[test]
    fn branches_can_lend_out_borrowed_payloads() {
        let job = Job::of(job::Done, String::from("shipped"));
        let first_word: Option<&str> = if_let(&job, job::Done, |s| s.split(' ').next(), [], ())
            .flatten();
        assert_eq!(first_word, Some("shipped"));

        assert_eq!(summary(&job), "shipped");
        assert_eq!(summary(&Job::Done(String::new())), "done");
        assert_eq!(summary(&Job::Queued(2)), "pending");
    }

    #[test]
    #[should_panic(expected = "branch for tag `Done` invoked on a value tagged `Queued`")]
    fn forcing_a_mismatched_branch_is_a_defect() {
        let job = Job::of(job::Queued, 1);
        let branch = else_if_let(&job, job::Done, |s| s.len());
        if let ElseIf::Let { then, .. } = branch {
            then();
        }
    }
}
