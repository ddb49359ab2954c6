//! Variant registries and the tagged values built from them.
//!
//! A registry is the closed set of tags of one sum type together with the
//! payload type of every tag. In Rust that is simply an enum whose variants
//! carry exactly one payload each; `#[derive(Registry)]` adds the tag enum
//! and one marker per variant so that the variants can be named as values:
//!
//! ```rust
//! use tagmatch::{Matchable, Registry};
//!
//! #[derive(Debug, PartialEq, Registry)]
//! enum Reply {
//!     Some((i32, String)),
//!     None,
//! }
//!
//! let value = Reply::of(reply::Some, (12, "x".to_string()));
//! assert_eq!(value.tag(), reply::Tag::Some);
//! assert_eq!(value.get(reply::Some), Some(&(12, "x".to_string())));
//! assert_eq!(Reply::TAGS, &[reply::Tag::Some, reply::Tag::None]);
//! ```

use crate::{
    error::{defect, Error},
    tag::Tag,
};

/// A tagged value: exactly one tag paired with the payload registered for it.
pub trait Matchable: Sized {
    /// The tag type.
    type Tag: Tag;

    /// Returns the tag of this value.
    fn tag(&self) -> Self::Tag;

    /// Returns whether the value carries the tag of `pattern`.
    fn is<P: Pattern<Self>>(&self, pattern: P) -> bool {
        self.tag() == pattern.tag()
    }

    /// Borrows the payload if the value carries the tag of `pattern`.
    fn get<P: Pattern<Self>>(&self, pattern: P) -> Option<&P::Payload> {
        pattern.peek(self)
    }

    /// Takes the payload out if the value carries the tag of `pattern`, or
    /// gives the value back untouched.
    fn try_unwrap<P: Pattern<Self>>(self, pattern: P) -> Result<P::Payload, Self> {
        pattern.take(self)
    }

    /// Calls `f` with the payload if the value carries the tag of `pattern`.
    fn inspect<P, F>(self, pattern: P, f: F) -> Self
    where
        P: Pattern<Self>,
        F: FnOnce(&P::Payload),
    {
        if let Some(payload) = pattern.peek(&self) {
            f(payload);
        }
        self
    }
}

/// Names one tag of `S` together with the type of its payload.
pub trait Pattern<S: Matchable> {
    /// The payload type registered for the tag.
    type Payload;

    /// The tag this pattern selects.
    fn tag(&self) -> S::Tag;

    /// Borrows the payload of `value` if it carries this tag.
    fn peek<'v>(&self, value: &'v S) -> Option<&'v Self::Payload>;

    /// Moves the payload out of `value` if it carries this tag.
    fn take(&self, value: S) -> Result<Self::Payload, S>;
}

/// A pattern that can also build values of `S`.
pub trait Variant<S: Matchable>: Pattern<S> {
    /// The tag of the variant.
    const TAG: S::Tag;

    /// Pairs `payload` with the tag of this variant.
    fn inject(payload: Self::Payload) -> S;
}

/// The closed set of tags of one sum type.
///
/// Usually derived; see the [module documentation](self).
pub trait Registry: Matchable {
    /// The name of the sum type.
    const NAME: &'static str;

    /// Every tag, in declaration order.
    const TAGS: &'static [Self::Tag];

    /// Constructs a tagged value from a variant and its payload.
    fn of<V: Variant<Self>>(variant: V, payload: V::Payload) -> Self {
        of(variant, payload)
    }
}

/// Constructs a tagged value from a variant and its payload.
pub fn of<S: Matchable, V: Variant<S>>(_variant: V, payload: V::Payload) -> S {
    V::inject(payload)
}

/// Moves the payload out of a value the caller already dispatched on
/// `pattern`'s tag.
#[track_caller]
pub(crate) fn expect_payload<S: Matchable, P: Pattern<S>>(pattern: &P, value: S) -> P::Payload {
    match pattern.take(value) {
        Ok(payload) => payload,
        Err(value) => branch_mismatch(pattern.tag(), value.tag()),
    }
}

/// Aborts on a branch run against a value carrying another tag.
#[track_caller]
pub(crate) fn branch_mismatch<T: Tag>(expected: T, found: T) -> ! {
    defect(Error::BranchKeyMismatch {
        expected: expected.name(),
        found: found.name(),
    })
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        string::{String, ToString},
    };

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Debug, Clone, PartialEq, crate::Registry)]
    enum Shape {
        Dot,
        Circle(u32),
        Segment((Point, Point)),
        Label(String),
    }

    #[test]
    fn construction_pairs_tag_and_payload() {
        let circle = Shape::of(shape::Circle, 3);
        assert_eq!(circle, Shape::Circle(3));
        assert_eq!(circle.tag(), shape::Tag::Circle);
        assert_eq!(circle.tag().name(), "Circle");

        let dot: Shape = of(shape::Dot, ());
        assert_eq!(dot, Shape::Dot);
        assert_eq!(<shape::Dot as Variant<Shape>>::TAG, shape::Tag::Dot);
    }

    #[test]
    fn registry_lists_tags_in_order() {
        assert_eq!(Shape::NAME, "Shape");
        assert_eq!(
            Shape::TAGS,
            &[
                shape::Tag::Dot,
                shape::Tag::Circle,
                shape::Tag::Segment,
                shape::Tag::Label
            ]
        );
    }

    #[test]
    fn accessors_respect_the_tag() {
        let seg = Shape::of(
            shape::Segment,
            (Point { x: 0, y: 0 }, Point { x: 1, y: 2 }),
        );
        assert!(seg.is(shape::Segment));
        assert!(!seg.is(shape::Dot));
        assert_eq!(seg.get(shape::Segment).map(|(_, b)| b.y), Some(2));
        assert_eq!(seg.get(shape::Circle), None);

        let seg = seg.try_unwrap(shape::Label).unwrap_err();
        let (a, _) = seg.try_unwrap(shape::Segment).unwrap();
        assert_eq!(a, Point { x: 0, y: 0 });

        assert_eq!(Shape::Dot.get(shape::Dot), Some(&()));
        assert_eq!(Shape::Dot.try_unwrap(shape::Dot), Ok(()));
    }

    #[test]
    fn inspect_only_sees_its_tag() {
        let seen = Cell::new(0);
        let label = Shape::of(shape::Label, "hi".to_string())
            .inspect(shape::Circle, |_| seen.set(seen.get() + 1))
            .inspect(shape::Label, |s| seen.set(seen.get() + s.len()));
        assert_eq!(seen.get(), 2);
        assert_eq!(label, Shape::Label("hi".to_string()));
    }
}
