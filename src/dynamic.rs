//! Registries whose payload shapes are checked at run time.
//!
//! A [`Schema`] is declared once with a name, a set of string tags and one
//! payload type per tag. Values built through [`Schema::of`] are checked
//! against it and fail with [`Error::ShapeMismatch`] instead of compiling
//! into a mismatched pairing. [`Schema::variant`] hands out patterns with the
//! same check, so handler tables and conditionals built from them never see a
//! payload of the wrong type.
//!
//! Tags are qualified by the schema that declared them. A pattern of one
//! schema never matches a value of another, even when the tag names agree.
//!
//! ```rust
//! use tagmatch::{dynamic::Schema, Table};
//!
//! let schema = Schema::builder("Result")
//!     .variant::<(i32, &str)>("SOME")
//!     .unit("NONE")
//!     .build()?;
//!
//! let some = schema.variant::<(i32, &str)>("SOME")?;
//! let none = schema.variant::<()>("NONE")?;
//!
//! let value = schema.of("SOME", (12, "this is a 12"))?;
//! let n = Table::new().on(some, |(n, _)| n).on(none, |()| -1).run(value);
//! assert_eq!(n, 12);
//!
//! assert!(schema.of("SOME", 12).is_err());
//! # Ok::<(), tagmatch::Error>(())
//! ```

use alloc::{borrow::ToOwned, boxed::Box, vec::Vec};
use core::{
    any::{self, Any, TypeId},
    fmt,
    marker::PhantomData,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    error::Error,
    registry::{Matchable, Pattern},
    tag::Tag,
};

static NEXT_SCHEMA: AtomicUsize = AtomicUsize::new(0);

/// The payload type registered for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    type_id: TypeId,
    type_name: &'static str,
}

impl Shape {
    /// The shape of payloads of type `P`.
    pub fn of<P: Any>() -> Self {
        Shape {
            type_id: TypeId::of::<P>(),
            type_name: any::type_name::<P>(),
        }
    }

    /// The `TypeId` of the payload type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The name of the payload type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// The tag of a [`DynValue`]: a tag name together with the schema that
/// declared it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynTag {
    schema: usize,
    registry: &'static str,
    name: &'static str,
}

impl DynTag {
    /// The name of the schema that declared the tag.
    pub fn registry(self) -> &'static str {
        self.registry
    }
}

impl Tag for DynTag {
    fn name(self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for DynTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.registry, self.name)
    }
}

/// Declares the tags of a [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: &'static str,
    variants: Vec<(&'static str, Shape)>,
}

impl SchemaBuilder {
    /// Declares `tag` with payloads of type `P`.
    pub fn variant<P: Any + Send + Sync>(mut self, tag: &'static str) -> Self {
        self.variants.push((tag, Shape::of::<P>()));
        self
    }

    /// Declares `tag` with the unit payload.
    pub fn unit(self, tag: &'static str) -> Self {
        self.variant::<()>(tag)
    }

    /// Finishes the schema.
    ///
    /// Fails if any tag was declared twice.
    pub fn build(self) -> Result<Schema, Error> {
        let SchemaBuilder { name, variants } = self;
        for (index, (tag, _)) in variants.iter().enumerate() {
            if variants[..index].iter().any(|(t, _)| t == tag) {
                return Err(Error::DuplicateTag {
                    registry: name,
                    tag: *tag,
                });
            }
        }
        Ok(Schema {
            id: NEXT_SCHEMA.fetch_add(1, Ordering::Relaxed),
            name,
            variants,
        })
    }
}

/// A registry of string tags, each with one payload type.
///
/// Clones share their identity with the original: values and patterns of
/// either match each other.
#[derive(Debug, Clone)]
pub struct Schema {
    id: usize,
    name: &'static str,
    variants: Vec<(&'static str, Shape)>,
}

impl Schema {
    /// Starts declaring a schema called `name`.
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            variants: Vec::new(),
        }
    }

    /// The name of the schema.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Every tag, in declaration order.
    pub fn tags(&self) -> Vec<DynTag> {
        self.variants.iter().map(|&(name, _)| self.qualify(name)).collect()
    }

    /// Resolves a tag name.
    pub fn tag(&self, name: &str) -> Option<DynTag> {
        self.lookup(name).map(|(tag, _)| tag)
    }

    /// The payload shape registered for `tag`.
    pub fn shape(&self, tag: &str) -> Option<Shape> {
        self.lookup(tag).map(|(_, shape)| shape)
    }

    fn qualify(&self, name: &'static str) -> DynTag {
        DynTag {
            schema: self.id,
            registry: self.name,
            name,
        }
    }

    fn lookup(&self, tag: &str) -> Option<(DynTag, Shape)> {
        self.variants
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|&(name, shape)| (self.qualify(name), shape))
    }

    /// Resolves `tag` and checks that its payloads have type `P`.
    fn check<P: Any>(&self, tag: &str) -> Result<DynTag, Error> {
        let (tag, shape) = self.lookup(tag).ok_or_else(|| Error::UnknownTag {
            registry: self.name,
            tag: tag.to_owned(),
        })?;

        let found = Shape::of::<P>();
        if shape != found {
            return Err(Error::ShapeMismatch {
                tag: tag.name,
                expected: shape.type_name,
                found: found.type_name,
            });
        }
        Ok(tag)
    }

    /// Constructs a tagged value, checking the payload against the schema.
    pub fn of<P: Any + Send + Sync>(&self, tag: &str, payload: P) -> Result<DynValue, Error> {
        let tag = self.check::<P>(tag)?;
        Ok(DynValue {
            tag,
            payload: Box::new(payload),
        })
    }

    /// A pattern for `tag`, checking that its payloads have type `P`.
    pub fn variant<P: Any + Send + Sync>(&self, tag: &str) -> Result<DynVariant<P>, Error> {
        let tag = self.check::<P>(tag)?;
        Ok(DynVariant {
            tag,
            _marker: PhantomData,
        })
    }
}

/// A tagged value of a [`Schema`].
///
/// The tag and payload are fixed at construction. Values are `Send` and
/// `Sync`, so they may be shared read-only across threads.
pub struct DynValue {
    tag: DynTag,
    payload: Box<dyn Any + Send + Sync>,
}

impl DynValue {
    /// Borrows the payload if it has type `P`.
    pub fn payload<P: Any>(&self) -> Option<&P> {
        self.payload.downcast_ref()
    }
}

impl Matchable for DynValue {
    type Tag = DynTag;

    fn tag(&self) -> DynTag {
        self.tag
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynValue")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// A shape-checked pattern over [`DynValue`]s, obtained from
/// [`Schema::variant`].
pub struct DynVariant<P> {
    tag: DynTag,
    _marker: PhantomData<fn() -> P>,
}

impl<P> Clone for DynVariant<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for DynVariant<P> {}

impl<P> fmt::Debug for DynVariant<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynVariant")
            .field("tag", &self.tag)
            .field("payload", &any::type_name::<P>())
            .finish()
    }
}

impl<P: Any + Send + Sync> Pattern<DynValue> for DynVariant<P> {
    type Payload = P;

    fn tag(&self) -> DynTag {
        self.tag
    }

    fn peek<'v>(&self, value: &'v DynValue) -> Option<&'v P> {
        if value.tag != self.tag {
            return None;
        }
        value.payload()
    }

    fn take(&self, value: DynValue) -> Result<P, DynValue> {
        if value.tag != self.tag {
            return Err(value);
        }
        let DynValue { tag, payload } = value;
        match payload.downcast::<P>() {
            Ok(payload) => Ok(*payload),
            Err(payload) => Err(DynValue { tag, payload }),
        }
    }
}
