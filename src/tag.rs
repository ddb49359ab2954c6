//! Discriminators of tagged values.

use core::fmt;

/// The discriminator identifying which variant a tagged value holds.
///
/// Static registries get a fieldless enum implementing this trait from
/// `#[derive(Registry)]`, dynamic registries use
/// [`DynTag`](crate::dynamic::DynTag), and `&'static str` serves ad hoc
/// hand-written registries.
pub trait Tag: Copy + Eq + fmt::Debug + 'static {
    /// The symbolic name of the tag.
    fn name(self) -> &'static str;
}

impl Tag for &'static str {
    fn name(self) -> &'static str {
        self
    }
}

/// Lists the tags of `tags` that are not contained in `covered`, preserving
/// their order.
pub(crate) fn missing<T: Tag>(tags: &[T], covered: impl Fn(T) -> bool) -> alloc::vec::Vec<T> {
    tags.iter().copied().filter(|&tag| !covered(tag)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
    }

    impl Tag for Light {
        fn name(self) -> &'static str {
            match self {
                Light::Red => "Red",
                Light::Green => "Green",
            }
        }
    }

    #[test]
    fn str_tags_name_themselves() {
        assert_eq!("SOME".name(), "SOME");
    }

    #[test]
    fn missing_keeps_declaration_order() {
        let tags = [Light::Green, Light::Red];
        assert_eq!(missing(&tags, |t| t == Light::Red), [Light::Green]);
        assert!(missing(&tags, |_| true).is_empty());
    }
}
