//! Bidirectional value transformation between a property's backing
//! representation and its exposed type.
//!
//! A [`Transformer`] pairs a total `read` function (`R -> T`) with a partial
//! `write` function (`T -> Option<R>`). Writes may fail for malformed input;
//! the optional write fallback keeps the backing value well defined in that
//! case, so a bad persisted string degrades to a safe default instead of
//! surfacing an error.

use std::rc::Rc;

/// Immutable pair of conversion functions between a backing type `R` and an
/// exposed type `T`, with an optional fallback backing value for failed
/// writes.
pub struct Transformer<R, T> {
    read: Rc<dyn Fn(&R) -> T>,
    write: Rc<dyn Fn(&T) -> Option<R>>,
    fallback: Option<R>,
}

impl<R, T> Transformer<R, T> {
    /// Builds a transformer from a write and a read function.
    pub fn of(
        write: impl Fn(&T) -> Option<R> + 'static,
        read: impl Fn(&R) -> T + 'static,
    ) -> Self {
        Transformer {
            read: Rc::new(read),
            write: Rc::new(write),
            fallback: None,
        }
    }

    /// Returns the same transformer with `fallback` substituted into the
    /// backing value whenever `write` fails.
    pub fn write_fallback(mut self, fallback: R) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn read(&self, backing: &R) -> T {
        (self.read)(backing)
    }

    pub fn write(&self, value: &T) -> Option<R> {
        (self.write)(value)
    }

    pub fn fallback(&self) -> Option<&R> {
        self.fallback.as_ref()
    }
}

impl<R: Clone, T> Clone for Transformer<R, T> {
    fn clone(&self) -> Self {
        Transformer {
            read: Rc::clone(&self.read),
            write: Rc::clone(&self.write),
            fallback: self.fallback.clone(),
        }
    }
}

/// Free-function form of [`Transformer::of`].
pub fn transformer_of<R, T>(
    write: impl Fn(&T) -> Option<R> + 'static,
    read: impl Fn(&R) -> T + 'static,
) -> Transformer<R, T> {
    Transformer::of(write, read)
}

/// Transformer where backing and exposed types coincide and both directions
/// are the identity.
pub fn identity_transformer<T: Clone + 'static>() -> Transformer<T, T> {
    Transformer::of(|value: &T| Some(value.clone()), |backing: &T| backing.clone())
}

/// Adapts a fallible read function into the total shape [`Transformer`]
/// expects: a failed read yields `default` instead of an error.
pub fn read_or<R, T: Clone + 'static>(
    read: impl Fn(&R) -> Option<T> + 'static,
    default: T,
) -> impl Fn(&R) -> T {
    move |backing| read(backing).unwrap_or_else(|| default.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric() -> Transformer<String, i64> {
        transformer_of(
            |value: &i64| Some(value.to_string()),
            read_or(|raw: &String| raw.parse().ok(), 0),
        )
    }

    #[test]
    fn round_trips_through_write_and_read() {
        let transformer = numeric();
        let backing = transformer.write(&42).unwrap();
        assert_eq!(backing, "42");
        assert_eq!(transformer.read(&backing), 42);
    }

    #[test]
    fn read_or_supplies_default_on_parse_failure() {
        let transformer = numeric();
        assert_eq!(transformer.read(&String::from("not a number")), 0);
    }

    #[test]
    fn write_fallback_is_reported() {
        let transformer = transformer_of(|_: &i64| None::<String>, |raw: &String| raw.len() as i64)
            .write_fallback(String::from("default"));
        assert_eq!(transformer.write(&1), None);
        assert_eq!(transformer.fallback().map(String::as_str), Some("default"));
    }

    #[test]
    fn identity_is_lossless() {
        let transformer = identity_transformer::<String>();
        let value = String::from("Adwaita");
        assert_eq!(transformer.write(&value), Some(value.clone()));
        assert_eq!(transformer.read(&value), value);
    }
}
