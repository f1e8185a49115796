use std::ops::{Deref, DerefMut};

use super::{GeometryProvider, Transient};

/// Scoped ownership of the transient entities created during one query.
///
/// Every tracked entity is released, newest first, when the guard drops,
/// whichever way the enclosing function returns. Entities that must outlive
/// the query are handed over with [`Scratch::keep`].
pub struct Scratch<'a, P: GeometryProvider + ?Sized> {
    provider: &'a mut P,
    tracked: Vec<Transient>,
}

impl<'a, P: GeometryProvider + ?Sized> Scratch<'a, P> {
    /// Starts an empty scope over `provider`.
    pub fn new(provider: &'a mut P) -> Self {
        Self {
            provider,
            tracked: Vec::new(),
        }
    }

    /// Registers `handle` for release and hands it back.
    pub fn track<T>(&mut self, handle: T) -> T
    where
        T: Into<Transient> + Copy,
    {
        self.tracked.push(handle.into());
        handle
    }

    /// Stops tracking `handle`; the caller becomes responsible for releasing it.
    pub fn keep<T>(&mut self, handle: T) -> T
    where
        T: Into<Transient> + Copy,
    {
        let entity = handle.into();
        self.tracked.retain(|tracked| *tracked != entity);
        handle
    }

    /// Number of entities currently awaiting release.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracked.len()
    }
}

impl<P: GeometryProvider + ?Sized> Deref for Scratch<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.provider
    }
}

impl<P: GeometryProvider + ?Sized> DerefMut for Scratch<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.provider
    }
}

impl<P: GeometryProvider + ?Sized> Drop for Scratch<'_, P> {
    fn drop(&mut self) {
        while let Some(entity) = self.tracked.pop() {
            self.provider.release(entity);
        }
    }
}
