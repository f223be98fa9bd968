//! Scoped ownership of backend objects
//!
//! Every object the renderer creates is held in an [`Owned`] guard, so any
//! early return during initialization destroys exactly what was built so far.

use std::ops::{Deref, DerefMut};

use crate::graphics::GpuResource;

/// Destroys the wrapped resource when dropped
pub(crate) struct Owned<R: ?Sized + GpuResource> {
    resource: Option<Box<R>>,
}

impl<R: ?Sized + GpuResource> Owned<R> {
    pub(crate) fn new(resource: Box<R>) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// Give up ownership without destroying, e.g. when a shader stage is
    /// handed over to the program that links it
    pub(crate) fn release(mut self) -> Box<R> {
        self.resource
            .take()
            .unwrap_or_else(|| unreachable!("resource is only taken by release or drop"))
    }
}

impl<R: ?Sized + GpuResource> Deref for Owned<R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.resource
            .as_deref()
            .unwrap_or_else(|| unreachable!("resource is only taken by release or drop"))
    }
}

impl<R: ?Sized + GpuResource> DerefMut for Owned<R> {
    fn deref_mut(&mut self) -> &mut R {
        self.resource
            .as_deref_mut()
            .unwrap_or_else(|| unreachable!("resource is only taken by release or drop"))
    }
}

impl<R: ?Sized + GpuResource> Drop for Owned<R> {
    fn drop(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            resource.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe(Rc<Cell<u32>>);

    impl GpuResource for Probe {
        fn destroy(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_drop_destroys() {
        let destroyed = Rc::new(Cell::new(0));
        drop(Owned::new(Box::new(Probe(destroyed.clone()))));
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn test_release_skips_destroy() {
        let destroyed = Rc::new(Cell::new(0));
        let released = Owned::new(Box::new(Probe(destroyed.clone()))).release();
        assert_eq!(destroyed.get(), 0);
        drop(released);
        assert_eq!(destroyed.get(), 0);
    }
}
