use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// Shared reference to a data object owned by the engine.
///
/// Cloning a `Handle` aliases the object, it never copies it. Two handles
/// refer to the same object when [`Handle::ptr_eq`] returns `true`.
pub struct Handle<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Handle<T> {
    pub fn new(object: T) -> Self {
        Handle {
            inner: Rc::new(RefCell::new(object)),
        }
    }

    /// Immutably borrow the referenced object.
    ///
    /// # Panics
    /// Panics if the object is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// Mutably borrow the referenced object.
    ///
    /// # Panics
    /// Panics if the object is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Handle<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Debug> Debug for Handle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(object) => f.debug_tuple("Handle").field(&*object).finish(),
            Err(_) => f.write_str("Handle(<borrowed>)"),
        }
    }
}
