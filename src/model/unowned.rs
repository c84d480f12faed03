use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::UnownedError;

/// Non-owning reference whose holder assumes the referent outlives it.
///
/// Unlike a plain [`Weak`], a released referent is a contract violation rather
/// than an expected state: [`Unowned::get`] reports it as an error and
/// [`Unowned::expect_alive`] panics. The referent is never read once released.
pub struct Unowned<T> {
    target: Weak<T>,
}

impl<T> Unowned<T> {
    pub fn new(target: &Rc<T>) -> Self {
        Self {
            target: Rc::downgrade(target),
        }
    }

    pub fn get(&self) -> Result<Rc<T>, UnownedError> {
        self.target.upgrade().ok_or(UnownedError::Deallocated {
            type_name: std::any::type_name::<T>(),
        })
    }

    /// # Panics
    ///
    /// Panics if the referent has already been released.
    pub fn expect_alive(&self) -> Rc<T> {
        match self.get() {
            Ok(target) => target,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    pub fn ptr_eq(&self, other: &Rc<T>) -> bool {
        std::ptr::eq(self.target.as_ptr(), Rc::as_ptr(other))
    }
}

impl<T> Clone for Unowned<T> {
    fn clone(&self) -> Self {
        Self {
            target: Weak::clone(&self.target),
        }
    }
}

impl<T> fmt::Debug for Unowned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_alive() { "alive" } else { "released" };
        write!(f, "Unowned<{}>({state})", std::any::type_name::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_does_not_extend_lifetime() {
        let value = Rc::new(String::from("owner"));
        let unowned = Unowned::new(&value);
        assert_eq!(Rc::strong_count(&value), 1);
        assert_eq!(*unowned.get().unwrap(), "owner");
        assert!(unowned.ptr_eq(&value));

        drop(value);
        assert!(!unowned.is_alive());
        assert_eq!(
            unowned.get().unwrap_err(),
            UnownedError::Deallocated {
                type_name: std::any::type_name::<String>()
            }
        );
    }

    #[test]
    #[should_panic(expected = "read after it was deallocated")]
    fn test_expect_alive_panics_after_release() {
        let value = Rc::new(7u32);
        let unowned = Unowned::new(&value);
        drop(value);
        unowned.expect_alive();
    }
}
