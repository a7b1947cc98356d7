/*!
 * Callable
 * The named unit of work bound to a pseudo-thread
 */

use std::any::type_name;
use std::fmt;

/// A named closure a pseudo-thread executes in its forked child.
///
/// The name identifies the work in logs and error messages. Returning
/// `Some(value)` publishes the value for the parent to collect; returning
/// `None` ends the child without publishing anything.
pub struct Callable<A, R> {
    name: String,
    func: Box<dyn FnMut(A) -> Option<R>>,
}

impl<A, R> Callable<A, R> {
    /// Bind a closure under an explicit name
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: FnMut(A) -> Option<R> + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    /// Bind a closure under a best-effort name derived from its type
    pub fn from_fn<F>(func: F) -> Self
    where
        F: FnMut(A) -> Option<R> + 'static,
    {
        Self {
            name: type_name::<F>().to_string(),
            func: Box::new(func),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the work. Only the child continuation calls this.
    pub(crate) fn invoke(&mut self, args: A) -> Option<R> {
        (self.func)(args)
    }
}

impl<A, R> fmt::Debug for Callable<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
