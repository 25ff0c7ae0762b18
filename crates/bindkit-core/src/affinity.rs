#![forbid(unsafe_code)]

//! UI thread affinity checks.
//!
//! Controls, bridges, and streams are `Rc`-based and therefore `!Send`, so
//! the compiler already keeps them on one thread. These helpers cover the
//! remaining contract: teardown of a control's resources must happen on the
//! thread that created the control.

use std::thread::{self, ThreadId};

use crate::error::BindError;

/// Check that the current thread is `owner`.
pub fn check(owner: ThreadId) -> Result<(), BindError> {
    let current = thread::current().id();
    if current == owner {
        Ok(())
    } else {
        Err(BindError::ThreadAffinity { owner, current })
    }
}

/// Assert (debug builds only) that the current thread is `owner`.
#[inline]
pub fn debug_ensure(owner: ThreadId) {
    #[cfg(debug_assertions)]
    if let Err(err) = check(owner) {
        panic!("{err}");
    }
    #[cfg(not(debug_assertions))]
    let _ = owner;
}
