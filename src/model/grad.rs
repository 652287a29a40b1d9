//! Gradient tracking switch.
//!
//! Tracking is a thread-local flag that models may consult before keeping
//! autograd state. It can only be turned off through [`no_grad`], whose guard
//! restores the previous value when dropped, so nested guards and early
//! returns (including `?` and panics) leave the flag as they found it.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// Disables gradient tracking on the current thread until the guard drops.
#[must_use = "gradient tracking is re-enabled as soon as the guard is dropped"]
pub fn no_grad() -> NoGradGuard {
    let previous = GRAD_ENABLED.with(|flag| flag.replace(false));
    NoGradGuard {
        previous,
        _not_send: PhantomData,
    }
}

#[derive(Debug)]
pub struct NoGradGuard {
    previous: bool,
    // The flag is per thread; the guard must be dropped where it was made.
    _not_send: PhantomData<*const ()>,
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        GRAD_ENABLED.with(|flag| flag.set(self.previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_disables_then_restores() {
        assert!(is_grad_enabled());
        {
            let _guard = no_grad();
            assert!(!is_grad_enabled());
        }
        assert!(is_grad_enabled());
    }

    #[test]
    fn nested_guards_restore_outer_state() {
        let outer = no_grad();
        {
            let _inner = no_grad();
            assert!(!is_grad_enabled());
        }
        assert!(!is_grad_enabled());
        drop(outer);
        assert!(is_grad_enabled());
    }

    #[test]
    fn restored_after_panic() {
        let result = std::panic::catch_unwind(|| {
            let _guard = no_grad();
            panic!("forward blew up");
        });
        assert!(result.is_err());
        assert!(is_grad_enabled());
    }

    #[test]
    fn flag_is_per_thread() {
        let _guard = no_grad();
        let other = std::thread::spawn(is_grad_enabled).join().unwrap();
        assert!(other);
        assert!(!is_grad_enabled());
    }
}
