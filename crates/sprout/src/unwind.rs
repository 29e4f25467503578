//! Panic capture for user-supplied closures.
//!
//! `assert!` and friends report failures by panicking, and the panic payload
//! does not carry the location. A process-wide hook, chained in front of
//! whatever hook was installed before, stores the location of the latest
//! panic in a thread-local so [`guarded`] can attach it to the error.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};

use once_cell::sync::OnceCell;

use crate::callsite::Callsite;
use crate::error::ExampleError;

const OPAQUE_PANIC: &str = "panicked with a non-string payload";

static LOCATION_HOOK: OnceCell<()> = OnceCell::new();

thread_local! {
    static PANIC_LOCATION: Cell<Option<Callsite>> = const { Cell::new(None) };
}

/// Runs `f`, converting a panic into an [`ExampleError`] carrying the panic
/// message and, when the hook saw it, the location that panicked.
pub(crate) fn guarded<F>(f: F) -> Result<(), ExampleError>
where
    F: FnOnce() -> Result<(), ExampleError>,
{
    install_location_hook();
    PANIC_LOCATION.with(Cell::take);
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        let error = match PANIC_LOCATION.with(Cell::take) {
            Some(location) => ExampleError::at(message, location),
            None => ExampleError::new(message),
        };
        Err(error)
    })
}

/// Extracts the message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        OPAQUE_PANIC.to_owned()
    }
}

fn install_location_hook() {
    LOCATION_HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            let location = info.location().map(Callsite::from);
            PANIC_LOCATION.with(|slot| slot.set(location));
            previous(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_closures_pass_through() {
        assert_eq!(guarded(|| Ok(())), Ok(()));
    }

    #[test]
    fn returned_errors_pass_through() {
        let error = guarded(|| Err(ExampleError::new("nope"))).expect_err("error returned");
        assert_eq!(error.message(), "nope");
        assert!(error.location().is_none());
    }

    #[test]
    fn formatted_panics_keep_their_message() {
        let value = 5;
        let error = guarded(|| panic!("expected 4, got {value}")).expect_err("panic caught");
        assert_eq!(error.message(), "expected 4, got 5");
    }

    #[test]
    fn assertion_panics_carry_the_assertion_line() {
        let line = line!() + 3;
        let error = guarded(|| {
            let sum = 2 + 2;
            assert_eq!(sum, 5, "expected 4, got {sum}");
            Ok(())
        })
        .expect_err("assertion fails");
        let location = error.location().expect("panic location captured");
        assert_eq!(location.line(), line);
        assert_eq!(location.file(), file!());
        assert!(error.message().contains("expected 4, got 4"), "{}", error.message());
    }

    #[test]
    fn stale_locations_do_not_leak_into_returned_errors() {
        assert!(guarded(|| panic!("first")).is_err());
        let error = guarded(|| Err(ExampleError::new("second"))).expect_err("error returned");
        assert!(error.location().is_none());
    }

    #[test]
    fn static_panics_keep_their_message() {
        let error = guarded(|| panic!("static message")).expect_err("panic caught");
        assert_eq!(error.message(), "static message");
    }

    #[test]
    fn opaque_payloads_get_a_placeholder() {
        let error = guarded(|| std::panic::panic_any(42_u8)).expect_err("panic caught");
        assert_eq!(error.message(), OPAQUE_PANIC);
    }
}
