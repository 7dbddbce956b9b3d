//! Last-resort fatal handling
//!
//! On wasm32 a panic aborts, so [`App::frame`](crate::app::App::frame) never
//! gets to catch it. The panic hook installed here does the halting work
//! instead by running the registered fatal handler before the abort.

use std::cell::RefCell;
use std::panic;
use std::sync::Once;

type FatalHandler = Box<dyn FnOnce(&str)>;

thread_local! {
    static ON_FATAL: RefCell<Option<FatalHandler>> = const { RefCell::new(None) };
}

/// Register what to do when the game dies. Replaces any earlier handler.
pub fn set_fatal_handler(handler: impl FnOnce(&str) + 'static) {
    ON_FATAL.with(|slot| *slot.borrow_mut() = Some(Box::new(handler)));
}

/// Run the fatal handler. Returns false if none was registered or it
/// already ran.
pub fn report_fatal(message: &str) -> bool {
    let handler = ON_FATAL
        .try_with(|slot| slot.try_borrow_mut().ok().and_then(|mut h| h.take()))
        .ok()
        .flatten();
    match handler {
        Some(handler) => {
            handler(message);
            true
        }
        None => false,
    }
}

/// Install the panic hook: log the panic, then report it as fatal.
pub fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        #[cfg(not(target_arch = "wasm32"))]
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            #[cfg(target_arch = "wasm32")]
            console_error_panic_hook::hook(info);
            #[cfg(not(target_arch = "wasm32"))]
            previous(info);
            report_fatal(&info.to_string());
        }));
    });
}
