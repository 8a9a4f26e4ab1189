use std::sync::Mutex;

/// Diagnostics held back while the TUI owns the terminal.
static PENDING: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Start holding diagnostics instead of writing them to stderr.
pub fn activate() {
    if let Ok(mut pending) = PENDING.lock() {
        *pending = Some(Vec::new());
    }
}

/// Stop holding diagnostics and hand back everything collected.
pub fn drain() -> Vec<String> {
    PENDING
        .lock()
        .ok()
        .and_then(|mut pending| pending.take())
        .unwrap_or_default()
}

pub fn is_active() -> bool {
    PENDING.lock().map(|p| p.is_some()).unwrap_or(false)
}

/// Record a diagnostic line: held while active, printed otherwise.
pub fn emit(msg: String) {
    if let Ok(mut pending) = PENDING.lock() {
        if let Some(held) = pending.as_mut() {
            held.push(msg);
            return;
        }
    }
    eprintln!("{}", msg);
}

/// `eprintln!` that goes through the diagnostic buffer.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::emit(format!($($arg)*))
    };
}
