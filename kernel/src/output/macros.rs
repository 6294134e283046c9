//! Leveled logging macros.
//!
//! Each level is gated by its `log-*` feature. A disabled level still
//! type-checks its arguments but never formats or prints them.

/// Writes one log line with a colored level label to the serial port.
#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($color:literal, $label:literal, $($arg:tt)*) => {
        $crate::serial_println!(
            concat!("\x1B[", $color, "m", $label, ":\x1B[0m {}"),
            format_args!($($arg)*)
        );
    };
}

/// Swallows a disabled log line without evaluating it.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_off {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

/// Logs an error message with a red "ERROR: " prefix.
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::__log!("31", "ERROR", $($arg)*) };
}

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::__log_off!($($arg)*) };
}

/// Logs a warning message with a yellow "WARN: " prefix.
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::__log!("33", "WARN", $($arg)*) };
}

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::__log_off!($($arg)*) };
}

/// Logs an info message with a green "INFO: " prefix.
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::__log!("32", "INFO", $($arg)*) };
}

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::__log_off!($($arg)*) };
}

/// Logs a debug message with a green "DEBUG: " prefix.
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::__log!("32", "DEBUG", $($arg)*) };
}

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::__log_off!($($arg)*) };
}

/// Logs a trace message with a light blue "TRACE: " prefix.
#[cfg(feature = "log-trace")]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => { $crate::__log!("36", "TRACE", $($arg)*) };
}

#[cfg(not(feature = "log-trace"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => { $crate::__log_off!($($arg)*) };
}
