use conquer_once::spin::Lazy;
use spin::Mutex;

#[cfg(not(test))]
use uart_16550::SerialPort;

/// Serial port the kernel logs through (COM1).
#[cfg(not(test))]
pub static SERIAL1: Lazy<Mutex<SerialPort>> = Lazy::new(|| {
    let mut serial_port = unsafe { SerialPort::new(0x3F8) };
    serial_port.init();
    Mutex::new(serial_port)
});

/// Stand-in for COM1 when the crate runs under the host test harness.
#[cfg(test)]
pub struct HostConsole;

#[cfg(test)]
impl core::fmt::Write for HostConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        std::print!("{s}");
        Ok(())
    }
}

#[cfg(test)]
pub static SERIAL1: Lazy<Mutex<HostConsole>> = Lazy::new(|| Mutex::new(HostConsole));

/// Global print! macro that writes to the serial interface.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {{
        // Use absolute paths to prevent conflicts
        let _ = ::core::fmt::Write::write_fmt(
            &mut *$crate::serial::SERIAL1.lock(),
            format_args!($($arg)*)
        );
    }};
}

/// Global println! macro that writes to the serial interface.
#[macro_export]
macro_rules! serial_println {
    () => {
        $crate::serial_print!("\n");
    };
    ($($arg:tt)*) => {
        $crate::serial_print!("{}\n", format_args!($($arg)*));
    };
}
