//! Converts right-trigger pulls on an XInput controller into held left mouse
//! clicks, polling the controller state directly for minimal CPU usage.
//!
//! Run with: cargo run --example xinput_converter

#[cfg(target_os = "windows")]
fn main() -> std::process::ExitCode {
    use clickrelay::{
        ClickStyle, Error, Forwarder, ForwarderConfig, Status, SystemInjector, XInputSource, run,
    };
    use std::process::ExitCode;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Right-trigger magnitude (0-255) above which the trigger counts as pressed.
    const RT_THRESHOLD: u8 = 30;

    fn fatal(e: Error) -> ExitCode {
        eprintln!();
        eprintln!("Error: {e}");
        eprintln!("This program requires Windows with XInput support.");
        ExitCode::FAILURE
    }

    println!("{}", "=".repeat(70));
    println!("RT Button Click Converter - direct XInput variant");
    println!("{}", "=".repeat(70));
    println!();
    println!("Pulling the right trigger holds the left mouse button down at");
    println!("the current cursor position; releasing it lets go.");
    println!();
    println!("Press Ctrl+C to stop.");
    println!();
    println!("Searching for gamepad...");

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            eprintln!("Error: failed to install Ctrl+C handler: {e}");
            return ExitCode::FAILURE;
        }
    }

    let forwarder = Forwarder::with_status(
        SystemInjector::new(),
        ForwarderConfig {
            threshold: RT_THRESHOLD,
            style: ClickStyle::Hold,
        },
        |status: &Status| match status {
            Status::SourceBound { name } => println!("[ok] {name} connected"),
            Status::SourceLost => println!("Gamepad disconnected! Searching..."),
            Status::ButtonDown { x, y } => println!("[ok] mouse DOWN at ({x:.0}, {y:.0})"),
            Status::ButtonUp { x, y } => println!("[ok] mouse UP at ({x:.0}, {y:.0})"),
        },
    );

    let mut source = XInputSource::new();
    match run(&mut source, &forwarder, &running) {
        Ok(()) => {
            println!();
            println!("Stopping click converter... goodbye!");
            ExitCode::SUCCESS
        }
        Err(e) => fatal(e),
    }
}

#[cfg(not(target_os = "windows"))]
fn main() -> std::process::ExitCode {
    eprintln!("xinput_converter requires Windows (the XInput API).");
    std::process::ExitCode::FAILURE
}
