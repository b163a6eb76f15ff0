//! Converts right-trigger pulls on any gamepad into held left mouse clicks,
//! using the cross-platform gamepad layer.
//!
//! Run with: cargo run --example gamepad_converter --features gilrs

use clickrelay::{
    ClickStyle, Error, Forwarder, ForwarderConfig, GamepadSource, Status, SystemInjector, run,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Right-trigger magnitude (0-255) above which the trigger counts as pressed.
const RT_THRESHOLD: u8 = 30;

fn main() -> ExitCode {
    println!("{}", "=".repeat(70));
    println!("RT Button Click Converter - generic gamepad variant");
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

    let mut source = match GamepadSource::new() {
        Ok(source) => source,
        Err(e) => return fatal(e),
    };

    match run(&mut source, &forwarder, &running) {
        Ok(()) => {
            println!();
            println!("Stopping click converter... goodbye!");
            ExitCode::SUCCESS
        }
        Err(e) => fatal(e),
    }
}

fn fatal(e: Error) -> ExitCode {
    eprintln!();
    eprintln!("Error: {e}");
    if matches!(e, Error::CapabilityMissing(_)) {
        eprintln!("A required input capability is unavailable on this system.");
    }
    ExitCode::FAILURE
}
