//! Converts every left-click event (mouse, touchpad, emulated clicks alike)
//! into a literal hardware-level click.
//!
//! Run with: cargo run --example hook_converter
//!
//! This fixes handhelds whose emulated clicks stop working while keyboard
//! keys are held down.

use clickrelay::{
    ClickStyle, Error, Forwarder, ForwarderConfig, HookSource, Status, SystemInjector, run,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Delay held between the synthetic down and up of each converted click.
const DWELL: Duration = Duration::from_millis(10);

fn main() -> ExitCode {
    println!("{}", "=".repeat(60));
    println!("Click Converter - pointer hook variant");
    println!("{}", "=".repeat(60));
    println!();
    println!("Every left-click event is re-emitted as a literal injected");
    println!("click at the same position.");
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

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
            threshold: 30,
            style: ClickStyle::Tap { dwell: DWELL },
        },
        |status: &Status| match status {
            Status::SourceBound { name } => println!("Listening on {name}..."),
            Status::SourceLost => println!("Input source lost, waiting..."),
            Status::ButtonDown { x, y } => {
                println!("[ok] converted click at ({x:.0}, {y:.0})");
            }
            Status::ButtonUp { .. } => {}
        },
    );

    let mut source = match HookSource::start() {
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
