//! Hardware monitoring agent entry point.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use http_bridge_lmsensors::args::AgentArgs;
use http_bridge_lmsensors::init_tracing;
use http_bridge_lmsensors::monitor::{SensorMonitor, StartupDecision, review_diagnostic};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = AgentArgs::parse();
    let assume_yes = args.assume_yes;

    let config = args.into_config();
    config.validate()?;
    init_tracing(&config.logging)?;

    info!(
        url = %config.collector.endpoint_url(),
        interval_secs = config.poll_interval_secs,
        "Starting hardware monitoring agent"
    );

    let monitor = SensorMonitor::new(&config)?;

    // The external tool must exist before anything else happens.
    if let Err(e) = monitor.reader().ensure_available().await {
        eprintln!("ERROR: {}", e);
        print_install_guidance();
        std::process::exit(1);
    }

    // One read shown to the operator before the loop starts.
    println!("=== TEST RUN ===");
    let sample = monitor.sample().await;
    println!("Result: {}", sample.reading);

    let decision = review_diagnostic(&sample.reading, || {
        println!();
        println!("WARNING: all temperature sensors returned 0!");
        println!("Maybe you need to run: sudo sensors-detect");
        println!();
        println!("sensors output:");
        println!("{}", "-".repeat(50));
        print!("{}", sample.raw_report);
        println!("{}", "-".repeat(50));

        if assume_yes {
            println!("Continuing anyway (--assume-yes)");
            true
        } else {
            prompt_continue()
        }
    });

    if decision == StartupDecision::Abort {
        println!("Aborted.");
        info!("Operator declined to continue after an all-zero diagnostic read");
        return Ok(());
    }

    println!();
    println!("=== STARTING MONITORING ===");
    println!();

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Goodbye!");
    Ok(())
}

/// Ask the operator whether to keep going; anything but `y` declines.
fn prompt_continue() -> bool {
    print!("Continue sending data? (y/n): ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }

    answer.trim().eq_ignore_ascii_case("y")
}

/// Installation steps for the distributions lm-sensors ships on.
fn print_install_guidance() {
    eprintln!();
    eprintln!("Install lm-sensors:");
    eprintln!("  Ubuntu/Debian: sudo apt-get install lm-sensors");
    eprintln!("  Fedora/RHEL:   sudo dnf install lm_sensors");
    eprintln!("  Arch:          sudo pacman -S lm_sensors");
    eprintln!();
    eprintln!("After installation, run: sudo sensors-detect");
}
