//! Poll a NOLO CV1 tracking set and print poses to stdout.
//!
//! Usage: cargo run --example poll
//! Press Ctrl+C to stop.

use std::time::Duration;

use nolovr::TrackedDevice;

fn main() {
    env_logger::init();

    let mut device = match nolovr::Device::open_first() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to open device: {}", e);
            std::process::exit(1);
        }
    };

    println!("Polling at ~60 Hz (Ctrl+C to stop)...");

    loop {
        device.update();

        let hmd = device.pose(TrackedDevice::Hmd);
        print!(
            "hmd pos=[{:+.4}, {:+.4}, {:+.4}]",
            hmd.position[0], hmd.position[1], hmd.position[2]
        );

        for index in 0..2 {
            if let Some(ctrl) = device.controller(index) {
                print!(
                    "  c{} pos=[{:+.4}, {:+.4}, {:+.4}] quat=[{:+.3}, {:+.3}, {:+.3}, {:+.3}] trig={:.2} btn={:?}",
                    index,
                    ctrl.pose.position[0],
                    ctrl.pose.position[1],
                    ctrl.pose.position[2],
                    ctrl.pose.rotation[0],
                    ctrl.pose.rotation[1],
                    ctrl.pose.rotation[2],
                    ctrl.pose.rotation[3],
                    ctrl.trigger,
                    ctrl.buttons,
                );
            }
        }
        println!();

        std::thread::sleep(Duration::from_millis(16));
    }
}
