//! List all connected NOLO CV1 tracking sets.

fn main() {
    env_logger::init();

    match nolovr::device::list_devices() {
        Ok(devices) => {
            println!("Found {} CV1 tracking set(s):", devices.len());
            for (i, dev) in devices.iter().enumerate() {
                println!(
                    "  [{}] {} {} serial={} path={:?}",
                    i,
                    dev.manufacturer,
                    dev.product,
                    dev.serial.as_deref().unwrap_or("-"),
                    dev.path,
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
