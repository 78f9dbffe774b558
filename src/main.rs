//! memdev demo client
//!
//! Drives the memory service the way the original user program drives
//! the device node: read an input file into client memory, hand its
//! size to Allocate, Write the bytes into the service, Read them back
//! out, and sink them to an output file.
//!
//! Usage: `memdev <input_file> <output_file>`

use std::env;
use std::fs;
use std::process;

use memdev::dispatch::codes;
use memdev::{Access, ClientRegion, MemoryService, RawCommand, Registry, ServiceConfig};

/// Name the service is registered under.
const SERVICE_NAME: &str = "memdev";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <input_file> <output_file>", args[0]);
        process::exit(2);
    }

    if let Err(err) = run(&args[1], &args[2]) {
        eprintln!("memdev: {}", err);
        process::exit(1);
    }
}

fn run(input: &str, output: &str) -> Result<(), String> {
    // Client-side memory: the file contents, owned by this process
    let mut scratch =
        fs::read(input).map_err(|err| format!("cannot read '{}': {}", input, err))?;
    let size = scratch.len();
    println!("[memdev] input '{}' ({} bytes)", input, size);

    // SAFETY: the window covers `scratch`, which stays alive and is
    // not resized until the service is torn down below
    let region = unsafe {
        ClientRegion::new(scratch.as_mut_ptr() as usize, size, Access::READ_WRITE)
    };
    let base = region.start();

    // Arena sized for the payload plus allocator bookkeeping
    let config = ServiceConfig {
        arena_size: size + 128,
    };

    let registry = Registry::new();
    registry
        .register(SERVICE_NAME, MemoryService::with_config(config, region))
        .map_err(|err| format!("registration failed: {}", err))?;
    println!("[memdev] service registered as '{}'", SERVICE_NAME);

    check(registry.submit(SERVICE_NAME, RawCommand::new(codes::CMD_ALLOC, size)), "allocate")?;
    check(registry.submit(SERVICE_NAME, RawCommand::new(codes::CMD_WRITE, base)), "write")?;
    println!("[memdev] {} bytes written to service buffer", size);

    // Clear the client copy so the read-back provably comes from the
    // service buffer
    scratch.fill(0);
    check(registry.submit(SERVICE_NAME, RawCommand::new(codes::CMD_READ, base)), "read")?;
    println!("[memdev] {} bytes read back", size);

    fs::write(output, &scratch)
        .map_err(|err| format!("cannot write '{}': {}", output, err))?;
    println!("[memdev] output '{}' written", output);

    // Shutdown: unregister and drop, releasing the buffer
    let service = registry
        .unregister(SERVICE_NAME)
        .map_err(|err| format!("unregister failed: {}", err))?;
    drop(service);
    println!("[memdev] service shut down");

    Ok(())
}

fn check(code: i64, what: &str) -> Result<(), String> {
    if code == 0 {
        Ok(())
    } else {
        Err(format!("{} failed with reply code {}", what, code))
    }
}
