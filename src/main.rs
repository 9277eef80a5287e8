use aws_s3_helper::{Config, StorageFacade, args, run_app};

fn main() {
    // Parse and validate command-line arguments
    let args = args::args_checks();

    // Missing or incomplete settings are fatal; there is no degraded mode
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let storage = match StorageFacade::connect(&config, args.verbose) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_app(&args, &storage) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
