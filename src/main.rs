use charge_transitions::{Cli, run};

fn main() -> anyhow::Result<()> {
    use clap::Parser;

    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Run the requested stage
    if let Err(e) = run(&args) {
        log::error!("Charge transitions failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
