use anyhow::bail;
use rentix_shared::telemetry;

const APP_NAME: &str = "rentix_console";

/// Traces go to a file unless asked for stdout. If the file cannot be created
/// stdout is used instead
pub fn init(cli: &super::cli::Cli) -> anyhow::Result<()> {
    if !cli.is_to_std_out {
        match init_to_file() {
            Ok(()) => return Ok(()),
            Err(e) => eprintln!("Failed to start logging to file: {e}"),
        }
    }

    match tracing_subscriber::fmt().with_writer(std::io::stderr).try_init() {
        Ok(()) => Ok(()),
        Err(e) => bail!("Failed to start tracing. Error: {e}"),
    }
}

fn init_to_file() -> anyhow::Result<()> {
    let (file, filename) = telemetry::create_trace_file(APP_NAME)?;
    let subscriber = telemetry::get_subscriber(APP_NAME.into(), "info", file);
    match telemetry::init_subscriber(subscriber) {
        Ok(()) => {
            eprintln!("Tracing started to file {filename:?}");
            Ok(())
        }
        Err(e) => bail!("Failed to start tracing to file. Error: {e}"),
    }
}
