use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::pipelines::{GridOptions, GridPipeline, StationOptions, StationPipeline};
use crate::readers::{GridSource, StationSource};
use crate::writers::MetWriter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Station {
            input,
            variables,
            output,
            accept_flags,
            pretty,
        } => {
            let source = StationSource::from_path(&input)?;

            let mut options = StationOptions::default();
            if let Some(flags) = accept_flags {
                options.accepted_flags = flags;
            }

            let records = StationPipeline::with_options(options).run(&source, &variables)?;

            let writer = MetWriter::new().with_pretty(pretty);
            match &output {
                Some(path) => {
                    writer.write_points_to_path(&records, path)?;
                    eprintln!(
                        "Wrote {} point records to {}",
                        records.len(),
                        path.display()
                    );
                }
                None => writer.write_points(&records, std::io::stdout().lock())?,
            }
        }

        Commands::Grid {
            input,
            variable,
            output,
            x_pin,
            y_pin,
            pretty,
        } => {
            let source = GridSource::from_path(&input)?;

            let mut options = GridOptions::default();
            if let Some(x) = x_pin {
                options.x_pin = x;
            }
            if let Some(y) = y_pin {
                options.y_pin = y;
            }

            let field = GridPipeline::with_options(options).run(&source, &variable)?;

            let writer = MetWriter::new().with_pretty(pretty);
            match &output {
                Some(path) => {
                    writer.write_grid_to_path(&field, path)?;
                    eprintln!(
                        "Wrote {} field ({}x{}) to {}",
                        field.attrs.name,
                        field.attrs.grid.nx,
                        field.attrs.grid.ny,
                        path.display()
                    );
                }
                None => writer.write_grid(&field, std::io::stdout().lock())?,
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays clean for the MET handoff.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
