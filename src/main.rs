//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::io;
use std::process::ExitCode;

use huffdiff::compression::{compress, decompress};
use huffdiff::tools::cli::{diffopts_init, Mode};
use huffdiff::tools::report::report;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Exit code for a run that finished but whose round trip did not verify.
const EXIT_UNVERIFIED: u8 = 2;

fn main() -> ExitCode {
    // Available log levels are Error, Warn, Info, Debug, Trace. The cli lowers this.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("huffdiff: could not start logging: {}", e);
    }

    let options = diffopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Compress => compress(&options).and_then(|run| {
            report(&mut io::stdout().lock(), &run, &options)
                .map_err(|e| huffdiff::Error::io("<stdout>", e))?;
            Ok(run.verified)
        }),
        Mode::Decompress => decompress(&options).map(|_| true),
    };

    match result {
        Ok(true) => {
            info!("Done.");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            error!("Round trip verification failed.");
            ExitCode::from(EXIT_UNVERIFIED)
        }
        Err(e) => {
            eprintln!("huffdiff: {}", e);
            ExitCode::FAILURE
        }
    }
}
