use log::LevelFilter;
use ringlog::{Drain, LogBuilder, MultiLogBuilder, Output, Stderr};

/// Set up process logging to stderr.
///
/// Returns the drain handle; the caller keeps it alive for the life of
/// the process.
pub fn init(verbose: bool) -> Box<dyn Drain> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let output: Box<dyn Output> = Box::new(Stderr::new());

    let log = LogBuilder::new()
        .output(output)
        .build()
        .expect("failed to initialize logger");

    MultiLogBuilder::new()
        .level_filter(level)
        .default(log)
        .build()
        .start()
}
