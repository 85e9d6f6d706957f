pub mod confidence;
pub mod regulators;

/// Print a fatal error and exit with status 1.
///
/// Argument errors never reach here; clap exits with status 2 for those.
pub fn fail(err: &regpath_core::Error) -> ! {
    eprintln!("{err}");
    std::process::exit(1);
}
