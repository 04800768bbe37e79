//! Shared harness conventions (well-known file names, identifiers and exit codes).

/// Version stamped into every generated harness header.
///
/// Bump this whenever a template in the engine changes shape, so stale artifacts in bug reports can be told
/// apart from current ones.
pub const HARNESS_TEMPLATE_VERSION: u32 = 2;

/// Base file name (without extension) of single-file harnesses (Python, C, C++).
pub const PROGRAM_STEM: &str = "prog";

/// Name of the built executable for compiled languages.
pub const EXECUTABLE_NAME: &str = "prog";

/// Java class that wraps the user's methods.
pub const JAVA_CONTAINER_CLASS: &str = "Translated";

/// Java class that holds the CLI dispatcher.
pub const JAVA_DRIVER_CLASS: &str = "Main";

/// Exit code a harness uses when it is called with the wrong number of arguments or a non-integer token.
pub const HARNESS_USAGE_EXIT_CODE: i32 = 2;

/// Exit code reported for a process that was killed because it exceeded its timeout.
pub const TIMEOUT_EXIT_CODE: i32 = -1;

/// Marker placed at the start of stderr when a process timed out.
pub const TIMEOUT_MARKER: &str = "TIMEOUT";

/// Working-directory prefix for every temporary directory the engine creates.
pub const WORKDIR_PREFIX: &str = "cv_";
