//! Constants describing the build.

/// The cargo package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The git hash provided via the `GIT_HASH` variable at build time.
///
/// Falls back to `<unknown>` when it wasn't set.
pub const GIT_HASH: &str = match option_env!("GIT_HASH") {
    Some(git_hash) => git_hash,
    None => "<unknown>",
};
