/// Build version, overridable at compile time through `FHHP_BUILD_VERSION`.
pub const VERSION: &str = match option_env!("FHHP_BUILD_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
