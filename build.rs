//! Retrieves information about the version of the crate from Git and the build
//! environment. The generated module is included by `src/lib.rs` and printed
//! by the binary on startup.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
