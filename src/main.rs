//! # Voxel Sprite Mesher Entry Point
//!
//! Calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --config mesher.toml
//! ```

fn main() -> std::process::ExitCode {
    voxel_sprite_mesher::run()
}
