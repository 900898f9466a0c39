//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitegraph.toml`:
//!
//! | Module  | TOML Section | Purpose                              |
//! |---------|--------------|--------------------------------------|
//! | `build` | `[build]`    | Source directory, index file, ignore |
//! | `proxy` | `[[proxy]]`  | Proxy declarations                   |
//! | `serve` | `[serve]`    | Development server                   |

mod build;
mod proxy;
mod serve;

pub use build::BuildConfig;
pub use proxy::ProxyEntry;
pub use serve::ServeConfig;
