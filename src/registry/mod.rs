//! Discovery catalog: the locally known index of services.
//!
//! The catalog maps a service identifier (e.g. `"drive:v3"`) to a descriptor
//! object that, among other things, names the location of the service's
//! discovery document:
//!
//! ```text
//! {
//!   "items": {
//!     "drive:v3": { "title": "...", "discoveryRestUrl": "https://...", ... },
//!     ...
//!   }
//! }
//! ```
//!
//! A default catalog (`registry/discovery.json`) is embedded at build time.

pub mod catalog;
mod embedded;

pub use catalog::{DiscoveryCatalog, ServiceDescriptor};
