//! Catalog text compiled into the binary by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/embedded_catalog.rs"));

/// The bundled catalog JSON, or `None` if the build found no
/// `registry/discovery.json`.
pub(crate) fn bundled_catalog() -> Option<&'static str> {
    EMBEDDED_CATALOG
}
