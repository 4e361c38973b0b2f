//! Build script: embed the bundled discovery catalog.
//!
//! `registry/discovery.json` is compiled into the binary so the catalog is
//! available without any runtime filesystem lookup. When the file is absent
//! the generated constant is `None` and `DiscoveryCatalog::load_bundled()`
//! reports the resource as missing instead of failing the build.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let root = PathBuf::from(&manifest_dir);

    // ── Embed discovery catalog ─────────────────────────────────────────
    embed_discovery_catalog(&root);
}

/// Write `$OUT_DIR/embedded_catalog.rs` defining
/// `EMBEDDED_CATALOG: Option<&str>`.
fn embed_discovery_catalog(root: &Path) {
    let registry_dir = root.join("registry");
    let catalog_path = registry_dir.join("discovery.json");

    // Watch the directory as well so that creating the file triggers a rebuild.
    println!("cargo:rerun-if-changed=registry");
    println!("cargo:rerun-if-changed=registry/discovery.json");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let out_path = out_dir.join("embedded_catalog.rs");

    let generated = if catalog_path.is_file() {
        format!(
            "pub(crate) const EMBEDDED_CATALOG: Option<&str> = Some(include_str!({:?}));\n",
            catalog_path.display().to_string()
        )
    } else {
        println!(
            "cargo:warning=No bundled catalog at {}; load_bundled() will fail at runtime",
            catalog_path.display()
        );
        "pub(crate) const EMBEDDED_CATALOG: Option<&str> = None;\n".to_string()
    };

    fs::write(&out_path, generated).unwrap();
}
