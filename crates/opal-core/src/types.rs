//! Convenience re-exports of the shared wire and identity types.

pub use opal_schema::{
    DEFAULT_BRANCH, MANIFEST_FILE, Manifest, NameError, PackageName, PackageSpec, Version,
};
