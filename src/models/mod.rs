//! Domain models

pub mod order;

pub use order::{OrderRequest, OptionalServiceKind, PackageKind, PackageLine};
