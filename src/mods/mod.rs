pub mod metadata;
pub mod scanner;

pub use metadata::{MetadataHint, MetadataHints, ModsToml, PackageMetadata};
pub use scanner::{ModScanner, ScanRequest};
