//! Dark-line detection: line records, parameters, the registry, the
//! parallel scanner and the object-membership classifier.

pub mod classify;
pub mod line;
pub mod params;
pub mod registry;
pub mod scanner;

pub use line::{Line, LineSelection, MIN_LINE_WIDTH, Orientation, ScanOrientation};
pub use params::{DetectionParams, RemovalParams};
pub use registry::{LineRegistry, copy_registry, create_registry, destroy_registry};
pub use scanner::{LineScanner, scan};
