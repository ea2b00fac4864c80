pub mod diagnostics;
pub mod location;

pub use diagnostics::{Diagnostic, Severity};
pub use location::Location;
