pub mod analyze;
pub mod annotate;
pub mod fetch;
pub mod lemmatizers;
pub mod project;
pub mod util;

pub use analyze::*;
pub use annotate::*;
pub use fetch::*;
pub use lemmatizers::*;
pub use project::*;
pub use util::*;
