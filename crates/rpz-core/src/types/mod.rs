mod domain;
mod policy;
mod source;

pub use domain::*;
pub use policy::*;
pub use source::*;
