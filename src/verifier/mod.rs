//! Cross-checks the holidays of several sources.
//!
//! Every source has its own spelling for some holidays, so the names can be
//! mapped onto canonical names before they are compared.

mod names;
mod source;
#[allow(clippy::module_inception)]
mod verifier;

pub use names::*;
pub use source::*;
pub use verifier::*;
