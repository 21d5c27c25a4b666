//! Request-scoped identity: the signed-in principal and the context its
//! authorization work runs under.

mod principal;
mod request_context;

pub use principal::{Attrs, Principal};
pub use request_context::{CancelHandle, RequestContext};
