mod csp;

pub use csp::{CspMiddlewareFactory, CspMiddlewareService};
