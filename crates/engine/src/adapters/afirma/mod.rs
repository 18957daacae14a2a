// @firma DSS adapter module - re-exports all public interfaces

mod constants;
mod url_validation;
mod xml;
mod codec;
mod soap;
mod http;
mod engine;

pub use constants::*;
pub use url_validation::*;
pub use xml::*;
pub use codec::*;
pub use soap::*;
pub use http::*;
pub use engine::*;
