//! Derives Finch endpoint fragments from OpenAPI operations.
//!
//! For each operation the generator produces the route-extraction chain
//! (`"pets" :: long :: paramOption("limit").map(_.map(_.toInt))`), the bare
//! argument list (`id, limit`) and the typed declaration list
//! (`id: Long, limit: Option[Int]`) that a template renderer splices into
//! an endpoint definition.
//!
//! The per-operation pipeline is: [`path::resolve_path`], then
//! [`params::resolve_params`], then [`security::resolve_security`], joined
//! by [`merge::merge`]. [`merge::build_route`] runs all of it, and
//! [`generate`] does so for a whole [`openapiv3::OpenAPI`] document.

pub mod compose;
pub mod config;
pub mod error;
pub mod fragment;
pub mod generator;
pub mod merge;
pub mod model;
pub mod params;
pub mod path;
pub mod security;
pub mod type_mapping;

pub use config::{GeneratorConfig, OptionalPathParams};
pub use error::{Error, Result};
pub use generator::generate;
pub use merge::{build_route, RouteDefinition};
pub use model::{
    KeyLocation, Operation, ParamKind, Parameter, SecurityRequirement, SecurityScheme, TypeRef,
};
