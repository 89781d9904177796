//! Combines the path, parameter and security stages into the strings a
//! Finch endpoint template consumes.

use serde::Serialize;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::fragment::{Chain, Fragments};
use crate::model::Operation;
use crate::params::resolve_params;
use crate::path::resolve_path;
use crate::security::resolve_security;

/// Path chain, then parameter chain, then security chain; parameter
/// declarations, then credential declarations.
pub fn merge(path: Chain, params: Fragments, auth: Fragments) -> Fragments {
    Fragments {
        chain: path.then(params.chain).then(auth.chain),
        args: params.args.then(auth.args),
    }
}

/// Final output for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinition {
    pub operation_id: String,
    pub method: String,
    pub path: String,
    /// `"pets" :: long :: header("X-Api-Key")`
    #[serde(rename = "x-codegen-paths")]
    pub route: String,
    /// `id, authParamApiKey`
    #[serde(rename = "x-codegen-params")]
    pub arguments: String,
    /// `id: Long, authParamApiKey: String`
    #[serde(rename = "x-codegen-typedParams")]
    pub typed_arguments: String,
}

/// Runs the whole pipeline for one operation.
pub fn build_route(op: &Operation, config: &GeneratorConfig) -> Result<RouteDefinition> {
    let path = resolve_path(op)?;
    let params = resolve_params(op, config);
    let auth = resolve_security(op);
    let merged = merge(path, params, auth);

    let route = RouteDefinition {
        operation_id: op.operation_id.clone(),
        method: op.method.clone(),
        path: op.path.clone(),
        route: merged.chain.to_string(),
        arguments: merged.args.names(),
        typed_arguments: merged.args.typed(),
    };
    debug!(operation = %route.operation_id, route = %route.route, "built route");
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        KeyLocation, ParamKind, Parameter, SecurityRequirement, SecurityScheme, TypeRef,
    };
    use pretty_assertions::assert_eq;

    fn api_key() -> SecurityRequirement {
        SecurityRequirement {
            name: "apiKey".into(),
            scheme: SecurityScheme::ApiKey {
                location: KeyLocation::Header,
                key_name: "X-Api-Key".into(),
            },
        }
    }

    #[test]
    fn bare_operation_is_just_the_path() {
        let op = Operation::new("ping", "GET", "/health/ping");
        let route = build_route(&op, &GeneratorConfig::default()).unwrap();
        assert_eq!(route.method, "get");
        assert_eq!(route.route, r#""health" :: "ping""#);
        assert_eq!(route.arguments, "");
        assert_eq!(route.typed_arguments, "");
    }

    #[test]
    fn credentials_come_after_regular_params() {
        let op = Operation::new("getPet", "get", "/pets/{petId}")
            .with_param(Parameter {
                name: "petId".into(),
                wire_name: "petId".into(),
                data_type: TypeRef::named("Long"),
                kind: ParamKind::Path {
                    required: true,
                    container: false,
                },
            })
            .with_param(Parameter {
                name: "verbose".into(),
                wire_name: "verbose".into(),
                data_type: TypeRef::named("Boolean"),
                kind: ParamKind::Query {
                    required: false,
                    container: false,
                },
            })
            .with_security(api_key());

        let route = build_route(&op, &GeneratorConfig::default()).unwrap();
        assert_eq!(
            route.route,
            r#""pets" :: long :: paramOption("verbose").map(_.map(_.toBoolean)) :: header("X-Api-Key")"#
        );
        assert_eq!(route.arguments, "petId, verbose, authParamApiKey");
        assert_eq!(
            route.typed_arguments,
            "petId: Long, verbose: Option[Boolean], authParamApiKey: String"
        );
    }

    #[test]
    fn security_only_operation() {
        let op = Operation::new("me", "get", "/me").with_security(api_key());
        let route = build_route(&op, &GeneratorConfig::default()).unwrap();
        assert_eq!(route.route, r#""me" :: header("X-Api-Key")"#);
        assert_eq!(route.arguments, "authParamApiKey");
    }

    #[test]
    fn merge_orders_stages() {
        let merged = merge(Chain::new(), Fragments::default(), Fragments::default());
        assert_eq!(merged, Fragments::default());
    }

    #[test]
    fn serializes_with_renderer_keys() {
        let op = Operation::new("ping", "get", "/ping");
        let route = build_route(&op, &GeneratorConfig::default()).unwrap();
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["operationId"], "ping");
        assert_eq!(json["x-codegen-paths"], "\"ping\"");
        assert_eq!(json["x-codegen-params"], "");
        assert_eq!(json["x-codegen-typedParams"], "");
    }
}
