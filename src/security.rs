//! Credential parameters synthesized from api-key security requirements.

use heck::ToUpperCamelCase;
use tracing::debug;

use crate::fragment::{Declaration, Expr, Fragments, Source};
use crate::model::{KeyLocation, Operation, SecurityScheme, TypeRef};

/// Prefix of every credential argument, `authParamApiKey`.
pub const AUTH_PARAM_PREFIX: &str = "authParam";

pub fn auth_param_name(requirement_name: &str) -> String {
    format!("{AUTH_PARAM_PREFIX}{}", requirement_name.to_upper_camel_case())
}

/// Header/query extractors and `String` declarations for every api-key
/// requirement of `op`. Credentials are always required.
pub fn resolve_security(op: &Operation) -> Fragments {
    let mut out = Fragments::default();
    for requirement in &op.security {
        match &requirement.scheme {
            SecurityScheme::ApiKey { location, key_name } => {
                let source = match location {
                    KeyLocation::Header => Source::Header,
                    KeyLocation::Query => Source::Param,
                };
                out.chain.push(Expr::Param {
                    source,
                    key: key_name.clone(),
                    optional: false,
                    convert: None,
                });
                out.args.push(Declaration::new(
                    auth_param_name(&requirement.name),
                    TypeRef::named("String"),
                ));
            }
            SecurityScheme::Unsupported(kind) => {
                debug!(
                    operation = %op.operation_id,
                    scheme = %requirement.name,
                    kind = %kind,
                    "skipping non api-key security scheme"
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SecurityRequirement;
    use pretty_assertions::assert_eq;

    fn api_key(name: &str, location: KeyLocation, key: &str) -> SecurityRequirement {
        SecurityRequirement {
            name: name.into(),
            scheme: SecurityScheme::ApiKey {
                location,
                key_name: key.into(),
            },
        }
    }

    #[test]
    fn header_api_key() {
        let op = Operation::new("op", "get", "/")
            .with_security(api_key("apiKey", KeyLocation::Header, "X-Api-Key"));
        let out = resolve_security(&op);
        assert_eq!(out.chain.to_string(), r#"header("X-Api-Key")"#);
        assert_eq!(out.args.names(), "authParamApiKey");
        assert_eq!(out.args.typed(), "authParamApiKey: String");
    }

    #[test]
    fn query_api_key_and_unsupported_schemes() {
        let op = Operation::new("op", "get", "/")
            .with_security(SecurityRequirement {
                name: "oauth".into(),
                scheme: SecurityScheme::Unsupported("oauth2".into()),
            })
            .with_security(api_key("token", KeyLocation::Query, "token"));
        let out = resolve_security(&op);
        assert_eq!(out.chain.to_string(), r#"param("token")"#);
        assert_eq!(out.args.typed(), "authParamToken: String");
    }

    #[test]
    fn no_requirements_yield_empty_fragments() {
        let out = resolve_security(&Operation::new("op", "get", "/"));
        assert!(out.chain.is_empty());
        assert!(out.args.is_empty());
    }
}
