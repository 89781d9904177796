//! Normalized operation description consumed by the route pipeline.
//!
//! Everything here is already resolved: types are target (Scala) names,
//! identifiers are escaped, `$ref`s are gone.

use std::fmt;

use itertools::Itertools;

/// A resolved target type, e.g. `Long` or `Map[String, Seq[Pet]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef {
            name: name.into(),
            args: vec![],
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef {
            name: name.into(),
            args,
        }
    }

    /// `Option[Self]`
    pub fn optional(self) -> Self {
        TypeRef::generic("Option", vec![self])
    }

    /// Rewrites the outer constructor, `List[Long]` becomes `Seq[Long]`. A
    /// type without arguments is wrapped instead: `String` becomes
    /// `Seq[String]`.
    pub fn with_constructor(self, name: &str) -> Self {
        if self.args.is_empty() {
            TypeRef::generic(name, vec![self])
        } else {
            TypeRef::generic(name, self.args)
        }
    }

    pub fn is_string(&self) -> bool {
        self.name == "String" && self.args.is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}[{}]", self.name, self.args.iter().join(", "))
        }
    }
}

/// Where a parameter comes from, and the shape it has there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Path { required: bool, container: bool },
    Query { required: bool, container: bool },
    Header { required: bool, container: bool },
    /// Request body, always required.
    Body,
    /// Multipart upload, always required.
    File,
}

impl ParamKind {
    pub fn is_path(&self) -> bool {
        matches!(self, ParamKind::Path { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Identifier used in the generated function signature.
    pub name: String,
    /// Name on the wire; keys the extractor.
    pub wire_name: String,
    pub data_type: TypeRef,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLocation {
    Header,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityScheme {
    ApiKey {
        location: KeyLocation,
        /// Header or query parameter carrying the credential.
        key_name: String,
    },
    /// Any non api-key scheme; carried through but contributes nothing.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRequirement {
    pub name: String,
    pub scheme: SecurityScheme,
}

/// One API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub operation_id: String,
    /// Always lowercase.
    pub method: String,
    pub path: String,
    pub params: Vec<Parameter>,
    pub security: Vec<SecurityRequirement>,
}

impl Operation {
    pub fn new(
        operation_id: impl Into<String>,
        method: impl AsRef<str>,
        path: impl Into<String>,
    ) -> Self {
        Operation {
            operation_id: operation_id.into(),
            method: method.as_ref().to_lowercase(),
            path: path.into(),
            params: vec![],
            security: vec![],
        }
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_security(mut self, requirement: SecurityRequirement) -> Self {
        self.security.push(requirement);
        self
    }

    /// Path parameters in declaration order.
    pub fn path_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.kind.is_path())
    }
}
