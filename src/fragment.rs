//! Fragment AST. Extraction chains and declaration lists are built as
//! values and rendered to Finch source text only through `Display`.

use std::fmt;

use crate::compose::{chain_join, list_join};
use crate::model::TypeRef;

/// Request part a single-value extractor reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Query string or url-encoded form field.
    Param,
    Header,
}

impl Source {
    fn primitive(&self) -> &'static str {
        match self {
            Source::Param => "param",
            Source::Header => "header",
        }
    }
}

/// One combinator in an extraction chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Fixed path segment, `"pets"`.
    Literal(String),
    /// Typed path segment extractor, `long`.
    Segment(String),
    /// `param("k")`, `headerOption("k")`, optionally followed by a
    /// conversion from the raw string to `convert`.
    Param {
        source: Source,
        key: String,
        optional: bool,
        convert: Option<String>,
    },
    /// Multi-value extractor, `params("k")`.
    Params(String),
    /// `jsonBody[T]`
    JsonBody(TypeRef),
    /// `fileUpload("k")`
    FileUpload(String),
}

/// Scala types with a `toT` method on `String`.
const CONVERTIBLE: &[&str] = &["Int", "Long", "Float", "Double", "Boolean", "Short", "Byte"];

impl Expr {
    /// Single-value extractor for a value of type `ty`. Numeric and boolean
    /// types get a `.map(_.toT)` conversion; everything else is left as
    /// the raw string.
    pub fn param(source: Source, key: impl Into<String>, ty: &TypeRef, optional: bool) -> Self {
        let convertible = ty.args.is_empty() && CONVERTIBLE.contains(&ty.name.as_str());
        Expr::Param {
            source,
            key: key.into(),
            optional,
            convert: convertible.then(|| ty.name.clone()),
        }
    }
}

fn quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(text) => quoted(f, text),
            Expr::Segment(ty) => write!(f, "{ty}"),
            Expr::Param {
                source,
                key,
                optional,
                convert,
            } => {
                let suffix = if *optional { "Option" } else { "" };
                write!(f, "{}{suffix}(", source.primitive())?;
                quoted(f, key)?;
                write!(f, ")")?;
                match (convert, optional) {
                    (Some(ty), false) => write!(f, ".map(_.to{ty})"),
                    (Some(ty), true) => write!(f, ".map(_.map(_.to{ty}))"),
                    (None, _) => Ok(()),
                }
            }
            Expr::Params(key) => {
                write!(f, "params(")?;
                quoted(f, key)?;
                write!(f, ")")
            }
            Expr::JsonBody(ty) => write!(f, "jsonBody[{ty}]"),
            Expr::FileUpload(key) => {
                write!(f, "fileUpload(")?;
                quoted(f, key)?;
                write!(f, ")")
            }
        }
    }
}

/// Ordered combinator chain; an empty chain renders as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain(pub Vec<Expr>);

impl Chain {
    pub fn new() -> Self {
        Chain::default()
    }

    pub fn push(&mut self, expr: Expr) {
        self.0.push(expr);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.0.iter()
    }

    /// Chain-join: `self` followed by `other`.
    pub fn then(mut self, other: Chain) -> Chain {
        self.0.extend(other.0);
        self
    }
}

impl FromIterator<Expr> for Chain {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        Chain(iter.into_iter().collect())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .fold(String::new(), |acc, expr| chain_join(&acc, &expr.to_string()));
        f.write_str(&rendered)
    }
}

/// One function-signature parameter, `name: Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub ty: TypeRef,
}

impl Declaration {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Declaration {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// Ordered declarations. Renders the bare name list and the typed list
/// from the same items, so both always line up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(pub Vec<Declaration>);

impl Arguments {
    pub fn push(&mut self, decl: Declaration) {
        self.0.push(decl);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// List-join: `self` followed by `other`.
    pub fn then(mut self, other: Arguments) -> Arguments {
        self.0.extend(other.0);
        self
    }

    /// `id, name`
    pub fn names(&self) -> String {
        self.0
            .iter()
            .fold(String::new(), |acc, decl| list_join(&acc, &decl.name))
    }

    /// `id: Long, name: Option[String]`
    pub fn typed(&self) -> String {
        self.0
            .iter()
            .fold(String::new(), |acc, decl| list_join(&acc, &decl.to_string()))
    }
}

/// What one pipeline stage contributes: its extraction chain and its
/// declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub chain: Chain,
    pub args: Arguments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_extractors() {
        let long = TypeRef::named("Long");
        let string = TypeRef::named("String");
        let cases = [
            (Expr::Literal("pets".into()), r#""pets""#),
            (Expr::Segment("long".into()), "long"),
            (
                Expr::param(Source::Param, "limit", &long, false),
                r#"param("limit").map(_.toLong)"#,
            ),
            (
                Expr::param(Source::Param, "limit", &long, true),
                r#"paramOption("limit").map(_.map(_.toLong))"#,
            ),
            (
                Expr::param(Source::Header, "X-Trace", &string, true),
                r#"headerOption("X-Trace")"#,
            ),
            (Expr::Params("tags".into()), r#"params("tags")"#),
            (
                Expr::JsonBody(TypeRef::named("Pet")),
                "jsonBody[Pet]",
            ),
            (
                Expr::FileUpload("file".into()),
                r#"fileUpload("file")"#,
            ),
        ];
        for (expr, expected) in cases {
            assert_eq!(expr.to_string(), expected);
        }
    }

    #[test]
    fn only_string_parsable_types_are_converted() {
        for (name, expected) in [
            ("Boolean", r#"header("k").map(_.toBoolean)"#),
            ("Double", r#"header("k").map(_.toDouble)"#),
            ("UUID", r#"header("k")"#),
            ("OffsetDateTime", r#"header("k")"#),
            ("LocalDate", r#"header("k")"#),
        ] {
            let expr = Expr::param(Source::Header, "k", &TypeRef::named(name), false);
            assert_eq!(expr.to_string(), expected, "{name}");
        }
    }

    #[test]
    fn literals_escape_quotes() {
        assert_eq!(Expr::Literal(r#"a"b"#.into()).to_string(), r#""a\"b""#);
    }

    #[test]
    fn chain_rendering_skips_nothing_and_adds_nothing() {
        assert_eq!(Chain::new().to_string(), "");
        let chain: Chain = [Expr::Literal("foo".into()), Expr::Segment("int".into())]
            .into_iter()
            .collect();
        assert_eq!(chain.clone().then(Chain::new()).to_string(), r#""foo" :: int"#);
        assert_eq!(Chain::new().then(chain).to_string(), r#""foo" :: int"#);
    }

    #[test]
    fn arguments_render_aligned_lists() {
        let mut args = Arguments::default();
        assert_eq!(args.names(), "");
        assert_eq!(args.typed(), "");

        args.push(Declaration::new("id", TypeRef::named("Long")));
        args.push(Declaration::new(
            "name",
            TypeRef::named("String").optional(),
        ));
        assert_eq!(args.names(), "id, name");
        assert_eq!(args.typed(), "id: Long, name: Option[String]");
    }
}
