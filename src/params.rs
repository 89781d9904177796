//! Per-parameter classification into an extraction combinator and a
//! signature declaration.

use tracing::debug;

use crate::config::{GeneratorConfig, OptionalPathParams};
use crate::fragment::{Declaration, Expr, Fragments, Source};
use crate::model::{Operation, ParamKind, Parameter, TypeRef};

const SEQUENCE_TYPE: &str = "Seq";
const FILE_UPLOAD_TYPE: &str = "FileUpload";

/// Extraction (if this parameter needs one outside the path chain) and
/// declared type of a single parameter.
pub fn classify(param: &Parameter, config: &GeneratorConfig) -> (Option<Expr>, TypeRef) {
    let ty = param.data_type.clone();
    let key = param.wire_name.clone();

    match param.kind {
        ParamKind::Body => (Some(Expr::JsonBody(ty.clone())), ty),
        ParamKind::Path {
            container: true, ..
        }
        | ParamKind::Query {
            container: true, ..
        }
        | ParamKind::Header {
            container: true, ..
        } => (Some(Expr::Params(key)), ty.with_constructor(SEQUENCE_TYPE)),
        ParamKind::Query { required, .. } => single(Source::Param, key, ty, required),
        ParamKind::Header { required, .. } => single(Source::Header, key, ty, required),
        ParamKind::File => (
            Some(Expr::FileUpload(key)),
            TypeRef::named(FILE_UPLOAD_TYPE),
        ),
        ParamKind::Path { required: true, .. } => (None, ty),
        ParamKind::Path {
            required: false, ..
        } => match config.optional_path_params {
            OptionalPathParams::Implicit => (None, ty),
            OptionalPathParams::QueryFallback => {
                let expr = Expr::param(Source::Param, key, &ty, true);
                (Some(expr), ty)
            }
        },
    }
}

fn single(source: Source, key: String, ty: TypeRef, required: bool) -> (Option<Expr>, TypeRef) {
    let expr = Expr::param(source, key, &ty, !required);
    let declared = if required { ty } else { ty.optional() };
    (Some(expr), declared)
}

/// Classifies every parameter of `op` in declared order.
pub fn resolve_params(op: &Operation, config: &GeneratorConfig) -> Fragments {
    let mut out = Fragments::default();
    for param in &op.params {
        let (extract, ty) = classify(param, config);
        if let Some(expr) = extract {
            out.chain.push(expr);
        }
        out.args.push(Declaration::new(param.name.clone(), ty));
    }
    debug!(
        operation = %op.operation_id,
        chain = %out.chain,
        args = %out.args.typed(),
        "resolved parameters"
    );
    out
}
