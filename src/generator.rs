//! Walks an OpenAPI document, lowers every operation into the route model
//! and runs the route pipeline on it.

use heck::ToLowerCamelCase;
use indexmap::IndexMap;
use openapiv3::{
    APIKeyLocation, Components, MediaType, OpenAPI, ParameterSchemaOrContent, PathItem,
    ReferenceOr, RequestBody, Schema, SchemaKind, Type,
};
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::merge::{build_route, RouteDefinition};
use crate::model::{
    KeyLocation, Operation, ParamKind, Parameter, SecurityRequirement, SecurityScheme, TypeRef,
};
use crate::type_mapping::{
    boxed_schema_type, escape_reserved, is_array, is_binary, model_name, param_name,
    schema_ref_type,
};

struct OapiState {
    routes: IndexMap<String, RouteDefinition>,
}

impl OapiState {
    fn new() -> Self {
        OapiState {
            routes: IndexMap::default(),
        }
    }

    fn add_route(&mut self, route: RouteDefinition) -> Result<()> {
        if self.routes.contains_key(&route.operation_id) {
            return Err(Error::DuplicateOperation(route.operation_id));
        }
        self.routes.insert(route.operation_id.clone(), route);
        Ok(())
    }
}

/// Route definitions for every operation of `definition`, keyed by
/// operation id, in document order.
pub fn generate(
    definition: &OpenAPI,
    config: &GeneratorConfig,
) -> Result<IndexMap<String, RouteDefinition>> {
    let mut state = OapiState::new();

    for (path_name, path_or_ref) in definition.paths.paths.iter() {
        let path_item = match path_or_ref {
            ReferenceOr::Reference { reference } => {
                return Err(Error::UnresolvedReference(reference.clone()))
            }
            ReferenceOr::Item(path_item) => path_item,
        };
        let common_params = resolve_parameters(definition, &path_item.parameters)?;
        for (method, operation) in MethodsIterator::new(path_item) {
            let operation =
                lower_operation(definition, &common_params, method, path_name, operation)?;
            state.add_route(build_route(&operation, config)?)?;
        }
    }

    debug!(routes = state.routes.len(), "generated routes");
    Ok(state.routes)
}

/// Resolves `#/components/<section>/<name>` against `definition`.
fn lookup<'a, T>(
    definition: &'a OpenAPI,
    reference: &str,
    section: &str,
    pick: impl Fn(&'a Components) -> &'a IndexMap<String, ReferenceOr<T>>,
) -> Result<&'a T> {
    let unresolved = || Error::UnresolvedReference(reference.to_owned());
    let name = reference
        .strip_prefix("#/components/")
        .and_then(|rest| rest.strip_prefix(section))
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(unresolved)?;
    definition
        .components
        .as_ref()
        .map(pick)
        .and_then(|items| items.get(name))
        .and_then(ReferenceOr::as_item)
        .ok_or_else(unresolved)
}

fn resolve_parameters<'a>(
    definition: &'a OpenAPI,
    parameters: &'a [ReferenceOr<openapiv3::Parameter>],
) -> Result<Vec<&'a openapiv3::Parameter>> {
    parameters
        .iter()
        .map(|param_or_ref| match param_or_ref {
            ReferenceOr::Reference { reference } => {
                lookup(definition, reference, "parameters", |c| &c.parameters)
            }
            ReferenceOr::Item(param) => Ok(param),
        })
        .collect()
}

fn location(parameter: &openapiv3::Parameter) -> &'static str {
    match parameter {
        openapiv3::Parameter::Path { .. } => "path",
        openapiv3::Parameter::Query { .. } => "query",
        openapiv3::Parameter::Header { .. } => "header",
        openapiv3::Parameter::Cookie { .. } => "cookie",
    }
}

fn get_parameter_type(parameter: &openapiv3::Parameter) -> (TypeRef, bool) {
    let schema = match &parameter.parameter_data_ref().format {
        ParameterSchemaOrContent::Schema(schema) => Some(schema),
        ParameterSchemaOrContent::Content(content) => content
            .values()
            .next()
            .and_then(|media| media.schema.as_ref()),
    };
    match schema {
        Some(schema) => (
            schema_ref_type(schema),
            schema.as_item().is_some_and(is_array),
        ),
        None => (TypeRef::named("String"), false),
    }
}

fn lower_parameter(parameter: &openapiv3::Parameter) -> Option<Parameter> {
    let data = parameter.parameter_data_ref();
    let (data_type, container) = get_parameter_type(parameter);
    let required = data.required;
    let kind = match parameter {
        openapiv3::Parameter::Path { .. } => ParamKind::Path {
            required,
            container,
        },
        openapiv3::Parameter::Query { .. } => ParamKind::Query {
            required,
            container,
        },
        openapiv3::Parameter::Header { .. } => ParamKind::Header {
            required,
            container,
        },
        openapiv3::Parameter::Cookie { .. } => {
            warn!(parameter = %data.name, "skipping cookie parameter");
            return None;
        }
    };
    Some(Parameter {
        name: param_name(&data.name),
        wire_name: data.name.clone(),
        data_type,
        kind,
    })
}

fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_json(media_type: &str) -> bool {
    let essence = essence(media_type);
    essence == "application/json" || essence.ends_with("+json")
}

fn is_form(media_type: &str) -> bool {
    let essence = essence(media_type);
    essence == "multipart/form-data" || essence == "application/x-www-form-urlencoded"
}

fn json_body(media: &MediaType) -> Parameter {
    let (name, data_type) = match &media.schema {
        Some(ReferenceOr::Reference { reference }) => {
            let model = model_name(reference);
            (param_name(&model), TypeRef::named(model))
        }
        Some(schema) => ("body".to_owned(), schema_ref_type(schema)),
        None => ("body".to_owned(), TypeRef::named("Object")),
    };
    Parameter {
        name,
        wire_name: "body".to_owned(),
        data_type,
        kind: ParamKind::Body,
    }
}

/// One parameter per form field; binary fields become file uploads and
/// everything else is read like a query parameter.
fn form_fields(definition: &OpenAPI, media: &MediaType) -> Result<Vec<Parameter>> {
    let schema: &Schema = match &media.schema {
        Some(ReferenceOr::Reference { reference }) => {
            lookup(definition, reference, "schemas", |c| &c.schemas)?
        }
        Some(ReferenceOr::Item(schema)) => schema,
        None => return Ok(vec![]),
    };
    let SchemaKind::Type(Type::Object(object)) = &schema.schema_kind else {
        warn!("form body is not an object schema, skipping");
        return Ok(vec![]);
    };

    let fields = object
        .properties
        .iter()
        .map(|(field, schema)| {
            let item = schema.as_item();
            let required = object.required.contains(field);
            let (data_type, kind) = if item.is_some_and(|s| is_binary(s)) {
                (TypeRef::named("File"), ParamKind::File)
            } else {
                let kind = ParamKind::Query {
                    required,
                    container: item.is_some_and(|s| is_array(s)),
                };
                (boxed_schema_type(schema), kind)
            };
            Parameter {
                name: param_name(field),
                wire_name: field.clone(),
                data_type,
                kind,
            }
        })
        .collect();
    Ok(fields)
}

fn lower_request_body(definition: &OpenAPI, body: &RequestBody) -> Result<Vec<Parameter>> {
    for (media_type, media) in &body.content {
        if is_json(media_type) {
            return Ok(vec![json_body(media)]);
        }
        if is_form(media_type) {
            return form_fields(definition, media);
        }
        warn!(media_type = %media_type, "unsupported request body media type");
    }
    Ok(vec![])
}

fn lower_security(
    definition: &OpenAPI,
    operation: &openapiv3::Operation,
) -> Result<Vec<SecurityRequirement>> {
    let requirements = operation
        .security
        .as_ref()
        .or(definition.security.as_ref());

    let mut schemes: IndexMap<String, SecurityRequirement> = IndexMap::new();
    for name in requirements.into_iter().flatten().flat_map(|r| r.keys()) {
        if schemes.contains_key(name) {
            continue;
        }
        let scheme_or_ref = definition
            .components
            .as_ref()
            .and_then(|c| c.security_schemes.get(name))
            .ok_or_else(|| Error::UnresolvedReference(name.clone()))?;
        let scheme = match scheme_or_ref {
            ReferenceOr::Reference { reference } => {
                lookup(definition, reference, "securitySchemes", |c| {
                    &c.security_schemes
                })?
            }
            ReferenceOr::Item(scheme) => scheme,
        };
        let scheme = match scheme {
            openapiv3::SecurityScheme::APIKey {
                location,
                name: key_name,
                ..
            } => {
                let location = match location {
                    APIKeyLocation::Header => KeyLocation::Header,
                    APIKeyLocation::Query => KeyLocation::Query,
                    APIKeyLocation::Cookie => {
                        warn!(scheme = %name, "skipping api key passed in a cookie");
                        continue;
                    }
                };
                SecurityScheme::ApiKey {
                    location,
                    key_name: key_name.clone(),
                }
            }
            openapiv3::SecurityScheme::HTTP { .. } => SecurityScheme::Unsupported("http".into()),
            openapiv3::SecurityScheme::OAuth2 { .. } => {
                SecurityScheme::Unsupported("oauth2".into())
            }
            openapiv3::SecurityScheme::OpenIDConnect { .. } => {
                SecurityScheme::Unsupported("openIdConnect".into())
            }
        };
        schemes.insert(
            name.clone(),
            SecurityRequirement {
                name: name.clone(),
                scheme,
            },
        );
    }
    Ok(schemes.into_values().collect())
}

fn operation_id(method: &str, path: &str, operation: &openapiv3::Operation) -> String {
    let name = match &operation.operation_id {
        Some(id) => id.to_lower_camel_case(),
        None => format!("{method} {path}").to_lower_camel_case(),
    };
    escape_reserved(&name)
}

/// Puts path parameters in the order their `{name}` placeholders appear in
/// the template. Other parameters keep their positions.
fn order_path_params(path: &str, params: &mut [Parameter]) {
    let position = |p: &Parameter| {
        path.find(&format!("{{{}}}", p.wire_name)).unwrap_or(usize::MAX)
    };
    let slots: Vec<usize> = params
        .iter()
        .enumerate()
        .filter(|(_, p)| p.kind.is_path())
        .map(|(i, _)| i)
        .collect();
    let mut ordered: Vec<Parameter> = slots.iter().map(|&i| params[i].clone()).collect();
    ordered.sort_by_key(position);
    for (slot, param) in slots.into_iter().zip(ordered) {
        params[slot] = param;
    }
}

fn lower_operation(
    definition: &OpenAPI,
    common_params: &[&openapiv3::Parameter],
    method: &str,
    path: &str,
    operation: &openapiv3::Operation,
) -> Result<Operation> {
    let own_params = resolve_parameters(definition, &operation.parameters)?;
    // Path-item parameters apply unless the operation redeclares them.
    let inherited = common_params.iter().copied().filter(|common| {
        let key = (&common.parameter_data_ref().name, location(common));
        !own_params
            .iter()
            .any(|own| (&own.parameter_data_ref().name, location(own)) == key)
    });

    let mut lowered = Operation::new(operation_id(method, path, operation), method, path);
    lowered.params = own_params
        .iter()
        .copied()
        .chain(inherited)
        .filter_map(lower_parameter)
        .collect();
    order_path_params(path, &mut lowered.params);

    if let Some(body_or_ref) = &operation.request_body {
        let body = match body_or_ref {
            ReferenceOr::Reference { reference } => {
                lookup(definition, reference, "requestBodies", |c| &c.request_bodies)?
            }
            ReferenceOr::Item(body) => body,
        };
        lowered.params.extend(lower_request_body(definition, body)?);
    }

    lowered.security = lower_security(definition, operation)?;

    debug!(
        operation = %lowered.operation_id,
        method = %lowered.method,
        path = %lowered.path,
        params = lowered.params.len(),
        "lowered operation"
    );
    Ok(lowered)
}

struct MethodsIterator<'a> {
    path_item: &'a PathItem,
    step: u8,
}

impl<'a> MethodsIterator<'a> {
    fn new(path_item: &'a PathItem) -> Self {
        MethodsIterator { path_item, step: 0 }
    }
}

impl<'a> Iterator for MethodsIterator<'a> {
    type Item = (&'static str, &'a openapiv3::Operation);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.path_item;
            let m = match self.step {
                0 => item.get.as_ref().map(|op| ("get", op)),
                1 => item.put.as_ref().map(|op| ("put", op)),
                2 => item.post.as_ref().map(|op| ("post", op)),
                3 => item.delete.as_ref().map(|op| ("delete", op)),
                4 => item.options.as_ref().map(|op| ("options", op)),
                5 => item.head.as_ref().map(|op| ("head", op)),
                6 => item.patch.as_ref().map(|op| ("patch", op)),
                7 => item.trace.as_ref().map(|op| ("trace", op)),
                _ => return None,
            };
            self.step = self.step.saturating_add(1);
            if m.is_some() {
                return m;
            }
        }
    }
}
