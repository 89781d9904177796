//! OpenAPI schemas to Scala type names, plus identifier naming.

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use openapiv3::{
    AdditionalProperties, IntegerFormat, NumberFormat, ReferenceOr, Schema, SchemaKind,
    StringFormat, Type, VariantOrUnknownOrEmpty,
};

use crate::model::TypeRef;

const RESERVED_WORDS: &[&str] = &[
    // Scala
    "abstract", "case", "catch", "class", "def", "do", "else", "extends", "false", "final",
    "finally", "for", "forsome", "if", "implicit", "import", "lazy", "match", "new", "null",
    "object", "override", "package", "private", "protected", "return", "sealed", "super", "this",
    "throw", "trait", "try", "true", "type", "val", "var", "while", "with", "yield",
    // Java interop
    "continue", "switch", "assert", "default", "synchronized", "goto", "break", "double",
    "implements", "byte", "public", "throws", "enum", "instanceof", "transient", "int", "short",
    "char", "interface", "static", "void", "long", "strictfp", "volatile", "const", "float",
    "native",
];

/// Prefixes `_` to words the target language reserves.
pub fn escape_reserved(name: &str) -> String {
    if RESERVED_WORDS.contains(&name.to_lowercase().as_str()) {
        format!("_{name}")
    } else {
        name.to_owned()
    }
}

/// `X-Api-Key` → `xApiKey`, `type` → `_type`.
pub fn param_name(wire_name: &str) -> String {
    escape_reserved(&wire_name.to_lower_camel_case())
}

/// `#/components/schemas/pet_owner` → `PetOwner`.
pub fn model_name(reference: &str) -> String {
    let name = reference.rsplit('/').next().unwrap_or(reference);
    name.to_upper_camel_case()
}

pub fn schema_type(schema: &Schema) -> TypeRef {
    match &schema.schema_kind {
        SchemaKind::Type(Type::String(string)) => TypeRef::named(match &string.format {
            VariantOrUnknownOrEmpty::Item(StringFormat::DateTime) => "OffsetDateTime",
            VariantOrUnknownOrEmpty::Item(StringFormat::Date) => "LocalDateTime",
            VariantOrUnknownOrEmpty::Item(StringFormat::Binary) => "File",
            VariantOrUnknownOrEmpty::Unknown(format) if format == "uuid" => "UUID",
            _ => "String",
        }),
        SchemaKind::Type(Type::Integer(integer)) => TypeRef::named(match &integer.format {
            VariantOrUnknownOrEmpty::Item(IntegerFormat::Int64) => "Long",
            _ => "Int",
        }),
        SchemaKind::Type(Type::Number(number)) => TypeRef::named(match &number.format {
            VariantOrUnknownOrEmpty::Item(NumberFormat::Float) => "Float",
            VariantOrUnknownOrEmpty::Item(NumberFormat::Double) => "Double",
            _ => "BigDecimal",
        }),
        SchemaKind::Type(Type::Boolean(_)) => TypeRef::named("Boolean"),
        SchemaKind::Type(Type::Array(array)) => {
            let item = array
                .items
                .as_ref()
                .map(boxed_schema_type)
                .unwrap_or_else(|| TypeRef::named("Object"));
            TypeRef::generic("Seq", vec![item])
        }
        SchemaKind::Type(Type::Object(object)) => match &object.additional_properties {
            Some(AdditionalProperties::Schema(value)) => TypeRef::generic(
                "Map",
                vec![TypeRef::named("String"), schema_ref_type(value)],
            ),
            _ => TypeRef::named("Object"),
        },
        _ => TypeRef::named("Object"),
    }
}

pub fn schema_ref_type(schema: &ReferenceOr<Schema>) -> TypeRef {
    match schema {
        ReferenceOr::Reference { reference } => TypeRef::named(model_name(reference)),
        ReferenceOr::Item(schema) => schema_type(schema),
    }
}

pub fn boxed_schema_type(schema: &ReferenceOr<Box<Schema>>) -> TypeRef {
    match schema {
        ReferenceOr::Reference { reference } => TypeRef::named(model_name(reference)),
        ReferenceOr::Item(schema) => schema_type(schema),
    }
}

/// Inline `type: array`. Referenced models are never treated as containers.
pub fn is_array(schema: &Schema) -> bool {
    matches!(schema.schema_kind, SchemaKind::Type(Type::Array(_)))
}

/// `type: string, format: binary`, an uploaded file.
pub fn is_binary(schema: &Schema) -> bool {
    matches!(
        &schema.schema_kind,
        SchemaKind::Type(Type::String(string))
            if matches!(string.format, VariantOrUnknownOrEmpty::Item(StringFormat::Binary))
    )
}
