//! `google.protobuf.FileDescriptorSet` JSON → [`SchemaFile`].
//!
//! Accepts the JSON that `buf build --as-file-descriptor-set -o set.json`
//! writes, as well as protoc-style JSON where enum-typed fields (`label`,
//! `type`) are plain numbers instead of `LABEL_*` / `TYPE_*` names.
//!
//! Only the subset of `descriptor.proto` needed for canonical rendering is
//! deserialized; options, source info and everything else is ignored.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::model::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldLabel, FieldType,
    MessageDescriptor, MethodDescriptor, ScalarKind, SchemaFile, ServiceDescriptor, TypeRef,
};

// =============================================================================
// Public API
// =============================================================================

/// A parsed descriptor set. Files are converted on demand so that imports
/// carried along in the set never need to be valid for rendering.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    files: Vec<FileDescriptorProtoJson>,
    /// Fully qualified names (no leading dot) of every enum in the set.
    enum_names: HashSet<String>,
}

/// Parse a descriptor set. `serde_json` caps JSON nesting at 128 levels and
/// every nested message costs two, so sets nested deeper than about 60
/// messages fail with [`LoadError::Json`].
pub fn parse_descriptor_set_json(text: &str) -> Result<DescriptorSet, LoadError> {
    let set: FileDescriptorSetJson = serde_json::from_str(text)?;

    let mut enum_names = HashSet::new();
    for file in &set.file {
        let package = file.package.clone().unwrap_or_default();
        for e in &file.enum_type {
            if let Some(name) = &e.name {
                enum_names.insert(qualify(&package, name));
            }
        }
        for m in &file.message_type {
            index_enums(&package, m, &mut enum_names);
        }
    }
    debug!(
        files = set.file.len(),
        enums = enum_names.len(),
        "parsed descriptor set"
    );

    Ok(DescriptorSet {
        files: set.file,
        enum_names,
    })
}

impl DescriptorSet {
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(file_name).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Convert the file named exactly `name`.
    pub fn file(&self, name: &str) -> Result<SchemaFile, LoadError> {
        let file = self
            .files
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .ok_or_else(|| LoadError::NoMatchingFile {
                expected: name.to_string(),
                available: self.file_names().join(", "),
            })?;
        self.convert_file(file)
    }

    /// Pick the file a module identifier refers to.
    ///
    /// `proto_name` is the expected proto path (`acme/payments.proto`). A file
    /// named exactly that wins. Otherwise a file matches when its name ends
    /// with `/<proto_name>`, and several such files are ambiguous. With no
    /// match, a set that holds a single file yields that file.
    pub fn select(&self, proto_name: &str) -> Result<SchemaFile, LoadError> {
        if self.files.is_empty() {
            return Err(LoadError::EmptyDescriptorSet);
        }

        if let Some(exact) = self
            .files
            .iter()
            .find(|f| f.name.as_deref() == Some(proto_name))
        {
            return self.convert_file(exact);
        }

        let suffix = format!("/{proto_name}");
        let matches: Vec<&FileDescriptorProtoJson> = self
            .files
            .iter()
            .filter(|f| f.name.as_deref().is_some_and(|n| n.ends_with(&suffix)))
            .collect();

        match matches.as_slice() {
            [file] => self.convert_file(file),
            [] if self.files.len() == 1 => {
                debug!(
                    expected = proto_name,
                    file = %file_name(&self.files[0]),
                    "no file name matched; using the only file in the set"
                );
                self.convert_file(&self.files[0])
            }
            [] => Err(LoadError::NoMatchingFile {
                expected: proto_name.to_string(),
                available: self.file_names().join(", "),
            }),
            many => Err(LoadError::AmbiguousModule {
                expected: proto_name.to_string(),
                matches: many.iter().map(|f| file_name(f)).collect::<Vec<_>>().join(", "),
            }),
        }
    }

    fn convert_file(&self, file: &FileDescriptorProtoJson) -> Result<SchemaFile, LoadError> {
        let ctx = FileContext {
            file: file_name(file),
            enum_names: &self.enum_names,
        };
        let mut out = SchemaFile::new(ctx.file.clone(), file.package.clone().unwrap_or_default());

        for s in &file.service {
            let Some(service) = ctx.service(s)? else {
                continue;
            };
            let name = service.name.clone();
            if out.add_service(service).is_some() {
                return Err(ctx.duplicate("service", name));
            }
        }
        for m in &file.message_type {
            let Some(message) = ctx.message(m)? else {
                continue;
            };
            let name = message.name.clone();
            if out.add_message(message).is_some() {
                return Err(ctx.duplicate("message", name));
            }
        }
        for e in &file.enum_type {
            let Some(desc) = ctx.enumeration(e) else {
                continue;
            };
            let name = desc.name.clone();
            if out.add_enum(desc).is_some() {
                return Err(ctx.duplicate("enum", name));
            }
        }

        Ok(out)
    }
}

// =============================================================================
// Descriptor JSON (subset)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct FileDescriptorSetJson {
    #[serde(default)]
    file: Vec<FileDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct FileDescriptorProtoJson {
    name: Option<String>,
    package: Option<String>,
    #[serde(default, rename = "messageType")]
    message_type: Vec<DescriptorProtoJson>,
    #[serde(default, rename = "enumType")]
    enum_type: Vec<EnumDescriptorProtoJson>,
    #[serde(default)]
    service: Vec<ServiceDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct DescriptorProtoJson {
    name: Option<String>,
    #[serde(default)]
    field: Vec<FieldDescriptorProtoJson>,
    #[serde(default, rename = "nestedType")]
    nested_type: Vec<DescriptorProtoJson>,
    #[serde(default, rename = "enumType")]
    enum_type: Vec<EnumDescriptorProtoJson>,
    /// Enum values hung directly off a message (legacy shape).
    #[serde(default)]
    value: Vec<EnumValueDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct FieldDescriptorProtoJson {
    name: Option<String>,
    label: Option<EnumToken>,
    #[serde(rename = "type")]
    typ: Option<EnumToken>,
    #[serde(rename = "typeName")]
    type_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnumDescriptorProtoJson {
    name: Option<String>,
    #[serde(default)]
    value: Vec<EnumValueDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnumValueDescriptorProtoJson {
    name: Option<String>,
    number: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceDescriptorProtoJson {
    name: Option<String>,
    #[serde(default)]
    method: Vec<MethodDescriptorProtoJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct MethodDescriptorProtoJson {
    name: Option<String>,
    #[serde(rename = "inputType")]
    input_type: Option<String>,
    #[serde(rename = "outputType")]
    output_type: Option<String>,
}

/// Proto enum as emitted in JSON: either its value name or its number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EnumToken {
    Name(String),
    Number(i64),
}

impl std::fmt::Display for EnumToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumToken::Name(name) => f.write_str(name),
            EnumToken::Number(n) => write!(f, "{n}"),
        }
    }
}

// =============================================================================
// Conversion
// =============================================================================

struct FileContext<'a> {
    file: String,
    enum_names: &'a HashSet<String>,
}

impl FileContext<'_> {
    fn duplicate(&self, kind: &'static str, name: String) -> LoadError {
        LoadError::DuplicateDeclaration {
            kind,
            name,
            file: self.file.clone(),
        }
    }

    fn malformed(&self, detail: String) -> LoadError {
        LoadError::Malformed {
            file: self.file.clone(),
            detail,
        }
    }

    fn service(&self, s: &ServiceDescriptorProtoJson) -> Result<Option<ServiceDescriptor>, LoadError> {
        let Some(name) = named(s.name.as_ref(), "service", &self.file) else {
            return Ok(None);
        };

        let mut methods = Vec::with_capacity(s.method.len());
        for m in &s.method {
            let Some(method_name) = named(m.name.as_ref(), "method", &self.file) else {
                continue;
            };
            let input = m.input_type.as_deref().ok_or_else(|| {
                self.malformed(format!("rpc {name}.{method_name} has no input type"))
            })?;
            let output = m.output_type.as_deref().ok_or_else(|| {
                self.malformed(format!("rpc {name}.{method_name} has no output type"))
            })?;
            methods.push(MethodDescriptor {
                name: method_name,
                input_type: TypeRef::from_type_name(input),
                output_type: TypeRef::from_type_name(output),
            });
        }

        Ok(Some(ServiceDescriptor { name, methods }))
    }

    fn message(&self, m: &DescriptorProtoJson) -> Result<Option<MessageDescriptor>, LoadError> {
        let Some(name) = named(m.name.as_ref(), "message", &self.file) else {
            return Ok(None);
        };
        let mut out = MessageDescriptor::new(name);

        for (position, f) in m.field.iter().enumerate() {
            let Some(field_name) = named(f.name.as_ref(), "field", &self.file) else {
                continue;
            };
            let index = u32::try_from(position)
                .map_err(|_| self.malformed(format!("message {} has too many fields", out.name)))?;
            let field_type = self.field_type(&out.name, &field_name, f)?;
            out.fields.push(FieldDescriptor {
                name: field_name,
                index,
                label: field_label(f.label.as_ref()),
                field_type,
            });
        }

        for nested in &m.nested_type {
            if let Some(nested) = self.message(nested)? {
                out.nested_messages.push(nested);
            }
        }
        for e in &m.enum_type {
            if let Some(e) = self.enumeration(e) {
                out.nested_enums.push(e);
            }
        }
        out.direct_enum_values = m.value.len();

        Ok(Some(out))
    }

    fn field_type(
        &self,
        message: &str,
        field: &str,
        f: &FieldDescriptorProtoJson,
    ) -> Result<FieldType, LoadError> {
        let kind = match &f.typ {
            None => None,
            Some(token) => {
                let kind = match token {
                    EnumToken::Name(name) => ScalarKind::from_type_token(name),
                    EnumToken::Number(n) => ScalarKind::from_type_number(*n),
                };
                Some(kind.ok_or_else(|| {
                    self.malformed(format!("{message}.{field} has unknown type `{token}`"))
                })?)
            }
        };

        let field_type = match (kind, f.type_name.as_deref()) {
            (Some(ScalarKind::Message | ScalarKind::Group), Some(type_name)) => {
                FieldType::Message(TypeRef::from_type_name(type_name))
            }
            (Some(ScalarKind::Enum), Some(type_name)) => {
                FieldType::Enum(TypeRef::from_type_name(type_name))
            }
            (Some(kind), _) => FieldType::Scalar(kind),
            // Unresolved descriptors may carry only `typeName`.
            (None, Some(type_name)) => {
                let reference = TypeRef::from_type_name(type_name);
                if self.enum_names.contains(&reference.full_name) {
                    FieldType::Enum(reference)
                } else {
                    FieldType::Message(reference)
                }
            }
            (None, None) => {
                return Err(self.malformed(format!("{message}.{field} has no type")));
            }
        };
        Ok(field_type)
    }

    fn enumeration(&self, e: &EnumDescriptorProtoJson) -> Option<EnumDescriptor> {
        let name = named(e.name.as_ref(), "enum", &self.file)?;
        let values = e
            .value
            .iter()
            .filter_map(|v| {
                let value_name = named(v.name.as_ref(), "enum value", &self.file)?;
                Some(EnumValueDescriptor {
                    name: value_name,
                    number: v.number.unwrap_or_default(),
                })
            })
            .collect();
        Some(EnumDescriptor { name, values })
    }
}

fn field_label(token: Option<&EnumToken>) -> FieldLabel {
    match token {
        None => FieldLabel::Optional,
        Some(EnumToken::Name(name)) => match name.as_str() {
            "LABEL_OPTIONAL" => FieldLabel::Optional,
            "LABEL_REQUIRED" => FieldLabel::Required,
            "LABEL_REPEATED" => FieldLabel::Repeated,
            other => FieldLabel::Unrecognized(other.to_string()),
        },
        Some(EnumToken::Number(1)) => FieldLabel::Optional,
        Some(EnumToken::Number(2)) => FieldLabel::Required,
        Some(EnumToken::Number(3)) => FieldLabel::Repeated,
        Some(EnumToken::Number(n)) => FieldLabel::Unrecognized(n.to_string()),
    }
}

fn named(name: Option<&String>, kind: &str, file: &str) -> Option<String> {
    match name {
        Some(name) if !name.is_empty() => Some(name.clone()),
        _ => {
            warn!(file, "skipping unnamed {kind} descriptor");
            None
        }
    }
}

fn index_enums(package: &str, m: &DescriptorProtoJson, out: &mut HashSet<String>) {
    let Some(name) = &m.name else {
        return;
    };
    let scope = qualify(package, name);
    for e in &m.enum_type {
        if let Some(en) = &e.name {
            out.insert(format!("{scope}.{en}"));
        }
    }
    for nested in &m.nested_type {
        index_enums(&scope, nested, out);
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn file_name(file: &FileDescriptorProtoJson) -> String {
    file.name.clone().unwrap_or_else(|| "<unknown>".to_string())
}
