//! Read-only descriptor tree for one protobuf schema file.
//!
//! These types are plain data: loaders build them once and the canonicalizer
//! only ever borrows them. Top-level declarations live in name-keyed maps whose
//! iteration order carries no meaning; nested declarations keep the order the
//! loader saw them in, and it is up to the renderer to impose a canonical one.

use std::collections::HashMap;

/// Root of a loaded schema module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaFile {
    /// Proto file name as recorded by the compiler (e.g. `acme/payments.proto`).
    pub name: String,
    pub package: String,
    pub services: HashMap<String, ServiceDescriptor>,
    pub messages: HashMap<String, MessageDescriptor>,
    pub enums: HashMap<String, EnumDescriptor>,
}

impl SchemaFile {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            ..Self::default()
        }
    }

    pub fn add_service(&mut self, service: ServiceDescriptor) -> Option<ServiceDescriptor> {
        self.services.insert(service.name.clone(), service)
    }

    pub fn add_message(&mut self, message: MessageDescriptor) -> Option<MessageDescriptor> {
        self.messages.insert(message.name.clone(), message)
    }

    pub fn add_enum(&mut self, desc: EnumDescriptor) -> Option<EnumDescriptor> {
        self.enums.insert(desc.name.clone(), desc)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,
    pub input_type: TypeRef,
    pub output_type: TypeRef,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDescriptor {
    pub name: String,
    /// Fields in the order the loader produced them; `FieldDescriptor::index`
    /// is authoritative.
    pub fields: Vec<FieldDescriptor>,
    pub nested_messages: Vec<MessageDescriptor>,
    pub nested_enums: Vec<EnumDescriptor>,
    /// Enum values declared on the message itself rather than inside a nested
    /// enum type. Legacy shape; rendering rejects any non-zero count.
    pub direct_enum_values: usize,
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Declaration position within the enclosing message. Rendered as the tag.
    pub index: u32,
    pub label: FieldLabel,
    pub field_type: FieldType,
}

/// Field cardinality as recorded in the descriptor.
///
/// `Unrecognized` keeps whatever token the loader could not classify so the
/// renderer can report it instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLabel {
    Optional,
    Required,
    Repeated,
    Unrecognized(String),
}

/// Exactly one of scalar, message reference or enum reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarKind),
    Message(TypeRef),
    Enum(TypeRef),
}

/// Reference to a message or enum type declared elsewhere in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Short name, the only part that is rendered.
    pub name: String,
    /// Fully qualified name without the leading dot (`acme.v1.Order.Line`).
    pub full_name: String,
}

impl TypeRef {
    /// Build a reference from a descriptor type name such as `.acme.v1.Order`.
    pub fn from_type_name(type_name: &str) -> Self {
        let full_name = type_name.trim_start_matches('.');
        let name = full_name.rsplit('.').next().unwrap_or(full_name);
        Self {
            name: name.to_string(),
            full_name: full_name.to_string(),
        }
    }
}

/// The closed set of descriptor type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Bytes,
    Double,
    Enum,
    Fixed32,
    Fixed64,
    Float,
    Group,
    Int32,
    Int64,
    Message,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    String,
    Uint32,
    Uint64,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 18] = [
        ScalarKind::Bool,
        ScalarKind::Bytes,
        ScalarKind::Double,
        ScalarKind::Enum,
        ScalarKind::Fixed32,
        ScalarKind::Fixed64,
        ScalarKind::Float,
        ScalarKind::Group,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Message,
        ScalarKind::Sfixed32,
        ScalarKind::Sfixed64,
        ScalarKind::Sint32,
        ScalarKind::Sint64,
        ScalarKind::String,
        ScalarKind::Uint32,
        ScalarKind::Uint64,
    ];

    /// Keyword used in the canonical rendering.
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Double => "double",
            ScalarKind::Enum => "enum",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Float => "float",
            ScalarKind::Group => "group",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Message => "message",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::String => "string",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
        }
    }

    /// Map a `FieldDescriptorProto.Type` token (`TYPE_INT32`) to a kind.
    pub fn from_type_token(token: &str) -> Option<Self> {
        let kind = match token {
            "TYPE_DOUBLE" => ScalarKind::Double,
            "TYPE_FLOAT" => ScalarKind::Float,
            "TYPE_INT64" => ScalarKind::Int64,
            "TYPE_UINT64" => ScalarKind::Uint64,
            "TYPE_INT32" => ScalarKind::Int32,
            "TYPE_FIXED64" => ScalarKind::Fixed64,
            "TYPE_FIXED32" => ScalarKind::Fixed32,
            "TYPE_BOOL" => ScalarKind::Bool,
            "TYPE_STRING" => ScalarKind::String,
            "TYPE_GROUP" => ScalarKind::Group,
            "TYPE_MESSAGE" => ScalarKind::Message,
            "TYPE_BYTES" => ScalarKind::Bytes,
            "TYPE_UINT32" => ScalarKind::Uint32,
            "TYPE_ENUM" => ScalarKind::Enum,
            "TYPE_SFIXED32" => ScalarKind::Sfixed32,
            "TYPE_SFIXED64" => ScalarKind::Sfixed64,
            "TYPE_SINT32" => ScalarKind::Sint32,
            "TYPE_SINT64" => ScalarKind::Sint64,
            _ => return None,
        };
        Some(kind)
    }

    /// Map a `FieldDescriptorProto.Type` wire number (1..=18) to a kind.
    pub fn from_type_number(number: i64) -> Option<Self> {
        let kind = match number {
            1 => ScalarKind::Double,
            2 => ScalarKind::Float,
            3 => ScalarKind::Int64,
            4 => ScalarKind::Uint64,
            5 => ScalarKind::Int32,
            6 => ScalarKind::Fixed64,
            7 => ScalarKind::Fixed32,
            8 => ScalarKind::Bool,
            9 => ScalarKind::String,
            10 => ScalarKind::Group,
            11 => ScalarKind::Message,
            12 => ScalarKind::Bytes,
            13 => ScalarKind::Uint32,
            14 => ScalarKind::Enum,
            15 => ScalarKind::Sfixed32,
            16 => ScalarKind::Sfixed64,
            17 => ScalarKind::Sint32,
            18 => ScalarKind::Sint64,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<EnumValueDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}
