//! Canonical rendering of individual descriptors.
//!
//! Ordering rules:
//! - service methods, nested messages and nested enums: by name;
//! - fields: by declaration index (never by name);
//! - enum values: by number, ties keep their declaration order.
//!
//! All sorts are stable, so the output depends only on the sort keys and, for
//! equal keys, on the order the descriptor lists them in.

use protonorm_descriptor::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldLabel, FieldType,
    MessageDescriptor, MethodDescriptor, ServiceDescriptor,
};

use crate::error::CanonicalizeError;

/// Spaces per nesting level.
pub const INDENT: usize = 2;

pub fn render_service(svc: &ServiceDescriptor) -> Vec<String> {
    let mut out = Vec::new();
    push_service(&mut out, svc);
    out
}

pub fn render_enum(desc: &EnumDescriptor, depth: usize) -> Vec<String> {
    let mut out = Vec::new();
    push_enum(&mut out, desc, depth);
    out
}

pub fn render_message(
    msg: &MessageDescriptor,
    depth: usize,
) -> Result<Vec<String>, CanonicalizeError> {
    let mut out = Vec::new();
    push_message(&mut out, msg, depth)?;
    Ok(out)
}

pub(crate) fn push_service(out: &mut Vec<String>, svc: &ServiceDescriptor) {
    out.push(format!("service {} {{", svc.name));

    let mut methods: Vec<&MethodDescriptor> = svc.methods.iter().collect();
    methods.sort_by(|a, b| a.name.cmp(&b.name));
    let indent = indent(1);
    for m in methods {
        out.push(format!(
            "{indent}rpc {} ({}) returns ({});",
            m.name, m.input_type.name, m.output_type.name
        ));
    }

    out.push("}".to_string());
}

pub(crate) fn push_enum(out: &mut Vec<String>, desc: &EnumDescriptor, depth: usize) {
    out.push(format!("{}enum {} {{", indent(depth), desc.name));

    let mut values: Vec<&EnumValueDescriptor> = desc.values.iter().collect();
    values.sort_by_key(|v| v.number);
    let inner = indent(depth + 1);
    for v in values {
        out.push(format!("{inner}{} = {};", v.name, v.number));
    }

    out.push(format!("{}}}", indent(depth)));
}

pub(crate) fn push_message(
    out: &mut Vec<String>,
    msg: &MessageDescriptor,
    depth: usize,
) -> Result<(), CanonicalizeError> {
    out.push(format!("{}message {} {{", indent(depth), msg.name));

    let mut fields: Vec<&FieldDescriptor> = msg.fields.iter().collect();
    fields.sort_by_key(|f| f.index);
    let inner = indent(depth + 1);
    for f in fields {
        let label = label_keyword(msg, f)?;
        out.push(format!(
            "{inner}{label}{} {} = {};",
            type_name(&f.field_type),
            f.name,
            f.index
        ));
    }

    let mut nested: Vec<&MessageDescriptor> = msg.nested_messages.iter().collect();
    nested.sort_by(|a, b| a.name.cmp(&b.name));
    for n in nested {
        push_message(out, n, depth + 1)?;
    }

    let mut enums: Vec<&EnumDescriptor> = msg.nested_enums.iter().collect();
    enums.sort_by(|a, b| a.name.cmp(&b.name));
    for e in enums {
        push_enum(out, e, depth + 1);
    }

    if msg.direct_enum_values > 0 {
        return Err(CanonicalizeError::UnsupportedShape {
            message: msg.name.clone(),
            count: msg.direct_enum_values,
        });
    }

    out.push(format!("{}}}", indent(depth)));
    Ok(())
}

fn label_keyword(
    msg: &MessageDescriptor,
    field: &FieldDescriptor,
) -> Result<&'static str, CanonicalizeError> {
    match &field.label {
        FieldLabel::Optional => Ok(""),
        FieldLabel::Repeated => Ok("repeated "),
        FieldLabel::Required => Ok("required "),
        FieldLabel::Unrecognized(label) => Err(CanonicalizeError::UnknownFieldLabel {
            message: msg.name.clone(),
            field: field.name.clone(),
            label: label.clone(),
        }),
    }
}

fn type_name(field_type: &FieldType) -> &str {
    match field_type {
        FieldType::Message(r) | FieldType::Enum(r) => &r.name,
        FieldType::Scalar(kind) => kind.keyword(),
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(INDENT * depth)
}
