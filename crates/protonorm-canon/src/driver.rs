//! Whole-file canonicalization: services, then messages, then enums.

use std::io::Write;

use protonorm_descriptor::{
    EnumDescriptor, MessageDescriptor, SchemaFile, SchemaProvider, ServiceDescriptor,
};
use tracing::debug;

use crate::error::{CanonicalizeError, Error};
use crate::render::{push_enum, push_message, push_service};
use crate::stats::SchemaStats;

/// Canonical lines for a whole schema file, without line terminators.
pub fn canonical_lines(file: &SchemaFile) -> Result<Vec<String>, CanonicalizeError> {
    let stats = SchemaStats::collect(file);
    debug!(
        file = %file.name,
        services = stats.services,
        methods = stats.methods,
        messages = stats.messages,
        fields = stats.fields,
        enums = stats.enums,
        enum_values = stats.enum_values,
        "canonicalizing schema file"
    );

    let mut out = Vec::new();

    let mut services: Vec<&ServiceDescriptor> = file.services.values().collect();
    services.sort_by(|a, b| a.name.cmp(&b.name));
    for svc in services {
        push_service(&mut out, svc);
    }

    let mut messages: Vec<&MessageDescriptor> = file.messages.values().collect();
    messages.sort_by(|a, b| a.name.cmp(&b.name));
    for msg in messages {
        push_message(&mut out, msg, 0)?;
    }

    let mut enums: Vec<&EnumDescriptor> = file.enums.values().collect();
    enums.sort_by(|a, b| a.name.cmp(&b.name));
    for desc in enums {
        push_enum(&mut out, desc, 0);
    }

    Ok(out)
}

/// Canonical text: every line terminated by a single `\n`.
pub fn canonicalize(file: &SchemaFile) -> Result<String, CanonicalizeError> {
    let lines = canonical_lines(file)?;
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

/// Render `file` completely, then write it to `sink`. Nothing is written when
/// rendering fails.
pub fn write_canonical<W: Write>(file: &SchemaFile, sink: &mut W) -> Result<(), Error> {
    let text = canonicalize(file)?;
    sink.write_all(text.as_bytes())?;
    sink.flush()?;
    Ok(())
}

/// Load `module` through `provider` and canonicalize it.
pub fn canonicalize_module<P>(provider: &P, module: &str) -> Result<String, Error>
where
    P: SchemaProvider + ?Sized,
{
    let file = provider.load(module).map_err(|source| Error::ModuleLoad {
        module: module.to_string(),
        source,
    })?;
    Ok(canonicalize(&file)?)
}
