//! Catalog assembly and serialization: the versioned JSON document that
//! downstream tooling consumes.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::{Symbol, SymbolTypes, TagValue};

/// Bumped only when the catalog document shape changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// One scanned source file and the symbols resolved from it.
#[derive(Debug, Clone)]
pub struct Module {
    /// Stable module id, derived from the path unless overridden.
    pub id: String,
    /// Root-relative source path with forward slashes.
    pub path: String,
    /// Hex SHA-256 of the file's raw content.
    pub source_hash: String,
    /// Resolved symbols in source order.
    pub symbols: Vec<Symbol>,
}

/// Derive a module id from a root-relative path: extension dropped,
/// separators normalized to forward slashes.
pub fn module_id(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");
    match normalized.rfind('.') {
        Some(pos) if !normalized[pos + 1..].contains('/') => normalized[..pos].to_string(),
        _ => normalized,
    }
}

/// Hash a file's raw content for change detection.
pub fn source_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogJson {
    schema_version: u32,
    generator_version: &'static str,
    modules: Vec<ModuleJson>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModuleJson {
    id: String,
    path: String,
    source_hash: String,
    symbols: Vec<SymbolJson>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SymbolJson {
    kind: &'static str,
    name: String,
    qualified_name: String,
    location: LocationJson,
    docs: DocsJson,
    types: TypesJson,
    visibility: &'static str,
}

#[derive(Debug, Serialize)]
struct LocationJson {
    file: String,
    line: u32,
    column: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocsJson {
    summary: String,
    description_markdown: String,
    tags: Vec<TagJson>,
    examples: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TagJson {
    name: &'static str,
    value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypesJson {
    display: Option<String>,
    structured: StructuredJson,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind")]
enum StructuredJson {
    #[serde(rename = "function")]
    Function {
        params: Vec<ParamJson>,
        returns: Vec<ValueJson>,
        errors: Vec<ValueJson>,
        yields: bool,
    },
    #[serde(rename = "property")]
    Property {
        #[serde(rename = "type")]
        ty: Option<String>,
        readonly: bool,
    },
    #[serde(rename = "interface")]
    Interface { fields: Vec<ParamJson> },
    #[serde(rename = "type")]
    TypeAlias { value: Option<String> },
    #[serde(rename = "class")]
    Class {
        #[serde(rename = "indexName")]
        index_name: Option<String>,
    },
    #[serde(rename = "field")]
    Field {
        #[serde(rename = "type")]
        ty: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct ParamJson {
    name: String,
    #[serde(rename = "type")]
    ty: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct ValueJson {
    #[serde(rename = "type")]
    ty: Option<String>,
    description: Option<String>,
}

/// Assemble the serializable catalog document from resolved modules.
pub fn build_catalog(modules: Vec<Module>) -> CatalogJson {
    CatalogJson {
        schema_version: SCHEMA_VERSION,
        generator_version: env!("CARGO_PKG_VERSION"),
        modules: modules.into_iter().map(module_json).collect(),
    }
}

fn module_json(module: Module) -> ModuleJson {
    ModuleJson {
        id: module.id,
        path: module.path,
        source_hash: module.source_hash,
        symbols: module.symbols.into_iter().map(symbol_json).collect(),
    }
}

fn symbol_json(symbol: Symbol) -> SymbolJson {
    let types = types_json(&symbol.types);
    SymbolJson {
        kind: symbol.kind.as_str(),
        name: symbol.name,
        qualified_name: symbol.qualified_name,
        location: LocationJson {
            file: symbol.file,
            line: symbol.line,
            column: symbol.column,
        },
        docs: DocsJson {
            summary: symbol.summary,
            description_markdown: symbol.description_markdown,
            tags: symbol.tags.iter().map(tag_json).collect(),
            examples: Vec::new(),
        },
        types,
        visibility: symbol.visibility.as_str(),
    }
}

fn tag_json(tag: &TagValue) -> TagJson {
    let (name, value, description) = match tag {
        TagValue::Alias(v) => ("alias", text(v), None),
        TagValue::Category(v) => ("category", text(v), None),
        TagValue::Deprecated {
            version,
            description,
        } => ("deprecated", text(version), opt(description)),
        TagValue::Event => ("event", serde_json::Value::Bool(true), None),
        TagValue::Extends(v) => ("extends", text(v), None),
        TagValue::External { name, value } => ("external", text(name), Some(value.clone())),
        TagValue::Include(v) => ("include", text(v), None),
        TagValue::InheritDoc(v) => ("inheritDoc", text(v), None),
        TagValue::Realm(v) => ("realm", text(v), None),
        TagValue::Since(v) => ("since", text(v), None),
        TagValue::Snippet(v) => ("snippet", text(v), None),
        TagValue::Tag(v) => ("tag", text(v), None),
        TagValue::Unreleased => ("unreleased", serde_json::Value::Bool(true), None),
    };
    TagJson {
        name,
        value,
        description,
    }
}

fn types_json(types: &SymbolTypes) -> TypesJson {
    let structured = match types {
        SymbolTypes::Function {
            params,
            returns,
            errors,
            yields,
            ..
        } => StructuredJson::Function {
            params: params
                .iter()
                .map(|p| ParamJson {
                    name: p.name.clone(),
                    ty: opt(&p.ty),
                    description: join_opt(&p.description),
                })
                .collect(),
            returns: returns
                .iter()
                .map(|r| ValueJson {
                    ty: opt(&r.ty),
                    description: join_opt(&r.description),
                })
                .collect(),
            errors: errors
                .iter()
                .map(|e| ValueJson {
                    ty: opt(&e.ty),
                    description: join_opt(&e.description),
                })
                .collect(),
            yields: *yields,
        },
        SymbolTypes::Property { ty, readonly } => StructuredJson::Property {
            ty: opt(ty),
            readonly: *readonly,
        },
        SymbolTypes::Interface { fields } => StructuredJson::Interface {
            fields: fields
                .iter()
                .map(|f| ParamJson {
                    name: f.name.clone(),
                    ty: opt(&f.ty),
                    description: opt(&f.description),
                })
                .collect(),
        },
        SymbolTypes::TypeAlias { value } => StructuredJson::TypeAlias { value: opt(value) },
        SymbolTypes::Class { index_name } => StructuredJson::Class {
            index_name: opt(index_name),
        },
        SymbolTypes::Field { ty } => StructuredJson::Field { ty: opt(ty) },
    };

    TypesJson {
        display: opt(types.display()),
        structured,
    }
}

fn text(value: &str) -> serde_json::Value {
    serde_json::Value::String(value.to_string())
}

/// Empty strings serialize as `null` so consumers can tell "absent" from
/// "documented as empty".
fn opt(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn join_opt(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
