/// Core domain types for documented symbols, bindings, and diagnostics.
use std::fmt;

/// A documented function parameter. The description accumulates one entry
/// per continuation line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamInfo {
    /// Parameter name as written in the doc comment or source.
    pub name: String,
    /// Type expression, empty when unresolved.
    pub ty: String,
    /// Description lines in declaration order.
    pub description: Vec<String>,
}

/// A documented return value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnInfo {
    /// Type expression, empty when unresolved.
    pub ty: String,
    /// Description lines in declaration order.
    pub description: Vec<String>,
}

/// A documented error a function can raise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Error type expression.
    pub ty: String,
    /// Description lines in declaration order.
    pub description: Vec<String>,
}

/// A named field of an interface or record-shape type alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Type expression, empty when unresolved.
    pub ty: String,
    /// Joined description text.
    pub description: String,
    /// One-based source line, 0 when the field came from a doc tag.
    pub line: u32,
    /// One-based source column.
    pub column: u32,
}

/// The kind of a resolved symbol. Determines which `SymbolTypes` variant
/// the symbol carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Constructor,
    Field,
    Function,
    Interface,
    Property,
    TypeAlias,
}

impl SymbolKind {
    /// The catalog string for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Field => "field",
            SymbolKind::Function => "function",
            SymbolKind::Interface => "interface",
            SymbolKind::Property => "property",
            SymbolKind::TypeAlias => "type",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type information merged from doc tags, binding syntax, and the type
/// oracle. One variant per symbol kind so fields irrelevant to a kind
/// cannot be populated by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolTypes {
    /// Signature of a function or constructor.
    Function {
        /// Rendered signature string.
        display: String,
        /// Merged parameter list in declaration order.
        params: Vec<ParamInfo>,
        /// Merged return list in declaration order.
        returns: Vec<ReturnInfo>,
        /// Documented errors in declaration order.
        errors: Vec<ErrorInfo>,
        /// Whether the function yields.
        yields: bool,
    },
    /// Type of a property member.
    Property {
        /// Type expression, empty when unresolved.
        ty: String,
        /// Whether `@readonly` was declared.
        readonly: bool,
    },
    /// Fields of a doc-declared interface.
    Interface {
        /// Documented fields in declaration order.
        fields: Vec<FieldInfo>,
    },
    /// Value of a type alias.
    TypeAlias {
        /// Aliased type expression, empty when unresolved.
        value: String,
    },
    /// A class carries only its optional `__index` override.
    Class {
        /// Index metafield name override, empty when absent.
        index_name: String,
    },
    /// Type of a synthetic field symbol.
    Field {
        /// Type expression, empty when unresolved.
        ty: String,
    },
}

impl SymbolTypes {
    /// The rendered type display string, empty for kinds without one.
    pub fn display(&self) -> &str {
        match self {
            SymbolTypes::Function { display, .. } => display,
            SymbolTypes::Property { ty, .. }
            | SymbolTypes::TypeAlias { value: ty }
            | SymbolTypes::Field { ty } => ty,
            SymbolTypes::Interface { .. } | SymbolTypes::Class { .. } => "",
        }
    }
}

/// A scalar tag attached to a symbol, carried through to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// `@alias name`.
    Alias(String),
    /// `@category name`.
    Category(String),
    /// `@deprecated version -- replacement advice`.
    Deprecated {
        /// Version in which the symbol was deprecated.
        version: String,
        /// Replacement advice, empty when absent.
        description: String,
    },
    /// `@event`.
    Event,
    /// `@extends Base`.
    Extends(String),
    /// `@external name url` pair.
    External {
        /// External symbol name.
        name: String,
        /// Link target.
        value: String,
    },
    /// `@include path`.
    Include(String),
    /// `@inheritDoc Qualified.name`.
    InheritDoc(String),
    /// `@server`, `@client`, or `@plugin`.
    Realm(String),
    /// `@since version`.
    Since(String),
    /// `@snippet path`.
    Snippet(String),
    /// Free-form `@tag name`.
    Tag(String),
    /// `@unreleased`.
    Unreleased,
}

impl TagValue {
    /// The inherit-doc target, if this tag is a non-empty `@inheritDoc`.
    pub fn inherit_target(&self) -> Option<&str> {
        match self {
            TagValue::InheritDoc(target) if !target.is_empty() => Some(target),
            _ => None,
        }
    }
}

/// Symbol visibility in the catalog. Defaults to public; `@private` and
/// `@ignore` override it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Ignored,
}

impl Visibility {
    /// The catalog string for this visibility.
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Ignored => "ignored",
        }
    }
}

/// A fully resolved documented symbol. Immutable once its module's symbol
/// list is finalized; only the merge step and the inherit-doc pass write
/// to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol kind.
    pub kind: SymbolKind,
    /// Bare name without the owning scope.
    pub name: String,
    /// `owner.name` for plain members, `owner:name` for methods,
    /// bare name when unowned.
    pub qualified_name: String,
    /// Root-relative source path.
    pub file: String,
    /// One-based line of the governing declaration (or doc block).
    pub line: u32,
    /// One-based column of the first non-whitespace character.
    pub column: u32,
    /// First non-blank description line.
    pub summary: String,
    /// Full description joined as markdown.
    pub description_markdown: String,
    /// Scalar tags in declaration order.
    pub tags: Vec<TagValue>,
    /// Merged type information.
    pub types: SymbolTypes,
    /// Catalog visibility.
    pub visibility: Visibility,
}

/// The kind of a syntactic declaration found by the binding scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Class,
    Function,
    Property,
    TypeAlias,
}

impl BindingKind {
    /// Whether this binding kind corresponds to the given symbol kind for
    /// the purpose of owner inheritance.
    pub fn matches(self, kind: SymbolKind) -> bool {
        matches!(
            (self, kind),
            (BindingKind::Class, SymbolKind::Class)
                | (BindingKind::Function, SymbolKind::Function)
                | (BindingKind::Function, SymbolKind::Constructor)
                | (BindingKind::Property, SymbolKind::Property)
                | (BindingKind::TypeAlias, SymbolKind::TypeAlias)
        )
    }
}

/// A syntactic declaration: name, kind, owner, parameter list, and source
/// location. Produced by the binding scanner, ordered by line ascending.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Declaration kind.
    pub kind: BindingKind,
    /// Declared name.
    pub name: String,
    /// Detected owner expression, empty when the declaration is unowned.
    pub within: String,
    /// Whether the declaration is method-style (`:` or explicit `self`).
    pub is_method: bool,
    /// Parameters with any syntactic type annotations.
    pub params: Vec<ParamInfo>,
    /// Syntactic return annotation, empty when absent.
    pub return_type: String,
    /// One-based declaration line.
    pub line: u32,
    /// Fields of an inline record shape (type aliases only).
    pub record_fields: Vec<FieldInfo>,
    /// Inclusive line span of the inline record body, when present.
    pub record_span: Option<(u32, u32)>,
}

impl Binding {
    /// A binding with the given kind, name, and line; everything else empty.
    pub fn new(kind: BindingKind, name: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            within: String::new(),
            is_method: false,
            params: Vec::new(),
            return_type: String::new(),
            line,
            record_fields: Vec::new(),
            record_span: None,
        }
    }
}

/// Diagnostic severity. Errors mark files missing required context;
/// warnings mark recoverable inconsistencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// The lowercase label used in the catalog and when printing.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A non-fatal problem raised during resolution. Collected per module and
/// surfaced to the caller, which decides the exit policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic severity.
    pub level: Severity,
    /// Root-relative source path.
    pub file: String,
    /// One-based line the diagnostic refers to.
    pub line: u32,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Build a warning diagnostic.
    pub fn warning(file: &str, line: u32, message: impl Into<String>) -> Self {
        Self {
            level: Severity::Warning,
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }

    /// Build an error diagnostic.
    pub fn error(file: &str, line: u32, message: impl Into<String>) -> Self {
        Self {
            level: Severity::Error,
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}
