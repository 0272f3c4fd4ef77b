//! Symbol resolution: pairs parsed doc blocks with scanned bindings,
//! settles ownership, merges type information from tags, declaration
//! syntax, and the type oracle, and emits the module's symbol list.

use crate::extractor::DocBlock;
use crate::oracle::{RenderedType, TypeOracle};
use crate::tags::{self, ParsedDoc, SELF_OWNER, TypeTag, TypeTagKind};
use crate::types::{
    Binding, BindingKind, Diagnostic, ParamInfo, ReturnInfo, Symbol, SymbolKind, SymbolTypes,
    TagValue,
};

const MSG_CLASS_MISSING: &str = "@class missing for this file.";
const MSG_WITHIN_AMBIGUOUS: &str = "@within missing for ambiguous class ownership.";
const MSG_PARAM_DRIFT: &str = "@param does not match function parameters.";
const MSG_READONLY_MISUSE: &str = "@readonly used on non-property symbol.";

/// Resolve all doc blocks of one file into symbols. Problems that do not
/// prevent emission are appended to `diagnostics`.
pub fn build_symbols(
    blocks: &[DocBlock],
    file_bindings: &[Binding],
    source_lines: &[String],
    relative_path: &str,
    oracle: &dyn TypeOracle,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Symbol> {
    let parsed: Vec<(&DocBlock, ParsedDoc)> = blocks
        .iter()
        .filter(|block| !inside_record_span(file_bindings, block.start_line))
        .map(|block| (block, tags::parse_doc_block(&block.content_lines)))
        .collect();

    let file_has_class = parsed
        .iter()
        .filter_map(|(_, doc)| doc.type_tags.first())
        .any(|tag| tag.kind == TypeTagKind::Class);

    // Forward-only class accumulator: a block can only default its owner
    // to a class declared earlier in the file.
    let mut seen_classes: Vec<String> = Vec::new();
    let mut symbols = Vec::new();
    for (block, doc) in &parsed {
        if let Some(tag) = doc.type_tags.first() {
            if tag.kind == TypeTagKind::Class && !tag.name.is_empty() {
                seen_classes.push(tag.name.clone());
            }
        }
        build_symbol(
            block,
            doc,
            file_bindings,
            source_lines,
            relative_path,
            &seen_classes,
            file_has_class,
            oracle,
            diagnostics,
            &mut symbols,
        );
    }
    symbols
}

/// Whether a line falls inside the body of some inline record shape. Doc
/// blocks there document fields, not standalone symbols.
fn inside_record_span(file_bindings: &[Binding], line: u32) -> bool {
    file_bindings.iter().any(|b| {
        b.record_span
            .is_some_and(|(start, end)| line > start && line <= end)
    })
}

/// The first binding declared after a block ends.
fn following_binding(file_bindings: &[Binding], end_line: u32) -> Option<&Binding> {
    file_bindings.iter().find(|b| b.line > end_line)
}

#[allow(clippy::too_many_arguments, reason = "threads per-file resolution context")]
fn build_symbol(
    block: &DocBlock,
    doc: &ParsedDoc,
    file_bindings: &[Binding],
    source_lines: &[String],
    relative_path: &str,
    seen_classes: &[String],
    file_has_class: bool,
    oracle: &dyn TypeOracle,
    diagnostics: &mut Vec<Diagnostic>,
    symbols: &mut Vec<Symbol>,
) {
    let candidate = following_binding(file_bindings, block.end_line);

    let Some(mut head) = symbol_head(doc.type_tags.first(), candidate) else {
        return;
    };

    // The binding informs location, owner, and parameters when it declares
    // the same kind of thing; on a kind mismatch the doc tag stands alone.
    let binding = candidate.filter(|b| b.kind.matches(head.kind));

    let within = resolve_within(
        &head,
        doc,
        binding,
        seen_classes,
        file_has_class,
        relative_path,
        block.start_line,
        diagnostics,
    );

    // Conventionally-named constructors: plain owned functions called
    // `new` document construction, not a method.
    if head.kind == SymbolKind::Function
        && head.name == "new"
        && !head.is_method
        && !within.is_empty()
    {
        head.kind = SymbolKind::Constructor;
    }

    let line = binding.map_or(block.start_line, |b| b.line);
    let types = merge_types(
        &head,
        doc,
        binding,
        &within,
        relative_path,
        block.start_line,
        oracle,
        diagnostics,
    );

    if doc.state.readonly && !matches!(head.kind, SymbolKind::Property) {
        diagnostics.push(Diagnostic::warning(
            relative_path,
            block.start_line,
            MSG_READONLY_MISUSE,
        ));
    }

    let description_markdown = join_description(&doc.description_lines);
    symbols.push(Symbol {
        kind: head.kind,
        name: head.name.clone(),
        qualified_name: qualify(&within, &head.name, head.is_method),
        file: relative_path.to_string(),
        line,
        column: column_at(source_lines, line),
        summary: summary_of(&description_markdown),
        description_markdown,
        tags: collect_tags(doc),
        types,
        visibility: doc.state.visibility,
    });

    emit_sibling_symbols(doc, &head, &within, relative_path, block.start_line, symbols);

    match head.kind {
        SymbolKind::TypeAlias => {
            if let Some(b) = binding {
                if doc.fields.is_empty() {
                    emit_record_field_symbols(b, &head.name, relative_path, symbols);
                }
            }
        }
        SymbolKind::Interface => {
            emit_doc_field_symbols(doc, &head.name, relative_path, block.start_line, symbols);
        }
        _ => {}
    }
}

/// Later type tags in one block declare sibling property symbols owned by
/// the primary symbol when it is a class, otherwise by the same owner.
fn emit_sibling_symbols(
    doc: &ParsedDoc,
    head: &SymbolHead,
    within: &str,
    relative_path: &str,
    block_line: u32,
    symbols: &mut Vec<Symbol>,
) {
    let owner = if head.kind == SymbolKind::Class {
        &head.name
    } else {
        within
    };

    for tag in doc.type_tags.iter().skip(1) {
        if tag.kind != TypeTagKind::Property || tag.name.is_empty() {
            continue;
        }
        symbols.push(Symbol {
            kind: SymbolKind::Property,
            name: tag.name.clone(),
            qualified_name: qualify(owner, &tag.name, false),
            file: relative_path.to_string(),
            line: block_line,
            column: 1,
            summary: String::new(),
            description_markdown: String::new(),
            tags: Vec::new(),
            types: SymbolTypes::Property {
                ty: tag.ty.clone(),
                readonly: false,
            },
            visibility: doc.state.visibility,
        });
    }
}

/// What kind of symbol a block declares, and under what name. The first
/// type tag governs; without one the following binding does.
struct SymbolHead {
    kind: SymbolKind,
    name: String,
    is_method: bool,
    declared_ty: String,
}

fn symbol_head(tag: Option<&TypeTag>, binding: Option<&Binding>) -> Option<SymbolHead> {
    let mut head = match tag {
        Some(tag) => SymbolHead {
            kind: match tag.kind {
                TypeTagKind::Class => SymbolKind::Class,
                TypeTagKind::Constructor => SymbolKind::Constructor,
                TypeTagKind::Function => SymbolKind::Function,
                TypeTagKind::Interface => SymbolKind::Interface,
                TypeTagKind::Property => SymbolKind::Property,
                TypeTagKind::Type => SymbolKind::TypeAlias,
            },
            name: tag.name.clone(),
            is_method: tag.is_method,
            declared_ty: tag.ty.clone(),
        },
        None => {
            let binding = binding?;
            SymbolHead {
                kind: match binding.kind {
                    BindingKind::Class => SymbolKind::Class,
                    BindingKind::Function => SymbolKind::Function,
                    BindingKind::Property => SymbolKind::Property,
                    BindingKind::TypeAlias => SymbolKind::TypeAlias,
                },
                name: binding.name.clone(),
                is_method: binding.is_method,
                declared_ty: String::new(),
            }
        }
    };

    if head.name.is_empty() {
        head.name = binding?.name.clone();
    }
    Some(head)
}

/// Settle the owning scope for a symbol. An explicit `@within` wins and
/// the `~` placeholder resolves to the most recently declared class; the
/// absent case falls back to the binding's owner. Member kinds (function,
/// property, constructor) additionally default to the sole class declared
/// so far, and raise a diagnostic when left unowned: an error when the
/// file has no documented class at all, a warning when ownership is
/// merely ambiguous. Other kinds stay unowned.
#[allow(clippy::too_many_arguments, reason = "threads per-file resolution context")]
fn resolve_within(
    head: &SymbolHead,
    doc: &ParsedDoc,
    binding: Option<&Binding>,
    seen_classes: &[String],
    file_has_class: bool,
    relative_path: &str,
    block_line: u32,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    if head.kind == SymbolKind::Class {
        return String::new();
    }

    let declared = doc.state.within.as_str();
    if declared == SELF_OWNER {
        if let Some(current) = seen_classes.last() {
            return current.clone();
        }
    } else if !declared.is_empty() {
        return declared.to_string();
    }

    if let Some(owner) = binding.map(|b| b.within.as_str()).filter(|w| !w.is_empty()) {
        return owner.to_string();
    }

    let needs_owner = matches!(
        head.kind,
        SymbolKind::Constructor | SymbolKind::Function | SymbolKind::Property
    );
    if needs_owner {
        if let [sole] = seen_classes {
            return sole.clone();
        }
    }
    if needs_owner || declared == SELF_OWNER {
        if file_has_class {
            diagnostics.push(Diagnostic::warning(
                relative_path,
                block_line,
                MSG_WITHIN_AMBIGUOUS,
            ));
        } else {
            diagnostics.push(Diagnostic::error(
                relative_path,
                block_line,
                MSG_CLASS_MISSING,
            ));
        }
    }
    String::new()
}

fn qualify(within: &str, name: &str, is_method: bool) -> String {
    if within.is_empty() {
        name.to_string()
    } else if is_method {
        format!("{within}:{name}")
    } else {
        format!("{within}.{name}")
    }
}

/// Build the kind-specific type information, merging the three sources in
/// priority order: doc tags, declaration syntax, oracle.
#[allow(clippy::too_many_arguments, reason = "threads per-file resolution context")]
fn merge_types(
    head: &SymbolHead,
    doc: &ParsedDoc,
    binding: Option<&Binding>,
    within: &str,
    relative_path: &str,
    block_line: u32,
    oracle: &dyn TypeOracle,
    diagnostics: &mut Vec<Diagnostic>,
) -> SymbolTypes {
    let owner_path: Vec<String> = if within.is_empty() {
        Vec::new()
    } else {
        within.split('.').map(String::from).collect()
    };
    let rendered = oracle.resolve(&owner_path, &head.name, head.is_method);

    match head.kind {
        SymbolKind::Class => SymbolTypes::Class {
            index_name: doc.state.index_name.clone(),
        },
        SymbolKind::Interface => SymbolTypes::Interface {
            fields: doc.fields.clone(),
        },
        SymbolKind::TypeAlias => {
            let mut value = head.declared_ty.clone();
            if value.is_empty() {
                value = rendered.map(|r| r.display).unwrap_or_default();
            }
            SymbolTypes::TypeAlias { value }
        }
        SymbolKind::Property => {
            let mut ty = head.declared_ty.clone();
            if ty.is_empty() {
                ty = rendered.map(|r| r.display).unwrap_or_default();
            }
            SymbolTypes::Property {
                ty,
                readonly: doc.state.readonly,
            }
        }
        // Fields are only ever synthesized for record and interface
        // members, but a head of this kind still carries its type.
        SymbolKind::Field => SymbolTypes::Field {
            ty: head.declared_ty.clone(),
        },
        SymbolKind::Constructor | SymbolKind::Function => {
            merge_function(doc, binding, rendered, relative_path, block_line, diagnostics)
        }
    }
}

/// Merge a function's parameters and returns. For each slot the doc tag
/// wins, then the declaration annotation matched by name, then the oracle
/// by name, then the oracle by position.
fn merge_function(
    doc: &ParsedDoc,
    binding: Option<&Binding>,
    rendered: Option<RenderedType>,
    relative_path: &str,
    block_line: u32,
    diagnostics: &mut Vec<Diagnostic>,
) -> SymbolTypes {
    let declared = binding.map_or(&[][..], |b| visible_params(b));
    let rendered_display = rendered
        .as_ref()
        .map(|r| r.display.clone())
        .unwrap_or_default();
    let signature = rendered.and_then(|r| r.function).unwrap_or_default();

    let mut params: Vec<ParamInfo> = if doc.params.is_empty() {
        if declared.is_empty() {
            signature
                .params
                .iter()
                .map(|p| ParamInfo {
                    name: p.name.clone(),
                    ty: p.ty.clone(),
                    description: Vec::new(),
                })
                .collect()
        } else {
            declared.to_vec()
        }
    } else {
        doc.params.clone()
    };

    for (index, param) in params.iter_mut().enumerate() {
        if !param.ty.is_empty() {
            continue;
        }
        if let Some(ty) = declared
            .iter()
            .find(|p| p.name == param.name && !p.ty.is_empty())
            .map(|p| p.ty.clone())
        {
            param.ty = ty;
        } else if let Some(ty) = signature.param_type_for(&param.name) {
            param.ty = ty.to_string();
        } else if let Some(ty) = signature.params.get(index).map(|p| p.ty.clone()) {
            param.ty = ty;
        }
    }

    if let Some(b) = binding {
        if params_drift(&doc.params, visible_params(b)) {
            diagnostics.push(Diagnostic::warning(
                relative_path,
                block_line,
                MSG_PARAM_DRIFT,
            ));
        }
    }

    // Returns: documented entries first (the oracle only fills their empty
    // type slots by position), else the oracle's full return list, else
    // the declaration's syntactic annotation.
    let declared_return = binding.map_or("", |b| b.return_type.as_str());
    let mut returns: Vec<ReturnInfo> = if !doc.returns.is_empty() {
        let mut returns = doc.returns.clone();
        for (index, ret) in returns.iter_mut().enumerate() {
            if ret.ty.is_empty() {
                if let Some(ty) = signature.returns.get(index) {
                    ret.ty = ty.clone();
                }
            }
        }
        returns
    } else if !signature.returns.is_empty() {
        signature
            .returns
            .iter()
            .map(|ty| ReturnInfo {
                ty: ty.clone(),
                description: Vec::new(),
            })
            .collect()
    } else if !declared_return.is_empty() {
        vec![ReturnInfo {
            ty: declared_return.to_string(),
            description: Vec::new(),
        }]
    } else {
        Vec::new()
    };
    if let Some(first) = returns.first_mut() {
        if first.ty.is_empty() && !declared_return.is_empty() {
            first.ty = declared_return.to_string();
        }
    }

    let display = if rendered_display.is_empty() {
        function_display(&params, &returns)
    } else {
        rendered_display
    };
    SymbolTypes::Function {
        display,
        params,
        returns,
        errors: doc.errors.clone(),
        yields: doc.state.yields,
    }
}

/// A binding's parameters as documentable slots: a leading `self` is the
/// receiver, not a parameter.
fn visible_params(binding: &Binding) -> &[ParamInfo] {
    match binding.params.first() {
        Some(first) if first.name == "self" => &binding.params[1..],
        _ => &binding.params,
    }
}

/// Whether documented parameters disagree with declared ones, compared as
/// name sets in both directions. Only flagged once at least one documented
/// type is explicit and not `any`, so purely descriptive docs never warn.
fn params_drift(doc_params: &[ParamInfo], declared: &[ParamInfo]) -> bool {
    if doc_params.is_empty() || declared.is_empty() {
        return false;
    }
    if !doc_params.iter().any(|p| !p.ty.is_empty() && p.ty != "any") {
        return false;
    }
    let documented_names: Vec<&str> = doc_params.iter().map(|p| p.name.as_str()).collect();
    let declared_names: Vec<&str> = declared.iter().map(|p| p.name.as_str()).collect();
    documented_names
        .iter()
        .any(|name| !declared_names.contains(name))
        || declared_names
            .iter()
            .any(|name| !documented_names.contains(name))
}

/// Render `(a: T, b: U) -> R, S`. Unknown types display as `any`; the
/// arrow is omitted when nothing is returned.
fn function_display(params: &[ParamInfo], returns: &[ReturnInfo]) -> String {
    let param_list: Vec<String> = params
        .iter()
        .map(|p| format!("{}: {}", p.name, display_ty(&p.ty)))
        .collect();
    let mut display = format!("({})", param_list.join(", "));

    if !returns.is_empty() {
        let list: Vec<&str> = returns.iter().map(|r| display_ty(&r.ty)).collect();
        display.push_str(" -> ");
        display.push_str(&list.join(", "));
    }
    display
}

fn display_ty(ty: &str) -> &str {
    if ty.is_empty() { "any" } else { ty }
}

/// Emit one field symbol per inline record field of a documented type
/// alias.
fn emit_record_field_symbols(
    binding: &Binding,
    alias_name: &str,
    relative_path: &str,
    symbols: &mut Vec<Symbol>,
) {
    for field in &binding.record_fields {
        symbols.push(field_symbol(
            field.name.clone(),
            alias_name,
            relative_path,
            field.line,
            field.column,
            &field.description,
            field.ty.clone(),
        ));
    }
}

/// Emit one field symbol per documented `@field` / shorthand field of an
/// interface block.
fn emit_doc_field_symbols(
    doc: &ParsedDoc,
    owner: &str,
    relative_path: &str,
    block_line: u32,
    symbols: &mut Vec<Symbol>,
) {
    for field in &doc.fields {
        symbols.push(field_symbol(
            field.name.clone(),
            owner,
            relative_path,
            block_line,
            1,
            &field.description,
            field.ty.clone(),
        ));
    }
}

fn field_symbol(
    name: String,
    owner: &str,
    relative_path: &str,
    line: u32,
    column: u32,
    description: &str,
    ty: String,
) -> Symbol {
    Symbol {
        kind: SymbolKind::Field,
        name: name.clone(),
        qualified_name: format!("{owner}.{name}"),
        file: relative_path.to_string(),
        line,
        column,
        summary: summary_of(description),
        description_markdown: description.to_string(),
        tags: Vec::new(),
        types: SymbolTypes::Field { ty },
        visibility: crate::types::Visibility::Public,
    }
}

/// Assemble catalog tags in a stable order.
fn collect_tags(doc: &ParsedDoc) -> Vec<TagValue> {
    let state = &doc.state;
    let mut out = Vec::new();

    out.extend(state.tags.iter().cloned().map(TagValue::Tag));
    out.extend(state.categories.iter().cloned().map(TagValue::Category));
    if !state.since.is_empty() {
        out.push(TagValue::Since(state.since.clone()));
    }
    if state.unreleased {
        out.push(TagValue::Unreleased);
    }
    if state.event {
        out.push(TagValue::Event);
    }
    out.extend(state.extends.iter().cloned().map(TagValue::Extends));
    if !state.deprecated_version.is_empty() || !state.deprecated_description.is_empty() {
        out.push(TagValue::Deprecated {
            version: state.deprecated_version.clone(),
            description: state.deprecated_description.clone(),
        });
    }
    out.extend(state.realms.iter().cloned().map(TagValue::Realm));
    out.extend(
        doc.externals
            .iter()
            .cloned()
            .map(|(name, value)| TagValue::External { name, value }),
    );
    out.extend(state.aliases.iter().cloned().map(TagValue::Alias));
    out.extend(state.includes.iter().cloned().map(TagValue::Include));
    out.extend(state.snippets.iter().cloned().map(TagValue::Snippet));
    if !state.inherit_doc.is_empty() {
        out.push(TagValue::InheritDoc(state.inherit_doc.clone()));
    }
    out
}

/// Join description lines into markdown: leading blank lines dropped,
/// trailing whitespace trimmed.
pub fn join_description(lines: &[String]) -> String {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    lines[start..]
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// The first non-blank description line, trimmed.
pub fn summary_of(description: &str) -> String {
    description
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
        .unwrap_or_default()
}

/// One-based column of the first non-whitespace character on a line.
fn column_at(source_lines: &[String], line: u32) -> u32 {
    source_lines
        .get(line as usize - 1)
        .and_then(|l| l.find(|c: char| !c.is_whitespace()))
        .map_or(1, |pos| u32::try_from(pos + 1).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::collect_bindings;
    use crate::extractor::extract_doc_blocks;
    use crate::oracle::{FunctionSignature, NoOracle, OracleParam};
    use crate::types::Severity;

    /// Oracle with one canned answer, keyed by member name.
    struct StaticOracle {
        member: &'static str,
        rendered: RenderedType,
    }

    impl TypeOracle for StaticOracle {
        fn resolve(&self, _: &[String], member: &str, _: bool) -> Option<RenderedType> {
            (member == self.member).then(|| self.rendered.clone())
        }
    }

    fn resolve(source: &str) -> (Vec<Symbol>, Vec<Diagnostic>) {
        resolve_with(source, &NoOracle)
    }

    fn resolve_with(source: &str, oracle: &dyn TypeOracle) -> (Vec<Symbol>, Vec<Diagnostic>) {
        let lines: Vec<String> = source.lines().map(String::from).collect();
        let blocks = extract_doc_blocks(&lines);
        let file_bindings = collect_bindings(&lines);
        let mut diagnostics = Vec::new();
        let symbols = build_symbols(
            &blocks,
            &file_bindings,
            &lines,
            "init.luau",
            oracle,
            &mut diagnostics,
        );
        (symbols, diagnostics)
    }

    #[test]
    fn class_and_method_resolve_from_bindings() {
        let source = "\
--- A widget.
--- @class Widget
local Widget = {}

--- Resize the widget.
function Widget:resize(width: number)
end
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols.len(), 2);

        assert_eq!(symbols[0].kind, SymbolKind::Class);
        assert_eq!(symbols[0].qualified_name, "Widget");
        assert_eq!(symbols[0].line, 3);
        assert_eq!(symbols[0].summary, "A widget.");

        assert_eq!(symbols[1].kind, SymbolKind::Function);
        assert_eq!(symbols[1].qualified_name, "Widget:resize");
        let SymbolTypes::Function {
            display, params, ..
        } = &symbols[1].types
        else {
            panic!("expected function types");
        };
        assert_eq!(params[0].ty, "number");
        assert_eq!(display, "(width: number)");
    }

    #[test]
    fn new_function_becomes_constructor() {
        let source = "\
--- @class Widget
local Widget = {}

--- Make one.
function Widget.new(name: string): Widget
end
";
        let (symbols, _) = resolve(source);
        assert_eq!(symbols[1].kind, SymbolKind::Constructor);
        assert_eq!(symbols[1].qualified_name, "Widget.new");
        let SymbolTypes::Function { display, .. } = &symbols[1].types else {
            panic!("expected function types");
        };
        assert_eq!(display, "(name: string) -> Widget");
    }

    #[test]
    fn sole_class_owns_unprefixed_members() {
        let source = "\
--- @class Widget
local Widget = {}

--- @prop size number
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols[1].qualified_name, "Widget.size");
    }

    #[test]
    fn type_declarations_stay_unowned_in_a_one_class_file() {
        let source = "\
--- @class Widget
local Widget = {}

--- @type Id string

--- @interface Options
--- .width number
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols[1].qualified_name, "Id");
        assert_eq!(symbols[2].qualified_name, "Options");
        assert_eq!(symbols[3].qualified_name, "Options.width");
    }

    #[test]
    fn field_head_carries_its_declared_type() {
        let head = SymbolHead {
            kind: SymbolKind::Field,
            name: "x".to_string(),
            is_method: false,
            declared_ty: "number".to_string(),
        };
        let doc = tags::parse_doc_block(&[]);
        let mut diagnostics = Vec::new();
        let types = merge_types(
            &head,
            &doc,
            None,
            "",
            "init.luau",
            1,
            &NoOracle,
            &mut diagnostics,
        );
        assert_eq!(
            types,
            SymbolTypes::Field {
                ty: "number".to_string(),
            }
        );
    }

    #[test]
    fn ambiguous_ownership_warns() {
        let source = "\
--- @class A
local A = {}

--- @class B
local B = {}

--- @function orphan
";
        let (symbols, diagnostics) = resolve(source);
        assert_eq!(symbols[2].qualified_name, "orphan");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, Severity::Warning);
        assert_eq!(diagnostics[0].message, MSG_WITHIN_AMBIGUOUS);
    }

    #[test]
    fn missing_class_is_an_error() {
        let (symbols, diagnostics) = resolve("--- @function orphan\n");
        assert_eq!(symbols.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, Severity::Error);
        assert_eq!(diagnostics[0].message, MSG_CLASS_MISSING);
    }

    #[test]
    fn doc_type_beats_declared_annotation() {
        let source = "\
--- @class Widget
local Widget = {}

--- @param width Pixels
function Widget:resize(width: number)
end
";
        let (symbols, _) = resolve(source);
        let SymbolTypes::Function { params, .. } = &symbols[1].types else {
            panic!("expected function types");
        };
        assert_eq!(params[0].ty, "Pixels");
    }

    #[test]
    fn oracle_fills_missing_types_by_name_then_position() {
        let oracle = StaticOracle {
            member: "blend",
            rendered: RenderedType {
                display: String::new(),
                function: Some(FunctionSignature {
                    params: vec![
                        OracleParam {
                            name: "a".to_string(),
                            ty: "number".to_string(),
                        },
                        OracleParam {
                            name: "second".to_string(),
                            ty: "string".to_string(),
                        },
                    ],
                    returns: vec!["number".to_string()],
                }),
            },
        };
        let source = "\
--- @class Palette
local Palette = {}

--- Blend.
--- @param a
--- @param b
--- @function Palette.blend
";
        let (symbols, _) = resolve_with(source, &oracle);
        let SymbolTypes::Function {
            display,
            params,
            returns,
            ..
        } = &symbols[1].types
        else {
            panic!("expected function types");
        };
        // "a" matches by name; "b" falls back to position.
        assert_eq!(params[0].ty, "number");
        assert_eq!(params[1].ty, "string");
        assert_eq!(returns[0].ty, "number");
        assert_eq!(display, "(a: number, b: string) -> number");
    }

    #[test]
    fn display_falls_back_to_any() {
        let (symbols, _) = resolve("--- @class C\nlocal C = {}\n\n--- @param x\n--- @return\n--- @function C.f\n");
        let SymbolTypes::Function { display, .. } = &symbols[1].types else {
            panic!("expected function types");
        };
        assert_eq!(display, "(x: any) -> any");
    }

    #[test]
    fn param_drift_warns_only_with_explicit_types() {
        let drifting = "\
--- @class Widget
local Widget = {}

--- @param wrong number
function Widget:resize(width)
end
";
        let (_, diagnostics) = resolve(drifting);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, MSG_PARAM_DRIFT);
        // Reported at the block, where the stale @param sits.
        assert_eq!(diagnostics[0].line, 4);

        let descriptive = "\
--- @class Widget
local Widget = {}

--- @param wrong -- text only
function Widget:resize(width)
end
";
        let (_, diagnostics) = resolve(descriptive);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn readonly_on_function_warns() {
        let source = "\
--- @class C
local C = {}

--- @readonly
--- @function C.f
";
        let (_, diagnostics) = resolve(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, MSG_READONLY_MISUSE);
    }

    #[test]
    fn record_alias_emits_field_symbols_and_skips_inner_blocks() {
        let source = "\
--- A point in 2D space.
export type Point = {
\t--- Horizontal position.
\tx: number,
\ty: number,
}
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[0].kind, SymbolKind::TypeAlias);
        assert_eq!(symbols[0].name, "Point");
        assert_eq!(symbols[1].kind, SymbolKind::Field);
        assert_eq!(symbols[1].qualified_name, "Point.x");
        assert_eq!(symbols[1].summary, "Horizontal position.");
        assert_eq!(symbols[1].line, 4);
        let SymbolTypes::Field { ty } = &symbols[2].types else {
            panic!("expected field types");
        };
        assert_eq!(ty, "number");
    }

    #[test]
    fn self_owner_placeholder_uses_sole_class() {
        let source = "\
--- @class Widget
local Widget = {}

--- @method ~:clone
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols[1].qualified_name, "Widget:clone");
    }

    #[test]
    fn explicit_within_beats_binding_owner() {
        let source = "\
--- @within Panel
function Widget.draw()
end
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols[0].qualified_name, "Panel.draw");
    }

    #[test]
    fn interface_fields_become_types_and_child_symbols() {
        let source = "\
--- @interface Options
--- @field width number -- in pixels
--- .height number
";
        let (symbols, _) = resolve(source);
        assert_eq!(symbols.len(), 3);
        let SymbolTypes::Interface { fields } = &symbols[0].types else {
            panic!("expected interface types");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].description, "in pixels");
        assert_eq!(fields[1].name, "height");

        assert_eq!(symbols[1].kind, SymbolKind::Field);
        assert_eq!(symbols[1].qualified_name, "Options.width");
        assert_eq!(symbols[1].summary, "in pixels");
        assert_eq!(symbols[2].qualified_name, "Options.height");
    }

    #[test]
    fn later_prop_tags_declare_sibling_properties() {
        let source = "\
--- @class Widget
--- @prop size number
--- @prop title string
local Widget = {}
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[0].kind, SymbolKind::Class);
        assert_eq!(symbols[1].qualified_name, "Widget.size");
        assert_eq!(
            symbols[1].types,
            SymbolTypes::Property {
                ty: "number".to_string(),
                readonly: false,
            }
        );
        assert_eq!(symbols[2].qualified_name, "Widget.title");
    }

    #[test]
    fn running_class_scopes_self_owner_to_latest() {
        let source = "\
--- @class A
local A = {}

--- @class B
local B = {}

--- @method ~:poke
";
        let (symbols, diagnostics) = resolve(source);
        assert!(diagnostics.is_empty());
        assert_eq!(symbols[2].qualified_name, "B:poke");
    }

    #[test]
    fn oracle_display_is_preferred_when_rendered() {
        let oracle = StaticOracle {
            member: "area",
            rendered: RenderedType {
                display: "(self) -> number".to_string(),
                function: None,
            },
        };
        let source = "\
--- @class Shape
local Shape = {}

--- @method ~:area
";
        let (symbols, _) = resolve_with(source, &oracle);
        let SymbolTypes::Function { display, .. } = &symbols[1].types else {
            panic!("expected function types");
        };
        assert_eq!(display, "(self) -> number");
    }

    #[test]
    fn tags_are_collected_in_stable_order() {
        let source = "\
--- @class Widget
--- @tag gui
--- @since v1.2
--- @deprecated v2 -- use Panel
--- @server
local Widget = {}
";
        let (symbols, _) = resolve(source);
        assert_eq!(
            symbols[0].tags,
            vec![
                TagValue::Tag("gui".to_string()),
                TagValue::Since("v1.2".to_string()),
                TagValue::Deprecated {
                    version: "v2".to_string(),
                    description: "use Panel".to_string(),
                },
                TagValue::Realm("server".to_string()),
            ]
        );
    }

    #[test]
    fn unbound_plain_description_produces_nothing() {
        let (symbols, diagnostics) = resolve("--- Just a file comment.\n");
        assert!(symbols.is_empty());
        assert!(diagnostics.is_empty());
    }
}
