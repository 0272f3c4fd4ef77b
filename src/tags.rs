//! Tag grammar parser: turns a doc block's content lines into a
//! `ParsedDoc` — a description body plus typed tag records, with
//! multi-line continuation handling.

use crate::types::{ErrorInfo, FieldInfo, ParamInfo, ReturnInfo, Visibility};

/// Sigil introducing a tag line.
pub const TAG_SIGIL: char = '@';
/// Separator between a type expression and its description.
pub const TYPE_DESC_SEPARATOR: &str = "--";
/// Fenced-code marker; tag logic is suspended between fences.
const FENCE: &str = "```";
/// Owner placeholder meaning "the block's own class, resolved later".
pub const SELF_OWNER: &str = "~";

/// The declared kind of a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTagKind {
    Class,
    Constructor,
    Function,
    Interface,
    Property,
    Type,
}

/// A primary-symbol declaration inside a doc block (`@class`, `@prop`,
/// `@function`, ...). Only the first type tag governs the block's symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTag {
    /// Declared kind.
    pub kind: TypeTagKind,
    /// Declared name, owner prefix already split off.
    pub name: String,
    /// Declared type expression, empty when absent.
    pub ty: String,
    /// Whether the member is method-style.
    pub is_method: bool,
}

/// Scalar and flag metadata collected from a block's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocState {
    /// Owning-scope override from `@within` or an owner prefix.
    pub within: String,
    /// `@yields` flag.
    pub yields: bool,
    /// `@readonly` flag.
    pub readonly: bool,
    /// Visibility override from `@private` / `@ignore`.
    pub visibility: Visibility,
    /// `@since` version.
    pub since: String,
    /// `@unreleased` flag.
    pub unreleased: bool,
    /// `@event` flag.
    pub event: bool,
    /// `@extends` values in order.
    pub extends: Vec<String>,
    /// `@__index` metafield name override.
    pub index_name: String,
    /// `@inheritDoc` target qualified name.
    pub inherit_doc: String,
    /// `@include` paths in order.
    pub includes: Vec<String>,
    /// `@snippet` paths in order.
    pub snippets: Vec<String>,
    /// `@alias` names in order.
    pub aliases: Vec<String>,
    /// Realm tags (`server`, `client`, `plugin`) in order.
    pub realms: Vec<String>,
    /// Free-form `@tag` values in order.
    pub tags: Vec<String>,
    /// `@category` values in order.
    pub categories: Vec<String>,
    /// `@deprecated` version, empty when not deprecated.
    pub deprecated_version: String,
    /// `@deprecated` replacement advice.
    pub deprecated_description: String,
}

/// A fully parsed doc block: description body plus the typed tag bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    /// Description lines, trailing whitespace stripped.
    pub description_lines: Vec<String>,
    /// Type tags in declaration order.
    pub type_tags: Vec<TypeTag>,
    /// `@field` and shorthand `.name` fields in declaration order.
    pub fields: Vec<FieldInfo>,
    /// `@param` entries in declaration order.
    pub params: Vec<ParamInfo>,
    /// `@return` entries in declaration order.
    pub returns: Vec<ReturnInfo>,
    /// `@error` entries in declaration order.
    pub errors: Vec<ErrorInfo>,
    /// `@external name value` pairs in declaration order.
    pub externals: Vec<(String, String)>,
    /// Scalar and flag metadata.
    pub state: DocState,
}

/// Which field of a tag record a continuation line feeds.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Ty,
    Description,
}

/// Index-based address of the active continuation target. Stored as an
/// index plus a slot selector so growing the backing list cannot
/// invalidate it.
#[derive(Debug, Clone, Copy)]
enum Continuation {
    TypeTag(usize),
    Field(usize, Slot),
    Param(usize, Slot),
    Return(usize, Slot),
    Error(usize, Slot),
}

/// An `owner.name` / `owner:name` / `~.name` member reference split into
/// its parts.
#[derive(Debug, Default)]
struct MemberName {
    within: String,
    name: String,
    is_method: bool,
}

/// Parse a dedented doc block into a `ParsedDoc`. Malformed tag lines are
/// tolerated; unrecognized tag names are ignored.
pub fn parse_doc_block(content_lines: &[String]) -> ParsedDoc {
    let mut doc = ParsedDoc::default();
    let mut in_fence = false;
    let mut continuation: Option<Continuation> = None;

    for line in content_lines {
        let trimmed = line.trim();

        if trimmed.starts_with(FENCE) {
            in_fence = !in_fence;
        }

        if !in_fence {
            if let Some(target) = continuation {
                if let Some(text) = continuation_text(line) {
                    apply_continuation(&mut doc, target, text);
                    continue;
                }
            }
        }

        continuation = None;

        if !in_fence && trimmed.starts_with(TAG_SIGIL) {
            continuation = dispatch_tag(&mut doc, &trimmed[1..]);
            continue;
        }

        if !in_fence && trimmed.starts_with('.') {
            parse_shorthand_field(&mut doc, trimmed[1..].trim());
            continue;
        }

        doc.description_lines.push(line.trim_end().to_string());
    }

    doc
}

/// If the line is indented enough to continue the active tag (a tab, or at
/// least two spaces) and does not itself look like a tag or shorthand
/// line, return its text with the indent removed.
fn continuation_text(line: &str) -> Option<&str> {
    let indent_len = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    let indent = &line[..indent_len];
    if indent.is_empty() {
        return None;
    }
    if !indent.contains('\t') && indent.len() < 2 {
        return None;
    }

    let after = line[indent_len..].trim_end();
    let after_trimmed = after.trim_start();
    if after_trimmed.starts_with(TAG_SIGIL) || after_trimmed.starts_with('.') {
        return None;
    }
    Some(after)
}

/// Append a continuation line to its addressed target. Type slots extend
/// the type expression; description slots append a line.
fn apply_continuation(doc: &mut ParsedDoc, target: Continuation, text: &str) {
    match target {
        Continuation::TypeTag(i) => {
            if let Some(tag) = doc.type_tags.get_mut(i) {
                append_type_text(&mut tag.ty, text);
            }
        }
        Continuation::Field(i, slot) => {
            if let Some(field) = doc.fields.get_mut(i) {
                match slot {
                    Slot::Ty => append_type_text(&mut field.ty, text),
                    Slot::Description => {
                        if field.description.is_empty() {
                            field.description = text.to_string();
                        } else {
                            field.description.push('\n');
                            field.description.push_str(text);
                        }
                    }
                }
            }
        }
        Continuation::Param(i, slot) => {
            if let Some(param) = doc.params.get_mut(i) {
                match slot {
                    Slot::Ty => append_type_text(&mut param.ty, text),
                    Slot::Description => param.description.push(text.to_string()),
                }
            }
        }
        Continuation::Return(i, slot) => {
            if let Some(ret) = doc.returns.get_mut(i) {
                match slot {
                    Slot::Ty => append_type_text(&mut ret.ty, text),
                    Slot::Description => ret.description.push(text.to_string()),
                }
            }
        }
        Continuation::Error(i, slot) => {
            if let Some(err) = doc.errors.get_mut(i) {
                match slot {
                    Slot::Ty => append_type_text(&mut err.ty, text),
                    Slot::Description => err.description.push(text.to_string()),
                }
            }
        }
    }
}

/// Extend a type expression with continuation text, space-joined.
fn append_type_text(ty: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !ty.is_empty() {
        ty.push(' ');
    }
    ty.push_str(text);
}

/// Parse and dispatch one tag line (sigil already stripped). Returns the
/// continuation target the tag opens, if any.
fn dispatch_tag(doc: &mut ParsedDoc, tag_line: &str) -> Option<Continuation> {
    let (name, value) = match tag_line.find(char::is_whitespace) {
        Some(pos) => (&tag_line[..pos], tag_line[pos + 1..].trim()),
        None => (tag_line, ""),
    };

    match name {
        "class" => {
            doc.type_tags.push(TypeTag {
                kind: TypeTagKind::Class,
                name: value.to_string(),
                ty: String::new(),
                is_method: false,
            });
            None
        }
        "prop" => {
            let (raw_name, rest) = split_tag_value(value);
            let member = parse_member_name(&raw_name);
            adopt_member_owner(doc, &member);
            push_typed_tag(doc, TypeTagKind::Property, member.name, rest, false)
        }
        "type" => {
            let (type_name, rest) = split_tag_value(value);
            push_typed_tag(doc, TypeTagKind::Type, type_name, rest, false)
        }
        "interface" => {
            doc.type_tags.push(TypeTag {
                kind: TypeTagKind::Interface,
                name: value.to_string(),
                ty: String::new(),
                is_method: false,
            });
            None
        }
        "function" => {
            push_member_tag(doc, TypeTagKind::Function, value, false);
            None
        }
        "method" => {
            push_member_tag(doc, TypeTagKind::Function, value, true);
            None
        }
        "constructor" => {
            push_member_tag(doc, TypeTagKind::Constructor, value, false);
            None
        }
        "within" => {
            doc.state.within = value.to_string();
            None
        }
        "field" => {
            let (field_name, rest) = split_tag_value(value);
            let has_separator = rest.contains(TYPE_DESC_SEPARATOR);
            let (ty, description) = parse_type_and_description(&rest);
            doc.fields.push(FieldInfo {
                name: field_name,
                ty,
                description,
                line: 0,
                column: 1,
            });
            let index = doc.fields.len() - 1;
            Some(Continuation::Field(index, slot_for(has_separator)))
        }
        "param" => {
            let (param_name, rest) = split_tag_value(value);
            let has_separator = rest.contains(TYPE_DESC_SEPARATOR);
            let (ty, description) = parse_type_and_description(&rest);
            doc.params.push(ParamInfo {
                name: param_name,
                ty,
                description: non_empty_lines(description),
            });
            let index = doc.params.len() - 1;
            Some(Continuation::Param(index, slot_for(has_separator)))
        }
        "return" => {
            let has_separator = value.contains(TYPE_DESC_SEPARATOR);
            let (ty, description) = parse_type_and_description(value);
            doc.returns.push(ReturnInfo {
                ty,
                description: non_empty_lines(description),
            });
            let index = doc.returns.len() - 1;
            Some(Continuation::Return(index, slot_for(has_separator)))
        }
        "error" => {
            let has_separator = value.contains(TYPE_DESC_SEPARATOR);
            let (ty, description) = parse_type_and_description(value);
            doc.errors.push(ErrorInfo {
                ty,
                description: non_empty_lines(description),
            });
            let index = doc.errors.len() - 1;
            Some(Continuation::Error(index, slot_for(has_separator)))
        }
        "yields" => {
            doc.state.yields = true;
            None
        }
        "tag" => {
            push_non_empty(&mut doc.state.tags, value);
            None
        }
        "category" => {
            push_non_empty(&mut doc.state.categories, value);
            None
        }
        "event" => {
            doc.state.event = true;
            None
        }
        "extends" => {
            push_non_empty(&mut doc.state.extends, value);
            None
        }
        "unreleased" => {
            doc.state.unreleased = true;
            None
        }
        "since" => {
            doc.state.since = value.to_string();
            None
        }
        "deprecated" => {
            let (version, description) = parse_type_and_description(value);
            doc.state.deprecated_version = version;
            doc.state.deprecated_description = description;
            None
        }
        "server" | "client" | "plugin" => {
            doc.state.realms.push(name.to_string());
            None
        }
        "private" => {
            doc.state.visibility = Visibility::Private;
            None
        }
        "ignore" => {
            doc.state.visibility = Visibility::Ignored;
            None
        }
        "readonly" => {
            doc.state.readonly = true;
            None
        }
        "__index" => {
            doc.state.index_name = value.to_string();
            None
        }
        "external" => {
            let (external_name, rest) = split_tag_value(value);
            if !external_name.is_empty() && !rest.is_empty() {
                doc.externals.push((external_name, rest));
            }
            None
        }
        "inheritDoc" => {
            doc.state.inherit_doc = value.to_string();
            None
        }
        "include" => {
            push_non_empty(&mut doc.state.includes, value);
            None
        }
        "snippet" => {
            push_non_empty(&mut doc.state.snippets, value);
            None
        }
        "alias" => {
            push_non_empty(&mut doc.state.aliases, value);
            None
        }
        // Unrecognized tag names are ignored without a diagnostic.
        _ => None,
    }
}

/// Push a `@prop` / `@type` tag whose remaining text is a type expression
/// with an optional `--`-separated description.
fn push_typed_tag(
    doc: &mut ParsedDoc,
    kind: TypeTagKind,
    name: String,
    rest: String,
    is_method: bool,
) -> Option<Continuation> {
    let has_separator = rest.contains(TYPE_DESC_SEPARATOR);
    let (ty, _description) = parse_type_and_description(&rest);
    doc.type_tags.push(TypeTag {
        kind,
        name,
        ty,
        is_method,
    });

    // Without a separator the whole remainder is the type expression and
    // stays open for type continuation lines; once a separator appeared
    // the type is closed.
    if has_separator {
        None
    } else {
        Some(Continuation::TypeTag(doc.type_tags.len() - 1))
    }
}

/// Push a `@function` / `@method` / `@constructor` tag, splitting off an
/// `owner.name` / `owner:name` / `~.name` prefix.
fn push_member_tag(doc: &mut ParsedDoc, kind: TypeTagKind, value: &str, force_method: bool) {
    let member = parse_member_name(value);
    adopt_member_owner(doc, &member);
    doc.type_tags.push(TypeTag {
        kind,
        name: member.name,
        ty: String::new(),
        is_method: force_method || member.is_method,
    });
}

/// Record the owner split off a member name as the block's owning scope,
/// unless one was already set.
fn adopt_member_owner(doc: &mut ParsedDoc, member: &MemberName) {
    if !member.within.is_empty() && doc.state.within.is_empty() {
        doc.state.within = member.within.clone();
    }
}

/// Parse a shorthand field declaration: `.name type -- description`.
fn parse_shorthand_field(doc: &mut ParsedDoc, field_line: &str) {
    let (name, rest) = split_tag_value(field_line);
    let (ty, description) = parse_type_and_description(&rest);
    doc.fields.push(FieldInfo {
        name,
        ty,
        description,
        line: 0,
        column: 1,
    });
}

/// Split an `owner.name`, `owner:name`, `~.name`, or `~:name` reference.
/// A bare name has no owner. When both separators appear, the later one
/// wins (`a.b:c` is method `c` within `a.b`).
fn parse_member_name(raw: &str) -> MemberName {
    if let Some(name) = raw.strip_prefix("~:") {
        return MemberName {
            within: SELF_OWNER.to_string(),
            name: name.to_string(),
            is_method: true,
        };
    }
    if let Some(name) = raw.strip_prefix("~.") {
        return MemberName {
            within: SELF_OWNER.to_string(),
            name: name.to_string(),
            is_method: false,
        };
    }

    let colon = raw.rfind(':');
    let dot = raw.rfind('.');

    match (colon, dot) {
        (Some(c), d) if d.is_none_or(|d| c > d) => MemberName {
            within: raw[..c].to_string(),
            name: raw[c + 1..].to_string(),
            is_method: true,
        },
        (_, Some(d)) => MemberName {
            within: raw[..d].to_string(),
            name: raw[d + 1..].to_string(),
            is_method: false,
        },
        _ => MemberName {
            name: raw.to_string(),
            ..MemberName::default()
        },
    }
}

/// Split a tag value into its first whitespace-delimited token and the
/// trimmed remainder.
fn split_tag_value(value: &str) -> (String, String) {
    match value.find(char::is_whitespace) {
        Some(pos) => (value[..pos].to_string(), value[pos + 1..].trim().to_string()),
        None => (value.to_string(), String::new()),
    }
}

/// Split `type -- description` on the first separator. Without a separator
/// the whole value is the type.
fn parse_type_and_description(value: &str) -> (String, String) {
    match value.find(TYPE_DESC_SEPARATOR) {
        Some(pos) => (
            value[..pos].trim().to_string(),
            value[pos + TYPE_DESC_SEPARATOR.len()..].trim().to_string(),
        ),
        None => (value.trim().to_string(), String::new()),
    }
}

/// The continuation slot a tag opens: description once a separator was
/// seen, otherwise the type expression.
fn slot_for(has_separator: bool) -> Slot {
    if has_separator {
        Slot::Description
    } else {
        Slot::Ty
    }
}

/// Wrap a description into its line list, dropping the empty case.
fn non_empty_lines(description: String) -> Vec<String> {
    if description.is_empty() {
        Vec::new()
    } else {
        vec![description]
    }
}

/// Push a value onto a list unless it is empty.
fn push_non_empty(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedDoc {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        parse_doc_block(&lines)
    }

    #[test]
    fn param_with_type_and_description() {
        let doc = parse("@param x number -- the count");
        assert_eq!(doc.params.len(), 1);
        assert_eq!(doc.params[0].name, "x");
        assert_eq!(doc.params[0].ty, "number");
        assert_eq!(doc.params[0].description, vec!["the count"]);
    }

    #[test]
    fn param_description_continuation() {
        let doc = parse("@param x number -- the count\n  and then some");
        assert_eq!(doc.params[0].description, vec!["the count", "and then some"]);
    }

    #[test]
    fn param_type_continuation_without_separator() {
        let doc = parse("@param x (value: number,\n  extra: string) -> ()");
        assert_eq!(doc.params[0].ty, "(value: number, extra: string) -> ()");
    }

    #[test]
    fn bare_param_accumulates_continuation_into_type() {
        let doc = parse("@param x\n  more text");
        assert_eq!(doc.params[0].ty, "more text");
    }

    #[test]
    fn tag_line_ends_continuation() {
        let doc = parse("@param x number -- first\n@param y number -- second");
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params[0].description, vec!["first"]);
    }

    #[test]
    fn unindented_line_resets_continuation() {
        let doc = parse("@param x number -- first\nplain text");
        assert_eq!(doc.params[0].description, vec!["first"]);
        assert_eq!(doc.description_lines, vec!["plain text"]);
    }

    #[test]
    fn class_tag_becomes_type_tag() {
        let doc = parse("The main class.\n@class Widget");
        assert_eq!(doc.type_tags.len(), 1);
        assert_eq!(doc.type_tags[0].kind, TypeTagKind::Class);
        assert_eq!(doc.type_tags[0].name, "Widget");
        assert_eq!(doc.description_lines, vec!["The main class."]);
    }

    #[test]
    fn prop_owner_prefix_sets_within() {
        let doc = parse("@prop Widget.size number");
        assert_eq!(doc.state.within, "Widget");
        assert_eq!(doc.type_tags[0].kind, TypeTagKind::Property);
        assert_eq!(doc.type_tags[0].name, "size");
        assert_eq!(doc.type_tags[0].ty, "number");
    }

    #[test]
    fn self_owner_prefix_is_preserved() {
        let doc = parse("@method ~:resize");
        assert_eq!(doc.state.within, SELF_OWNER);
        assert!(doc.type_tags[0].is_method);
        assert_eq!(doc.type_tags[0].name, "resize");
    }

    #[test]
    fn method_separator_wins_when_later() {
        let member = parse_member_name("a.b:c");
        assert_eq!(member.within, "a.b");
        assert_eq!(member.name, "c");
        assert!(member.is_method);
    }

    #[test]
    fn explicit_within_is_not_overridden_by_prefix() {
        let doc = parse("@within Panel\n@prop Widget.size number");
        assert_eq!(doc.state.within, "Panel");
    }

    #[test]
    fn shorthand_field_line() {
        let doc = parse(".count number -- how many");
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.fields[0].name, "count");
        assert_eq!(doc.fields[0].ty, "number");
        assert_eq!(doc.fields[0].description, "how many");
    }

    #[test]
    fn fenced_code_suspends_tag_parsing() {
        let doc = parse("Example:\n```lua\n@param not_a_tag\n  indented\n```");
        assert!(doc.params.is_empty());
        assert_eq!(doc.description_lines.len(), 5);
        assert_eq!(doc.description_lines[2], "@param not_a_tag");
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let doc = parse("@frobnicate all the things\nbody");
        assert!(doc.type_tags.is_empty());
        assert_eq!(doc.description_lines, vec!["body"]);
    }

    #[test]
    fn deprecated_splits_version_and_advice() {
        let doc = parse("@deprecated v2 -- use Widget.resize instead");
        assert_eq!(doc.state.deprecated_version, "v2");
        assert_eq!(doc.state.deprecated_description, "use Widget.resize instead");
    }

    #[test]
    fn realm_and_flag_tags() {
        let doc = parse("@server\n@client\n@yields\n@unreleased\n@readonly");
        assert_eq!(doc.state.realms, vec!["server", "client"]);
        assert!(doc.state.yields);
        assert!(doc.state.unreleased);
        assert!(doc.state.readonly);
    }

    #[test]
    fn visibility_overrides() {
        assert_eq!(parse("@private").state.visibility, Visibility::Private);
        assert_eq!(parse("@ignore").state.visibility, Visibility::Ignored);
    }

    #[test]
    fn external_requires_name_and_value() {
        let doc = parse("@external Promise https://example.test/promise\n@external Broken");
        assert_eq!(
            doc.externals,
            vec![(
                "Promise".to_string(),
                "https://example.test/promise".to_string()
            )]
        );
    }

    #[test]
    fn bare_sigil_is_tolerated() {
        let doc = parse("@");
        assert!(doc.type_tags.is_empty());
        assert!(doc.description_lines.is_empty());
    }
}
