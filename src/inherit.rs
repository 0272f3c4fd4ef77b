//! The `@inheritDoc` pass: once a module's symbols are finalized, symbols
//! that name a donor copy its documentation into their own empty slots.

use std::collections::HashMap;

use crate::types::{Symbol, SymbolTypes, TagValue};

/// Resolve `@inheritDoc` references within one module's symbol list.
/// Donors are looked up by qualified name; when several symbols share
/// one, the last occurrence wins. Unresolvable references are left alone.
pub fn apply_inherit_docs(symbols: &mut [Symbol]) {
    let donors: HashMap<String, Symbol> = symbols
        .iter()
        .map(|s| (s.qualified_name.clone(), s.clone()))
        .collect();

    for symbol in symbols.iter_mut() {
        let Some(target) = symbol.tags.iter().find_map(TagValue::inherit_target) else {
            continue;
        };
        let Some(donor) = donors.get(target) else {
            continue;
        };
        if donor.qualified_name == symbol.qualified_name {
            continue;
        }

        if symbol.description_markdown.is_empty() && !donor.description_markdown.is_empty() {
            symbol.description_markdown = donor.description_markdown.clone();
            symbol.summary = donor.summary.clone();
        }

        if only_inherit_tags(&symbol.tags) {
            symbol.tags = donor.tags.clone();
        }

        if symbol.kind == donor.kind && display_is_empty(&symbol.types) {
            symbol.types = donor.types.clone();
        }
    }
}

/// Whether every tag on the symbol is an `@inheritDoc` marker, i.e. the
/// symbol brought no metadata of its own. Such a symbol takes the donor's
/// tag list wholesale.
fn only_inherit_tags(symbol_tags: &[TagValue]) -> bool {
    symbol_tags
        .iter()
        .all(|tag| matches!(tag, TagValue::InheritDoc(_)))
}

/// Whether a symbol rendered no type text of its own. Only such symbols
/// take the donor's types; a function that rendered even an empty
/// parameter list keeps it.
fn display_is_empty(types: &SymbolTypes) -> bool {
    match types {
        SymbolTypes::Function { display, .. } => display.is_empty(),
        SymbolTypes::Property { ty, .. } => ty.is_empty(),
        SymbolTypes::TypeAlias { value } => value.is_empty(),
        SymbolTypes::Field { ty } => ty.is_empty(),
        SymbolTypes::Interface { fields } => fields.is_empty(),
        SymbolTypes::Class { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SymbolKind, Visibility};

    fn symbol(qualified: &str, kind: SymbolKind, types: SymbolTypes) -> Symbol {
        Symbol {
            kind,
            name: qualified
                .rsplit(['.', ':'])
                .next()
                .unwrap_or(qualified)
                .to_string(),
            qualified_name: qualified.to_string(),
            file: "init.luau".to_string(),
            line: 1,
            column: 1,
            summary: String::new(),
            description_markdown: String::new(),
            tags: Vec::new(),
            types,
            visibility: Visibility::Public,
        }
    }

    fn function_types(display: &str) -> SymbolTypes {
        SymbolTypes::Function {
            display: display.to_string(),
            params: Vec::new(),
            returns: Vec::new(),
            errors: Vec::new(),
            yields: false,
        }
    }

    #[test]
    fn copies_description_into_empty_symbol() {
        let mut donor = symbol("A.run", SymbolKind::Function, function_types("()"));
        donor.summary = "Runs.".to_string();
        donor.description_markdown = "Runs.\n\nSlowly.".to_string();

        let mut heir = symbol("B.run", SymbolKind::Function, function_types("()"));
        heir.tags.push(TagValue::InheritDoc("A.run".to_string()));

        let mut symbols = vec![donor, heir];
        apply_inherit_docs(&mut symbols);

        assert_eq!(symbols[1].description_markdown, "Runs.\n\nSlowly.");
        assert_eq!(symbols[1].summary, "Runs.");
    }

    #[test]
    fn own_description_is_preserved() {
        let mut donor = symbol("A.run", SymbolKind::Function, function_types("()"));
        donor.description_markdown = "Donor text.".to_string();

        let mut heir = symbol("B.run", SymbolKind::Function, function_types("()"));
        heir.description_markdown = "Own text.".to_string();
        heir.tags.push(TagValue::InheritDoc("A.run".to_string()));

        let mut symbols = vec![donor, heir];
        apply_inherit_docs(&mut symbols);
        assert_eq!(symbols[1].description_markdown, "Own text.");
    }

    #[test]
    fn copies_types_of_matching_kind() {
        let donor = symbol(
            "A.size",
            SymbolKind::Property,
            SymbolTypes::Property {
                ty: "number".to_string(),
                readonly: true,
            },
        );
        let mut heir = symbol(
            "B.size",
            SymbolKind::Property,
            SymbolTypes::Property {
                ty: String::new(),
                readonly: false,
            },
        );
        heir.tags.push(TagValue::InheritDoc("A.size".to_string()));

        let mut symbols = vec![donor, heir];
        apply_inherit_docs(&mut symbols);
        assert_eq!(
            symbols[1].types,
            SymbolTypes::Property {
                ty: "number".to_string(),
                readonly: true,
            }
        );
    }

    #[test]
    fn inherit_only_tags_take_the_donor_list_wholesale() {
        let mut donor = symbol("A.run", SymbolKind::Function, function_types("()"));
        donor.tags.push(TagValue::Tag("core".to_string()));
        donor.tags.push(TagValue::Since("v1".to_string()));

        let mut heir = symbol("B.run", SymbolKind::Function, function_types("()"));
        heir.tags.push(TagValue::InheritDoc("A.run".to_string()));

        let mut symbols = vec![donor, heir];
        apply_inherit_docs(&mut symbols);
        assert_eq!(
            symbols[1].tags,
            vec![
                TagValue::Tag("core".to_string()),
                TagValue::Since("v1".to_string()),
            ]
        );
    }

    #[test]
    fn rendered_signature_blocks_type_inheritance() {
        let donor = symbol(
            "A.resize",
            SymbolKind::Function,
            function_types("(width: number)"),
        );
        let mut heir = symbol("B.resize", SymbolKind::Function, function_types("()"));
        heir.tags.push(TagValue::InheritDoc("A.resize".to_string()));

        let mut symbols = vec![donor, heir];
        apply_inherit_docs(&mut symbols);
        assert_eq!(symbols[1].types, function_types("()"));
    }

    #[test]
    fn empty_display_inherits_the_whole_signature() {
        let donor = symbol(
            "A.resize",
            SymbolKind::Function,
            function_types("(width: number)"),
        );
        let mut heir = symbol("B.resize", SymbolKind::Function, function_types(""));
        heir.tags.push(TagValue::InheritDoc("A.resize".to_string()));

        let mut symbols = vec![donor, heir];
        apply_inherit_docs(&mut symbols);
        assert_eq!(symbols[1].types, function_types("(width: number)"));
    }

    #[test]
    fn own_tags_block_inheritance_of_tags() {
        let mut donor = symbol("A.run", SymbolKind::Function, function_types("()"));
        donor.tags.push(TagValue::Tag("core".to_string()));

        let mut heir = symbol("B.run", SymbolKind::Function, function_types("()"));
        heir.tags.push(TagValue::Tag("gui".to_string()));
        heir.tags.push(TagValue::InheritDoc("A.run".to_string()));

        let mut symbols = vec![donor, heir];
        apply_inherit_docs(&mut symbols);
        assert_eq!(
            symbols[1].tags,
            vec![
                TagValue::Tag("gui".to_string()),
                TagValue::InheritDoc("A.run".to_string()),
            ]
        );
    }

    #[test]
    fn last_donor_wins_on_duplicate_names() {
        let mut first = symbol("A.run", SymbolKind::Function, function_types("()"));
        first.description_markdown = "First.".to_string();
        let mut second = symbol("A.run", SymbolKind::Function, function_types("()"));
        second.description_markdown = "Second.".to_string();

        let mut heir = symbol("B.run", SymbolKind::Function, function_types("()"));
        heir.tags.push(TagValue::InheritDoc("A.run".to_string()));

        let mut symbols = vec![first, second, heir];
        apply_inherit_docs(&mut symbols);
        assert_eq!(symbols[2].description_markdown, "Second.");
    }

    #[test]
    fn unresolved_reference_is_silent() {
        let mut heir = symbol("B.run", SymbolKind::Function, function_types("()"));
        heir.tags.push(TagValue::InheritDoc("Nowhere".to_string()));

        let mut symbols = vec![heir];
        apply_inherit_docs(&mut symbols);
        assert!(symbols[0].description_markdown.is_empty());
    }
}
