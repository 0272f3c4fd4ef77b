//! Syntactic binding scanner — line-by-line over Luau source.
//!
//! Produces the binding inventory the resolver consumes: function and
//! property declarations, class-like table locals, and type aliases with
//! inline record shapes. This is a lightweight declaration scanner, not a
//! Luau parser; declarations split across lines are not recognized.

use std::sync::LazyLock;

use regex::Regex;

use crate::extractor::{BLOCK_CLOSE, BLOCK_OPEN, DOC_MARKER};
use crate::types::{Binding, BindingKind, FieldInfo, ParamInfo};

static RE_FUNC_OWNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*function\s+([A-Za-z_][A-Za-z0-9_.]*)([.:])([A-Za-z_]\w*)\s*\((.*)\)\s*(?::\s*(.+?))?\s*$")
        .expect("valid regex")
});

static RE_FUNC_LOCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*local\s+function\s+([A-Za-z_]\w*)\s*\((.*)\)\s*(?::\s*(.+?))?\s*$")
        .expect("valid regex")
});

static RE_FUNC_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*function\s+([A-Za-z_]\w*)\s*\((.*)\)\s*(?::\s*(.+?))?\s*$")
        .expect("valid regex")
});

static RE_ASSIGN_FUNC_OWNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.]*)\.([A-Za-z_]\w*)\s*=\s*function\s*\((.*)\)\s*(?::\s*(.+?))?\s*$")
        .expect("valid regex")
});

static RE_ASSIGN_FUNC_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_]\w*)\s*=\s*function\s*\((.*)\)\s*(?::\s*(.+?))?\s*$")
        .expect("valid regex")
});

static RE_CLASS_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*local\s+([A-Za-z_]\w*)\s*=\s*(?:setmetatable\s*\(\s*)?\{")
        .expect("valid regex")
});

static RE_TYPE_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?type\s+([A-Za-z_]\w*)\s*=\s*(.*)$").expect("valid regex")
});

static RE_PROP_OWNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.]*)\.([A-Za-z_]\w*)\s*=\s*\S").expect("valid regex")
});

static RE_PROP_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*=\s*\S").expect("valid regex"));

static RE_RECORD_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*:\s*(.+)$").expect("valid regex"));

/// Scan a file's lines and collect all declarations, ordered by line.
pub fn collect_bindings(lines: &[String]) -> Vec<Binding> {
    let mut bindings = Vec::new();
    let mut in_comment_block = false;

    for (index, line) in lines.iter().enumerate() {
        let line_number = to_line(index);
        let trimmed = line.trim();

        if in_comment_block {
            if trimmed.contains(BLOCK_CLOSE) {
                in_comment_block = false;
            }
            continue;
        }
        if trimmed.starts_with(BLOCK_OPEN) {
            in_comment_block = !trimmed[BLOCK_OPEN.len()..].contains(BLOCK_CLOSE);
            continue;
        }
        if trimmed.starts_with("--") {
            continue;
        }

        if let Some(binding) = match_declaration(lines, line, line_number) {
            bindings.push(binding);
        }
    }

    bindings
}

/// Try each declaration form against one source line, most specific first.
fn match_declaration(lines: &[String], line: &str, line_number: u32) -> Option<Binding> {
    if let Some(cap) = RE_FUNC_OWNED.captures(line) {
        let is_method = &cap[2] == ":";
        return Some(function_binding(
            &cap[1],
            &cap[3],
            is_method,
            &cap[4],
            cap.get(5).map_or("", |m| m.as_str()),
            line_number,
        ));
    }

    if let Some(cap) = RE_FUNC_LOCAL.captures(line) {
        return Some(function_binding(
            "",
            &cap[1],
            false,
            &cap[2],
            cap.get(3).map_or("", |m| m.as_str()),
            line_number,
        ));
    }

    if let Some(cap) = RE_FUNC_GLOBAL.captures(line) {
        return Some(function_binding(
            "",
            &cap[1],
            false,
            &cap[2],
            cap.get(3).map_or("", |m| m.as_str()),
            line_number,
        ));
    }

    if let Some(cap) = RE_ASSIGN_FUNC_OWNED.captures(line) {
        return Some(function_binding(
            &cap[1],
            &cap[2],
            false,
            &cap[3],
            cap.get(4).map_or("", |m| m.as_str()),
            line_number,
        ));
    }

    if let Some(cap) = RE_ASSIGN_FUNC_BARE.captures(line) {
        return Some(function_binding(
            "",
            &cap[1],
            false,
            &cap[2],
            cap.get(3).map_or("", |m| m.as_str()),
            line_number,
        ));
    }

    if let Some(cap) = RE_CLASS_TABLE.captures(line) {
        return Some(Binding::new(BindingKind::Class, &cap[1], line_number));
    }

    if let Some(cap) = RE_TYPE_ALIAS.captures(line) {
        return Some(type_alias_binding(lines, &cap[1], &cap[2], line_number));
    }

    if let Some(cap) = RE_PROP_OWNED.captures(line) {
        let mut binding = Binding::new(BindingKind::Property, &cap[2], line_number);
        binding.within = cap[1].to_string();
        return Some(binding);
    }

    if let Some(cap) = RE_PROP_BARE.captures(line) {
        return Some(Binding::new(BindingKind::Property, &cap[1], line_number));
    }

    None
}

/// Build a function binding from captured parts. An explicit leading
/// `self` parameter marks the function as a method even in `.` form.
fn function_binding(
    within: &str,
    name: &str,
    is_method: bool,
    params_text: &str,
    return_type: &str,
    line: u32,
) -> Binding {
    let params = split_params(params_text);
    let mut binding = Binding::new(BindingKind::Function, name, line);
    binding.within = within.to_string();
    binding.is_method = is_method || params.first().is_some_and(|p| p.name == "self");
    binding.params = params;
    binding.return_type = return_type.trim().to_string();
    binding
}

/// Split a parameter list on top-level commas, honoring nested brackets
/// in type annotations. Each entry is `name`, `name: Type`, or `...`.
fn split_params(text: &str) -> Vec<ParamInfo> {
    let mut parts: Vec<String> = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for ch in text.chars() {
        match ch {
            '(' | '{' | '[' | '<' => depth += 1,
            ')' | '}' | ']' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    parts.push(current);

    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once(':') {
            Some((name, ty)) => ParamInfo {
                name: name.trim().to_string(),
                ty: ty.trim().to_string(),
                description: Vec::new(),
            },
            None => ParamInfo {
                name: part.to_string(),
                ty: String::new(),
                description: Vec::new(),
            },
        })
        .collect()
}

/// Build a type-alias binding. When the aliased value is an inline record
/// (`{ ... }`), scan its body for fields and remember the body line span
/// so doc blocks inside it are attached as field docs, not symbols.
fn type_alias_binding(lines: &[String], name: &str, rhs: &str, line_number: u32) -> Binding {
    let mut binding = Binding::new(BindingKind::TypeAlias, name, line_number);

    if !rhs.trim_start().starts_with('{') {
        return binding;
    }

    let start_index = line_number as usize - 1;
    let mut depth = 0i32;
    let mut end_index = start_index;

    for (offset, line) in lines[start_index..].iter().enumerate() {
        depth += brace_delta(line);
        end_index = start_index + offset;

        if offset > 0 && depth >= 1 && !line.trim_start().starts_with('}') {
            if let Some(field) = record_field(lines, to_line(start_index), line, to_line(end_index))
            {
                binding.record_fields.push(field);
            }
        }

        if depth <= 0 {
            break;
        }
    }

    binding.record_span = Some((to_line(start_index), to_line(end_index)));
    binding
}

/// Net brace depth change contributed by one line, ignoring comment text.
fn brace_delta(line: &str) -> i32 {
    let code = line.find("--").map_or(line, |pos| &line[..pos]);
    let mut delta = 0i32;
    for ch in code.chars() {
        match ch {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Parse one record-body line as a field, attaching any inline doc
/// comment that ends directly above it.
fn record_field(
    lines: &[String],
    span_start: u32,
    line: &str,
    line_number: u32,
) -> Option<FieldInfo> {
    if line.trim_start().starts_with("--") {
        return None;
    }

    let cap = RE_RECORD_FIELD.captures(line)?;
    let mut ty = cap[2].to_string();
    if let Some(pos) = ty.find("--") {
        ty.truncate(pos);
    }
    let ty = ty.trim().trim_end_matches(',').trim().to_string();

    let column = line
        .find(|c: char| !c.is_whitespace())
        .map_or(1, |pos| u32::try_from(pos + 1).unwrap_or(1));

    Some(FieldInfo {
        name: cap[1].to_string(),
        ty,
        description: inline_doc_above(lines, span_start, line_number).unwrap_or_default(),
        line: line_number,
        column,
    })
}

/// Find the doc comment attached to an inline field: walking backward from
/// the field's line, skip blanks, then require either a `---` run or a
/// delimited block ending exactly there. Anything else attaches nothing.
pub fn inline_doc_above(lines: &[String], min_line: u32, target_line: u32) -> Option<String> {
    if target_line <= 1 {
        return None;
    }

    let min_index = min_line.saturating_sub(1) as usize;
    let mut index = target_line as usize - 2;

    while index >= min_index && lines[index].trim().is_empty() {
        if index == 0 {
            return None;
        }
        index -= 1;
    }
    if index < min_index {
        return None;
    }

    let trimmed = lines[index].trim();

    if trimmed.starts_with(DOC_MARKER) {
        let end = index;
        let mut start = index;
        while start > min_index && lines[start - 1].trim().starts_with(DOC_MARKER) {
            start -= 1;
        }

        let content: Vec<String> = lines[start..=end]
            .iter()
            .map(|raw| {
                let after = raw
                    .find(DOC_MARKER)
                    .map_or(raw.as_str(), |pos| &raw[pos + DOC_MARKER.len()..]);
                after.strip_prefix(' ').unwrap_or(after).to_string()
            })
            .collect();
        return Some(join_inline_description(&content));
    }

    if trimmed.contains(BLOCK_CLOSE) {
        let end = index;
        let mut start = index;
        loop {
            if lines[start].contains(BLOCK_OPEN) {
                break;
            }
            if start == min_index {
                return None;
            }
            start -= 1;
        }

        let mut content = Vec::new();
        let first = &lines[start];
        if let Some(pos) = first.find(BLOCK_OPEN) {
            let after = &first[pos + BLOCK_OPEN.len()..];
            if let Some(close) = after.find(BLOCK_CLOSE) {
                content.push(after[..close].to_string());
                return Some(join_inline_description(&content));
            }
            if !after.is_empty() {
                content.push(after.to_string());
            }
        }
        for line in &lines[start + 1..=end] {
            if let Some(pos) = line.find(BLOCK_CLOSE) {
                let before = &line[..pos];
                if !before.is_empty() {
                    content.push(before.to_string());
                }
                break;
            }
            content.push(line.clone());
        }
        return Some(join_inline_description(&content));
    }

    None
}

/// Join inline doc lines, dropping blank edges and surrounding whitespace.
fn join_inline_description(lines: &[String]) -> String {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.trim().is_empty()).map_or(0, |p| p + 1);
    if start >= end {
        return String::new();
    }

    lines[start..end]
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_start()
        .to_string()
}

/// Convert a zero-based index into a one-based line number.
fn to_line(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
