//! Comment block extraction: slices doc-comment spans out of a file's
//! line sequence. Two physical forms exist: runs of `---` marker lines
//! and `--[=[ ... ]=]` delimited blocks.

/// Marker prefix for the consecutive-line comment form.
pub const DOC_MARKER: &str = "---";
/// Opening token of the delimited comment form.
pub const BLOCK_OPEN: &str = "--[=[";
/// Closing token of the delimited comment form.
pub const BLOCK_CLOSE: &str = "]=]";

/// A contiguous doc-comment span. Content lines are dedented; marker and
/// delimiter tokens are already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    /// One-based first line of the span.
    pub start_line: u32,
    /// One-based last line of the span.
    pub end_line: u32,
    /// Dedented content lines.
    pub content_lines: Vec<String>,
}

/// Extract all doc blocks from a file's lines, in file order. Blocks never
/// overlap; scanning resumes after each block's end line. Non-comment lines
/// are skipped without error.
pub fn extract_doc_blocks(lines: &[String]) -> Vec<DocBlock> {
    let mut blocks = Vec::new();
    let mut index = 0usize;

    while index < lines.len() {
        let trimmed = lines[index].trim();

        if trimmed.starts_with(DOC_MARKER) {
            blocks.push(read_marker_block(lines, &mut index));
            continue;
        }

        if trimmed.starts_with(BLOCK_OPEN) {
            blocks.push(read_delimited_block(lines, &mut index));
            continue;
        }

        index += 1;
    }

    blocks
}

/// Consume a run of physically adjacent `---` lines starting at `index`.
/// The marker and at most one following space are stripped per line.
fn read_marker_block(lines: &[String], index: &mut usize) -> DocBlock {
    let start = *index;
    let mut content = Vec::new();

    while *index < lines.len() && lines[*index].trim().starts_with(DOC_MARKER) {
        let raw = &lines[*index];
        let after = raw
            .find(DOC_MARKER)
            .map_or("", |pos| &raw[pos + DOC_MARKER.len()..]);
        content.push(after.strip_prefix(' ').unwrap_or(after).to_string());
        *index += 1;
    }

    DocBlock {
        start_line: line_number(start),
        end_line: line_number(*index - 1),
        content_lines: dedent(content),
    }
}

/// Consume a `--[=[ ... ]=]` block starting at `index`. Same-line text after
/// the opener and before the closer is kept; the delimiter tokens are not.
/// A missing closer extends the block to end of file without error.
fn read_delimited_block(lines: &[String], index: &mut usize) -> DocBlock {
    let start = *index;
    let mut content = Vec::new();

    let first = &lines[*index];
    if let Some(open) = first.find(BLOCK_OPEN) {
        let after_open = &first[open + BLOCK_OPEN.len()..];
        if !after_open.is_empty() {
            content.push(after_open.to_string());
        }
    }
    *index += 1;

    let mut found_end = false;
    while *index < lines.len() {
        let line = &lines[*index];
        if let Some(close) = line.find(BLOCK_CLOSE) {
            let before_close = &line[..close];
            if !before_close.is_empty() {
                content.push(before_close.to_string());
            }
            found_end = true;
            break;
        }
        content.push(line.clone());
        *index += 1;
    }

    let end = if found_end {
        let end = *index;
        *index += 1;
        end
    } else {
        // Unterminated block tolerance: runs to end of file.
        *index = lines.len();
        lines.len() - 1
    };

    DocBlock {
        start_line: line_number(start),
        end_line: line_number(end),
        content_lines: dedent(content),
    }
}

/// Strip the minimum leading-whitespace length across all non-blank lines
/// from every line. Lines shorter than the common indent become empty.
fn dedent(lines: Vec<String>) -> Vec<String> {
    let min_indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.find(|c: char| c != ' ' && c != '\t'))
        .min();

    let Some(min_indent) = min_indent else {
        return lines;
    };
    if min_indent == 0 {
        return lines;
    }

    lines
        .into_iter()
        .map(|line| {
            if line.len() < min_indent {
                String::new()
            } else {
                line[min_indent..].to_string()
            }
        })
        .collect()
}

/// Convert a zero-based index into a one-based line number.
fn line_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
