//! Orphan import cleaning.
//!
//! After regions are stripped, named imports whose bindings are no longer
//! referenced are removed or narrowed. Only the leading import block is
//! considered, and only brace imports (`import { A, B as C } from '...'`,
//! optionally `import type { ... }`). Default, namespace, mixed and
//! side-effect imports are never touched.
//!
//! Usage detection is a whole-word search of the identifiers in everything
//! after the last import line. Comments and string literals count as
//! usage, so a binding mentioned only in a comment survives.

use std::collections::HashSet;

use crate::domain::regions::collapse_blank_lines;

/// At most this many bindings are written on a single line.
pub const INLINE_BINDING_LIMIT: usize = 3;

const DEFAULT_INDENT: &str = "  ";

/// One named binding exactly as written, e.g. `Schema as MongooseSchema`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub text: String,
    /// The identifier visible to the rest of the file.
    pub local: String,
}

impl ImportBinding {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let local = match tokens.as_slice() {
            [] => return None,
            [.., "as", local] => *local,
            [.., last] => *last,
        };
        Some(Self {
            text: text.to_string(),
            local: local.to_string(),
        })
    }
}

/// A brace import statement in the leading block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Zero-based line span, inclusive on both ends.
    pub first_line: usize,
    pub last_line: usize,
    pub bindings: Vec<ImportBinding>,
    /// Text before `{`, indentation included.
    head: String,
    /// Text after `}`, e.g. ` from './types';`.
    tail: String,
    indent: String,
}

impl ImportStatement {
    fn render(&self, bindings: &[&ImportBinding]) -> String {
        if bindings.len() <= INLINE_BINDING_LIMIT {
            let names: Vec<&str> = bindings.iter().map(|b| b.text.as_str()).collect();
            format!("{}{{ {} }}{}", self.head, names.join(", "), self.tail)
        } else {
            let body: String = bindings
                .iter()
                .map(|b| format!("{}{},\n", self.indent, b.text))
                .collect();
            format!("{}{{\n{}}}{}", self.head, body, self.tail)
        }
    }
}

/// The parsed leading import block of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBlock {
    pub statements: Vec<ImportStatement>,
    /// First line after the last recognized import line.
    pub body_start: usize,
}

/// Parse the leading import block of `lines`.
///
/// Blank and comment lines between imports are skipped. The block ends at
/// the first line that is neither.
pub fn parse_import_block(lines: &[&str]) -> ImportBlock {
    let mut block = ImportBlock::default();
    let mut i = 0;
    let mut in_block_comment = false;

    while i < lines.len() {
        let trimmed = lines[i].trim();
        if in_block_comment {
            in_block_comment = !trimmed.contains("*/");
            i += 1;
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("/*") {
            in_block_comment = !rest.contains("*/");
            i += 1;
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            i += 1;
            continue;
        }
        if !is_import_start(trimmed) {
            break;
        }
        let Some((last_line, statement)) = parse_statement(lines, i) else {
            break;
        };
        if let Some(statement) = statement {
            block.statements.push(statement);
        }
        i = last_line + 1;
        block.body_start = i;
    }

    block
}

/// Remove or narrow imports whose bindings the body no longer uses.
pub fn clean_orphan_imports(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let block = parse_import_block(&lines);
    if block.statements.is_empty() {
        return content.to_string();
    }

    let body = lines[block.body_start..].join("\n");
    let used = identifiers(&body);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut next = 0;
    for statement in &block.statements {
        out.extend(lines[next..statement.first_line].iter().map(|l| l.to_string()));
        next = statement.last_line + 1;

        let kept: Vec<&ImportBinding> = statement
            .bindings
            .iter()
            .filter(|b| used.contains(b.local.as_str()))
            .collect();

        if kept.len() == statement.bindings.len() {
            out.extend(lines[statement.first_line..next].iter().map(|l| l.to_string()));
        } else if !kept.is_empty() {
            out.push(statement.render(&kept));
        }
    }
    out.extend(lines[next..].iter().map(|l| l.to_string()));

    collapse_blank_lines(&out.join("\n"))
}

/// Every identifier-shaped word in `text`.
pub fn identifiers(text: &str) -> HashSet<&str> {
    let mut words = HashSet::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        match (is_ident_char(ch), start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                push_word(&mut words, &text[s..idx]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_word(&mut words, &text[s..]);
    }

    words
}

fn push_word<'a>(words: &mut HashSet<&'a str>, word: &'a str) {
    if !word.starts_with(|c: char| c.is_ascii_digit()) {
        words.insert(word);
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn is_import_start(trimmed: &str) -> bool {
    trimmed.strip_prefix("import").is_some_and(|rest| {
        rest.starts_with(|c: char| c.is_whitespace() || matches!(c, '{' | '\'' | '"' | '*'))
    })
}

fn has_quote(text: &str) -> bool {
    text.contains(['\'', '"'])
}

/// Parse one import statement starting at `start`.
///
/// Returns its last line and, for cleanable brace imports, the statement.
/// `None` means the statement never terminates and ends the block.
fn parse_statement(lines: &[&str], start: usize) -> Option<(usize, Option<ImportStatement>)> {
    let first = lines[start];
    let quote = first.find(['\'', '"']);
    let brace = first.find('{').filter(|&b| quote.is_none_or(|q| b < q));

    let Some(open) = brace else {
        // Default, namespace or side-effect import; runs until a module string.
        let last = (start..lines.len()).find(|&j| has_quote(lines[j]))?;
        return Some((last, None));
    };

    // Find the closing brace, collecting binding text on the way.
    let mut inner = String::new();
    let mut close: Option<(usize, usize)> = None;
    for (j, line) in lines.iter().enumerate().skip(start) {
        let from = if j == start { open + 1 } else { 0 };
        let segment = &line[from..];
        if j > start && is_import_start(line.trim()) {
            return None;
        }
        match segment.find('}') {
            Some(pos) => {
                inner.push_str(strip_line_comment(&segment[..pos]));
                close = Some((j, from + pos));
                break;
            }
            None => {
                inner.push_str(strip_line_comment(segment));
                inner.push(',');
            }
        }
    }
    let (last, close_at) = close?;

    let head = &first[..open];
    let tail = &lines[last][close_at + 1..];
    // The module string must close the statement on the `}` line.
    let cleanable = matches!(head.trim(), "import" | "import type")
        && tail.trim_start().starts_with("from")
        && has_quote(tail);
    if !cleanable {
        let last = (last..lines.len()).find(|&j| has_quote(lines[j]))?;
        return Some((last, None));
    }

    let bindings = inner.split(',').filter_map(ImportBinding::parse).collect();
    let indent = lines
        .get(start + 1..last)
        .unwrap_or_default()
        .iter()
        .find(|l| !l.trim().is_empty())
        .map(|l| {
            let trimmed_len = l.trim_start().len();
            l[..l.len() - trimmed_len].to_string()
        })
        .filter(|indent| !indent.is_empty())
        .unwrap_or_else(|| DEFAULT_INDENT.to_string());

    Some((
        last,
        Some(ImportStatement {
            first_line: start,
            last_line: last,
            bindings,
            head: head.to_string(),
            tail: tail.to_string(),
            indent,
        }),
    ))
}

fn strip_line_comment(segment: &str) -> &str {
    segment.find("//").map_or(segment, |pos| &segment[..pos])
}
