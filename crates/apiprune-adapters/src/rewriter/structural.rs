//! Structural config rewriter.
//!
//! Tokenizes the module with logos and walks the object literals reachable
//! from the configuration binding, either
//!
//! ```ts
//! export const config = { local: { ... }, develop: { ... } };
//! ```
//!
//! or the object arguments of a merge-style call
//!
//! ```ts
//! const config = merge(base, { local: { ... } }, [{ develop: { ... } }]);
//! ```
//!
//! Edits are byte-range replacements on the original text, so comments and
//! formatting outside the edited properties survive untouched.

use std::ops::Range;

use apiprune_core::{
    application::{ApplicationError, ports::ConfigRewriter},
    domain::{ConfigEdits, PropertyEdit},
    error::PruneResult,
};
use logos::{Lexer, Logos};
use tracing::{debug, instrument};

const STRATEGY: &str = "structural";

/// Raw tokens of a JavaScript/TypeScript module, just enough to find
/// object literal boundaries.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[token("//", skip_line)]
    LineComment,
    #[token("/*", skip_block)]
    BlockComment,
    #[token("\"", |lex| close_quote(lex, '"'))]
    #[token("'", |lex| close_quote(lex, '\''))]
    #[token("`", |lex| close_quote(lex, '`'))]
    Str,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("=", priority = 3)]
    Assign,
    #[token(".")]
    Dot,
    #[token("...")]
    Spread,
    #[token("/")]
    Slash,
    #[token("@")]
    At,
    #[token("#")]
    Hash,
    #[regex(r"[+\-*%<>!&|^~?=]+")]
    Operator,
}

fn skip_line(lex: &mut Lexer<RawToken>) {
    let rest = lex.remainder();
    lex.bump(rest.find('\n').unwrap_or(rest.len()));
}

fn skip_block(lex: &mut Lexer<RawToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Consume up to and including the closing `quote`, honoring escapes.
/// Only template literals may span lines.
fn close_quote(lex: &mut Lexer<RawToken>, quote: char) -> bool {
    let mut escaped = false;
    for (idx, ch) in lex.remainder().char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\n' if quote != '`' => return false,
            c if c == quote => {
                lex.bump(idx + c.len_utf8());
                return true;
            }
            _ => {}
        }
    }
    false
}

/// A significant token. `kind` is `None` for input the lexer rejected.
#[derive(Debug, Clone)]
struct Token {
    kind: Option<RawToken>,
    span: Range<usize>,
}

fn tokenize(source: &str) -> Vec<Token> {
    RawToken::lexer(source)
        .spanned()
        .filter_map(|(result, span)| match result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => None,
            Ok(kind) => Some(Token {
                kind: Some(kind),
                span,
            }),
            Err(()) => Some(Token { kind: None, span }),
        })
        .collect()
}

/// Object-literal rewriter backed by a logos token stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralRewriter;

impl StructuralRewriter {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigRewriter for StructuralRewriter {
    fn name(&self) -> &'static str {
        STRATEGY
    }

    #[instrument(skip_all, fields(binding = %edits.binding))]
    fn rewrite(&self, source: &str, edits: &ConfigEdits) -> PruneResult<String> {
        let tokens = tokenize(source);
        let mut walker = Walker {
            source,
            tokens: &tokens,
            config: edits,
            edits: Vec::new(),
        };

        let roots = walker.locate_roots().map_err(failed)?;
        debug!(objects = roots.len(), "Config objects located");
        for open in roots {
            walker.walk_object(open).map_err(failed)?;
        }

        Ok(apply(source, walker.edits))
    }
}

fn failed(reason: String) -> apiprune_core::error::PruneError {
    ApplicationError::RewriteFailed {
        strategy: STRATEGY,
        reason,
    }
    .into()
}

struct Walker<'a> {
    source: &'a str,
    tokens: &'a [Token],
    config: &'a ConfigEdits,
    edits: Vec<(Range<usize>, String)>,
}

type WalkResult<T> = Result<T, String>;

impl Walker<'_> {
    fn kind(&self, i: usize) -> Option<RawToken> {
        self.tokens.get(i).and_then(|t| t.kind)
    }

    fn text(&self, i: usize) -> &str {
        self.tokens
            .get(i)
            .map_or("", |t| &self.source[t.span.clone()])
    }

    fn is_ident(&self, i: usize, words: &[&str]) -> bool {
        self.kind(i) == Some(RawToken::Ident) && words.contains(&self.text(i))
    }

    /// Token indices of the object literals that make up the config.
    fn locate_roots(&self) -> WalkResult<Vec<usize>> {
        let binding = self.config.binding.as_str();
        let decl = (0..self.tokens.len())
            .find(|&i| self.is_ident(i, &["const", "let", "var"]) && self.is_ident(i + 1, &[binding]))
            .ok_or_else(|| format!("no declaration of `{binding}`"))?;

        let mut i = decl + 2;
        if self.kind(i) == Some(RawToken::Colon) {
            i = self.find_top_level(i + 1, RawToken::Assign)?;
        }
        if self.kind(i) != Some(RawToken::Assign) {
            return Err(format!("`{binding}` has no initializer"));
        }
        i += 1;

        if self.kind(i) == Some(RawToken::BraceOpen) {
            return Ok(vec![i]);
        }

        // Callee path such as `merge`, `_.merge` or `Object.assign`.
        while matches!(self.kind(i), Some(RawToken::Ident | RawToken::Dot)) {
            i += 1;
        }
        if self.kind(i) != Some(RawToken::ParenOpen) {
            return Err(format!(
                "`{binding}` is neither an object literal nor a call: found `{}`",
                self.text(i)
            ));
        }

        let close = self.matching(i)?;
        let mut roots = Vec::new();
        self.collect_objects(i + 1, close, &mut roots)?;
        if roots.is_empty() {
            return Err(format!("the `{binding}` call has no object literal arguments"));
        }
        Ok(roots)
    }

    /// Object literals at the top level of `start..end`, looking into
    /// array literals but not into calls.
    fn collect_objects(&self, start: usize, end: usize, roots: &mut Vec<usize>) -> WalkResult<()> {
        let mut i = start;
        while i < end {
            match self.kind(i) {
                Some(RawToken::BraceOpen) => {
                    roots.push(i);
                    i = self.matching(i)? + 1;
                }
                Some(RawToken::BracketOpen) => {
                    let close = self.matching(i)?;
                    self.collect_objects(i + 1, close, roots)?;
                    i = close + 1;
                }
                Some(RawToken::ParenOpen) => i = self.matching(i)? + 1,
                _ => i += 1,
            }
        }
        Ok(())
    }

    fn find_top_level(&self, mut i: usize, target: RawToken) -> WalkResult<usize> {
        while i < self.tokens.len() {
            match self.kind(i) {
                Some(kind) if kind == target => return Ok(i),
                Some(RawToken::BraceOpen | RawToken::ParenOpen | RawToken::BracketOpen) => {
                    i = self.matching(i)? + 1;
                }
                _ => i += 1,
            }
        }
        Err(format!("expected `{target:?}` before end of module"))
    }

    /// Index of the bracket closing the one at `open`.
    fn matching(&self, open: usize) -> WalkResult<usize> {
        let mut stack: Vec<RawToken> = Vec::new();
        for i in open..self.tokens.len() {
            let kind = self.kind(i);
            let closer = match kind {
                Some(RawToken::BraceOpen) => Some(RawToken::BraceClose),
                Some(RawToken::ParenOpen) => Some(RawToken::ParenClose),
                Some(RawToken::BracketOpen) => Some(RawToken::BracketClose),
                _ => None,
            };
            if let Some(closer) = closer {
                stack.push(closer);
                continue;
            }
            match kind {
                Some(RawToken::BraceClose | RawToken::ParenClose | RawToken::BracketClose) => {
                    if stack.pop() != kind {
                        return Err(format!("unbalanced `{}` at byte {}", self.text(i), self.tokens[i].span.start));
                    }
                    if stack.is_empty() {
                        return Ok(i);
                    }
                }
                None if !stack.is_empty() => {
                    return Err(format!(
                        "unrecognized input `{}` at byte {}",
                        self.text(i),
                        self.tokens[i].span.start
                    ));
                }
                _ => {}
            }
        }
        Err("unterminated bracket".into())
    }

    /// Index of the comma ending the property at `i`, or `close`.
    fn property_end(&self, mut i: usize, close: usize) -> WalkResult<usize> {
        while i < close {
            match self.kind(i) {
                Some(RawToken::Comma) => return Ok(i),
                Some(RawToken::BraceOpen | RawToken::ParenOpen | RawToken::BracketOpen) => {
                    i = self.matching(i)? + 1;
                }
                _ => i += 1,
            }
        }
        Ok(close)
    }

    fn walk_object(&mut self, open: usize) -> WalkResult<()> {
        let close = self.matching(open)?;
        let mut i = open + 1;
        while i < close {
            let end = self.property_end(i, close)?;
            self.visit_property(i, end)?;
            i = end + 1;
        }
        Ok(())
    }

    /// Visit the property spanning tokens `start..end`; `end` is its comma
    /// or the closing brace.
    fn visit_property(&mut self, start: usize, end: usize) -> WalkResult<()> {
        // Spreads, shorthands, methods and computed keys are left alone.
        let keyed = matches!(
            self.kind(start),
            Some(RawToken::Ident | RawToken::Str | RawToken::Number)
        ) && self.kind(start + 1) == Some(RawToken::Colon);
        if start >= end || !keyed {
            return Ok(());
        }

        let key = unquote(self.text(start));
        let value = start + 2;
        if value >= end {
            return Err(format!("property `{key}` has no value"));
        }
        let is_object =
            self.kind(value) == Some(RawToken::BraceOpen) && self.matching(value)? == end - 1;

        match self.config.edit_for(key) {
            PropertyEdit::Delete => {
                let range = self.deletion_range(start, end);
                debug!(key, "Deleting property");
                self.edits.push((range, String::new()));
            }
            PropertyEdit::FlipToFalse if is_object => {
                let range = self.tokens[value].span.start..self.tokens[end - 1].span.end;
                debug!(key, "Replacing object with false");
                self.edits.push((range, "false".into()));
            }
            PropertyEdit::Recurse if is_object => self.walk_object(value)?,
            _ => {}
        }
        Ok(())
    }

    /// Whole lines when the property sits alone on its line (a trailing
    /// line comment goes with it), otherwise just the property text.
    fn deletion_range(&self, start: usize, end: usize) -> Range<usize> {
        let key_start = self.tokens[start].span.start;
        let after = if self.kind(end) == Some(RawToken::Comma) {
            self.tokens[end].span.end
        } else {
            self.tokens[end - 1].span.end
        };

        let line_start = self.source[..key_start].rfind('\n').map_or(0, |i| i + 1);
        let rest = &self.source[after..];
        let line_len = rest.find('\n').unwrap_or(rest.len());
        let tail = rest[..line_len].trim();

        let alone = self.source[line_start..key_start].trim().is_empty()
            && (tail.is_empty() || tail.starts_with("//"));
        if alone {
            let newline = usize::from(line_len < rest.len());
            line_start..after + line_len + newline
        } else {
            let spaces = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            key_start..after + spaces
        }
    }
}

fn unquote(key: &str) -> &str {
    key.strip_prefix(['"', '\''])
        .and_then(|k| k.strip_suffix(['"', '\'']))
        .unwrap_or(key)
}

/// Apply non-overlapping edits back to front.
fn apply(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut out = source.to_string();
    for (range, replacement) in edits {
        out.replace_range(range, &replacement);
    }
    out
}
