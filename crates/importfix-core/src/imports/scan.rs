//! Import clause scanner.
//!
//! Scans JavaScript/TypeScript source code for import/export/require
//! specifiers without full parsing. Comments, string literals, template
//! literals, regex literals and JSX elements are skipped, so a
//! specifier-shaped string inside them is never reported and a stray quote in
//! JSX text or a regex does not hide the clauses after it. Every clause carries the byte span of its specifier text, which
//! is what the rewriter substitutes.
//!
//! All syntax the scanner looks for is ASCII, so it walks bytes; spans always
//! fall on UTF-8 boundaries because they are delimited by ASCII quotes.

/// Byte range in the source (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Syntactic form of an import clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// `import x from "..."` or side-effect `import "..."`.
    EsmImport,
    /// `export ... from "..."`.
    EsmExport,
    /// `import("...")`.
    DynamicImport,
    /// `require("...")`.
    CjsRequire,
}

impl ClauseKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EsmImport => "esm_import",
            Self::EsmExport => "esm_export",
            Self::DynamicImport => "dynamic_import",
            Self::CjsRequire => "cjs_require",
        }
    }
}

/// Import clause found in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportClause {
    /// Specifier exactly as found (without quotes).
    pub specifier: String,
    /// Span of the specifier text, excluding quotes.
    pub span: Span,
    /// Quote character, or `None` for an unquoted `from ./path` clause.
    pub quote: Option<char>,
    /// Line number (1-indexed).
    pub line: u32,
    pub kind: ClauseKind,
}

impl ImportClause {
    /// Whether the specifier was written without quotes.
    #[must_use]
    pub fn is_unquoted(&self) -> bool {
        self.quote.is_none()
    }
}

/// Scan source code for import clauses.
///
/// Returns every clause in source order; repeated specifiers are reported once
/// per occurrence.
#[must_use]
pub fn scan_imports(source: &str) -> Vec<ImportClause> {
    let mut scanner = Scanner::new(source);
    scanner.run();
    scanner.clauses
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    line_cursor: usize,
    clauses: Vec<ImportClause>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            line_cursor: 0,
            clauses: Vec::new(),
        }
    }

    fn run(&mut self) {
        let len = self.bytes.len();

        while self.pos < len {
            let c = self.bytes[self.pos];

            if self.skip_comment() {
                continue;
            }

            match c {
                b'"' | b'\'' => {
                    self.skip_string(c);
                    continue;
                }
                b'`' => {
                    self.skip_template();
                    continue;
                }
                b'/' if self.at_expression_start() => {
                    self.skip_regex();
                    continue;
                }
                b'<' if self.at_expression_start() && self.skip_jsx() => continue,
                _ => {}
            }

            if self.at_keyword("import") {
                let start = self.pos;
                self.pos += 6;
                if !self.scan_import() {
                    self.pos = start + 6;
                }
                continue;
            }

            if self.at_keyword("export") {
                let start = self.pos;
                self.pos += 6;
                if !self.scan_export() {
                    self.pos = start + 6;
                }
                continue;
            }

            if self.at_keyword("require") {
                let start = self.pos;
                self.pos += 7;
                if !self.scan_call(ClauseKind::CjsRequire) {
                    self.pos = start + 7;
                }
                continue;
            }

            self.pos += 1;
        }
    }

    /// `import` has been consumed.
    fn scan_import(&mut self) -> bool {
        self.skip_trivia();

        match self.peek() {
            // Dynamic import: import("...")
            Some(b'(') => self.scan_call(ClauseKind::DynamicImport),
            // Side-effect import: import "..."
            Some(b'"' | b'\'') => self.read_quoted(ClauseKind::EsmImport),
            // import.meta and friends
            Some(b'.') | None => false,
            Some(_) => self.scan_bindings_then_from(ClauseKind::EsmImport),
        }
    }

    /// `export` has been consumed. Only `export * [as x] from` and
    /// `export [type] { ... } from` carry a specifier.
    fn scan_export(&mut self) -> bool {
        self.skip_trivia();
        if self.at_keyword("type") {
            self.pos += 4;
            self.skip_trivia();
        }

        match self.peek() {
            Some(b'*') => {
                self.pos += 1;
                self.skip_trivia();
                if self.at_keyword("as") {
                    self.pos += 2;
                    self.skip_trivia();
                    if !self.skip_identifier() {
                        return false;
                    }
                    self.skip_trivia();
                }
                self.scan_from(ClauseKind::EsmExport)
            }
            Some(b'{') => {
                if !self.skip_braces() {
                    return false;
                }
                self.skip_trivia();
                self.scan_from(ClauseKind::EsmExport)
            }
            _ => false,
        }
    }

    /// Walk import bindings (`type`, default name, `* as ns`, `{ ... }`,
    /// commas) until the `from` keyword.
    fn scan_bindings_then_from(&mut self, kind: ClauseKind) -> bool {
        loop {
            self.skip_trivia();
            let Some(c) = self.peek() else {
                return false;
            };

            if self.at_keyword("from") {
                let save = self.pos;
                if self.scan_from(kind) {
                    return true;
                }
                // `from` used as a binding name
                self.pos = save + 4;
                continue;
            }

            match c {
                b'{' => {
                    if !self.skip_braces() {
                        return false;
                    }
                }
                b',' | b'*' => self.pos += 1,
                _ if is_ident_byte(c) => {
                    self.skip_identifier();
                }
                _ => return false,
            }
        }
    }

    /// Expect `from` followed by a quoted (or bare relative) specifier.
    fn scan_from(&mut self, kind: ClauseKind) -> bool {
        if !self.at_keyword("from") {
            return false;
        }
        self.pos += 4;
        self.skip_trivia();

        match self.peek() {
            Some(b'"' | b'\'') => self.read_quoted(kind),
            Some(b'.') => self.read_unquoted(kind),
            _ => false,
        }
    }

    /// `(` "spec" `)` for dynamic import and require.
    fn scan_call(&mut self, kind: ClauseKind) -> bool {
        self.skip_trivia();
        if self.peek() != Some(b'(') {
            return false;
        }
        self.pos += 1;
        self.skip_trivia();

        if !matches!(self.peek(), Some(b'"' | b'\'')) {
            return false;
        }

        let checkpoint = self.clauses.len();
        if !self.read_quoted(kind) {
            return false;
        }

        // Only plain calls: import("x") / import("x", opts) / require("x")
        self.skip_trivia();
        if matches!(self.peek(), Some(b')' | b',')) {
            true
        } else {
            self.clauses.truncate(checkpoint);
            false
        }
    }

    /// Read a quoted specifier at `pos` and record it.
    fn read_quoted(&mut self, kind: ClauseKind) -> bool {
        let quote = self.bytes[self.pos];
        let start = self.pos + 1;
        let mut i = start;

        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return false,
                c if c == quote => {
                    self.push(kind, Span::new(start, i), Some(quote as char));
                    self.pos = i + 1;
                    return true;
                }
                _ => i += 1,
            }
        }

        false
    }

    /// Read an unquoted relative path (`from ../a/b;`), as written by hand
    /// edits gone wrong. Ends at whitespace, `;` or a quote.
    fn read_unquoted(&mut self, kind: ClauseKind) -> bool {
        let rest = &self.src[self.pos..];
        if !(rest.starts_with("./") || rest.starts_with("../")) {
            return false;
        }

        let start = self.pos;
        let mut i = start;
        while i < self.bytes.len() {
            let c = self.bytes[i];
            if c.is_ascii_whitespace() || matches!(c, b';' | b'"' | b'\'' | b'`' | b')' | b',') {
                break;
            }
            i += 1;
        }

        self.push(kind, Span::new(start, i), None);
        self.pos = i;
        true
    }

    fn push(&mut self, kind: ClauseKind, span: Span, quote: Option<char>) {
        let line = self.line_at(span.start);
        self.clauses.push(ImportClause {
            specifier: self.src[span.start..span.end].to_string(),
            span,
            quote,
            line,
            kind,
        });
    }

    /// Line of `offset`. Counting resumes from the previous offset.
    fn line_at(&mut self, offset: usize) -> u32 {
        if offset < self.line_cursor {
            self.line = 1;
            self.line_cursor = 0;
        }
        let newlines = self.bytes[self.line_cursor..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.line = self
            .line
            .saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX));
        self.line_cursor = offset;
        self.line
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Skip a comment at `pos`; returns whether one was skipped.
    fn skip_comment(&mut self) -> bool {
        let Some(rest) = self.bytes.get(self.pos..) else {
            return false;
        };
        if rest.starts_with(b"//") {
            while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                self.pos += 1;
            }
            true
        } else if rest.starts_with(b"/*") {
            self.pos += 2;
            while self.pos + 1 < self.bytes.len()
                && !(self.bytes[self.pos] == b'*' && self.bytes[self.pos + 1] == b'/')
            {
                self.pos += 1;
            }
            self.pos = (self.pos + 2).min(self.bytes.len());
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                self.pos += 1;
            }
            if !self.skip_comment() {
                break;
            }
        }
    }

    fn skip_string(&mut self, quote: u8) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' => {
                    self.pos += 1;
                    return;
                }
                c if c == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Skip a template literal, including `${ ... }` substitutions.
    fn skip_template(&mut self) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return;
                }
                b'$' if self.bytes.get(self.pos + 1) == Some(&b'{') => {
                    self.pos += 1;
                    self.skip_braces();
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Skip a balanced `{ ... }` block at `pos`, honouring strings and
    /// comments inside it.
    fn skip_braces(&mut self) -> bool {
        let mut depth = 0usize;
        while self.pos < self.bytes.len() {
            if self.skip_comment() {
                continue;
            }
            match self.bytes[self.pos] {
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    self.pos += 1;
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return true;
                    }
                }
                q @ (b'"' | b'\'') => self.skip_string(q),
                b'`' => self.skip_template(),
                _ => self.pos += 1,
            }
        }
        false
    }

    /// Whether a token starting at `pos` is in expression position, judged by
    /// the previous significant byte. Decides regex-vs-division and
    /// JSX-vs-less-than.
    fn at_expression_start(&self) -> bool {
        let mut i = self.pos;
        while i > 0 && self.bytes[i - 1].is_ascii_whitespace() {
            i -= 1;
        }
        let Some(&prev) = i.checked_sub(1).and_then(|p| self.bytes.get(p)) else {
            return true;
        };

        if is_ident_byte(prev) {
            let end = i;
            while i > 0 && is_ident_byte(self.bytes[i - 1]) {
                i -= 1;
            }
            return EXPRESSION_KEYWORDS
                .iter()
                .any(|kw| *kw.as_bytes() == self.bytes[i..end]);
        }

        !matches!(prev, b')' | b']' | b'"' | b'\'' | b'`')
    }

    /// Skip a regex literal body at `pos` (`/.../`); flags are left to the
    /// main loop. A `/` with no closing slash on its line is stepped over.
    fn skip_regex(&mut self) {
        let mut i = self.pos + 1;
        let mut in_class = false;

        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => break,
                b'[' => {
                    in_class = true;
                    i += 1;
                }
                b']' => {
                    in_class = false;
                    i += 1;
                }
                b'/' if !in_class => {
                    self.pos = i + 1;
                    return;
                }
                _ => i += 1,
            }
        }

        self.pos += 1;
    }

    /// Skip a JSX element (or fragment) at `pos`, including its children.
    /// Text between tags is raw, so quotes and backticks in it open nothing.
    /// Returns `false` with `pos` unchanged when `<` does not start a
    /// balanced element (a comparison, a type assertion).
    fn skip_jsx(&mut self) -> bool {
        let start = self.pos;
        let mut depth = 0usize;

        loop {
            if !self.skip_jsx_tag(&mut depth) {
                self.pos = start;
                return false;
            }
            if depth == 0 {
                return true;
            }

            // Children up to the next tag
            loop {
                match self.peek() {
                    None => {
                        self.pos = start;
                        return false;
                    }
                    Some(b'<') => break,
                    Some(b'{') => {
                        if !self.skip_braces() {
                            self.pos = start;
                            return false;
                        }
                    }
                    Some(_) => self.pos += 1,
                }
            }
        }
    }

    /// One JSX tag at `pos` (`<a ...>`, `<a />`, `</a>`, `<>`, `</>`),
    /// tracking element depth.
    fn skip_jsx_tag(&mut self, depth: &mut usize) -> bool {
        self.pos += 1;

        if self.peek() == Some(b'/') {
            if *depth == 0 {
                return false;
            }
            while let Some(c) = self.peek() {
                self.pos += 1;
                if c == b'>' {
                    *depth -= 1;
                    return true;
                }
            }
            return false;
        }

        match self.peek() {
            Some(b'>') => {
                self.pos += 1;
                *depth += 1;
                return true;
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' || c == b'$' => {}
            _ => return false,
        }

        while let Some(c) = self.peek() {
            match c {
                b'"' | b'\'' => self.skip_string(c),
                b'{' => {
                    if !self.skip_braces() {
                        return false;
                    }
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    return true;
                }
                b'>' => {
                    self.pos += 1;
                    *depth += 1;
                    return true;
                }
                _ => self.pos += 1,
            }
        }
        false
    }

    fn skip_identifier(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Check if the bytes at `pos` are `keyword` with word boundaries on both
    /// sides. A preceding `.` also disqualifies (`obj.import`).
    fn at_keyword(&self, keyword: &str) -> bool {
        let kw = keyword.as_bytes();
        let end = self.pos + kw.len();

        if end > self.bytes.len() || &self.bytes[self.pos..end] != kw {
            return false;
        }

        if self.pos > 0 {
            let prev = self.bytes[self.pos - 1];
            if is_ident_byte(prev) || prev == b'.' {
                return false;
            }
        }

        !self.bytes.get(end).is_some_and(|&c| is_ident_byte(c))
    }
}

/// Keywords after which `/` starts a regex and `<` may start JSX.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "of", "yield", "await", "void", "delete",
    "instanceof", "new", "throw",
];

fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}
