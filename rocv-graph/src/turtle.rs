//! Turtle parser for profile descriptors and SHACL shape files
//!
//! A recursive-descent parser over the Turtle subset profile directories
//! use: prefix/base directives (both `@prefix` and SPARQL-style `PREFIX`),
//! prefixed names, blank node property lists, collections, object and
//! predicate lists, string/numeric/boolean literals, language tags and
//! `^^` datatypes. Parse errors carry the source line.

use crate::error::{GraphError, Result};
use crate::{Graph, Term};
use rocv_vocab::{rdf, xsd};
use std::collections::HashMap;

/// Parse a Turtle document into a graph
///
/// `base` is the fallback base IRI for relative references; an `@base`
/// directive in the document takes precedence from the point it appears.
pub fn parse(input: &str, base: Option<&str>) -> Result<Graph> {
    let mut parser = Parser::new(input, base);
    parser.run()?;
    parser.graph.dedupe();
    Ok(parser.graph)
}

/// Resolve a relative reference against a base IRI
///
/// Handles the cases profile files produce: absolute IRIs pass through,
/// fragment references replace the base fragment, everything else is
/// joined at the base's last path segment.
fn resolve_relative(base: Option<&str>, reference: &str) -> String {
    if reference.contains("://") || reference.starts_with("urn:") {
        return reference.to_string();
    }
    let Some(base) = base else {
        return reference.to_string();
    };
    if reference.is_empty() {
        return base.to_string();
    }
    if let Some(fragment) = reference.strip_prefix('#') {
        let stem = base.split('#').next().unwrap_or(base);
        return format!("{}#{}", stem, fragment);
    }
    match base.rfind('/') {
        Some(idx) => format!("{}{}", &base[..idx + 1], reference),
        None => reference.to_string(),
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    base: Option<String>,
    prefixes: HashMap<String, String>,
    blank_counter: usize,
    graph: Graph,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, base: Option<&str>) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            base: base.map(str::to_string),
            prefixes: HashMap::new(),
            blank_counter: 0,
            graph: match base {
                Some(b) => Graph::with_base(b),
                None => Graph::new(),
            },
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.skip_ws();
            if self.at_end() {
                return Ok(());
            }
            if self.try_directive()? {
                continue;
            }
            let subject = self.parse_subject()?;
            self.parse_predicate_object_list(&subject)?;
            self.expect(b'.')?;
        }
    }

    // ------------------------------------------------------------------
    // Scanning primitives
    // ------------------------------------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.bump();
                }
                b'#' => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> GraphError {
        GraphError::TurtleSyntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!(
                "expected '{}', found '{}'",
                expected as char, c as char
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", expected as char))),
        }
    }

    /// Case-insensitive keyword match followed by whitespace
    fn try_keyword(&mut self, keyword: &str) -> bool {
        let len = keyword.len();
        if self.pos + len > self.bytes.len() {
            return false;
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        if !slice.eq_ignore_ascii_case(keyword.as_bytes()) {
            return false;
        }
        match self.bytes.get(self.pos + len) {
            Some(c) if c.is_ascii_whitespace() => {
                self.pos += len;
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Directives
    // ------------------------------------------------------------------

    fn try_directive(&mut self) -> Result<bool> {
        if self.peek() == Some(b'@') {
            self.bump();
            if self.try_keyword("prefix") {
                self.parse_prefix_decl()?;
                self.expect(b'.')?;
                return Ok(true);
            }
            if self.try_keyword("base") {
                self.parse_base_decl()?;
                self.expect(b'.')?;
                return Ok(true);
            }
            return Err(self.error("unknown directive"));
        }
        // SPARQL-style directives have no terminating dot
        if self.try_keyword("PREFIX") {
            self.parse_prefix_decl()?;
            return Ok(true);
        }
        if self.try_keyword("BASE") {
            self.parse_base_decl()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_prefix_decl(&mut self) -> Result<()> {
        self.skip_ws();
        let mut prefix = String::new();
        while let Some(c) = self.peek() {
            if c == b':' {
                break;
            }
            if c.is_ascii_whitespace() {
                return Err(self.error("expected ':' in prefix declaration"));
            }
            prefix.push(self.bump().unwrap() as char);
        }
        self.expect(b':')?;
        self.skip_ws();
        let iri = self.parse_iri_ref()?;
        self.prefixes.insert(prefix, iri);
        Ok(())
    }

    fn parse_base_decl(&mut self) -> Result<()> {
        self.skip_ws();
        let iri = self.parse_iri_ref()?;
        self.base = Some(iri);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Terms
    // ------------------------------------------------------------------

    fn parse_iri_ref(&mut self) -> Result<String> {
        self.expect(b'<')?;
        let mut iri = String::new();
        loop {
            match self.bump() {
                Some(b'>') => break,
                Some(b'\\') => {
                    let escaped = self.parse_escape()?;
                    iri.push(escaped);
                }
                Some(c) => self.push_utf8(&mut iri, c),
                None => return Err(self.error("unterminated IRI reference")),
            }
        }
        Ok(resolve_relative(self.base.as_deref(), &iri))
    }

    fn fresh_blank(&mut self) -> Term {
        self.blank_counter += 1;
        Term::blank(format!("g{}", self.blank_counter))
    }

    fn parse_subject(&mut self) -> Result<Term> {
        self.skip_ws();
        match self.peek() {
            Some(b'<') => Ok(Term::iri(self.parse_iri_ref()?)),
            Some(b'_') => self.parse_blank_label(),
            Some(b'[') => self.parse_blank_property_list(),
            Some(b'(') => self.parse_collection(),
            Some(_) => {
                let iri = self.parse_prefixed_name()?;
                Ok(Term::iri(iri))
            }
            None => Err(self.error("expected subject, found end of input")),
        }
    }

    fn parse_blank_label(&mut self) -> Result<Term> {
        // _:label
        self.bump(); // '_'
        self.expect(b':')?;
        let mut label = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' {
                label.push(self.bump().unwrap() as char);
            } else {
                break;
            }
        }
        if label.is_empty() {
            return Err(self.error("empty blank node label"));
        }
        Ok(Term::blank(label))
    }

    fn parse_prefixed_name(&mut self) -> Result<String> {
        let mut prefix = String::new();
        while let Some(c) = self.peek() {
            if c == b':' {
                break;
            }
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' || c == b'.' {
                prefix.push(self.bump().unwrap() as char);
            } else {
                break;
            }
        }
        if self.peek() != Some(b':') {
            return Err(self.error(format!("expected prefixed name, found '{}'", prefix)));
        }
        self.bump(); // ':'

        let mut local = String::new();
        while let Some(c) = self.peek() {
            let ok = c.is_ascii_alphanumeric() || c == b'_' || c == b'-' || c == b'%';
            // A '.' continues the local name only when followed by another
            // name character; otherwise it terminates the statement.
            let dot_continues = c == b'.'
                && self
                    .peek_at(1)
                    .is_some_and(|n| n.is_ascii_alphanumeric() || n == b'_' || n == b'-');
            if ok || dot_continues {
                local.push(self.bump().unwrap() as char);
            } else if c == b'\\' {
                self.bump();
                if let Some(escaped) = self.bump() {
                    local.push(escaped as char);
                }
            } else {
                break;
            }
        }

        let namespace = self
            .prefixes
            .get(&prefix)
            .ok_or_else(|| GraphError::UndeclaredPrefix {
                prefix: prefix.clone(),
                line: self.line,
            })?;
        Ok(format!("{}{}", namespace, local))
    }

    fn parse_blank_property_list(&mut self) -> Result<Term> {
        self.expect(b'[')?;
        let node = self.fresh_blank();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.bump();
            return Ok(node);
        }
        self.parse_predicate_object_list(&node)?;
        self.expect(b']')?;
        Ok(node)
    }

    fn parse_collection(&mut self) -> Result<Term> {
        self.expect(b'(')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b')') {
                self.bump();
                break;
            }
            if self.at_end() {
                return Err(self.error("unterminated collection"));
            }
            items.push(self.parse_object()?);
        }

        if items.is_empty() {
            return Ok(Term::iri(rdf::NIL));
        }

        let head = self.fresh_blank();
        let mut node = head.clone();
        for (i, item) in items.iter().enumerate() {
            self.graph
                .add_triple(node.clone(), Term::iri(rdf::FIRST), item.clone());
            if i + 1 == items.len() {
                self.graph
                    .add_triple(node.clone(), Term::iri(rdf::REST), Term::iri(rdf::NIL));
            } else {
                let next = self.fresh_blank();
                self.graph
                    .add_triple(node.clone(), Term::iri(rdf::REST), next.clone());
                node = next;
            }
        }
        Ok(head)
    }

    fn parse_verb(&mut self) -> Result<Term> {
        self.skip_ws();
        // 'a' shorthand for rdf:type
        if self.peek() == Some(b'a')
            && self
                .peek_at(1)
                .map_or(true, |c| c.is_ascii_whitespace() || c == b'[' || c == b'<')
        {
            self.bump();
            return Ok(Term::iri(rdf::TYPE));
        }
        match self.peek() {
            Some(b'<') => Ok(Term::iri(self.parse_iri_ref()?)),
            Some(_) => Ok(Term::iri(self.parse_prefixed_name()?)),
            None => Err(self.error("expected predicate, found end of input")),
        }
    }

    fn parse_predicate_object_list(&mut self, subject: &Term) -> Result<()> {
        loop {
            let predicate = self.parse_verb()?;
            loop {
                let object = self.parse_object()?;
                self.graph
                    .add_triple(subject.clone(), predicate.clone(), object);
                self.skip_ws();
                if self.peek() == Some(b',') {
                    self.bump();
                    continue;
                }
                break;
            }
            self.skip_ws();
            let mut saw_semicolon = false;
            while self.peek() == Some(b';') {
                self.bump();
                self.skip_ws();
                saw_semicolon = true;
            }
            if !saw_semicolon {
                break;
            }
            // Trailing ';' before '.' or ']' is legal Turtle
            match self.peek() {
                Some(b'.') | Some(b']') | None => break,
                _ => continue,
            }
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Term> {
        self.skip_ws();
        match self.peek() {
            Some(b'<') => Ok(Term::iri(self.parse_iri_ref()?)),
            Some(b'_') => self.parse_blank_label(),
            Some(b'[') => self.parse_blank_property_list(),
            Some(b'(') => self.parse_collection(),
            Some(b'"') | Some(b'\'') => self.parse_literal(),
            Some(c) if c.is_ascii_digit() || c == b'+' || c == b'-' => self.parse_numeric(),
            Some(_) => {
                if self.try_keyword_boundary("true") {
                    return Ok(Term::boolean(true));
                }
                if self.try_keyword_boundary("false") {
                    return Ok(Term::boolean(false));
                }
                Ok(Term::iri(self.parse_prefixed_name()?))
            }
            None => Err(self.error("expected object, found end of input")),
        }
    }

    /// Match a bare keyword (`true` / `false`) at a token boundary
    fn try_keyword_boundary(&mut self, keyword: &str) -> bool {
        let len = keyword.len();
        if self.pos + len > self.bytes.len() {
            return false;
        }
        if &self.bytes[self.pos..self.pos + len] != keyword.as_bytes() {
            return false;
        }
        match self.bytes.get(self.pos + len) {
            Some(c) if c.is_ascii_alphanumeric() || *c == b'_' || *c == b':' => false,
            _ => {
                self.pos += len;
                true
            }
        }
    }

    fn parse_literal(&mut self) -> Result<Term> {
        let quote = self.peek().unwrap();
        let long = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        let value = if long {
            self.parse_long_string(quote)?
        } else {
            self.parse_short_string(quote)?
        };

        // Optional language tag or datatype
        match self.peek() {
            Some(b'@') => {
                self.bump();
                let mut lang = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == b'-' {
                        lang.push(self.bump().unwrap() as char);
                    } else {
                        break;
                    }
                }
                if lang.is_empty() {
                    return Err(self.error("empty language tag"));
                }
                Ok(Term::lang_string(value, lang))
            }
            Some(b'^') => {
                self.bump();
                self.expect(b'^')?;
                self.skip_ws();
                let datatype = match self.peek() {
                    Some(b'<') => self.parse_iri_ref()?,
                    _ => self.parse_prefixed_name()?,
                };
                match datatype.as_str() {
                    xsd::INTEGER => match value.parse::<i64>() {
                        Ok(i) => Ok(Term::integer(i)),
                        Err(_) => Ok(Term::typed(value, datatype)),
                    },
                    xsd::BOOLEAN => match value.parse::<bool>() {
                        Ok(b) => Ok(Term::boolean(b)),
                        Err(_) => Ok(Term::typed(value, datatype)),
                    },
                    xsd::STRING => Ok(Term::string(value)),
                    _ => Ok(Term::typed(value, datatype)),
                }
            }
            _ => Ok(Term::string(value)),
        }
    }

    fn parse_short_string(&mut self, quote: u8) -> Result<String> {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => break,
                Some(b'\\') => value.push(self.parse_escape()?),
                Some(b'\n') => return Err(self.error("newline in string literal")),
                Some(c) => self.push_utf8(&mut value, c),
                None => return Err(self.error("unterminated string literal")),
            }
        }
        Ok(value)
    }

    fn parse_long_string(&mut self, quote: u8) -> Result<String> {
        self.bump();
        self.bump();
        self.bump(); // opening triple quote
        let mut value = String::new();
        loop {
            if self.peek() == Some(quote)
                && self.peek_at(1) == Some(quote)
                && self.peek_at(2) == Some(quote)
            {
                // A quote run longer than three keeps the extras as content
                if self.peek_at(3) == Some(quote) {
                    self.bump();
                    value.push(quote as char);
                    continue;
                }
                self.bump();
                self.bump();
                self.bump();
                break;
            }
            match self.bump() {
                Some(b'\\') => value.push(self.parse_escape()?),
                Some(c) => self.push_utf8(&mut value, c),
                None => return Err(self.error("unterminated long string literal")),
            }
        }
        Ok(value)
    }

    /// Re-assemble multi-byte UTF-8 sequences split by byte-level scanning
    fn push_utf8(&mut self, out: &mut String, first: u8) {
        if first.is_ascii() {
            out.push(first as char);
            return;
        }
        let extra = match first {
            0xC0..=0xDF => 1,
            0xE0..=0xEF => 2,
            _ => 3,
        };
        let mut buf = vec![first];
        for _ in 0..extra {
            if let Some(c) = self.bump() {
                buf.push(c);
            }
        }
        out.push_str(&String::from_utf8_lossy(&buf));
    }

    fn parse_escape(&mut self) -> Result<char> {
        match self.bump() {
            Some(b't') => Ok('\t'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b'b') => Ok('\u{8}'),
            Some(b'f') => Ok('\u{c}'),
            Some(b'"') => Ok('"'),
            Some(b'\'') => Ok('\''),
            Some(b'\\') => Ok('\\'),
            Some(b'u') => self.parse_unicode_escape(4),
            Some(b'U') => self.parse_unicode_escape(8),
            Some(c) => Err(self.error(format!("invalid escape '\\{}'", c as char))),
            None => Err(self.error("unterminated escape")),
        }
    }

    fn parse_unicode_escape(&mut self, digits: usize) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let c = self
                .bump()
                .ok_or_else(|| self.error("unterminated unicode escape"))?;
            let digit = (c as char)
                .to_digit(16)
                .ok_or_else(|| self.error("invalid unicode escape digit"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode code point"))
    }

    fn parse_numeric(&mut self) -> Result<Term> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.bump();
        }
        let mut is_double = false;
        let mut has_dot = false;
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => {
                    self.bump();
                }
                // A '.' is part of the number only when followed by a digit;
                // otherwise it terminates the statement.
                b'.' if !has_dot
                    && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) =>
                {
                    has_dot = true;
                    self.bump();
                }
                b'e' | b'E' => {
                    is_double = true;
                    self.bump();
                    if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.error("invalid numeric literal"))?;
        if is_double || has_dot {
            let value: f64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid numeric literal '{}'", text)))?;
            if is_double {
                Ok(Term::double(value))
            } else {
                Ok(Term::typed(text, xsd::DECIMAL))
            }
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid numeric literal '{}'", text)))?;
            Ok(Term::integer(value))
        }
    }
}
