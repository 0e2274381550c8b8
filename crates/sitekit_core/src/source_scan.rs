//! Scanners for the two application sources the verifier cross-checks: the
//! route-constant table and the router registration file.
//!
//! Route-constant table grammar (whitespace, `//` and `/* */` comments ignored):
//!
//! ```text
//! table  := 'ROUTES' <anything> '=' '{' entry* '}'
//! entry  := key ':' string ','?
//! key    := IDENT | string
//! string := '...' | "..." | `...`   (no `${` interpolation)
//! ```
//!
//! Router registrations are `<Route ...>` tags whose `path` attribute is a
//! string literal (`path="/about"`, `path={'/about'}`) or a symbolic reference
//! (`path={ROUTES.ABOUT}`). Tags without `path` are layout or index routes.
//! Comments and string literals outside a tag are skipped, so commented-out
//! or quoted `<Route>` text never registers.
//! Anything that does not fit is reported as a problem instead of skipped.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteConstants {
    pub entries: Vec<(String, String)>,
    pub problems: Vec<String>,
}

impl RouteConstants {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Str { value: String, interpolated: bool },
    Punct(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    line: usize,
}

fn tokenize(source: &str) -> (Vec<Token>, Vec<String>) {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut problems = Vec::new();
    let mut index = 0usize;
    let mut line = 1usize;

    while index < chars.len() {
        let ch = chars[index];
        if ch == '\n' {
            line += 1;
            index += 1;
            continue;
        }
        if ch.is_whitespace() {
            index += 1;
            continue;
        }
        if ch == '/' && chars.get(index + 1) == Some(&'/') {
            while index < chars.len() && chars[index] != '\n' {
                index += 1;
            }
            continue;
        }
        if ch == '/' && chars.get(index + 1) == Some(&'*') {
            index += 2;
            while index < chars.len() && !(chars[index] == '*' && chars.get(index + 1) == Some(&'/'))
            {
                if chars[index] == '\n' {
                    line += 1;
                }
                index += 1;
            }
            index = (index + 2).min(chars.len());
            continue;
        }
        if ch == '\'' || ch == '"' || ch == '`' {
            let start_line = line;
            let mut value = String::new();
            let mut interpolated = false;
            let mut closed = false;
            index += 1;
            while index < chars.len() {
                let current = chars[index];
                if current == '\\' {
                    if let Some(next) = chars.get(index + 1) {
                        value.push(*next);
                    }
                    index += 2;
                    continue;
                }
                if current == ch {
                    closed = true;
                    index += 1;
                    break;
                }
                if current == '\n' {
                    if ch != '`' {
                        break;
                    }
                    line += 1;
                }
                if ch == '`' && current == '$' && chars.get(index + 1) == Some(&'{') {
                    interpolated = true;
                }
                value.push(current);
                index += 1;
            }
            if !closed {
                problems.push(format!("line {start_line}: unterminated string literal"));
            }
            tokens.push(Token {
                kind: TokenKind::Str {
                    value,
                    interpolated,
                },
                line: start_line,
            });
            continue;
        }
        if ch.is_alphabetic() || ch == '_' || ch == '$' {
            let start = index;
            while index < chars.len()
                && (chars[index].is_alphanumeric() || chars[index] == '_' || chars[index] == '$')
            {
                index += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(chars[start..index].iter().collect()),
                line,
            });
            continue;
        }
        tokens.push(Token {
            kind: TokenKind::Punct(ch),
            line,
        });
        index += 1;
    }

    (tokens, problems)
}

/// Parse the `ROUTES = { KEY: '/path', ... }` table out of a source file.
pub fn parse_route_constants(source: &str) -> RouteConstants {
    let (tokens, mut problems) = tokenize(source);
    let mut entries: Vec<(String, String)> = Vec::new();

    let Some(open) = find_table_open(&tokens) else {
        problems.push("no `ROUTES = { ... }` table found".to_string());
        return RouteConstants { entries, problems };
    };

    let mut seen = HashSet::new();
    let mut index = open + 1;
    loop {
        let Some(token) = tokens.get(index) else {
            problems.push("ROUTES table is not closed with '}'".to_string());
            break;
        };
        if token.kind == TokenKind::Punct('}') {
            break;
        }

        let key = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Str { value, .. } => value.clone(),
            other => {
                problems.push(format!(
                    "line {}: expected a route key, found {}",
                    token.line,
                    describe(other)
                ));
                index = skip_entry(&tokens, index);
                continue;
            }
        };
        let line = token.line;

        if tokens.get(index + 1).map(|token| &token.kind) != Some(&TokenKind::Punct(':')) {
            problems.push(format!("line {line}: expected ':' after route key {key}"));
            index = skip_entry(&tokens, index + 1);
            continue;
        }

        match tokens.get(index + 2).map(|token| &token.kind) {
            Some(TokenKind::Str {
                value,
                interpolated: false,
            }) => {
                if !seen.insert(key.clone()) {
                    problems.push(format!("line {line}: duplicate route key {key}"));
                } else {
                    entries.push((key, value.clone()));
                }
                index += 3;
                if tokens.get(index).map(|token| &token.kind) == Some(&TokenKind::Punct(',')) {
                    index += 1;
                }
            }
            Some(TokenKind::Str {
                interpolated: true,
                ..
            }) => {
                problems.push(format!(
                    "line {line}: value for {key} uses template interpolation"
                ));
                index = skip_entry(&tokens, index + 2);
            }
            _ => {
                problems.push(format!(
                    "line {line}: value for {key} is not a string literal"
                ));
                index = skip_entry(&tokens, index + 2);
            }
        }
    }

    RouteConstants { entries, problems }
}

fn find_table_open(tokens: &[Token]) -> Option<usize> {
    let start = tokens
        .iter()
        .position(|token| token.kind == TokenKind::Ident("ROUTES".to_string()))?;
    let equals = tokens[start..]
        .iter()
        .position(|token| token.kind == TokenKind::Punct('='))?
        + start;
    (tokens.get(equals + 1)?.kind == TokenKind::Punct('{')).then_some(equals + 1)
}

/// Advance past the current entry: to just after the next top-level ',' or onto the closing '}'.
/// A stray top-level ')' or ']' is consumed so the caller always makes progress.
fn skip_entry(tokens: &[Token], mut index: usize) -> usize {
    let mut depth = 0usize;
    while let Some(token) = tokens.get(index) {
        match token.kind {
            TokenKind::Punct('}') if depth == 0 => return index,
            TokenKind::Punct('{') | TokenKind::Punct('[') | TokenKind::Punct('(') => depth += 1,
            TokenKind::Punct('}') | TokenKind::Punct(']') | TokenKind::Punct(')') => {
                if depth == 0 {
                    return index + 1;
                }
                depth -= 1;
            }
            TokenKind::Punct(',') if depth == 0 => return index + 1,
            _ => {}
        }
        index += 1;
    }
    index
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => format!("identifier {name}"),
        TokenKind::Str { value, .. } => format!("string '{value}'"),
        TokenKind::Punct(ch) => format!("'{ch}'"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePath {
    Literal(String),
    Symbolic(String),
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRegistration {
    pub path: RoutePath,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterScan {
    pub registrations: Vec<RouteRegistration>,
    pub problems: Vec<String>,
}

/// Collect every `<Route>` tag that carries a `path` attribute.
pub fn scan_router_source(source: &str) -> RouterScan {
    let mut scan = RouterScan::default();
    let mut index = 0usize;

    while index < source.len() {
        let Some(offset) = source[index..].find(['<', '/', '"', '\'', '`']) else {
            break;
        };
        let at = index + offset;
        if source[at..].starts_with("/*") {
            index = source[at + 2..]
                .find("*/")
                .map(|end| at + 2 + end + 2)
                .unwrap_or(source.len());
            continue;
        }
        if source[at..].starts_with("//") {
            index = source[at..]
                .find('\n')
                .map(|end| at + end + 1)
                .unwrap_or(source.len());
            continue;
        }
        if source[at..].starts_with(['"', '\'', '`']) {
            index = skip_string_literal(source, at);
            continue;
        }
        if !is_route_tag_at(source, at) {
            index = at + 1;
            continue;
        }

        let line = line_of(source, at);
        let Some(end) = find_jsx_tag_end(source, at) else {
            scan.problems
                .push(format!("line {line}: <Route> tag is not terminated"));
            break;
        };
        let raw = &source[at + "<Route".len()..end];
        match find_path_attribute(raw) {
            Ok(Some(path)) => scan.registrations.push(RouteRegistration { path, line }),
            Ok(None) => {}
            Err(problem) => scan.problems.push(format!("line {line}: {problem}")),
        }
        index = end + 1;
    }

    scan
}

/// Index just past the literal opened at `at`. Single and double quotes end
/// at the newline when unterminated.
fn skip_string_literal(source: &str, at: usize) -> usize {
    let quote = source.as_bytes()[at] as char;
    let mut escaped = false;
    for (offset, ch) in source[at + 1..].char_indices() {
        let index = at + 1 + offset;
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' if quote != '`' => return index,
            _ if ch == quote => return index + 1,
            _ => {}
        }
    }
    source.len()
}

fn line_of(source: &str, at: usize) -> usize {
    source[..at].matches('\n').count() + 1
}

fn is_route_tag_at(source: &str, at: usize) -> bool {
    let rest = &source[at..];
    if !rest.starts_with("<Route") {
        return false;
    }
    matches!(
        rest.as_bytes().get("<Route".len()).copied(),
        Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'>') | Some(b'/')
    )
}

/// Index of the `>` closing the tag opened at `start`, ignoring quoted text
/// and anything inside `{...}` expressions.
fn find_jsx_tag_end(source: &str, start: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut index = start + 1;
    let mut depth = 0usize;
    let mut quote = None::<u8>;
    while index < bytes.len() {
        let byte = bytes[index];
        if let Some(active) = quote {
            if byte == b'\\' {
                index += 2;
                continue;
            }
            if byte == active {
                quote = None;
            }
            index += 1;
            continue;
        }
        match byte {
            b'"' | b'\'' | b'`' => quote = Some(byte),
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'>' if depth == 0 => return Some(index),
            _ => {}
        }
        index += 1;
    }
    None
}

/// Attribute scan over the text between `<Route` and the closing `>`.
fn find_path_attribute(raw: &str) -> Result<Option<RoutePath>, String> {
    let bytes = raw.as_bytes();
    let mut index = 0usize;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte.is_ascii_whitespace() || byte == b'/' {
            index += 1;
            continue;
        }
        if byte == b'{' {
            // spread props such as {...rest}
            index = skip_braced(raw, index).unwrap_or(bytes.len());
            continue;
        }

        let name_start = index;
        while index < bytes.len()
            && !bytes[index].is_ascii_whitespace()
            && bytes[index] != b'='
            && bytes[index] != b'/'
        {
            index += 1;
        }
        let name = &raw[name_start..index];
        if name.is_empty() {
            index += 1;
            continue;
        }
        while index < bytes.len() && bytes[index].is_ascii_whitespace() {
            index += 1;
        }
        if bytes.get(index).copied() != Some(b'=') {
            if name == "path" {
                return Err("path attribute has no value".to_string());
            }
            continue;
        }
        index += 1;
        while index < bytes.len() && bytes[index].is_ascii_whitespace() {
            index += 1;
        }

        let value_start = index;
        let value = match bytes.get(index).copied() {
            Some(quote @ (b'"' | b'\'')) => {
                let Some(close) = raw[index + 1..].find(quote as char) else {
                    return Err(format!("unterminated value for attribute {name}"));
                };
                index = index + 1 + close + 1;
                AttributeValue::Literal(raw[value_start + 1..index - 1].to_string())
            }
            Some(b'{') => {
                let Some(end) = skip_braced(raw, index) else {
                    return Err(format!("unbalanced braces in attribute {name}"));
                };
                index = end;
                AttributeValue::Expression(raw[value_start + 1..end - 1].trim().to_string())
            }
            _ => {
                while index < bytes.len() && !bytes[index].is_ascii_whitespace() {
                    index += 1;
                }
                AttributeValue::Expression(raw[value_start..index].to_string())
            }
        };

        if name == "path" {
            return Ok(Some(classify_path(value)));
        }
    }
    Ok(None)
}

enum AttributeValue {
    Literal(String),
    Expression(String),
}

fn classify_path(value: AttributeValue) -> RoutePath {
    match value {
        AttributeValue::Literal(path) => RoutePath::Literal(path),
        AttributeValue::Expression(expr) => {
            if let Some(key) = expr.strip_prefix("ROUTES.")
                && !key.is_empty()
                && key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
            {
                return RoutePath::Symbolic(key.to_string());
            }
            for quote in ['"', '\'', '`'] {
                if expr.len() >= 2
                    && expr.starts_with(quote)
                    && expr.ends_with(quote)
                    && !expr.contains("${")
                {
                    return RoutePath::Literal(expr[1..expr.len() - 1].to_string());
                }
            }
            RoutePath::Unrecognized(expr)
        }
    }
}

/// Index just past the `}` matching the `{` at `start`.
fn skip_braced(raw: &str, start: usize) -> Option<usize> {
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut quote = None::<u8>;
    let mut index = start;
    while index < bytes.len() {
        let byte = bytes[index];
        if let Some(active) = quote {
            if byte == b'\\' {
                index += 2;
                continue;
            }
            if byte == active {
                quote = None;
            }
            index += 1;
            continue;
        }
        match byte {
            b'"' | b'\'' | b'`' => quote = Some(byte),
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index + 1);
                }
            }
            _ => {}
        }
        index += 1;
    }
    None
}

/// Resolve every registration to a concrete path, deduplicated in source order.
pub fn resolve_registrations(
    scan: &RouterScan,
    constants: &RouteConstants,
) -> (Vec<String>, Vec<String>) {
    let mut routes = Vec::new();
    let mut problems = Vec::new();
    for registration in &scan.registrations {
        let line = registration.line;
        match &registration.path {
            RoutePath::Literal(path) => routes.push(path.clone()),
            RoutePath::Symbolic(key) => match constants.get(key) {
                Some(path) => routes.push(path.to_string()),
                None => problems.push(format!(
                    "line {line}: <Route path={{ROUTES.{key}}}> references an undefined route constant"
                )),
            },
            RoutePath::Unrecognized(expr) => problems.push(format!(
                "line {line}: unrecognized <Route> path expression {{{expr}}}"
            )),
        }
    }
    (crate::manifest::stable_union(routes), problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONSTANTS: &str = r#"
// Route constants shared by the router and navigation.
export const ROUTES = {
  HOME: '/',
  ABOUT: "/about", // company profile
  SERVICES: `/services`,
  /* legacy */
  'CONTACT': '/contact',
  NEWS_DETAIL: '/news/:slug',
} as const;

export type RouteKey = keyof typeof ROUTES;
"#;

    #[test]
    fn route_constants_follow_grammar() {
        let constants = parse_route_constants(CONSTANTS);
        assert!(constants.problems.is_empty(), "{:?}", constants.problems);
        assert_eq!(constants.entries.len(), 5);
        assert_eq!(constants.get("ABOUT"), Some("/about"));
        assert_eq!(constants.get("CONTACT"), Some("/contact"));
        assert_eq!(constants.get("NEWS_DETAIL"), Some("/news/:slug"));
        assert_eq!(constants.get("MISSING"), None);
    }

    #[test]
    fn route_constants_report_non_literal_values() {
        let constants = parse_route_constants(
            "export const ROUTES = {\n  HOME: '/',\n  DYNAMIC: base + '/x',\n  LATER: `/a/${id}`,\n  HOME: '/again',\n  OK: '/ok'\n};\n",
        );
        assert_eq!(
            constants.entries,
            vec![
                ("HOME".to_string(), "/".to_string()),
                ("OK".to_string(), "/ok".to_string()),
            ]
        );
        assert_eq!(constants.problems.len(), 3, "{:?}", constants.problems);
        assert!(constants.problems[0].contains("line 3"));
        assert!(constants.problems[0].contains("DYNAMIC"));
        assert!(constants.problems[1].contains("interpolation"));
        assert!(constants.problems[2].contains("duplicate route key HOME"));
    }

    #[test]
    fn stray_closing_brackets_are_reported_and_skipped() {
        let stray_bracket =
            parse_route_constants("export const ROUTES = {\n  HOME: '/',\n  ]\n};\n");
        assert_eq!(stray_bracket.get("HOME"), Some("/"));
        assert_eq!(stray_bracket.problems.len(), 1, "{:?}", stray_bracket.problems);
        assert!(
            stray_bracket.problems[0].contains("line 3: expected a route key, found ']'")
        );

        let stray_paren = parse_route_constants(
            "export const ROUTES = {\n  HOME )\n  ABOUT: '/about',\n};\n",
        );
        assert_eq!(
            stray_paren.entries,
            vec![("ABOUT".to_string(), "/about".to_string())]
        );
        assert_eq!(stray_paren.problems.len(), 1, "{:?}", stray_paren.problems);
        assert!(stray_paren.problems[0].contains("expected ':' after route key HOME"));
    }

    #[test]
    fn missing_table_is_a_problem() {
        let constants = parse_route_constants("export const PATHS = ['/'];");
        assert!(constants.entries.is_empty());
        assert_eq!(constants.problems.len(), 1);
    }

    const ROUTER: &str = r#"
import { ROUTES } from './constants/routes';

export default function App() {
  return (
    <Routes>
      <Route element={<Layout />}>
        <Route path={ROUTES.HOME} element={<Home />} />
        <Route path="/about" element={<About title={"a > b"} />} />
        {/* <Route path="/retired" element={<Retired />} /> */}
        <Route
          path={ROUTES.CONTACT}
          element={<Contact onSent={() => navigate('/contact/thanks')} />}
        />
        <Route path='/news/:slug' element={<NewsDetail />} />
        <Route path={ROUTES.UNKNOWN} element={<Missing />} />
        <Route path={`/works/${slug}`} element={<Work />} />
        <Route path="*" element={<NotFound />} />
      </Route>
    </Routes>
  );
}
"#;

    #[test]
    fn router_scan_reads_literal_and_symbolic_paths() {
        let scan = scan_router_source(ROUTER);
        assert!(scan.problems.is_empty(), "{:?}", scan.problems);
        let paths: Vec<&RoutePath> = scan
            .registrations
            .iter()
            .map(|registration| &registration.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                &RoutePath::Symbolic("HOME".to_string()),
                &RoutePath::Literal("/about".to_string()),
                &RoutePath::Symbolic("CONTACT".to_string()),
                &RoutePath::Literal("/news/:slug".to_string()),
                &RoutePath::Symbolic("UNKNOWN".to_string()),
                &RoutePath::Unrecognized("`/works/${slug}`".to_string()),
                &RoutePath::Literal("*".to_string()),
            ]
        );
        assert_eq!(scan.registrations[2].line, 11);
    }

    #[test]
    fn resolution_reports_undefined_keys_and_unrecognized_paths() {
        let constants = parse_route_constants(CONSTANTS);
        let scan = scan_router_source(ROUTER);
        let (routes, problems) = resolve_registrations(&scan, &constants);
        assert_eq!(routes, vec!["/", "/about", "/contact", "/news/:slug", "*"]);
        assert_eq!(problems.len(), 2, "{problems:?}");
        assert!(problems[0].contains("ROUTES.UNKNOWN"));
        assert!(problems[1].contains("unrecognized"));
    }

    #[test]
    fn trailing_comments_and_strings_are_not_registrations() {
        let scan = scan_router_source(
            "const hint = \"<Route path='/in-string' />\";\n<Route path=\"/a\" element={<A />} />, // was <Route path=\"/legacy\" />\n<Route path=\"/b\" />\n",
        );
        assert!(scan.problems.is_empty(), "{:?}", scan.problems);
        let paths: Vec<&RoutePath> = scan
            .registrations
            .iter()
            .map(|registration| &registration.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                &RoutePath::Literal("/a".to_string()),
                &RoutePath::Literal("/b".to_string()),
            ]
        );
        assert_eq!(scan.registrations[1].line, 3);
    }

    #[test]
    fn route_without_value_is_reported() {
        let scan = scan_router_source("<Route path element={<X />} />");
        assert!(scan.registrations.is_empty());
        assert_eq!(scan.problems.len(), 1);
        assert!(scan.problems[0].contains("no value"));
    }

    #[test]
    fn routes_wrapper_is_not_a_route_tag() {
        let scan = scan_router_source("<Routes><RouteGuard path=\"/x\" /></Routes>");
        assert!(scan.registrations.is_empty());
        assert!(scan.problems.is_empty());
    }
}
