use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tree_sitter::{Node, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl DeclarationKind {
    /// Kinds that can back a type descriptor. PHP enums are classes.
    pub fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Enum)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Trait => "trait",
            Self::Enum => "enum",
        };
        f.write_str(s)
    }
}

/// One top-level type declaration with every referenced name already
/// resolved to its fully-qualified form.
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub namespace: String,
    pub short_name: String,
    pub name: String,
    pub parent: Option<String>,
    /// `implements` for classes and enums, `extends` for interfaces.
    pub interfaces: Vec<String>,
    pub traits: Vec<String>,
    pub constants: Vec<String>,
    pub properties: Vec<String>,
    pub methods: Vec<String>,
    pub is_abstract: bool,
    pub is_final: bool,
    /// Enum declared with a backing type (`enum Suit: string`).
    pub is_backed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceUnit {
    pub namespaces: Vec<String>,
    pub declarations: Vec<Declaration>,
}

/// Parses PHP source text into its type declarations.
///
/// Returns `None` for empty input and for sources whose syntax tree contains
/// errors, so a broken file never yields partial declarations.
pub fn parse_source(source: &str) -> Option<SourceUnit> {
    if source.trim().is_empty() {
        return None;
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
        .ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let mut unit = SourceUnit::default();
    let mut scope = Scope::default();
    walk_statements(&root, source.as_bytes(), &mut scope, &mut unit);
    Some(unit)
}

/// Joins a namespace and a name with the PHP separator.
pub fn qualify(namespace: &str, name: &str) -> String {
    let name = name.trim_start_matches('\\');
    let namespace = namespace.trim_matches('\\');
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}\\{name}")
    }
}

#[derive(Debug, Default)]
struct Scope {
    namespace: String,
    /// Lowercased alias -> fully-qualified name.
    imports: HashMap<String, String>,
}

impl Scope {
    fn new(namespace: String) -> Self {
        Self {
            namespace,
            imports: HashMap::new(),
        }
    }

    fn resolve(&self, raw: &str) -> String {
        let raw = raw.trim();
        if let Some(absolute) = raw.strip_prefix('\\') {
            return absolute.to_string();
        }

        if let Some(head) = raw.get(..10)
            && head.eq_ignore_ascii_case("namespace\\")
        {
            return qualify(&self.namespace, &raw[10..]);
        }

        let (first, rest) = match raw.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (raw, None),
        };
        if let Some(imported) = self.imports.get(&first.to_ascii_lowercase()) {
            return match rest {
                Some(rest) => format!("{imported}\\{rest}"),
                None => imported.clone(),
            };
        }

        qualify(&self.namespace, raw)
    }
}

fn walk_statements(node: &Node, source: &[u8], scope: &mut Scope, unit: &mut SourceUnit) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "namespace_definition" => {
                let name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, source).trim_matches('\\').to_string())
                    .unwrap_or_default();
                if !name.is_empty() && !unit.namespaces.contains(&name) {
                    unit.namespaces.push(name.clone());
                }

                match child.child_by_field_name("body") {
                    Some(body) => {
                        let mut inner = Scope::new(name);
                        walk_statements(&body, source, &mut inner, unit);
                    }
                    None => *scope = Scope::new(name),
                }
            }
            "namespace_use_declaration" => {
                collect_imports(node_text(&child, source), &mut scope.imports);
            }
            "class_declaration"
            | "interface_declaration"
            | "trait_declaration"
            | "enum_declaration" => {
                if let Some(decl) = extract_declaration(&child, source, scope) {
                    unit.declarations.push(decl);
                }
            }
            _ => {}
        }
    }
}

fn collect_imports(text: &str, imports: &mut HashMap<String, String>) {
    let text = text.trim().trim_end_matches(';').trim();
    let body = match text.get(..3) {
        Some(kw) if kw.eq_ignore_ascii_case("use") => text[3..].trim(),
        _ => return,
    };
    if starts_with_keyword(body, "function") || starts_with_keyword(body, "const") {
        return;
    }

    match body.split_once('{') {
        Some((prefix, group)) => {
            let prefix = prefix.trim().trim_matches('\\');
            let group = group.trim().trim_end_matches('}');
            for clause in group.split(',') {
                add_import(prefix, clause, imports);
            }
        }
        None => {
            for clause in body.split(',') {
                add_import("", clause, imports);
            }
        }
    }
}

fn add_import(prefix: &str, clause: &str, imports: &mut HashMap<String, String>) {
    let clause = clause.trim();
    if clause.is_empty()
        || starts_with_keyword(clause, "function")
        || starts_with_keyword(clause, "const")
    {
        return;
    }

    let mut parts = clause.split_whitespace();
    let Some(path) = parts.next() else {
        return;
    };
    let path = path.trim_matches('\\');
    let alias = match (parts.next(), parts.next()) {
        (Some(kw), Some(alias)) if kw.eq_ignore_ascii_case("as") => alias,
        _ => path.rsplit('\\').next().unwrap_or(path),
    };

    imports.insert(alias.to_ascii_lowercase(), qualify(prefix, path));
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    s.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
        && s[keyword.len()..].starts_with(char::is_whitespace)
}

fn extract_declaration(node: &Node, source: &[u8], scope: &Scope) -> Option<Declaration> {
    let kind = match node.kind() {
        "class_declaration" => DeclarationKind::Class,
        "interface_declaration" => DeclarationKind::Interface,
        "trait_declaration" => DeclarationKind::Trait,
        "enum_declaration" => DeclarationKind::Enum,
        _ => return None,
    };
    let short_name = node_text(&node.child_by_field_name("name")?, source).to_string();

    let mut decl = Declaration {
        kind,
        namespace: scope.namespace.clone(),
        name: qualify(&scope.namespace, &short_name),
        short_name,
        parent: None,
        interfaces: Vec::new(),
        traits: Vec::new(),
        constants: Vec::new(),
        properties: Vec::new(),
        methods: Vec::new(),
        is_abstract: false,
        is_final: false,
        is_backed: false,
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "abstract_modifier" => decl.is_abstract = true,
            "final_modifier" => decl.is_final = true,
            ":" if kind == DeclarationKind::Enum => decl.is_backed = true,
            "base_clause" => {
                let names = referenced_names(&child, source, scope);
                if kind == DeclarationKind::Interface {
                    decl.interfaces.extend(names);
                } else {
                    decl.parent = names.into_iter().next();
                }
            }
            "class_interface_clause" => {
                decl.interfaces.extend(referenced_names(&child, source, scope));
            }
            "declaration_list" | "enum_declaration_list" => {
                extract_members(&child, source, scope, &mut decl);
            }
            _ => {}
        }
    }

    Some(decl)
}

fn extract_members(body: &Node, source: &[u8], scope: &Scope, decl: &mut Declaration) {
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "const_declaration" => {
                let mut inner = child.walk();
                for element in child.children(&mut inner) {
                    if element.kind() == "const_element"
                        && let Some(name) = first_child_of_kind(&element, "name")
                    {
                        decl.constants.push(node_text(&name, source).to_string());
                    }
                }
            }
            "enum_case" => {
                if let Some(name) = child
                    .child_by_field_name("name")
                    .or_else(|| first_child_of_kind(&child, "name"))
                {
                    decl.constants.push(node_text(&name, source).to_string());
                }
            }
            "property_declaration" => {
                let mut inner = child.walk();
                for element in child.children(&mut inner) {
                    if element.kind() == "property_element"
                        && let Some(var) = find_descendant(&element, "variable_name")
                    {
                        decl.properties.push(variable_text(&var, source));
                    }
                }
            }
            "method_declaration" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                let name = node_text(&name, source).to_string();
                if name.eq_ignore_ascii_case("__construct")
                    && let Some(params) = child.child_by_field_name("parameters")
                {
                    extract_promoted_properties(&params, source, decl);
                }
                decl.methods.push(name);
            }
            "use_declaration" => {
                decl.traits.extend(referenced_names(&child, source, scope));
            }
            _ => {}
        }
    }
}

fn extract_promoted_properties(params: &Node, source: &[u8], decl: &mut Declaration) {
    let mut cursor = params.walk();
    for param in params.children(&mut cursor) {
        if param.kind() == "property_promotion_parameter"
            && let Some(var) = find_descendant(&param, "variable_name")
        {
            decl.properties.push(variable_text(&var, source));
        }
    }
}

fn referenced_names(node: &Node, source: &[u8], scope: &Scope) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "name" | "qualified_name" | "relative_name") {
            names.push(scope.resolve(node_text(&child, source)));
        }
    }
    names
}

fn first_child_of_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn find_descendant<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == kind {
            return Some(child);
        }
        if let Some(found) = find_descendant(&child, kind) {
            return Some(found);
        }
    }
    None
}

fn variable_text(node: &Node, source: &[u8]) -> String {
    node_text(node, source).trim_start_matches('$').to_string()
}

fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}
