use tree_sitter::{Node, Parser, Tree};

/// Parse Python source into a syntax tree. Returns `None` when the input is
/// malformed; tree-sitter always produces a tree, so "malformed" means the
/// tree contains error or missing nodes.
pub fn parse(source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    parser.set_language(&language.into()).ok()?;
    let tree = parser.parse(source, None)?;
    if tree.root_node().has_error() {
        return None;
    }
    Some(tree)
}

/// Cheap probe used by the validator and by mutator tests.
pub fn parses(source: &str) -> bool {
    parse(source).is_some()
}

/// Raw line view used by the lexical mutators. Splitting on '\n' keeps a
/// trailing empty element, so `lines(s).join("\n") == s` and a trailing
/// newline survives a line-level rewrite.
pub fn lines(source: &str) -> Vec<&str> {
    source.split('\n').collect()
}

pub fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// A byte-range replacement captured against the unmodified source.
#[derive(Debug, Clone)]
pub struct Edit {
    pub start_byte: usize,
    pub end_byte: usize,
    pub replacement: String,
}

impl Edit {
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Edit { start_byte, end_byte, replacement: replacement.into() }
    }
}

/// Serialize a mutated tree back to text: apply the edits a rewrite pass
/// produced against the original source. Edits are applied back-to-front so
/// a splice never invalidates the spans captured during collection; the
/// result is deterministic for any non-overlapping edit set.
pub fn render(source: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.start_byte.cmp(&a.start_byte));
    let mut result = source.to_string();
    for edit in ordered {
        result.replace_range(edit.start_byte..edit.end_byte, &edit.replacement);
    }
    result
}

/// Preorder walk over every node in the tree.
pub fn walk<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    let count = node.child_count();
    for i in 0..count {
        if let Some(child) = node.child(i) {
            walk(child, f);
        }
    }
}
