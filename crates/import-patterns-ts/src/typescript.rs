//! TypeScript / JavaScript import extractor using Tree-sitter.

use tree_sitter::{Language, Node, Parser};

use crate::extractor::{ExtractError, FileImports, ImportRef, LanguageExtractor};

const IMPORT_STATEMENT: &str = "import_statement";

/// Extracts ES import statements from TypeScript and JavaScript source.
///
/// `.ts`, `.mts` and `.cts` files use the TypeScript grammar; everything
/// else (`.tsx`, `.js`, `.jsx`, `.mjs`, `.cjs`) uses the TSX grammar, which
/// accepts JSX.
pub struct TypeScriptExtractor {
    typescript: Language,
    tsx: Language,
}

impl TypeScriptExtractor {
    /// Creates a new TypeScript extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn language_for(&self, extension: &str) -> &Language {
        match extension {
            ".ts" | ".mts" | ".cts" => &self.typescript,
            _ => &self.tsx,
        }
    }

    /// Builds an [`ImportRef`] from an `import_statement` node.
    ///
    /// Statements without a `source` field (`import x = require("y")`) are
    /// not import declarations and yield `None`.
    fn extract_import(node: &Node<'_>, source: &str) -> Option<ImportRef> {
        let specifier = node.child_by_field_name("source")?;
        let text = source.get(specifier.start_byte()..specifier.end_byte())?;
        let start = node.start_position();
        Some(ImportRef {
            specifier: text.to_owned(),
            offset: node.start_byte(),
            width: node.end_byte() - node.start_byte(),
            line: start.row + 1,
            column: start.column,
        })
    }

    /// Pre-order walk collecting import statements in source order.
    fn collect_imports(root: Node<'_>, source: &str) -> Vec<ImportRef> {
        let mut imports = Vec::new();
        let mut cursor = root.walk();
        let mut done_with_node = false;

        loop {
            if !done_with_node {
                let node = cursor.node();
                if node.kind() == IMPORT_STATEMENT {
                    if let Some(imp) = Self::extract_import(&node, source) {
                        imports.push(imp);
                    }
                    done_with_node = true;
                } else if !cursor.goto_first_child() {
                    done_with_node = true;
                }
            } else if cursor.goto_next_sibling() {
                done_with_node = false;
            } else if !cursor.goto_parent() {
                break;
            }
        }

        imports
    }
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ts", ".mts", ".cts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"]
    }

    fn analyze(&self, source: &str, extension: &str) -> Result<FileImports, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(extension))
            .map_err(|e| ExtractError::Language {
                language: self.language_id(),
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or(ExtractError::Parse {
                language: self.language_id(),
            })?;
        let root = tree.root_node();

        Ok(FileImports {
            imports: Self::collect_imports(root, source),
            has_syntax_errors: root.has_error(),
            ..FileImports::default()
        })
    }
}
