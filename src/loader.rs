//! Builds a [`DescriptorTree`] from schema text with `protobuf-parse`.
//!
//! The parser works with the filesystem, so the source and every import it
//! pulls in are written to a scratch directory first. Imports come from the
//! optional [`FileSystem`]; `google/protobuf/*` imports are built into the
//! parser; anything else can be replaced by an empty stub.

use crate::config::ComparerConfig;
use crate::descriptor::DescriptorTree;
use crate::normalize;
use crate::source::{FileSystem, SchemaSource};
use anyhow::Context;
use protobuf_parse::Parser;
use std::collections::{HashSet, VecDeque};
use std::path::{Component, Path};
use tracing::{debug, warn};

const STUB_IMPORT: &str = "syntax = \"proto3\";";

/// Parses `source` (and its imports) into a descriptor tree.
pub fn load_tree(
    source: &SchemaSource,
    file_system: Option<&dyn FileSystem>,
    config: &ComparerConfig,
) -> anyhow::Result<DescriptorTree> {
    let temp_dir = tempfile::tempdir().context("Failed to create temp directory")?;
    let root_name = root_file_name(source.name());
    let root_path = temp_dir.path().join(&root_name);
    write_file(&root_path, source.content())?;

    materialize_imports(
        temp_dir.path(),
        &root_name,
        source.content(),
        file_system,
        config,
    )?;

    let parsed = Parser::new()
        .pure()
        .include(temp_dir.path())
        .input(&root_path)
        .parse_and_typecheck()
        .context("Protobuf parsing failed")?;

    // Unlike `file_descriptor_set()`, this keeps the imported files too.
    let (root, imports): (Vec<_>, Vec<_>) = parsed
        .file_descriptors
        .iter()
        .partition(|d| d.name() == root_name);
    let root = root
        .into_iter()
        .next()
        .context("Could not find the parsed file descriptor for the input file")?;

    let tree = normalize::normalize_files(root, imports);
    debug!(
        schema = source.name(),
        files = tree.files().len(),
        messages = tree.message_count(),
        enums = tree.enum_count(),
        services = tree.service_count(),
        "Parsed schema"
    );
    Ok(tree)
}

fn materialize_imports(
    dir: &Path,
    root_name: &str,
    root_content: &str,
    file_system: Option<&dyn FileSystem>,
    config: &ComparerConfig,
) -> anyhow::Result<()> {
    let mut seen: HashSet<String> = HashSet::from([root_name.to_string()]);
    let mut pending: VecDeque<String> = import_paths(root_content).into();

    while let Some(import) = pending.pop_front() {
        if !seen.insert(import.clone()) {
            continue;
        }
        let relative = relative_name(&import)
            .with_context(|| format!("Import path '{import}' escapes the import root"))?;
        let target = dir.join(&relative);

        if let Some(fs) = file_system.filter(|fs| fs.exists(&import)) {
            let text = fs
                .read_text(&import)
                .with_context(|| format!("Failed to read import: {import}"))?;
            pending.extend(import_paths(&text));
            write_file(&target, &text)?;
            debug!(import = %import, "Materialized import");
        } else if import.starts_with("google/protobuf/") {
            // Built into the parser; a stub would shadow the real definitions.
        } else if config.stub_unresolved_imports {
            warn!(import = %import, "Unresolved import replaced with an empty stub");
            write_file(&target, STUB_IMPORT)?;
        }
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent dirs for: {}", path.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Extracts the quoted paths of `import`, `import public` and `import weak`
/// statements. Comments are dropped first and statements are split on `;`
/// and braces, so several imports may share a line.
pub(crate) fn import_paths(content: &str) -> Vec<String> {
    strip_comments(content)
        .split(|c: char| c == ';' || c == '{' || c == '}')
        .filter_map(|statement| {
            let rest = statement.trim().strip_prefix("import")?;
            if !rest.starts_with(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
                return None;
            }
            let rest = rest.trim_start();
            let rest = rest
                .strip_prefix("public")
                .or_else(|| rest.strip_prefix("weak"))
                .unwrap_or(rest)
                .trim_start();

            let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
            let body = &rest[1..];
            let end = body.find(quote)?;
            let path = &body[..end];
            (!path.is_empty()).then(|| path.to_string())
        })
        .collect()
}

/// Replaces `//` and `/* */` comments with whitespace, leaving string
/// literals untouched.
fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
                out.push(' ');
            }
            ('"' | '\'', _) => {
                quote = Some(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// A `/`-joined relative path, or `None` if `name` is absolute or climbs out
/// with `..`.
fn relative_name(name: &str) -> Option<String> {
    let mut parts = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}

fn root_file_name(name: &str) -> String {
    relative_name(name)
        .or_else(|| {
            Path::new(name)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "input.proto".to_string())
}
