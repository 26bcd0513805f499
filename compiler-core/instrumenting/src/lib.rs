//! Rewrites JavaScript so that every loop calls a guard at the start of each
//! iteration.
//!
//! ```text
//! while (running) step();
//! ```
//!
//! becomes
//!
//! ```text
//! while (running) { globalThis.__loopGuard("WhileStatement@1:0"); step(); }
//! ```
//!
//! Sources that fail to lex or parse are returned untouched.

use lexing::Lexed;
use rowan::ast::AstNode;
use smol_str::SmolStr;
use syntax::{SyntaxKind, SyntaxNode, cst};
use tags::LoopSite;

mod guard;
mod make;

pub const DEFAULT_HELPER: &str = "__loopGuard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// The global function that guard calls go through.
    pub helper_name: SmolStr,
    /// Prepended to every tag, usually a file name.
    pub tag_prefix: Option<SmolStr>,
}

impl Default for RewriteOptions {
    fn default() -> RewriteOptions {
        RewriteOptions { helper_name: SmolStr::new_static(DEFAULT_HELPER), tag_prefix: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub code: String,
    pub modified: bool,
}

impl Rewritten {
    fn unchanged(source: &str) -> Rewritten {
        Rewritten { code: source.to_string(), modified: false }
    }
}

struct Parsed<'s> {
    lexed: Lexed<'s>,
    root: SyntaxNode,
}

fn parse_clean(source: &str) -> Option<Parsed<'_>> {
    let lexed = lexing::lex(source);
    let input = lexing::significant(&lexed);
    let (parsed, errors) = parsing::parse(&lexed, &input);

    if let Some(error) = errors.first() {
        tracing::debug!(
            line = error.position.line,
            column = error.position.column,
            message = %error.message,
            "Leaving source untouched"
        );
        return None;
    }

    let root = parsed.syntax_node();
    Some(Parsed { lexed, root })
}

/// Whether `name` can be used as [`RewriteOptions::helper_name`].
pub fn is_valid_helper(name: &str) -> bool {
    let lexed = lexing::lex(name);
    lexed.len() == 1 && lexed.kind(0) == SyntaxKind::IDENTIFIER && !lexed.has_errors()
}

/// Finds every loop in pre-order, paired with its site.
fn collect(
    root: &SyntaxNode,
    lexed: &Lexed,
    options: &RewriteOptions,
) -> Vec<(cst::Loop, LoopSite)> {
    root.descendants()
        .filter_map(cst::Loop::cast)
        .filter_map(|looping| {
            let keyword = looping.keyword()?;
            let position = lexed.position_at(keyword.text_range().start().into());
            let site = LoopSite {
                kind: guard::loop_kind(&looping),
                line: position.line,
                column: position.column,
                prefix: options.tag_prefix.clone(),
            };
            Some((looping, site))
        })
        .collect()
}

/// Inserts a guard call as the first statement of every loop body.
///
/// Loops whose body already starts with a call to the helper are left
/// alone, so rewriting is idempotent.
pub fn rewrite(source: &str, options: &RewriteOptions) -> Rewritten {
    let _span = tracing::info_span!("rewrite").entered();

    if !is_valid_helper(&options.helper_name) {
        tracing::debug!(helper = %options.helper_name, "Invalid helper name");
        return Rewritten::unchanged(source);
    }

    let Some(parsed) = parse_clean(source) else {
        return Rewritten::unchanged(source);
    };

    // Sites are computed before any edits so positions refer to the input.
    let root = parsed.root.clone_for_update();
    let sites = collect(&root, &parsed.lexed, options);

    let mut inserted = 0;
    for (looping, site) in &sites {
        let tag = site.tag();
        let guard = make::guard_call(&options.helper_name, &tag);
        if guard::insert(looping, &guard, &options.helper_name) {
            tracing::trace!(%tag, "Inserted guard");
            inserted += 1;
        }
    }

    if inserted == 0 {
        return Rewritten::unchanged(source);
    }

    tracing::debug!(inserted, loops = sites.len(), "Rewrote source");
    Rewritten { code: root.to_string(), modified: true }
}

/// Removes guard calls to the configured helper, keeping the blocks they
/// were inserted into.
pub fn strip(source: &str, options: &RewriteOptions) -> Rewritten {
    let Some(parsed) = parse_clean(source) else {
        return Rewritten::unchanged(source);
    };

    let root = parsed.root.clone_for_update();
    let guards: Vec<SyntaxNode> = root
        .descendants()
        .filter(|node| {
            let parent = node.parent().map(|parent| parent.kind());
            matches!(
                parent,
                Some(
                    SyntaxKind::Source
                        | SyntaxKind::Block
                        | SyntaxKind::FunctionBody
                        | SyntaxKind::SwitchBody
                )
            )
        })
        .filter_map(cst::Statement::cast)
        .filter(|statement| guard::is_guard_call(statement, &options.helper_name))
        .map(|statement| statement.syntax().clone())
        .collect();

    if guards.is_empty() {
        return Rewritten::unchanged(source);
    }

    for statement in &guards {
        guard::remove(statement);
    }

    Rewritten { code: root.to_string(), modified: true }
}

/// Lists the loops that [`rewrite`] would guard.
pub fn loop_sites(source: &str, options: &RewriteOptions) -> Vec<LoopSite> {
    let Some(parsed) = parse_clean(source) else {
        return vec![];
    };
    collect(&parsed.root, &parsed.lexed, options).into_iter().map(|(_, site)| site).collect()
}
