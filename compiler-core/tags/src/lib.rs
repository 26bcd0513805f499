//! Loop sites and the tags that identify them at runtime.
//!
//! A tag has the shape `[prefix@]Kind@line:column`, where `Kind` is the
//! ESTree name of the loop node. Tags are produced when source code is
//! instrumented and decoded again when a guard trips.

use std::fmt;

use smol_str::{SmolStr, format_smolstr};

/// The key used for guard calls that carry no tag.
pub const DEFAULT_TAG: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoopKind {
    For,
    While,
    DoWhile,
    ForIn,
    /// Includes `for await (... of ...)`.
    ForOf,
}

impl LoopKind {
    pub const ALL: [LoopKind; 5] =
        [LoopKind::For, LoopKind::While, LoopKind::DoWhile, LoopKind::ForIn, LoopKind::ForOf];

    pub fn node_name(self) -> &'static str {
        match self {
            LoopKind::For => "ForStatement",
            LoopKind::While => "WhileStatement",
            LoopKind::DoWhile => "DoWhileStatement",
            LoopKind::ForIn => "ForInStatement",
            LoopKind::ForOf => "ForOfStatement",
        }
    }

    pub fn from_node_name(name: &str) -> Option<LoopKind> {
        LoopKind::ALL.into_iter().find(|kind| kind.node_name() == name)
    }

    /// A label for user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            LoopKind::For => "for loop",
            LoopKind::While => "while loop",
            LoopKind::DoWhile => "do...while loop",
            LoopKind::ForIn => "for...in loop",
            LoopKind::ForOf => "for...of loop",
        }
    }
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node_name())
    }
}

/// A loop found while instrumenting source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSite {
    pub kind: LoopKind,
    /// 1-based.
    pub line: u32,
    /// 0-based, in UTF-16 code units.
    pub column: u32,
    pub prefix: Option<SmolStr>,
}

impl LoopSite {
    pub fn tag(&self) -> SmolStr {
        let LoopSite { kind, line, column, .. } = self;
        match self.prefix.as_deref().filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => format_smolstr!("{prefix}@{kind}@{line}:{column}"),
            None => format_smolstr!("{kind}@{line}:{column}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Known(LoopKind),
    /// A kind segment that isn't one of the five loop node names.
    Unknown(SmolStr),
}

/// A decoded tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub prefix: Option<SmolStr>,
    pub kind: TagKind,
    /// `(line, column)`
    pub location: Option<(u32, u32)>,
}

impl Tag {
    /// Decodes a tag from the right, so prefixes may contain `@`.
    ///
    /// Older tags without a prefix or a location decode with those
    /// fields left empty. A last segment with a colon that isn't a valid
    /// `line:column` is dropped, so it never shadows the kind.
    pub fn decode(tag: &str) -> Tag {
        let (rest, location) = match tag.rsplit_once('@') {
            Some((rest, location)) => match parse_location(location) {
                Some(location) => (rest, Some(location)),
                None if location.contains(':') => (rest, None),
                None => (tag, None),
            },
            None => (tag, None),
        };

        let (prefix, kind) = match rest.rsplit_once('@') {
            Some((prefix, kind)) => (Some(SmolStr::new(prefix)), kind),
            None => (None, rest),
        };

        let kind = match LoopKind::from_node_name(kind) {
            Some(kind) => TagKind::Known(kind),
            None => TagKind::Unknown(SmolStr::new(kind)),
        };

        Tag { prefix, kind, location }
    }

    pub fn loop_kind(&self) -> Option<LoopKind> {
        match self.kind {
            TagKind::Known(kind) => Some(kind),
            TagKind::Unknown(_) => None,
        }
    }
}

fn parse_location(text: &str) -> Option<(u32, u32)> {
    let (line, column) = text.split_once(':')?;
    Some((line.parse().ok()?, column.parse().ok()?))
}

/// Builds the message reported when the loop behind `tag` is stopped.
pub fn diagnostic(tag: &str) -> String {
    let tag = Tag::decode(tag);

    let kind = tag.loop_kind().map_or("loop", LoopKind::label);
    let line = match tag.location {
        Some((line, _)) => format!("line {line}"),
        None => "an unknown line".to_string(),
    };
    let file = tag.prefix.as_deref().filter(|prefix| !prefix.is_empty()).unwrap_or("the sketch");

    format!("Possible infinite loop: the {kind} at {line} in {file} ran too long and was stopped.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_tags() {
        let site = LoopSite { kind: LoopKind::ForOf, line: 3, column: 2, prefix: None };
        assert_eq!(site.tag(), "ForOfStatement@3:2");

        let prefix = Some(SmolStr::new("sketch.js"));
        let site = LoopSite { kind: LoopKind::DoWhile, line: 10, column: 0, prefix };
        assert_eq!(site.tag(), "sketch.js@DoWhileStatement@10:0");

        let prefix = Some(SmolStr::default());
        let site = LoopSite { kind: LoopKind::While, line: 1, column: 4, prefix };
        assert_eq!(site.tag(), "WhileStatement@1:4");
    }

    #[test]
    fn decode_full_tag() {
        let tag = Tag::decode("user@files/a.js@ForInStatement@12:8");
        assert_eq!(tag.prefix.as_deref(), Some("user@files/a.js"));
        assert_eq!(tag.kind, TagKind::Known(LoopKind::ForIn));
        assert_eq!(tag.location, Some((12, 8)));
    }

    #[test]
    fn decode_partial_tags() {
        let tag = Tag::decode("WhileStatement");
        assert_eq!(tag, Tag { prefix: None, kind: TagKind::Known(LoopKind::While), location: None });

        let tag = Tag::decode("WhileStatement@4:1");
        assert_eq!(tag.prefix, None);
        assert_eq!(tag.location, Some((4, 1)));

        let tag = Tag::decode("main.js@ForStatement");
        assert_eq!(tag.prefix.as_deref(), Some("main.js"));
        assert_eq!(tag.kind, TagKind::Known(LoopKind::For));
        assert_eq!(tag.location, None);

        let tag = Tag::decode("main.js@Repeat");
        assert_eq!(tag.prefix.as_deref(), Some("main.js"));
        assert_eq!(tag.kind, TagKind::Unknown(SmolStr::new("Repeat")));
    }

    #[test]
    fn decode_malformed_location() {
        let tag = Tag::decode("main.js@Repeat@x:y");
        assert_eq!(tag.prefix.as_deref(), Some("main.js"));
        assert_eq!(tag.kind, TagKind::Unknown(SmolStr::new("Repeat")));
        assert_eq!(tag.location, None);

        let tag = Tag::decode("a@b.js@DoWhileStatement@4:");
        assert_eq!(tag.prefix.as_deref(), Some("a@b.js"));
        assert_eq!(tag.kind, TagKind::Known(LoopKind::DoWhile));
        assert_eq!(tag.location, None);
    }

    #[test]
    fn decode_inverts_encode() {
        for kind in LoopKind::ALL {
            let prefix = Some(SmolStr::new("a@b"));
            let site = LoopSite { kind, line: 7, column: 21, prefix };
            let tag = Tag::decode(&site.tag());
            assert_eq!(tag.loop_kind(), Some(kind));
            assert_eq!(tag.prefix, site.prefix);
            assert_eq!(tag.location, Some((7, 21)));
        }
    }

    #[test]
    fn diagnostics() {
        insta::assert_snapshot!(
            diagnostic("sketch.js@ForOfStatement@3:2"),
            @"Possible infinite loop: the for...of loop at line 3 in sketch.js ran too long and was stopped."
        );
        insta::assert_snapshot!(
            diagnostic("WhileStatement@9:0"),
            @"Possible infinite loop: the while loop at line 9 in the sketch ran too long and was stopped."
        );
        insta::assert_snapshot!(
            diagnostic(DEFAULT_TAG),
            @"Possible infinite loop: the loop at an unknown line in the sketch ran too long and was stopped."
        );
    }
}
