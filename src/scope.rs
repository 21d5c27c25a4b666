//! Scope grammar and the matcher deciding whether a granted scope covers a
//! requested one. Three rules only: exact equality, trailing wildcard, and
//! folder inheritance resolved through the caller-supplied ancestry chain.
//! Scopes are otherwise opaque; no substring or pattern matching.

use crate::model::{FolderUid, Scope};

pub const WILDCARD: &str = "*";
pub const FOLDER_KIND: &str = "folders";

/// A syntactically valid scope. Wildcards are whole trailing segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedScope<'a> {
    /// `*`
    Any,
    /// `<kind>:*`
    AnyOfKind(&'a str),
    /// `<kind>:<id-type>:*`
    AnyOfAttribute(&'a str, &'a str),
    /// `<kind>:<id-type>:<id>`
    Resource { kind: &'a str, id_type: &'a str, id: &'a str },
}

fn literal(segment: &str) -> bool {
    !segment.is_empty() && segment != WILDCARD
}

/// Parse a scope string; `None` means malformed (wrong segment count, empty
/// segment, or a non-trailing wildcard). Malformed scopes never match; the
/// caller decides whether that is worth a log line.
pub fn parse(scope: &str) -> Option<ParsedScope<'_>> {
    if scope == WILDCARD {
        return Some(ParsedScope::Any);
    }
    let parts: Vec<&str> = scope.split(':').collect();
    match *parts.as_slice() {
        [kind, seg] if literal(kind) && seg == WILDCARD => Some(ParsedScope::AnyOfKind(kind)),
        [kind, id_type, seg] if literal(kind) && literal(id_type) && seg == WILDCARD => {
            Some(ParsedScope::AnyOfAttribute(kind, id_type))
        }
        [kind, id_type, id] if literal(kind) && literal(id_type) && literal(id) => {
            Some(ParsedScope::Resource { kind, id_type, id })
        }
        _ => None,
    }
}

/// Whether `granted` covers `requested` for a resource whose folder chain is
/// `ancestry` (direct parent first). Case-sensitive, total, never panics.
pub fn matches(granted: &Scope, requested: &Scope, ancestry: &[FolderUid]) -> bool {
    let (Some(g), Some(r)) = (parse(granted.as_str()), parse(requested.as_str())) else {
        return false;
    };
    if granted.as_str() == requested.as_str() {
        return true;
    }
    match g {
        ParsedScope::Any => true,
        ParsedScope::AnyOfKind(kind) => requested_kind(&r) == Some(kind),
        ParsedScope::AnyOfAttribute(kind, id_type) => match r {
            ParsedScope::Resource { kind: rk, id_type: rt, .. } => rk == kind && rt == id_type,
            _ => false,
        },
        ParsedScope::Resource { kind, id_type, id } => {
            // Folder inheritance: a concrete folder grant covers any resource
            // whose ancestry contains that folder, at any depth.
            kind == FOLDER_KIND && id_type == "uid" && ancestry.iter().any(|f| f.0 == id)
        }
    }
}

fn requested_kind<'a>(r: &ParsedScope<'a>) -> Option<&'a str> {
    match r {
        ParsedScope::Any => None,
        ParsedScope::AnyOfKind(kind) => Some(kind),
        ParsedScope::AnyOfAttribute(kind, _) => Some(kind),
        ParsedScope::Resource { kind, .. } => Some(kind),
    }
}
