//! Structural matching of parameter shapes.
//!
//! Two shapes match when they have the same length and every position denotes the same type
//! identity once resolved through the isolated namespace. The caller's declared types are
//! re-resolved by name inside the namespace, so a caller type and an isolated type match only if
//! the namespace maps the caller's name to the very class the isolated member declares.
//!
//! # Algorithm
//!
//! 1. Unequal lengths never match.
//! 2. Identical renderings, e.g. `(i32, String)` on both sides, match without resolution. Shapes
//!    holding runtime objects skip this step, since the rendering of an object omits its
//!    namespace.
//! 3. Otherwise every position is resolved and compared by [`crate::Token`]:
//!    - a declared `Type<X>` resolves to the built-in `Type`, a free type parameter to `Object`
//!    - a declared class name unknown to the namespace fails its position
//!    - a runtime object contributes its class, wherever it was loaded
//!    - `null` matches every position that is not a value kind
//!
//! All positions must match.

use crate::{
    config::OverloadPolicy,
    namespace::Namespace,
    token::Token,
    typesystem::{BuiltinKind, RuntimeType, Shape, ShapeEntry},
};

/// Outcome of overload selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// Exactly one candidate was chosen
    Resolved(T),
    /// No candidate matched
    NoMatch,
    /// Several candidates matched under [`OverloadPolicy::Strict`]
    Ambiguous(usize),
}

impl<T> Selection<T> {
    /// Applies `f` to the resolved candidate.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Selection<U> {
        match self {
            Selection::Resolved(value) => Selection::Resolved(f(value)),
            Selection::NoMatch => Selection::NoMatch,
            Selection::Ambiguous(count) => Selection::Ambiguous(count),
        }
    }

    /// True if a candidate was chosen
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Selection::Resolved(_))
    }
}

enum Position {
    Type(Token),
    Null,
    Unresolved,
}

fn resolve_position(namespace: &Namespace, entry: &ShapeEntry) -> Position {
    match entry {
        ShapeEntry::Declared(sig) => namespace
            .resolve_sig(sig)
            .map_or(Position::Unresolved, Position::Type),
        ShapeEntry::Runtime(RuntimeType::Builtin(kind)) => Position::Type(kind.token()),
        ShapeEntry::Runtime(RuntimeType::Object(class)) => Position::Type(class.token()),
        ShapeEntry::Runtime(RuntimeType::Null) => Position::Null,
    }
}

fn accepts_null(token: Token) -> bool {
    BuiltinKind::from_token(token).map_or(true, |kind| !kind.is_value_kind())
}

fn position_matches(namespace: &Namespace, left: &ShapeEntry, right: &ShapeEntry) -> bool {
    match (resolve_position(namespace, left), resolve_position(namespace, right)) {
        (Position::Type(a), Position::Type(b)) => a == b,
        (Position::Null, Position::Type(token)) | (Position::Type(token), Position::Null) => {
            accepts_null(token)
        }
        (Position::Null, Position::Null) => true,
        (Position::Unresolved, _) | (_, Position::Unresolved) => false,
    }
}

/// Decides whether two shapes are compatible for dispatch inside `namespace`.
#[must_use]
pub fn matches(namespace: &Namespace, left: &Shape, right: &Shape) -> bool {
    if left.len() != right.len() {
        return false;
    }

    if left.is_portable() && right.is_portable() && left.to_string() == right.to_string() {
        return true;
    }

    left.entries()
        .iter()
        .zip(right.entries())
        .all(|(l, r)| position_matches(namespace, l, r))
}

/// Picks the candidate whose shape matches `wanted`.
///
/// Candidates are examined in iteration order, which callers keep equal to declaration order.
pub fn select_overload<'c, C, I, F>(
    namespace: &Namespace,
    policy: OverloadPolicy,
    wanted: &Shape,
    candidates: I,
    shape_of: F,
) -> Selection<&'c C>
where
    C: 'c,
    I: IntoIterator<Item = &'c C>,
    F: Fn(&C) -> Shape,
{
    let mut matching = candidates
        .into_iter()
        .filter(|candidate| matches(namespace, wanted, &shape_of(candidate)));

    let Some(first) = matching.next() else {
        return Selection::NoMatch;
    };

    match policy {
        OverloadPolicy::FirstMatch => Selection::Resolved(first),
        OverloadPolicy::Strict => match matching.count() {
            0 => Selection::Resolved(first),
            more => Selection::Ambiguous(more + 1),
        },
    }
}
