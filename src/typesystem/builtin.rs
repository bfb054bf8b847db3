//! Built-in scalar types shared by every namespace.

use std::fmt;

use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::token::Token;

/// The bootstrap types every namespace knows without loading an archive.
///
/// Built-ins are the only types whose identity is shared across namespaces: their tokens live in
/// the reserved [`Token::BUILTIN`] table and are the same everywhere. Their names parse and print
/// in the form used by parameter shapes, e.g. `i32` or `String`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, EnumString, IntoStaticStr,
)]
pub enum BuiltinKind {
    /// No value
    #[strum(serialize = "void")]
    Void,
    /// Boolean
    #[strum(serialize = "bool")]
    Bool,
    /// Unicode scalar
    #[strum(serialize = "char")]
    Char,
    /// 32-bit signed integer
    #[strum(serialize = "i32")]
    I32,
    /// 64-bit signed integer
    #[strum(serialize = "i64")]
    I64,
    /// 32-bit float
    #[strum(serialize = "f32")]
    F32,
    /// 64-bit float
    #[strum(serialize = "f64")]
    F64,
    /// Immutable string
    #[strum(serialize = "String")]
    String,
    /// Root of all reference types; erasure of free type parameters
    #[strum(serialize = "Object")]
    Object,
    /// Runtime type handle; erasure of every `Type<X>`
    #[strum(serialize = "Type")]
    Type,
}

impl BuiltinKind {
    /// Returns the shared token of this built-in.
    #[must_use]
    pub fn token(self) -> Token {
        Token::from_parts(Token::BUILTIN, self as u32 + 1)
    }

    /// Returns the name used in shapes and type signatures.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Looks up a built-in by its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Looks up a built-in by its shared token.
    #[must_use]
    pub fn from_token(token: Token) -> Option<Self> {
        if !token.is_builtin() {
            return None;
        }

        BuiltinKind::iter().find(|kind| kind.token() == token)
    }

    /// True for value kinds, which can never hold `null`.
    #[must_use]
    pub fn is_value_kind(self) -> bool {
        !matches!(
            self,
            BuiltinKind::String | BuiltinKind::Object | BuiltinKind::Type
        )
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
