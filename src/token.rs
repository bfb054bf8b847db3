//! Identity handles for types and members loaded into a namespace.
//!
//! Every class and every member that is loaded into a [`crate::Namespace`] receives a
//! [`Token`]. Tokens are the only notion of type identity the bridge uses: two type
//! references denote the same type exactly when they resolve to the same token.
//!
//! # Layout
//!
//! - The high byte (bits 24-31) indicates the kind of entity ([`Token::TYPE`],
//!   [`Token::METHOD`] or [`Token::BUILTIN`])
//! - The low 24 bits (bits 0-23) hold the row, allocated from a process-wide counter
//!
//! Rows for classes and members are never reused, so the same archive loaded into two
//! namespaces yields two disjoint sets of tokens. Built-in scalar types live in the
//! reserved [`Token::BUILTIN`] table and carry the same token in every namespace.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::{Error, Result};

static NEXT_TYPE_ROW: AtomicU32 = AtomicU32::new(1);
static NEXT_METHOD_ROW: AtomicU32 = AtomicU32::new(1);

/// An identity token referencing a loaded type or member.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Table byte of loaded classes
    pub const TYPE: u8 = 0x02;
    /// Table byte of constructors and methods
    pub const METHOD: u8 = 0x06;
    /// Table byte of the built-in scalar types shared by all namespaces
    pub const BUILTIN: u8 = 0xF0;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table byte and a row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Largest row a token can carry
    pub const MAX_ROW: u32 = 0x00FF_FFFF;

    /// Allocates a fresh, never before used class token
    pub(crate) fn next_type() -> Result<Self> {
        Ok(Self::from_parts(Self::TYPE, next_row(&NEXT_TYPE_ROW, Self::TYPE)?))
    }

    /// Allocates a fresh, never before used member token
    pub(crate) fn next_method() -> Result<Self> {
        Ok(Self::from_parts(Self::METHOD, next_row(&NEXT_METHOD_ROW, Self::METHOD)?))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token identifies a built-in scalar type
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.table() == Self::BUILTIN
    }
}

/// Takes the next row of `counter`, which stops one past [`Token::MAX_ROW`] once exhausted.
fn next_row(counter: &AtomicU32, table: u8) -> Result<u32> {
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |row| {
            (row <= Token::MAX_ROW).then_some(row + 1)
        })
        .map_err(|_| Error::TokensExhausted(table))
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_parts() {
        let token = Token::from_parts(Token::METHOD, 5);
        assert_eq!(token.value(), 0x06000005);
        assert_eq!(token.table(), Token::METHOD);
        assert_eq!(token.row(), 5);
        assert!(!token.is_builtin());
    }

    #[test]
    fn test_token_row_is_masked() {
        let token = Token::from_parts(Token::TYPE, 0x0100_0001);
        assert_eq!(token.table(), Token::TYPE);
        assert_eq!(token.row(), 1);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token(0).is_null());
        assert!(!Token(0x02000001).is_null());
    }

    #[test]
    fn test_token_allocation_is_unique() {
        let tokens: HashSet<Token> = (0..64).map(|_| Token::next_type().unwrap()).collect();
        assert_eq!(tokens.len(), 64);
        assert!(tokens.iter().all(|t| t.table() == Token::TYPE));

        let method = Token::next_method().unwrap();
        assert_eq!(method.table(), Token::METHOD);
    }

    #[test]
    fn test_row_exhaustion_is_an_error() {
        let counter = AtomicU32::new(Token::MAX_ROW);

        assert_eq!(next_row(&counter, Token::METHOD).unwrap(), Token::MAX_ROW);
        for _ in 0..3 {
            assert!(matches!(
                next_row(&counter, Token::METHOD),
                Err(Error::TokensExhausted(Token::METHOD))
            ));
        }
        assert_eq!(counter.load(Ordering::Relaxed), Token::MAX_ROW + 1);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token(0x06000001)), "0x06000001");
        assert_eq!(format!("{}", Token(0)), "0x00000000");
    }

    #[test]
    fn test_token_debug() {
        let debug_str = format!("{:?}", Token(0x06000001));
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_token_ordering() {
        assert!(Token(0x02000001) < Token(0x02000002));
        assert!(Token(0x02000002) < Token(0x06000001));
    }

    #[test]
    fn test_token_from_conversion() {
        let token: Token = 0xF0000003u32.into();
        assert!(token.is_builtin());
        let raw: u32 = token.into();
        assert_eq!(raw, 0xF0000003);
    }
}
