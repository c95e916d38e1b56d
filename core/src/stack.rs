//! The working stack used by a single simplification pass.

use core::fmt;

use crate::catalog::Window;
use crate::token::Token;

/// A stack cell: a token plus a cached "is numeric" flag.
#[derive(Debug, Clone, PartialEq)]
pub struct StackItem {
    token: Token,
    numeric: bool,
}

impl StackItem {
    #[inline]
    pub fn number(value: f64) -> Self {
        Self {
            token: Token::Number(value),
            numeric: true,
        }
    }

    #[inline]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self {
            token: Token::Symbol(name.into()),
            numeric: false,
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn into_token(self) -> Token {
        self.token
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        self.token.as_number()
    }

    pub fn as_symbol(&self) -> Option<&str> {
        self.token.as_symbol()
    }

    /// True for an operator that could not be folded and still waits on its
    /// operands further down the stack.
    pub fn is_pending_operator(&self) -> bool {
        !self.numeric && self.token.is_operator()
    }
}

impl From<Token> for StackItem {
    fn from(token: Token) -> Self {
        let numeric = matches!(token, Token::Number(_));
        Self { token, numeric }
    }
}

impl fmt::Display for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.token, f)
    }
}

/// Operand stack rebuilt from scratch by every simplification pass.
///
/// Positions are usually addressed from the top: `item(1)` is the top of the
/// stack, `item(2)` the one below it, and so on.
///
/// # Examples
///
/// ```
/// use tsrpn_core::stack::{Stack, StackItem};
///
/// let mut stack = Stack::with_capacity(4);
/// stack.push(StackItem::symbol("qps"));
/// stack.push(StackItem::number(2.0));
/// assert_eq!(stack.item(1).as_number(), Some(2.0));
/// assert_eq!(stack.item(2).as_symbol(), Some("qps"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    items: Vec<StackItem>,
}

impl Stack {
    /// Creates an empty stack that can hold `capacity` items before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, item: StackItem) {
        self.items.push(item);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<StackItem> {
        self.items.pop()
    }

    #[inline]
    pub fn peek(&self) -> Option<&StackItem> {
        self.items.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item `depth` positions from the top (`1` is the top).
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero or larger than the stack.
    #[inline]
    pub fn item(&self, depth: usize) -> &StackItem {
        &self.items[self.items.len() - depth]
    }

    /// Number stored `depth` positions from the top, if that item is numeric.
    #[inline]
    pub fn number(&self, depth: usize) -> Option<f64> {
        self.item(depth).as_number()
    }

    /// The items covered by a contract window.
    pub fn window(&self, window: Window) -> &[StackItem] {
        &self.items[window.indices(self.items.len())]
    }

    /// The `len` items that sit directly below the top `skip` items.
    pub fn below(&self, skip: usize, len: usize) -> &[StackItem] {
        let end = self.items.len() - skip;
        &self.items[end - len..end]
    }

    pub fn below_mut(&mut self, skip: usize, len: usize) -> &mut [StackItem] {
        let end = self.items.len() - skip;
        &mut self.items[end - len..end]
    }

    /// Removes the top `count` items and pushes `item` in their place.
    pub fn replace_top(&mut self, count: usize, item: StackItem) {
        self.drop_top(count);
        self.items.push(item);
    }

    /// Removes the top `count` items.
    pub fn drop_top(&mut self, count: usize) {
        let len = self.items.len();
        self.items.truncate(len - count);
    }

    pub fn swap_top(&mut self) {
        let len = self.items.len();
        self.items.swap(len - 1, len - 2);
    }

    pub fn extend_from_within(&mut self, skip: usize, len: usize) {
        let end = self.items.len() - skip;
        self.items.extend_from_within(end - len..end);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackItem> {
        self.items.iter()
    }

    /// Converts the remaining items into a program, bottom first.
    pub fn into_tokens(self) -> Vec<Token> {
        self.items.into_iter().map(StackItem::into_token).collect()
    }
}
