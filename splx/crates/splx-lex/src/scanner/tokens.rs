//! Lazy token iterator.

use std::iter::FusedIterator;

use super::{ScanCursor, Scanner};
use crate::token::Token;

/// Iterator over the tokens of one input, created by [`Scanner::tokens`].
#[derive(Clone, Debug)]
pub struct Tokens<'t, 's> {
    scanner: Scanner<'t>,
    cursor: ScanCursor<'s>,
}

impl<'t, 's> Tokens<'t, 's> {
    pub(super) fn new(scanner: Scanner<'t>, cursor: ScanCursor<'s>) -> Self {
        Self { scanner, cursor }
    }

    /// The cursor as it stands between tokens.
    pub fn cursor(&self) -> &ScanCursor<'s> {
        &self.cursor
    }
}

impl<'s> Iterator for Tokens<'_, 's> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next_token(&mut self.cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Every token covers at least one byte
        let remaining = self.cursor.remaining().len();
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for Tokens<'_, '_> {}

#[cfg(test)]
mod tests {
    use crate::definition::{LexerDefinition, RuleDef};
    use crate::token::TokenCategory;

    #[test]
    fn test_size_hint_bounds_token_count() {
        let table = LexerDefinition::new()
            .state("root", [RuleDef::new(r"\w+", TokenCategory::Variable)])
            .build()
            .unwrap();
        let source = "ab cd";
        let mut tokens = table.scanner().tokens(source);
        assert_eq!(tokens.size_hint(), (1, Some(5)));

        tokens.next();
        assert_eq!(tokens.cursor().offset(), 2);
        assert_eq!(tokens.size_hint(), (1, Some(3)));

        assert_eq!(tokens.by_ref().count(), 2);
        assert_eq!(tokens.size_hint(), (0, Some(0)));
        assert_eq!(tokens.next(), None);
    }
}
