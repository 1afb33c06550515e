use std::str::SplitAsciiWhitespace;

use crate::WarningKind;

/// Cursor over the whitespace-separated fields of one line.
pub(crate) struct Fields<'i> {
    words: SplitAsciiWhitespace<'i>,
}

impl<'i> Fields<'i> {
    pub(crate) fn new(line: &'i str) -> Fields<'i> {
        Fields { words: line.split_ascii_whitespace() }
    }

    pub(crate) fn word(&mut self) -> Option<&'i str> {
        self.words.next()
    }

    /// Fills `out` with the next `out.len()` numbers. Trailing fields are
    /// left unread.
    pub(crate) fn read<'b>(&mut self, out: &'b mut [f64]) -> Result<&'b [f64], WarningKind> {
        for (index, slot) in out.iter_mut().enumerate() {
            *slot = self
                .words
                .next()
                .and_then(|it| it.parse::<f64>().ok())
                .ok_or(WarningKind::Arity { index })?;
        }
        Ok(out)
    }
}
