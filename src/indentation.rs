//! Indentation-aware token filter
//!
//!     [`IndentationLexer`] sits between a token source and a grammar. It passes every
//!     source token through unchanged and inserts zero width Indent and Dedent markers
//!     where a line opens or closes a block, so the grammar can treat leading whitespace
//!     as structure.
//!
//!     A line cannot be classified before its whole indentation run has been read and it
//!     is known whether the rest of it is blank. Lines are therefore buffered first and
//!     only emitted once a line with real content decides the next marker:
//!
//!         source        cows⏎ ⏎ ⇥cows⏎ go
//!         emitted       cows ⏎ INDENT(⇥) ⏎ ⇥ cows ⏎ DEDENT() go
//!
//!     Blank and comment-only lines never produce markers themselves; they are emitted
//!     together with the line that follows them, after its markers.
//!
//! States
//!
//!     LineStart ──▶ LineEnding ──▶ LineStart          blank or comment-only line
//!     LineStart ──▶ LineContent ─┬▶ BufferFlush ──▶ LineFlush ──▶ LineStart
//!                                └▶ SeparatorFlush ──▶ LineContent
//!
//!     `LineContent` emits at most one marker per call and is re-entered until the
//!     buffered line fits the stack. A line indented between two open levels is
//!     dedented past the deeper one and then opens its own block:
//!
//!         source        go⏎ ⇥⇥moo⏎ ⇥cows
//!         emitted       go ⏎ INDENT(⇥⇥) ⇥⇥ moo ⏎ DEDENT() INDENT(⇥) ⇥ cows DEDENT()
//!
//!     At the end of the input `LineFlush` goes back to `LineContent`, which pops the
//!     remaining levels one Dedent at a time.
//!
//! Enclosures and separators
//!
//!     Opening punctuation records the active level. While an enclosure is open and
//!     `suspend_in_enclosures` is set, lines are emitted without markers. Whether or not
//!     lines are suspended, a closer whose enclosure was opened at a shallower level
//!     than the active one is preceded by a Dedent, so the stack is back where it was
//!     when the closer is emitted.
//!
//!     A deeper line that starts with a separator is a continuation: it is emitted
//!     without an Indent. A separator that ends a line is held back together with its
//!     newline, so a marker for the next line, or the end of the input, lands after both.
//!
//! Backtracking
//!
//!     [`IndentationLexer::save`] returns a [`Snapshot`] with every buffer and the
//!     checkpoint of the source; passing it back to [`IndentationLexer::reset`] resumes
//!     from that point. Clones are independent lexers.

mod enclosure;
mod iter;
mod lexer;
mod lines;
mod snapshot;
mod stack;
mod state;

pub use enclosure::{EnclosureFrame, EnclosureTracker};
pub use iter::Tokens;
pub use lexer::IndentationLexer;
pub use lines::LineBuffer;
pub use snapshot::Snapshot;
pub use stack::{extends, IndentationStack};
pub use state::State;
