//! Message formatting for the assistant
//!
//! Bot replies are written in a small markdown-like dialect. This crate:
//! - **Parses** reply text into a typed block tree (`render`)
//! - **Draws** blocks as HTML or plain terminal text (`to_html`, `to_plain`)
//!
//! Parsing never fails; anything unrecognised is kept as plain text.
//!
//! # Example
//!
//! ```
//! use branch_assistant_text_processing::{render, to_html, Block};
//!
//! let blocks = render("## Summary\n\n- **Total**: 700 visitors");
//! assert!(matches!(blocks[0], Block::Heading { level: 2, .. }));
//! assert!(to_html(&blocks).contains("<strong>Total</strong>"));
//! ```

pub mod markup;
pub mod render;

pub use markup::{parse_inlines, render, Block, Inline, ListItem};
pub use render::{to_html, to_plain};
