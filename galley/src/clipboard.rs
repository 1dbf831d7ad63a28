// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The clipboard boundary.
//!
//! Copy produces a [`ClipboardContent`]: the plain text rendering is always
//! materialized, while the structured, HTML and Markdown encodings are
//! produced lazily when a consumer asks for them. Paste consumes a
//! [`PastePayload`] holding whichever encodings the external source offered;
//! precedence is structured > HTML > Markdown > plain, filtered by whether
//! rich content is currently accepted.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::document::Marker;

/// One block of clipboard content.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fragment {
    /// Block text, no separators.
    pub text: String,
    /// Checklist marker carried by the block.
    pub marker: Marker,
}

impl Fragment {
    /// Creates a plain fragment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marker: Marker::None,
        }
    }
}

/// Multi-encoding snapshot of a selection.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClipboardContent {
    plain: String,
    fragments: Vec<Fragment>,
}

impl ClipboardContent {
    /// Builds a snapshot from block fragments.
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let plain = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self { plain, fragments }
    }

    /// The plain text encoding. Always present.
    pub fn plain(&self) -> &str {
        &self.plain
    }

    /// The structured encoding: block fragments with marker state.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Renders the HTML encoding.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            out.push_str("<p>");
            out.push_str(&html_escape::encode_text(&fragment.text));
            out.push_str("</p>\n");
        }
        out
    }

    /// Renders the Markdown encoding.
    ///
    /// Checklist blocks become task list items; plain blocks become
    /// paragraphs separated by blank lines.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for (index, fragment) in self.fragments.iter().enumerate() {
            if index > 0 {
                let list_run = fragment.marker != Marker::None
                    && self.fragments[index - 1].marker != Marker::None;
                out.push_str(if list_run { "\n" } else { "\n\n" });
            }
            match fragment.marker {
                Marker::None => out.push_str(&fragment.text),
                Marker::Unchecked => {
                    out.push_str("- [ ] ");
                    out.push_str(&fragment.text);
                }
                Marker::Checked => {
                    out.push_str("- [x] ");
                    out.push_str(&fragment.text);
                }
            }
        }
        out
    }
}

/// Encodings offered by an external paste source.
#[derive(Clone, Default, Debug)]
pub struct PastePayload {
    /// The structured block encoding, when the source is another instance
    /// of this editor.
    pub fragments: Option<Vec<Fragment>>,
    /// An HTML encoding.
    pub html: Option<String>,
    /// A Markdown encoding.
    pub markdown: Option<String>,
    /// A plain text encoding.
    pub plain: Option<String>,
}

impl PastePayload {
    /// Creates a payload carrying only plain text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain: Some(text.into()),
            ..Self::default()
        }
    }

    /// Picks the best available encoding and converts it to fragments.
    ///
    /// Precedence: structured > HTML > Markdown > plain. When rich content
    /// is not accepted, every encoding degrades to its plain text rendering
    /// and markers are stripped.
    pub fn resolve(&self, accept_rich: bool) -> Option<Vec<Fragment>> {
        let fragments = if let Some(fragments) = &self.fragments {
            fragments.clone()
        } else if let Some(html) = &self.html {
            fragments_from_html(html)
        } else if let Some(markdown) = &self.markdown {
            fragments_from_markdown(markdown)
        } else if let Some(plain) = &self.plain {
            fragments_from_plain(plain)
        } else {
            return None;
        };
        if fragments.is_empty() {
            return None;
        }
        if accept_rich {
            Some(fragments)
        } else {
            Some(
                fragments
                    .into_iter()
                    .map(|f| Fragment::plain(f.text))
                    .collect(),
            )
        }
    }
}

/// Splits plain text into fragments on separators.
pub(crate) fn fragments_from_plain(text: &str) -> Vec<Fragment> {
    text.split('\n')
        .map(|line| Fragment::plain(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Parses a Markdown encoding into fragments.
///
/// Paragraphs and task list items map to blocks; everything else
/// contributes its text content.
pub(crate) fn fragments_from_markdown(markdown: &str) -> Vec<Fragment> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TASKLISTS);
    let mut fragments = Vec::new();
    let mut current: Option<Fragment> = None;
    for event in parser {
        match event {
            Event::Start(Tag::Paragraph) | Event::Start(Tag::Heading { .. }) => {
                current.get_or_insert_with(|| Fragment::plain(""));
            }
            Event::Start(Tag::Item) => {
                fragments.extend(current.take());
                current = Some(Fragment::plain(""));
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                fragments.extend(current.take());
            }
            Event::TaskListMarker(checked) => {
                if let Some(fragment) = &mut current {
                    fragment.marker = if checked {
                        Marker::Checked
                    } else {
                        Marker::Unchecked
                    };
                }
            }
            Event::Text(text) | Event::Code(text) => {
                current
                    .get_or_insert_with(|| Fragment::plain(""))
                    .text
                    .push_str(&text);
            }
            Event::SoftBreak => {
                if let Some(fragment) = &mut current {
                    fragment.text.push(' ');
                }
            }
            Event::HardBreak => {
                fragments.extend(current.take());
                current = Some(Fragment::plain(""));
            }
            _ => {}
        }
    }
    fragments.extend(current.take());
    fragments
}

/// Extracts fragments from an HTML encoding.
///
/// This is deliberately not an HTML parser: block-level closing tags become
/// separators, all other tags are dropped, and entities are decoded. The
/// full rich text model is out of scope.
pub(crate) fn fragments_from_html(html: &str) -> Vec<Fragment> {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('>') else {
            break;
        };
        let tag = tail[1..close].trim().to_ascii_lowercase();
        if matches!(
            tag.trim_start_matches('/').split_whitespace().next(),
            Some("br")
        ) || matches!(tag.as_str(), "/p" | "/div" | "/li" | "/h1" | "/h2" | "/h3" | "/tr")
        {
            text.push('\n');
        }
        rest = &tail[close + 1..];
    }
    text.push_str(rest);

    let decoded = html_escape::decode_html_entities(&text);
    let fragments: Vec<Fragment> = decoded
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Fragment::plain)
        .collect();
    fragments
}
