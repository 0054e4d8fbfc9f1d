//! Tag boundary scanning for ISML templates.
//!
//! [`Lexer`] walks a template as a sequence of [`Segment`]s. Inside a tag it
//! counts `<`/`>` depth so that tags nested in attribute values, such as
//! `<tr class="<isif condition="${a}">x</isif>">`, end where the outer tag
//! ends. `${...}` expressions are skipped with the scope matcher and
//! `<!-- -->` comments end at `-->`.

use crate::error::{AuditError, ScanError};
use crate::patterns::{HARDCODED_STRING, TAG_START};
use crate::scope::scope_end;
use crate::types::Violation;

/// Tags whose bodies never contain markup text.
pub const SCRIPT_TAGS: &[&str] = &["isscript", "script", "iscomment"];

/// Lexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Between tags.
    Text,
    /// Inside a tag, outside any expression.
    InTag,
    /// Inside a `{...}` expression within a tag.
    InExpression,
    /// Inside a `<!-- -->` comment.
    InComment,
    /// Inside the body of an ignored tag.
    InIgnoredBody,
}

/// A piece of template text produced by the [`Lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A tag or comment, from `<` to just past its end.
    Tag {
        /// Offset of `<`.
        start: usize,
        /// Offset just past the tag.
        end: usize,
    },
    /// An ignored tag together with its body.
    Ignored {
        /// Name the tag matched.
        name: &'a str,
        /// Offset of `<`.
        start: usize,
        /// Offset just past the closing tag.
        end: usize,
    },
    /// Text following a tag up to the next tag start.
    Text {
        /// Offset of the first character after the tag.
        start: usize,
        /// The text run.
        text: &'a str,
    },
}

/// Cursor primitives over template text.
#[derive(Debug, Clone, Copy)]
pub struct Markup<'a> {
    text: &'a str,
}

impl<'a> Markup<'a> {
    /// Wraps `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// The wrapped text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Offset of the next `<` followed by a non-whitespace character.
    #[must_use]
    pub fn next_tag_start(&self, from: usize) -> Option<usize> {
        if from > self.text.len() {
            return None;
        }
        TAG_START.find_at(self.text, from).map(|m| m.start())
    }

    /// The first of `names` the text at `pos` starts with.
    #[must_use]
    pub fn tag_at<'n>(&self, pos: usize, names: &[&'n str]) -> Option<&'n str> {
        let rest = self.text.as_bytes().get(pos..)?;
        names
            .iter()
            .copied()
            .find(|name| rest.starts_with(name.as_bytes()))
    }

    /// True if the text before `cursor` ends with `suffix`.
    #[must_use]
    pub fn is_after(&self, cursor: usize, suffix: &str) -> bool {
        self.text
            .as_bytes()
            .get(..cursor)
            .is_some_and(|before| before.ends_with(suffix.as_bytes()))
    }

    /// The first position at or after `cursor` that immediately follows one
    /// of `targets`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MissingSequence`] if no target occurs.
    pub fn position_after(&self, cursor: usize, targets: &[&str]) -> Result<usize, AuditError> {
        let bytes = self.text.as_bytes();
        targets
            .iter()
            .filter(|t| !t.is_empty())
            .filter_map(|t| {
                let from = cursor.saturating_sub(t.len()).min(bytes.len());
                bytes[from..]
                    .windows(t.len())
                    .enumerate()
                    .map(|(i, w)| (from + i + t.len(), w))
                    .find(|(end, w)| *end >= cursor && *w == t.as_bytes())
                    .map(|(end, _)| end)
            })
            .min()
            .ok_or_else(|| {
                ScanError::MissingSequence {
                    targets: targets.join("|"),
                    offset: cursor,
                }
                .into()
            })
    }

    /// Offset just past the end of the tag whose name starts at `name_start`.
    ///
    /// # Errors
    ///
    /// Returns a scan error if the tag, an expression in it, or a comment is
    /// never closed.
    pub fn tag_end(&self, name_start: usize) -> Result<usize, AuditError> {
        let mut lexer = Lexer::at_tag(*self, name_start);
        match lexer.step()? {
            Some(Segment::Tag { end, .. }) => Ok(end),
            _ => Err(ScanError::UnterminatedTag { offset: name_start }.into()),
        }
    }
}

/// Explicit-state lexer producing [`Segment`]s.
#[derive(Debug)]
pub struct Lexer<'a> {
    markup: Markup<'a>,
    ignored: &'a [&'a str],
    state: LexState,
    cursor: usize,
    tag_start: usize,
    depth: usize,
    ignored_tag: &'a str,
    after_tag: bool,
}

impl<'a> Lexer<'a> {
    /// Lexes `text`, skipping the bodies of tags named in `ignored`.
    #[must_use]
    pub fn new(text: &'a str, ignored: &'a [&'a str]) -> Self {
        Self {
            markup: Markup::new(text),
            ignored,
            state: LexState::Text,
            cursor: 0,
            tag_start: 0,
            depth: 0,
            ignored_tag: "",
            after_tag: false,
        }
    }

    fn at_tag(markup: Markup<'a>, name_start: usize) -> Self {
        let mut lexer = Self::new(markup.text(), &[]);
        lexer.enter_tag(name_start);
        lexer
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LexState {
        self.state
    }

    fn enter_tag(&mut self, name_start: usize) {
        self.tag_start = name_start.saturating_sub(1);
        self.cursor = name_start;
        self.depth = 1;
        self.state = if self.markup.tag_at(name_start, &["!--"]).is_some() {
            LexState::InComment
        } else if let Some(tag) = self.markup.tag_at(name_start, self.ignored) {
            self.ignored_tag = tag;
            LexState::InIgnoredBody
        } else {
            LexState::InTag
        };
    }

    fn close_tag(&mut self, end: usize) -> Segment<'a> {
        self.cursor = end;
        self.state = LexState::Text;
        self.after_tag = true;
        Segment::Tag {
            start: self.tag_start,
            end,
        }
    }

    /// End of the text run starting at `start`: the next `<` not followed by
    /// a space, or the end of the text.
    fn text_end(&self, start: usize) -> usize {
        let bytes = self.markup.text().as_bytes();
        (start..bytes.len())
            .find(|&i| bytes[i] == b'<' && bytes.get(i + 1) != Some(&b' '))
            .unwrap_or(bytes.len())
    }

    fn step(&mut self) -> Result<Option<Segment<'a>>, AuditError> {
        let text = self.markup.text();
        loop {
            match self.state {
                LexState::Text => {
                    if self.after_tag {
                        self.after_tag = false;
                        let start = self.cursor;
                        let end = self.text_end(start);
                        self.cursor = end;
                        return Ok(Some(Segment::Text {
                            start,
                            text: &text[start..end],
                        }));
                    }
                    let Some(tag_start) = self.markup.next_tag_start(self.cursor) else {
                        return Ok(None);
                    };
                    self.enter_tag(tag_start + 1);
                }
                LexState::InIgnoredBody => {
                    let name = self.ignored_tag;
                    let closing = format!("</{name}>");
                    let end = self.markup.position_after(self.cursor, &[&closing, "/>"])?;
                    self.cursor = end;
                    self.state = LexState::Text;
                    return Ok(Some(Segment::Ignored {
                        name,
                        start: self.tag_start,
                        end,
                    }));
                }
                LexState::InComment => {
                    let end = self.markup.position_after(self.cursor, &["-->"])?;
                    return Ok(Some(self.close_tag(end)));
                }
                LexState::InExpression => {
                    self.cursor = scope_end(text, self.cursor)?;
                    self.state = LexState::InTag;
                }
                LexState::InTag => match text.as_bytes().get(self.cursor) {
                    None => {
                        return Err(ScanError::UnterminatedTag {
                            offset: self.tag_start + 1,
                        }
                        .into())
                    }
                    Some(b'>') => {
                        self.cursor += 1;
                        self.depth -= 1;
                        if self.depth == 0 {
                            return Ok(Some(self.close_tag(self.cursor)));
                        }
                    }
                    Some(b'<') => {
                        self.cursor += 1;
                        self.depth += 1;
                    }
                    Some(b'{') => self.state = LexState::InExpression,
                    Some(_) => self.cursor += 1,
                },
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Segment<'a>, AuditError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(segment) => segment.map(Ok),
            Err(e) => {
                // Stop after the first error.
                self.state = LexState::Text;
                self.after_tag = false;
                self.cursor = self.markup.text().len() + 1;
                Some(Err(e))
            }
        }
    }
}

/// Literal text between tags, outside script and comment bodies.
///
/// # Errors
///
/// Returns a scan error on unterminated markup.
pub fn hardcoded_strings(text: &str) -> Result<Vec<Violation>, AuditError> {
    let mut found = Vec::new();
    for segment in Lexer::new(text, SCRIPT_TAGS) {
        if let Segment::Text { start, text } = segment? {
            if HARDCODED_STRING.is_match(text) {
                found.push(Violation::new(text, start)?);
            }
        }
    }
    Ok(found)
}

/// Every `<isprint>` tag, including ones nested in attribute values.
///
/// # Errors
///
/// Returns a scan error on an unterminated `<isprint>`.
pub fn isprint_tags(text: &str) -> Result<Vec<Violation>, AuditError> {
    let markup = Markup::new(text);
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(start) = markup.next_tag_start(cursor) {
        let name_start = start + 1;
        if markup.tag_at(name_start, &["isprint"]).is_some() {
            let end = markup.tag_end(name_start)?;
            found.push(Violation::new(&text[start..end], start)?);
            cursor = end;
        } else {
            cursor = name_start;
        }
    }
    Ok(found)
}

/// Tags carrying a `style=` attribute, outside script and comment bodies.
///
/// `<isprint>` tags are not reported, and a `style=` inside an `<isprint>`
/// nested in another tag does not count for the outer tag.
///
/// # Errors
///
/// Returns a scan error on unterminated markup.
pub fn inline_style_tags(text: &str) -> Result<Vec<Violation>, AuditError> {
    let markup = Markup::new(text);
    let mut found = Vec::new();
    for segment in Lexer::new(text, SCRIPT_TAGS) {
        if let Segment::Tag { start, end } = segment? {
            if markup.tag_at(start + 1, &["isprint"]).is_none()
                && has_inline_style(&markup, start, end)?
            {
                found.push(Violation::new(&text[start..end], start)?);
            }
        }
    }
    Ok(found)
}

fn has_inline_style(markup: &Markup<'_>, start: usize, end: usize) -> Result<bool, AuditError> {
    let bytes = markup.text().as_bytes();
    let mut cursor = start;
    while cursor < end {
        if markup.tag_at(cursor, &["style"]).is_some() {
            let after = cursor + "style".len();
            if bytes.get(after) == Some(&b'=') || bytes.get(after + 1) == Some(&b'=') {
                return Ok(true);
            }
        } else if cursor > start
            && markup.is_after(cursor, "<")
            && markup.tag_at(cursor, &["isprint"]).is_some()
        {
            cursor = markup.tag_end(cursor)?;
            continue;
        }
        cursor += 1;
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(Violation::text).collect()
    }

    #[test]
    fn test_next_tag_start_skips_lone_angle() {
        let markup = Markup::new("a < b <div>");
        assert_eq!(markup.next_tag_start(0), Some(6));
        assert_eq!(markup.next_tag_start(7), None);
    }

    #[test]
    fn test_tag_at_is_prefix_match_in_order() {
        let markup = Markup::new("<isscript>");
        assert_eq!(markup.tag_at(1, SCRIPT_TAGS), Some("isscript"));
        assert_eq!(markup.tag_at(1, &["div"]), None);
        assert_eq!(markup.tag_at(100, SCRIPT_TAGS), None);
    }

    #[test]
    fn test_tag_end_skips_expressions() {
        let text = r#"<isif condition="${a > 0 && b > 1}">yes</isif>"#;
        let end = Markup::new(text).tag_end(1).unwrap();
        assert_eq!(&text[..end], r#"<isif condition="${a > 0 && b > 1}">"#);
    }

    #[test]
    fn test_tag_end_counts_nested_tags() {
        let text = r#"<tr class="row <isif condition="${first}">first</isif>">x"#;
        let end = Markup::new(text).tag_end(1).unwrap();
        assert_eq!(&text[end..], "x");
    }

    #[test]
    fn test_tag_end_of_comment() {
        let text = "<!-- a > b -->after";
        let end = Markup::new(text).tag_end(1).unwrap();
        assert_eq!(&text[end..], "after");
    }

    #[test]
    fn test_unterminated_tag_is_malformed() {
        let err = Markup::new("<div class='x'").tag_end(1).unwrap_err();
        assert!(matches!(
            err,
            AuditError::Scan(ScanError::UnterminatedTag { .. })
        ));
        assert!(Markup::new("<!-- open").tag_end(1).is_err());
    }

    #[test]
    fn test_position_after() {
        let markup = Markup::new("<isscript>var a;</isscript>rest");
        let end = markup.position_after(1, &["</isscript>", "/>"]).unwrap();
        assert_eq!(&markup.text()[end..], "rest");
        assert!(markup.is_after(end, "</isscript>"));
        assert!(matches!(
            markup.position_after(0, &["</script>"]),
            Err(AuditError::Scan(ScanError::MissingSequence { .. }))
        ));
    }

    #[test]
    fn test_position_after_accepts_target_ending_at_cursor() {
        let markup = Markup::new("ab/>cd");
        assert_eq!(markup.position_after(4, &["/>"]).unwrap(), 4);
    }

    #[test]
    fn test_lexer_states_return_to_text() {
        let mut lexer = Lexer::new("<p>${x}</p>", SCRIPT_TAGS);
        assert_eq!(lexer.state(), LexState::Text);
        let segments: Vec<_> = lexer.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(lexer.state(), LexState::Text);
    }

    #[test]
    fn test_hardcoded_strings_flags_literal_only() {
        let text = "<div>Hello</div>\n<div>${dynamicVar}</div>";
        let found = hardcoded_strings(text).unwrap();
        assert_eq!(texts(&found), vec!["Hello"]);
        assert_eq!(found[0].offset(), 5);
    }

    #[test]
    fn test_hardcoded_strings_ignores_script_bodies() {
        let text = "<isscript>var label = 'Hi';</isscript>\n<iscomment>Note</iscomment>\n<span>${x}</span>";
        assert!(hardcoded_strings(text).unwrap().is_empty());
    }

    #[test]
    fn test_hardcoded_strings_after_comment() {
        let text = "<!-- header -->Welcome<br/>";
        assert_eq!(texts(&hardcoded_strings(text).unwrap()), vec!["Welcome"]);
    }

    #[test]
    fn test_isprint_tags() {
        let text = r#"<p><isprint value="${a}" encoding="off"></p><div class="<isprint value="${b}"/>">"#;
        let found = isprint_tags(text).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text(), r#"<isprint value="${a}" encoding="off">"#);
        assert_eq!(found[0].offset(), 3);
        assert_eq!(found[1].text(), r#"<isprint value="${b}"/>"#);
    }

    #[test]
    fn test_inline_style_tags() {
        let text = r#"<div style="color:red">a</div><span style ="x"></span><p class="y"></p>"#;
        let found = inline_style_tags(text).unwrap();
        assert_eq!(
            texts(&found),
            vec![r#"<div style="color:red">"#, r#"<span style ="x">"#]
        );
    }

    #[test]
    fn test_inline_style_inside_nested_isprint_does_not_count() {
        let text = r#"<div class="<isprint value="${a}" style="b"/>">x</div><isprint value="${c}" style="d"/>"#;
        assert!(inline_style_tags(text).unwrap().is_empty());
    }

    #[test]
    fn test_inline_style_ignores_script_bodies() {
        let text = r#"<script>el.innerHTML = '<b style="x">';</script>"#;
        assert!(inline_style_tags(text).unwrap().is_empty());
    }
}
