//! Markdown to plain terminal text.
//!
//! Walks `pulldown_cmark` events and lays them out as lines: underlined
//! headings, bullet and checkbox lists, `│` quotes, framed code blocks.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

const RULE_WIDTH: usize = 60;

/// Render markdown into plain text for the preview pane
pub fn render(content: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut w = Writer::default();
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.finish()
}

#[derive(Default)]
struct Writer {
    lines: Vec<String>,
    line: String,
    heading: Option<HeadingLevel>,
    strong: usize,
    quote_depth: usize,
    /// None = bullet list, Some(n) = ordered list at item n
    lists: Vec<Option<u64>>,
    /// Bullet waiting for the item's first text
    marker: Option<String>,
    in_code: bool,
}

impl Writer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) if self.in_code => {
                for line in t.lines() {
                    self.push_line(line.to_string());
                }
            }
            Event::Text(t) => self.push_text(&t),
            Event::Code(c) => self.push_raw(&format!("[{}]", c)),
            Event::Html(h) => self.push_raw(h.trim_end()),
            Event::SoftBreak | Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.push_line(rule());
                self.blank();
            }
            Event::TaskListMarker(checked) => {
                let box_char = if checked { "☑ " } else { "☐ " };
                if let Some(marker) = self.marker.as_mut() {
                    *marker = marker.replace("• ", box_char);
                }
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(level, ..) => {
                self.flush();
                self.blank();
                self.heading = Some(level);
            }
            Tag::BlockQuote => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.push_line(rule());
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.trim().is_empty() {
                        self.push_line(format!("Code: {}", lang.trim()));
                        self.push_line(rule());
                    }
                }
                self.in_code = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}  {}. ", indent, n);
                        *n += 1;
                        m
                    }
                    _ => format!("{}  • ", indent),
                };
                self.marker = Some(marker);
            }
            Tag::Strong => self.strong += 1,
            _ => {}
        }
    }

    fn close(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Tag::Heading(level, ..) => {
                let text = std::mem::take(&mut self.line);
                self.heading = None;
                let width = text.chars().count();
                self.push_line(text);
                match level {
                    HeadingLevel::H1 => self.push_line("═".repeat(width)),
                    HeadingLevel::H2 => self.push_line("─".repeat(width)),
                    _ => {}
                }
                self.blank();
            }
            Tag::BlockQuote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            Tag::CodeBlock(_) => {
                self.in_code = false;
                self.push_line(rule());
                self.blank();
            }
            Tag::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Tag::Item => self.flush(),
            Tag::Strong => self.strong = self.strong.saturating_sub(1),
            _ => {}
        }
    }

    fn shouting(&self) -> bool {
        self.strong > 0 || matches!(self.heading, Some(HeadingLevel::H1 | HeadingLevel::H3))
    }

    fn push_text(&mut self, text: &str) {
        if self.shouting() {
            self.push_raw(&text.to_uppercase());
        } else {
            self.push_raw(text);
        }
    }

    fn push_raw(&mut self, text: &str) {
        if let Some(marker) = self.marker.take() {
            self.line.push_str(&marker);
        }
        self.line.push_str(text);
    }

    fn push_line(&mut self, line: String) {
        let prefix = "  │ ".repeat(self.quote_depth);
        self.lines.push(format!("{}{}", prefix, line));
    }

    fn flush(&mut self) {
        if let Some(marker) = self.marker.take() {
            self.line.insert_str(0, &marker);
        }
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.push_line(line);
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings() {
        assert_eq!(render("# Title\n\nbody"), "TITLE\n═════\n\nbody");
        assert_eq!(render("## Sub"), "Sub\n───");
        assert_eq!(render("### Third"), "THIRD");
        assert_eq!(render("#### Fourth"), "Fourth");
    }

    #[test]
    fn test_lists_and_tasks() {
        assert_eq!(render("- [ ] a\n- [x] b\n- c"), "  ☐ a\n  ☑ b\n  • c");
        assert_eq!(render("1. one\n2. two"), "  1. one\n  2. two");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(render("> quoted"), "  │ quoted");
    }

    #[test]
    fn test_code_block() {
        let out = render("```rust\nfn main() {}\n```");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], rule());
        assert_eq!(lines[1], "Code: rust");
        assert_eq!(lines[3], "fn main() {}");
        assert_eq!(lines[4], rule());
    }

    #[test]
    fn test_inline_styles() {
        assert_eq!(render("**bold** and *it* and `x`"), "BOLD and it and [x]");
    }

    #[test]
    fn test_rule() {
        assert_eq!(render("a\n\n---\n\nb"), format!("a\n\n{}\n\nb", rule()));
    }

    #[test]
    fn test_empty() {
        assert_eq!(render(""), "");
    }
}
