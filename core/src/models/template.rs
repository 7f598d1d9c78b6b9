use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_PLACEHOLDER: &str = "{{date}}";
pub const TITLE_PLACEHOLDER: &str = "{{title}}";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Substituted for `{{title}}` when the caller has no title of its own
pub const FALLBACK_TITLE: &str = "Untitled";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Template {
    pub fn new(name: &str, description: &str, title: &str, content: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Skeletons written into a workspace that has none yet
    pub fn builtins() -> Vec<Template> {
        vec![
            Template::new(
                "meeting",
                "Meeting notes template",
                "Meeting Notes - {{date}}",
                "# Meeting Notes\n\n**Date:** {{date}}\n**Attendees:** \n**Agenda:**\n\n## Notes\n\n## Action Items\n\n- [ ] \n",
                &["meeting"],
            ),
            Template::new(
                "journal",
                "Daily journal template",
                "Journal - {{date}}",
                "# Journal Entry\n\n**Date:** {{date}}\n\n## Today's Highlights\n\n\n## Thoughts\n\n\n## Tomorrow's Goals\n\n- [ ] \n",
                &["journal"],
            ),
            Template::new(
                "code",
                "Code snippet template",
                "Code: {{title}}",
                "# {{title}}\n\n**Language:** \n**Description:**\n\n```\n\n```\n",
                &["code"],
            ),
            Template::new(
                "todo",
                "To-do list template",
                "Todo List - {{date}}",
                "# Todo List\n\n**Date:** {{date}}\n\n## Tasks\n\n- [ ] \n- [ ] \n- [ ] \n",
                &["todo"],
            ),
        ]
    }

    /// Substitute placeholders; returns `(title, content)`.
    pub fn render(&self, title: Option<&str>, date: NaiveDate) -> (String, String) {
        let date = date.format(DATE_FORMAT).to_string();
        let title = title.unwrap_or(FALLBACK_TITLE);
        let fill = |s: &str| s.replace(DATE_PLACEHOLDER, &date).replace(TITLE_PLACEHOLDER, title);
        (fill(&self.title), fill(&self.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_builtin_names() {
        let names: Vec<String> = Template::builtins().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["meeting", "journal", "code", "todo"]);
    }

    #[test]
    fn test_render_meeting() {
        let meeting = &Template::builtins()[0];
        let (title, content) = meeting.render(None, jan_15());
        assert_eq!(title, "Meeting Notes - 2024-01-15");
        assert!(content.contains("**Date:** 2024-01-15"));
        assert!(!content.contains(DATE_PLACEHOLDER));
    }

    #[test]
    fn test_render_title_placeholder() {
        let code = &Template::builtins()[2];
        let (title, content) = code.render(Some("Parser"), jan_15());
        assert_eq!(title, "Code: Parser");
        assert!(content.starts_with("# Parser\n"));

        let (fallback, content) = code.render(None, jan_15());
        assert_eq!(fallback, "Code: Untitled");
        // Title and content are filled independently with the same title.
        assert!(content.starts_with("# Untitled\n"));
    }
}
