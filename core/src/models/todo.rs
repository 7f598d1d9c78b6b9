use regex::Regex;
use std::sync::OnceLock;

fn todo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-*]\s+\[([ xX])\]\s+(.+)$").expect("todo pattern is valid"))
}

/// A `- [ ]` / `- [x]` checklist line
#[derive(Debug, Clone, PartialEq)]
pub struct TodoItem {
    pub text: String,
    pub completed: bool,
    pub line: usize,
}

pub fn extract_todos(content: &str) -> Vec<TodoItem> {
    content
        .lines()
        .enumerate()
        .filter_map(|(line, text)| {
            let caps = todo_regex().captures(text)?;
            Some(TodoItem {
                text: caps[2].trim().to_string(),
                completed: caps[1].eq_ignore_ascii_case("x"),
                line,
            })
        })
        .collect()
}

/// Flip the checkbox on `line`; `None` when that line is not a todo.
pub fn toggle_todo(content: &str, line: usize) -> Option<String> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    let target = *lines.get(line)?;
    let caps = todo_regex().captures(target)?;
    let toggled = if &caps[1] == " " {
        target.replacen("[ ]", "[x]", 1)
    } else {
        target.replacen("[x]", "[ ]", 1).replacen("[X]", "[ ]", 1)
    };
    lines[line] = &toggled;
    Some(lines.join("\n"))
}

/// `(completed, total)`
pub fn count_todos(content: &str) -> (usize, usize) {
    let todos = extract_todos(content);
    let done = todos.iter().filter(|t| t.completed).count();
    (done, todos.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "# Tasks\n- [ ] milk\n* [x] bread\n- [X] eggs\nplain line";

    #[test]
    fn test_extract_todos() {
        let todos = extract_todos(LIST);
        assert_eq!(todos.len(), 3);
        assert_eq!(todos[0], TodoItem { text: "milk".to_string(), completed: false, line: 1 });
        assert!(todos[1].completed);
        assert!(todos[2].completed);
    }

    #[test]
    fn test_toggle_todo() {
        let toggled = toggle_todo(LIST, 1).unwrap();
        assert!(toggled.contains("- [x] milk"));
        let back = toggle_todo(&toggled, 1).unwrap();
        assert_eq!(back, LIST);

        let upper = toggle_todo(LIST, 3).unwrap();
        assert!(upper.contains("- [ ] eggs"));

        assert!(toggle_todo(LIST, 0).is_none());
        assert!(toggle_todo(LIST, 99).is_none());
    }

    #[test]
    fn test_count_todos() {
        assert_eq!(count_todos(LIST), (2, 3));
        assert_eq!(count_todos(""), (0, 0));
    }
}
