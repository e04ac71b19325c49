// Output formatting
//
// Pure layout: every function returns the text to print, without a trailing
// newline. Callers decide what to print and in which order.

use crate::models::{Task, TaskList};

/// Border line above and below a list header
pub const LIST_SEPARATOR: &str = "------------";

const UNTITLED: &str = "(untitled)";

/// Where a task is shown: a plain number or a list letter plus number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPos {
    Number(u64),
    Lettered(char, u64),
}

impl DisplayPos {
    fn label(&self) -> String {
        match self {
            DisplayPos::Number(n) => n.to_string(),
            DisplayPos::Lettered(letter, n) => format!("{}{}", letter, n),
        }
    }
}

/// One task line: right-aligned position (width 4), two spaces, title.
/// `indented` lines sit under a list header and get four leading spaces.
pub fn format_task(pos: DisplayPos, task: &Task, indented: bool) -> String {
    let indent = if indented { "    " } else { "" };
    format!("{}{:>4}  {}", indent, pos.label(), task_title(&task.title))
}

/// Bordered section heading for a list
pub fn format_list_header(list: &TaskList, mark_default: bool) -> String {
    format!(
        "{sep}\n{title}\n{sep}",
        sep = LIST_SEPARATOR,
        title = list_label(list, mark_default)
    )
}

/// A list's name as shown by `lists`
pub fn format_list_name(list: &TaskList) -> String {
    list_label(list, true)
}

fn list_label(list: &TaskList, mark_default: bool) -> String {
    let title = if list.title.trim().is_empty() {
        UNTITLED
    } else {
        list.title.as_str()
    };
    if mark_default && list.is_default {
        format!("{} [default]", title)
    } else {
        title.to_string()
    }
}

/// Titles print on one line; blank titles print as "(untitled)"
fn task_title(title: &str) -> String {
    let title = title.replace(['\r', '\n'], " ");
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn task(title: &str) -> Task {
        Task {
            id: "t".to_string(),
            title: title.to_string(),
            status: TaskStatus::Open,
        }
    }

    fn list(title: &str, is_default: bool) -> TaskList {
        TaskList {
            id: "l".to_string(),
            title: title.to_string(),
            is_default,
        }
    }

    #[test]
    fn test_flush_number_line() {
        assert_eq!(format_task(DisplayPos::Number(1), &task("Buy milk"), false), "   1  Buy milk");
        assert_eq!(format_task(DisplayPos::Number(1234), &task("x"), false), "1234  x");
        assert_eq!(format_task(DisplayPos::Number(12345), &task("x"), false), "12345  x");
    }

    #[test]
    fn test_indented_lines() {
        assert_eq!(
            format_task(DisplayPos::Number(101), &task("Report"), true),
            "     101  Report"
        );
        assert_eq!(
            format_task(DisplayPos::Lettered('a', 1), &task("Eggs"), true),
            "      a1  Eggs"
        );
        assert_eq!(
            format_task(DisplayPos::Lettered('b', 100), &task("Bread"), true),
            "    b100  Bread"
        );
    }

    #[test]
    fn test_title_normalisation() {
        assert_eq!(format_task(DisplayPos::Number(2), &task("  "), false), "   2  (untitled)");
        assert_eq!(
            format_task(DisplayPos::Number(3), &task("two\nlines"), false),
            "   3  two lines"
        );
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            format_list_header(&list("Work", false), true),
            "------------\nWork\n------------"
        );
        assert_eq!(
            format_list_header(&list("My Tasks", true), true),
            "------------\nMy Tasks [default]\n------------"
        );
        assert_eq!(
            format_list_header(&list("", false), false),
            "------------\n(untitled)\n------------"
        );
    }

    #[test]
    fn test_list_names() {
        assert_eq!(format_list_name(&list("My Tasks", true)), "My Tasks [default]");
        assert_eq!(format_list_name(&list("Errands", false)), "Errands");
    }
}
