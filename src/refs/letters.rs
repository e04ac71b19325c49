use super::RefError;
use crate::models::TaskList;
use crate::source::SourceError;

/// Hands out list letters `a` through `z`, in order
#[derive(Debug)]
pub struct LetterCursor {
    next: u8,
}

impl LetterCursor {
    pub fn new() -> Self {
        Self { next: b'a' }
    }

    /// The next free letter; `TooManyLists` once `z` has been handed out
    pub fn next_letter(&mut self) -> Result<char, RefError> {
        if self.next > b'z' {
            return Err(RefError::TooManyLists);
        }
        let letter = self.next as char;
        self.next += 1;
        Ok(letter)
    }
}

impl Default for LetterCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Letter to list mapping for one invocation
#[derive(Debug, Default)]
pub struct ListLetters {
    lists: Vec<TaskList>,
}

impl ListLetters {
    pub fn get(&self, letter: char) -> Result<&TaskList, RefError> {
        if !letter.is_ascii_lowercase() {
            return Err(RefError::LetterNotFound(letter));
        }
        let index = (letter as u8 - b'a') as usize;
        self.lists
            .get(index)
            .ok_or(RefError::LetterNotFound(letter))
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// `(letter, list)` pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (char, &TaskList)> {
        self.lists
            .iter()
            .enumerate()
            .map(|(i, list)| ((b'a' + i as u8) as char, list))
    }
}

/// Assign letters to the non-default lists that have open tasks
///
/// `lists` must be in provider order; it is never re-sorted. The default list
/// and lists for which `has_open` returns false are skipped without consuming
/// a letter. A 27th qualifying list fails with [`RefError::TooManyLists`].
pub fn assign_letters<F>(lists: &[TaskList], mut has_open: F) -> Result<ListLetters, RefError>
where
    F: FnMut(&TaskList) -> Result<bool, SourceError>,
{
    let mut cursor = LetterCursor::new();
    let mut letters = ListLetters::default();

    for list in lists {
        if list.is_default {
            continue;
        }
        if !has_open(list)? {
            continue;
        }
        let letter = cursor.next_letter()?;
        log::debug!("letter {} -> list {:?} ({})", letter, list.title, list.id);
        letters.lists.push(list.clone());
    }

    Ok(letters)
}
