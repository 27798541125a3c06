//! The local todo list shown next to the user panel.
//!
//! Purely in-memory: nothing here talks to the backend.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an open item. Blank input is ignored.
    pub fn add(&mut self, text: &str) -> Option<&TodoItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.items.push(TodoItem {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
        });
        self.items.last()
    }

    pub fn toggle(&mut self, id: Uuid) -> bool {
        match self.items.iter_mut().find(|t| t.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trims_and_starts_open() {
        let mut list = TodoList::new();
        let item = list.add("  buy milk ").unwrap().clone();
        assert_eq!(item.text, "buy milk");
        assert!(!item.completed);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut list = TodoList::new();
        assert!(list.add("   ").is_none());
        assert!(list.add("").is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let mut list = TodoList::new();
        let a = list.add("a").unwrap().id;
        let b = list.add("b").unwrap().id;
        assert!(list.toggle(a));
        let states: Vec<_> = list.iter().map(|t| (t.id, t.completed)).collect();
        assert_eq!(states, vec![(a, true), (b, false)]);
        assert!(list.toggle(a));
        assert!(list.iter().all(|t| !t.completed));
    }

    #[test]
    fn remove_deletes_only_the_target() {
        let mut list = TodoList::new();
        let a = list.add("a").unwrap().id;
        list.add("b");
        assert!(list.remove(a));
        assert_eq!(list.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut list = TodoList::new();
        list.add("a");
        assert!(!list.toggle(Uuid::nil()));
        assert!(!list.remove(Uuid::nil()));
        assert_eq!(list.len(), 1);
    }
}
