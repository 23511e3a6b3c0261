use std::collections::HashMap;

use serde::{Deserialize, Serialize};

mod load;
mod tags;

pub use load::load_notes;

/// Directed relations of a note. `anterior` lists the notes this one is
/// derived from, `posterior` the notes extending it. The store keeps the two
/// mirrored: A in B.anterior implies B in A.posterior.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLinks {
    #[serde(default)]
    pub anterior: Vec<String>,
    #[serde(default)]
    pub posterior: Vec<String>,
}

impl NoteLinks {
    pub fn neighbor_ids(&self) -> impl Iterator<Item = &str> {
        self.anterior
            .iter()
            .chain(self.posterior.iter())
            .map(String::as_str)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: NoteLinks,
}

/// Read-only snapshot of the external note set. `order` keeps ids
/// newest-first, which is also the fallback anchor order.
#[derive(Clone, Debug, Default)]
pub struct NoteStore {
    pub notes: HashMap<String, Note>,
    pub order: Vec<String>,
}

impl NoteStore {
    pub fn from_notes(notes: Vec<Note>) -> Self {
        let mut order = notes.iter().map(|note| note.id.clone()).collect::<Vec<_>>();
        order.sort_by(|a, b| {
            let a_ts = notes
                .iter()
                .find(|note| &note.id == a)
                .map_or(0, |note| note.timestamp);
            let b_ts = notes
                .iter()
                .find(|note| &note.id == b)
                .map_or(0, |note| note.timestamp);
            b_ts.cmp(&a_ts).then_with(|| a.cmp(b))
        });

        let notes = notes
            .into_iter()
            .map(|note| (note.id.clone(), note))
            .collect::<HashMap<_, _>>();

        Self { notes, order }
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn first_id(&self) -> Option<&str> {
        self.order
            .iter()
            .map(String::as_str)
            .find(|id| self.notes.contains_key(*id))
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn link_count(&self) -> usize {
        self.notes
            .values()
            .map(|note| note.links.anterior.len())
            .sum()
    }
}

#[cfg(test)]
pub(crate) fn test_note(id: &str, anterior: &[&str], posterior: &[&str]) -> Note {
    Note {
        id: id.to_owned(),
        content: format!("note {id}"),
        timestamp: 0,
        tags: Vec::new(),
        links: NoteLinks {
            anterior: anterior.iter().map(|s| s.to_string()).collect(),
            posterior: posterior.iter().map(|s| s.to_string()).collect(),
        },
    }
}
