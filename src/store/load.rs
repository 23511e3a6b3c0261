use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use super::tags::extract_tags;
use super::{Note, NoteStore};

/// Loads a note snapshot from a JSON file and normalizes it: tags are
/// re-derived from content, links to unknown notes are dropped, and the
/// anterior/posterior mirror invariant is repaired in both directions.
pub fn load_notes(path: &Path) -> Result<NoteStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read notes file {}", path.display()))?;

    let mut notes: Vec<Note> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse notes file {}", path.display()))?;

    let known_ids = notes
        .iter()
        .map(|note| note.id.clone())
        .collect::<HashSet<_>>();

    let mut dropped_links = 0usize;
    for note in &mut notes {
        note.tags = extract_tags(&note.content);

        let own_id = note.id.clone();
        for list in [&mut note.links.anterior, &mut note.links.posterior] {
            let before = list.len();
            list.retain(|target| known_ids.contains(target) && target != &own_id);
            list.dedup();
            dropped_links += before - list.len();
        }
    }
    if dropped_links > 0 {
        warn!("dropped {dropped_links} dangling or self links while loading notes");
    }

    repair_mirrors(&mut notes);

    let store = NoteStore::from_notes(notes);
    info!(
        "loaded {} notes with {} links from {}",
        store.note_count(),
        store.link_count(),
        path.display()
    );
    Ok(store)
}

fn repair_mirrors(notes: &mut [Note]) {
    let anterior_pairs = notes
        .iter()
        .flat_map(|note| {
            note.links
                .anterior
                .iter()
                .map(|source| (source.clone(), note.id.clone()))
        })
        .collect::<Vec<_>>();
    let posterior_pairs = notes
        .iter()
        .flat_map(|note| {
            note.links
                .posterior
                .iter()
                .map(|target| (note.id.clone(), target.clone()))
        })
        .collect::<Vec<_>>();

    for note in notes {
        for (source, target) in &anterior_pairs {
            if &note.id == source && !note.links.posterior.contains(target) {
                note.links.posterior.push(target.clone());
            }
        }
        for (source, target) in &posterior_pairs {
            if &note.id == target && !note.links.anterior.contains(source) {
                note.links.anterior.push(source.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::load_notes;

    fn write_snapshot(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write snapshot");
        file
    }

    #[test]
    fn load_rederives_tags_and_prunes_dangling_links() {
        let file = write_snapshot(
            r#"[
                {"id": "a", "content": "first #seed", "tags": ["stale"],
                 "links": {"anterior": [], "posterior": ["b", "ghost"]}},
                {"id": "b", "content": "second", "links": {"anterior": ["a"], "posterior": []}}
            ]"#,
        );

        let store = load_notes(file.path()).expect("snapshot loads");
        let a = store.get("a").expect("note a");
        assert_eq!(a.tags, vec!["seed"]);
        assert_eq!(a.links.posterior, vec!["b"]);
        assert!(store.get("b").expect("note b").tags.is_empty());
    }

    #[test]
    fn load_repairs_missing_mirror_links() {
        let file = write_snapshot(
            r#"[
                {"id": "a", "content": "", "links": {"anterior": [], "posterior": ["b"]}},
                {"id": "b", "content": "", "links": {"anterior": [], "posterior": []}}
            ]"#,
        );

        let store = load_notes(file.path()).expect("snapshot loads");
        assert_eq!(store.get("b").expect("note b").links.anterior, vec!["a"]);
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let file = write_snapshot("{ not json ");
        let error = load_notes(file.path()).expect_err("parse must fail");
        assert!(error.to_string().contains("failed to parse"));
    }

    #[test]
    fn empty_note_list_is_valid() {
        let file = write_snapshot("[]");
        let store = load_notes(file.path()).expect("empty snapshot loads");
        assert_eq!(store.note_count(), 0);
    }
}
