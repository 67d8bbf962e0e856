// In-memory RemoteTree for tests.
//
// Files are added by full path; directories are implied by the paths.
// Each directory's content id is derived from everything below it, so
// changing any file changes every ancestor's id, like git tree shas.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Entry, EntryKind, RemoteTree};
use crate::error::{BlogError, Result};

#[derive(Default)]
pub struct FakeTree {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    /// Paths listed with a non file/dir type (e.g. "submodule").
    odd: Mutex<BTreeMap<String, String>>,
    /// Blob ids whose fetch should fail with a transport error.
    broken: Mutex<HashSet<String>>,
    pub list_calls: AtomicUsize,
    pub blob_calls: AtomicUsize,
}

impl FakeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.put(path, content);
        self
    }

    pub fn put(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.as_bytes().to_vec());
    }

    /// Deletes a file; directories left empty disappear with it.
    pub fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }

    pub fn add_odd(&self, path: &str, kind: &str) {
        self.odd
            .lock()
            .unwrap()
            .insert(path.to_string(), kind.to_string());
    }

    /// Makes fetching the blob of `path` fail.
    pub fn break_blob(&self, path: &str) {
        let id = self.blob_id(path).expect("no such file");
        self.broken.lock().unwrap().insert(id);
    }

    pub fn blob_id(&self, path: &str) -> Option<String> {
        let files = self.files.lock().unwrap();
        files.get(path).map(|content| blob_id(path, content))
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn blob_count(&self) -> usize {
        self.blob_calls.load(Ordering::SeqCst)
    }

    fn dir_id(files: &BTreeMap<String, Vec<u8>>, dir: &str) -> String {
        let prefix = format!("{dir}/");
        let mut acc = 0u64;
        for (path, content) in files.range(prefix.clone()..) {
            if !path.starts_with(&prefix) {
                break;
            }
            acc = acc.wrapping_mul(31).wrapping_add(hash(&blob_id(path, content)));
        }
        format!("tree-{acc:016x}")
    }
}

fn hash(text: &str) -> u64 {
    // FNV-1a; stable across runs unlike DefaultHasher's random keys.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in text.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn blob_id(path: &str, content: &[u8]) -> String {
    let mut text = path.to_string();
    text.push('\0');
    text.push_str(&String::from_utf8_lossy(content));
    format!("blob-{:016x}", hash(&text))
}

#[async_trait]
impl RemoteTree for FakeTree {
    async fn list_directory(&self, path: &str) -> Result<Vec<Entry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let mut children = BTreeSet::new();
        let mut entries = Vec::new();
        for (file_path, content) in files.iter() {
            let Some(rest) = file_path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => entries.push(Entry {
                    name: rest.to_string(),
                    path: file_path.clone(),
                    kind: EntryKind::File,
                    content_id: blob_id(file_path, content),
                }),
                Some((dir, _)) => {
                    children.insert(dir.to_string());
                }
            }
        }
        for dir in children {
            let full = format!("{prefix}{dir}");
            entries.push(Entry {
                name: dir,
                content_id: Self::dir_id(&files, &full),
                path: full,
                kind: EntryKind::Dir,
            });
        }
        for (odd_path, kind) in self.odd.lock().unwrap().iter() {
            if let Some(name) = odd_path.strip_prefix(&prefix) {
                if !name.contains('/') {
                    entries.push(Entry {
                        name: name.to_string(),
                        path: odd_path.clone(),
                        kind: EntryKind::Other(kind.clone()),
                        content_id: format!("odd-{name}"),
                    });
                }
            }
        }

        if entries.is_empty() && !path.is_empty() {
            return Err(BlogError::not_found(path));
        }
        Ok(entries)
    }

    async fn fetch_blob(&self, content_id: &str) -> Result<Vec<u8>> {
        self.blob_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.lock().unwrap().contains(content_id) {
            return Err(BlogError::transport(content_id, "connection reset"));
        }
        let files = self.files.lock().unwrap();
        files
            .iter()
            .find(|(path, content)| blob_id(path, content) == content_id)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| BlogError::not_found(content_id))
    }
}
