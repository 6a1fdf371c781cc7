use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::BunkrError;
use crate::model::subject::Subject;
use crate::repository::traits::{Entity, Repository};

pub const SUBJECTS_FILE_NAME: &str = "subjects.json";
const DATA_DIR_NAME: &str = ".bunkr";

pub type FileSubjectRepository = FileRepository<Subject>;

/// `~/.bunkr`, the default home for data and config.
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DATA_DIR_NAME))
}

/// Stores every item of one type as a pretty-printed JSON array in a single file.
pub struct FileRepository<T> {
    file_path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> Clone for FileRepository<T> {
    fn clone(&self) -> Self {
        Self {
            file_path: self.file_path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> FileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned + Clone,
{
    pub fn new(base_dir: Option<PathBuf>, file_name: &str) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create data directory {}", path.display()))?;
        path.push(file_name);

        let repo = FileRepository {
            file_path: path,
            _marker: PhantomData,
        };

        if !repo.file_path.exists() {
            tracing::debug!(path = %repo.file_path.display(), "initializing empty store");
            repo.write_items(&[])?;
        }

        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_items(&self) -> Result<Vec<T>> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let items = serde_json::from_reader(reader)
            .with_context(|| format!("Corrupt data file {}", self.file_path.display()))?;
        Ok(items)
    }

    fn write_items(&self, items: &[T]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, items)?;
        writer.flush()?;
        Ok(())
    }
}

impl FileRepository<Subject> {
    pub fn subjects(base_dir: Option<PathBuf>) -> Result<Self> {
        Self::new(base_dir, SUBJECTS_FILE_NAME)
    }
}

impl<T> Repository<T> for FileRepository<T>
where
    T: Entity + Serialize + DeserializeOwned + Clone,
{
    fn save(&self, item: &T) -> Result<()> {
        let mut items = self.read_items()?;
        if let Some(pos) = items.iter().position(|i| i.id() == item.id()) {
            items[pos] = item.clone();
        } else {
            items.push(item.clone());
        }
        self.write_items(&items)
    }

    fn get(&self, id: &Uuid) -> Result<T> {
        self.read_items()?
            .into_iter()
            .find(|i| i.id() == *id)
            .ok_or_else(|| BunkrError::NotFound(id.to_string()).into())
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut items = self.read_items()?;
        let initial_len = items.len();
        items.retain(|i| i.id() != *id);

        if items.len() == initial_len {
            return Err(BunkrError::NotFound(id.to_string()).into());
        }

        self.write_items(&items)
    }

    fn list(&self) -> Result<Vec<T>> {
        self.read_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ledger::ActionKind;
    use tempfile::TempDir;

    fn repo() -> (TempDir, FileSubjectRepository) {
        let dir = TempDir::new().unwrap();
        let repo = FileSubjectRepository::subjects(Some(dir.path().to_path_buf())).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_new_creates_empty_file() {
        let (_dir, repo) = repo();
        assert!(repo.path().exists());
        assert_eq!(fs::read_to_string(repo.path()).unwrap().trim(), "[]");
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_inserts_then_replaces() {
        let (_dir, repo) = repo();
        let mut subject = Subject::new("Compilers".to_string());
        repo.save(&subject).unwrap();

        subject.ledger = subject.ledger.apply(ActionKind::AttendedLab);
        repo.save(&subject).unwrap();

        let all = repo.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ledger.attended_count, 2);
        assert_eq!(repo.get(&subject.id).unwrap(), subject);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let (_dir, repo) = repo();
        let a = Subject::new("B".to_string());
        let b = Subject::new("A".to_string());
        repo.save(&a).unwrap();
        repo.save(&b).unwrap();
        let names: Vec<_> = repo.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_delete_and_missing() {
        let (_dir, repo) = repo();
        let subject = Subject::new("Physics".to_string());
        repo.save(&subject).unwrap();
        repo.delete(&subject.id).unwrap();
        assert!(repo.list().unwrap().is_empty());

        let err = repo.delete(&subject.id).unwrap_err();
        assert!(matches!(err.downcast_ref::<BunkrError>(), Some(BunkrError::NotFound(_))));
        assert!(repo.get(&subject.id).is_err());
    }

    #[test]
    fn test_reopen_reads_existing_data() {
        let dir = TempDir::new().unwrap();
        let subject = Subject::new("Maths".to_string());
        {
            let repo = FileSubjectRepository::subjects(Some(dir.path().to_path_buf())).unwrap();
            repo.save(&subject).unwrap();
        }
        let repo = FileSubjectRepository::subjects(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(repo.list().unwrap(), vec![subject]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (_dir, repo) = repo();
        fs::write(repo.path(), "not json").unwrap();
        assert!(repo.list().is_err());
    }
}
