/**
 * JSON-File Storage Backend
 *
 * Development fallback used when no database is reachable. Each collection
 * is one pretty-printed JSON array (`users.json`, `posts.json`) that is
 * read in full on every query and rewritten in full on every mutation.
 *
 * # Concurrency
 *
 * A per-collection async mutex serializes read-modify-write cycles inside
 * this process. Nothing guards against a second process writing the same
 * files.
 *
 * # Durability
 *
 * Writes go to `<name>.json.tmp` and are renamed over the original, so a
 * crash mid-write leaves the previous document intact.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, UserCredentials, UserStore, UserUpdate};
use crate::backend::posts::store::PostStore;
use crate::backend::storage::StorageError;
use crate::shared::post::{Post, PostInput};
use crate::shared::user::User;

pub const USERS_FILE: &str = "users.json";
pub const POSTS_FILE: &str = "posts.json";

/// One JSON array on disk
struct JsonCollection<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for JsonCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonCollection").field("path", &self.path).finish()
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open the collection, creating the directory and an empty array if needed
    async fn open(path: PathBuf) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        if !exists {
            tracing::info!("Creating {}", path.display());
            fs::write(&path, "[]\n")
                .await
                .map_err(|e| StorageError::io(&path, e))?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
            _records: PhantomData,
        })
    }

    async fn load(&self) -> Result<Vec<T>, StorageError> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    async fn save(&self, records: &[T]) -> Result<(), StorageError> {
        let mut body = serde_json::to_string_pretty(records)?;
        body.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }

    /// Snapshot of all records
    async fn read(&self) -> Result<Vec<T>, StorageError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Run `apply` on the records and persist them if it succeeds
    async fn modify<R, F>(&self, apply: F) -> Result<R, StorageError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, StorageError>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let result = apply(&mut records)?;
        self.save(&records).await?;
        Ok(result)
    }
}

/// Newest first; among equal timestamps the later entry wins
fn newest_first<T>(mut records: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    records.reverse();
    records.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    records
}

/// On-disk user record
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    id: Uuid,
    username: String,
    password_hash: String,
    #[serde(default)]
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredUser {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// `UserStore` backed by `users.json`
#[derive(Debug)]
pub struct FileUserStore {
    users: JsonCollection<StoredUser>,
}

impl FileUserStore {
    pub async fn open(dir: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            users: JsonCollection::open(dir.join(USERS_FILE)).await?,
        })
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StorageError> {
        let users = newest_first(self.users.read().await?, |u| u.created_at);
        Ok(users.iter().map(StoredUser::to_user).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await?;
        Ok(users.iter().find(|u| u.id == id).map(StoredUser::to_user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let users = self.users.read().await?;
        Ok(users
            .iter()
            .find(|u| u.username == username)
            .map(StoredUser::to_user))
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, StorageError> {
        let users = self.users.read().await?;
        Ok(users
            .iter()
            .find(|u| u.username == username)
            .map(|u| UserCredentials {
                user: u.to_user(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        self.users
            .modify(|users| {
                if users.iter().any(|u| u.username == user.username()) {
                    return Err(StorageError::Duplicate {
                        field: "username",
                        value: user.username().to_string(),
                    });
                }
                let now = Utc::now();
                let stored = StoredUser {
                    id: Uuid::new_v4(),
                    username: user.username().to_string(),
                    password_hash: user.password_hash().to_string(),
                    is_admin: user.is_admin(),
                    created_at: now,
                    updated_at: now,
                };
                let created = stored.to_user();
                users.push(stored);
                Ok(created)
            })
            .await
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, StorageError> {
        self.users
            .modify(|users| {
                let Some(stored) = users.iter_mut().find(|u| u.id == id) else {
                    return Ok(None);
                };
                if let Some(hash) = update.password_hash {
                    stored.password_hash = hash;
                }
                if let Some(is_admin) = update.is_admin {
                    stored.is_admin = is_admin;
                }
                stored.updated_at = Utc::now();
                Ok(Some(stored.to_user()))
            })
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        self.users
            .modify(|users| {
                let before = users.len();
                users.retain(|u| u.id != id);
                Ok(users.len() != before)
            })
            .await
    }
}

/// `PostStore` backed by `posts.json`
#[derive(Debug)]
pub struct FilePostStore {
    posts: JsonCollection<Post>,
}

impl FilePostStore {
    pub async fn open(dir: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            posts: JsonCollection::open(dir.join(POSTS_FILE)).await?,
        })
    }
}

#[async_trait]
impl PostStore for FilePostStore {
    async fn find_all(&self) -> Result<Vec<Post>, StorageError> {
        Ok(newest_first(self.posts.read().await?, |p| p.created_at))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StorageError> {
        let posts = self.posts.read().await?;
        Ok(posts.into_iter().find(|p| p.id == id))
    }

    async fn create(&self, input: PostInput) -> Result<Post, StorageError> {
        self.posts
            .modify(|posts| {
                let post = input.into_post(Utc::now());
                posts.push(post.clone());
                Ok(post)
            })
            .await
    }

    async fn update(&self, id: Uuid, input: PostInput) -> Result<Option<Post>, StorageError> {
        self.posts
            .modify(|posts| {
                let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
                    return Ok(None);
                };
                post.title = input.title().to_string();
                post.content = input.content().to_string();
                post.updated_at = Utc::now();
                Ok(Some(post.clone()))
            })
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        self.posts
            .modify(|posts| {
                let before = posts.len();
                posts.retain(|p| p.id != id);
                Ok(posts.len() != before)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::user::Credentials;
    use assert_matches::assert_matches;

    fn new_user(username: &str, is_admin: bool) -> NewUser {
        let credentials = Credentials::new(username, "secret1").unwrap();
        NewUser::new(&credentials, "$2b$10$notarealhash".to_string(), is_admin)
    }

    #[tokio::test]
    async fn test_open_creates_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let users = FileUserStore::open(dir.path()).await.unwrap();
        assert!(users.find_all().await.unwrap().is_empty());
        let raw = std::fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
        assert_eq!(raw.trim(), "[]");
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileUserStore::open(dir.path()).await.unwrap();

        let created = store.create(new_user("alice", false)).await.unwrap();
        assert_eq!(created.username, "alice");
        assert!(!created.is_admin);

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let credentials = store.find_credentials("alice").await.unwrap().unwrap();
        assert_eq!(credentials.user.id, created.id);
        assert_eq!(credentials.password_hash, "$2b$10$notarealhash");

        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileUserStore::open(dir.path()).await.unwrap();
        store.create(new_user("alice", false)).await.unwrap();

        let err = store.create(new_user("alice", true)).await.unwrap_err();
        assert_matches!(err, StorageError::Duplicate { field: "username", .. });
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileUserStore::open(dir.path()).await.unwrap();
        let user = store.create(new_user("alice", false)).await.unwrap();

        let updated = store
            .update(user.id, UserUpdate::admin(true))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_admin);
        assert!(updated.updated_at >= user.updated_at);

        assert!(store.update(Uuid::new_v4(), UserUpdate::admin(true)).await.unwrap().is_none());

        assert!(store.delete(user.id).await.unwrap());
        assert!(!store.delete(user.id).await.unwrap());
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hashes_not_in_public_view() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileUserStore::open(dir.path()).await.unwrap();
        store.create(new_user("alice", false)).await.unwrap();

        let json = serde_json::to_string(&store.find_all().await.unwrap()).unwrap();
        assert!(!json.contains("notarealhash"));

        let raw = std::fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
        assert!(raw.contains("passwordHash"));
    }

    #[tokio::test]
    async fn test_posts_survive_reopen_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FilePostStore::open(dir.path()).await.unwrap();
            store.create(PostInput::new("First", "one").unwrap()).await.unwrap();
            store.create(PostInput::new("Second", "two").unwrap()).await.unwrap();
        }

        let store = FilePostStore::open(dir.path()).await.unwrap();
        let posts = store.find_all().await.unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_post_update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePostStore::open(dir.path()).await.unwrap();
        let post = store.create(PostInput::new("Hi", "World").unwrap()).await.unwrap();

        let updated = store
            .update(post.id, PostInput::new("Hello", "Again").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.title, "Hello");
        assert_eq!(updated.created_at, post.created_at);

        assert!(store.delete(post.id).await.unwrap());
        assert!(!store.delete(post.id).await.unwrap());
        assert!(store.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reads_legacy_user_without_admin_flag() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        let legacy = format!(
            r#"[{{"id":"{}","username":"old","passwordHash":"h","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}}]"#,
            id
        );
        std::fs::write(dir.path().join(USERS_FILE), legacy).unwrap();

        let store = FileUserStore::open(dir.path()).await.unwrap();
        let user = store.find_by_id(id).await.unwrap().unwrap();
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FilePostStore::open(dir.path()).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(PostInput::new(&format!("Post {}", i), "body").unwrap())
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.find_all().await.unwrap().len(), 10);
    }
}
