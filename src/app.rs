//! Application context - owner of the storage handle
//!
//! The context is built once at startup, lends the store to short-lived
//! `Repository` values, and is closed explicitly at shutdown.

use std::path::{Path, PathBuf};

use crate::repository::{ConsoleReporter, Reporter, Repository};
use crate::storage::SqliteStore;
use crate::Result;

pub struct AppContext {
    store: SqliteStore,
    reporter: Box<dyn Reporter>,
    database_path: Option<PathBuf>,
}

impl AppContext {
    /// Open the database at `path` and ensure the schema.
    ///
    /// A failure here is fatal: nothing else can run without the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        tracing::info!("Using database {}", path.display());
        Ok(Self {
            store,
            reporter: Box::new(ConsoleReporter),
            database_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory context, mainly for tests
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            store: SqliteStore::open_in_memory()?,
            reporter: Box::new(ConsoleReporter),
            database_path: None,
        })
    }

    /// Replace the reporter that receives user-facing failure messages
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn repository(&self) -> Repository<'_> {
        Repository::new(&self.store, self.reporter.as_ref())
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// `None` for in-memory contexts
    pub fn database_path(&self) -> Option<&Path> {
        self.database_path.as_deref()
    }

    /// Release the storage handle
    pub fn close(self) -> Result<()> {
        tracing::debug!("Closing database");
        self.store.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedReporter(Rc<RefCell<Vec<String>>>);

    impl Reporter for SharedReporter {
        fn report_error(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    #[test]
    fn test_context_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracking.db");

        let ctx = AppContext::open(&path).unwrap();
        assert!(ctx.repository().register("Asha", "a@x.com").is_ok());
        assert_eq!(ctx.database_path(), Some(path.as_path()));
        ctx.close().unwrap();

        let ctx = AppContext::open(&path).unwrap();
        let view = ctx.repository().fetch_student("a@x.com").ok().unwrap();
        assert_eq!(view.name, "Asha");
        ctx.close().unwrap();
    }

    #[test]
    fn test_custom_reporter_receives_messages() {
        let reporter = SharedReporter::default();
        let ctx = AppContext::in_memory().unwrap().with_reporter(reporter.clone());

        assert!(ctx.repository().log_internship("ghost@x.com", "Acme", "1 month", None, 0).is_not_found());
        assert_eq!(reporter.0.borrow().as_slice(), ["Student email not found."]);
        assert!(ctx.database_path().is_none());
    }
}
