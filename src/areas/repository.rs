//! Repository aggregate
//!
//! Wires the four persistent areas together and threads the working
//! directory path through the engine, so commands can run against any
//! directory (the tests point this at temp dirs).

use crate::areas::database::Database;
use crate::areas::refs::{HeadState, Refs};
use crate::areas::staging::StagingArea;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    staging: Rc<RefCell<StagingArea>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let gitlet_path = path.join(".gitlet");

        let staging = StagingArea::new(gitlet_path.join("stagingArea").into_boxed_path());
        let database = Database::new(gitlet_path.clone().into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(gitlet_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            staging: Rc::new(RefCell::new(staging)),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gitlet_path(&self) -> PathBuf {
        self.path.join(".gitlet")
    }

    pub fn is_initialized(&self) -> bool {
        self.gitlet_path().exists()
    }

    pub fn writer(&self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn staging(&self) -> Rc<RefCell<StagingArea>> {
        self.staging.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Read the current branch name and head commit id. Missing HEAD state
    /// in an initialized repository is an internal inconsistency.
    pub fn head_state(&self) -> anyhow::Result<HeadState> {
        self.refs
            .read_head()?
            .context("Repository head state is missing")
    }

    /// Load the commit HEAD points at.
    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        let head = self.head_state()?;
        self.database.load_commit(&head.commit_id)
    }
}
