//! Project lifecycle store.
//!
//! # Responsibility
//! - Own the active set, recycle bin, deletion log and undo slot.
//! - Persist every affected collection after each mutation.
//!
//! # Invariants
//! - A project id is unique across active set and recycle bin at creation.
//! - Every move from the active set into the recycle bin appends exactly
//!   one log entry.
//! - Only the most recent single deletion is restorable, and only once per
//!   undo cycle; saving a project or bulk-clearing re-arms the cycle.

use crate::model::project::{LogEntry, Project, ProjectDraft, ProjectId};
use crate::repo::kv_repo::{keys, KeyValueRepository};
use crate::service::{format_timestamp, IdGenerator, StoreError, StoreResult};
use log::info;
use std::collections::HashSet;
use std::mem;

/// Single-capacity undo buffer for project deletions.
///
/// Replaces the original nullable-slot-plus-boolean pair with explicit
/// transitions:
///
/// - `Empty`: next single delete arms the slot.
/// - `Armed(p)`: `p` is restorable exactly once.
/// - `Consumed`: a restore has been used; deletes no longer arm the slot
///   until a save or bulk clear resets the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UndoSlot {
    #[default]
    Empty,
    Armed(Project),
    Consumed,
}

impl UndoSlot {
    /// Records a fresh single deletion. No-op once the cycle is consumed.
    fn arm(&mut self, project: Project) {
        if !matches!(self, Self::Consumed) {
            *self = Self::Armed(project);
        }
    }

    /// Takes the restorable project, marking the cycle consumed.
    fn take(&mut self) -> Option<Project> {
        match mem::replace(self, Self::Consumed) {
            Self::Armed(project) => Some(project),
            Self::Empty => {
                *self = Self::Empty;
                None
            }
            Self::Consumed => None,
        }
    }

    /// Starts a new undo cycle with nothing restorable.
    fn reset(&mut self) {
        *self = Self::Empty;
    }

    /// Whether a restore is currently available.
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }
}

/// Result of a single deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// The project that moved into the recycle bin.
    pub project: Project,
    /// Whether this deletion is restorable via [`ProjectStore::restore`].
    pub restorable: bool,
}

/// Store owning project collections and their persistence.
pub struct ProjectStore<R: KeyValueRepository> {
    repo: R,
    active: Vec<Project>,
    recycled: Vec<Project>,
    logs: Vec<LogEntry>,
    undo: UndoSlot,
    ids: IdGenerator,
}

impl<R: KeyValueRepository> ProjectStore<R> {
    /// Loads all persisted collections and seeds the id generator past
    /// every known id, so new records never collide with restored ones.
    pub fn load(repo: R) -> StoreResult<Self> {
        let active: Vec<Project> = repo.load_collection(keys::PROJECTS)?;
        let recycled: Vec<Project> = repo.load_collection(keys::DELETED_PROJECTS)?;
        let logs: Vec<LogEntry> = repo.load_collection(keys::PROJECT_LOGS)?;

        let max_id = active
            .iter()
            .chain(recycled.iter())
            .map(|project| project.id)
            .max()
            .unwrap_or(0);

        Ok(Self {
            repo,
            active,
            recycled,
            logs,
            undo: UndoSlot::Empty,
            ids: IdGenerator::seeded(max_id),
        })
    }

    /// Currently visible, non-deleted projects in display order.
    pub fn active(&self) -> &[Project] {
        &self.active
    }

    /// Soft-deleted projects awaiting permanent purge.
    pub fn recycled(&self) -> &[Project] {
        &self.recycled
    }

    /// Deletion audit log, oldest first.
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Whether a single-deletion restore is currently available.
    pub fn restore_available(&self) -> bool {
        self.undo.is_armed()
    }

    /// Active projects matching a case-insensitive filter term.
    pub fn filtered(&self, term: &str) -> Vec<&Project> {
        self.active
            .iter()
            .filter(|project| project.matches(term))
            .collect()
    }

    /// Creates a new project from form input.
    ///
    /// Rejects blank required fields and duplicates: a draft is a
    /// duplicate when an active project carries the same title and
    /// description and either the images match or the draft has none.
    pub fn create(&mut self, draft: ProjectDraft) -> StoreResult<Project> {
        let draft = draft.normalized();
        if let Some(field) = draft.missing_field() {
            return Err(StoreError::MissingField(field));
        }

        let is_duplicate = self.active.iter().any(|existing| {
            existing.title == draft.title
                && existing.description == draft.description
                && (existing.image == draft.image || draft.image.is_none())
        });
        if is_duplicate {
            return Err(StoreError::Duplicate(format!(
                "project `{}`",
                draft.title
            )));
        }

        let project = Project::from_draft(self.ids.next_id(), draft);
        self.active.push(project.clone());
        self.persist_active()?;
        self.undo.reset();

        info!(
            "event=project_create module=project_store status=ok id={}",
            project.id
        );
        Ok(project)
    }

    /// Replaces the mutable fields of an existing project in place.
    ///
    /// The id and position in the list are preserved; no duplicate check
    /// is applied to edits.
    pub fn update(&mut self, id: ProjectId, draft: ProjectDraft) -> StoreResult<Project> {
        let draft = draft.normalized();
        if let Some(field) = draft.missing_field() {
            return Err(StoreError::MissingField(field));
        }

        let project = self
            .active
            .iter_mut()
            .find(|project| project.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("project {id}")))?;
        project.apply_draft(draft);
        let updated = project.clone();

        self.persist_active()?;
        self.undo.reset();
        Ok(updated)
    }

    /// Moves one project into the recycle bin and appends a log entry.
    ///
    /// Arms the undo slot unless a restore has already been used this
    /// cycle; the outcome reports whether a restore is available.
    pub fn delete(&mut self, id: ProjectId) -> StoreResult<DeleteOutcome> {
        let position = self
            .active
            .iter()
            .position(|project| project.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("project {id}")))?;
        let project = self.active.remove(position);

        self.logs.push(LogEntry {
            title: project.title.clone(),
            time: format_timestamp(),
        });
        self.recycled.push(project.clone());
        self.undo.arm(project.clone());

        self.persist_active()?;
        self.persist_recycled()?;
        self.persist_logs()?;

        info!(
            "event=project_delete module=project_store status=ok id={} restorable={}",
            project.id,
            self.undo.is_armed()
        );
        Ok(DeleteOutcome {
            project,
            restorable: self.undo.is_armed(),
        })
    }

    /// Restores the most recent single deletion, once.
    ///
    /// The restored project intentionally stays in the recycle bin as
    /// well; purge is the only way records leave it.
    pub fn restore(&mut self) -> StoreResult<Project> {
        let project = self.undo.take().ok_or_else(|| {
            StoreError::NotFound("restorable deletion".to_string())
        })?;
        self.active.push(project.clone());
        self.persist_active()?;

        info!(
            "event=project_restore module=project_store status=ok id={}",
            project.id
        );
        Ok(project)
    }

    /// Moves every active project into the recycle bin, one log entry
    /// each, and resets the undo cycle. Bulk clears are not restorable.
    pub fn clear_all(&mut self) -> StoreResult<usize> {
        let moved = self.active.len();
        for project in self.active.drain(..) {
            self.logs.push(LogEntry {
                title: project.title.clone(),
                time: format_timestamp(),
            });
            self.recycled.push(project);
        }
        self.undo.reset();

        self.persist_active()?;
        self.persist_recycled()?;
        self.persist_logs()?;

        info!("event=project_clear_all module=project_store status=ok moved={moved}");
        Ok(moved)
    }

    /// Permanently empties the recycle bin. Irreversible.
    pub fn purge_recycle_bin(&mut self) -> StoreResult<usize> {
        let purged = self.recycled.len();
        self.recycled.clear();
        self.persist_recycled()?;

        info!("event=project_purge module=project_store status=ok purged={purged}");
        Ok(purged)
    }

    /// Permanently empties the deletion log. Irreversible.
    pub fn clear_log(&mut self) -> StoreResult<()> {
        self.logs.clear();
        self.persist_logs()?;
        Ok(())
    }

    /// Serializes the active set as a human-formatted JSON array.
    pub fn export_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(&self.active).map_err(|err| {
            StoreError::Repo(crate::repo::kv_repo::RepoError::Serde {
                key: keys::PROJECTS.to_string(),
                message: err.to_string(),
            })
        })
    }

    /// Merges an exported JSON array into the active set.
    ///
    /// The whole payload is decoded before any state changes, so a
    /// malformed element rejects the import without partial effects.
    /// Elements whose id already exists in the active set are skipped;
    /// everything else is appended under a freshly generated id.
    pub fn import_merge(&mut self, payload: &str) -> StoreResult<usize> {
        let incoming: Vec<Project> = serde_json::from_str(payload)
            .map_err(|err| StoreError::MalformedImport(err.to_string()))?;

        let existing: HashSet<ProjectId> =
            self.active.iter().map(|project| project.id).collect();
        let mut imported = 0;
        for mut project in incoming {
            if existing.contains(&project.id) {
                continue;
            }
            project.id = self.ids.next_id();
            self.active.push(project);
            imported += 1;
        }

        if imported > 0 {
            self.persist_active()?;
        }

        info!("event=project_import module=project_store status=ok imported={imported}");
        Ok(imported)
    }

    fn persist_active(&self) -> StoreResult<()> {
        self.repo.save_collection(keys::PROJECTS, &self.active)?;
        Ok(())
    }

    fn persist_recycled(&self) -> StoreResult<()> {
        self.repo
            .save_collection(keys::DELETED_PROJECTS, &self.recycled)?;
        Ok(())
    }

    fn persist_logs(&self) -> StoreResult<()> {
        self.repo.save_collection(keys::PROJECT_LOGS, &self.logs)?;
        Ok(())
    }
}
