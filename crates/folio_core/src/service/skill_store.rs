//! Skill store.
//!
//! Same soft-delete plus single-slot-undo shape as the project store, at
//! lower complexity: no audit log, no recycle-bin view, and the undo slot
//! is persisted so the last deletion survives a restart.
//!
//! # Invariants
//! - Duplicate detection and restore matching both key on name OR icon.
//! - The persisted undo slot holds at most one skill.

use crate::model::skill::Skill;
use crate::repo::kv_repo::{keys, KeyValueRepository};
use crate::service::{StoreError, StoreResult};
use log::info;

/// Store owning the skill catalog and its soft-delete bookkeeping.
pub struct SkillStore<R: KeyValueRepository> {
    repo: R,
    active: Vec<Skill>,
    deleted: Vec<Skill>,
    last_deleted: Option<Skill>,
}

impl<R: KeyValueRepository> SkillStore<R> {
    /// Loads persisted skills, deleted skills and the undo slot.
    pub fn load(repo: R) -> StoreResult<Self> {
        let active = repo.load_collection(keys::SKILLS)?;
        let deleted = repo.load_collection(keys::DELETED_SKILLS)?;
        let last_deleted = repo.load_record(keys::LAST_DELETED_SKILL)?;
        Ok(Self {
            repo,
            active,
            deleted,
            last_deleted,
        })
    }

    /// Current skill catalog in display order.
    pub fn active(&self) -> &[Skill] {
        &self.active
    }

    /// Whether a deleted skill is available for restore.
    pub fn restore_available(&self) -> bool {
        self.last_deleted.is_some()
    }

    /// Adds a skill; rejects blank name/icon and name-or-icon duplicates.
    pub fn create(&mut self, skill: Skill) -> StoreResult<Skill> {
        if let Some(field) = skill.missing_field() {
            return Err(StoreError::MissingField(field));
        }
        if self
            .active
            .iter()
            .any(|existing| existing.conflicts_with(&skill))
        {
            return Err(StoreError::Duplicate(format!("skill `{}`", skill.name)));
        }

        self.active.push(skill.clone());
        self.persist_active()?;

        info!(
            "event=skill_create module=skill_store status=ok name={}",
            skill.name
        );
        Ok(skill)
    }

    /// Replaces an existing skill identified by name (case-insensitive).
    pub fn update(&mut self, name: &str, skill: Skill) -> StoreResult<Skill> {
        if let Some(field) = skill.missing_field() {
            return Err(StoreError::MissingField(field));
        }

        let existing = self
            .active
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| StoreError::NotFound(format!("skill `{name}`")))?;
        *existing = skill.clone();

        self.persist_active()?;
        Ok(skill)
    }

    /// Soft-deletes a skill by name and persists it into the undo slot.
    pub fn delete(&mut self, name: &str) -> StoreResult<Skill> {
        let position = self
            .active
            .iter()
            .position(|skill| skill.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| StoreError::NotFound(format!("skill `{name}`")))?;
        let skill = self.active.remove(position);

        self.deleted.push(skill.clone());
        self.last_deleted = Some(skill.clone());

        self.persist_active()?;
        self.persist_deleted()?;
        self.persist_slot()?;

        info!(
            "event=skill_delete module=skill_store status=ok name={}",
            skill.name
        );
        Ok(skill)
    }

    /// Restores the last deleted skill and clears the undo slot.
    ///
    /// Matching entries (by name or icon) leave the deleted set, so a
    /// restored skill cannot be restored twice.
    pub fn restore(&mut self) -> StoreResult<Skill> {
        let skill = self
            .last_deleted
            .take()
            .ok_or_else(|| StoreError::NotFound("restorable skill".to_string()))?;

        self.deleted
            .retain(|deleted| !deleted.conflicts_with(&skill));
        self.active.push(skill.clone());

        self.persist_active()?;
        self.persist_deleted()?;
        self.persist_slot()?;

        info!(
            "event=skill_restore module=skill_store status=ok name={}",
            skill.name
        );
        Ok(skill)
    }

    fn persist_active(&self) -> StoreResult<()> {
        self.repo.save_collection(keys::SKILLS, &self.active)?;
        Ok(())
    }

    fn persist_deleted(&self) -> StoreResult<()> {
        self.repo
            .save_collection(keys::DELETED_SKILLS, &self.deleted)?;
        Ok(())
    }

    fn persist_slot(&self) -> StoreResult<()> {
        self.repo
            .save_record(keys::LAST_DELETED_SKILL, self.last_deleted.as_ref())?;
        Ok(())
    }
}
