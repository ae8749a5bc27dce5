//! JSON file storage
//!
//! ```text
//! <root>/funnels/<funnel-id>.json   manifest: name + ordered step list
//! <root>/steps/<step-id>.json       one document per step
//! ```
//!
//! Every file is written to a temp sibling and renamed into place. Replacing a
//! funnel's steps writes all new step files first; renaming the manifest is
//! the commit point, so a failure before it leaves the old funnel intact.

use crate::errors::{WorkspaceError, WorkspaceResult};
use crate::funnel::{Funnel, FunnelManifest, FunnelStep, StepId};
use crate::gateway::PersistenceGateway;
use async_trait::async_trait;
use funnel_editor::Document;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct JsonFileGateway {
    root: PathBuf,
}

impl JsonFileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn funnel_path(&self, funnel_id: &str) -> WorkspaceResult<PathBuf> {
        Ok(self.root.join("funnels").join(format!("{}.json", checked_name(funnel_id)?)))
    }

    fn step_path(&self, step_id: &StepId) -> WorkspaceResult<PathBuf> {
        Ok(self.root.join("steps").join(format!("{}.json", checked_name(step_id.as_str())?)))
    }

    async fn read_json(path: &Path) -> WorkspaceResult<Option<Value>> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WorkspaceError::persistence(path.display(), e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| WorkspaceError::persistence(path.display(), e))
    }

    async fn read_manifest(&self, funnel_id: &str) -> WorkspaceResult<Option<FunnelManifest>> {
        match Self::read_json(&self.funnel_path(funnel_id)?).await? {
            Some(raw) => serde_json::from_value(raw)
                .map(Some)
                .map_err(|e| WorkspaceError::persistence(format!("manifest of {}", funnel_id), e)),
            None => Ok(None),
        }
    }

    /// Write a brand new funnel; refuses to overwrite an existing one
    pub async fn create_funnel(&self, funnel: &Funnel) -> WorkspaceResult<()> {
        if self.read_manifest(&funnel.id).await?.is_some() {
            return Err(WorkspaceError::PersistenceFailure(format!(
                "Funnel {} already exists",
                funnel.id
            )));
        }

        for step in &funnel.steps {
            self.write_step(&step.id, &step.content).await?;
        }

        let mut manifest = funnel.manifest();
        manifest.updated_at = Some(chrono::Utc::now());
        atomic_write(&self.funnel_path(&funnel.id)?, &serde_json::to_value(&manifest)?).await
    }

    /// Write every step file, then commit the manifest. On any failure the
    /// step files written so far are removed again.
    async fn write_steps_and_manifest(
        &self,
        manifest_path: &Path,
        manifest: &FunnelManifest,
        steps: &[FunnelStep],
    ) -> WorkspaceResult<()> {
        let mut written = Vec::with_capacity(steps.len());
        let mut result = Ok(());
        for step in steps {
            match self.write_step(&step.id, &step.content).await {
                Ok(path) => written.push(path),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        if result.is_ok() {
            result = match serde_json::to_value(manifest) {
                Ok(value) => atomic_write(manifest_path, &value).await,
                Err(e) => Err(e.into()),
            };
        }

        if result.is_err() {
            for path in &written {
                let _ = tokio::fs::remove_file(path).await;
            }
        }
        result
    }

    async fn write_step(&self, step_id: &StepId, document: &Document) -> WorkspaceResult<PathBuf> {
        let path = self.step_path(step_id)?;
        atomic_write(&path, &document.to_value()).await?;
        Ok(path)
    }
}

/// Ids become file names; refuse anything that could escape the directory
fn checked_name(id: &str) -> WorkspaceResult<&str> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(WorkspaceError::PersistenceFailure(format!("Invalid storage id: {:?}", id)));
    }
    Ok(id)
}

async fn atomic_write(path: &Path, value: &Value) -> WorkspaceResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| WorkspaceError::persistence(parent.display(), e))?;
    }

    let body = serde_json::to_vec_pretty(value)?;
    let temp_path = path.with_file_name(format!(
        "{}.tmp.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("content"),
        uuid::Uuid::new_v4().simple()
    ));

    tokio::fs::write(&temp_path, body)
        .await
        .map_err(|e| WorkspaceError::persistence(temp_path.display(), e))?;

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(WorkspaceError::persistence(path.display(), e));
    }
    Ok(())
}

#[async_trait]
impl PersistenceGateway for JsonFileGateway {
    async fn save(&self, step_id: &StepId, document: &Document) -> WorkspaceResult<()> {
        let path = self.write_step(step_id, document).await?;
        tracing::debug!("Saved step {} to {}", step_id, path.display());
        Ok(())
    }

    async fn load_step(&self, step_id: &StepId) -> WorkspaceResult<Value> {
        Ok(Self::read_json(&self.step_path(step_id)?).await?.unwrap_or(Value::Null))
    }

    async fn replace_all_steps(&self, funnel_id: &str, steps: &[FunnelStep]) -> WorkspaceResult<()> {
        let manifest_path = self.funnel_path(funnel_id)?;
        let previous = self.read_manifest(funnel_id).await?;

        let manifest = FunnelManifest {
            id: funnel_id.to_string(),
            name: previous
                .as_ref()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| funnel_id.to_string()),
            steps: steps.iter().map(FunnelStep::manifest).collect(),
            updated_at: Some(chrono::Utc::now()),
        };

        self.write_steps_and_manifest(&manifest_path, &manifest, steps).await?;
        tracing::info!("Replaced {} step(s) of funnel {}", steps.len(), funnel_id);

        // Old step files are unreachable now; removing them is best effort
        if let Some(previous) = previous {
            let kept: HashSet<&StepId> = steps.iter().map(|s| &s.id).collect();
            for step in previous.steps.iter().filter(|s| !kept.contains(&s.id)) {
                let path = self.step_path(&step.id)?;
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Could not remove stale step file {}: {}", path.display(), e);
                }
            }
        }
        Ok(())
    }

    async fn load_funnel(&self, funnel_id: &str) -> WorkspaceResult<Funnel> {
        let manifest = self
            .read_manifest(funnel_id)
            .await?
            .ok_or_else(|| WorkspaceError::FunnelNotFound(funnel_id.to_string()))?;

        let mut steps = Vec::with_capacity(manifest.steps.len());
        for step in manifest.steps {
            let raw = self.load_step(&step.id).await?;
            let loaded = Document::load(&raw);
            if !loaded.is_clean() {
                tracing::warn!("Step {} loaded with {} repaired issue(s)", step.id, loaded.issues.len());
            }
            steps.push(step.with_content(loaded.document));
        }

        Ok(Funnel {
            id: manifest.id,
            name: manifest.name,
            steps,
        })
    }
}
