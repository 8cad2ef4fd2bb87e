//! Schema persistence facade
//!
//! Reads and writes a scenario's page schema and package list to local
//! storage or to the remote schema server.
//!
//! # Policies
//!
//! - A missing scenario name is a usage error: logged, nothing happens.
//! - Saves run schema first, then packages; a failure stops the sequence.
//! - Page reads never fail; any problem yields the bundled default page.
//! - Reset always persists to local storage, whatever target saves use.

use crate::collaborators::{Dialog, Material, Notifier, PackageFilter, PageReloader, Project};
use crate::config::PersistConfig;
use crate::error::PersistResult;
use crate::key::{derive_key, Namespace, SaveTarget, ScenarioKey};
use crate::remote::RemoteSchemaStore;
use crate::schema::{
    default_i18n_schema, default_page_schema, empty_packages, page_from_project, ProjectSchema,
    TransformStage,
};
use crate::storage::LocalStorage;
use lowcode_request::RequestClient;
use serde_json::Value;
use std::sync::Arc;

/// Editor and UI collaborators driven by the facade
#[derive(Clone)]
pub struct Collaborators {
    /// Live editor project
    pub project: Arc<dyn Project>,
    /// Component material registry
    pub material: Arc<dyn Material>,
    /// Package filter applied before persisting packages
    pub package_filter: Arc<dyn PackageFilter>,
    /// Confirmation dialog
    pub dialog: Arc<dyn Dialog>,
    /// Toast notifications
    pub notifier: Arc<dyn Notifier>,
    /// Hosting page
    pub reloader: Arc<dyn PageReloader>,
}

/// Result of a reset request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Defaults imported and persisted locally
    Reset,
    /// User declined the confirmation
    Cancelled,
    /// No scenario name was given
    MissingScenario,
}

/// Scenario persistence facade
pub struct SchemaService {
    config: PersistConfig,
    storage: Arc<dyn LocalStorage>,
    remote: RemoteSchemaStore,
    editor: Collaborators,
}

impl std::fmt::Debug for SchemaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaService")
            .field("config", &self.config)
            .field("storage", &self.storage)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl SchemaService {
    /// Create facade
    #[must_use]
    pub fn new(
        config: PersistConfig,
        storage: Arc<dyn LocalStorage>,
        client: RequestClient,
        editor: Collaborators,
    ) -> Self {
        let remote = RemoteSchemaStore::new(client, &config);
        Self {
            config,
            storage,
            remote,
            editor,
        }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Local storage backend
    #[inline]
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn LocalStorage> {
        &self.storage
    }

    /// Storage key of a scenario entry
    #[inline]
    #[must_use]
    pub fn derive_key(&self, scenario: &str, namespace: Namespace) -> String {
        derive_key(scenario, namespace)
    }

    /// Assemble a project schema around `page`
    #[must_use]
    pub fn generate_project_schema(&self, page: Value, i18n: Value) -> ProjectSchema {
        ProjectSchema::new(page, self.editor.material.components_map(), i18n)
            .with_version(self.config.schema_version.clone())
    }

    /// Persist the current editor schema and packages
    ///
    /// # Errors
    /// The first failing write; later writes are not attempted.
    pub async fn save_schema(&self, scenario: &str, target: SaveTarget) -> PersistResult<()> {
        if ScenarioKey::required(scenario, Namespace::ProjectSchema).is_none() {
            return Ok(());
        }
        tracing::info!(scenario, %target, "saving schema");

        match target {
            SaveTarget::Server => {
                self.set_project_schema_to_server(scenario).await?;
                self.set_packages_to_server(scenario).await?;
                self.editor
                    .notifier
                    .success(&self.config.messages.saved_to_server);
            }
            SaveTarget::Local => {
                self.set_project_schema_to_local_storage(scenario)?;
                self.set_packages_to_local_storage(scenario).await?;
                self.editor
                    .notifier
                    .success(&self.config.messages.saved_to_local);
            }
        }
        Ok(())
    }

    /// Replace the editor state with the bundled defaults after confirmation
    ///
    /// The defaults are persisted to local storage only.
    ///
    /// # Errors
    /// Local storage and serialization failures after confirmation.
    pub async fn reset_schema(&self, scenario: &str) -> PersistResult<ResetOutcome> {
        if ScenarioKey::required(scenario, Namespace::ProjectSchema).is_none() {
            return Ok(ResetOutcome::MissingScenario);
        }
        if !self
            .editor
            .dialog
            .confirm(&self.config.messages.reset_confirm)
            .await
        {
            tracing::debug!(scenario, "reset cancelled");
            return Ok(ResetOutcome::Cancelled);
        }

        let defaults = self.generate_project_schema(default_page_schema(), default_i18n_schema());
        self.editor.project.import_schema(&defaults);
        if let Some(host) = self.editor.project.simulator_host() {
            host.rerender();
        }

        self.set_project_schema_to_local_storage(scenario)?;
        self.set_packages_to_local_storage(scenario).await?;
        self.editor.notifier.success(&self.config.messages.reset_done);
        tracing::info!(scenario, "schema reset to defaults");
        Ok(ResetOutcome::Reset)
    }

    /// Write the exported editor schema to local storage
    ///
    /// # Errors
    /// Serialization and storage failures.
    pub fn set_project_schema_to_local_storage(&self, scenario: &str) -> PersistResult<()> {
        let Some(key) = ScenarioKey::required(scenario, Namespace::ProjectSchema) else {
            return Ok(());
        };
        let value = serde_json::to_string(&self.editor.project.export_schema(TransformStage::Save))?;
        self.write_local(&key, &value)
    }

    /// Save the exported editor schema to the server
    ///
    /// # Errors
    /// Serialization and transport failures.
    pub async fn set_project_schema_to_server(&self, scenario: &str) -> PersistResult<()> {
        let Some(key) = ScenarioKey::required(scenario, Namespace::ProjectSchema) else {
            return Ok(());
        };
        let value = self.editor.project.export_schema(TransformStage::Save);
        self.remote.save(&key.storage_key(), &value).await?;
        Ok(())
    }

    /// Write the filtered asset packages to local storage
    ///
    /// # Errors
    /// Serialization and storage failures.
    pub async fn set_packages_to_local_storage(&self, scenario: &str) -> PersistResult<()> {
        let Some(key) = ScenarioKey::required(scenario, Namespace::Packages) else {
            return Ok(());
        };
        let packages = self.filtered_packages().await;
        let value = serde_json::to_string(&packages)?;
        self.write_local(&key, &value)
    }

    /// Save the filtered asset packages to the server
    ///
    /// # Errors
    /// Serialization and transport failures.
    pub async fn set_packages_to_server(&self, scenario: &str) -> PersistResult<()> {
        let Some(key) = ScenarioKey::required(scenario, Namespace::Packages) else {
            return Ok(());
        };
        let packages = Value::Array(self.filtered_packages().await);
        self.remote.save(&key.storage_key(), &packages).await?;
        Ok(())
    }

    async fn filtered_packages(&self) -> Vec<Value> {
        let packages = self.editor.material.asset_packages();
        self.editor.package_filter.filter_packages(packages).await
    }

    fn write_local(&self, key: &ScenarioKey, value: &str) -> PersistResult<()> {
        let storage_key = key.storage_key();
        tracing::debug!(key = %storage_key, bytes = value.len(), "writing local storage");
        self.storage.set_item(&storage_key, value)?;
        Ok(())
    }

    /// Stored project document from local storage
    ///
    /// `Ok(None)` when the scenario is missing or nothing is stored.
    ///
    /// # Errors
    /// Storage failures and stored values that are not JSON.
    pub fn get_project_schema_from_local_storage(
        &self,
        scenario: &str,
    ) -> PersistResult<Option<Value>> {
        let Some(key) = ScenarioKey::required(scenario, Namespace::ProjectSchema) else {
            return Ok(None);
        };
        match self.storage.get_item(&key.storage_key())? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    /// Published project document from the server; `None` on any failure
    pub async fn get_project_schema_from_server(&self, scenario: &str) -> Option<Value> {
        let key = ScenarioKey::required(scenario, Namespace::ProjectSchema)?;
        match self.remote.fetch(&key.storage_key()).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "server schema unavailable");
                None
            }
        }
    }

    /// Root page of the stored project, or the bundled default page
    pub async fn get_page_schema(&self, scenario: &str, target: SaveTarget) -> Value {
        match target {
            SaveTarget::Server => self.get_page_schema_from_server(scenario).await,
            SaveTarget::Local => self.get_page_schema_from_local_storage(scenario),
        }
    }

    /// Stored page wrapped into a project with the bundled i18n document
    pub async fn get_project_schema(&self, scenario: &str, target: SaveTarget) -> ProjectSchema {
        let page = self.get_page_schema(scenario, target).await;
        self.generate_project_schema(page, default_i18n_schema())
    }

    /// Root page from local storage, or the bundled default page
    pub fn get_page_schema_from_local_storage(&self, scenario: &str) -> Value {
        let project = match self.get_project_schema_from_local_storage(scenario) {
            Ok(project) => project,
            Err(e) => {
                tracing::error!(scenario, error = %e, "stored schema unreadable");
                None
            }
        };
        page_or_default(project.as_ref())
    }

    /// Root page from the server, or the bundled default page
    pub async fn get_page_schema_from_server(&self, scenario: &str) -> Value {
        let project = self.get_project_schema_from_server(scenario).await;
        page_or_default(project.as_ref())
    }

    /// Stored packages from local storage
    ///
    /// `Ok(None)` when the scenario is missing; an empty object when nothing
    /// is stored.
    ///
    /// # Errors
    /// Storage failures and stored values that are not JSON.
    pub fn get_packages_from_local_storage(&self, scenario: &str) -> PersistResult<Option<Value>> {
        let Some(key) = ScenarioKey::required(scenario, Namespace::Packages) else {
            return Ok(None);
        };
        match self.storage.get_item(&key.storage_key())? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(Some(empty_packages())),
        }
    }

    /// Published packages from the server; `None` on any failure
    pub async fn get_packages_from_server(&self, scenario: &str) -> Option<Value> {
        let key = ScenarioKey::required(scenario, Namespace::Packages)?;
        match self.remote.fetch(&key.storage_key()).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "server packages unavailable");
                None
            }
        }
    }

    /// Stored packages from the selected backend
    ///
    /// # Errors
    /// Local storage failures; server failures yield `Ok(None)`.
    pub async fn get_packages(&self, scenario: &str, target: SaveTarget) -> PersistResult<Option<Value>> {
        match target {
            SaveTarget::Server => Ok(self.get_packages_from_server(scenario).await),
            SaveTarget::Local => self.get_packages_from_local_storage(scenario),
        }
    }

    /// Preview locale of a scenario, or the configured default
    #[must_use]
    pub fn get_preview_locale(&self, scenario: &str) -> String {
        let key = derive_key(scenario, Namespace::PreviewLocale);
        match self.storage.get_item(&key) {
            Ok(Some(locale)) if !locale.is_empty() => locale,
            Ok(_) => self.config.default_locale.clone(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "preview locale unreadable");
                self.config.default_locale.clone()
            }
        }
    }

    /// Store the preview locale and reload the page
    ///
    /// An empty locale stores the configured default.
    ///
    /// # Errors
    /// Storage failures; the page is not reloaded then.
    pub fn set_preview_locale(&self, scenario: &str, locale: &str) -> PersistResult<()> {
        let key = derive_key(scenario, Namespace::PreviewLocale);
        let locale = if locale.is_empty() {
            self.config.default_locale.as_str()
        } else {
            locale
        };
        self.storage.set_item(&key, locale)?;
        self.editor.reloader.reload();
        Ok(())
    }
}

fn page_or_default(project: Option<&Value>) -> Value {
    project
        .and_then(page_from_project)
        .unwrap_or_else(default_page_schema)
}
