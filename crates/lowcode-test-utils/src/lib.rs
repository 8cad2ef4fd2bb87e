//! Testing utilities for the lowcode workspace
//!
//! In-memory fakes for the editor engine, the UI, and the HTTP transport,
//! plus a harness wiring them into a `SchemaService`.

#![allow(missing_docs)]

use async_trait::async_trait;
use lowcode_persist::{
    Collaborators, Dialog, KeepAllPackages, Material, MemoryStorage, Notifier, PageReloader,
    PersistConfig, Project, ProjectSchema, SchemaService, SimulatorHost, TransformStage,
};
use lowcode_request::{HttpRequest, RawResponse, RequestClient, RequestError, RequestResult, Transport};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Editor fake: export returns whatever was last imported or set
#[derive(Debug)]
pub struct FakeEditor {
    current: Mutex<Value>,
    packages: Mutex<Vec<Value>>,
    imports: Mutex<Vec<ProjectSchema>>,
    exports: Mutex<Vec<TransformStage>>,
    simulator: Option<Arc<FakeSimulator>>,
}

impl FakeEditor {
    pub fn new(current: Value) -> Self {
        Self {
            current: Mutex::new(current),
            packages: Mutex::new(vec![json!({"package": "@alifd/next", "version": "1.26.4"})]),
            imports: Mutex::new(Vec::new()),
            exports: Mutex::new(Vec::new()),
            simulator: None,
        }
    }

    pub fn with_simulator(mut self, simulator: Arc<FakeSimulator>) -> Self {
        self.simulator = Some(simulator);
        self
    }

    pub fn set_current(&self, schema: Value) {
        *self.current.lock() = schema;
    }

    pub fn set_packages(&self, packages: Vec<Value>) {
        *self.packages.lock() = packages;
    }

    pub fn current(&self) -> Value {
        self.current.lock().clone()
    }

    pub fn imports(&self) -> Vec<ProjectSchema> {
        self.imports.lock().clone()
    }

    pub fn export_stages(&self) -> Vec<TransformStage> {
        self.exports.lock().clone()
    }
}

impl Project for FakeEditor {
    fn export_schema(&self, stage: TransformStage) -> Value {
        self.exports.lock().push(stage);
        self.current()
    }

    fn import_schema(&self, schema: &ProjectSchema) {
        self.imports.lock().push(schema.clone());
        if let Ok(value) = schema.to_value() {
            self.set_current(value);
        }
    }

    fn simulator_host(&self) -> Option<Arc<dyn SimulatorHost>> {
        self.simulator
            .as_ref()
            .map(|s| Arc::clone(s) as Arc<dyn SimulatorHost>)
    }
}

impl Material for FakeEditor {
    fn components_map(&self) -> Value {
        json!([{"componentName": "Button", "package": "@alifd/next"}])
    }

    fn asset_packages(&self) -> Vec<Value> {
        self.packages.lock().clone()
    }
}

/// Counts preview re-renders
#[derive(Debug, Default)]
pub struct FakeSimulator {
    rerenders: AtomicUsize,
}

impl FakeSimulator {
    pub fn rerenders(&self) -> usize {
        self.rerenders.load(Ordering::SeqCst)
    }
}

impl SimulatorHost for FakeSimulator {
    fn rerender(&self) {
        self.rerenders.fetch_add(1, Ordering::SeqCst);
    }
}

/// Dialog that always gives the same answer and records prompts
#[derive(Debug)]
pub struct ScriptedDialog {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedDialog {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Dialog for ScriptedDialog {
    async fn confirm(&self, content: &str) -> bool {
        self.prompts.lock().push(content.to_string());
        self.answer
    }
}

/// Records success notifications
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Counts page reloads
#[derive(Debug, Default)]
pub struct CountingReloader {
    reloads: AtomicUsize,
}

impl CountingReloader {
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl PageReloader for CountingReloader {
    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// Transport answering from a FIFO script; an empty script means offline
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<RequestResult<RawResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: &str) {
        self.script
            .lock()
            .push_back(Ok(RawResponse::new(status, body.as_bytes().to_vec())));
    }

    pub fn push_error(&self, message: &str) {
        self.script
            .lock()
            .push_back(Err(RequestError::transport(message)));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Bodies of recorded requests decoded as JSON
    pub fn json_bodies(&self) -> Vec<Value> {
        self.requests
            .lock()
            .iter()
            .filter_map(|r| r.body.as_deref())
            .filter_map(|b| serde_json::from_slice(b).ok())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<RawResponse> {
        self.requests.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::transport("offline")))
    }
}

/// A `SchemaService` wired to fakes, with handles to inspect them
pub struct Harness {
    pub service: SchemaService,
    pub editor: Arc<FakeEditor>,
    pub simulator: Arc<FakeSimulator>,
    pub dialog: Arc<ScriptedDialog>,
    pub notifier: Arc<RecordingNotifier>,
    pub reloader: Arc<CountingReloader>,
    pub transport: Arc<ScriptedTransport>,
    pub storage: Arc<MemoryStorage>,
}

/// Route `tracing` output to the test writer; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn test_config() -> PersistConfig {
    PersistConfig::new()
        .with_server_base_url("https://api.test")
        .with_object_storage_url("https://oss.test")
}

/// Editor state as the engine would export it for `page`
pub fn exported_project(page: Value) -> Value {
    json!({
        "version": "1.0.0",
        "componentsMap": [],
        "componentsTree": [page],
        "i18n": {}
    })
}

pub fn setup_harness(confirm_reset: bool) -> Harness {
    setup_harness_with(test_config(), confirm_reset)
}

pub fn setup_harness_with(config: PersistConfig, confirm_reset: bool) -> Harness {
    init_tracing();
    let simulator = Arc::new(FakeSimulator::default());
    let editor = Arc::new(
        FakeEditor::new(exported_project(json!({"componentName": "Page", "id": "edited"})))
            .with_simulator(Arc::clone(&simulator)),
    );
    let dialog = Arc::new(ScriptedDialog::new(confirm_reset));
    let notifier = Arc::new(RecordingNotifier::default());
    let reloader = Arc::new(CountingReloader::default());
    let transport = Arc::new(ScriptedTransport::new());
    let storage = Arc::new(MemoryStorage::new());

    let collaborators = Collaborators {
        project: editor.clone(),
        material: editor.clone(),
        package_filter: Arc::new(KeepAllPackages),
        dialog: dialog.clone(),
        notifier: notifier.clone(),
        reloader: reloader.clone(),
    };
    let service = SchemaService::new(
        config,
        storage.clone(),
        RequestClient::new(transport.clone()),
        collaborators,
    );

    Harness {
        service,
        editor,
        simulator,
        dialog,
        notifier,
        reloader,
        transport,
        storage,
    }
}
