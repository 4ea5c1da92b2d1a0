//! Production wiring from settings.

use std::sync::Arc;

use quire_core::WorkspaceLayout;
use quire_core::generation::Generator;
use quire_passes::{FactCheckPass, ProgressPass};
use quire_settings::QuireSettings;
use quire_tools::providers::{ReqwestHttpClient, TokioProcessRunner};
use quire_tools::tools::SearchWebTool;
use quire_tools::{
    CompileOptions, Compiler, ComposioDriveClient, DriveClient, Notebook, SearchClient,
    ToolRegistry, YouSearchClient,
};
use tracing::info;

use crate::background::BackgroundPasses;
use crate::errors::RuntimeError;
use crate::session::{Session, SessionOptions};

/// The notebook components for the active workspace.
pub struct Services {
    /// Workspace layout.
    pub layout: WorkspaceLayout,
    /// Sandboxed notebook operations.
    pub notebook: Arc<Notebook>,
    /// Typesetting pipeline.
    pub compiler: Arc<Compiler>,
    /// Web search, when an API key is configured.
    pub search: Option<Arc<dyn SearchClient>>,
    /// Google Drive import, when an API key is configured.
    pub drive: Option<Arc<dyn DriveClient>>,
    /// Settings the services were built from.
    pub settings: QuireSettings,
}

impl Services {
    /// Build the services for the active class. Fails when no class is
    /// selected or its directory does not exist.
    pub fn from_settings(settings: &QuireSettings) -> Result<Self, RuntimeError> {
        let layout = settings.layout()?;
        if !layout.root().is_dir() {
            return Err(RuntimeError::WorkspaceMissing {
                path: layout.root().to_path_buf(),
            });
        }

        let notebook = Arc::new(Notebook::new(layout.clone()));
        let compiler = Arc::new(Compiler::new(
            layout.clone(),
            Arc::new(TokioProcessRunner),
            CompileOptions {
                typeset_program: settings.compile.typeset_program.clone(),
                index_program: settings.compile.index_program.clone(),
                timeout_ms: settings.compile.timeout_ms,
                backend_url: settings.server.backend_url.clone(),
            },
        ));

        let search = settings
            .search
            .api_key
            .as_deref()
            .filter(|_| settings.fact_check_enabled())
            .map(|key| {
                let client: Arc<dyn SearchClient> = Arc::new(YouSearchClient::new(
                    Arc::new(ReqwestHttpClient::new(settings.search.timeout_ms)),
                    key.trim(),
                    settings.search.endpoint.clone(),
                    settings.search.num_results,
                ));
                client
            });

        let drive = settings
            .drive
            .api_key
            .as_deref()
            .filter(|_| settings.drive_enabled())
            .map(|key| {
                let client: Arc<dyn DriveClient> = Arc::new(ComposioDriveClient::new(
                    Arc::new(ReqwestHttpClient::new(settings.drive.timeout_ms)),
                    key.trim(),
                    settings.drive.endpoint.clone(),
                    settings.drive.toolkit_version.clone(),
                    settings.drive.user_id.clone(),
                ));
                client
            });

        info!(
            workspace = %layout.root().display(),
            search = search.is_some(),
            drive = drive.is_some(),
            "services ready"
        );
        Ok(Self {
            layout,
            notebook,
            compiler,
            search,
            drive,
            settings: settings.clone(),
        })
    }

    /// The conversational toolset.
    pub fn notebook_tools(&self) -> ToolRegistry {
        ToolRegistry::notebook_tools(Arc::clone(&self.notebook), Arc::clone(&self.compiler))
    }

    /// The notebook tools plus the Drive import tools when Drive is
    /// configured. Offered in conversation.
    pub fn chat_tools(&self) -> ToolRegistry {
        let mut registry = self.notebook_tools();
        if let Some(drive) = &self.drive {
            registry.merge(ToolRegistry::drive_tools(Arc::clone(drive)));
        }
        registry
    }

    /// Every tool, including `search_web` when search is configured. Used
    /// for manual invocation.
    pub fn all_tools(&self) -> ToolRegistry {
        let mut registry = self.chat_tools();
        if let Some(search) = &self.search {
            registry.register(Arc::new(SearchWebTool::new(Arc::clone(search))));
        }
        registry
    }

    /// The fact-check pass, when search is configured.
    pub fn fact_check_pass(&self, generator: Arc<dyn Generator>) -> Option<FactCheckPass> {
        self.search.as_ref().map(|search| {
            FactCheckPass::new(
                self.layout.clone(),
                generator,
                Arc::new(ToolRegistry::search_tools(Arc::clone(search))),
                self.settings.class_name(),
            )
            .with_tool_call_limit(self.settings.passes.fact_check_tool_call_limit)
        })
    }

    /// The progress pass.
    pub fn progress_pass(&self, generator: Arc<dyn Generator>) -> ProgressPass {
        ProgressPass::new(self.layout.clone(), generator, self.settings.class_name())
    }

    /// A session with both background passes wired to `generator`.
    pub fn session(&self, generator: Arc<dyn Generator>) -> Session {
        let mut background =
            BackgroundPasses::new().with_progress(self.progress_pass(Arc::clone(&generator)));
        if let Some(pass) = self.fact_check_pass(Arc::clone(&generator)) {
            background = background.with_fact_check(pass);
        }
        Session::with_background(
            self.layout.clone(),
            generator,
            Arc::new(self.chat_tools()),
            SessionOptions::from_settings(&self.settings),
            background,
        )
    }
}
