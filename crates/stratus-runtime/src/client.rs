//! The client: pipeline assembly and the execution-mode surface.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::warn;

use stratus_auth::{
    Credentials, NullSigner, ProvideCredentials, SignRequest, StaticCredentialsProvider,
};
use stratus_model::Operation;
use stratus_transport::{HttpTransport, NativeTransport};

use crate::config::ClientConfig;
use crate::context::{CallOptions, Disposition, ExecutionContext};
use crate::dispatch::MainThreadDispatcher;
use crate::error::{ErrorCodeRegistry, SdkError};
use crate::handlers::{
    ClassifyHandler, CredentialsHandler, EndpointHandler, HooksHandler, MarshalHandler,
    MetricsHandler, SendHandler, SignHandler, UnmarshalHandler,
};
use crate::hooks::{NoopHooks, PipelineHooks};
use crate::pipeline::{Pipeline, PipelineHandler};

/// A completed call's output plus how it completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome<T> {
    /// The typed operation output.
    pub output: T,
    /// Whether a 404 was downgraded to this output at the caller's request.
    pub suppressed_not_found: bool,
}

/// Executes operations through the handler pipeline.
///
/// Cheap to clone; clones share the pipeline, dispatcher, and runtime
/// handle. One client serves any number of concurrent calls — per-call state
/// lives in the execution context, never in the client.
///
/// # Example
///
/// ```no_run
/// # use stratus_runtime::{Client, ClientConfig, SdkError};
/// # use stratus_model::{Operation, WireRequest, WireResponse};
/// # use stratus_model::{MarshalError, UnmarshalError};
/// # struct Ping;
/// # impl Operation for Ping {
/// #     type Input = ();
/// #     type Output = ();
/// #     const NAME: &'static str = "Ping";
/// #     fn marshall(_: &()) -> Result<WireRequest, MarshalError> {
/// #         Ok(WireRequest::new("Ping", http::Method::GET, "/ping"))
/// #     }
/// #     fn unmarshall(_: &WireResponse) -> Result<(), UnmarshalError> { Ok(()) }
/// # }
/// # async fn run() -> Result<(), SdkError> {
/// let client = Client::builder(ClientConfig::from_env()).build()?;
/// client.invoke::<Ping>(()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    pipeline: Pipeline,
    dispatcher: Option<Arc<MainThreadDispatcher>>,
    handle: Handle,
}

impl Client {
    /// Start building a client over the given configuration.
    #[must_use]
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    /// Execute an operation, returning its typed output.
    ///
    /// The returned future resolves when the call completes; nothing happens
    /// until it is polled.
    ///
    /// # Errors
    ///
    /// Returns the classified [`SdkError`] for any pipeline fault.
    pub async fn invoke<O: Operation>(&self, input: O::Input) -> Result<O::Output, SdkError> {
        let (output, _) = self.run::<O>(input, CallOptions::default()).await?;
        Ok(output)
    }

    /// Execute an operation with explicit per-call options, reporting whether
    /// a 404 was suppressed.
    ///
    /// # Errors
    ///
    /// Returns the classified [`SdkError`] for any pipeline fault.
    pub async fn invoke_detailed<O: Operation>(
        &self,
        input: O::Input,
        options: CallOptions,
    ) -> Result<CallOutcome<O::Output>, SdkError> {
        let (output, disposition) = self.run::<O>(input, options).await?;
        Ok(CallOutcome {
            output,
            suppressed_not_found: disposition == Disposition::SuppressedNotFound,
        })
    }

    /// Execute an operation, blocking the calling thread until it completes.
    ///
    /// Drives the same pipeline future as [`Client::invoke`] on the client's
    /// runtime. Must be called from outside the runtime's worker threads;
    /// calling it from an async context panics (a tokio `block_on` rule, not
    /// a pipeline one).
    ///
    /// # Errors
    ///
    /// Returns the classified [`SdkError`] for any pipeline fault.
    pub fn invoke_blocking<O: Operation>(
        &self,
        input: O::Input,
        options: CallOptions,
    ) -> Result<O::Output, SdkError> {
        let (output, _) = self.handle.block_on(self.run::<O>(input, options))?;
        Ok(output)
    }

    /// Execute an operation without blocking the caller, delivering the
    /// result through `callback` exactly once.
    ///
    /// Delivery is on a runtime worker, unless
    /// [`CallOptions::execute_callback_on_main_thread`] is set and the client
    /// has a dispatcher, in which case the callback runs during the host's
    /// next [`MainThreadDispatcher::tick`]. A result is never both returned
    /// and delivered; this method returns nothing.
    pub fn invoke_with_callback<O, F>(&self, input: O::Input, options: CallOptions, callback: F)
    where
        O: Operation,
        F: FnOnce(Result<CallOutcome<O::Output>, SdkError>) + Send + 'static,
    {
        let client = self.clone();
        let on_main_thread = options.execute_callback_on_main_thread;
        self.handle.spawn(async move {
            let result = client.invoke_detailed::<O>(input, options).await;
            let deliver: crate::dispatch::Job = Box::new(move || callback(result));

            let deliver = match (&client.dispatcher, on_main_thread) {
                (Some(dispatcher), true) => match dispatcher.enqueue(deliver).await {
                    Ok(()) => return,
                    Err(job) => {
                        warn!("main-thread queue unavailable; delivering on worker");
                        job
                    }
                },
                _ => deliver,
            };
            if catch_unwind(AssertUnwindSafe(deliver)).is_err() {
                warn!("completion callback panicked; panic contained");
            }
        });
    }

    /// The dispatcher completions are routed through, if one was configured.
    #[must_use]
    pub fn dispatcher(&self) -> Option<&Arc<MainThreadDispatcher>> {
        self.dispatcher.as_ref()
    }

    async fn run<O: Operation>(
        &self,
        input: O::Input,
        options: CallOptions,
    ) -> Result<(O::Output, Disposition), SdkError> {
        let mut ctx = ExecutionContext::new::<O>(input, options);
        let disposition = self.pipeline.run(&mut ctx).await?;

        let output = ctx
            .output
            .take()
            .ok_or_else(|| SdkError::Internal("pipeline completed without output".to_owned()))?;
        let output = output
            .downcast::<O::Output>()
            .map_err(|_| SdkError::Internal("output type mismatch".to_owned()))?;
        Ok((*output, disposition))
    }
}

/// Assembles a [`Client`] from explicitly injected collaborators.
///
/// Every seam has a default: an unsigned pipeline with anonymous static
/// credentials against the local endpoint. Production clients override the
/// signer, credential provider, and registry for their service.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    signer: Arc<dyn SignRequest>,
    credentials: Arc<dyn ProvideCredentials>,
    registry: ErrorCodeRegistry,
    hooks: Arc<dyn PipelineHooks>,
    dispatcher: Option<Arc<MainThreadDispatcher>>,
    handle: Option<Handle>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Start a builder with default collaborators.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            signer: Arc::new(NullSigner),
            credentials: Arc::new(StaticCredentialsProvider::new(Credentials::new(
                "anonymous", "",
            ))),
            registry: ErrorCodeRegistry::standard(),
            hooks: Arc::new(NoopHooks),
            dispatcher: None,
            handle: None,
        }
    }

    /// Use the given transport instead of the native socket transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use the given signer. The default is [`NullSigner`].
    #[must_use]
    pub fn signer(mut self, signer: Arc<dyn SignRequest>) -> Self {
        self.signer = signer;
        self
    }

    /// Use the given credential provider. The default is anonymous static
    /// credentials.
    #[must_use]
    pub fn credentials(mut self, provider: Arc<dyn ProvideCredentials>) -> Self {
        self.credentials = provider;
        self
    }

    /// Use the given error-code registry. The default is
    /// [`ErrorCodeRegistry::standard`].
    #[must_use]
    pub fn error_registry(mut self, registry: ErrorCodeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Install observation hooks.
    #[must_use]
    pub fn hooks(mut self, hooks: Arc<dyn PipelineHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Route main-thread completions through the given dispatcher.
    #[must_use]
    pub fn dispatcher(mut self, dispatcher: Arc<MainThreadDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Run calls on the given runtime instead of the ambient one.
    #[must_use]
    pub fn runtime_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Assemble the pipeline and produce the client.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Internal`] if no runtime handle is available, or a
    /// transport fault if the default native transport cannot be constructed.
    pub fn build(self) -> Result<Client, SdkError> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| {
                SdkError::Internal(
                    "no tokio runtime: build the client inside one or pass a handle".to_owned(),
                )
            })?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(NativeTransport::new(self.config.transport_config())?),
        };

        let handlers: Vec<Arc<dyn PipelineHandler>> = vec![
            Arc::new(MetricsHandler),
            Arc::new(HooksHandler::new(self.hooks.clone())),
            Arc::new(MarshalHandler::new(
                self.config.user_agent.clone(),
                self.hooks,
            )),
            Arc::new(EndpointHandler::new(self.config.endpoint.clone())),
            Arc::new(CredentialsHandler::new(self.credentials)),
            Arc::new(SignHandler::new(self.signer)),
            Arc::new(ClassifyHandler::new(Arc::new(self.registry))),
            Arc::new(UnmarshalHandler),
            Arc::new(SendHandler::new(transport)),
        ];

        Ok(Client {
            pipeline: Pipeline::new(handlers),
            dispatcher: self.dispatcher,
            handle,
        })
    }
}
