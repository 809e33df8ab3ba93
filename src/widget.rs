use crate::coordinator::{CancelToken, Orchestrator};
use crate::core::config::Config;
use crate::core::mime::MimeRegistry;
use crate::core::model::GroupViewModel;
use crate::render::RenderSink;
use crate::services::directory::Directory;
use std::sync::Arc;
use tracing::{info, warn};

/// Name announced through the load callback once the first render cycle
/// completes.
pub const WIDGET_NAME: &str = "groupboard";

type ClickHandler = Arc<dyn Fn() + Send + Sync>;
type LoadCallback = Box<dyn FnOnce(&str) + Send>;

/// Click binding for the create-group trigger. Rebinding replaces the current
/// handler, so a click always fires exactly one handler no matter how many
/// times binding ran.
#[derive(Default)]
pub struct ClickBinding {
    handler: Option<ClickHandler>,
}

impl ClickBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, handler: ClickHandler) {
        self.handler = Some(handler);
    }

    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }

    pub fn click(&self) {
        if let Some(handler) = &self.handler {
            handler();
        }
    }
}

/// Widget lifecycle: binds the create-group trigger, fetches the session
/// user's memberships, and hands them to the orchestrator exactly once per
/// instance. All collaborators are constructor-injected; there is no ambient
/// registry.
pub struct Widget<D> {
    directory: Arc<D>,
    orchestrator: Orchestrator<D>,
    cancel: CancelToken,
    binding: ClickBinding,
    overlay_trigger: ClickHandler,
    on_load: Option<LoadCallback>,
    started: bool,
}

impl<D: Directory> Widget<D> {
    pub fn new(
        directory: Arc<D>,
        sink: Arc<dyn RenderSink>,
        registry: Arc<MimeRegistry>,
        config: Config,
        overlay_trigger: ClickHandler,
        on_load: LoadCallback,
    ) -> Self {
        let cancel = CancelToken::new();
        let orchestrator = Orchestrator::new(
            directory.clone(),
            sink,
            registry,
            config,
            cancel.clone(),
        );
        Self {
            directory,
            orchestrator,
            cancel,
            binding: ClickBinding::new(),
            overlay_trigger,
            on_load: Some(on_load),
            started: false,
        }
    }

    /// Binds the click trigger (idempotently) and runs one aggregation cycle.
    /// Repeat calls re-bind but never re-run the cycle.
    pub async fn init(&mut self) {
        self.binding.bind(self.overlay_trigger.clone());

        if self.started {
            warn!("Widget already initialised; ignoring repeat init");
            return;
        }
        self.started = true;

        let memberships = self.directory.memberships();
        self.orchestrator.run(memberships).await;

        if let Some(on_load) = self.on_load.take() {
            info!("Widget loaded: {}", WIDGET_NAME);
            on_load(WIDGET_NAME);
        }
    }

    /// Token observed by the aggregation cycle; host code can clone it before
    /// `init` to tear the widget down from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Stops any further renders from in-flight resolvers.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Fires the create-group trigger, as the host's event layer would.
    pub fn click_create_group(&self) {
        self.binding.click();
    }

    pub fn view_models(&self) -> &[GroupViewModel] {
        self.orchestrator.groups()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSink;
    use crate::services::directory::InMemoryDirectory;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn widget(directory: InMemoryDirectory, clicks: Arc<AtomicUsize>, loads: Arc<AtomicUsize>) -> Widget<InMemoryDirectory> {
        let overlay: ClickHandler = Arc::new(move || {
            clicks.fetch_add(1, Ordering::SeqCst);
        });
        let loads_cb = loads.clone();
        Widget::new(
            Arc::new(directory),
            Arc::new(RecordingSink::new()),
            Arc::new(MimeRegistry::with_defaults()),
            Config::default(),
            overlay,
            Box::new(move |_| {
                loads_cb.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    // --- Click Binding Tests ---

    #[tokio::test]
    async fn test_rebinding_fires_one_handler_per_click() {
        let clicks = Arc::new(AtomicUsize::new(0));
        let loads = Arc::new(AtomicUsize::new(0));
        let mut w = widget(InMemoryDirectory::new(), clicks.clone(), loads);

        w.init().await;
        w.init().await; // re-binding must not duplicate handlers

        w.click_create_group();
        assert_eq!(clicks.load(Ordering::SeqCst), 1, "One click fires one handler");

        w.click_create_group();
        assert_eq!(clicks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_click_before_binding_is_a_no_op() {
        let binding = ClickBinding::new();
        assert!(!binding.is_bound());
        binding.click(); // nothing to fire
    }

    // --- Lifecycle Tests ---

    #[tokio::test]
    async fn test_load_announced_exactly_once() {
        let clicks = Arc::new(AtomicUsize::new(0));
        let loads = Arc::new(AtomicUsize::new(0));
        let mut w = widget(InMemoryDirectory::new(), clicks, loads.clone());

        w.init().await;
        w.init().await;

        assert_eq!(loads.load(Ordering::SeqCst), 1, "Load callback fires once");
    }

    #[tokio::test]
    async fn test_teardown_trips_cancel_token() {
        let clicks = Arc::new(AtomicUsize::new(0));
        let loads = Arc::new(AtomicUsize::new(0));
        let w = widget(InMemoryDirectory::new(), clicks, loads);

        let token = w.cancel_token();
        assert!(!token.is_cancelled());
        w.teardown();
        assert!(token.is_cancelled());
    }
}
