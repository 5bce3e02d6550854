use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::{Scene, SceneError, SceneManager, TransitionOptions};
use crate::audio::AudioManager;
use crate::config::RuntimeConfig;
use crate::context::{GameContext, InputEvent};
use crate::platform::LocalPlatform;

type Log = Arc<Mutex<Vec<String>>>;

fn count(log: &Log, entry: &str) -> usize {
    log.lock().iter().filter(|e| *e == entry).count()
}

fn context() -> GameContext {
    GameContext::new(
        RuntimeConfig::default(),
        Arc::new(LocalPlatform::new()),
        AudioManager::silent(),
    )
}

type Follow = Box<dyn FnOnce() -> Box<dyn Scene> + Send>;

/// Scene that records every lifecycle call.
struct Probe {
    name: &'static str,
    log: Log,
    fail: bool,
    /// Signalled on entering `create`, before waiting on `gate`.
    entered: Option<Arc<Notify>>,
    gate: Option<Arc<Notify>>,
    /// Requested from inside `create`.
    follow: Option<Follow>,
}

impl Probe {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            fail: false,
            entered: None,
            gate: None,
            follow: None,
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn gated(mut self, entered: &Arc<Notify>, gate: &Arc<Notify>) -> Self {
        self.entered = Some(entered.clone());
        self.gate = Some(gate.clone());
        self
    }

    fn then_request(mut self, follow: Follow) -> Self {
        self.follow = Some(follow);
        self
    }

    fn boxed(self) -> Box<dyn Scene> {
        Box::new(self)
    }

    fn record(&self, event: &str) {
        self.log.lock().push(format!("{}:{event}", self.name));
    }
}

#[async_trait]
impl Scene for Probe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn create(&mut self, ctx: &mut GameContext) -> Result<(), SceneError> {
        self.record("create");
        if let Some(follow) = self.follow.take() {
            ctx.scenes.request(follow(), TransitionOptions::default());
        }
        if let Some(entered) = &self.entered {
            entered.notify_one();
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(SceneError::create(self.name, "probe failure"));
        }
        Ok(())
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut GameContext) {
        self.record("update");
    }

    fn handle_input(&mut self, _event: InputEvent, _ctx: &mut GameContext) {
        self.record("input");
    }

    fn exit(&mut self, _ctx: &mut GameContext) {
        self.record("exit");
    }

    fn destroy(&mut self) {
        self.record("destroy");
    }
}

#[tokio::test]
async fn change_scene_runs_full_lifecycle() {
    let log = Log::default();
    let mut ctx = context();
    let mut manager = SceneManager::new();

    manager
        .change_scene(&mut ctx, Probe::new("s1", &log).boxed(), TransitionOptions::default())
        .await
        .unwrap();
    manager
        .change_scene(
            &mut ctx,
            Probe::new("s2", &log).boxed(),
            TransitionOptions::fade(Duration::from_millis(300)),
        )
        .await
        .unwrap();

    assert_eq!(
        *log.lock(),
        vec!["s1:create", "s1:exit", "s1:destroy", "s2:create"]
    );
    assert_eq!(manager.active_name(), Some("s2"));
    let root = manager.stage().root().unwrap();
    assert_eq!(root.scene, "s2");
    assert_eq!(root.options.fade, Some(Duration::from_millis(300)));
    assert!(!ctx.scenes.is_transitioning());
}

#[tokio::test]
async fn requests_during_transition_coalesce_to_latest() {
    let log = Log::default();
    let mut ctx = context();
    let mut manager = SceneManager::new();
    manager
        .change_scene(&mut ctx, Probe::new("s1", &log).boxed(), TransitionOptions::default())
        .await
        .unwrap();

    let entered = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let requests = ctx.scenes.clone();
    let s2 = Probe::new("s2", &log).gated(&entered, &gate).boxed();

    let transition = manager.change_scene(&mut ctx, s2, TransitionOptions::default());
    let host = async {
        entered.notified().await;
        assert!(requests.is_transitioning());
        requests.request(Probe::new("s3", &log).boxed(), TransitionOptions::default());
        requests.request(Probe::new("s4", &log).boxed(), TransitionOptions::default());
        assert_eq!(requests.pending_name(), Some("s4"));
        gate.notify_one();
    };
    let (result, ()) = tokio::join!(transition, host);
    result.unwrap();

    assert_eq!(manager.active_name(), Some("s4"));
    for name in ["s1", "s2"] {
        assert_eq!(count(&log, &format!("{name}:create")), 1);
        assert_eq!(count(&log, &format!("{name}:exit")), 1);
        assert_eq!(count(&log, &format!("{name}:destroy")), 1);
    }
    assert_eq!(count(&log, "s4:create"), 1);
    assert_eq!(count(&log, "s4:exit"), 0);
    assert!(log.lock().iter().all(|e| !e.starts_with("s3")));
    assert_eq!(manager.transitions(), 3);
    assert!(!ctx.scenes.has_pending());
}

#[tokio::test]
async fn request_from_create_is_applied_after_it() {
    let log = Log::default();
    let mut ctx = context();
    let mut manager = SceneManager::new();
    let follow_log = log.clone();
    let s1 = Probe::new("s1", &log)
        .then_request(Box::new(move || Probe::new("s2", &follow_log).boxed()))
        .boxed();

    manager
        .change_scene(&mut ctx, s1, TransitionOptions::default())
        .await
        .unwrap();

    assert_eq!(
        *log.lock(),
        vec!["s1:create", "s1:exit", "s1:destroy", "s2:create"]
    );
    assert_eq!(manager.active_name(), Some("s2"));
}

#[tokio::test]
async fn failed_create_leaves_no_active_scene() {
    let log = Log::default();
    let mut ctx = context();
    let mut manager = SceneManager::new();
    manager
        .change_scene(&mut ctx, Probe::new("s1", &log).boxed(), TransitionOptions::default())
        .await
        .unwrap();

    let follow_log = log.clone();
    let broken = Probe::new("broken", &log)
        .failing()
        .then_request(Box::new(move || Probe::new("s5", &follow_log).boxed()))
        .boxed();
    let err = manager
        .change_scene(&mut ctx, broken, TransitionOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err, SceneError::create("broken", "probe failure"));
    assert_eq!(manager.active_name(), None);
    assert!(manager.stage().root().is_none());
    assert!(!ctx.scenes.has_pending());
    assert!(!ctx.scenes.is_transitioning());
    assert_eq!(count(&log, "s1:exit"), 1);
    assert_eq!(count(&log, "broken:destroy"), 1);
    assert_eq!(count(&log, "broken:exit"), 0);
    assert_eq!(count(&log, "s5:create"), 0);

    // The manager stays usable.
    manager
        .change_scene(&mut ctx, Probe::new("s6", &log).boxed(), TransitionOptions::default())
        .await
        .unwrap();
    assert_eq!(manager.active_name(), Some("s6"));
}

#[tokio::test]
async fn update_and_input_are_skipped_while_transitioning() {
    let log = Log::default();
    let mut ctx = context();
    let mut manager = SceneManager::new();
    manager
        .change_scene(&mut ctx, Probe::new("s1", &log).boxed(), TransitionOptions::default())
        .await
        .unwrap();

    ctx.scenes.set_transitioning(true);
    manager.update(Duration::from_millis(16), &mut ctx);
    manager.handle_input(InputEvent::Confirm, &mut ctx);
    assert_eq!(count(&log, "s1:update"), 0);

    ctx.scenes.set_transitioning(false);
    manager.update(Duration::from_millis(16), &mut ctx);
    manager.handle_input(InputEvent::Confirm, &mut ctx);
    assert_eq!(count(&log, "s1:update"), 1);
    assert_eq!(count(&log, "s1:input"), 1);
}

#[tokio::test]
async fn flush_pending_applies_waiting_request() {
    let log = Log::default();
    let mut ctx = context();
    let mut manager = SceneManager::new();
    assert!(!manager.flush_pending(&mut ctx).await.unwrap());

    ctx.scenes
        .request(Probe::new("s1", &log).boxed(), TransitionOptions::default());
    ctx.scenes
        .request(Probe::new("s2", &log).boxed(), TransitionOptions::default());
    assert!(manager.flush_pending(&mut ctx).await.unwrap());
    assert_eq!(manager.active_name(), Some("s2"));
    assert_eq!(count(&log, "s1:create"), 0);

    manager.shutdown(&mut ctx);
    assert_eq!(manager.active_name(), None);
    assert_eq!(count(&log, "s2:destroy"), 1);
}
