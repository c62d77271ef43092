#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::oneshot;
use wayfinder::{
    Action, Completion, Plugin, Provider, ProviderBuilder, RouteRequest, Target, Task,
    testing::RecordingPresentable,
};

// ============================================================================
// Test Targets
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Page {
    Web(String),
    None,
    Fast,
    Live(String),
    NeedLogin,
    Some,
}

/// A target paired with the screen it presents.
pub struct AppTarget {
    pub page: Page,
    pub screen: RecordingPresentable,
}

impl Target for AppTarget {
    fn task(&self) -> Task {
        match self.page {
            Page::Some => Task::Perform(Action::from_callback(|completion| {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    completion.succeed();
                });
            })),
            _ => Task::present(self.screen.clone()),
        }
    }
}

fn page(screen: &RecordingPresentable, page: Page) -> Option<AppTarget> {
    Some(AppTarget {
        page,
        screen: screen.clone(),
    })
}

/// Routes of the demo application; every presentable target shares `screen`.
pub fn routes(screen: &RecordingPresentable) -> ProviderBuilder<AppTarget> {
    let (web, secure, none, fast, live, login, some) = (
        screen.clone(),
        screen.clone(),
        screen.clone(),
        screen.clone(),
        screen.clone(),
        screen.clone(),
        screen.clone(),
    );
    Provider::<AppTarget>::builder()
        .route("http://<path:_>", move |r: &RouteRequest| {
            page(&web, Page::Web(r.url().to_owned()))
        })
        .route("https://<path:_>", move |r: &RouteRequest| {
            page(&secure, Page::Web(r.url().to_owned()))
        })
        .route("router://open/none", move |_: &RouteRequest| {
            page(&none, Page::None)
        })
        .route("router://open/fast", move |_: &RouteRequest| {
            page(&fast, Page::Fast)
        })
        .route("router://open/live", move |r: &RouteRequest| {
            r.query_param("id").and_then(|id| page(&live, Page::Live(id)))
        })
        .route("router://open/needlogin", move |_: &RouteRequest| {
            page(&login, Page::NeedLogin)
        })
        .action("router://open/some", move |_: &RouteRequest| {
            page(&some, Page::Some)
        })
}

// ============================================================================
// Test Plugins
// ============================================================================

/// Holds back `NeedLogin` pages until a login finishes.
///
/// The login outcome is reported from a spawned task, after `prepare` returned.
#[derive(Clone)]
pub struct AccountPlugin {
    pub logged_in: Arc<AtomicBool>,
    pub login_succeeds: bool,
}

impl AccountPlugin {
    pub fn new(logged_in: bool, login_succeeds: bool) -> Self {
        Self {
            logged_in: Arc::new(AtomicBool::new(logged_in)),
            login_succeeds,
        }
    }
}

impl Plugin<AppTarget> for AccountPlugin {
    fn prepare(
        &self,
        target: &AppTarget,
        completion: Completion,
    ) -> impl std::future::Future<Output = ()> + Send {
        if target.page != Page::NeedLogin || self.logged_in.load(Ordering::SeqCst) {
            completion.succeed();
        } else {
            let logged_in = Arc::clone(&self.logged_in);
            let succeeds = self.login_succeeds;
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                logged_in.store(succeeds, Ordering::SeqCst);
                completion.complete(succeeds);
            });
        }
        std::future::ready(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Open `url` and wait for the completion callback.
///
/// Returns whether the open was admitted and the reported outcome.
pub async fn open(provider: &Provider<AppTarget>, url: &str) -> (bool, bool) {
    let (tx, rx) = oneshot::channel();
    let admitted = provider.open(url, move |ok| {
        let _ = tx.send(ok);
    });
    let outcome = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("completion was called")
        .expect("completion was not dropped");
    (admitted, outcome)
}
