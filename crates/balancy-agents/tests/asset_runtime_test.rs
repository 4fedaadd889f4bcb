// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use balancy_agents::{AssetsRuntime, RuntimeConfig};
use balancy_core::address::AddressResolver;
use balancy_core::asset::{Asset, AssetKind, LoadCompletion, LoadKey, Texture2D};
use balancy_core::event::{DataUpdated, EventBus};
use balancy_core::platform::{DevicePlatform, RuntimePlatform};
use balancy_infra::{FrameScheduler, MemorySource, StaticUrlProvider, TokioScheduler};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Test Setup: dummy asset kinds and a callback recorder ---
#[derive(Debug, PartialEq)]
struct Prefab {
    id: u32,
}
impl Asset for Prefab {
    const KIND: AssetKind = AssetKind::Prefab;
}

#[derive(Debug, PartialEq)]
struct Model {
    vertices: usize,
}
impl Asset for Model {
    const KIND: AssetKind = AssetKind::Model;
}

/// Records every callback invocation as `(label, value)`.
struct Recorder<T> {
    calls: Arc<Mutex<Vec<(&'static str, Option<Arc<T>>)>>>,
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
        }
    }
}

impl<T: Send + Sync + 'static> Recorder<T> {
    fn callback(&self, label: &'static str) -> impl FnOnce(Option<Arc<T>>) + Send + 'static {
        let calls = self.calls.clone();
        move |value: Option<Arc<T>>| calls.lock().unwrap().push((label, value))
    }

    fn calls(&self) -> Vec<(&'static str, Option<Arc<T>>)> {
        self.calls.lock().unwrap().clone()
    }

    fn labels(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|(label, _)| label).collect()
    }
}

fn seconds(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn delayed_source(scheduler: &Arc<FrameScheduler>, latency: u64) -> Arc<MemorySource> {
    Arc::new(MemorySource::new().with_latency(scheduler.clone(), seconds(latency)))
}
// ---

#[test]
fn texture_loads_once_and_is_served_from_cache() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = delayed_source(&scheduler, 5);
    source.insert_asset("A", "local/A.png", Texture2D::new("A", 32, 32));
    let runtime = AssetsRuntime::new(source.clone(), scheduler.clone());
    let recorder = Recorder::<Texture2D>::default();

    let handle = runtime.request_asset::<Texture2D, _>("A", recorder.callback("first"));
    assert!(handle.is_loading());
    assert!(runtime.is_loading::<Texture2D>("A"));

    scheduler.advance(seconds(4));
    assert!(recorder.calls().is_empty());

    scheduler.advance(seconds(1));
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.as_ref().map(|t| t.name.as_str()), Some("A"));
    assert!(handle.is_finished());

    // Served synchronously, without contacting the source again.
    let again = runtime.request_asset::<Texture2D, _>("A", recorder.callback("cached"));
    assert!(again.is_finished());
    assert_eq!(recorder.labels(), vec!["first", "cached"]);
    assert!(Arc::ptr_eq(
        recorder.calls()[0].1.as_ref().unwrap(),
        recorder.calls()[1].1.as_ref().unwrap()
    ));
    assert_eq!(source.load_count(&LoadKey::of::<Texture2D>("A")), 1);

    // The pending timeout of the settled load is a no-op.
    scheduler.advance(seconds(30));
    assert_eq!(recorder.calls().len(), 2);
}

#[test]
fn concurrent_callers_share_one_load_in_request_order() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = delayed_source(&scheduler, 3);
    source.insert_asset("B", "local/B.prefab", Prefab { id: 42 });
    let runtime = AssetsRuntime::new(source.clone(), scheduler.clone());
    let recorder = Recorder::<Prefab>::default();

    runtime.request_asset::<Prefab, _>("B", recorder.callback("first"));
    runtime.request_asset::<Prefab, _>("B", recorder.callback("second"));
    assert_eq!(source.load_count(&LoadKey::of::<Prefab>("B")), 1);

    scheduler.advance(seconds(3));

    let calls = recorder.calls();
    assert_eq!(recorder.labels(), vec!["first", "second"]);
    let first = calls[0].1.as_ref().expect("first resolved");
    let second = calls[1].1.as_ref().expect("second resolved");
    assert_eq!(first.id, 42);
    assert!(Arc::ptr_eq(first, second));
}

#[test]
fn many_waiters_each_fire_exactly_once() {
    const LABELS: [&str; 8] = ["w0", "w1", "w2", "w3", "w4", "w5", "w6", "w7"];
    let scheduler = Arc::new(FrameScheduler::new());
    let source = delayed_source(&scheduler, 1);
    source.insert_asset("crowd", "local/crowd", Prefab { id: 7 });
    let runtime = AssetsRuntime::new(source.clone(), scheduler.clone());
    let recorder = Recorder::<Prefab>::default();

    for label in LABELS {
        runtime.request_asset::<Prefab, _>("crowd", recorder.callback(label));
    }
    scheduler.advance(seconds(60));

    assert_eq!(recorder.labels(), LABELS.to_vec());
    assert!(recorder.calls().iter().all(|(_, v)| v.as_ref().map(|p| p.id) == Some(7)));
    assert_eq!(source.load_count(&LoadKey::of::<Prefab>("crowd")), 1);
}

#[test]
fn hung_load_times_out_with_none() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = Arc::new(MemorySource::new());
    source.insert_asset("C", "local/C.fbx", Model { vertices: 3 });
    source.withhold(LoadKey::of::<Model>("C"));
    let runtime = AssetsRuntime::new(source, scheduler.clone());
    let recorder = Recorder::<Model>::default();

    runtime.request_asset::<Model, _>("C", recorder.callback("waiter"));

    scheduler.advance(seconds(19));
    assert!(recorder.calls().is_empty());

    scheduler.advance(seconds(1));
    assert_eq!(recorder.calls(), vec![("waiter", None)]);
    assert!(!runtime.is_loading::<Model>("C"));

    scheduler.advance(seconds(100));
    assert_eq!(recorder.calls().len(), 1);
}

#[test]
fn late_success_after_timeout_populates_cache_silently() {
    let scheduler = Arc::new(FrameScheduler::new());
    let parked: Arc<Mutex<Vec<LoadCompletion>>> = Arc::default();
    let loads = Arc::new(AtomicUsize::new(0));
    let source = {
        let parked = parked.clone();
        let loads = loads.clone();
        move |_: &LoadKey, completion: LoadCompletion| {
            loads.fetch_add(1, Ordering::SeqCst);
            parked.lock().unwrap().push(completion);
        }
    };
    let runtime = AssetsRuntime::new(Arc::new(source), scheduler.clone());
    let recorder = Recorder::<Prefab>::default();

    runtime.request_asset::<Prefab, _>("slow", recorder.callback("timed-out"));
    scheduler.advance(seconds(20));
    assert_eq!(recorder.calls(), vec![("timed-out", None)]);

    let completion = parked.lock().unwrap().pop().expect("load started");
    completion(Ok(Arc::new(Prefab { id: 9 })));

    assert_eq!(recorder.calls().len(), 1);
    assert!(runtime.is_cached::<Prefab>("slow"));

    runtime.request_asset::<Prefab, _>("slow", recorder.callback("after"));
    assert_eq!(recorder.calls()[1].1.as_ref().map(|p| p.id), Some(9));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_retry_is_served_the_late_success() {
    let scheduler = Arc::new(FrameScheduler::new());
    let parked: Arc<Mutex<Vec<LoadCompletion>>> = Arc::default();
    let source = {
        let parked = parked.clone();
        move |_: &LoadKey, completion: LoadCompletion| parked.lock().unwrap().push(completion)
    };
    let runtime = AssetsRuntime::new(Arc::new(source), scheduler.clone());
    let recorder = Recorder::<Prefab>::default();

    runtime.request_asset::<Prefab, _>("flaky", recorder.callback("first"));
    scheduler.advance(seconds(20));
    runtime.request_asset::<Prefab, _>("flaky", recorder.callback("retry"));

    let (first_load, retry_load) = {
        let mut parked = parked.lock().unwrap();
        assert_eq!(parked.len(), 2);
        let retry_load = parked.pop().unwrap();
        (parked.pop().unwrap(), retry_load)
    };

    first_load(Ok(Arc::new(Prefab { id: 9 })));
    runtime.request_asset::<Prefab, _>("flaky", recorder.callback("fresh"));
    retry_load(Err(anyhow::anyhow!("connection reset")));

    let calls: Vec<_> = recorder
        .calls()
        .into_iter()
        .map(|(label, value)| (label, value.map(|p| p.id)))
        .collect();
    assert_eq!(calls, vec![("first", None), ("fresh", Some(9)), ("retry", Some(9))]);
}

#[test]
fn failed_load_releases_every_waiter_with_none_in_order() {
    const LABELS: [&str; 4] = ["w0", "w1", "w2", "w3"];
    let scheduler = Arc::new(FrameScheduler::new());
    let source = delayed_source(&scheduler, 2);
    let runtime = AssetsRuntime::new(source.clone(), scheduler.clone());
    let recorder = Recorder::<Prefab>::default();

    for label in LABELS {
        runtime.request_asset::<Prefab, _>("absent", recorder.callback(label));
    }
    scheduler.advance(seconds(1));
    assert!(recorder.calls().is_empty());

    scheduler.advance(seconds(60));

    let expected: Vec<(&str, Option<Arc<Prefab>>)> =
        LABELS.iter().map(|label| (*label, None)).collect();
    assert_eq!(recorder.calls(), expected);
    assert_eq!(source.load_count(&LoadKey::of::<Prefab>("absent")), 1);
}

#[test]
fn timeout_releases_every_waiter_with_none_in_order() {
    const LABELS: [&str; 3] = ["w0", "w1", "w2"];
    let scheduler = Arc::new(FrameScheduler::new());
    let source = Arc::new(MemorySource::new());
    source.insert_asset("stuck", "local/stuck", Model { vertices: 1 });
    source.withhold(LoadKey::of::<Model>("stuck"));
    let runtime = AssetsRuntime::new(source.clone(), scheduler.clone());
    let recorder = Recorder::<Model>::default();

    for label in LABELS {
        runtime.request_asset::<Model, _>("stuck", recorder.callback(label));
    }
    scheduler.advance(seconds(20));
    scheduler.advance(seconds(100));

    let expected: Vec<(&str, Option<Arc<Model>>)> =
        LABELS.iter().map(|label| (*label, None)).collect();
    assert_eq!(recorder.calls(), expected);
    assert_eq!(source.load_count(&LoadKey::of::<Model>("stuck")), 1);
}

#[test]
fn failures_are_not_cached() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = Arc::new(MemorySource::new());
    let runtime = AssetsRuntime::new(source.clone(), scheduler);
    let recorder = Recorder::<Prefab>::default();
    let key = LoadKey::of::<Prefab>("late-arrival");

    runtime.request_asset::<Prefab, _>("late-arrival", recorder.callback("miss"));
    assert_eq!(recorder.calls(), vec![("miss", None)]);
    assert!(!runtime.is_cached::<Prefab>("late-arrival"));

    source.insert_asset("late-arrival", "local/late", Prefab { id: 1 });
    runtime.request_asset::<Prefab, _>("late-arrival", recorder.callback("hit"));

    assert_eq!(recorder.calls()[1].1.as_ref().map(|p| p.id), Some(1));
    assert_eq!(source.load_count(&key), 2);
}

#[test]
fn same_name_under_two_kinds_loads_twice() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = Arc::new(MemorySource::new());
    source.insert_asset("shared", "local/shared.png", Texture2D::new("shared", 1, 1));
    source.insert_asset("shared", "local/shared.prefab", Prefab { id: 5 });
    let runtime = AssetsRuntime::new(source.clone(), scheduler);

    runtime.request_asset::<Texture2D, _>("shared", |_| {});
    runtime.request_asset::<Prefab, _>("shared", |_| {});

    assert_eq!(source.requests().len(), 2);
    assert_eq!(runtime.cached_len(), 2);
    assert_eq!(runtime.cached::<Prefab>("shared").map(|p| p.id), Some(5));
}

#[test]
fn configured_timeout_is_honored() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = Arc::new(MemorySource::new());
    source.withhold(LoadKey::of::<Prefab>("quick"));
    let config = RuntimeConfig::from_ron("(load_timeout_ms: 2000)").unwrap();
    let runtime = AssetsRuntime::builder(source, scheduler.clone())
        .config(config)
        .build();
    let recorder = Recorder::<Prefab>::default();

    runtime.request_asset::<Prefab, _>("quick", recorder.callback("waiter"));
    scheduler.advance(seconds(2));

    assert_eq!(recorder.calls(), vec![("waiter", None)]);
}

#[test]
fn reset_releases_waiters_and_forgets_cache() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = delayed_source(&scheduler, 5);
    source.insert_asset("kept", "local/kept", Prefab { id: 1 });
    source.insert_asset("pending", "local/pending", Prefab { id: 2 });
    let runtime = AssetsRuntime::new(source.clone(), scheduler.clone());
    let recorder = Recorder::<Prefab>::default();

    runtime.request_asset::<Prefab, _>("kept", |_| {});
    scheduler.advance(seconds(5));
    assert!(runtime.is_cached::<Prefab>("kept"));

    runtime.request_asset::<Prefab, _>("pending", recorder.callback("orphan"));
    runtime.reset();

    assert_eq!(recorder.calls(), vec![("orphan", None)]);
    assert_eq!(runtime.cached_len(), 0);

    // The load started before the reset completes without effect.
    scheduler.advance(seconds(30));
    assert_eq!(recorder.calls().len(), 1);
    assert!(!runtime.is_cached::<Prefab>("pending"));
}

#[test]
fn callbacks_may_issue_new_requests() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = delayed_source(&scheduler, 1);
    source.insert_asset("outer", "local/outer", Prefab { id: 1 });
    source.insert_asset("inner", "local/inner", Prefab { id: 2 });
    let runtime = AssetsRuntime::new(source, scheduler.clone());
    let recorder = Recorder::<Prefab>::default();

    let nested = runtime.clone();
    let inner_callback = recorder.callback("inner");
    runtime.request_asset::<Prefab, _>("outer", move |_| {
        nested.request_asset::<Prefab, _>("inner", inner_callback);
    });

    scheduler.advance(seconds(1));
    scheduler.advance(seconds(1));

    assert_eq!(recorder.calls()[0].1.as_ref().map(|p| p.id), Some(2));
}

#[test]
fn untyped_requests_use_their_own_partition() {
    let scheduler = Arc::new(FrameScheduler::new());
    let source = Arc::new(MemorySource::new());
    source.insert(
        LoadKey::new(AssetKind::Object, "anything"),
        "local/anything",
        Arc::new(Prefab { id: 11 }),
    );
    let runtime = AssetsRuntime::new(source, scheduler);

    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    runtime.request_object("anything", move |object| {
        *sink.lock().unwrap() = object.and_then(|o| o.downcast::<Prefab>().ok()).map(|p| p.id);
    });

    assert_eq!(*seen.lock().unwrap(), Some(11));
    assert!(!runtime.is_cached::<Prefab>("anything"));
}

#[test]
fn data_update_reroutes_future_loads() {
    let scheduler = Arc::new(FrameScheduler::new());
    let addresses = Arc::new(AddressResolver::new());
    let source = Arc::new(MemorySource::new().with_addresses(addresses.clone()));
    source.insert_asset("hero", "BALANCY_URL//Android/hero.bundle", Prefab { id: 3 });
    let runtime = AssetsRuntime::builder(source.clone(), scheduler)
        .addresses(addresses)
        .build();

    let bus = EventBus::<DataUpdated>::new();
    let provider = StaticUrlProvider::new()
        .with_url(DevicePlatform::Android, "https://cdn.example.com/game");
    runtime.subscribe_data_updates(bus.subscribe(), Arc::new(provider), RuntimePlatform::Android);

    bus.publish(DataUpdated {
        data_updated: true,
        profile_changed: false,
    });
    assert_eq!(runtime.process_data_updates(), 1);

    runtime.request_asset::<Prefab, _>("hero", |_| {});

    assert_eq!(
        source.requests()[0].location.as_deref(),
        Some("https://cdn.example.com/game/Android/hero.bundle")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn threaded_callers_share_one_load() {
    const CALLERS: usize = 16;
    let loads = Arc::new(AtomicUsize::new(0));
    let source = {
        let loads = loads.clone();
        move |_: &LoadKey, completion: LoadCompletion| {
            loads.fetch_add(1, Ordering::SeqCst);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                completion(Ok(Arc::new(Prefab { id: 77 })));
            });
        }
    };
    let scheduler = Arc::new(TokioScheduler::current().unwrap());
    let runtime = AssetsRuntime::new(Arc::new(source), scheduler);
    let (tx, rx) = flume::unbounded();

    let callers: Vec<_> = (0..CALLERS)
        .map(|_| {
            let runtime = runtime.clone();
            let tx = tx.clone();
            std::thread::spawn(move || {
                runtime.request_asset::<Prefab, _>("threaded", move |prefab| {
                    let _ = tx.send(prefab.map(|p| p.id));
                });
            })
        })
        .collect();
    for caller in callers {
        caller.join().expect("caller thread panicked");
    }

    let mut results = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let result = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
            .await
            .expect("result not delivered in time")
            .expect("channel closed");
        results.push(result);
    }

    assert!(results.iter().all(|id| *id == Some(77)));
    assert!(rx.is_empty());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}
