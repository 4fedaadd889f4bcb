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

// Asset runtime sandbox
// Drives a few concurrent requests against an in-memory catalog.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use balancy_agents::{AssetsRuntime, RuntimeConfig};
use balancy_core::address::AddressResolver;
use balancy_core::asset::{Asset, AssetKind, LoadKey, Texture2D};
use balancy_core::event::{DataUpdated, EventBus};
use balancy_core::platform::RuntimePlatform;
use balancy_infra::{MemorySource, StaticUrlProvider, TokioScheduler};

/// A game-specific asset kind registered next to the built-in ones.
struct Dialogue {
    lines: Vec<&'static str>,
}

impl Asset for Dialogue {
    const KIND: AssetKind = AssetKind::Custom("Dialogue");
}

const SOURCE_LATENCY: Duration = Duration::from_millis(300);

fn load_config() -> Result<RuntimeConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file '{path}'"))?;
            RuntimeConfig::from_ron(&text)
        }
        None => Ok(RuntimeConfig {
            load_timeout_ms: 2_000,
        }),
    }
}

fn fill_catalog(source: &MemorySource) {
    source.insert_asset("logo", "BALANCY_URL//textures/logo.png", Texture2D::new("logo", 256, 128));
    source.insert_asset("banner", "BALANCY_URL//textures/banner.png", Texture2D::new("banner", 1024, 256));
    source.insert_asset(
        "intro",
        "BALANCY_URL//dialogues/intro.txt",
        Dialogue {
            lines: vec!["Welcome back.", "Your reward is waiting."],
        },
    );
    source.insert_asset("outro", "BALANCY_URL//dialogues/outro.txt", Dialogue { lines: vec![] });
    // Simulates a download that never finishes.
    source.withhold(LoadKey::of::<Dialogue>("outro"));
}

#[tokio::main]
async fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let scheduler = Arc::new(TokioScheduler::current()?);
    let addresses = Arc::new(AddressResolver::new());
    let source = Arc::new(
        MemorySource::new()
            .with_latency(scheduler.clone(), SOURCE_LATENCY)
            .with_addresses(addresses.clone()),
    );
    fill_catalog(&source);

    let runtime = AssetsRuntime::builder(source.clone(), scheduler)
        .config(config)
        .addresses(addresses)
        .build();

    // Backend data arrives; the download origin follows it.
    let bus = EventBus::<DataUpdated>::new();
    let provider = StaticUrlProvider::new().with_fallback("https://cdn.example.com/content");
    runtime.subscribe_data_updates(bus.subscribe(), Arc::new(provider), RuntimePlatform::current());
    bus.publish(DataUpdated {
        data_updated: true,
        profile_changed: false,
    });
    runtime.process_data_updates();

    let (tx, rx) = flume::unbounded::<String>();

    for caller in 0..3 {
        let tx = tx.clone();
        runtime.request_asset::<Texture2D, _>("logo", move |texture| {
            let line = match texture {
                Some(texture) => format!("caller {caller}: logo {}x{}", texture.width, texture.height),
                None => format!("caller {caller}: logo unavailable"),
            };
            let _ = tx.send(line);
        });
    }

    let sprite_tx = tx.clone();
    runtime.request_sprite("banner", move |sprite| {
        let line = match sprite {
            Some(sprite) => format!("banner sprite {:?} pivot {:?}", sprite.rect, sprite.pivot),
            None => "banner sprite unavailable".to_string(),
        };
        let _ = sprite_tx.send(line);
    });

    for name in ["intro", "outro"] {
        let tx = tx.clone();
        runtime.request_asset::<Dialogue, _>(name, move |dialogue| {
            let line = match dialogue {
                Some(dialogue) => format!("{name}: {}", dialogue.lines.join(" ")),
                None => format!("{name}: unavailable"),
            };
            let _ = tx.send(line);
        });
    }
    drop(tx);

    // The channel closes once every callback has fired.
    while let Ok(line) = rx.recv_async().await {
        log::info!("{line}");
    }

    for request in source.requests() {
        log::info!(
            "Source load: {} from {}",
            request.key,
            request.location.as_deref().unwrap_or("<unknown>")
        );
    }
    log::info!("{} object(s) cached.", runtime.cached_len());

    runtime.reset();
    Ok(())
}
