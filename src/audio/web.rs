//! Web Audio backend
//!
//! Sounds are fetched and decoded concurrently at startup. Music tracks keep their
//! source and gain nodes so they can be re-rated and stopped.

use std::collections::HashMap;

use anyhow::{Context, anyhow};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode, Response};

use super::{AudioSink, SoundKey, clamp_playback_rate};
use crate::assets::LoadReport;

struct MusicTrack {
    source: AudioBufferSourceNode,
    gain: GainNode,
}

/// Audio manager backed by an `AudioContext`
pub struct WebAudio {
    ctx: Option<AudioContext>,
    buffers: HashMap<SoundKey, AudioBuffer>,
    music: HashMap<SoundKey, MusicTrack>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            buffers: HashMap::new(),
            music: HashMap::new(),
        }
    }

    /// Fetch and decode every sound at once. Missing sounds play as silence.
    pub async fn load_all(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let Some(ctx) = self.ctx.clone() else {
            return report;
        };

        // Each load settles with either its buffer or an error string, so
        // one failure never rejects the batch.
        let pending = js_sys::Array::new();
        for key in SoundKey::ALL {
            let ctx = ctx.clone();
            pending.push(&future_to_promise(async move {
                Ok(match load_buffer(&ctx, key.asset_path()).await {
                    Ok(buffer) => buffer.into(),
                    Err(err) => JsValue::from_str(&format!("{err:#}")),
                })
            }));
        }

        let settled = match JsFuture::from(js_sys::Promise::all(&pending)).await {
            Ok(settled) => js_sys::Array::from(&settled),
            Err(e) => {
                log::warn!("Audio loading failed: {e:?}");
                return report;
            }
        };
        let buffers = report.record_settled(
            SoundKey::ALL.iter().map(|key| key.as_str()),
            settled.iter().map(settled_buffer),
        );
        for (key, buffer) in SoundKey::ALL.into_iter().zip(buffers) {
            if let Some(buffer) = buffer {
                self.buffers.insert(key, buffer);
            }
        }
        log::info!("Audio setup complete: {report}");
        report
    }

    /// Context handle for shutting audio down from outside the sink
    pub fn context(&self) -> Option<AudioContext> {
        self.ctx.clone()
    }

    /// Resume the context (browsers require a user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    fn start_source(
        &self,
        key: SoundKey,
        looping: bool,
        volume: f32,
    ) -> Option<(AudioBufferSourceNode, GainNode)> {
        let ctx = self.ctx.as_ref()?;
        let buffer = self.buffers.get(&key)?;

        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(buffer));
        source.set_loop(looping);

        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(volume);

        source.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start().ok()?;
        Some((source, gain))
    }
}

fn settled_buffer(value: JsValue) -> anyhow::Result<AudioBuffer> {
    match value.dyn_into::<AudioBuffer>() {
        Ok(buffer) => Ok(buffer),
        Err(other) => Err(anyhow!(
            other.as_string().unwrap_or_else(|| "not an AudioBuffer".to_string())
        )),
    }
}

async fn load_buffer(ctx: &AudioContext, url: &str) -> anyhow::Result<AudioBuffer> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {url}: {e:?}"))?
        .dyn_into()
        .map_err(|_| anyhow!("fetch {url}: not a Response"))?;
    if !response.ok() {
        return Err(anyhow!("fetch {url}: HTTP {}", response.status()));
    }
    let bytes = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| anyhow!("read {url}: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow!("read {url}: {e:?}"))?;
    let array: js_sys::ArrayBuffer = bytes
        .dyn_into()
        .map_err(|_| anyhow!("read {url}: not an ArrayBuffer"))?;
    let decoded = JsFuture::from(
        ctx.decode_audio_data(&array)
            .map_err(|e| anyhow!("decodeAudioData {url}: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow!("decodeAudioData {url}: {e:?}"))?;
    decoded
        .dyn_into::<AudioBuffer>()
        .map_err(|_| anyhow!("decodeAudioData {url}: not an AudioBuffer"))
        .context("decode sound")
}

impl AudioSink for WebAudio {
    fn play_one_shot(&mut self, key: SoundKey, volume: f32) {
        self.resume();
        let _ = self.start_source(key, false, volume);
    }

    fn play_music(&mut self, key: SoundKey, looping: bool, volume: f32) {
        self.resume();
        self.stop(key);
        match self.start_source(key, looping, volume) {
            Some((source, gain)) => {
                self.music.insert(key, MusicTrack { source, gain });
            }
            None => log::warn!("Music track not available: {}", key.as_str()),
        }
    }

    fn stop(&mut self, key: SoundKey) {
        if let Some(track) = self.music.remove(&key) {
            // Throws if already stopped
            #[allow(deprecated)]
            let _ = track.source.stop();
            let _ = track.source.disconnect();
            let _ = track.gain.disconnect();
        }
    }

    fn set_playback_rate(&mut self, key: SoundKey, rate: f32) {
        if let Some(track) = self.music.get(&key) {
            track.source.playback_rate().set_value(clamp_playback_rate(rate));
        }
    }

    fn stop_all(&mut self) {
        let keys: Vec<SoundKey> = self.music.keys().copied().collect();
        for key in keys {
            self.stop(key);
        }
    }
}
