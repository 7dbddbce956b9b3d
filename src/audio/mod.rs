//! Audio commands and the sink that plays them
//!
//! The simulation never talks to an audio backend directly. It emits
//! [`AudioCommand`]s; the frame driver forwards them to an [`AudioSink`].
//! Every sink operation is a silent no-op when the sound is missing.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Every sound the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundKey {
    Flap,
    Score,
    Hit,
    BackgroundMusic,
    SpeedMusic,
    EpicMusic,
    MainMenuMusic,
    LevelComplete,
    NewHighScore,
    GameOver,
}

impl SoundKey {
    pub const ALL: [SoundKey; 10] = [
        SoundKey::Flap,
        SoundKey::Score,
        SoundKey::Hit,
        SoundKey::BackgroundMusic,
        SoundKey::SpeedMusic,
        SoundKey::EpicMusic,
        SoundKey::MainMenuMusic,
        SoundKey::LevelComplete,
        SoundKey::NewHighScore,
        SoundKey::GameOver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKey::Flap => "flap",
            SoundKey::Score => "score",
            SoundKey::Hit => "hit",
            SoundKey::BackgroundMusic => "background_music",
            SoundKey::SpeedMusic => "speed_music",
            SoundKey::EpicMusic => "epic_music",
            SoundKey::MainMenuMusic => "main_menu_music",
            SoundKey::LevelComplete => "level_complete",
            SoundKey::NewHighScore => "new_high_score",
            SoundKey::GameOver => "game_over",
        }
    }

    /// URL the sound is fetched from
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundKey::Flap => "assets/flap_sound.mp3",
            SoundKey::Score | SoundKey::LevelComplete => "assets/score_sound.mp3",
            SoundKey::Hit => "assets/hit_sound.mp3",
            SoundKey::BackgroundMusic => "assets/background_music.mp3",
            SoundKey::SpeedMusic => "assets/speed_music.mp3",
            SoundKey::EpicMusic => "assets/epic_music.mp3",
            SoundKey::MainMenuMusic => "assets/main_menu_music.mp3",
            SoundKey::NewHighScore => "assets/stage_clear.mp3",
            SoundKey::GameOver => "assets/game_over.mp3",
        }
    }
}

/// One request to the audio layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    PlayOneShot { key: SoundKey, volume: f32 },
    /// Start a music track, replacing any running instance of the same key
    PlayMusic { key: SoundKey, looping: bool, volume: f32 },
    Stop(SoundKey),
    SetPlaybackRate { key: SoundKey, rate: f32 },
    StopAll,
}

/// Lowest and highest playback rate any sink will apply
pub const MIN_PLAYBACK_RATE: f32 = 0.5;
pub const MAX_PLAYBACK_RATE: f32 = 4.0;

pub fn clamp_playback_rate(rate: f32) -> f32 {
    rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

/// Audio backend contract
pub trait AudioSink {
    fn play_one_shot(&mut self, key: SoundKey, volume: f32);
    fn play_music(&mut self, key: SoundKey, looping: bool, volume: f32);
    fn stop(&mut self, key: SoundKey);
    /// Implementations clamp with [`clamp_playback_rate`]
    fn set_playback_rate(&mut self, key: SoundKey, rate: f32);
    fn stop_all(&mut self);
}

/// Forward one command to a sink
pub fn dispatch(sink: &mut dyn AudioSink, cmd: AudioCommand) {
    match cmd {
        AudioCommand::PlayOneShot { key, volume } => sink.play_one_shot(key, volume),
        AudioCommand::PlayMusic {
            key,
            looping,
            volume,
        } => sink.play_music(key, looping, volume),
        AudioCommand::Stop(key) => sink.stop(key),
        AudioCommand::SetPlaybackRate { key, rate } => sink.set_playback_rate(key, rate),
        AudioCommand::StopAll => sink.stop_all(),
    }
}

/// Sink used when no audio backend is available
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_one_shot(&mut self, _key: SoundKey, _volume: f32) {}
    fn play_music(&mut self, _key: SoundKey, _looping: bool, _volume: f32) {}
    fn stop(&mut self, _key: SoundKey) {}
    fn set_playback_rate(&mut self, _key: SoundKey, _rate: f32) {}
    fn stop_all(&mut self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Sink that records what it was asked to do
    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub log: Vec<AudioCommand>,
        /// Music currently playing and its rate
        pub playing: Vec<(SoundKey, f32)>,
    }

    impl AudioSink for RecordingAudio {
        fn play_one_shot(&mut self, key: SoundKey, volume: f32) {
            self.log.push(AudioCommand::PlayOneShot { key, volume });
        }

        fn play_music(&mut self, key: SoundKey, looping: bool, volume: f32) {
            self.log.push(AudioCommand::PlayMusic {
                key,
                looping,
                volume,
            });
            self.playing.retain(|(k, _)| *k != key);
            self.playing.push((key, 1.0));
        }

        fn stop(&mut self, key: SoundKey) {
            self.log.push(AudioCommand::Stop(key));
            self.playing.retain(|(k, _)| *k != key);
        }

        fn set_playback_rate(&mut self, key: SoundKey, rate: f32) {
            self.log.push(AudioCommand::SetPlaybackRate { key, rate });
            if let Some(entry) = self.playing.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = clamp_playback_rate(rate);
            }
        }

        fn stop_all(&mut self) {
            self.log.push(AudioCommand::StopAll);
            self.playing.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingAudio;
    use super::*;

    #[test]
    fn test_rate_clamp() {
        assert_eq!(clamp_playback_rate(0.1), 0.5);
        assert_eq!(clamp_playback_rate(9.0), 4.0);
        assert_eq!(clamp_playback_rate(1.2), 1.2);
    }

    #[test]
    fn test_dispatch_routes_commands() {
        let mut sink = RecordingAudio::default();
        dispatch(
            &mut sink,
            AudioCommand::PlayMusic {
                key: SoundKey::SpeedMusic,
                looping: true,
                volume: 0.3,
            },
        );
        dispatch(
            &mut sink,
            AudioCommand::SetPlaybackRate {
                key: SoundKey::SpeedMusic,
                rate: 10.0,
            },
        );
        assert_eq!(sink.playing, vec![(SoundKey::SpeedMusic, 4.0)]);
        dispatch(&mut sink, AudioCommand::StopAll);
        assert!(sink.playing.is_empty());
        assert_eq!(sink.log.len(), 3);
    }

    #[test]
    fn test_rate_on_stopped_track_is_noop() {
        let mut sink = RecordingAudio::default();
        sink.set_playback_rate(SoundKey::EpicMusic, 1.5);
        assert!(sink.playing.is_empty());
    }

    #[test]
    fn test_keys_are_unique() {
        let mut names: Vec<_> = SoundKey::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SoundKey::ALL.len());
    }
}
