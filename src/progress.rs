//! Persisted player progress
//!
//! Only the tutorial flag survives a reload. It lives in LocalStorage as the
//! string `"true"`; the high score is deliberately session-only.

/// Progress flags kept between sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub tutorial_completed: bool,
}

impl Progress {
    #[cfg(target_arch = "wasm32")]
    const TUTORIAL_KEY: &'static str = "flappyPiggyTutorialCompleted_v1";

    /// Interpret a stored value; anything but `"true"` means not completed
    pub fn from_stored(value: Option<&str>) -> Self {
        Self {
            tutorial_completed: value == Some("true"),
        }
    }

    pub fn mark_tutorial_completed(&mut self) {
        self.tutorial_completed = true;
        self.save();
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let value = storage.and_then(|s| s.get_item(Self::TUTORIAL_KEY).ok().flatten());
        let progress = Self::from_stored(value.as_deref());
        log::info!("Tutorial completed: {}", progress.tutorial_completed);
        progress
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if !self.tutorial_completed {
            return;
        }
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::TUTORIAL_KEY, "true").is_err() {
                log::warn!("Failed to persist tutorial flag");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
