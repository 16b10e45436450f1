//! Render-time image fallback guard.
//!
//! One [`FallbackGuard`] lives alongside each displayed city image. When the
//! presentation layer reports a load failure, the guard substitutes a
//! different source at most once per failure chain:
//!
//! ```text
//! Initial --load error--> Fallback1Tried --load error--> Exhausted
//!    ^                                                       |
//!    +------------------------ reset(src) -------------------+
//! ```
//!
//! A failure of the substituted image is accepted silently; the guard never
//! recurses past one substitution.

use crate::{GENERIC_REMOTE_HERITAGE_URL, ImageResolver};

/// Where a guard is in its failure chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackState {
    /// Showing the original source; no failure seen yet.
    Initial,
    /// The original failed and one substitute has been applied.
    Fallback1Tried,
    /// The substitute failed too; no further substitution happens.
    Exhausted,
}

/// Details handed to the caller's `on_error` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadFailure<'a> {
    /// Source that failed to load.
    pub failed_src: &'a str,
    /// Source the guard switched to.
    pub substitute: &'a str,
}

type OnError = Box<dyn FnMut(&LoadFailure<'_>) + Send>;

/// Per-image retry-once state machine.
pub struct FallbackGuard {
    src: String,
    city_name: Option<String>,
    fallback_src: Option<String>,
    state: FallbackState,
    on_error: Option<OnError>,
}

impl std::fmt::Debug for FallbackGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackGuard")
            .field("src", &self.src)
            .field("city_name", &self.city_name)
            .field("fallback_src", &self.fallback_src)
            .field("state", &self.state)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl FallbackGuard {
    /// Creates a guard for an image currently showing `src`.
    ///
    /// A blank `city_name` is treated as unknown.
    #[must_use]
    pub fn new(
        src: impl Into<String>,
        city_name: Option<String>,
        fallback_src: Option<String>,
    ) -> Self {
        Self {
            src: src.into(),
            city_name: city_name.filter(|name| !name.trim().is_empty()),
            fallback_src,
            state: FallbackState::Initial,
            on_error: None,
        }
    }

    /// Registers a callback invoked whenever the guard substitutes a source.
    #[must_use]
    pub fn with_on_error(mut self, on_error: impl FnMut(&LoadFailure<'_>) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// The source that should currently be displayed.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Current position in the failure chain.
    #[must_use]
    pub const fn state(&self) -> FallbackState {
        self.state
    }

    /// Whether a substitute image is being shown (drives the "fallback
    /// image" indicator).
    #[must_use]
    pub fn is_showing_fallback(&self) -> bool {
        self.state != FallbackState::Initial
    }

    /// Handles a load failure of the current source.
    ///
    /// Returns the new source to display, or `None` when the failure is
    /// accepted without substitution.
    pub fn on_load_error(&mut self, resolver: &ImageResolver) -> Option<&str> {
        match self.state {
            FallbackState::Initial => {
                let substitute = self.choose_substitute(resolver);
                log::debug!("Image {} failed to load, switching to {substitute}", self.src);
                let failed = std::mem::replace(&mut self.src, substitute);
                self.state = FallbackState::Fallback1Tried;
                if let Some(on_error) = self.on_error.as_mut() {
                    on_error(&LoadFailure {
                        failed_src: &failed,
                        substitute: &self.src,
                    });
                }
                Some(self.src.as_str())
            }
            FallbackState::Fallback1Tried => {
                log::debug!("Fallback image {} failed to load, giving up", self.src);
                self.state = FallbackState::Exhausted;
                None
            }
            FallbackState::Exhausted => None,
        }
    }

    /// Starts a new failure chain for a newly displayed source.
    pub fn reset(&mut self, src: impl Into<String>) {
        self.src = src.into();
        self.state = FallbackState::Initial;
    }

    fn choose_substitute(&self, resolver: &ImageResolver) -> String {
        match (&self.city_name, &self.fallback_src) {
            (Some(city), None) => {
                let candidate = resolver.resolve_fallback(city, &self.src);
                if candidate != self.src {
                    return candidate;
                }
            }
            (_, Some(explicit)) if *explicit != self.src => return explicit.clone(),
            _ => {}
        }
        GENERIC_REMOTE_HERITAGE_URL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use globetrotter_images_models::ImageSourceEntry;

    use super::*;
    use crate::{DEFAULT_HERITAGE_PATH, ImageTables};

    fn resolver() -> ImageResolver {
        ImageResolver::new(ImageTables::new(
            ["Agra".to_string()],
            [(
                "Goa".to_string(),
                ImageSourceEntry {
                    url: "https://img.example/goa.jpg".to_string(),
                    fallback: Some("/images/cities/goa.jpg".to_string()),
                    description: None,
                },
            )],
        ))
    }

    #[test]
    fn city_without_explicit_fallback_uses_resolver() {
        let r = resolver();
        let mut guard = FallbackGuard::new(r.resolve("Goa"), Some("Goa".to_string()), None);

        assert_eq!(guard.on_load_error(&r), Some("/images/cities/goa.jpg"));
        assert_eq!(guard.state(), FallbackState::Fallback1Tried);
        assert!(guard.is_showing_fallback());
    }

    #[test]
    fn unknown_city_falls_back_to_default_path() {
        let r = resolver();
        let mut guard = FallbackGuard::new(
            "https://cdn.example/bhopal.jpg",
            Some("Bhopal".to_string()),
            None,
        );
        assert_eq!(guard.on_load_error(&r), Some(DEFAULT_HERITAGE_PATH));
    }

    #[test]
    fn resolver_result_equal_to_current_uses_generic_remote() {
        let r = resolver();
        let mut guard = FallbackGuard::new(r.resolve("Agra"), Some("Agra".to_string()), None);
        assert_eq!(guard.on_load_error(&r), Some(GENERIC_REMOTE_HERITAGE_URL));
    }

    #[test]
    fn explicit_fallback_is_used_when_different() {
        let r = resolver();
        let mut guard = FallbackGuard::new(
            "https://img.example/goa.jpg",
            Some("Goa".to_string()),
            Some("/images/custom.jpg".to_string()),
        );
        assert_eq!(guard.on_load_error(&r), Some("/images/custom.jpg"));
    }

    #[test]
    fn explicit_fallback_equal_to_current_uses_generic_remote() {
        let r = resolver();
        let mut guard = FallbackGuard::new(
            "/images/custom.jpg",
            None,
            Some("/images/custom.jpg".to_string()),
        );
        assert_eq!(guard.on_load_error(&r), Some(GENERIC_REMOTE_HERITAGE_URL));
    }

    #[test]
    fn no_city_and_no_fallback_uses_generic_remote() {
        let r = resolver();
        let mut guard = FallbackGuard::new("/broken.jpg", None, None);
        assert_eq!(guard.on_load_error(&r), Some(GENERIC_REMOTE_HERITAGE_URL));
    }

    #[test]
    fn blank_city_name_counts_as_unknown() {
        let r = resolver();
        let mut guard = FallbackGuard::new("/broken.jpg", Some("   ".to_string()), None);
        assert_eq!(guard.on_load_error(&r), Some(GENERIC_REMOTE_HERITAGE_URL));
    }

    #[test]
    fn second_failure_is_accepted_silently() {
        let r = resolver();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let mut guard = FallbackGuard::new("/broken.jpg", None, None).with_on_error(move |f| {
            sink.lock()
                .unwrap()
                .push((f.failed_src.to_string(), f.substitute.to_string()));
        });

        assert!(guard.on_load_error(&r).is_some());
        assert_eq!(guard.on_load_error(&r), None);
        assert_eq!(guard.state(), FallbackState::Exhausted);
        assert_eq!(guard.on_load_error(&r), None);
        assert_eq!(guard.src(), GENERIC_REMOTE_HERITAGE_URL);

        let calls = calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(
                "/broken.jpg".to_string(),
                GENERIC_REMOTE_HERITAGE_URL.to_string()
            )]
        );
    }

    #[test]
    fn reset_starts_a_new_failure_chain() {
        let r = resolver();
        let mut guard = FallbackGuard::new("/a.jpg", None, None);
        guard.on_load_error(&r);
        guard.on_load_error(&r);
        assert_eq!(guard.state(), FallbackState::Exhausted);

        guard.reset("/b.jpg");
        assert_eq!(guard.state(), FallbackState::Initial);
        assert!(!guard.is_showing_fallback());
        assert_eq!(guard.src(), "/b.jpg");
        assert_eq!(guard.on_load_error(&r), Some(GENERIC_REMOTE_HERITAGE_URL));
    }
}
