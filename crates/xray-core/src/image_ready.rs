//! Image-ready notification.
//!
//! Tracks whether the widget's image has loaded and decides when the
//! dependent computation (the responsive radius) has to be re-run: on the
//! load transition itself, and afterwards whenever the dependency snapshot
//! changes.

/// Load status of the image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    /// Requested, no outcome yet.
    #[default]
    Pending,
    /// Loaded successfully.
    Loaded,
    /// Failed to load. The responsive radius stays unresolved.
    Failed(String),
}

impl ImageStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageStatus::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ImageStatus::Failed(_))
    }
}

/// Load tracker for one image and its dependent computation.
#[derive(Debug, Clone)]
pub struct ImageReady<D> {
    url: String,
    status: ImageStatus,
    dependencies: D,
    /// Dependencies the computation last ran with.
    last_run: Option<D>,
}

impl<D: PartialEq + Clone> ImageReady<D> {
    /// Start tracking `url` with the initial dependency snapshot.
    pub fn new(url: impl Into<String>, dependencies: D) -> Self {
        Self {
            url: url.into(),
            status: ImageStatus::Pending,
            dependencies,
            last_run: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> &ImageStatus {
        &self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status.is_loaded()
    }

    /// Record a successful load.
    ///
    /// Returns `true` on the first load only.
    pub fn mark_loaded(&mut self) -> bool {
        if self.status.is_loaded() {
            return false;
        }
        self.status = ImageStatus::Loaded;
        self.should_run()
    }

    /// Record a load failure. Ignored once the image has loaded.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        if self.status.is_loaded() {
            return;
        }
        let reason = reason.into();
        log::warn!("Image {} failed to load: {}", self.url, reason);
        self.status = ImageStatus::Failed(reason);
    }

    /// Replace the dependency snapshot.
    ///
    /// Returns `true` when the image has loaded and the snapshot differs from
    /// the one the computation last ran with.
    pub fn update_dependencies(&mut self, dependencies: D) -> bool {
        self.dependencies = dependencies;
        self.should_run()
    }

    /// Point the tracker at a new image; status resets to pending.
    pub fn reset(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.status = ImageStatus::Pending;
        self.last_run = None;
    }

    fn should_run(&mut self) -> bool {
        if !self.status.is_loaded() {
            return false;
        }
        if self.last_run.as_ref() == Some(&self.dependencies) {
            return false;
        }
        self.last_run = Some(self.dependencies.clone());
        true
    }
}
