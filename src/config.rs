//! Binder configuration.

/// Builder pattern for [`Binder`](crate::Binder) configuration.
///
/// ```
/// use skeleton_key::BinderConfig;
///
/// let config = BinderConfig::new().with_strip_immutability(false);
/// assert!(!config.strip_immutability());
/// assert!(config.static_members_on_instances());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderConfig {
    strip_immutability: bool,
    static_members_on_instances: bool,
}

impl BinderConfig {
    pub fn new() -> Self {
        Self {
            strip_immutability: true,
            static_members_on_instances: true,
        }
    }

    /// Clear the FINAL bit of fields a setter is bound to.
    ///
    /// When disabled, writes to FINAL fields fail with
    /// [`InvokeError::ImmutableField`](crate::InvokeError::ImmutableField).
    pub fn with_strip_immutability(mut self, strip: bool) -> Self {
        self.strip_immutability = strip;
        self
    }

    /// Let instance binds resolve static methods and fields.
    pub fn with_static_members_on_instances(mut self, allow: bool) -> Self {
        self.static_members_on_instances = allow;
        self
    }

    pub fn strip_immutability(&self) -> bool {
        self.strip_immutability
    }

    pub fn static_members_on_instances(&self) -> bool {
        self.static_members_on_instances
    }
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self::new()
    }
}
