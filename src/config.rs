use parking_lot::RwLock;

/// What a shadow does with a failure raised by a method that has no status
/// channel, such as `ID2D1TessellationSink::AddTriangles`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FaultPolicy {
    /// Log the failure and forget it.
    LogAndDrop,
    /// Log the failure and keep the first one. The next `Close` returns it and
    /// [`Shadow::take_fault`](crate::Shadow::take_fault) hands it to Rust code.
    Defer,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ShadowConfig {
    pub fault_policy: FaultPolicy,
}

impl ShadowConfig {
    const INITIAL: Self = Self {
        fault_policy: FaultPolicy::Defer,
    };

    #[inline]
    pub fn fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Replaces the configuration used by shadows created without an explicit one.
    pub fn set_global(config: ShadowConfig) {
        *GLOBAL.write() = config;
    }

    #[inline]
    pub fn global() -> ShadowConfig {
        *GLOBAL.read()
    }
}

impl Default for ShadowConfig {
    #[inline]
    fn default() -> Self {
        Self::global()
    }
}

static GLOBAL: RwLock<ShadowConfig> = parking_lot::const_rwlock(ShadowConfig::INITIAL);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_test() {
        let config = ShadowConfig::INITIAL.fault_policy(FaultPolicy::LogAndDrop);
        assert_eq!(config.fault_policy, FaultPolicy::LogAndDrop);
        assert_eq!(ShadowConfig::INITIAL.fault_policy, FaultPolicy::Defer);
    }

    #[test]
    fn set_global_test() {
        let dropping = ShadowConfig::INITIAL.fault_policy(FaultPolicy::LogAndDrop);
        ShadowConfig::set_global(dropping);
        assert_eq!(ShadowConfig::global(), dropping);
        let shadow = crate::TessellationSinkShadow::new(std::sync::Arc::new(
            crate::testing::RecordingTessellationSink::default(),
        ));
        ShadowConfig::set_global(ShadowConfig::INITIAL);
        assert_eq!(shadow.config().fault_policy, FaultPolicy::LogAndDrop);
        assert_eq!(ShadowConfig::default(), ShadowConfig::INITIAL);
    }
}
