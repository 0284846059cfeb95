//! Application context
//!
//! One `AppContext` is built in `main` and shared (via `Arc`) by the control
//! panel, the polling loop, and the alarm controller. It owns everything
//! those components communicate through, so no module-level globals exist.

use super::config::Config;
use super::log::LogChannel;
use super::region::SelectedRegions;
use super::signal::SignalSet;
use once_cell::sync::OnceCell;

/// Shared application state, constructed once at startup.
pub struct AppContext {
    pub config: Config,
    pub signals: SignalSet,
    pub log: LogChannel,
    regions: OnceCell<SelectedRegions>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            signals: SignalSet::new(),
            log: LogChannel::new(),
            regions: OnceCell::new(),
        }
    }

    /// Record the regions picked during startup. Returns false if they were
    /// already set; regions are immutable once recorded.
    pub fn set_regions(&self, regions: SelectedRegions) -> bool {
        self.regions.set(regions).is_ok()
    }

    /// The selected regions, or `None` before selection has completed.
    pub fn regions(&self) -> Option<&SelectedRegions> {
        self.regions.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::region::Region;

    #[test]
    fn test_regions_set_once() {
        let context = AppContext::new(Config::default());
        assert!(context.regions().is_none());

        let regions = SelectedRegions {
            button: Region::new(0, 0, 10, 10),
            message: Region::new(20, 20, 40, 40),
        };
        assert!(context.set_regions(regions));
        assert!(context.regions().is_some());

        // A second selection attempt is refused
        assert!(!context.set_regions(regions));
    }
}
