use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::poller::PollSchedule;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    #[serde(with = "humantime_serde", default = "PollConfig::default_interval")]
    pub interval: Duration,
    #[serde(default = "PollConfig::default_page_limit")]
    pub page_limit: u32,
}

impl PollConfig {
    fn default_interval() -> Duration {
        Duration::from_secs(30)
    }

    fn default_page_limit() -> u32 {
        10
    }

    /// Zero disables periodic polling for every section.
    pub fn schedule(&self) -> Option<PollSchedule> {
        PollSchedule::every(self.interval)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Self::default_interval(),
            page_limit: Self::default_page_limit(),
        }
    }
}
