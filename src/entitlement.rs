/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Ad-free entitlement. The calculator itself never consults this; only
//! front ends decide whether to show the banner.

use std::time::{Duration, SystemTime};

/// Length of an ad-free trial
pub const TRIAL_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

pub trait Entitlement {
    fn is_ad_free(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdEntitlement {
    premium: bool,
    trial_started: Option<SystemTime>,
}

impl AdEntitlement {
    pub fn new(premium: bool) -> Self {
        Self {
            premium,
            trial_started: None,
        }
    }

    pub fn start_trial(&mut self, now: SystemTime) {
        self.trial_started.get_or_insert(now);
    }

    /// Whether the trial covers `now`. A clock that went backwards counts
    /// as inside the trial.
    pub fn trial_active_at(&self, now: SystemTime) -> bool {
        self.trial_started.is_some_and(|start| {
            now.duration_since(start)
                .map(|elapsed| elapsed < TRIAL_PERIOD)
                .unwrap_or(true)
        })
    }

    pub fn ad_free_at(&self, now: SystemTime) -> bool {
        self.premium || self.trial_active_at(now)
    }
}

impl Entitlement for AdEntitlement {
    fn is_ad_free(&self) -> bool {
        self.ad_free_at(SystemTime::now())
    }
}
