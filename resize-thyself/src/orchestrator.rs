//! Volume resize state machine.
//!
//! `Idle -> RequestSent -> Polling -> Completed`, with `Failed` reachable from
//! any state. Only a `completed` modification record ends the wait; the cloud
//! reports `modifying`, `optimizing` and occasionally `failed` while the
//! request is still being worked through.

use crate::config::Config;
use crate::errors::{ResizeError, Result};
use resize_hal::{CloudOps, ModificationState, ResizeRequest, Volume};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeState {
    Idle,
    RequestSent,
    Polling { attempts: u32 },
    Completed,
    Failed,
}

impl fmt::Display for ResizeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeState::Idle => f.write_str("idle"),
            ResizeState::RequestSent => f.write_str("request-sent"),
            ResizeState::Polling { attempts } => write!(f, "polling (check {})", attempts),
            ResizeState::Completed => f.write_str("completed"),
            ResizeState::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The cloud finished growing the volume.
    Completed {
        volume_id: String,
        new_size: u64,
        polls: u32,
    },
    /// Dry run: the request was only validated, nothing changed.
    Skipped { volume_id: String, new_size: u64 },
}

/// Target size in GiB: `current * (100 + grow_percent) / 100`, rounded half away from zero.
///
/// Computed in integers so exact halves (50 GiB at 15%) always round up.
/// Always at least one GiB larger than `current`, since the cloud rejects a
/// modification to the same size.
pub fn new_size(current: u64, grow_percent: u32) -> u64 {
    let scaled = current.saturating_mul(100 + u64::from(grow_percent));
    let target = scaled.saturating_add(50) / 100;
    target.max(current.saturating_add(1))
}

pub fn build_request(volume: &Volume, config: &Config) -> ResizeRequest {
    ResizeRequest {
        volume_id: volume.volume_id.clone(),
        new_size: new_size(volume.size, config.grow_percent),
        dry_run: config.dry_run,
    }
}

pub struct ResizeOrchestrator<'a> {
    cloud: &'a dyn CloudOps,
    config: &'a Config,
    state: ResizeState,
}

impl<'a> ResizeOrchestrator<'a> {
    pub fn new(cloud: &'a dyn CloudOps, config: &'a Config) -> Self {
        Self {
            cloud,
            config,
            state: ResizeState::Idle,
        }
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    fn transition(&mut self, next: ResizeState) {
        log::debug!("resize: {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: ResizeError) -> ResizeError {
        self.transition(ResizeState::Failed);
        err
    }

    /// Grow `volume` and wait until the cloud reports the change complete.
    pub fn run(&mut self, volume: &Volume) -> Result<ResizeOutcome> {
        let request = build_request(volume, self.config);
        log::info!(
            "Resizing {} from {} GiB to {} GiB",
            request.volume_id,
            volume.size,
            request.new_size
        );

        let response = self.cloud.modify_volume(&request);
        self.transition(ResizeState::RequestSent);

        if request.dry_run {
            match response {
                Ok(modification) => log::info!(
                    "DRY RUN: modify-volume accepted ({})",
                    modification.modification_state
                ),
                Err(e) => log::info!("DRY RUN: modify-volume {}: {}", request.volume_id, e),
            }
            return Ok(ResizeOutcome::Skipped {
                volume_id: request.volume_id,
                new_size: request.new_size,
            });
        }

        let modification = match response {
            Ok(modification) => modification,
            Err(e) => {
                let err = ResizeError::cloud(format!("modify-volume {}", request.volume_id), e);
                return Err(self.fail(err));
            }
        };

        let polls = if modification.is_completed() {
            0
        } else {
            self.wait_for_completion(&request.volume_id, modification.modification_state)?
        };
        self.transition(ResizeState::Completed);
        log::info!(
            "Volume {} is now {} GiB",
            request.volume_id,
            request.new_size
        );

        Ok(ResizeOutcome::Completed {
            volume_id: request.volume_id,
            new_size: request.new_size,
            polls,
        })
    }

    fn wait_for_completion(&mut self, volume_id: &str, initial: ModificationState) -> Result<u32> {
        let mut last = initial;
        let mut attempts = 0u32;
        loop {
            if let Some(max) = self.config.max_poll_attempts {
                if attempts >= max {
                    let err = ResizeError::ResizeTimeout {
                        volume_id: volume_id.to_string(),
                        state: last,
                        attempts,
                    };
                    return Err(self.fail(err));
                }
            }

            log::info!(
                "Volume {} is {}; checking again in {}s",
                volume_id,
                last,
                self.config.poll_interval.as_secs()
            );
            std::thread::sleep(self.config.poll_interval);
            attempts += 1;
            self.transition(ResizeState::Polling { attempts });

            let modification = match self.cloud.latest_modification(volume_id) {
                Ok(m) => m,
                Err(e) => {
                    let err = ResizeError::cloud(
                        format!("describe-volumes-modifications {}", volume_id),
                        e,
                    );
                    return Err(self.fail(err));
                }
            };
            if let Some(progress) = modification.progress {
                log::debug!("{} modification progress {}%", volume_id, progress);
            }
            last = modification.modification_state;
            match last {
                ModificationState::Completed => return Ok(attempts),
                ModificationState::Failed | ModificationState::Unknown => {
                    log::warn!("Volume {} reported state '{}'; still waiting", volume_id, last)
                }
                ModificationState::Modifying | ModificationState::Optimizing => {}
            }
        }
    }
}
