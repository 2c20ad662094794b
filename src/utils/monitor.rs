use std::fmt;
use std::time::Duration;

/// The three steps of one refresh, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Query,
    Select,
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Query => write!(f, "catalogue query"),
            Phase::Select => write!(f, "selection"),
            Phase::Write => write!(f, "write"),
        }
    }
}

/// Cost of one finished phase. Process figures are `None` when sysinfo cannot see us.
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: Phase,
    pub duration: Duration,
    pub cpu_usage: Option<f32>,
    pub memory_mb: Option<u64>,
}

#[cfg(feature = "cli")]
mod imp {
    use super::{Phase, PhaseStats};
    use std::sync::Mutex;
    use std::time::Instant;
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

    pub struct RunMonitor {
        system: Mutex<System>,
        pid: Option<Pid>,
        started: Instant,
        last_mark: Mutex<Instant>,
        phases: Mutex<Vec<PhaseStats>>,
        enabled: bool,
    }

    impl RunMonitor {
        pub fn new(enabled: bool) -> Self {
            let pid = if enabled {
                sysinfo::get_current_pid()
                    .map_err(|e| tracing::warn!("⚠️ Process stats unavailable: {}", e))
                    .ok()
            } else {
                None
            };

            let now = Instant::now();
            Self {
                system: Mutex::new(System::new()),
                pid,
                started: now,
                last_mark: Mutex::new(now),
                phases: Mutex::new(Vec::new()),
                enabled,
            }
        }

        pub fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn process_usage(&self) -> Option<(f32, u64)> {
            let pid = self.pid?;
            let mut system = self.system.lock().ok()?;
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_cpu().with_memory(),
            );
            let process = system.process(pid)?;
            Some((process.cpu_usage(), process.memory() / 1024 / 1024))
        }

        /// Closes `phase`, timing it from the previous mark.
        pub fn phase_finished(&self, phase: Phase) -> Option<PhaseStats> {
            if !self.enabled {
                return None;
            }

            let duration = {
                let mut mark = self.last_mark.lock().ok()?;
                let elapsed = mark.elapsed();
                *mark = Instant::now();
                elapsed
            };
            let usage = self.process_usage();

            let stats = PhaseStats {
                phase,
                duration,
                cpu_usage: usage.map(|(cpu, _)| cpu),
                memory_mb: usage.map(|(_, mem)| mem),
            };

            match (stats.cpu_usage, stats.memory_mb) {
                (Some(cpu), Some(mem)) => tracing::info!(
                    "📊 {} took {:?} (CPU {:.1}%, {}MB resident)",
                    phase,
                    duration,
                    cpu,
                    mem
                ),
                _ => tracing::info!("📊 {} took {:?}", phase, duration),
            }

            self.phases.lock().ok()?.push(stats.clone());
            Some(stats)
        }

        pub fn phases(&self) -> Vec<PhaseStats> {
            self.phases
                .lock()
                .map(|phases| phases.clone())
                .unwrap_or_default()
        }

        /// Logs total wall time and the slowest phase; usually the catalogue query.
        pub fn summary(&self) {
            if !self.enabled {
                return;
            }

            let phases = self.phases();
            let peak = phases.iter().filter_map(|p| p.memory_mb).max();
            match phases.iter().max_by_key(|p| p.duration) {
                Some(slowest) => tracing::info!(
                    "📊 Refresh finished in {:?}; slowest phase {} ({:?}), peak {}",
                    self.started.elapsed(),
                    slowest.phase,
                    slowest.duration,
                    peak.map(|mb| format!("{}MB", mb))
                        .unwrap_or_else(|| "unknown".to_string())
                ),
                None => tracing::info!("📊 Refresh finished in {:?}", self.started.elapsed()),
            }
        }
    }
}

// 非 CLI 建置：不計時也不讀取行程資訊
#[cfg(not(feature = "cli"))]
mod imp {
    use super::{Phase, PhaseStats};

    pub struct RunMonitor;

    impl RunMonitor {
        pub fn new(_enabled: bool) -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn phase_finished(&self, _phase: Phase) -> Option<PhaseStats> {
            None
        }

        pub fn phases(&self) -> Vec<PhaseStats> {
            Vec::new()
        }

        pub fn summary(&self) {}
    }
}

pub use imp::RunMonitor;

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
