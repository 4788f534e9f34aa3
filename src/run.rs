//! Candidate model runs and the loop that picks the first complete one.
use crate::error::{Result, RunFailure, SoundingError};
use chrono::{Duration, NaiveDateTime, Timelike};
use std::fmt;
use tracing::{info, warn};

/// The reference (initialization) time of a model run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunTime {
    /// Whatever the source considers its most recent run.
    Latest,
    /// A specific initialization time in UTC.
    At(NaiveDateTime),
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunTime::Latest => write!(f, "latest"),
            RunTime::At(time) => write!(f, "{} UTC", time.format("%Y-%m-%d %H:%M")),
        }
    }
}

/// A candidate model run: reference time plus forecast horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReferenceRun {
    reference: RunTime,
    horizon: Duration,
}

impl ReferenceRun {
    /// Create a new candidate.
    pub fn new(reference: RunTime, horizon: Duration) -> Self {
        ReferenceRun { reference, horizon }
    }

    /// Reference time of the run.
    #[inline]
    pub fn reference(&self) -> RunTime {
        self.reference
    }

    /// Forecast lead time from the reference time.
    #[inline]
    pub fn horizon(&self) -> Duration {
        self.horizon
    }

    /// Valid time of the forecast, if the reference time is known.
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        match self.reference {
            RunTime::Latest => None,
            RunTime::At(init) => init.checked_add_signed(self.horizon),
        }
    }

    /// The horizon as an ISO 8601 duration, e.g. `P0DT0H` or `P1DT6H`.
    pub fn horizon_iso8601(&self) -> String {
        let total_minutes = self.horizon.num_minutes();
        let days = total_minutes / (24 * 60);
        let hours = (total_minutes % (24 * 60)) / 60;
        let minutes = total_minutes % 60;

        if minutes == 0 {
            format!("P{}DT{}H", days, hours)
        } else {
            format!("P{}DT{}H{}M", days, hours, minutes)
        }
    }
}

impl fmt::Display for ReferenceRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} +{}", self.reference, self.horizon_iso8601())
    }
}

/// Floor `now` to the start of the model cycle it falls in.
///
/// Cycles are counted from midnight, so an `interval` that does not divide a day restarts at
/// midnight. Intervals of a second or less leave `now` with only the sub-second part removed.
pub fn latest_cycle(now: NaiveDateTime, interval: Duration) -> NaiveDateTime {
    let step = interval.num_seconds().max(1);
    let since_midnight = i64::from(now.num_seconds_from_midnight());
    let extra_seconds = since_midnight % step;

    now - Duration::seconds(extra_seconds) - Duration::nanoseconds(i64::from(now.nanosecond()))
}

/// Lazy sequence of candidate runs, most recent first.
#[derive(Clone, Debug)]
pub struct RunCandidates {
    latest_pending: bool,
    next: Option<NaiveDateTime>,
    remaining: usize,
    interval: Duration,
    horizon: Duration,
}

impl RunCandidates {
    /// Candidates `start`, `start - interval`, ... for `lookback` runs.
    ///
    /// The sequence ends early if stepping back leaves the range of representable times.
    pub fn new(
        start: NaiveDateTime,
        lookback: usize,
        interval: Duration,
        horizon: Duration,
    ) -> Self {
        RunCandidates {
            latest_pending: false,
            next: Some(start),
            remaining: lookback,
            interval,
            horizon,
        }
    }

    /// Builder method to try the source's own idea of the latest run before anything else.
    pub fn with_latest_first(mut self, latest_first: bool) -> Self {
        self.latest_pending = latest_first;
        self
    }
}

impl Iterator for RunCandidates {
    type Item = ReferenceRun;

    fn next(&mut self) -> Option<Self::Item> {
        if self.latest_pending {
            self.latest_pending = false;
            return Some(ReferenceRun::new(RunTime::Latest, self.horizon));
        }

        if self.remaining == 0 {
            return None;
        }

        let reference = self.next?;
        self.next = reference.checked_sub_signed(self.interval);
        self.remaining -= 1;

        Some(ReferenceRun::new(RunTime::At(reference), self.horizon))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let latest = usize::from(self.latest_pending);
        match self.next {
            Some(_) if self.remaining > 0 => (latest + 1, Some(latest + self.remaining)),
            _ => (latest, Some(latest)),
        }
    }
}

/// Try candidates in order until `attempt` succeeds for one of them.
///
/// Candidates after the successful one are never touched. If every candidate fails the result is
/// [`SoundingError::NoCompleteRun`] with the reason for each, in the order they were tried.
pub fn select_run<I, F, T>(candidates: I, mut attempt: F) -> Result<(ReferenceRun, T)>
where
    I: IntoIterator<Item = ReferenceRun>,
    F: FnMut(&ReferenceRun) -> Result<T>,
{
    let mut attempts: Vec<RunFailure> = vec![];

    for run in candidates {
        info!(%run, "attempting run");

        match attempt(&run) {
            Ok(val) => {
                info!(%run, failed_before = attempts.len(), "run complete");
                return Ok((run, val));
            }
            Err(reason) => {
                warn!(%run, %reason, "run incomplete");
                attempts.push(RunFailure { run, reason });
            }
        }
    }

    Err(SoundingError::NoCompleteRun { attempts })
}
