//! Resolve a sounding from a forecast source, end to end.
use crate::{
    config::PipelineConfig,
    derived::derive_sounding,
    error::Result,
    fetch::{FetchedColumn, VariableFetcher},
    profile::{assemble, RawColumns},
    run::{latest_cycle, select_run, ReferenceRun, RunCandidates},
    sounding::{Sounding, StationInfo},
    source::ForecastSource,
};
use chrono::NaiveDateTime;
use itertools::Itertools;
use tracing::{info, warn};

/// Find the most recent complete model run around `now` and build the sounding at the configured
/// target from it.
///
/// Runs are tried most recent first. A run is complete only if every required variable and at
/// least one humidity variable can be fetched with enough levels, and every derived quantity is
/// well defined. The only error for a valid configuration is
/// [`NoCompleteRun`](crate::SoundingError::NoCompleteRun).
pub fn resolve_sounding<S>(
    source: &S,
    config: &PipelineConfig,
    now: NaiveDateTime,
) -> Result<Sounding>
where
    S: ForecastSource,
{
    config.validate()?;

    let interval = config.interval();
    let candidates = RunCandidates::new(
        latest_cycle(now, interval),
        config.lookback,
        interval,
        config.horizon(),
    )
    .with_latest_first(config.include_latest);

    let fetcher = VariableFetcher::new(
        source,
        &config.collection,
        config.target(),
        config.min_levels,
    )
    .with_perturbed(config.perturbed)
    .with_timeout(config.fetch_timeout());

    let (run, snd) = select_run(candidates, |run| attempt_run(&fetcher, config, run))?;
    info!(%run, levels = snd.len(), humidity = %snd.humidity_source(), "sounding resolved");

    Ok(snd)
}

/// Build a sounding from one run, any failure abandons the whole run.
fn attempt_run<S>(
    fetcher: &VariableFetcher<'_, S>,
    config: &PipelineConfig,
    run: &ReferenceRun,
) -> Result<Sounding>
where
    S: ForecastSource,
{
    let names = &config.variables;

    let pressure = fetcher.fetch_column(&names.pressure, run)?;
    let temperature = fetcher.fetch_column(&names.temperature, run)?;
    let u_wind = fetcher.fetch_column(&names.u_wind, run)?;
    let v_wind = fetcher.fetch_column(&names.v_wind, run)?;
    let (humidity_source, humidity) = fetcher.fetch_humidity(&config.humidity, run)?;
    let geopotential = names
        .geopotential
        .as_deref()
        .and_then(|name| fetch_geopotential(fetcher, name, run, pressure.column.len()));

    let description = format!(
        "{} {}",
        config.collection,
        [&pressure, &temperature, &u_wind, &v_wind, &humidity]
            .iter()
            .map(|fetched| fetched.variable.as_str())
            .chain(geopotential.as_ref().map(|geo| geo.variable.as_str()))
            .join(",")
    );
    let served = pressure.served_reference_time.clone();
    let station = StationInfo::new()
        .with_name(config.site_name.clone())
        .with_target(config.target())
        .with_grid_point(pressure.column.point);

    let profile = assemble(
        RawColumns {
            pressure: pressure.column.values,
            temperature: temperature.column.values,
            u_wind: u_wind.column.values,
            v_wind: v_wind.column.values,
            humidity: humidity.column.values,
            humidity_source,
            geopotential: geopotential.map(|geo| geo.column.values),
        },
        fetcher.min_levels(),
    )?;

    let snd = derive_sounding(&profile, *run, station, config.wind_speed_unit)?;

    Ok(snd
        .with_source_description(description)
        .with_served_reference_time(served))
}

/// Geopotential is optional, a run is never abandoned for lack of it.
fn fetch_geopotential<S>(
    fetcher: &VariableFetcher<'_, S>,
    name: &str,
    run: &ReferenceRun,
    n_levels: usize,
) -> Option<FetchedColumn>
where
    S: ForecastSource,
{
    match fetcher.fetch_column(name, run) {
        Ok(fetched) if fetched.column.len() != n_levels => {
            warn!(
                variable = name,
                %run,
                found = fetched.column.len(),
                expected = n_levels,
                "geopotential levels do not match, skipping heights"
            );
            None
        }
        Ok(fetched) => match fetched.column.values.iter().find(|val| !val.is_finite()) {
            Some(bad) => {
                warn!(
                    variable = name,
                    %run,
                    value = *bad,
                    "bad geopotential value, skipping heights"
                );
                None
            }
            None => Some(fetched),
        },
        Err(reason) => {
            warn!(variable = name, %run, %reason, "geopotential unavailable, skipping heights");
            None
        }
    }
}
