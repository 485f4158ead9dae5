//! Resolution of configured mapping tables and their validation.

use road_common::{
    FluxFlags, ForecastTag, ObservationTag, ParameterKind, RoadcastTag, SensorDepth, StationType,
    TagRequirement,
};
use tracing::{debug, info, warn};

use crate::compatibility::is_compatible;
use crate::config::MappingTableConfig;
use crate::error::{ValidationFailure, ValidationFailures};
use crate::source::DataSource;
use crate::table::{MappingTable, MappingTag};

/// Station settings the mapping rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverContext {
    pub station_type: StationType,
    pub sensor_depth: SensorDepth,
    pub flux: FluxFlags,
}

impl ResolverContext {
    pub fn new(station_type: StationType, sensor_depth: SensorDepth, flux: FluxFlags) -> Self {
        Self {
            station_type,
            sensor_depth,
            flux,
        }
    }
}

/// Validate a typed mapping table.
///
/// Checks completeness under the flux flags, that every list is non-empty
/// and that every source is compatible with its tag. All failures are
/// collected. Pure: no I/O, no side effects beyond logging.
pub fn validate<T: MappingTag>(
    table: &MappingTable<T>,
    ctx: &ResolverContext,
) -> Result<(), ValidationFailures> {
    let mut failures = Vec::new();

    check_completeness(T::ALL.iter().copied().filter(|t| table.contains(*t)), ctx, &mut failures);

    for (tag, sources) in table.iter() {
        if sources.is_empty() {
            failures.push(ValidationFailure::EmptySourceList {
                tag: tag.input_tag(),
            });
        }
        for source in sources {
            check_compatibility(tag, source, ctx, &mut failures);
        }
    }

    finish::<T>(failures, ctx)
}

/// Resolve raw configuration into a typed table, then validate it.
///
/// Unknown or repeated tag labels, empty entries and malformed sources are
/// reported together with completeness and compatibility failures.
pub fn resolve_table<T: MappingTag>(
    config: &MappingTableConfig,
    ctx: &ResolverContext,
) -> Result<MappingTable<T>, ValidationFailures> {
    let mut failures = Vec::new();
    let mut entries: Vec<(T, Vec<DataSource>)> = Vec::new();

    for (label, raw_sources) in config {
        let Some(tag) = T::from_label(label) else {
            failures.push(ValidationFailure::UnknownTag {
                table: T::TABLE,
                label: label.clone(),
            });
            continue;
        };
        // labels differing only in case land on the same tag
        if entries.iter().any(|(t, _)| *t == tag) {
            failures.push(ValidationFailure::DuplicateTag {
                table: T::TABLE,
                tag: tag.label(),
            });
            continue;
        }

        if raw_sources.is_empty() {
            failures.push(ValidationFailure::EmptySourceList {
                tag: tag.input_tag(),
            });
        }

        let mut sources = Vec::with_capacity(raw_sources.len());
        for (position, raw) in raw_sources.iter().enumerate() {
            let Some(raw) = raw else {
                failures.push(ValidationFailure::EmptySourceEntry {
                    tag: tag.input_tag(),
                    position,
                });
                continue;
            };
            match DataSource::from_config(raw) {
                Ok(source) => {
                    check_compatibility(tag, &source, ctx, &mut failures);
                    sources.push(source);
                }
                Err(source) => failures.push(ValidationFailure::MalformedSource {
                    tag: tag.input_tag(),
                    position,
                    source,
                }),
            }
        }
        entries.push((tag, sources));
    }

    check_completeness(entries.iter().map(|(t, _)| *t), ctx, &mut failures);

    finish::<T>(failures, ctx)?;
    Ok(entries.into_iter().collect())
}

pub fn resolve_observation_table(
    config: &MappingTableConfig,
    ctx: &ResolverContext,
) -> Result<MappingTable<ObservationTag>, ValidationFailures> {
    resolve_table(config, ctx)
}

pub fn resolve_forecast_table(
    config: &MappingTableConfig,
    ctx: &ResolverContext,
) -> Result<MappingTable<ForecastTag>, ValidationFailures> {
    resolve_table(config, ctx)
}

fn check_completeness<T: MappingTag>(
    present: impl Iterator<Item = T>,
    ctx: &ResolverContext,
    failures: &mut Vec<ValidationFailure>,
) {
    let present: Vec<T> = present.collect();
    for tag in T::ALL {
        let found = present.contains(tag);
        match (tag.requirement(ctx.flux), found) {
            (TagRequirement::Required, false) => failures.push(ValidationFailure::IncompleteMapping {
                table: T::TABLE,
                tag: tag.label(),
            }),
            (TagRequirement::Forbidden, true) => failures.push(ValidationFailure::UnexpectedTag {
                table: T::TABLE,
                tag: tag.label(),
            }),
            _ => {}
        }
    }
}

fn check_compatibility<T: MappingTag>(
    tag: T,
    source: &DataSource,
    ctx: &ResolverContext,
    failures: &mut Vec<ValidationFailure>,
) {
    let input = tag.input_tag();
    if !is_compatible(
        input,
        source.source_type(),
        source.kind(),
        ctx.station_type,
        ctx.sensor_depth,
    ) {
        failures.push(ValidationFailure::IncompatibleMapping {
            tag: input,
            data_source: Box::new(source.clone()),
        });
        return;
    }

    // The previous cycle's own output may feed this run; accepted without a cycle guard.
    if source.kind() == ParameterKind::Roadcast(RoadcastTag::Sst) {
        debug!(
            tag = %input,
            source_id = source.source_id(),
            "Sub-surface temperature chained from a previous model run"
        );
    }
}

fn finish<T: MappingTag>(
    failures: Vec<ValidationFailure>,
    ctx: &ResolverContext,
) -> Result<(), ValidationFailures> {
    if failures.is_empty() {
        info!(
            table = %T::TABLE,
            station_type = %ctx.station_type,
            "Mapping table validated"
        );
    } else {
        warn!(
            table = %T::TABLE,
            station_type = %ctx.station_type,
            failures = failures.len(),
            "Mapping table rejected"
        );
    }
    ValidationFailures(failures).into_result()
}
