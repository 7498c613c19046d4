//! Vega-Lite chart descriptions.
//!
//! One description per headline metric and entity. Data is inlined so the
//! rendering side needs nothing but the JSON document. Three layouts exist:
//! individual trend, clinic trend plus provider comet strip, and organization
//! trend plus clinic comet strip.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::dataset::{CanonicalRow, SeriesPoint, ViewFilter};
use crate::error::Result;
use crate::reference::EntityType;
use crate::report::ReportContext;
use crate::report::palette::{
    DARK_BLUE, DARK_GREEN, DARK_ORANGE, DARK_PURPLE, LIGHT_BLUE, LIGHT_ORANGE, LIGHT_PURPLE,
};

/// Vega-Lite schema the descriptions are written against
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v4.json";

/// Field holding the observation date in inline data
pub const DATE_FIELD: &str = "Date";
/// Field holding the share in inline data
pub const VALUE_FIELD: &str = "%";
/// Field holding the entity name in comet data
pub const NAME_FIELD: &str = "Name";

const INDIVIDUAL_WIDTH: u32 = 350;
const PANEL_WIDTH: u32 = 200;
const CHART_HEIGHT: u32 = 200;

fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn series_values(points: &[SeriesPoint]) -> Vec<Value> {
    points
        .iter()
        .map(|p| json!({ DATE_FIELD: date_string(p.date), VALUE_FIELD: p.percentage }))
        .collect()
}

fn name_values(rows: &[&CanonicalRow]) -> Vec<Value> {
    rows.iter()
        .map(|row| json!({ NAME_FIELD: row.name, VALUE_FIELD: row.percentage }))
        .collect()
}

fn percent_axis() -> Value {
    json!({
        "field": VALUE_FIELD,
        "type": "quantitative",
        "axis": { "format": "%", "title": "" },
        "scale": { "domain": [0, 1] }
    })
}

/// Trend line of one series
///
/// The primary line of a chart carries the fixed x window and the percent y
/// axis; secondary lines only bind the fields.
fn trend_line(
    ctx: &ReportContext,
    points: &[SeriesPoint],
    color: &str,
    stroke_width: u32,
    primary: bool,
) -> Value {
    let (x, y) = if primary {
        (
            json!({
                "field": DATE_FIELD,
                "type": "temporal",
                "title": "",
                "scale": { "domain": [
                    date_string(ctx.graphing_start_date),
                    date_string(ctx.graphing_end_date)
                ] }
            }),
            percent_axis(),
        )
    } else {
        (
            json!({ "field": DATE_FIELD, "type": "temporal", "title": "" }),
            json!({ "field": VALUE_FIELD, "type": "quantitative" }),
        )
    };

    json!({
        "data": { "values": series_values(points) },
        "mark": { "type": "line", "strokeWidth": stroke_width },
        "encoding": { "x": x, "y": y, "color": { "value": color } }
    })
}

/// Current-date value printed in the top right corner
fn current_label(value: Option<f64>, color: &str, dx: u32) -> Value {
    let values: Vec<Value> = value
        .map(|v| vec![json!({ VALUE_FIELD: v })])
        .unwrap_or_default();
    json!({
        "data": { "values": values },
        "mark": {
            "type": "text", "align": "right", "baseline": "top",
            "dx": dx, "dy": -98, "size": 16
        },
        "encoding": {
            "text": { "field": VALUE_FIELD, "type": "quantitative", "format": ".2%" },
            "color": { "value": color }
        }
    })
}

fn target_data(target: f64) -> Value {
    json!({ "values": [{ "TargetValue": target, "Title": "Target" }] })
}

/// Dashed horizontal rule at the target
fn target_rule(target: f64) -> Value {
    json!({
        "data": target_data(target),
        "mark": { "type": "rule", "strokeWidth": 1, "strokeDash": [4, 2] },
        "encoding": {
            "y": { "field": "TargetValue", "type": "quantitative" },
            "color": { "value": DARK_GREEN }
        }
    })
}

/// Target value printed in the bottom right corner
fn target_label(target: f64, dx: u32) -> Value {
    json!({
        "data": target_data(target),
        "mark": {
            "type": "text", "align": "right", "baseline": "bottom",
            "dx": dx, "dy": 100, "size": 16
        },
        "encoding": {
            "text": { "field": "TargetValue", "type": "quantitative", "format": ".2%" },
            "color": { "value": DARK_GREEN }
        }
    })
}

/// Strip comparing entities between a start date and the current date
///
/// Each entity gets a tail from its start value to its current value and a
/// filled marker at the current value.
fn comet_strip(
    start: &[&CanonicalRow],
    current: &[&CanonicalRow],
    order: Option<&[String]>,
    tail_color: &str,
    marker_color: &str,
    target: Option<f64>,
) -> Value {
    let mut tail_values = name_values(start);
    tail_values.extend(name_values(current));

    let x = match order {
        Some(order) => json!({
            "field": NAME_FIELD, "type": "nominal", "axis": { "title": "" }, "sort": order
        }),
        None => json!({ "field": NAME_FIELD, "type": "nominal", "axis": { "title": "" } }),
    };

    let mut layers = vec![
        json!({
            "data": { "values": tail_values },
            "mark": { "type": "line", "color": tail_color },
            "encoding": {
                "y": percent_axis(),
                "x": x.clone(),
                "detail": { "field": NAME_FIELD, "type": "nominal" }
            }
        }),
        json!({
            "data": { "values": name_values(current) },
            "mark": {
                "type": "point", "size": 100, "opacity": 1,
                "filled": true, "color": marker_color
            },
            "encoding": {
                "y": { "field": VALUE_FIELD, "type": "quantitative" },
                "x": x
            }
        }),
    ];
    if let Some(target) = target {
        layers.push(target_rule(target));
    }

    json!({ "height": CHART_HEIGHT, "layer": layers })
}

/// Trend of one provider against their clinic and the organization
pub fn individual_chart(ctx: &ReportContext, provider: &str, metric: &str) -> Result<Value> {
    let target = ctx.metric_target(metric)?;
    let identity = ctx
        .reference
        .identities
        .by_name(provider)
        .ok_or_else(|| crate::error::ReportError::UnknownEntity(provider.to_string()))?;

    let provider_series = ctx.dataset.time_series(provider, metric);
    let clinic_series = identity
        .clinic
        .as_deref()
        .map(|clinic| ctx.dataset.time_series(clinic, metric))
        .unwrap_or_default();
    let org_series = ctx.dataset.time_series(&ctx.organization, metric);
    let current = ctx.dataset.value_at(provider, metric, ctx.current_date);

    let mut layers = vec![
        trend_line(ctx, &org_series, LIGHT_BLUE, 2, false),
        trend_line(ctx, &clinic_series, LIGHT_ORANGE, 2, false),
        trend_line(ctx, &provider_series, DARK_PURPLE, 4, true),
    ];
    if let Some(target) = target {
        layers.push(target_rule(target));
        layers.push(target_label(target, INDIVIDUAL_WIDTH / 2));
    }
    layers.push(current_label(current, DARK_PURPLE, INDIVIDUAL_WIDTH / 2));

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": INDIVIDUAL_WIDTH,
        "height": CHART_HEIGHT,
        "layer": layers
    }))
}

/// Trend of one clinic against the organization, plus its providers' comets
pub fn clinic_chart(ctx: &ReportContext, clinic: &str, metric: &str) -> Result<Value> {
    let target = ctx.metric_target(metric)?;

    let clinic_series = ctx.dataset.time_series(clinic, metric);
    let org_series = ctx.dataset.time_series(&ctx.organization, metric);
    let current = ctx.dataset.value_at(clinic, metric, ctx.current_date);

    let mut trend = vec![
        trend_line(ctx, &org_series, LIGHT_BLUE, 2, false),
        trend_line(ctx, &clinic_series, DARK_ORANGE, 4, true),
    ];
    if let Some(target) = target {
        trend.push(target_rule(target));
        trend.push(target_label(target, PANEL_WIDTH / 2));
    }
    trend.push(current_label(current, DARK_ORANGE, PANEL_WIDTH / 2));

    let providers = ctx.reference.identities.providers_of_clinic(clinic);
    let start_date = ctx
        .dataset
        .earliest_date(&ViewFilter::new().entity(clinic).metric(metric));
    let start_rows = start_date
        .map(|date| ctx.dataset.snapshot_of(metric, date, &providers))
        .unwrap_or_default();
    let current_rows = ctx.dataset.snapshot_of(metric, ctx.current_date, &providers);

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "hconcat": [
            { "width": PANEL_WIDTH, "height": CHART_HEIGHT, "layer": trend },
            comet_strip(
                &start_rows,
                &current_rows,
                Some(providers.as_slice()),
                LIGHT_PURPLE,
                DARK_PURPLE,
                target
            )
        ]
    }))
}

/// Trend of the organization, plus the clinics' comets
pub fn organization_chart(ctx: &ReportContext, metric: &str) -> Result<Value> {
    let target = ctx.metric_target(metric)?;

    let org_series = ctx.dataset.time_series(&ctx.organization, metric);
    let current = ctx
        .dataset
        .value_at(&ctx.organization, metric, ctx.current_date);

    let mut trend = Vec::new();
    if let Some(target) = target {
        trend.push(target_rule(target));
        trend.push(target_label(target, PANEL_WIDTH / 2));
    }
    trend.push(trend_line(ctx, &org_series, DARK_BLUE, 4, true));
    trend.push(current_label(current, DARK_BLUE, PANEL_WIDTH / 2));

    let start_date = ctx.dataset.earliest_date(
        &ViewFilter::new()
            .entity(ctx.organization.as_str())
            .metric(metric),
    );
    let start_rows = start_date
        .map(|date| ctx.dataset.snapshot(metric, date, EntityType::Clinic))
        .unwrap_or_default();
    let current_rows = ctx
        .dataset
        .snapshot(metric, ctx.current_date, EntityType::Clinic);

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "hconcat": [
            { "width": PANEL_WIDTH, "height": CHART_HEIGHT, "layer": trend },
            comet_strip(&start_rows, &current_rows, None, LIGHT_ORANGE, DARK_ORANGE, target)
        ]
    }))
}

/// Chart description of any entity for one metric
pub fn entity_chart(
    ctx: &ReportContext,
    name: &str,
    entity_type: EntityType,
    metric: &str,
) -> Result<Value> {
    match entity_type {
        EntityType::Individual => individual_chart(ctx, name, metric),
        EntityType::Clinic => clinic_chart(ctx, name, metric),
        EntityType::Organization => organization_chart(ctx, metric),
    }
}
