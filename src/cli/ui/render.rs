//! Text rendering of a dashboard snapshot

use std::fmt::Write;

use console::style;

use crate::dashboard::DashboardSnapshot;
use crate::types::{Impact, Trend};

/// Rows of the flight table shown under the aggregates
const RECENT_FLIGHTS: usize = 10;

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_dashboard(&mut out, snapshot);
    out
}

fn write_dashboard(out: &mut String, snapshot: &DashboardSnapshot) -> std::fmt::Result {
    writeln!(out, "{}", style("FlightPulse Market Dashboard").bold().underlined())?;
    if let Some(at) = snapshot.refreshed_at {
        writeln!(
            out,
            "{}",
            style(format!(
                "Refresh #{} at {}",
                snapshot.applied_sequence,
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ))
            .dim()
        )?;
    }
    writeln!(
        out,
        "Sources: flights {} · insights {} · trends {}",
        snapshot.origins.flights, snapshot.origins.insights, snapshot.origins.trends
    )?;

    let summary = &snapshot.summary;
    section(out, "Summary")?;
    writeln!(out, "  Total bookings   {}", summary.total_bookings)?;
    writeln!(out, "  Average price    ${}", summary.avg_price)?;
    writeln!(out, "  Average demand   {}%", summary.avg_demand)?;
    writeln!(out, "  Active routes    {}", summary.active_routes)?;

    section(out, "Popular Routes")?;
    if snapshot.popular_routes.is_empty() {
        writeln!(out, "  (no routes)")?;
    }
    for (rank, route) in snapshot.popular_routes.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:<26} {:>6} bookings  ${:>5} avg  {:>3}% demand",
            rank + 1,
            route.route,
            route.bookings,
            route.avg_price,
            route.demand_score
        )?;
    }

    section(out, "Price Trends")?;
    for trend in &snapshot.price_trends {
        writeln!(
            out,
            "  {}  ${:>8.2}  {}",
            trend.date, trend.price, trend.route
        )?;
    }

    section(out, "Market Insights")?;
    for insight in &snapshot.insights {
        writeln!(
            out,
            "  {} {} [{} impact]",
            trend_marker(insight.trend),
            style(&insight.category).bold(),
            impact_label(insight.impact)
        )?;
        writeln!(out, "      {}", insight.insight)?;
    }

    section(out, "Flights")?;
    for record in snapshot.records.iter().take(RECENT_FLIGHTS) {
        writeln!(
            out,
            "  {:<26} {:<17} {}  ${:>5}  {:>3} booked",
            record.route_label(),
            record.airline,
            record.date.format("%Y-%m-%d"),
            record.price,
            record.bookings
        )?;
    }
    if snapshot.records.len() > RECENT_FLIGHTS {
        writeln!(
            out,
            "  {}",
            style(format!(
                "… {} more",
                snapshot.records.len() - RECENT_FLIGHTS
            ))
            .dim()
        )?;
    }

    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "\n{}", style(title).bold())?;
    writeln!(out, "{}", "─".repeat(40))
}

fn trend_marker(trend: Trend) -> console::StyledObject<&'static str> {
    match trend {
        Trend::Up => style("▲").green(),
        Trend::Down => style("▼").red(),
        Trend::Stable => style("■").blue(),
    }
}

fn impact_label(impact: Impact) -> console::StyledObject<String> {
    let label = impact.to_string();
    match impact {
        Impact::High => style(label).red(),
        Impact::Medium => style(label).yellow(),
        Impact::Low => style(label).dim(),
    }
}
