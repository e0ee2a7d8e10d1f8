use crate::cli::Context;
use crate::cli::parser::{ExportArgs, ReportCmd};
use crate::core::reports::{
    ExecutiveSummary, FleetFinance, FleetHoursReport, HoursRow, MonitorFinance,
    MonitorHoursReport, ReportLogic, ScheduledOverview, WeeklyComparison,
};
use crate::errors::AppResult;
use crate::export::{ExportFormat, ExportLogic};
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_delta};
use crate::utils::formatting::{bold, fmt_percent};
use crate::utils::table::{Column, Table};
use crate::utils::{fmt_hours, fmt_money};
use serde::Serialize;

pub fn handle(cmd: &ReportCmd, ctx: &Context) -> AppResult<()> {
    let pool = ctx.open()?;
    let actor = ctx.actor(&pool)?;

    match cmd {
        ReportCmd::Hours {
            monitor,
            period,
            filter,
            export,
        } => {
            let (from, to) = ctx.period(period.as_deref())?;
            let report = ReportLogic::monitor_hours_report(
                &pool,
                &actor,
                monitor.unwrap_or(actor.id),
                from,
                to,
                &filter.to_filter()?,
            )?;
            print_monitor_hours(&report);
            maybe_export(export, &report, &[report.row()])?;
        }

        ReportCmd::Fleet {
            period,
            filter,
            export,
        } => {
            let (from, to) = ctx.period(period.as_deref())?;
            let report =
                ReportLogic::fleet_hours_report(&pool, &actor, from, to, &filter.to_filter()?)?;
            print_fleet_hours(&report);
            maybe_export(export, &report, &report.rows)?;
        }

        ReportCmd::Finance {
            monitor,
            weeks_worked,
            total_weeks,
            period,
            export,
        } => {
            let range = match period {
                Some(p) => Some(ctx.period(Some(p))?),
                None => None,
            };
            let report = ReportLogic::monitor_finance(
                &pool,
                &actor,
                *monitor,
                *weeks_worked,
                *total_weeks,
                range,
            )?;
            print_monitor_finance(&report);
            maybe_export(export, &report, &[report.projection.clone()])?;
        }

        ReportCmd::FleetFinance {
            weeks_worked,
            total_weeks,
            export,
        } => {
            let report = ReportLogic::fleet_finance(&pool, &actor, *weeks_worked, *total_weeks)?;
            print_fleet_finance(&report);
            maybe_export(export, &report, &report.rows)?;
        }

        ReportCmd::Summary {
            period,
            weeks_worked,
            limit,
            export,
        } => {
            let (from, to) = ctx.period(period.as_deref())?;
            let report = ReportLogic::executive_summary(
                &pool,
                &actor,
                from,
                to,
                *weeks_worked,
                limit.unwrap_or(ctx.cfg.report_limit),
            )?;
            print_summary(&report);
            maybe_export(export, &report, &report.top_monitors)?;
        }

        ReportCmd::Weekly { period, export } => {
            let (from, to) = ctx.period(period.as_deref())?;
            let report = ReportLogic::weekly_comparison(&pool, &actor, from, to)?;
            print_weekly(&report);
            maybe_export(export, &report, &report.weeks)?;
        }

        ReportCmd::Scheduled { export } => {
            let report = ReportLogic::scheduled_hours_overview(&pool, &actor)?;
            print_scheduled(&report);
            maybe_export(export, &report, &report.rows())?;
        }
    }

    Ok(())
}

fn maybe_export<D: Serialize, R: Serialize>(
    args: &ExportArgs,
    document: &D,
    rows: &[R],
) -> AppResult<()> {
    let Some(file) = &args.file else {
        return Ok(());
    };

    let format = args.format.unwrap_or_else(|| {
        if file.to_lowercase().ends_with(".json") {
            ExportFormat::Json
        } else {
            ExportFormat::Csv
        }
    });

    ExportLogic::export(format, file, args.force, document, rows)
}

fn line(label: &str, value: impl std::fmt::Display) {
    println!("  {:<28} {}", label, value);
}

fn hours_table(rows: &[HoursRow]) -> Table {
    let mut table = Table::new(vec![
        Column::right("#"),
        Column::left("MONITOR"),
        Column::right("ATTENDANCE"),
        Column::right("ADJUST"),
        Column::right("TOTAL"),
        Column::right("COST"),
    ]);
    for (i, r) in rows.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            format!("{} (#{})", r.monitor_name, r.monitor_id),
            fmt_hours(r.attendance_hours, false),
            format!(
                "{}{}{}",
                color_for_delta(r.adjustment_hours),
                fmt_hours(r.adjustment_hours, true),
                RESET
            ),
            bold(&fmt_hours(r.total_hours, false)),
            fmt_money(r.cost),
        ]);
    }
    table
}

fn print_monitor_hours(r: &MonitorHoursReport) {
    header(format!(
        "Hours of {} (#{}) {} → {}",
        r.monitor_name, r.monitor_id, r.from, r.to
    ));
    line("Attendance hours", fmt_hours(r.totals.attendance_hours, false));
    line("Adjustment hours", fmt_hours(r.totals.adjustment_hours, true));
    line("Total hours", bold(&fmt_hours(r.totals.total_hours, false)));
    line("Blocks / adjustments", format!(
        "{} / {}",
        r.totals.attendance_count, r.totals.adjustment_count
    ));
    line("Present", r.states.present);
    line(
        "Pending / auth. / rej. / rec.",
        format!(
            "{} / {} / {} / {}",
            r.states.pending, r.states.authorized, r.states.rejected, r.states.recovered
        ),
    );
    line("Hourly rate", fmt_money(r.hourly_rate));
    line("Cost", bold(&fmt_money(r.cost)));
}

fn print_fleet_hours(r: &FleetHoursReport) {
    header(format!("Fleet hours {} → {}", r.from, r.to));
    if r.rows.is_empty() {
        info("No monitors registered.");
    } else {
        hours_table(&r.rows).print();
        println!();
    }
    line("Monitors", r.monitor_count);
    line("Total hours", bold(&fmt_hours(r.totals.total_hours, false)));
    line("Total cost", bold(&fmt_money(r.total_cost)));
    line("Average hours per monitor", fmt_hours(r.average_hours_per_monitor, false));
}

fn print_monitor_finance(r: &MonitorFinance) {
    let p = &r.projection;
    header(format!("Semester projection of {} (#{})", r.monitor_name, r.monitor_id));
    line("Slots per week", r.slot_count);
    line("Weekly hours", fmt_hours(p.weekly_hours, false));
    line("Hourly rate", fmt_money(p.hourly_rate));
    line("Weeks worked / total", format!("{} / {}", p.weeks_worked, p.total_weeks));
    line("Projected hours", fmt_hours(p.projected_total_hours, false));
    line("Projected cost", bold(&fmt_money(p.projected_total_cost)));
    line("Worked so far", fmt_money(p.worked_cost));
    line("Remaining", fmt_money(p.remaining_cost));
    if let Some(a) = &r.actual {
        line(
            &format!("Actual {} → {}", a.from, a.to),
            format!("{} = {}", fmt_hours(a.total_hours, false), fmt_money(a.cost)),
        );
    }
}

fn print_fleet_finance(r: &FleetFinance) {
    header(format!(
        "Fleet semester projection (week {} of {})",
        r.weeks_worked, r.total_weeks
    ));

    if r.rows.is_empty() {
        info("No monitors registered.");
    } else {
        let mut table = Table::new(vec![
            Column::left("MONITOR"),
            Column::right("SLOTS"),
            Column::right("WEEKLY"),
            Column::right("PROJECTED"),
            Column::right("WORKED"),
            Column::right("REMAINING"),
        ]);
        for row in &r.rows {
            table.add_row(vec![
                format!("{} (#{})", row.monitor_name, row.monitor_id),
                row.slot_count.to_string(),
                fmt_hours(row.weekly_hours, false),
                fmt_money(row.projected_total_cost),
                fmt_money(row.worked_cost),
                fmt_money(row.remaining_cost),
            ]);
        }
        table.print();
        println!();
    }

    line("Monitors", r.monitor_count);
    line("Weekly hours", fmt_hours(r.weekly_hours, false));
    line("Projected cost", bold(&fmt_money(r.projected_total_cost)));
    line("Worked so far", fmt_money(r.worked_cost));
    line("Remaining", fmt_money(r.remaining_cost));
    line("Average per monitor", fmt_money(r.average_cost_per_monitor));
}

fn print_summary(r: &ExecutiveSummary) {
    header(format!("Executive summary {} → {} ({} days)", r.from, r.to, r.days));
    line("Monitors", r.monitor_count);
    line("Weekly scheduled hours", fmt_hours(r.weekly_scheduled_hours, false));
    line("Actual hours", bold(&fmt_hours(r.actual.total_hours, false)));
    line("Actual cost", bold(&fmt_money(r.actual_cost)));
    line("Projected semester cost", fmt_money(r.projection.projected_total_cost));
    line("Average hours per monitor", fmt_hours(r.average_hours_per_monitor, false));
    line("Average hours per day", fmt_hours(r.average_hours_per_day, false));
    line("Average cost per monitor", fmt_money(r.average_cost_per_monitor));

    if !r.top_monitors.is_empty() {
        println!("\n🏆 Top monitors\n");
        hours_table(&r.top_monitors).print();
    }
}

fn print_weekly(r: &WeeklyComparison) {
    header(format!("Weekly comparison {} → {}", r.from, r.to));

    let mut table = Table::new(vec![
        Column::left("WEEK"),
        Column::right("ATTENDANCE"),
        Column::right("ADJUST"),
        Column::right("TOTAL"),
        Column::right("COST"),
        Column::right("Δ HOURS"),
        Column::right("Δ %"),
    ]);
    for w in &r.weeks {
        let delta = w.change_hours.unwrap_or(0.0);
        table.add_row(vec![
            format!("{} → {}", w.week_start, w.week_end),
            fmt_hours(w.attendance_hours, false),
            fmt_hours(w.adjustment_hours, true),
            bold(&fmt_hours(w.total_hours, false)),
            fmt_money(w.cost),
            match w.change_hours {
                Some(_) => format!("{}{}{}", color_for_delta(delta), fmt_hours(delta, true), RESET),
                None => "-".into(),
            },
            fmt_percent(w.change_percent),
        ]);
    }
    table.print();
}

fn print_scheduled(r: &ScheduledOverview) {
    header("Scheduled hours per week");

    let mut table = Table::new(vec![
        Column::left("GROUP"),
        Column::left("VALUE"),
        Column::right("SLOTS"),
        Column::right("HOURS"),
    ]);
    for row in r.rows() {
        table.add_row(vec![
            row.group.clone(),
            format!("{} ({})", row.label, row.code),
            row.slots.to_string(),
            fmt_hours(row.weekly_hours, false),
        ]);
    }
    table.print();
    println!();

    line("Slots", r.slot_count);
    line("Monitors", r.monitor_count);
    line("Weekly hours", bold(&fmt_hours(r.weekly_hours, false)));
}
