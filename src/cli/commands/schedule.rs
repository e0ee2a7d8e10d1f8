use crate::cli::parser::ScheduleCmd;
use crate::cli::Context;
use crate::core::schedule::{BatchReport, ScheduleLogic};
use crate::db::queries::SlotFilter;
use crate::errors::{AppError, AppResult};
use crate::models::slot::{ScheduleSlot, SlotInput, weekday_name};
use crate::ui::messages::{info, item_warning, success};
use crate::utils::table::{Column, Table};
use chrono::Weekday;

pub fn handle(cmd: &ScheduleCmd, ctx: &Context) -> AppResult<()> {
    let mut pool = ctx.open()?;
    let actor = ctx.actor(&pool)?;

    match cmd {
        ScheduleCmd::Add {
            monitor,
            day,
            shift,
            site,
        } => {
            let input = SlotInput::new(*day, shift, site);
            let slot =
                ScheduleLogic::create_slot(&mut pool, &actor, monitor.unwrap_or(actor.id), &input)?;
            success(format!("Slot #{} created: {}", slot.id, slot.describe()));
        }

        ScheduleCmd::Bulk { monitor, slots } => {
            let inputs = parse_inputs(slots)?;
            let report =
                ScheduleLogic::bulk_create(&mut pool, &actor, monitor.unwrap_or(actor.id), &inputs)?;
            print_report(&report);
        }

        ScheduleCmd::Replace { monitor, slots } => {
            let inputs = parse_inputs(slots)?;
            let report = ScheduleLogic::bulk_replace(
                &mut pool,
                &actor,
                monitor.unwrap_or(actor.id),
                &inputs,
            )?;
            print_report(&report);
        }

        ScheduleCmd::Edit {
            id,
            monitor,
            day,
            shift,
            site,
        } => {
            let input = SlotInput::new(*day, shift, site);
            let slot = ScheduleLogic::update_slot(
                &mut pool,
                &actor,
                monitor.unwrap_or(actor.id),
                *id,
                &input,
            )?;
            success(format!("Slot #{} updated: {}", slot.id, slot.describe()));
        }

        ScheduleCmd::Del { id, monitor } => {
            ScheduleLogic::delete_slot(&mut pool, &actor, monitor.unwrap_or(actor.id), *id)?;
            success(format!("Slot #{} deleted", id));
        }

        ScheduleCmd::List { monitor } => {
            let slots = ScheduleLogic::list_slots(&pool, &actor, monitor.unwrap_or(actor.id))?;
            print_slots(slots.iter().map(|s| (s, None)));
        }

        ScheduleCmd::Fleet {
            filter,
            day,
            monitor,
        } => {
            let weekday = day
                .map(|d| {
                    u8::try_from(d)
                        .ok()
                        .and_then(|d| Weekday::try_from(d).ok())
                        .ok_or_else(|| {
                            AppError::InvalidInput(format!("invalid weekday {}, use 0..6", d))
                        })
                })
                .transpose()?;
            let base = filter.to_filter()?;
            let filter = SlotFilter {
                user_id: *monitor,
                weekday,
                ..base
            };

            let fleet = ScheduleLogic::list_fleet_slots(&pool, &actor, &filter)?;
            print_slots(
                fleet
                    .slots
                    .iter()
                    .map(|f| (&f.slot, Some(f.monitor_name.as_str()))),
            );
            info(format!(
                "{} slots across {} monitors",
                fleet.total_slots, fleet.total_monitors
            ));
        }
    }

    Ok(())
}

fn parse_inputs(raw: &[String]) -> AppResult<Vec<SlotInput>> {
    raw.iter()
        .map(|s| {
            SlotInput::parse_compact(s).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "invalid slot '{}', expected WEEKDAY:SHIFT:SITE (e.g. 0:M:SA)",
                    s
                ))
            })
        })
        .collect()
}

fn print_report(report: &BatchReport) {
    if let Some(n) = report.deleted {
        info(format!("{} previous slots removed", n));
    }
    success(format!(
        "{} of {} slots created",
        report.created.len(),
        report.requested
    ));
    for e in &report.errors {
        item_warning(e.item, &e.message);
    }
    if !report.created.is_empty() {
        print_slots(report.created.iter().map(|s| (s, None)));
    }
}

fn print_slots<'a>(rows: impl Iterator<Item = (&'a ScheduleSlot, Option<&'a str>)>) {
    let rows: Vec<_> = rows.collect();
    if rows.is_empty() {
        info("No slots found.");
        return;
    }

    let with_owner = rows.iter().any(|(_, owner)| owner.is_some());
    let mut columns = vec![Column::right("ID")];
    if with_owner {
        columns.push(Column::left("MONITOR"));
    }
    columns.extend([
        Column::left("DAY"),
        Column::left("SHIFT"),
        Column::left("SITE"),
    ]);

    let mut table = Table::new(columns);
    for (slot, owner) in rows {
        let mut row = vec![slot.id.to_string()];
        if with_owner {
            row.push(owner.unwrap_or("").to_string());
        }
        row.extend([
            format!("{} ({})", weekday_name(slot.weekday), slot.weekday_index()),
            slot.shift.label().to_string(),
            slot.site.label().to_string(),
        ]);
        table.add_row(row);
    }
    table.print();
}
