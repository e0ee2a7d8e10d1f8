use crate::cli::Context;
use crate::cli::parser::AdjustCmd;
use crate::core::adjustments::AdjustmentLogic;
use crate::errors::AppResult;
use crate::models::adjustment::{HourAdjustment, NewAdjustment};
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_delta};
use crate::utils::fmt_hours;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &AdjustCmd, ctx: &Context) -> AppResult<()> {
    let mut pool = ctx.open()?;
    let actor = ctx.actor(&pool)?;

    match cmd {
        AdjustCmd::Add {
            monitor,
            hours,
            reason,
            date,
            record,
        } => {
            let adj = NewAdjustment {
                user_id: *monitor,
                date: ctx.date(date.as_deref())?,
                delta_hours: *hours,
                reason: reason.clone(),
                attendance_id: *record,
            };
            let created = AdjustmentLogic::create(&mut pool, &actor, &adj)?;
            success(format!(
                "Adjustment #{} recorded: {} for monitor {} on {}",
                created.id,
                fmt_hours(created.delta_hours, true),
                created.user_id,
                created.date
            ));
        }

        AdjustCmd::List { monitor, from, to } => {
            let from = from.as_deref().map(|d| ctx.date(Some(d))).transpose()?;
            let to = to.as_deref().map(|d| ctx.date(Some(d))).transpose()?;
            print_adjustments(&AdjustmentLogic::list(&pool, &actor, *monitor, from, to)?);
        }

        AdjustCmd::Show { id } => {
            let adj = AdjustmentLogic::get(&pool, &actor, *id)?;
            print_adjustments(&[adj]);
        }

        AdjustCmd::Del { id } => {
            AdjustmentLogic::delete(&mut pool, &actor, *id)?;
            success(format!("Adjustment #{} deleted", id));
        }
    }

    Ok(())
}

fn print_adjustments(items: &[HourAdjustment]) {
    if items.is_empty() {
        info("No adjustments found.");
        return;
    }

    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::right("MONITOR"),
        Column::left("DATE"),
        Column::right("HOURS"),
        Column::right("BY"),
        Column::right("RECORD"),
        Column::left("REASON"),
    ]);

    for a in items {
        table.add_row(vec![
            a.id.to_string(),
            a.user_id.to_string(),
            a.date.to_string(),
            format!(
                "{}{}{}",
                color_for_delta(a.delta_hours),
                fmt_hours(a.delta_hours, true),
                RESET
            ),
            a.director_id.to_string(),
            a.attendance_id
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".into()),
            a.reason.clone(),
        ]);
    }
    table.print();
}
