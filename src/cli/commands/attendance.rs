use crate::cli::parser::AttendanceCmd;
use crate::cli::{Context, parse_shift};
use crate::core::attendance::AttendanceLogic;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::authorization::AuthorizationState;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_state, colorize_optional};
use crate::utils::fmt_hours;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &AttendanceCmd, ctx: &Context) -> AppResult<()> {
    let mut pool = ctx.open()?;
    let actor = ctx.actor(&pool)?;

    match cmd {
        AttendanceCmd::Day {
            date,
            filter,
            state,
        } => {
            let date = ctx.date(date.as_deref())?;
            let state = state
                .as_deref()
                .map(|s| {
                    AuthorizationState::from_code(s).ok_or_else(|| {
                        AppError::InvalidInput(format!(
                            "invalid state '{}', use pendiente, autorizado, rechazado or recuperado",
                            s
                        ))
                    })
                })
                .transpose()?;

            let records =
                AttendanceLogic::list_for_date(&mut pool, &actor, date, &filter.to_filter()?, state)?;
            println!("📅 Attendance for {}\n", date);
            print_records(&records);
        }

        AttendanceCmd::Mine { date, monitor } => {
            let date = ctx.date(date.as_deref())?;
            let records =
                AttendanceLogic::monitor_day(&mut pool, &actor, monitor.unwrap_or(actor.id), date)?;
            println!("📅 Attendance for {}\n", date);
            print_records(&records);
        }

        AttendanceCmd::Mark { date, shift } => {
            let date = ctx.date(date.as_deref())?;
            let rec =
                AttendanceLogic::mark_present(&mut pool, &actor, date, parse_shift(shift)?, ctx.today)?;
            success(format!(
                "Presence marked for {} {} ({})",
                rec.date_str(),
                rec.shift.label(),
                fmt_hours(rec.hours(), false)
            ));
        }

        AttendanceCmd::Authorize { id } => {
            let rec = AttendanceLogic::authorize(&mut pool, &actor, *id)?;
            success(format!("Record #{} authorized", rec.id));
        }

        AttendanceCmd::Reject { id } => {
            let rec = AttendanceLogic::reject(&mut pool, &actor, *id)?;
            success(format!("Record #{} rejected", rec.id));
        }

        AttendanceCmd::Recover { id } => {
            let rec = AttendanceLogic::recover(&mut pool, &actor, *id, ctx.today)?;
            success(format!("Record #{} recovered", rec.id));
        }

        AttendanceCmd::Show { id } => {
            let rec = AttendanceLogic::get(&pool, &actor, *id)?;
            print_records(&[rec]);
        }

        AttendanceCmd::Del { id } => {
            AttendanceLogic::delete(&mut pool, &actor, *id)?;
            success(format!("Record #{} deleted", id));
        }
    }

    Ok(())
}

fn print_records(records: &[AttendanceRecord]) {
    if records.is_empty() {
        info("No scheduled blocks for this day.");
        return;
    }

    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::right("MONITOR"),
        Column::left("DATE"),
        Column::left("SHIFT"),
        Column::left("SITE"),
        Column::left("PRESENT"),
        Column::left("STATE"),
        Column::right("HOURS"),
    ]);

    for r in records {
        let state = r.state();
        table.add_row(vec![
            r.id.to_string(),
            r.user_id.to_string(),
            r.date_str(),
            r.shift.code().to_string(),
            r.site.code().to_string(),
            if r.present() { "yes" } else { "no" }.to_string(),
            format!("{}{}{}", color_for_state(state), state.to_db_str(), RESET),
            colorize_optional(&fmt_hours(r.hours(), false)),
        ]);
    }
    table.print();
}
