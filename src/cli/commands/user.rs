use crate::cli::Context;
use crate::cli::parser::UserCmd;
use crate::core::users::UserLogic;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};
use std::io::{self, BufRead};

/// Flag or env value, else the first line of stdin.
fn read_password(arg: &Option<String>) -> AppResult<String> {
    if let Some(p) = arg {
        return Ok(p.clone());
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn handle(cmd: &UserCmd, ctx: &Context) -> AppResult<()> {
    let mut pool = ctx.open()?;

    match cmd {
        UserCmd::Register {
            username,
            name,
            password,
        } => {
            let password = read_password(password)?;
            let user = UserLogic::register_monitor(&mut pool, username, name, &password)?;
            success(format!(
                "Monitor '{}' registered with id {}",
                user.username, user.id
            ));
        }

        UserCmd::Director {
            username,
            name,
            password,
        } => {
            // bootstrap: only the first director may be created anonymously
            if !UserLogic::list(&pool, Some(Role::Director))?.is_empty() {
                ctx.actor(&pool)?.require_director()?;
            }
            let password = read_password(password)?;
            let user = UserLogic::provision_director(&mut pool, username, name, &password)?;
            success(format!(
                "Director '{}' provisioned with id {}",
                user.username, user.id
            ));
        }

        UserCmd::List { role } => {
            ctx.actor(&pool)?.require_director()?;
            let role = role
                .as_deref()
                .map(|r| {
                    Role::from_code(r).ok_or_else(|| {
                        AppError::InvalidInput(format!("invalid role '{}', use MONITOR or DIRECTOR", r))
                    })
                })
                .transpose()?;
            print_users(&UserLogic::list(&pool, role)?);
        }

        UserCmd::Search { query } => {
            let actor = ctx.actor(&pool)?;
            print_users(&UserLogic::search_monitors(&pool, &actor, query)?);
        }

        UserCmd::Show { id } => {
            let actor = ctx.actor(&pool)?;
            if actor.require_director().is_err() && actor.id != *id {
                return Err(AppError::UserNotFound(*id));
            }
            print_users(&[UserLogic::get(&pool, *id)?]);
        }

        UserCmd::Del { id } => {
            let actor = ctx.actor(&pool)?;
            UserLogic::delete(&mut pool, &actor, *id)?;
            success(format!("User {} deleted", id));
        }
    }

    Ok(())
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        info("No users found.");
        return;
    }

    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::left("USERNAME"),
        Column::left("NAME"),
        Column::left("ROLE"),
        Column::left("ACTIVE"),
    ]);
    for u in users {
        table.add_row(vec![
            u.id.to_string(),
            u.username.clone(),
            u.name.clone(),
            u.role.to_db_str().to_string(),
            if u.is_active { "yes" } else { "no" }.to_string(),
        ]);
    }
    table.print();
}
