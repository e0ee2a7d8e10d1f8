use crate::cli::Context;
use crate::cli::parser::SettingCmd;
use crate::core::settings::SettingsLogic;
use crate::errors::{AppError, AppResult};
use crate::models::setting::{Setting, SettingType};
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &SettingCmd, ctx: &Context) -> AppResult<()> {
    let mut pool = ctx.open()?;

    match cmd {
        SettingCmd::List => print_settings(&SettingsLogic::list(&pool)?),

        SettingCmd::Get { key } => print_settings(&[SettingsLogic::get_setting(&pool, key)?]),

        SettingCmd::Set {
            key,
            value,
            kind,
            description,
        } => {
            let actor = ctx.actor(&pool)?;
            let kind = SettingType::from_db_str(kind).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "invalid type '{}', use decimal, integer, boolean or string",
                    kind
                ))
            })?;
            let s = SettingsLogic::set(&mut pool, &actor, key, value, kind, description)?;
            success(format!("Setting '{}' created = {}", s.key, s.value));
        }

        SettingCmd::Update {
            key,
            value,
            description,
        } => {
            let actor = ctx.actor(&pool)?;
            let s = SettingsLogic::update(&mut pool, &actor, key, value, description.as_deref())?;
            success(format!("Setting '{}' updated = {}", s.key, s.value));
        }

        SettingCmd::Del { key } => {
            let actor = ctx.actor(&pool)?;
            SettingsLogic::delete(&mut pool, &actor, key)?;
            success(format!("Setting '{}' deleted", key.trim().to_lowercase()));
        }

        SettingCmd::Init => {
            let actor = ctx.actor(&pool)?;
            let created = SettingsLogic::initialize_defaults(&mut pool, &actor)?;
            if created.is_empty() {
                info("Default settings already present.");
            } else {
                success(format!("Created: {}", created.join(", ")));
            }
        }
    }

    Ok(())
}

fn print_settings(items: &[Setting]) {
    if items.is_empty() {
        info("No settings stored. Run `setting init` to create the defaults.");
        return;
    }

    let mut table = Table::new(vec![
        Column::left("KEY"),
        Column::right("VALUE"),
        Column::left("TYPE"),
        Column::left("DESCRIPTION"),
        Column::left("UPDATED"),
    ]);
    for s in items {
        table.add_row(vec![
            s.key.clone(),
            s.value.to_string(),
            s.kind.to_db_str().to_string(),
            s.description.clone(),
            s.updated_at.clone(),
        ]);
    }
    table.print();
}
