pub mod commands;
pub mod parser;

use crate::config::Config;
use crate::core::users::UserLogic;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::db::queries::SlotFilter;
use crate::errors::{AppError, AppResult};
use crate::models::actor::Actor;
use crate::models::shift::Shift;
use crate::models::site::Site;
use crate::utils::date;
use chrono::NaiveDate;
use parser::{Cli, SlotFilterArgs};

/// What every handler needs besides its own arguments.
pub struct Context {
    pub cfg: Config,
    pub as_user: Option<i64>,
    pub today: NaiveDate,
}

impl Context {
    pub fn new(cli: &Cli, cfg: Config) -> AppResult<Self> {
        let today = match &cli.today {
            Some(raw) => date::parse_date(raw).ok_or_else(|| {
                AppError::InvalidInput(format!("invalid --today '{}', expected YYYY-MM-DD", raw))
            })?,
            None => date::today(),
        };

        Ok(Self {
            cfg,
            as_user: cli.as_user,
            today,
        })
    }

    /// Open the configured database with its schema brought up to date.
    pub fn open(&self) -> AppResult<DbPool> {
        open_db(&self.cfg.database)
    }

    /// The caller named by `--as`.
    pub fn actor(&self, pool: &DbPool) -> AppResult<Actor> {
        let id = self.as_user.ok_or_else(|| {
            AppError::Forbidden("this command needs the caller identity (--as <USER_ID>)".into())
        })?;
        UserLogic::resolve_actor(pool, id)
    }

    pub fn date(&self, input: Option<&str>) -> AppResult<NaiveDate> {
        date::resolve_date(input, self.today, self.cfg.strict_dates)
    }

    /// `[from, to]` of a period expression, the current month when absent.
    pub fn period(&self, input: Option<&str>) -> AppResult<(NaiveDate, NaiveDate)> {
        match input {
            Some(p) if !p.trim().is_empty() => date::range_bounds(p),
            _ => Ok(date::month_of(self.today)),
        }
    }
}

pub fn parse_shift(code: &str) -> AppResult<Shift> {
    Shift::from_code(code)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid shift '{}', use M or T", code)))
}

pub fn parse_site(code: &str) -> AppResult<Site> {
    Site::from_code(code)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid site '{}', use SA or BA", code)))
}

impl SlotFilterArgs {
    pub fn to_filter(&self) -> AppResult<SlotFilter> {
        Ok(SlotFilter::shift_site(
            self.shift.as_deref().map(parse_shift).transpose()?,
            self.site.as_deref().map(parse_site).transpose()?,
        ))
    }
}
