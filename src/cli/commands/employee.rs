use crate::cli::parser::{Commands, EmployeeAction};
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{list_employees, upsert_employee};
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::open(&cfg.database)?;

    match action {
        EmployeeAction::Add {
            id,
            name,
            team,
            site,
        } => {
            if let Some(site_id) = site {
                cfg.find_site(site_id)?;
            }

            let emp = Employee {
                id: id.clone(),
                name: name.clone(),
                team: team.clone(),
                site_id: site.clone(),
            };

            let tx = pool.writer()?;
            upsert_employee(&tx, &emp)?;
            ttlog(&tx, "employee", &emp.id, &format!("{} (team '{}')", emp.name, emp.team))?;
            tx.commit()?;

            success(format!("Employee '{}' saved.", emp.id));
        }
        EmployeeAction::List => {
            let employees = list_employees(&pool.conn)?;
            if employees.is_empty() {
                info("No employees registered.");
                return Ok(());
            }

            let mut table = Table::new(&["ID", "NAME", "TEAM", "SITE"]);
            for e in employees {
                table.add_row(vec![e.id, e.name, e.team, e.site_id.unwrap_or_default()]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
