use std::fmt::Write as _;

use serde_json::{Value, json};

use crate::adapters::{EaseeClient, Site, SiteDirectory};
use crate::app::cli::Cli;
use crate::app::config::AppConfig;
use crate::app::error::AppError;

pub fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    if !cli.has_action() {
        tracing::warn!("nothing to do, pass --chargers, --state, --sites, --all or --countries");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::runtime)?;

    runtime.block_on(execute(&cli, &config))
}

async fn execute(cli: &Cli, config: &AppConfig) -> Result<(), AppError> {
    let client = EaseeClient::new(config.client_settings()).map_err(AppError::runtime)?;
    let directory = SiteDirectory::new(client.transport());

    let sites = if cli.needs_sites() {
        directory.populate().await.map_err(AppError::runtime)?
    } else {
        Vec::new()
    };

    if cli.chargers {
        print_json(&charger_listing(&sites))?;
    }

    if cli.state {
        let mut states = Vec::new();
        for charger in sites.iter().flat_map(Site::chargers) {
            let state = charger.get_state(false).await.map_err(AppError::runtime)?;
            states.push(json!({
                "id": charger.id(),
                "name": charger.name(),
                "state": state,
            }));
        }
        print_json(&Value::Array(states))?;
    }

    if cli.sites {
        let data: Vec<Value> = sites.iter().map(|site| site.fields().to_value()).collect();
        print_json(&Value::Array(data))?;
    }

    if cli.all {
        print!("{}", render_tree(&sites));
    }

    if cli.countries {
        let countries = directory
            .get_active_countries()
            .await
            .map_err(AppError::runtime)?;
        print_json(&Value::Array(countries))?;
    }

    Ok(())
}

fn charger_listing(sites: &[Site]) -> Value {
    sites
        .iter()
        .flat_map(Site::chargers)
        .map(|charger| charger.fields().to_value())
        .collect()
}

fn render_tree(sites: &[Site]) -> String {
    let mut out = String::new();

    for site in sites {
        let _ = writeln!(
            out,
            "Site - ID: {} Name: {} with {} chargers",
            site.id(),
            site.name(),
            site.number_of_chargers()
        );
        for circuit in site.circuits() {
            let _ = writeln!(
                out,
                "   Circuit - ID: {} Name: {}",
                circuit.id(),
                circuit.name()
            );
            for charger in circuit.chargers() {
                let _ = writeln!(
                    out,
                    "      Charger - ID: {} Name: {}",
                    charger.id(),
                    charger.name()
                );
            }
        }
    }

    out
}

fn print_json(value: &Value) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(AppError::runtime)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{charger_listing, render_tree};
    use crate::adapters::Site;
    use crate::test_support::SpyTransport;

    fn sample_site() -> Site {
        Site::from_payload(
            json!({
                "id": 11,
                "name": "Cabin",
                "circuits": [{
                    "id": 110,
                    "panelName": "Shed",
                    "chargers": [{"id": "EH11001", "name": "Front", "color": 2}]
                }]
            }),
            SpyTransport::new(),
        )
        .expect("site must build")
    }

    #[test]
    fn renders_site_tree() {
        let tree = render_tree(&[sample_site()]);

        assert_eq!(
            tree,
            "Site - ID: 11 Name: Cabin with 1 chargers\n   Circuit - ID: 110 Name: Shed\n      Charger - ID: EH11001 Name: Front\n"
        );
    }

    #[test]
    fn lists_raw_charger_fields() {
        let listing = charger_listing(&[sample_site()]);

        assert_eq!(
            listing,
            json!([{"id": "EH11001", "name": "Front", "color": 2}])
        );
    }
}
