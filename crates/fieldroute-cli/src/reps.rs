use clap::{Subcommand, ValueEnum};
use fieldroute_client::types::{RepStatus, SalesRep, SalesRepCreate, SalesRepUpdate};
use fieldroute_client::ApiClient;

use crate::output::or_dash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepStatusArg {
    Active,
    Sick,
    Vacation,
    Unavailable,
}

impl From<RepStatusArg> for RepStatus {
    fn from(arg: RepStatusArg) -> Self {
        match arg {
            RepStatusArg::Active => RepStatus::Active,
            RepStatusArg::Sick => RepStatus::Sick,
            RepStatusArg::Vacation => RepStatus::Vacation,
            RepStatusArg::Unavailable => RepStatus::Unavailable,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum RepsCommands {
    /// List sales reps
    List,
    /// Add a sales rep
    Create {
        /// Full name
        name: String,
        #[arg(long, value_enum, default_value = "active")]
        status: RepStatusArg,
    },
    /// Rename a rep or change their status
    Update {
        /// Rep id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        status: Option<RepStatusArg>,
    },
    /// Remove a sales rep
    Delete {
        /// Rep id
        id: String,
    },
}

pub(crate) async fn run(client: &ApiClient, command: RepsCommands) -> anyhow::Result<()> {
    match command {
        RepsCommands::List => {
            let reps = client.list_reps().await?;
            if reps.is_empty() {
                println!("no sales reps; add one with `reps create <name>`");
                return Ok(());
            }
            print_reps(&reps);
        }
        RepsCommands::Create { name, status } => {
            let rep = client
                .create_rep(&SalesRepCreate {
                    name,
                    status: status.into(),
                })
                .await?;
            print_reps(std::slice::from_ref(&rep));
        }
        RepsCommands::Update { id, name, status } => {
            if name.is_none() && status.is_none() {
                anyhow::bail!("nothing to update; pass --name and/or --status");
            }
            let rep = client
                .update_rep(
                    &id,
                    &SalesRepUpdate {
                        name,
                        status: status.map(Into::into),
                    },
                )
                .await?;
            print_reps(std::slice::from_ref(&rep));
        }
        RepsCommands::Delete { id } => {
            client.delete_rep(&id).await?;
            println!("deleted rep {id}");
        }
    }
    Ok(())
}

fn print_reps(reps: &[SalesRep]) {
    println!("{:<38}{:<30}{:<13}CREATED", "ID", "NAME", "STATUS");
    for rep in reps {
        let status = serde_json::to_value(rep.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        println!(
            "{:<38}{:<30}{:<13}{}",
            rep.id,
            rep.name,
            status,
            or_dash(rep.created_at.as_deref())
        );
    }
}
