#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

use clap::{Command, arg};
use scoreboard_server::{auth, server_config, server_main};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .filter_module("sqlx::query", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let matches = Command::new("Scoreboard")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Team scoreboard server")
        .subcommand_required(true)
        .subcommand(Command::new("server").about("Run as server").arg(
            arg!(<config_file> "Path to the configuration file: yaml-serialized ServerConfig."),
        ))
        .subcommand(
            Command::new("hash-password")
                .about("Prints the argon2 hash of the admin password for the server config.")
                .arg(arg!(<password> "Admin password")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            let config_file = sub_matches
                .get_one::<String>("config_file")
                .ok_or_else(|| anyhow::anyhow!("Missing config file"))?;
            let config = server_config::read_config_file(config_file)?;
            async_std::task::block_on(server_main::run(config))
        }
        Some(("hash-password", sub_matches)) => {
            let password = sub_matches
                .get_one::<String>("password")
                .ok_or_else(|| anyhow::anyhow!("Missing password"))?;
            println!("{}", auth::hash_password(password)?);
            Ok(())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
