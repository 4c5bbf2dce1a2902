//! Quetz CLI binary.
//!
//! A command-line interface for interacting with a Quetz server.

use std::process::ExitCode;

use clap::Parser;
use futures::TryStreamExt;
use quetz_client::cli::{
    AuthArgs, ChannelAction, Cli, Command, Entity, MemberAction, RoleAction,
};
use quetz_client::{
    create_channel, delete_channel, delete_channel_member, get_role, list_channel_members,
    list_channels, list_packages, list_users, set_channel_member, set_role, upload_file, Channel,
    ChannelMember, Package, Pager, PrettyPrint, QuetzClient, QuetzError, User,
    DEFAULT_PAGE_SIZE,
};
use serde::Serialize;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match connect(&cli.auth).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set QUETZ_API_KEY, or QUETZ_USERNAME and QUETZ_PASSWORD");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn connect(auth: &AuthArgs) -> quetz_client::Result<QuetzClient> {
    match (&auth.api_key, &auth.username, &auth.password) {
        (Some(key), _, _) => QuetzClient::from_api_key(&auth.url, key),
        (None, Some(username), Some(password)) => {
            QuetzClient::from_credentials(&auth.url, username, password).await
        }
        _ => Err(QuetzError::Config("no credentials given".to_string())),
    }
}

async fn run(client: &QuetzClient, cli: Cli) -> quetz_client::Result<()> {
    match cli.command {
        Command::List {
            entity,
            channel,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
            handle_list(client, entity, channel.as_deref(), page_size, cli.json).await
        }
        Command::Role { action } => handle_role(client, action, cli.json).await,
        Command::Member { action } => handle_member(client, action).await,
        Command::Channel { action } => handle_channel(client, action).await,
        Command::Upload {
            channel,
            files,
            force,
        } => {
            for file in &files {
                upload_file(client, &channel, file, force).await?;
                println!("Uploaded {} to {}", file.display(), channel);
            }
            Ok(())
        }
    }
}

async fn handle_list(
    client: &QuetzClient,
    entity: Entity,
    channel: Option<&str>,
    page_size: u32,
    json: bool,
) -> quetz_client::Result<()> {
    match entity {
        Entity::Channels => {
            output_all(list_channels(client, page_size)?, json, |c| ChannelRow::from(c)).await
        }
        Entity::Users => {
            output_all(list_users(client, page_size)?, json, |u| UserRow::from(u)).await
        }
        Entity::Members => {
            let channel = require_channel(channel)?;
            let members = list_channel_members(client, channel, page_size)?;
            output_all(members, json, |m| MemberRow::from(m)).await
        }
        Entity::Packages => {
            let channel = require_channel(channel)?;
            let packages = list_packages(client, channel, page_size)?;
            output_all(packages, json, |p| PackageRow::from(p)).await
        }
    }
}

fn require_channel(channel: Option<&str>) -> quetz_client::Result<&str> {
    channel.ok_or_else(|| {
        QuetzError::Config("--channel required for listing members and packages".to_string())
    })
}

async fn handle_role(
    client: &QuetzClient,
    action: RoleAction,
    json: bool,
) -> quetz_client::Result<()> {
    match action {
        RoleAction::Get { username } => {
            let role = get_role(client, &username).await?;
            if json {
                print_json(&role)?;
            } else {
                println!("{}", role.pretty_print());
            }
        }
        RoleAction::Set { username, role } => {
            set_role(client, &username, role).await?;
            match role {
                Some(role) => println!("Set role of {} to {}", username, role),
                None => println!("Cleared role of {}", username),
            }
        }
    }
    Ok(())
}

async fn handle_member(client: &QuetzClient, action: MemberAction) -> quetz_client::Result<()> {
    match action {
        MemberAction::Set {
            channel,
            username,
            role,
        } => {
            set_channel_member(client, &channel, &username, role).await?;
            println!("Added {} to {}", username, channel);
        }
        MemberAction::Delete { channel, username } => {
            delete_channel_member(client, &channel, &username).await?;
            println!("Removed {} from {}", username, channel);
        }
    }
    Ok(())
}

async fn handle_channel(client: &QuetzClient, action: ChannelAction) -> quetz_client::Result<()> {
    match action {
        ChannelAction::Create { name } => {
            create_channel(client, &name).await?;
            println!("Created channel {}", name);
        }
        ChannelAction::Delete { name } => {
            delete_channel(client, &name).await?;
            println!("Deleted channel {}", name);
        }
    }
    Ok(())
}

async fn output_all<T, R, F>(pager: Pager<T>, json: bool, to_row: F) -> quetz_client::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    let items: Vec<T> = pager.try_collect().await?;
    if json {
        print_json(&items)?;
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total items", items.len());
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> quetz_client::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ChannelRow {
    name: String,
    private: bool,
    description: String,
}

impl From<&Channel> for ChannelRow {
    fn from(c: &Channel) -> Self {
        Self {
            name: c.name.clone(),
            private: c.private,
            description: c.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: String,
    username: String,
    name: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            name: u.display_name().to_string(),
        }
    }
}

#[derive(Tabled)]
struct MemberRow {
    username: String,
    role: String,
}

impl From<&ChannelMember> for MemberRow {
    fn from(m: &ChannelMember) -> Self {
        Self {
            username: m.user.username.clone(),
            role: m.role.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct PackageRow {
    name: String,
    version: String,
    url: String,
}

impl From<&Package> for PackageRow {
    fn from(p: &Package) -> Self {
        Self {
            name: p.name.clone(),
            version: p.current_version.clone().unwrap_or_default(),
            url: p.url.clone().unwrap_or_default(),
        }
    }
}
