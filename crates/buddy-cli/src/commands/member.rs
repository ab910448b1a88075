//! Workspace member commands

use buddy_provider::{Resource, WorkspaceMemberConfig, WorkspaceMemberState};

use crate::commands::Context;
use crate::display;
use crate::error::{CliError, Result};

/// Invite a user by email, optionally as administrator
pub async fn invite(ctx: &Context, email: &str, admin: bool) -> Result<()> {
    let mut config = WorkspaceMemberConfig::new(email);
    if admin {
        config = config.with_admin(true);
    }
    let state = ctx.provider.workspace_members().create(&config).await?;
    display::show(&state, ctx.json)
}

pub async fn get(ctx: &Context, id: &str) -> Result<()> {
    display::show(&read(ctx, id).await?, ctx.json)
}

/// Grant or revoke the administrator flag
pub async fn set_admin(ctx: &Context, id: &str, admin: bool) -> Result<()> {
    let current = read(ctx, id).await?;
    let config = WorkspaceMemberConfig::new(&current.email).with_admin(admin);
    let state = ctx
        .provider
        .workspace_members()
        .update(&current, &config)
        .await?;
    display::show(&state, ctx.json)
}

pub async fn remove(ctx: &Context, id: &str) -> Result<()> {
    let current = read(ctx, id).await?;
    ctx.provider.workspace_members().delete(&current).await?;
    display::deleted("member", id, ctx.json)
}

/// Find a member by exact email
pub async fn lookup(ctx: &Context, email: &str) -> Result<()> {
    let state = ctx.provider.member_lookup().lookup(email).await?;
    display::show(&state, ctx.json)
}

/// One page of members sorted by name
pub async fn list(ctx: &Context, page: u32, per_page: u32) -> Result<()> {
    if page == 0 {
        return Err(CliError::Input {
            message: "pages are numbered from 1".to_string(),
            help: None,
        });
    }

    let list = ctx.provider.api().list_members(page, per_page).await?;
    if ctx.json {
        return display::print_json(&list.members);
    }
    if list.members.is_empty() {
        println!("No members on page {}.", page);
        return Ok(());
    }
    print!("{}", display::render_member_table(&list));
    Ok(())
}

async fn read(ctx: &Context, id: &str) -> Result<WorkspaceMemberState> {
    ctx.provider
        .workspace_members()
        .read(id, None)
        .await?
        .ok_or_else(|| CliError::not_found(format!("member {}", id)))
}
